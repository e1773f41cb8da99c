//! Play session
//!
//! Owns the live game state, the stats history, the read-only level catalog
//! and tuning, and the random source. Lifecycle actions (start, continue,
//! restart) live here; per-frame work lives in `tick`.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::random::{RandomSource, seeded};
use super::spawn::generate_entities;
use super::state::{Entity, GameEvent, GamePhase, GameState, Message, Tone};
use super::tick::{TickInput, tick};
use crate::levels::{LevelCatalog, LevelConfig};
use crate::stats::{StatsHistory, StatsReport};
use crate::tuning::{ConfigError, Tuning};

/// Result of the platform share action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Native share sheet was shown
    Shared,
    /// No share capability, link copied instead
    Copied,
}

/// HUD values for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub level_name: String,
    /// 1-based
    pub level_number: usize,
    pub level_total: usize,
    pub score: u32,
    pub min_to_win: u32,
    /// `score / min_to_win`, capped at 1
    pub progress: f32,
    /// Destination still locked
    pub needs_resources: bool,
}

/// A play session
#[derive(Debug)]
pub struct Session<R = Pcg32> {
    pub state: GameState,
    pub(crate) stats: StatsHistory,
    pub(crate) catalog: LevelCatalog,
    pub(crate) tuning: Tuning,
    pub(crate) rng: R,
}

impl Session<Pcg32> {
    /// Default levels and tuning with a seeded PCG stream
    pub fn new(seed: u64) -> Self {
        log::info!("Session created with seed: {}", seed);
        Self::assemble(LevelCatalog::default(), Tuning::default(), seeded(seed))
    }

    pub fn with_config(
        catalog: LevelCatalog,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        log::info!("Session created with seed: {}", seed);
        Self::with_rng(catalog, tuning, seeded(seed))
    }
}

impl<R: RandomSource> Session<R> {
    /// Build a session around an injected random source. Fails when a level
    /// start leaves no room for the player under `tuning`.
    pub fn with_rng(
        catalog: LevelCatalog,
        tuning: Tuning,
        rng: R,
    ) -> Result<Self, ConfigError> {
        catalog.validate_fit(&tuning)?;
        Ok(Self::assemble(catalog, tuning, rng))
    }

    fn assemble(catalog: LevelCatalog, tuning: Tuning, rng: R) -> Self {
        let state = GameState {
            player: catalog.level(0).start,
            ..GameState::new()
        };
        Self {
            state,
            stats: StatsHistory::new(),
            catalog,
            tuning,
            rng,
        }
    }

    /// Start a journey from the title screen or after victory
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Start | GamePhase::Victory => {
                self.begin_journey();
                true
            }
            phase => {
                log::warn!("Ignoring start while {:?}", phase);
                false
            }
        }
    }

    /// Play again after victory. Same as starting from the title screen.
    pub fn restart(&mut self) -> bool {
        if self.state.phase != GamePhase::Victory {
            log::warn!("Ignoring restart while {:?}", self.state.phase);
            return false;
        }
        log::info!("Restarting journey");
        self.begin_journey();
        true
    }

    /// Move on to the next level after a level is complete
    pub fn continue_journey(&mut self) -> bool {
        if self.state.phase != GamePhase::LevelComplete {
            log::warn!("Ignoring continue while {:?}", self.state.phase);
            return false;
        }
        let next = self.state.level_index + 1;
        self.init_level(next);
        self.state.phase = GamePhase::Playing;
        true
    }

    fn begin_journey(&mut self) {
        self.stats.clear();
        self.init_level(0);
        self.state.phase = GamePhase::Playing;
        log::info!("Journey started ({} levels)", self.catalog.len());
    }

    /// Reset per-level state and spawn fresh entities. Panics past the
    /// catalog end.
    fn init_level(&mut self, index: usize) {
        let level = self.catalog.level(index);
        let (obstacles, resources) = generate_entities(
            level.obstacle_count,
            level.resource_count,
            &self.tuning,
            &mut self.rng,
        );

        let state = &mut self.state;
        state.level_index = index;
        state.player = level.start;
        state.obstacles = obstacles;
        state.resources = resources;
        state.score = 0;
        state.message = None;
        state.level_started_ms = state.clock_ms;
        state.events_triggered = 0;
        state.events.push(GameEvent::LevelStarted { level_id: level.id });

        log::info!(
            "Level {} ({}): {} obstacles, {} resources, need {}",
            level.id,
            level.name,
            level.obstacle_count,
            level.resource_count,
            level.min_resources_to_win
        );
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &TickInput, dt_ms: f64) -> GamePhase {
        tick(self, input, dt_ms)
    }

    /// Show a transient message from outside the simulation
    pub fn notify(&mut self, text: impl Into<String>, tone: Tone, duration_ms: f64) {
        self.state.show_message(text, tone, duration_ms);
    }

    /// Report the outcome of the share action
    pub fn share_finished(&mut self, outcome: ShareOutcome) {
        if outcome == ShareOutcome::Copied {
            let duration = self.tuning.share_message_ms;
            self.notify("Link copied to clipboard!", Tone::Neutral, duration);
        }
    }

    /// True while the driver must keep ticking: during play, or while a
    /// message is still waiting to expire on an overlay screen
    pub fn needs_frames(&self) -> bool {
        self.state.phase == GamePhase::Playing || self.state.message.is_some()
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn player(&self) -> Vec2 {
        self.state.player
    }

    pub fn obstacles(&self) -> &[Entity] {
        &self.state.obstacles
    }

    pub fn resources(&self) -> &[Entity] {
        &self.state.resources
    }

    pub fn message(&self) -> Option<&Message> {
        self.state.message.as_ref()
    }

    pub fn level_index(&self) -> usize {
        self.state.level_index
    }

    pub fn level(&self) -> &LevelConfig {
        self.catalog.level(self.state.level_index)
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Completed-level history (read-only)
    pub fn stats(&self) -> &StatsHistory {
        &self.stats
    }

    pub fn report(&self) -> StatsReport {
        self.stats.report()
    }

    pub fn hud(&self) -> Hud {
        let level = self.level();
        let min = level.min_resources_to_win;
        let progress = if min == 0 {
            1.0
        } else {
            (self.state.score as f32 / min as f32).min(1.0)
        };
        Hud {
            level_name: level.name.clone(),
            level_number: self.state.level_index + 1,
            level_total: self.catalog.len(),
            score: self.state.score,
            min_to_win: min,
            progress,
            needs_resources: self.state.score < min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_waits_on_title_screen() {
        let session = Session::new(3);
        assert_eq!(session.phase(), GamePhase::Start);
        assert_eq!(session.player(), Vec2::new(10.0, 85.0));
        assert!(session.obstacles().is_empty());
    }

    #[test]
    fn start_spawns_first_level() {
        let mut session = Session::new(3);
        assert!(session.start());
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.level_index(), 0);
        assert_eq!(session.obstacles().len(), 6);
        assert_eq!(session.resources().len(), 8);
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::LevelStarted { level_id: 1 }]
        );
    }

    #[test]
    fn invalid_actions_are_ignored() {
        let mut session = Session::new(3);
        assert!(!session.continue_journey());
        assert!(!session.restart());
        session.start();
        assert!(!session.start());
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn continue_advances_and_resets_level_state() {
        let mut session = Session::new(3);
        session.start();
        session.state.score = 4;
        session.state.events_triggered = 2;
        session.state.phase = GamePhase::LevelComplete;

        assert!(session.continue_journey());
        assert_eq!(session.level_index(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.state.events_triggered, 0);
        assert_eq!(session.player(), Vec2::new(20.0, 80.0));
        assert_eq!(session.obstacles().len(), 9);
        assert!(session.message().is_none());
    }

    #[test]
    #[should_panic]
    fn continuing_past_last_level_is_an_invariant_violation() {
        let mut session = Session::new(3);
        session.start();
        session.state.level_index = 2;
        session.state.phase = GamePhase::LevelComplete;
        session.continue_journey();
    }

    #[test]
    fn copied_share_shows_neutral_message() {
        let mut session = Session::new(3);
        session.share_finished(ShareOutcome::Shared);
        assert!(session.message().is_none());
        session.share_finished(ShareOutcome::Copied);
        let message = session.message().unwrap();
        assert_eq!(message.text, "Link copied to clipboard!");
        assert_eq!(message.tone, Tone::Neutral);
    }

    #[test]
    fn share_message_expires_on_title_screen() {
        let mut session = Session::new(3);
        assert!(!session.needs_frames());
        session.share_finished(ShareOutcome::Copied);
        assert!(session.needs_frames());

        // Idle frames outside play only advance the clock
        let idle = TickInput::default();
        session.tick(&idle, 1990.0);
        assert!(session.message().is_some());
        session.tick(&idle, 20.0);
        assert!(session.message().is_none());
        assert!(!session.needs_frames());
        assert_eq!(session.phase(), GamePhase::Start);
    }

    #[test]
    fn start_outside_player_bounds_is_rejected() {
        let mut level = LevelCatalog::default().level(0).clone();
        level.start = Vec2::new(99.0, 99.0);
        let catalog = LevelCatalog::new(vec![level]).unwrap();
        let result = Session::with_config(catalog, Tuning::default(), 3);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn hud_tracks_progress() {
        let mut session = Session::new(3);
        session.start();
        session.state.score = 2;
        let hud = session.hud();
        assert_eq!(hud.level_number, 1);
        assert_eq!(hud.level_total, 3);
        assert!((hud.progress - 2.0 / 3.0).abs() < 1e-6);
        assert!(hud.needs_resources);

        session.state.score = 9;
        assert_eq!(session.hud().progress, 1.0);
        assert!(!session.hud().needs_resources);
    }
}
