//! Game state and core simulation types
//!
//! Everything the presentation layer reads each frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::RandomEvent;

/// Lifecycle phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start action
    #[default]
    Start,
    /// Active gameplay, ticks advance the simulation
    Playing,
    /// Reserved
    Paused,
    /// Destination reached on a non-final level, waiting for continue
    LevelComplete,
    /// Reserved
    GameOver,
    /// Final destination reached
    Victory,
}

/// Entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Resource,
}

/// A placed, sized entity. Ids are sequential per kind within one spawn batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
}

impl Entity {
    pub fn obstacle(id: u32, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Obstacle,
            pos,
            size,
        }
    }

    pub fn resource(id: u32, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Resource,
            pos,
            size,
        }
    }

    /// Stable presentation key, e.g. `obs-3` or `res-0`
    pub fn key(&self) -> String {
        match self.kind {
            EntityKind::Obstacle => format!("obs-{}", self.id),
            EntityKind::Resource => format!("res-{}", self.id),
        }
    }
}

/// Message tone for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Neutral,
    Good,
    Bad,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Neutral => "neutral",
            Tone::Good => "good",
            Tone::Bad => "bad",
        }
    }
}

/// Transient user-facing message. Expiry travels with the message, so only
/// this message's own deadline can clear it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
    /// Session clock time (ms) at which the message disappears
    pub expires_at_ms: f64,
}

/// Things that happened during a tick or lifecycle action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level_id: u32 },
    Caught { obstacle_id: u32 },
    ResourceCollected { resource_id: u32 },
    RandomEvent(RandomEvent),
    NeedResources { required: u32 },
    LevelComplete { level_id: u32 },
    Victory,
}

/// Live session state owned by the game loop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Index into the level catalog
    pub level_index: usize,
    /// Player top-left corner (authoritative)
    pub player: Vec2,
    pub score: u32,
    pub obstacles: Vec<Entity>,
    pub resources: Vec<Entity>,
    pub message: Option<Message>,
    /// Monotonic session clock (ms), advanced by every tick
    pub clock_ms: f64,
    /// Session clock when the current level began
    pub level_started_ms: f64,
    /// Random events triggered in the current level
    pub events_triggered: u32,
    /// Events since the driver last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a message for `duration_ms`, replacing any current one
    pub fn show_message(&mut self, text: impl Into<String>, tone: Tone, duration_ms: f64) {
        self.message = Some(Message {
            text: text.into(),
            tone,
            expires_at_ms: self.clock_ms + duration_ms,
        });
    }

    /// Clear the current message once its own deadline has passed
    pub fn expire_message(&mut self) {
        if self
            .message
            .as_ref()
            .is_some_and(|m| self.clock_ms >= m.expires_at_ms)
        {
            self.message = None;
        }
    }

    /// Lower the score by `amount`, never below zero
    pub fn lose_resources(&mut self, amount: u32) {
        self.score = self.score.saturating_sub(amount);
    }

    pub fn gain_resources(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    /// Elapsed session time in the current level (ms)
    pub fn level_elapsed_ms(&self) -> u64 {
        (self.clock_ms - self.level_started_ms).max(0.0).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn newer_message_survives_older_deadline() {
        let mut state = GameState::new();
        state.show_message("first", Tone::Bad, 2000.0);
        state.clock_ms = 1500.0;
        state.show_message("second", Tone::Good, 3000.0);

        // First message's deadline passes; second must remain
        state.clock_ms = 2100.0;
        state.expire_message();
        assert_eq!(state.message.as_ref().map(|m| m.text.as_str()), Some("second"));

        state.clock_ms = 4500.0;
        state.expire_message();
        assert!(state.message.is_none());
    }

    #[test]
    fn entity_keys_are_prefixed_by_kind() {
        assert_eq!(Entity::obstacle(3, Vec2::ZERO, 5.0).key(), "obs-3");
        assert_eq!(Entity::resource(0, Vec2::ZERO, 3.0).key(), "res-0");
    }

    #[test]
    fn elapsed_time_uses_level_start() {
        let mut state = GameState::new();
        state.clock_ms = 500.0;
        state.level_started_ms = 200.0;
        assert_eq!(state.level_elapsed_ms(), 300);
    }

    proptest! {
        #[test]
        fn score_never_goes_negative(
            start in 0_u32..10,
            ops in proptest::collection::vec((any::<bool>(), 1_u32..3), 0..50),
        ) {
            let mut state = GameState::new();
            state.score = start;
            for (gain, amount) in ops {
                if gain {
                    state.gain_resources(amount);
                } else {
                    let before = state.score;
                    state.lose_resources(amount);
                    prop_assert_eq!(state.score, before.saturating_sub(amount));
                }
            }
        }
    }
}
