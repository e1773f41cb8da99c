//! Per-frame simulation tick
//!
//! Core game loop that advances the session by one rendered frame. Speed is
//! expressed per tick, so effective movement follows the display refresh rate.

use super::autopilot::steer;
use super::collision::overlaps;
use super::events::trigger_random_event;
use super::random::RandomSource;
use super::session::Session;
use super::state::{GameEvent, GamePhase, GameState, Tone};
use crate::clamp_to_play_area;
use crate::input::DirectionSet;
use crate::levels::{LevelCatalog, LevelConfig};
use crate::stats::StatsHistory;
use crate::tuning::Tuning;

/// Input sampled for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Directions held at sampling time
    pub held: DirectionSet,
    /// Idle/demo mode - the autopilot chooses directions
    pub autopilot: bool,
}

impl TickInput {
    pub fn held(held: DirectionSet) -> Self {
        Self {
            held,
            autopilot: false,
        }
    }
}

/// Advance the session by one tick of `dt_ms` and return the resulting phase.
///
/// The clock and message expiry advance in every phase; gameplay only runs
/// while `Playing`. Within a playing tick the order is fixed: movement,
/// destination, obstacles, resources.
pub fn tick<R: RandomSource>(session: &mut Session<R>, input: &TickInput, dt_ms: f64) -> GamePhase {
    let Session {
        state,
        stats,
        catalog,
        tuning,
        rng,
    } = session;
    let catalog: &LevelCatalog = catalog;
    let tuning: &Tuning = tuning;

    state.clock_ms += dt_ms.max(0.0);
    state.expire_message();

    if state.phase != GamePhase::Playing {
        return state.phase;
    }

    let level = catalog.level(state.level_index);
    let held = if input.autopilot {
        steer(state, level, tuning)
    } else {
        input.held
    };

    // Every collision test this tick uses the moved position, even after a reset
    let probe = clamp_to_play_area(
        state.player + held.velocity(tuning.player_speed),
        tuning.player_size,
    );
    state.player = probe;

    let hits = |pos, size| overlaps(probe, tuning.player_size, pos, size, tuning.collision_tolerance);

    if hits(level.destination, tuning.destination_size) {
        if state.score >= level.min_resources_to_win {
            let is_last = catalog.is_last(state.level_index);
            complete_level(state, stats, level, is_last);
            return state.phase;
        }
        if state.message.is_none() {
            state.show_message(
                format!("Need {} resources!", level.min_resources_to_win),
                Tone::Neutral,
                tuning.need_resources_message_ms,
            );
            state.events.push(GameEvent::NeedResources {
                required: level.min_resources_to_win,
            });
        }
    }

    // No early exit: each overlapping obstacle applies its own penalty
    let caught_by: Vec<u32> = state
        .obstacles
        .iter()
        .filter(|o| hits(o.pos, o.size))
        .map(|o| o.id)
        .collect();
    for obstacle_id in caught_by {
        state.lose_resources(1);
        state.player = level.start;
        state.show_message("Caught by guard! Resetting.", Tone::Bad, tuning.caught_message_ms);
        state.events.push(GameEvent::Caught { obstacle_id });
        log::debug!("Caught by obstacle {} (score now {})", obstacle_id, state.score);
    }

    // At most one pickup per tick, first in list order
    if let Some(index) = state.resources.iter().position(|r| hits(r.pos, r.size)) {
        let resource = state.resources.remove(index);
        state.gain_resources(1);
        state.events.push(GameEvent::ResourceCollected {
            resource_id: resource.id,
        });
        log::debug!("Collected resource {} (score now {})", resource.id, state.score);

        if rng.next_unit() < tuning.random_event_chance {
            trigger_random_event(state, level.start, tuning, &mut *rng);
        }
    }

    state.phase
}

fn complete_level(
    state: &mut GameState,
    stats: &mut StatsHistory,
    level: &LevelConfig,
    is_last: bool,
) {
    stats.record(
        level.id,
        state.score,
        state.level_elapsed_ms(),
        state.events_triggered,
    );

    if is_last {
        state.phase = GamePhase::Victory;
        state.events.push(GameEvent::Victory);
        log::info!("Journey complete after level {}", level.id);
    } else {
        state.phase = GamePhase::LevelComplete;
        state.events.push(GameEvent::LevelComplete { level_id: level.id });
        log::info!("Level {} complete", level.id);
    }
}
