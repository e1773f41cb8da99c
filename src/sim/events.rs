//! Random journey events
//!
//! Rolled after a resource pickup. Four equally likely outcomes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use super::state::{GameEvent, GameState, Tone};
use crate::tuning::Tuning;

/// Outcome of a random event roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RandomEvent {
    /// Lose one resource (floored at zero)
    Storm,
    /// Gain one resource
    VisaLottery,
    /// Gain two resources
    NgoAssistance,
    /// Sent back to the level start
    BorderDelay,
}

impl RandomEvent {
    /// Map a uniform sample in `[0, 1)` onto quartiles
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.25 {
            RandomEvent::Storm
        } else if roll < 0.5 {
            RandomEvent::VisaLottery
        } else if roll < 0.75 {
            RandomEvent::NgoAssistance
        } else {
            RandomEvent::BorderDelay
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RandomEvent::Storm => "Storm at sea! Lost 1 resource.",
            RandomEvent::VisaLottery => "Visa Lottery Won! Gained 1 resource.",
            RandomEvent::NgoAssistance => "NGO Assistance! Gained 2 resources.",
            RandomEvent::BorderDelay => "Border Delay! Sent back to start.",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            RandomEvent::Storm | RandomEvent::BorderDelay => Tone::Bad,
            RandomEvent::VisaLottery | RandomEvent::NgoAssistance => Tone::Good,
        }
    }
}

/// Roll and apply one random event. Always counts toward the level's stats.
pub fn trigger_random_event<R: RandomSource + ?Sized>(
    state: &mut GameState,
    level_start: Vec2,
    tuning: &Tuning,
    rng: &mut R,
) -> RandomEvent {
    state.events_triggered += 1;
    let event = RandomEvent::from_roll(rng.next_unit());

    match event {
        RandomEvent::Storm => state.lose_resources(1),
        RandomEvent::VisaLottery => state.gain_resources(1),
        RandomEvent::NgoAssistance => state.gain_resources(2),
        RandomEvent::BorderDelay => state.player = level_start,
    }

    state.show_message(event.message(), event.tone(), tuning.event_message_ms);
    state.events.push(GameEvent::RandomEvent(event));
    log::debug!("Random event {:?} (score now {})", event, state.score);
    event
}
