//! Data-driven game balance
//!
//! Defaults mirror `crate::consts`; a JSON document may override any subset
//! of fields. Loaded once when the session is built, never reloaded.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading tuning or level configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Document was not valid JSON for the expected shape
    Parse(serde_json::Error),
    /// Document parsed but a value is unusable
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Balance values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Movement per tick along each held axis
    pub player_speed: f32,
    pub player_size: f32,
    pub obstacle_size: f32,
    pub resource_size: f32,
    pub destination_size: f32,
    /// Hitbox shrinkage used by every overlap test
    pub collision_tolerance: f32,
    /// Distance from each edge that spawns keep clear of
    pub spawn_margin: f32,
    /// Probability of a random event after a resource pickup
    pub random_event_chance: f32,
    pub event_message_ms: f64,
    pub caught_message_ms: f64,
    pub need_resources_message_ms: f64,
    pub share_message_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            player_size: PLAYER_SIZE,
            obstacle_size: OBSTACLE_SIZE,
            resource_size: RESOURCE_SIZE,
            destination_size: DESTINATION_SIZE,
            collision_tolerance: COLLISION_TOLERANCE,
            spawn_margin: SPAWN_MARGIN,
            random_event_chance: RANDOM_EVENT_CHANCE,
            event_message_ms: EVENT_MESSAGE_MS,
            caught_message_ms: CAUGHT_MESSAGE_MS,
            need_resources_message_ms: NEED_RESOURCES_MESSAGE_MS,
            share_message_ms: SHARE_MESSAGE_MS,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("player_size", self.player_size),
            ("obstacle_size", self.obstacle_size),
            ("resource_size", self.resource_size),
            ("destination_size", self.destination_size),
        ];
        for (name, size) in sizes {
            if !(size > 0.0 && size < PLAY_AREA) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be in (0, {PLAY_AREA}), got {size}"
                )));
            }
        }
        if !(self.player_speed >= 0.0 && self.player_speed.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "player_speed must be non-negative, got {}",
                self.player_speed
            )));
        }
        if !(self.collision_tolerance >= 0.0 && self.collision_tolerance.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "collision_tolerance must be non-negative, got {}",
                self.collision_tolerance
            )));
        }
        if !(0.0..PLAY_AREA / 2.0).contains(&self.spawn_margin) {
            return Err(ConfigError::Invalid(format!(
                "spawn_margin must be in [0, {}), got {}",
                PLAY_AREA / 2.0,
                self.spawn_margin
            )));
        }
        if !(0.0..=1.0).contains(&self.random_event_chance) {
            return Err(ConfigError::Invalid(format!(
                "random_event_chance must be in [0, 1], got {}",
                self.random_event_chance
            )));
        }
        let durations = [
            self.event_message_ms,
            self.caught_message_ms,
            self.need_resources_message_ms,
            self.share_message_ms,
        ];
        if durations.iter().any(|d| !(*d >= 0.0 && d.is_finite())) {
            return Err(ConfigError::Invalid(
                "message durations must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
