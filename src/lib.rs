//! Migration Journey - a percentage-plane arcade game about crossing borders
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, random events, lifecycle)
//! - `levels`: Static level catalog
//! - `tuning`: Data-driven game balance
//! - `stats`: Per-level outcome history and reporting
//! - `input`: Active movement directions and key mapping

pub mod input;
pub mod levels;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use input::{Direction, DirectionSet};
pub use levels::{LevelCatalog, LevelConfig};
pub use stats::{GameStats, StatsHistory, StatsReport};
pub use tuning::{ConfigError, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Play area extent on both axes (percentage units)
    pub const PLAY_AREA: f32 = 100.0;

    /// Player token side length
    pub const PLAYER_SIZE: f32 = 4.0;
    /// Obstacle side length
    pub const OBSTACLE_SIZE: f32 = 5.0;
    /// Resource side length
    pub const RESOURCE_SIZE: f32 = 3.0;
    /// Destination side length
    pub const DESTINATION_SIZE: f32 = 8.0;

    /// Player movement per rendered frame (not per second)
    pub const PLAYER_SPEED: f32 = 0.4;

    /// Hitbox shrinkage applied before overlap testing
    pub const COLLISION_TOLERANCE: f32 = 0.5;

    /// Entities spawn at least this far from every edge
    pub const SPAWN_MARGIN: f32 = 10.0;

    /// Chance of a random event after collecting a resource
    pub const RANDOM_EVENT_CHANCE: f32 = 0.3;

    /// Message display windows (milliseconds)
    pub const EVENT_MESSAGE_MS: f64 = 3000.0;
    pub const CAUGHT_MESSAGE_MS: f64 = 2000.0;
    pub const NEED_RESOURCES_MESSAGE_MS: f64 = 2000.0;
    pub const SHARE_MESSAGE_MS: f64 = 2000.0;

    /// Nominal frame duration for virtual 60 Hz drivers
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Clamp a top-left corner so a box of `size` stays inside the play area
#[inline]
pub fn clamp_to_play_area(pos: Vec2, size: f32) -> Vec2 {
    let max = (consts::PLAY_AREA - size).max(0.0);
    Vec2::new(pos.x.clamp(0.0, max), pos.y.clamp(0.0, max))
}

/// Center of a box given its top-left corner and side length
#[inline]
pub fn box_center(pos: Vec2, size: f32) -> Vec2 {
    pos + Vec2::splat(size / 2.0)
}

/// True when a point lies inside the play area
#[inline]
pub fn in_play_area(pos: Vec2) -> bool {
    pos.is_finite()
        && (0.0..=consts::PLAY_AREA).contains(&pos.x)
        && (0.0..=consts::PLAY_AREA).contains(&pos.y)
}
