//! Movement input
//!
//! Keyboard and on-screen hold buttons both funnel into one `DirectionSet`,
//! which the simulation samples once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A movement direction in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map a DOM `KeyboardEvent.key` value to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit step for this direction
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    fn bit(&self) -> u8 {
        match self {
            Direction::Up => 1,
            Direction::Down => 1 << 1,
            Direction::Left => 1 << 2,
            Direction::Right => 1 << 3,
        }
    }
}

/// Set of currently held directions. Press/release are idempotent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionSet {
    bits: u8,
}

impl DirectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dir: Direction) -> Self {
        self.press(dir);
        self
    }

    pub fn press(&mut self, dir: Direction) {
        self.bits |= dir.bit();
    }

    pub fn release(&mut self, dir: Direction) {
        self.bits &= !dir.bit();
    }

    /// Apply a hold/release from any input device
    pub fn set(&mut self, dir: Direction, held: bool) {
        if held {
            self.press(dir);
        } else {
            self.release(dir);
        }
    }

    pub fn contains(&self, dir: Direction) -> bool {
        self.bits & dir.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Per-tick velocity. Each held direction adds `speed` on its axis, so
    /// diagonals are not normalized and opposite keys cancel.
    pub fn velocity(&self, speed: f32) -> Vec2 {
        Direction::ALL
            .iter()
            .filter(|d| self.contains(**d))
            .fold(Vec2::ZERO, |acc, d| acc + d.unit() * speed)
    }
}
