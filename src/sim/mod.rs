//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Ticks are driven externally (one per rendered frame, or a virtual clock)
//! - Injected, seedable randomness only
//! - Stable iteration order (generation order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod events;
pub mod random;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::steer;
pub use collision::overlaps;
pub use events::{RandomEvent, trigger_random_event};
pub use random::{RandomSource, SequenceRandom};
pub use session::{Hud, Session, ShareOutcome};
pub use spawn::generate_entities;
pub use state::{Entity, EntityKind, GameEvent, GamePhase, GameState, Message, Tone};
pub use tick::{TickInput, tick};
