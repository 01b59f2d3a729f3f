//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (entity vectors, insertion order)
//! - No I/O and no platform dependencies

pub mod body;
pub mod state;
pub mod tick;
pub mod world;

pub use body::{Body, collide};
pub use state::{
    Camp, CampId, Color, GameState, Goal, GoalId, InvalidMagnetStrength, Magnet, Player,
    PlayerId, ScoreAnimation, Seeker, SeekerId, SetupError,
};
pub use tick::tick;
pub use world::World;
