//! Magnet Arena - a deterministic toroidal arena game
//!
//! Players steer magnet-equipped "seekers" that herd self-propelled "goals"
//! into their home camps to score. Core modules:
//! - `sim`: Deterministic simulation (torus geometry, physics, game state, tick)
//! - `ai`: Snapshot views and decision providers for player bots
//! - `session`: Match setup and the poll-then-tick run loop
//! - `config`: Session parameters loaded once at startup

pub mod ai;
pub mod config;
pub mod session;
pub mod sim;

pub use config::Config;
pub use session::Session;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Magnet strength bounds; values outside this range are rejected
    pub const MAGNET_MIN: f32 = -8.0;
    pub const MAGNET_MAX: f32 = 1.0;

    /// Magnet strength presets
    pub const MAGNET_ATTRACTIVE: f32 = MAGNET_MAX;
    pub const MAGNET_REPULSIVE: f32 = MAGNET_MIN;

    /// Bounded wait for a remote player's decision, in seconds
    pub const DECIDE_TIMEOUT_SECS: u64 = 5;

    /// Lifetime of a score flash animation, in ticks
    pub const SCORE_ANIMATION_TICKS: u32 = 30;

    /// Per-player colors assigned at session setup, cycled when exhausted
    pub const PLAYER_PALETTE: [[u8; 3]; 6] = [
        [224, 80, 62],
        [72, 156, 219],
        [103, 191, 92],
        [230, 171, 46],
        [155, 89, 182],
        [84, 196, 183],
    ];
}

/// Convert polar (angle, radius) to a cartesian vector
#[inline]
pub fn from_polar(angle: f32, radius: f32) -> Vec2 {
    Vec2::new(angle.cos() * radius, angle.sin() * radius)
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotated(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Rotate a vector counter-clockwise by 90 degrees
#[inline]
pub fn rotated90(v: Vec2) -> Vec2 {
    v.perp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_from_polar() {
        let v = from_polar(0.0, 2.0);
        assert!((v.x - 2.0).abs() < 1e-6);
        assert!(v.y.abs() < 1e-6);

        let v = from_polar(FRAC_PI_2, 1.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotated_full_turn_is_identity() {
        let v = Vec2::new(3.0, -1.5);
        let r = rotated(v, 2.0 * PI);
        assert!((r - v).length() < 1e-5);
    }

    #[test]
    fn test_rotated90_matches_quarter_turn() {
        let v = Vec2::new(1.0, 0.0);
        assert!((rotated90(v) - Vec2::new(0.0, 1.0)).length() < 1e-6);
        assert!((rotated(v, FRAC_PI_2) - rotated90(v)).length() < 1e-6);
    }
}
