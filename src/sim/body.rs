//! Physical bodies and elastic pair collisions
//!
//! Every moving entity wraps a [`Body`]. Movement follows a fixed order each
//! tick: friction damps the previous velocity, the entity's steering lands as
//! thrusted acceleration, the body is displaced and wrapped. Collision
//! resolution is elastic along the torus-shortest connecting axis.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::World;

/// A moving circular body on the torus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Transient; recomputed every tick before integration.
    pub acc: Vec2,
    pub mass: f32,
    pub radius: f32,
    /// Velocity damping per tick, in `[0, 1)`.
    pub friction: f32,
}

impl Body {
    /// Mass and radius must be positive, friction in `[0, 1)`.
    pub fn new(pos: Vec2, mass: f32, radius: f32, friction: f32) -> Self {
        debug_assert!(mass > 0.0);
        debug_assert!(radius > 0.0);
        debug_assert!((0.0..1.0).contains(&friction));
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            mass,
            radius,
            friction,
        }
    }

    /// Damp the previous tick's velocity. Always runs before this tick's
    /// acceleration is applied.
    #[inline]
    pub fn apply_friction(&mut self) {
        self.vel *= 1.0 - self.friction;
    }

    /// Apply `acc` scaled by `thrust`, displace, wrap. `acc` must already
    /// hold this tick's steering.
    pub fn integrate(&mut self, world: &World, thrust: f32) {
        self.vel += self.acc * thrust;
        self.pos += self.vel;
        world.normalize_position(&mut self.pos);
    }
}

/// Resolve an elastic collision between two bodies.
///
/// The impulse fires only while the bodies approach each other along the
/// torus-shortest axis; afterwards any remaining overlap is split evenly
/// between the two positions, with no mass weighting. Both steps use the
/// same axis, computed once up front.
pub fn collide(a: &mut Body, b: &mut Body, world: &World) {
    let min_dist = a.radius + b.radius;

    let d = world.torus_difference(a.pos, b.pos);
    let dn = d.normalize_or_zero();
    let dv = b.vel - a.vel;
    let m = 2.0 / (a.mass + b.mass);

    let dvdn = dv.dot(dn);
    if dvdn < 0.0 {
        a.vel += dn * (m * b.mass * dvdn);
        b.vel -= dn * (m * a.mass * dvdn);
    }

    let ddn = d.dot(dn);
    if ddn < min_dist {
        a.pos += dn * (ddn - min_dist);
        b.pos -= dn * (ddn - min_dist);
    }
}
