//! Torus world geometry
//!
//! The arena is a rectangle whose axes wrap around: leaving one edge re-enters
//! the opposite edge. Every distance and direction in the game goes through
//! this module so that collision math and steering agree on "shortest way
//! around".

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Goal, Seeker};

/// The world rectangle. Owns no entities; pure geometry service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    /// Both dimensions must be positive.
    pub fn new(width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0);
        Self { width, height }
    }

    /// The world rectangle as a vector.
    #[inline]
    pub fn geometry(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Diagonal length of the world rectangle.
    #[inline]
    pub fn diameter(&self) -> f32 {
        self.geometry().length()
    }

    /// Center of the world rectangle.
    #[inline]
    pub fn middle(&self) -> Vec2 {
        self.geometry() / 2.0
    }

    /// Wrap a position into `[0, width) x [0, height)` in place (floor-modulo).
    pub fn normalize_position(&self, pos: &mut Vec2) {
        pos.x -= (pos.x / self.width).floor() * self.width;
        pos.y -= (pos.y / self.height).floor() * self.height;
        // rounding can land a tiny negative input exactly on the far edge
        if pos.x >= self.width {
            pos.x = 0.0;
        }
        if pos.y >= self.height {
            pos.y = 0.0;
        }
    }

    /// Wrapped copy of `pos`.
    pub fn normalized_position(&self, pos: Vec2) -> Vec2 {
        let mut tmp = pos;
        self.normalize_position(&mut tmp);
        tmp
    }

    /// Shortest vector from `a` toward the nearest image of `b`, per axis.
    ///
    /// Positions are expected to be normalized; the result never exceeds half
    /// the world extent on either axis.
    pub fn torus_difference(&self, a: Vec2, b: Vec2) -> Vec2 {
        fn diff1d(len: f32, a: f32, b: f32) -> f32 {
            let delta = (a - b).abs();
            if delta < len - delta {
                b - a
            } else {
                (len - delta) * (a - b).signum()
            }
        }

        Vec2::new(
            diff1d(self.width, a.x, b.x),
            diff1d(self.height, a.y, b.y),
        )
    }

    /// Torus-shortest distance between two positions.
    pub fn torus_distance(&self, a: Vec2, b: Vec2) -> f32 {
        self.torus_difference(a, b).length()
    }

    /// Unit vector from `a` toward the nearest image of `b` (zero if equal).
    pub fn torus_direction(&self, a: Vec2, b: Vec2) -> Vec2 {
        self.torus_difference(a, b).normalize_or_zero()
    }

    /// Index of the candidate nearest to `pos`; the first of tied minima
    /// wins. Panics on an empty slice - callers guarantee non-empty input.
    pub fn index_of_nearest(&self, pos: Vec2, positions: &[Vec2]) -> usize {
        let mut best = self.torus_distance(pos, positions[0]);
        let mut best_index = 0;
        for (i, &p) in positions.iter().enumerate().skip(1) {
            let d = self.torus_distance(pos, p);
            if d < best {
                best = d;
                best_index = i;
            }
        }
        best_index
    }

    /// The goal nearest to `pos`. Panics on an empty slice.
    pub fn nearest_goal<'a>(&self, pos: Vec2, goals: &'a [Goal]) -> &'a Goal {
        let positions: Vec<Vec2> = goals.iter().map(|g| g.body.pos).collect();
        &goals[self.index_of_nearest(pos, &positions)]
    }

    /// The seeker nearest to `pos`. Panics on an empty slice.
    pub fn nearest_seeker<'a>(&self, pos: Vec2, seekers: &'a [Seeker]) -> &'a Seeker {
        let positions: Vec<Vec2> = seekers.iter().map(|s| s.body.pos).collect();
        &seekers[self.index_of_nearest(pos, &positions)]
    }

    /// Uniform random position inside the world rectangle.
    pub fn random_position(&self, rng: &mut Pcg32) -> Vec2 {
        Vec2::new(
            rng.random_range(0.0..self.width),
            rng.random_range(0.0..self.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_position_wraps_both_axes() {
        let world = World::new(100.0, 50.0);

        let mut pos = Vec2::new(105.0, -10.0);
        world.normalize_position(&mut pos);
        assert!((pos.x - 5.0).abs() < 1e-4);
        assert!((pos.y - 40.0).abs() < 1e-4);

        let mut pos = Vec2::new(-0.5, 50.0);
        world.normalize_position(&mut pos);
        assert!((pos.x - 99.5).abs() < 1e-4);
        assert!(pos.y.abs() < 1e-4);
    }

    #[test]
    fn test_torus_difference_prefers_wraparound() {
        let world = World::new(100.0, 100.0);

        // direct route
        let d = world.torus_difference(Vec2::new(10.0, 50.0), Vec2::new(30.0, 50.0));
        assert!((d.x - 20.0).abs() < 1e-4);
        assert!(d.y.abs() < 1e-4);

        // wrapped route: from 10 the nearest image of 90 sits at -10
        let d = world.torus_difference(Vec2::new(10.0, 50.0), Vec2::new(90.0, 50.0));
        assert!((d.x + 20.0).abs() < 1e-4);

        // and the reverse points the other way
        let d = world.torus_difference(Vec2::new(90.0, 50.0), Vec2::new(10.0, 50.0));
        assert!((d.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_torus_direction_is_unit_or_zero() {
        let world = World::new(100.0, 100.0);
        let dir = world.torus_direction(Vec2::new(10.0, 10.0), Vec2::new(90.0, 10.0));
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x < 0.0);

        let zero = world.torus_direction(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0));
        assert_eq!(zero, Vec2::ZERO);
    }

    #[test]
    fn test_index_of_nearest_first_tie_wins() {
        let world = World::new(100.0, 100.0);
        let candidates = [
            Vec2::new(10.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.0),
        ];
        assert_eq!(world.index_of_nearest(Vec2::ZERO, &candidates), 1);
    }

    #[test]
    fn test_index_of_nearest_sees_through_the_wrap() {
        let world = World::new(100.0, 100.0);
        // 95 is 5 away through the edge, 20 is 20 away directly
        let candidates = [Vec2::new(20.0, 0.0), Vec2::new(95.0, 0.0)];
        assert_eq!(world.index_of_nearest(Vec2::ZERO, &candidates), 1);
    }

    proptest! {
        #[test]
        fn prop_normalize_position_lands_in_bounds(
            x in -1e4f32..1e4f32,
            y in -1e4f32..1e4f32,
            w in 1.0f32..2000.0f32,
            h in 1.0f32..2000.0f32,
        ) {
            let world = World::new(w, h);
            let mut pos = Vec2::new(x, y);
            world.normalize_position(&mut pos);
            prop_assert!((0.0..w).contains(&pos.x));
            prop_assert!((0.0..h).contains(&pos.y));
        }

        #[test]
        fn prop_torus_distance_is_symmetric(
            ax in 0.0f32..1.0f32,
            ay in 0.0f32..1.0f32,
            bx in 0.0f32..1.0f32,
            by in 0.0f32..1.0f32,
            w in 1.0f32..2000.0f32,
            h in 1.0f32..2000.0f32,
        ) {
            let world = World::new(w, h);
            let a = Vec2::new(ax * w, ay * h);
            let b = Vec2::new(bx * w, by * h);
            prop_assert_eq!(world.torus_distance(a, b), world.torus_distance(b, a));
        }

        #[test]
        fn prop_torus_distance_bounded_by_half_diagonal(
            ax in 0.0f32..1.0f32,
            ay in 0.0f32..1.0f32,
            bx in 0.0f32..1.0f32,
            by in 0.0f32..1.0f32,
            w in 1.0f32..2000.0f32,
            h in 1.0f32..2000.0f32,
        ) {
            let world = World::new(w, h);
            let a = Vec2::new(ax * w, ay * h);
            let b = Vec2::new(bx * w, by * h);
            let bound = ((w / 2.0).powi(2) + (h / 2.0).powi(2)).sqrt();
            prop_assert!(world.torus_distance(a, b) <= bound * (1.0 + 1e-5));
        }
    }
}
