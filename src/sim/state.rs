//! Game entities and state
//!
//! Everything that survives across ticks lives here. The entity vectors keep
//! insertion order, and that order is the deterministic iteration order the
//! tick engine relies on. Entities refer to each other by typed ids; the
//! `GameState` vectors are the source of truth those ids resolve against.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::{self, Body};
use super::world::World;
use crate::config::Config;
use crate::consts::{
    MAGNET_ATTRACTIVE, MAGNET_MAX, MAGNET_MIN, MAGNET_REPULSIVE, PLAYER_PALETTE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeekerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoalId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CampId(pub u32);

/// sRGB color assigned to a player at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("magnet strength must lie in [{MAGNET_MIN}, {MAGNET_MAX}], got {0}")]
pub struct InvalidMagnetStrength(pub f32);

/// A seeker's magnet. Strength is kept inside `[MAGNET_MIN, MAGNET_MAX]`;
/// out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Magnet {
    strength: f32,
}

impl Magnet {
    pub fn off() -> Self {
        Self { strength: 0.0 }
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn set_strength(&mut self, value: f32) -> Result<(), InvalidMagnetStrength> {
        if (MAGNET_MIN..=MAGNET_MAX).contains(&value) {
            self.strength = value;
            Ok(())
        } else {
            Err(InvalidMagnetStrength(value))
        }
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.strength != 0.0
    }

    pub fn set_attractive(&mut self) {
        self.strength = MAGNET_ATTRACTIVE;
    }

    pub fn set_repulsive(&mut self) {
        self.strength = MAGNET_REPULSIVE;
    }

    pub fn switch_off(&mut self) {
        self.strength = 0.0;
    }
}

/// Compactly supported falloff: `exp(1/(x^2 - 1))` for `x < 1`, zero beyond.
fn bump(x: f32) -> f32 {
    if x < 1.0 {
        (1.0 / (x * x - 1.0)).exp()
    } else {
        0.0
    }
}

/// A player-controlled magnet particle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seeker {
    pub id: SeekerId,
    pub owner: PlayerId,
    pub body: Body,
    /// Steering destination; the seeker accelerates toward it every tick.
    pub target: Vec2,
    pub magnet: Magnet,
    /// While positive the seeker neither steers nor exerts magnetic force.
    pub disabled_counter: u32,
    pub base_thrust: f32,
    pub magnet_slowdown: f32,
    pub disabled_time: u32,
}

impl Seeker {
    pub fn from_config(id: SeekerId, owner: PlayerId, pos: Vec2, config: &Config) -> Self {
        Self {
            id,
            owner,
            body: Body::new(
                pos,
                config.seeker.mass,
                config.seeker.radius,
                config.seeker.friction,
            ),
            target: pos,
            magnet: Magnet::off(),
            disabled_counter: 0,
            base_thrust: config.seeker.thrust,
            magnet_slowdown: config.seeker.magnet_slowdown,
            disabled_time: config.seeker.disabled_time,
        }
    }

    /// Running the magnet costs thrust.
    pub fn thrust(&self) -> f32 {
        let slowdown = if self.magnet.is_on() {
            self.magnet_slowdown
        } else {
            1.0
        };
        self.base_thrust * slowdown
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.disabled_counter > 0
    }

    /// Put the seeker into cooldown.
    pub fn disable(&mut self) {
        self.disabled_counter = self.disabled_time;
    }

    /// Magnet is on and the seeker is able to use it.
    pub fn magnet_effective(&self) -> bool {
        self.magnet.is_on() && !self.is_disabled()
    }

    /// Terminal speed under constant full thrust.
    pub fn max_speed(&self) -> f32 {
        self.base_thrust / self.body.friction
    }

    /// One tick of movement. Disabled seekers do not steer.
    pub fn step(&mut self, world: &World) {
        self.body.apply_friction();
        self.body.acc = if self.disabled_counter == 0 {
            world.torus_direction(self.body.pos, self.target)
        } else {
            Vec2::ZERO
        };
        let thrust = self.thrust();
        self.body.integrate(world, thrust);
    }

    /// Force this seeker's magnet exerts on a point mass at `point`.
    ///
    /// Positive strength pulls the point toward the seeker, negative pushes
    /// it away. The field vanishes beyond a tenth of the world diagonal, and
    /// a disabled seeker exerts nothing.
    pub fn magnetic_force(&self, world: &World, point: Vec2) -> Vec2 {
        if self.is_disabled() {
            return Vec2::ZERO;
        }

        let diff = world.torus_difference(self.body.pos, point);
        let len = diff.length();
        let direction = if len != 0.0 { diff / len } else { Vec2::ZERO };
        let r = len / world.diameter();

        -direction * (self.magnet.strength() * bump(r * 10.0))
    }

    /// Seeker/seeker collision: every participant without an effective magnet
    /// is disabled, a participant holding an effective magnet is immune. The
    /// elastic response applies regardless.
    pub fn collide(a: &mut Seeker, b: &mut Seeker, world: &World) {
        let a_shielded = a.magnet_effective();
        let b_shielded = b.magnet_effective();
        if !a_shielded {
            a.disable();
        }
        if !b_shielded {
            b.disable();
        }

        body::collide(&mut a.body, &mut b.body, world);
    }
}

/// A self-propelled scoring object. Its acceleration is whatever magnetic
/// forces the seekers exert on it; `base_thrust` only scales that pull.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub body: Body,
    pub owner: Option<PlayerId>,
    /// Consecutive ticks spent in the current owner's camp.
    pub time_owned: u32,
    pub scoring_time: u32,
    pub base_thrust: f32,
}

impl Goal {
    pub fn from_config(id: GoalId, pos: Vec2, config: &Config) -> Self {
        Self {
            id,
            body: Body::new(
                pos,
                config.goal.mass,
                config.goal.radius,
                config.goal.friction,
            ),
            owner: None,
            time_owned: 0,
            scoring_time: config.goal.scoring_time,
            base_thrust: config.goal.thrust,
        }
    }

    /// One tick of movement. `body.acc` holds the accumulated magnetic force.
    pub fn step(&mut self, world: &World) {
        self.body.apply_friction();
        self.body.integrate(world, self.base_thrust);
    }

    /// Update camp residency and report capture.
    ///
    /// Outside the camp nothing changes: the goal remembers the last camp it
    /// sat in. Entering a differently-owned camp resets the clock.
    pub fn camp_tick(&mut self, camp: &Camp) -> bool {
        if camp.contains(self.body.pos) {
            if self.owner == Some(camp.owner) {
                self.time_owned += 1;
            } else {
                self.time_owned = 0;
                self.owner = Some(camp.owner);
            }
        }

        self.time_owned >= self.scoring_time
    }
}

/// A player's rectangular home zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camp {
    pub id: CampId,
    pub owner: PlayerId,
    /// Center of the rectangle.
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Camp {
    /// Strict axis-aligned containment around the center. Uses the direct
    /// delta; camps never straddle the world edge.
    pub fn contains(&self, pos: Vec2) -> bool {
        let delta = self.position - pos;
        2.0 * delta.x.abs() < self.width && 2.0 * delta.y.abs() < self.height
    }

    pub fn top_left(&self) -> Vec2 {
        self.position - Vec2::new(self.width, self.height) / 2.0
    }

    pub fn bottom_right(&self) -> Vec2 {
        self.position + Vec2::new(self.width, self.height) / 2.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub color: Color,
    pub camp: CampId,
}

/// Transient score flash. Observational only; never affects gameplay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreAnimation {
    pub pos: Vec2,
    pub color: Color,
    pub age: u32,
    pub duration: u32,
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("at least one player is required")]
    NoPlayers,
    #[error(
        "camp height {camp_height} exceeds the per-player band {band}; camps would overlap"
    )]
    CampsOverlap { camp_height: f32, band: f32 },
}

/// Complete authoritative game state.
#[derive(Debug, Clone)]
pub struct GameState {
    pub world: World,
    pub seed: u64,
    pub time_ticks: u64,
    pub players: Vec<Player>,
    pub camps: Vec<Camp>,
    pub seekers: Vec<Seeker>,
    pub goals: Vec<Goal>,
    pub animations: Vec<ScoreAnimation>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Set up a match: one camp per player evenly spaced along the world
    /// height, seekers and goals at seeded random positions.
    pub fn new(config: &Config, player_names: &[&str]) -> Result<Self, SetupError> {
        if player_names.is_empty() {
            return Err(SetupError::NoPlayers);
        }

        let world = World::new(config.map.width, config.map.height);
        let band = world.height / player_names.len() as f32;
        if config.camp.height > band {
            return Err(SetupError::CampsOverlap {
                camp_height: config.camp.height,
                band,
            });
        }

        let mut state = Self {
            world,
            seed: config.global.seed,
            time_ticks: 0,
            players: Vec::new(),
            camps: Vec::new(),
            seekers: Vec::new(),
            goals: Vec::new(),
            animations: Vec::new(),
            rng: Pcg32::seed_from_u64(config.global.seed),
            next_id: 1,
        };

        for (i, name) in player_names.iter().enumerate() {
            let player_id = PlayerId(state.next_entity_id());
            let camp_id = CampId(state.next_entity_id());

            state.camps.push(Camp {
                id: camp_id,
                owner: player_id,
                position: Vec2::new(world.width / 2.0, band * (i as f32 + 0.5)),
                width: config.camp.width,
                height: config.camp.height,
            });
            state.players.push(Player {
                id: player_id,
                name: (*name).to_string(),
                score: 0,
                color: PLAYER_PALETTE[i % PLAYER_PALETTE.len()].into(),
                camp: camp_id,
            });

            for _ in 0..config.global.seekers {
                let id = SeekerId(state.next_entity_id());
                let pos = state.world.random_position(&mut state.rng);
                state.seekers.push(Seeker::from_config(id, player_id, pos, config));
            }
        }

        for _ in 0..config.global.goals {
            let id = GoalId(state.next_entity_id());
            let pos = state.world.random_position(&mut state.rng);
            state.goals.push(Goal::from_config(id, pos, config));
        }

        Ok(state)
    }

    /// Allocate a fresh entity id.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn camp(&self, id: CampId) -> Option<&Camp> {
        self.camps.iter().find(|c| c.id == id)
    }

    /// The player's seekers, in the global stable order.
    pub fn seekers_of(&self, player: PlayerId) -> impl Iterator<Item = &Seeker> {
        self.seekers.iter().filter(move |s| s.owner == player)
    }
}
