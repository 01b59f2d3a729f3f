//! AI-facing snapshots and decision providers
//!
//! Bots never touch live simulation state. Every poll hands them an
//! independent copy of the world, and they communicate intent only through
//! the seeker list they return, which is validated as a whole before any of
//! it is applied.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DECIDE_TIMEOUT_SECS;
use crate::sim::state::{
    CampId, Color, GameState, GoalId, InvalidMagnetStrength, Magnet, PlayerId, SeekerId,
};
use crate::sim::world::World;

/// Snapshot of one seeker. `target` and `magnet_strength` are the two fields
/// a bot may change before returning the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekerView {
    pub id: SeekerId,
    pub owner: PlayerId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
    pub magnet_strength: f32,
    pub disabled_counter: u32,
    pub radius: f32,
    pub max_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalView {
    pub id: GoalId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: Option<PlayerId>,
    pub time_owned: u32,
    pub scoring_time: u32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampView {
    pub id: CampId,
    pub owner: PlayerId,
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub color: Color,
    pub camp: CampId,
}

/// Everything a bot sees for one decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInput {
    pub my_seekers: Vec<SeekerView>,
    pub other_seekers: Vec<SeekerView>,
    pub goals: Vec<GoalView>,
    pub other_players: Vec<PlayerView>,
    pub my_camp: CampView,
    pub camps: Vec<CampView>,
    pub world: World,
    pub elapsed_ticks: u64,
}

impl AiInput {
    /// Own seekers followed by everyone else's.
    pub fn all_seekers(&self) -> impl Iterator<Item = &SeekerView> {
        self.my_seekers.iter().chain(self.other_seekers.iter())
    }
}

/// Build the deep-copy snapshot one player's bot decides on.
///
/// The player id must belong to the session; anything else is a programming
/// error.
pub fn snapshot_for(state: &GameState, player: PlayerId) -> AiInput {
    let mut my_seekers = Vec::new();
    let mut other_seekers = Vec::new();
    for seeker in &state.seekers {
        let view = SeekerView {
            id: seeker.id,
            owner: seeker.owner,
            pos: seeker.body.pos,
            vel: seeker.body.vel,
            target: seeker.target,
            magnet_strength: seeker.magnet.strength(),
            disabled_counter: seeker.disabled_counter,
            radius: seeker.body.radius,
            max_speed: seeker.max_speed(),
        };
        if seeker.owner == player {
            my_seekers.push(view);
        } else {
            other_seekers.push(view);
        }
    }

    let goals = state
        .goals
        .iter()
        .map(|goal| GoalView {
            id: goal.id,
            pos: goal.body.pos,
            vel: goal.body.vel,
            owner: goal.owner,
            time_owned: goal.time_owned,
            scoring_time: goal.scoring_time,
            radius: goal.body.radius,
        })
        .collect();

    let camps: Vec<CampView> = state
        .camps
        .iter()
        .map(|camp| CampView {
            id: camp.id,
            owner: camp.owner,
            position: camp.position,
            width: camp.width,
            height: camp.height,
        })
        .collect();
    let my_camp = camps
        .iter()
        .find(|c| c.owner == player)
        .cloned()
        .expect("player has no camp");

    let other_players = state
        .players
        .iter()
        .filter(|p| p.id != player)
        .map(|p| PlayerView {
            id: p.id,
            name: p.name.clone(),
            score: p.score,
            color: p.color,
            camp: p.camp,
        })
        .collect();

    AiInput {
        my_seekers,
        other_seekers,
        goals,
        other_players,
        my_camp,
        camps,
        world: state.world,
        elapsed_ticks: state.time_ticks,
    }
}

/// Why a poll produced no applicable decision.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("decision timed out after {0:?}")]
    Timeout(Duration),
    #[error("bot disconnected")]
    Disconnected,
    #[error("expected {expected} seekers, got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("seeker {0:?} is not one of the player's seekers")]
    ForeignSeeker(SeekerId),
    #[error("seeker {0:?} appears more than once")]
    DuplicateSeeker(SeekerId),
    #[error("seeker {0:?} has a non-finite target")]
    NonFiniteTarget(SeekerId),
    #[error("seeker {id:?}: {source}")]
    InvalidMagnet {
        id: SeekerId,
        #[source]
        source: InvalidMagnetStrength,
    },
}

/// One interface the engine polls, whatever runs behind it.
pub trait DecisionProvider {
    /// Blocking decision for this tick's snapshot.
    fn decide(&mut self, input: AiInput) -> Result<Vec<SeekerView>, AiError>;

    /// Non-blocking variant; `Ok(None)` means "no fresh decision yet".
    fn poll(&mut self, input: AiInput) -> Result<Option<Vec<SeekerView>>, AiError> {
        self.decide(input).map(Some)
    }
}

/// In-process bot backed by a plain function.
pub struct CallbackProvider<F> {
    decide_fn: F,
}

impl<F> CallbackProvider<F>
where
    F: FnMut(AiInput) -> Vec<SeekerView>,
{
    pub fn new(decide_fn: F) -> Self {
        Self { decide_fn }
    }
}

impl<F> DecisionProvider for CallbackProvider<F>
where
    F: FnMut(AiInput) -> Vec<SeekerView>,
{
    fn decide(&mut self, input: AiInput) -> Result<Vec<SeekerView>, AiError> {
        Ok((self.decide_fn)(input))
    }
}

/// The engine side of a remote bot: snapshots go out on one channel,
/// decisions come back on another. Whatever transport sits behind the
/// [`RemoteEndpoint`] is not this crate's concern; the engine only ever sees
/// the bounded wait.
pub struct ChannelProvider {
    inputs: Sender<AiInput>,
    decisions: Receiver<Vec<SeekerView>>,
    timeout: Duration,
}

/// The far side of a [`ChannelProvider`], held by the transport.
pub struct RemoteEndpoint {
    pub inputs: Receiver<AiInput>,
    pub decisions: Sender<Vec<SeekerView>>,
}

impl ChannelProvider {
    pub fn new() -> (Self, RemoteEndpoint) {
        Self::with_timeout(Duration::from_secs(DECIDE_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> (Self, RemoteEndpoint) {
        let (input_tx, input_rx) = mpsc::channel();
        let (decision_tx, decision_rx) = mpsc::channel();
        (
            Self {
                inputs: input_tx,
                decisions: decision_rx,
                timeout,
            },
            RemoteEndpoint {
                inputs: input_rx,
                decisions: decision_tx,
            },
        )
    }
}

impl DecisionProvider for ChannelProvider {
    fn decide(&mut self, input: AiInput) -> Result<Vec<SeekerView>, AiError> {
        self.inputs.send(input).map_err(|_| AiError::Disconnected)?;
        match self.decisions.recv_timeout(self.timeout) {
            Ok(decision) => Ok(decision),
            Err(RecvTimeoutError::Timeout) => Err(AiError::Timeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(AiError::Disconnected),
        }
    }

    fn poll(&mut self, input: AiInput) -> Result<Option<Vec<SeekerView>>, AiError> {
        self.inputs.send(input).map_err(|_| AiError::Disconnected)?;
        match self.decisions.try_recv() {
            Ok(decision) => Ok(Some(decision)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(AiError::Disconnected),
        }
    }
}

/// Validate a bot's returned seekers and apply them to the live state.
///
/// The sequence must cover exactly the player's own seekers, each id once,
/// with finite targets and in-range magnet strengths. Any violation rejects
/// the whole output; nothing is partially applied.
pub fn apply_decision(
    state: &mut GameState,
    player: PlayerId,
    decision: &[SeekerView],
) -> Result<(), AiError> {
    let own: Vec<SeekerId> = state.seekers_of(player).map(|s| s.id).collect();
    if decision.len() != own.len() {
        return Err(AiError::WrongLength {
            expected: own.len(),
            got: decision.len(),
        });
    }

    let mut updates: Vec<(SeekerId, Vec2, Magnet)> = Vec::with_capacity(decision.len());
    for view in decision {
        if !own.contains(&view.id) {
            return Err(AiError::ForeignSeeker(view.id));
        }
        if updates.iter().any(|(id, _, _)| *id == view.id) {
            return Err(AiError::DuplicateSeeker(view.id));
        }
        if !view.target.is_finite() {
            return Err(AiError::NonFiniteTarget(view.id));
        }
        let mut magnet = Magnet::off();
        magnet
            .set_strength(view.magnet_strength)
            .map_err(|source| AiError::InvalidMagnet {
                id: view.id,
                source,
            })?;
        updates.push((view.id, view.target, magnet));
    }

    for (id, target, magnet) in updates {
        if let Some(seeker) = state.seekers.iter_mut().find(|s| s.id == id) {
            seeker.target = target;
            seeker.magnet = magnet;
        }
    }

    Ok(())
}
