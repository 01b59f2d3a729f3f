//! Match orchestration
//!
//! One session owns the authoritative [`GameState`] plus one decision
//! provider per player. Each step polls every player in insertion order - a
//! player's validated output is fully applied before the next player is
//! polled - and then advances the simulation one tick. A misbehaving or
//! silent bot only costs its own player responsiveness; the match carries on.

use log::{info, warn};

use crate::ai::{self, DecisionProvider};
use crate::config::Config;
use crate::sim::state::{GameState, PlayerId, SetupError};
use crate::sim::tick::tick;

pub struct Session {
    pub state: GameState,
    slots: Vec<PlayerSlot>,
    wait_for_players: bool,
    playtime: u64,
}

struct PlayerSlot {
    player: PlayerId,
    provider: Box<dyn DecisionProvider>,
}

impl Session {
    /// Set up a match with one provider per named player.
    pub fn new(
        config: &Config,
        players: Vec<(String, Box<dyn DecisionProvider>)>,
    ) -> Result<Self, SetupError> {
        let names: Vec<&str> = players.iter().map(|(name, _)| name.as_str()).collect();
        let state = GameState::new(config, &names)?;

        let slots = state
            .players
            .iter()
            .zip(players)
            .map(|(player, (_, provider))| PlayerSlot {
                player: player.id,
                provider,
            })
            .collect();

        Ok(Self {
            state,
            slots,
            wait_for_players: config.global.wait_for_players,
            playtime: config.global.playtime,
        })
    }

    /// Poll every bot, apply what validates, then advance one tick.
    pub fn step(&mut self) {
        for slot in &mut self.slots {
            let input = ai::snapshot_for(&self.state, slot.player);
            let outcome = if self.wait_for_players {
                slot.provider.decide(input).map(Some)
            } else {
                slot.provider.poll(input)
            };

            match outcome {
                Ok(Some(decision)) => {
                    if let Err(err) = ai::apply_decision(&mut self.state, slot.player, &decision)
                    {
                        warn!("rejecting decision for player {:?}: {err}", slot.player);
                    }
                }
                Ok(None) => {}
                Err(err) => warn!("no decision from player {:?}: {err}", slot.player),
            }
        }

        tick(&mut self.state);
    }

    /// Run the configured playtime and return `(name, score)` pairs, best
    /// score first.
    pub fn run(&mut self) -> Vec<(String, u32)> {
        info!(
            "starting match: {} players, {} seekers, {} goals, {} ticks",
            self.state.players.len(),
            self.state.seekers.len(),
            self.state.goals.len(),
            self.playtime,
        );

        for _ in 0..self.playtime {
            self.step();
        }

        let mut scores: Vec<(String, u32)> = self
            .state
            .players
            .iter()
            .map(|p| (p.name.clone(), p.score))
            .collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1));

        info!("match over after {} ticks", self.state.time_ticks);
        scores
    }
}
