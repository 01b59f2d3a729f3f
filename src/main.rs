//! Magnet Arena entry point
//!
//! Headless match runner: loads an optional JSON config, fills the roster
//! with the built-in demo bot, plays the configured playtime, and logs the
//! scoreboard.

use std::env;
use std::process::ExitCode;

use glam::Vec2;
use log::{error, info};

use magnet_arena::ai::{AiInput, CallbackProvider, DecisionProvider, SeekerView};
use magnet_arena::{Config, Session, consts};

fn main() -> ExitCode {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!("{path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let players: Vec<(String, Box<dyn DecisionProvider>)> = (0..config.global.players)
        .map(|i| {
            let provider: Box<dyn DecisionProvider> = Box::new(CallbackProvider::new(chaser));
            (format!("chaser-{i}"), provider)
        })
        .collect();

    let mut session = match Session::new(&config, players) {
        Ok(session) => session,
        Err(err) => {
            error!("failed to set up match: {err}");
            return ExitCode::FAILURE;
        }
    };

    let scores = session.run();
    for (rank, (name, score)) in scores.iter().enumerate() {
        info!("{}. {name}: {score}", rank + 1);
    }

    ExitCode::SUCCESS
}

/// Demo bot: slot in behind the nearest goal and push it home with the
/// repulsor.
fn chaser(input: AiInput) -> Vec<SeekerView> {
    let world = input.world;
    let support = world.diameter() / 10.0;
    let goal_positions: Vec<Vec2> = input.goals.iter().map(|g| g.pos).collect();

    let mut decision = input.my_seekers.clone();
    if goal_positions.is_empty() {
        return decision;
    }

    for seeker in &mut decision {
        let goal = &input.goals[world.index_of_nearest(seeker.pos, &goal_positions)];
        let home = world.torus_direction(goal.pos, input.my_camp.position);

        let standoff = goal.radius + seeker.radius + 4.0;
        seeker.target = world.normalized_position(goal.pos - home * standoff);
        seeker.magnet_strength = if world.torus_distance(seeker.pos, goal.pos) < support {
            consts::MAGNET_REPULSIVE
        } else {
            0.0
        };
    }

    decision
}
