//! The simulation tick
//!
//! Advances the game by one step in five fixed stages. The stage order, the
//! entity iteration order, and the pair sequencing are all part of the
//! contract: two runs from the same seed and the same decisions must agree
//! bit for bit.

use glam::Vec2;

use super::body::Body;
use super::state::{GameState, Goal, GoalId, PlayerId, ScoreAnimation, Seeker};
use crate::consts::SCORE_ANIMATION_TICKS;

/// Advance the game state by one tick.
pub fn tick(state: &mut GameState) {
    let world = state.world;
    state.time_ticks += 1;

    // move and recover seekers; the steering decision sees the
    // pre-decrement cooldown
    for seeker in &mut state.seekers {
        seeker.step(&world);
        if seeker.disabled_counter > 0 {
            seeker.disabled_counter -= 1;
        }
    }

    // accumulate magnetic forces in stable seeker order, then move goals
    for goal in &mut state.goals {
        let mut force = Vec2::ZERO;
        for seeker in &state.seekers {
            force += seeker.magnetic_force(&world, goal.body.pos);
        }
        goal.body.acc = force;
        goal.step(&world);
    }

    // seeker collisions: unordered pairs (i, j) with i < j, in index order;
    // earlier pairs may mutate a body before later pairs test it
    for i in 0..state.seekers.len() {
        let (head, tail) = state.seekers.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            let min_dist = a.body.radius + b.body.radius;
            if world.torus_distance(a.body.pos, b.body.pos) < min_dist {
                Seeker::collide(a, b, &world);
            }
        }
    }

    // camp residency and scoring; the last camp in iteration order that
    // contains a goal decides its owner and clock for this tick
    for i in 0..state.goals.len() {
        let mut scored = false;
        for camp in &state.camps {
            scored = state.goals[i].camp_tick(camp);
        }
        if scored {
            if let Some(scorer) = state.goals[i].owner {
                goal_scored(state, scorer, i);
            }
        }
    }

    // advance animations
    for animation in &mut state.animations {
        animation.age += 1;
    }
    state.animations.retain(|a| a.age <= a.duration);
}

/// Credit the scorer and replace the captured goal in place with a fresh
/// goal under a new id.
fn goal_scored(state: &mut GameState, scorer: PlayerId, goal_index: usize) {
    let (old_pos, mass, radius, friction, scoring_time, base_thrust) = {
        let goal = &state.goals[goal_index];
        (
            goal.body.pos,
            goal.body.mass,
            goal.body.radius,
            goal.body.friction,
            goal.scoring_time,
            goal.base_thrust,
        )
    };

    let color = match state.player_mut(scorer) {
        Some(player) => {
            player.score += 1;
            player.color
        }
        None => return,
    };

    let id = GoalId(state.next_entity_id());
    let pos = state.world.random_position(&mut state.rng);
    state.goals[goal_index] = Goal {
        id,
        body: Body::new(pos, mass, radius, friction),
        owner: None,
        time_owned: 0,
        scoring_time,
        base_thrust,
    };

    state.animations.push(ScoreAnimation {
        pos: old_pos,
        color,
        age: 0,
        duration: SCORE_ANIMATION_TICKS,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn two_player_state() -> GameState {
        GameState::new(&Config::default(), &["a", "b"]).unwrap()
    }

    #[test]
    fn test_disabled_counter_decrements_once_per_tick() {
        let mut state = two_player_state();
        // a lone seeker cannot be re-disabled by a collision mid-test
        state.seekers.truncate(1);
        state.goals.clear();
        state.seekers[0].disabled_counter = 3;

        for expected in [2, 1, 0, 0] {
            tick(&mut state);
            assert_eq!(state.seekers[0].disabled_counter, expected);
        }
    }

    #[test]
    fn test_goals_follow_accumulated_magnet_force() {
        let mut state = two_player_state();
        // isolate one seeker and one goal, far from everything else
        state.seekers.truncate(1);
        state.goals.truncate(1);
        state.seekers[0].body.pos = Vec2::new(100.0, 100.0);
        state.seekers[0].target = Vec2::new(100.0, 100.0);
        state.seekers[0].magnet.set_attractive();
        state.goals[0].body.pos = Vec2::new(120.0, 100.0);

        tick(&mut state);
        // attraction pulls the goal toward the seeker
        assert!(state.goals[0].body.vel.x < 0.0);
        assert!(state.goals[0].body.pos.x < 120.0);
    }

    #[test]
    fn test_goal_capture_scores_and_respawns() {
        let mut state = two_player_state();
        state.seekers.clear();
        state.goals.truncate(1);

        let camp_pos = state.camps[0].position;
        let scorer = state.camps[0].owner;
        let old_id = state.goals[0].id;
        state.goals[0].body.pos = camp_pos;
        state.goals[0].scoring_time = 2;

        // adopt, then count up to the threshold
        tick(&mut state);
        assert_eq!(state.goals[0].owner, Some(scorer));
        tick(&mut state);
        tick(&mut state);

        let player = state.player(scorer).unwrap();
        assert_eq!(player.score, 1);

        let goal = &state.goals[0];
        assert_ne!(goal.id, old_id);
        assert_eq!(goal.owner, None);
        assert_eq!(goal.time_owned, 0);
        assert_eq!(goal.body.vel, Vec2::ZERO);

        assert_eq!(state.animations.len(), 1);
        assert_eq!(state.animations[0].pos, camp_pos);
        assert_eq!(state.animations[0].color, player.color);
    }

    #[test]
    fn test_animations_age_out() {
        let mut state = two_player_state();
        state.seekers.clear();
        state.goals.clear();
        state.animations.push(ScoreAnimation {
            pos: Vec2::ZERO,
            color: crate::sim::state::Color { r: 1, g: 2, b: 3 },
            age: 0,
            duration: 2,
        });

        tick(&mut state);
        tick(&mut state);
        assert_eq!(state.animations.len(), 1);
        tick(&mut state);
        assert!(state.animations.is_empty());
    }

    #[test]
    fn test_colliding_seekers_bounce_and_disable() {
        let mut state = two_player_state();
        state.goals.clear();
        state.seekers.truncate(2);

        let world = state.world;
        let mid = world.middle();
        state.seekers[0].body.pos = mid - Vec2::new(6.0, 0.0);
        state.seekers[0].body.vel = Vec2::new(1.0, 0.0);
        state.seekers[0].target = mid - Vec2::new(6.0, 0.0);
        state.seekers[1].body.pos = mid + Vec2::new(6.0, 0.0);
        state.seekers[1].body.vel = Vec2::new(-1.0, 0.0);
        state.seekers[1].target = mid + Vec2::new(6.0, 0.0);

        tick(&mut state);

        assert!(state.seekers[0].is_disabled());
        assert!(state.seekers[1].is_disabled());
        let dist = world.torus_distance(
            state.seekers[0].body.pos,
            state.seekers[1].body.pos,
        );
        assert!(dist >= state.seekers[0].body.radius + state.seekers[1].body.radius - 1e-3);
    }

    #[test]
    fn test_tick_is_deterministic() {
        let config = Config::default();
        let mut a = GameState::new(&config, &["a", "b"]).unwrap();
        let mut b = GameState::new(&config, &["a", "b"]).unwrap();

        // give everyone a target so the run is not all idle drift
        for state in [&mut a, &mut b] {
            let middle = state.world.middle();
            for seeker in &mut state.seekers {
                seeker.target = middle;
            }
        }

        for _ in 0..200 {
            tick(&mut a);
            tick(&mut b);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        for (x, y) in a.seekers.iter().zip(&b.seekers) {
            assert_eq!(x.body.pos, y.body.pos);
            assert_eq!(x.body.vel, y.body.vel);
        }
        for (x, y) in a.goals.iter().zip(&b.goals) {
            assert_eq!(x.body.pos, y.body.pos);
        }
        let scores_a: Vec<u32> = a.players.iter().map(|p| p.score).collect();
        let scores_b: Vec<u32> = b.players.iter().map(|p| p.score).collect();
        assert_eq!(scores_a, scores_b);
    }
}
