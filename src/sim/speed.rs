//! Territory-driven speed controller
//!
//! Teams below the average share speed up and dominant teams slow down.
//! Re-evaluated every step so speeds drift toward a moving target instead of
//! jumping.

use rand::Rng;

use super::state::Ball;
use crate::config::SimConfig;
use crate::consts::{COUNT_EPSILON, STALL_SPEED};
use crate::random_velocity;

/// Speed a team's balls are pulled toward for a given cell count
pub fn target_speed(config: &SimConfig, count: usize, average: f32) -> f32 {
    let target = config.base_speed * average / (count as f32 + COUNT_EPSILON);
    target.clamp(config.speed_min, config.speed_max)
}

/// Blend a ball's speed toward `target`, keeping its heading.
///
/// A stalled ball has no heading to keep; it gets a random one at `target`.
pub fn blend_speed<R: Rng + ?Sized>(ball: &mut Ball, target: f32, config: &SimConfig, rng: &mut R) {
    let current = ball.speed();
    if current <= STALL_SPEED {
        ball.vel = random_velocity(rng, target);
        return;
    }
    let alpha = config.speed_smoothing;
    let blended = ((1.0 - alpha) * current + alpha * target).clamp(config.speed_min, config.speed_max);
    ball.vel *= blended / current;
}

/// Retarget every ball from the current per-team counts
pub fn apply<R: Rng + ?Sized>(balls: &mut [Ball], counts: &[usize], config: &SimConfig, rng: &mut R) {
    if balls.is_empty() {
        return;
    }
    let total: usize = counts.iter().sum();
    let mut teams: Vec<u16> = balls.iter().map(|b| b.team.0).collect();
    teams.sort_unstable();
    teams.dedup();
    let average = total as f32 / teams.len().max(1) as f32;

    for ball in balls.iter_mut() {
        let count = counts.get(ball.team.index()).copied().unwrap_or(0);
        let target = target_speed(config, count, average);
        blend_speed(ball, target, config, rng);
    }
}
