//! Simulation step and lifecycle
//!
//! A step recounts territory, runs the speed controller, then advances every
//! ball against the grid. Nothing outside sees a half-applied step.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::collision::advance_ball;
use super::speed;
use super::state::{BallView, CaptureEvent, SimulationState, Snapshot};
use crate::config::{ConfigError, SimConfig};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};

/// Validate `config` and build the initial state with its seeded RNG
pub fn initialize(config: SimConfig) -> Result<SimulationState, ConfigError> {
    let rng = SimulationState::seeded_rng(&config);
    initialize_with_rng(config, rng)
}

/// Validate `config` and build the initial state with a caller-supplied RNG
pub fn initialize_with_rng(config: SimConfig, rng: Pcg32) -> Result<SimulationState, ConfigError> {
    config.validate()?;
    let state = SimulationState::new(config, rng);
    log::info!(
        "Simulation ready: {} teams on {}x{} cells ({} px), speed control {}",
        state.config.team_count,
        state.grid.cols(),
        state.grid.rows(),
        state.config.cell_size,
        if state.config.speed_control { "on" } else { "off" },
    );
    Ok(state)
}

/// Advance the simulation by `dt` seconds
pub fn step(state: &mut SimulationState, dt: f32) {
    state.events.clear();

    if state.paused {
        return;
    }
    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Ignoring step with invalid dt {}", dt);
        return;
    }

    let counts = state.grid.counts();
    if state.config.speed_control {
        speed::apply(&mut state.balls, &counts, &state.config, &mut state.rng);
    }

    let arena = Vec2::new(state.config.arena_width, state.config.arena_height);
    let footprint = state.config.footprint;
    for ball in &mut state.balls {
        advance_ball(ball, &mut state.grid, arena, dt, footprint, &mut state.events);
    }

    state.time_ticks += 1;
    log::trace!(
        "tick {}: {} captures, counts {:?}",
        state.time_ticks,
        state.events.len(),
        counts
    );
}

/// Restore the initial tiling and send every ball back to its anchor
pub fn reset(state: &mut SimulationState) {
    state.grid.reset_tiling();
    let speed = state.config.base_speed;
    for ball in &mut state.balls {
        ball.reset(speed, &mut state.rng);
    }
    state.events.clear();
    state.time_ticks = 0;
    log::info!("Simulation reset");
}

/// Owned, read-only view for a frame sink
pub fn snapshot(state: &SimulationState) -> Snapshot {
    Snapshot {
        cols: state.grid.cols(),
        rows: state.grid.rows(),
        cells: state.grid.to_rows(),
        balls: state
            .balls
            .iter()
            .map(|b| BallView {
                x: b.pos.x,
                y: b.pos.y,
                team: b.team,
            })
            .collect(),
        counts: state.grid.counts(),
    }
}

/// Turns wall-clock frame times into simulation steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's elapsed time. Returns the number of steps taken.
    ///
    /// With a fixed timestep the elapsed time is accumulated and drained in
    /// whole steps (at most `MAX_SUBSTEPS`); otherwise one step of the
    /// measured time is taken. Elapsed time is capped at `MAX_FRAME_DT`.
    /// Capture events from every substep are appended to `events`.
    pub fn advance(
        &mut self,
        state: &mut SimulationState,
        elapsed: f32,
        events: &mut Vec<CaptureEvent>,
    ) -> u32 {
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        let Some(dt) = state.config.fixed_dt else {
            step(state, elapsed);
            events.extend_from_slice(state.capture_events());
            return 1;
        };

        self.accumulator += elapsed;
        let mut substeps = 0;
        while self.accumulator >= dt && substeps < MAX_SUBSTEPS {
            step(state, dt);
            events.extend_from_slice(state.capture_events());
            self.accumulator -= dt;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(dt);
        }
        substeps
    }
}
