//! Paint Pong - territory painting balls on a team-owned cell grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, collisions, speed control, stepping)
//! - `config`: Validated simulation configuration and presets
//! - `effects`: Spark particles fed by capture events (outside the core state)

pub mod config;
pub mod effects;
pub mod sim;

pub use config::{ConfigError, Footprint, Preset, SimConfig};
pub use effects::SparkField;
pub use sim::{SimulationState, Snapshot, Team, initialize, reset, snapshot, step};

use glam::Vec2;
use rand::Rng;

/// Simulation configuration constants
pub mod consts {
    /// Default frame rate the host drives the simulation at
    pub const FPS: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock gap a single frame may feed into the simulation
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (play field only, HUD excluded)
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 720.0;
    /// Cell edge length
    pub const CELL_SIZE: f32 = 12.0;
    /// Largest grid a configuration may ask for
    pub const MAX_GRID_CELLS: u64 = 1 << 24;

    /// Team count (must be a perfect square for the mosaic)
    pub const TEAM_COUNT: u16 = 16;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BASE_SPEED: f32 = 600.0;
    /// Speed controller clamp
    pub const SPEED_MIN: f32 = 275.0;
    pub const SPEED_MAX: f32 = 1050.0;
    /// Exponential smoothing factor toward the target speed
    pub const SPEED_SMOOTHING: f32 = 0.25;
    /// Added to a team's cell count before dividing (keeps c == 0 finite)
    pub const COUNT_EPSILON: f32 = 1.0;
    /// Speeds at or below this are treated as stalled
    pub const STALL_SPEED: f32 = 1e-6;
}

/// Velocity of the given magnitude pointing along `angle` (radians)
#[inline]
pub fn heading_to_velocity(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Velocity with a uniformly random heading
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R, speed: f32) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    heading_to_velocity(angle, speed)
}

/// Integer square root when `n` is a perfect square
pub fn exact_sqrt(n: u32) -> Option<u32> {
    let root = (n as f64).sqrt().round() as u32;
    (root * root == n).then_some(root)
}
