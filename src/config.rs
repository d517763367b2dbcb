//! Simulation configuration and presets
//!
//! A `SimConfig` is immutable once handed to `sim::initialize`; every
//! component reads its constants from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::exact_sqrt;

/// Reasons a configuration is rejected before the simulation starts
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("team count must be at least 1")]
    NoTeams,
    #[error("team count {0} is not a perfect square; the mosaic needs K*K teams")]
    TeamCountNotSquare(u16),
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} {extent} is not a whole multiple of cell size {cell_size}")]
    UnevenArena {
        name: &'static str,
        extent: f32,
        cell_size: f32,
    },
    #[error("grid of {cols}x{rows} cells cannot hold a {tiles}x{tiles} mosaic")]
    GridTooSmall { cols: u32, rows: u32, tiles: u32 },
    #[error("grid of {cols}x{rows} cells exceeds the {max} cell limit")]
    GridTooLarge { cols: u32, rows: u32, max: u64 },
    #[error("ball radius {radius} does not fit inside a {width}x{height} mosaic block")]
    BallTooLarge { radius: f32, width: f32, height: f32 },
    #[error("speed_min {min} exceeds speed_max {max}")]
    SpeedRange { min: f32, max: f32 },
    #[error("base speed {base} lies outside [{min}, {max}]")]
    BaseSpeedOutOfRange { base: f32, min: f32, max: f32 },
    #[error("speed smoothing {0} must lie in (0, 1]")]
    Smoothing(f32),
    #[error("invalid config json: {0}")]
    Json(String),
    #[error("cannot read config {path}: {message}")]
    Read { path: String, message: String },
}

/// Cells painted on a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Footprint {
    /// Impact cell, one cell ahead, and both perpendicular neighbours
    #[default]
    Cross,
    /// Impact cell only
    Single,
}

/// Named starting configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Preset {
    /// Sixteen teams in a 4x4 mosaic with the speed controller
    #[default]
    Hex16,
    /// Four quadrant teams at a fixed speed painting single cells
    Quad,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Hex16 => "Hex16",
            Preset::Quad => "Quad",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hex16" | "hex" | "16" => Some(Preset::Hex16),
            "quad" | "4" => Some(Preset::Quad),
            _ => None,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub team_count: u16,
    pub arena_width: f32,
    pub arena_height: f32,
    pub cell_size: f32,
    pub ball_radius: f32,
    pub base_speed: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub speed_smoothing: f32,
    /// Retarget speeds from territory share each step
    pub speed_control: bool,
    pub footprint: Footprint,
    /// Frame rate used when no fixed timestep is set
    pub fps: u32,
    /// Fixed simulation timestep; `None` steps once per frame with measured time
    pub fixed_dt: Option<f32>,
    /// Seed for headings and stall recovery
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl SimConfig {
    /// Create a configuration from a preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Hex16 => Self {
                team_count: TEAM_COUNT,
                arena_width: ARENA_WIDTH,
                arena_height: ARENA_HEIGHT,
                cell_size: CELL_SIZE,
                ball_radius: BALL_RADIUS,
                base_speed: BASE_SPEED,
                speed_min: SPEED_MIN,
                speed_max: SPEED_MAX,
                speed_smoothing: SPEED_SMOOTHING,
                speed_control: true,
                footprint: Footprint::Cross,
                fps: FPS,
                fixed_dt: None,
                seed: 0,
            },
            Preset::Quad => Self {
                team_count: 4,
                arena_width: 720.0,
                arena_height: 720.0,
                cell_size: 16.0,
                ball_radius: BALL_RADIUS,
                base_speed: 800.0,
                speed_min: 800.0,
                speed_max: 800.0,
                speed_smoothing: SPEED_SMOOTHING,
                speed_control: false,
                footprint: Footprint::Single,
                fps: FPS,
                fixed_dt: None,
                seed: 0,
            },
        }
    }

    /// Parse a configuration from JSON; missing fields take the defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Side length of the team mosaic (K where K*K == team_count)
    pub fn tiles_per_side(&self) -> u32 {
        exact_sqrt(self.team_count as u32).unwrap_or(0)
    }

    /// Cells across; rounded to match the tolerance `validate` accepts
    pub fn cols(&self) -> u32 {
        (self.arena_width / self.cell_size).round() as u32
    }

    pub fn rows(&self) -> u32 {
        (self.arena_height / self.cell_size).round() as u32
    }

    /// Reject configurations the simulation cannot start from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.team_count == 0 {
            return Err(ConfigError::NoTeams);
        }
        let tiles =
            exact_sqrt(self.team_count as u32).ok_or(ConfigError::TeamCountNotSquare(self.team_count))?;

        positive("cell_size", self.cell_size)?;
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("ball_radius", self.ball_radius)?;
        positive("base_speed", self.base_speed)?;
        positive("speed_min", self.speed_min)?;
        positive("speed_max", self.speed_max)?;
        positive("fps", self.fps as f32)?;
        if let Some(dt) = self.fixed_dt {
            positive("fixed_dt", dt)?;
        }

        whole_multiple("arena_width", self.arena_width, self.cell_size)?;
        whole_multiple("arena_height", self.arena_height, self.cell_size)?;

        let (cols, rows) = (self.cols(), self.rows());
        if cols < tiles || rows < tiles {
            return Err(ConfigError::GridTooSmall { cols, rows, tiles });
        }
        if cols as u64 * rows as u64 > MAX_GRID_CELLS {
            return Err(ConfigError::GridTooLarge {
                cols,
                rows,
                max: MAX_GRID_CELLS,
            });
        }

        // Every anchor sits at a block center; the ball must fit around it.
        let block_w = self.arena_width / tiles as f32;
        let block_h = self.arena_height / tiles as f32;
        if self.ball_radius * 2.0 >= block_w || self.ball_radius * 2.0 >= block_h {
            return Err(ConfigError::BallTooLarge {
                radius: self.ball_radius,
                width: block_w,
                height: block_h,
            });
        }

        if self.speed_min > self.speed_max {
            return Err(ConfigError::SpeedRange {
                min: self.speed_min,
                max: self.speed_max,
            });
        }
        if self.speed_control {
            if !(self.speed_min..=self.speed_max).contains(&self.base_speed) {
                return Err(ConfigError::BaseSpeedOutOfRange {
                    base: self.base_speed,
                    min: self.speed_min,
                    max: self.speed_max,
                });
            }
            if !(self.speed_smoothing > 0.0 && self.speed_smoothing <= 1.0) {
                return Err(ConfigError::Smoothing(self.speed_smoothing));
            }
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn whole_multiple(name: &'static str, extent: f32, cell_size: f32) -> Result<(), ConfigError> {
    let cells = extent / cell_size;
    if (cells - cells.round()).abs() > 1e-4 {
        return Err(ConfigError::UnevenArena {
            name,
            extent,
            cell_size,
        });
    }
    Ok(())
}
