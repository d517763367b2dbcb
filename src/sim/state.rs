//! Simulation state and core types
//!
//! Everything a step reads or writes lives in `SimulationState`. Visual
//! effects are kept outside so the state stays cheap to snapshot.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Team, TerritoryGrid};
use crate::config::SimConfig;
use crate::random_velocity;

/// Axis of travel being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component of `v` along this axis
    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    #[inline]
    pub fn set(self, v: &mut Vec2, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
        }
    }
}

/// A ball's leading edge entered a cell owned by another team
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureEvent {
    /// Center of the impact cell
    pub x: f32,
    pub y: f32,
    pub cell: Cell,
    pub team: Team,
    pub axis: Axis,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub team: Team,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Start point restored on reset
    pub anchor: Vec2,
}

impl Ball {
    /// Spawn at `anchor` with a random heading at `speed`
    pub fn new<R: Rng + ?Sized>(
        team: Team,
        anchor: Vec2,
        radius: f32,
        speed: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            team,
            pos: anchor,
            vel: random_velocity(rng, speed),
            radius,
            anchor,
        }
    }

    /// Move back to the anchor with a fresh random heading; team is kept
    pub fn reset<R: Rng + ?Sized>(&mut self, speed: f32, rng: &mut R) {
        self.pos = self.anchor;
        self.vel = random_velocity(rng, speed);
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Anchor points at the centers of a `tiles x tiles` layout, row-major, first `n`
pub fn layout_anchors(n: usize, tiles: u32, width: f32, height: f32) -> Vec<Vec2> {
    let tiles = tiles.max(1);
    let step_x = width / tiles as f32;
    let step_y = height / tiles as f32;
    (0..tiles)
        .flat_map(|j| {
            (0..tiles).map(move |i| {
                Vec2::new((i as f32 + 0.5) * step_x, (j as f32 + 0.5) * step_y)
            })
        })
        .take(n)
        .collect()
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub config: SimConfig,
    pub grid: TerritoryGrid,
    /// Balls, processed in index order
    pub balls: Vec<Ball>,
    /// Random source for headings and stall recovery
    pub rng: Pcg32,
    /// When set, `step` leaves everything untouched
    pub paused: bool,
    /// Steps taken since initialize/reset
    pub time_ticks: u64,
    /// Captures produced by the most recent step
    pub(crate) events: Vec<CaptureEvent>,
}

impl SimulationState {
    /// Build the initial state from an already-validated configuration
    pub(crate) fn new(config: SimConfig, mut rng: Pcg32) -> Self {
        let grid = TerritoryGrid::new(&config);
        let anchors = layout_anchors(
            config.team_count as usize,
            config.tiles_per_side(),
            config.arena_width,
            config.arena_height,
        );
        let balls = anchors
            .into_iter()
            .enumerate()
            .map(|(i, anchor)| {
                Ball::new(
                    Team(i as u16),
                    anchor,
                    config.ball_radius,
                    config.base_speed,
                    &mut rng,
                )
            })
            .collect();

        Self {
            config,
            grid,
            balls,
            rng,
            paused: false,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Seeded random source for a configuration
    pub fn seeded_rng(config: &SimConfig) -> Pcg32 {
        Pcg32::seed_from_u64(config.seed)
    }

    /// Captures from the current step (empty when none happened)
    pub fn capture_events(&self) -> &[CaptureEvent] {
        &self.events
    }

    /// Recount territory from the grid
    pub fn counts(&self) -> Vec<usize> {
        self.grid.counts()
    }
}

/// Ball position and team as seen by a frame sink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub team: Team,
}

/// Read-only copy of everything a frame sink needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cols: u32,
    pub rows: u32,
    /// `cells[row][col]`
    pub cells: Vec<Vec<Team>>,
    pub balls: Vec<BallView>,
    /// Cell count per team id
    pub counts: Vec<usize>,
}

impl Snapshot {
    pub fn total_cells(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Fraction of the grid owned by `team`
    pub fn share(&self, team: Team) -> f32 {
        let total = self.total_cells();
        if total == 0 {
            return 0.0;
        }
        self.counts.get(team.index()).copied().unwrap_or(0) as f32 / total as f32
    }
}
