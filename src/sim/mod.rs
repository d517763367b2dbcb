//! Deterministic simulation module
//!
//! All territory logic lives here. This module must stay pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (balls by index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod speed;
pub mod state;
pub mod tick;

pub use collision::{AxisOutcome, advance_ball, capture_footprint, paint_capture, resolve_axis};
pub use grid::{Cell, Team, TerritoryGrid};
pub use state::{
    Axis, Ball, BallView, CaptureEvent, SimulationState, Snapshot, layout_anchors,
};
pub use tick::{FrameClock, initialize, initialize_with_rng, reset, snapshot, step};
