//! Spark particles for capture feedback
//!
//! Lives outside `SimulationState`: a host feeds it the capture events of
//! each step and renders whatever is alive. Nothing here affects territory.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::heading_to_velocity;
use crate::sim::{CaptureEvent, Team};

/// Sparks emitted per capture
pub const SPARKS_PER_CAPTURE: usize = 14;
/// Maximum live particles
pub const MAX_PARTICLES: usize = 2048;

/// A single spark
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Capturing team, for color lookup
    pub team: Team,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Spark {
    /// Advance physics. Returns false once expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.life -= dt;
        self.pos += self.vel * dt;
        let drag = (1.0 - 3.0 * dt).max(0.0);
        self.vel *= drag;
        self.life > 0.0
    }

    /// Opacity from remaining life, 0..=1
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Independently owned collection of live sparks
#[derive(Debug, Clone)]
pub struct SparkField {
    sparks: Vec<Spark>,
    rng: Pcg32,
    max_particles: usize,
}

impl SparkField {
    pub fn new(seed: u64) -> Self {
        Self::with_capacity(seed, MAX_PARTICLES)
    }

    pub fn with_capacity(seed: u64, max_particles: usize) -> Self {
        Self {
            sparks: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            max_particles,
        }
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    /// Burst of sparks at a capture's impact point
    pub fn emit(&mut self, event: &CaptureEvent) {
        let origin = Vec2::new(event.x, event.y);
        for _ in 0..SPARKS_PER_CAPTURE {
            if self.sparks.len() >= self.max_particles {
                return;
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(80.0..220.0);
            let life = self.rng.random_range(0.18..0.35);
            let size = if self.rng.random_bool(0.5) { 2.0 } else { 3.0 };
            self.sparks.push(Spark {
                pos: origin,
                vel: heading_to_velocity(angle, speed),
                team: event.team,
                life,
                max_life: life,
                size,
            });
        }
    }

    pub fn emit_all(&mut self, events: &[CaptureEvent]) {
        for event in events {
            self.emit(event);
        }
    }

    /// Advance every spark and prune the expired ones
    pub fn update(&mut self, dt: f32) {
        self.sparks.retain_mut(|spark| spark.tick(dt));
    }
}
