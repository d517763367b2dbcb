//! Territory grid
//!
//! Authoritative cell-to-team mapping. Every cell holds exactly one team at
//! all times; there is no "unowned" state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// A team identifier in `0..team_count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Team(pub u16);

impl Team {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Cell coordinate; signed so probes just outside the grid are representable
pub type Cell = (i32, i32);

/// Fixed-size ROWS x COLS grid of team ids (row-major)
#[derive(Debug, Clone, PartialEq)]
pub struct TerritoryGrid {
    cols: u32,
    rows: u32,
    cell_size: f32,
    team_count: u16,
    tiles_per_side: u32,
    cells: Vec<Team>,
}

impl TerritoryGrid {
    /// Create a grid for a validated configuration, tiled with the initial mosaic
    pub fn new(config: &SimConfig) -> Self {
        Self::with_dimensions(
            config.cols(),
            config.rows(),
            config.cell_size,
            config.team_count,
            config.tiles_per_side(),
        )
    }

    pub fn with_dimensions(
        cols: u32,
        rows: u32,
        cell_size: f32,
        team_count: u16,
        tiles_per_side: u32,
    ) -> Self {
        let mut grid = Self {
            cols,
            rows,
            cell_size,
            team_count,
            tiles_per_side: tiles_per_side.max(1),
            cells: vec![Team(0); cols as usize * rows as usize],
        };
        grid.reset_tiling();
        grid
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn team_count(&self) -> u16 {
        self.team_count
    }

    #[inline]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn index(&self, cx: i32, cy: i32) -> Option<usize> {
        if cx < 0 || cy < 0 || cx >= self.cols as i32 || cy >= self.rows as i32 {
            return None;
        }
        Some(cy as usize * self.cols as usize + cx as usize)
    }

    /// Owner of a cell, or `None` when the coordinate lies outside the grid
    #[inline]
    pub fn team_at(&self, cx: i32, cy: i32) -> Option<Team> {
        self.index(cx, cy).map(|i| self.cells[i])
    }

    /// Overwrite a cell's owner; out-of-bounds writes are ignored
    #[inline]
    pub fn set_cell(&mut self, cx: i32, cy: i32, team: Team) {
        if let Some(i) = self.index(cx, cy) {
            self.cells[i] = team;
        }
    }

    /// Cell containing an arena point
    #[inline]
    pub fn cell_at_point(&self, x: f32, y: f32) -> Cell {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// Arena coordinates of a cell's center
    #[inline]
    pub fn cell_center(&self, cx: i32, cy: i32) -> Vec2 {
        Vec2::new(
            (cx as f32 + 0.5) * self.cell_size,
            (cy as f32 + 0.5) * self.cell_size,
        )
    }

    /// One row of cells, left to right
    pub fn row(&self, cy: u32) -> &[Team] {
        let start = cy as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }

    /// Cell count per team, indexed by team id. Always sums to `total_cells`.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.team_count as usize];
        for team in &self.cells {
            counts[team.index()] += 1;
        }
        counts
    }

    /// Restore the K x K block mosaic (teams assigned row-major).
    ///
    /// The last row and column of blocks absorb any remainder cells.
    pub fn reset_tiling(&mut self) {
        let k = self.tiles_per_side;
        let tile_w = self.cols / k;
        let tile_h = self.rows / k;
        let mut team = 0u16;
        for ty in 0..k {
            let y_end = if ty < k - 1 { (ty + 1) * tile_h } else { self.rows };
            for tx in 0..k {
                let x_end = if tx < k - 1 { (tx + 1) * tile_w } else { self.cols };
                let owner = Team(team.min(self.team_count.saturating_sub(1)));
                for y in ty * tile_h..y_end {
                    let start = y as usize * self.cols as usize;
                    self.cells[start + (tx * tile_w) as usize..start + x_end as usize].fill(owner);
                }
                team += 1;
            }
        }
    }

    /// Copy of the grid as rows of team ids
    pub fn to_rows(&self) -> Vec<Vec<Team>> {
        self.cells
            .chunks(self.cols as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}
