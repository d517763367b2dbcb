//! Collision detection and paint response against the territory grid
//!
//! Movement is resolved one axis at a time (x, then y). Each axis reduces to
//! a 1D interval test: the arena edge, then the single cell under the ball's
//! leading rim. Foreign cells are captured and bounced off; own cells are
//! passed through.
//!
//! Per-axis resolution can let a very fast ball skip a thin diagonal strip
//! of cells. This is a known approximation at the tuned speed/cell ratio.

use glam::Vec2;

use super::grid::{Cell, Team, TerritoryGrid};
use super::state::{Axis, Ball, CaptureEvent};
use crate::config::Footprint;

/// What happened to a ball on one axis during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisOutcome {
    /// Velocity component was zero; nothing to resolve
    Idle,
    /// Position advanced to the candidate coordinate
    Moved,
    /// Candidate would leave the arena; velocity flipped, position held
    WallBounce,
    /// Rim entered a foreign cell; cells painted, velocity flipped, position held
    Capture(CaptureEvent),
}

/// Cells repainted for a capture at `cell` travelling along `axis` in
/// direction `dir_sign` (+1 or -1). Out-of-bounds cells are included; the
/// grid skips them on write.
pub fn capture_footprint(cell: Cell, axis: Axis, dir_sign: i32, footprint: Footprint) -> Vec<Cell> {
    let (cx, cy) = cell;
    match footprint {
        Footprint::Single => vec![cell],
        Footprint::Cross => match axis {
            Axis::X => vec![cell, (cx + dir_sign, cy), (cx, cy - 1), (cx, cy + 1)],
            Axis::Y => vec![cell, (cx, cy + dir_sign), (cx - 1, cy), (cx + 1, cy)],
        },
    }
}

/// Paint a capture footprint with `team`
pub fn paint_capture(
    grid: &mut TerritoryGrid,
    cell: Cell,
    team: Team,
    axis: Axis,
    dir_sign: i32,
    footprint: Footprint,
) {
    for (cx, cy) in capture_footprint(cell, axis, dir_sign, footprint) {
        grid.set_cell(cx, cy, team);
    }
}

/// Resolve one axis of a ball's movement against the arena and grid
pub fn resolve_axis(
    ball: &mut Ball,
    grid: &mut TerritoryGrid,
    arena: Vec2,
    dt: f32,
    axis: Axis,
    footprint: Footprint,
) -> AxisOutcome {
    let v = axis.of(ball.vel);
    if v == 0.0 {
        return AxisOutcome::Idle;
    }

    let r = ball.radius;
    let extent = axis.of(arena);
    let pos = axis.of(ball.pos);
    let new = pos + v * dt;

    if new - r < 0.0 || new + r > extent {
        axis.set(&mut ball.vel, -v);
        return AxisOutcome::WallBounce;
    }

    let dir_sign = if v > 0.0 { 1 } else { -1 };
    let rim = (new + r * dir_sign as f32).clamp(r, extent - r);

    // Rim on this axis at the ball's current coordinate on the other
    let mut lead = ball.pos;
    axis.set(&mut lead, rim);
    let cell = grid.cell_at_point(lead.x, lead.y);

    match grid.team_at(cell.0, cell.1) {
        Some(owner) if owner != ball.team => {
            paint_capture(grid, cell, ball.team, axis, dir_sign, footprint);
            axis.set(&mut ball.vel, -v);
            let center = grid.cell_center(cell.0, cell.1);
            AxisOutcome::Capture(CaptureEvent {
                x: center.x,
                y: center.y,
                cell,
                team: ball.team,
                axis,
            })
        }
        _ => {
            axis.set(&mut ball.pos, new);
            AxisOutcome::Moved
        }
    }
}

/// Advance a ball by `dt`, x axis first then y. Captures are appended to `events`.
pub fn advance_ball(
    ball: &mut Ball,
    grid: &mut TerritoryGrid,
    arena: Vec2,
    dt: f32,
    footprint: Footprint,
    events: &mut Vec<CaptureEvent>,
) {
    for axis in [Axis::X, Axis::Y] {
        if let AxisOutcome::Capture(event) = resolve_axis(ball, grid, arena, dt, axis, footprint) {
            log::trace!(
                "team {} captured cell {:?} on {:?}",
                event.team.0,
                event.cell,
                event.axis
            );
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: Vec2 = Vec2::new(40.0, 40.0);

    /// 4x4 grid of 10-unit cells in quadrants
    fn quad_grid() -> TerritoryGrid {
        TerritoryGrid::with_dimensions(4, 4, 10.0, 4, 2)
    }

    fn ball(team: u16, pos: Vec2, vel: Vec2) -> Ball {
        Ball {
            team: Team(team),
            pos,
            vel,
            radius: 2.0,
            anchor: pos,
        }
    }

    fn diff(before: &TerritoryGrid, after: &TerritoryGrid) -> Vec<(Cell, Team)> {
        let mut changed = Vec::new();
        for cy in 0..before.rows() as i32 {
            for cx in 0..before.cols() as i32 {
                if before.team_at(cx, cy) != after.team_at(cx, cy) {
                    changed.push(((cx, cy), after.team_at(cx, cy).unwrap()));
                }
            }
        }
        changed
    }

    #[test]
    fn test_cross_footprint_x_positive() {
        let cells = capture_footprint((5, 5), Axis::X, 1, Footprint::Cross);
        assert_eq!(cells, vec![(5, 5), (6, 5), (5, 4), (5, 6)]);
    }

    #[test]
    fn test_cross_footprint_y_negative() {
        let cells = capture_footprint((5, 5), Axis::Y, -1, Footprint::Cross);
        assert_eq!(cells, vec![(5, 5), (5, 4), (4, 5), (6, 5)]);
    }

    #[test]
    fn test_single_footprint() {
        assert_eq!(
            capture_footprint((1, 2), Axis::X, -1, Footprint::Single),
            vec![(1, 2)]
        );
    }

    #[test]
    fn test_paint_capture_repaints_exactly_footprint() {
        let mut grid = TerritoryGrid::with_dimensions(8, 8, 10.0, 4, 2);
        let before = grid.clone();
        paint_capture(&mut grid, (4, 2), Team(0), Axis::X, 1, Footprint::Cross);
        // (4,2) and (5,2) were team 1, (4,1) and (4,3) were team 1
        assert_eq!(
            diff(&before, &grid),
            vec![
                ((4, 1), Team(0)),
                ((4, 2), Team(0)),
                ((5, 2), Team(0)),
                ((4, 3), Team(0)),
            ]
        );
    }

    #[test]
    fn test_paint_capture_clips_at_grid_edge() {
        let mut grid = quad_grid();
        paint_capture(&mut grid, (3, 0), Team(0), Axis::X, 1, Footprint::Cross);
        // (4,0) and (3,-1) are outside and skipped
        assert_eq!(grid.team_at(3, 0), Some(Team(0)));
        assert_eq!(grid.team_at(3, 1), Some(Team(0)));
        assert_eq!(grid.counts().iter().sum::<usize>(), 16);
        assert_eq!(grid.counts(), vec![6, 2, 4, 4]);
    }

    #[test]
    fn test_own_team_pass_through() {
        let mut grid = quad_grid();
        let before = grid.clone();
        let mut b = ball(0, Vec2::new(5.0, 5.0), Vec2::new(50.0, 0.0));
        let outcome = resolve_axis(&mut b, &mut grid, ARENA, 0.1, Axis::X, Footprint::Cross);
        // Rim at 12 lands in (1,0), still team 0
        assert_eq!(outcome, AxisOutcome::Moved);
        assert!((b.pos.x - 10.0).abs() < 1e-5);
        assert_eq!(b.vel, Vec2::new(50.0, 0.0));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_foreign_cell_capture_bounces() {
        let mut grid = quad_grid();
        let mut b = ball(0, Vec2::new(15.0, 5.0), Vec2::new(50.0, 0.0));
        let outcome = resolve_axis(&mut b, &mut grid, ARENA, 0.1, Axis::X, Footprint::Cross);
        // Rim at 22 lands in (2,0), owned by team 1
        match outcome {
            AxisOutcome::Capture(event) => {
                assert_eq!(event.cell, (2, 0));
                assert_eq!(event.team, Team(0));
                assert_eq!(event.axis, Axis::X);
                assert_eq!((event.x, event.y), (25.0, 5.0));
            }
            other => panic!("expected capture, got {other:?}"),
        }
        assert_eq!(b.pos, Vec2::new(15.0, 5.0));
        assert_eq!(b.vel, Vec2::new(-50.0, 0.0));
        assert_eq!(grid.team_at(2, 0), Some(Team(0)));
        assert_eq!(grid.team_at(3, 0), Some(Team(0)));
        assert_eq!(grid.team_at(2, 1), Some(Team(0)));
        assert_eq!(grid.team_at(2, -1), None);
    }

    #[test]
    fn test_wall_bounce_holds_position() {
        let mut grid = quad_grid();
        let before = grid.clone();
        let mut b = ball(1, Vec2::new(37.0, 5.0), Vec2::new(50.0, 0.0));
        let outcome = resolve_axis(&mut b, &mut grid, ARENA, 0.1, Axis::X, Footprint::Cross);
        assert_eq!(outcome, AxisOutcome::WallBounce);
        assert_eq!(b.pos.x, 37.0);
        assert_eq!(b.vel.x, -50.0);
        assert_eq!(grid, before);

        let mut b = ball(0, Vec2::new(5.0, 3.0), Vec2::new(0.0, -20.0));
        let outcome = resolve_axis(&mut b, &mut grid, ARENA, 0.1, Axis::Y, Footprint::Cross);
        assert_eq!(outcome, AxisOutcome::WallBounce);
        assert_eq!(b.vel.y, 20.0);
    }

    #[test]
    fn test_zero_velocity_axis_is_idle() {
        let mut grid = quad_grid();
        // Sitting right against a foreign boundary must not trigger a capture
        let mut b = ball(0, Vec2::new(19.0, 5.0), Vec2::ZERO);
        let before = grid.clone();
        assert_eq!(
            resolve_axis(&mut b, &mut grid, ARENA, 0.1, Axis::X, Footprint::Cross),
            AxisOutcome::Idle
        );
        assert_eq!(
            resolve_axis(&mut b, &mut grid, ARENA, 0.1, Axis::Y, Footprint::Cross),
            AxisOutcome::Idle
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_advance_ball_at_most_one_capture_per_axis() {
        let mut grid = quad_grid();
        // Heading diagonally into team 3's quadrant from team 0's corner
        let mut b = ball(0, Vec2::new(17.0, 17.0), Vec2::new(20.0, 20.0));
        let mut events = Vec::new();
        advance_ball(&mut b, &mut grid, ARENA, 0.1, Footprint::Single, &mut events);
        // x rim 21 at y 17 -> (2,1) team 1; y rim 21 at x 17 -> (1,2) team 2
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].cell, (2, 1));
        assert_eq!(events[1].cell, (1, 2));
        assert_eq!(b.pos, Vec2::new(17.0, 17.0));
        assert_eq!(b.vel, Vec2::new(-20.0, -20.0));
        assert_eq!(grid.counts(), vec![6, 3, 3, 4]);
    }

    #[test]
    fn test_y_axis_uses_column_after_x_commit() {
        let mut grid = quad_grid();
        // Only the column the ball moves into is foreign on the row below
        grid.set_cell(1, 1, Team(1));
        let mut b = ball(0, Vec2::new(8.0, 7.0), Vec2::new(40.0, 40.0));
        let mut events = Vec::new();
        advance_ball(&mut b, &mut grid, ARENA, 0.1, Footprint::Single, &mut events);

        // x: rim 14 in own (1,0), commits to 12. y: rim 13 read at x = 12 -> (1,1).
        // Reading at the pre-step x = 8 would have hit own (0,1) and moved instead.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].cell, (1, 1));
        assert_eq!(events[0].axis, Axis::Y);
        assert_eq!(b.pos, Vec2::new(12.0, 7.0));
        assert_eq!(b.vel, Vec2::new(40.0, -40.0));
        assert_eq!(grid.team_at(1, 1), Some(Team(0)));
        assert_eq!(grid.team_at(0, 1), Some(Team(0)));
    }

    #[test]
    fn test_rim_clamped_inside_arena() {
        let mut grid = quad_grid();
        // new = 37.5, rim = 39.5 clamps to 38 -> cell 3, still in bounds
        let mut b = ball(1, Vec2::new(37.0, 5.0), Vec2::new(5.0, 0.0));
        let outcome = resolve_axis(&mut b, &mut grid, ARENA, 0.1, Axis::X, Footprint::Cross);
        assert_eq!(outcome, AxisOutcome::Moved);
        assert!((b.pos.x - 37.5).abs() < 1e-5);
    }
}
