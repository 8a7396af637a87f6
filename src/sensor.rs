//! Simulated 360° range sensor.
//!
//! Sweeps `num_rays` equally spaced angles around the robot and marches each
//! ray outward one cell at a time. Ground-truth obstacles are written into
//! the belief grid as fully occupied and occlude the rest of their ray;
//! free cells along a ray have their belief decayed toward zero.
//!
//! The scan is fully deterministic given (pose, obstacle set, config):
//! no noise model, no history dependence. Cost is O(num_rays × max_range).

use crate::error::Result;
use crate::grid::OccupancyGrid;
use crate::point::GridCoord;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Range sensor configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Number of equally spaced ray angles per scan (default: 36, i.e. 10° spacing)
    #[serde(default = "default_num_rays")]
    pub num_rays: usize,

    /// Maximum ray range in cells (default: 10)
    #[serde(default = "default_max_range")]
    pub max_range: usize,

    /// Belief decay per traversed free cell (default: 0.05)
    #[serde(default = "default_decay")]
    pub decay: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            num_rays: default_num_rays(),
            max_range: default_max_range(),
            decay: default_decay(),
        }
    }
}

fn default_num_rays() -> usize {
    36
}
fn default_max_range() -> usize {
    10
}
fn default_decay() -> f32 {
    0.05
}

/// Cell update counters for one scan
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Free cells whose belief was decayed
    pub cells_decayed: usize,
    /// Obstacle cells marked fully occupied
    pub cells_marked: usize,
    /// Rays terminated early by an occluding obstacle
    pub rays_occluded: usize,
}

/// Run one scan from `pose`, writing belief updates into `grid`.
///
/// For each ray, unit radial steps r = 1..max_range are mapped to the
/// nearest grid cell. Obstacle hits mark the cell occupied and terminate
/// the ray, so cells behind the hit are not updated this scan. Off-grid
/// samples are skipped without terminating the ray.
pub fn scan(grid: &mut OccupancyGrid, pose: GridCoord, config: &SensorConfig) -> Result<ScanStats> {
    let mut stats = ScanStats::default();

    for ray in 0..config.num_rays {
        let angle = TAU * ray as f32 / config.num_rays as f32;
        let (sin, cos) = angle.sin_cos();

        for r in 1..config.max_range {
            let cell = GridCoord::new(
                (pose.x as f32 + r as f32 * cos).round() as i32,
                (pose.y as f32 + r as f32 * sin).round() as i32,
            );
            if !grid.in_bounds(cell) {
                continue;
            }

            if grid.is_obstacle(cell) {
                grid.mark_occupied(cell)?;
                stats.cells_marked += 1;
                stats.rays_occluded += 1;
                break;
            }

            grid.decay(cell, config.decay)?;
            stats.cells_decayed += 1;
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scan_once(grid: &mut OccupancyGrid, pose: GridCoord) -> ScanStats {
        scan(grid, pose, &SensorConfig::default()).unwrap()
    }

    #[test]
    fn test_scan_is_deterministic() {
        let mut a = OccupancyGrid::new(30, 30, 0.8);
        let mut b = OccupancyGrid::new(30, 30, 0.8);
        let wall: Vec<GridCoord> = (10..20).map(|y| GridCoord::new(18, y)).collect();
        a.set_obstacle_cells(wall.clone()).unwrap();
        b.set_obstacle_cells(wall).unwrap();

        let pose = GridCoord::new(15, 15);
        let stats_a = scan_once(&mut a, pose);
        let stats_b = scan_once(&mut b, pose);

        assert_eq!(stats_a, stats_b);
        assert_eq!(a.beliefs(), b.beliefs());
    }

    #[test]
    fn test_free_cells_decay_monotonically() {
        let mut grid = OccupancyGrid::new(30, 30, 1.0);
        let pose = GridCoord::new(15, 15);
        let probe = GridCoord::new(18, 15); // on the angle-0 ray, r=3

        let mut last = grid.belief(probe).unwrap();
        for _ in 0..25 {
            scan_once(&mut grid, pose);
            let now = grid.belief(probe).unwrap();
            assert!(now <= last);
            assert!(now >= 0.0);
            last = now;
        }
        // 25 scans at 0.05 decay drains a 1.0 belief completely
        assert_relative_eq!(last, 0.0);
    }

    #[test]
    fn test_obstacle_marked_occupied() {
        let mut grid = OccupancyGrid::new(30, 30, 0.0);
        grid.set_obstacle_cells([GridCoord::new(19, 15)]).unwrap();

        let stats = scan_once(&mut grid, GridCoord::new(15, 15));

        assert_eq!(grid.belief(GridCoord::new(19, 15)).unwrap(), 1.0);
        assert!(stats.cells_marked >= 1);
        assert!(stats.rays_occluded >= 1);
    }

    #[test]
    fn test_occlusion_blocks_cells_behind_obstacle() {
        let mut grid = OccupancyGrid::new(30, 30, 0.0);
        let pose = GridCoord::new(10, 15);
        let occluder = GridCoord::new(14, 15);
        let behind = GridCoord::new(16, 15);
        grid.set_obstacle_cells([occluder]).unwrap();

        // Give the shadowed cell a belief that any update would change
        grid.mark_occupied(behind).unwrap();
        scan_once(&mut grid, pose);

        assert_eq!(grid.belief(occluder).unwrap(), 1.0);
        assert_eq!(grid.belief(behind).unwrap(), 1.0);
    }

    #[test]
    fn test_cells_outside_range_untouched() {
        let mut grid = OccupancyGrid::new(60, 60, 1.0);
        let pose = GridCoord::new(30, 30);
        scan_once(&mut grid, pose);

        // max_range is 10 and rays stop at r = 9
        let far = GridCoord::new(45, 30);
        assert_eq!(grid.belief(far).unwrap(), 1.0);
    }

    #[test]
    fn test_scan_near_border_skips_off_grid_samples() {
        let mut grid = OccupancyGrid::new(12, 12, 0.5);
        let stats = scan(&mut grid, GridCoord::new(1, 1), &SensorConfig::default()).unwrap();

        // Plenty of rays leave the grid; the ones that stay decay cells
        assert!(stats.cells_decayed > 0);
        for &b in grid.beliefs() {
            assert!((0.0..=1.0).contains(&b));
        }
    }
}
