//! Occupancy belief grid.
//!
//! Stores one belief value per cell in [0.0, 1.0]:
//! - 0.0 = confidently free
//! - 1.0 = confidently occupied
//! - intermediate = uncertain
//!
//! The ground-truth obstacle set is held beside the belief array and is
//! immutable after seeding. Only the sensor model and goal validation may
//! consult it; the planner sees belief alone.

use crate::error::{DishaError, Result};
use crate::point::GridCoord;
use std::collections::HashSet;

/// Row-major occupancy belief grid with a separate ground-truth obstacle set.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    /// Per-cell belief, row-major, always clamped to [0, 1]
    beliefs: Vec<f32>,
    /// Ground-truth occupied cells (sensor's only source of truth)
    obstacles: HashSet<GridCoord>,
    /// Grid width in cells
    width: usize,
    /// Grid height in cells
    height: usize,
}

impl OccupancyGrid {
    /// Create a new grid with every cell at `default_belief` (clamped to [0, 1]).
    pub fn new(width: usize, height: usize, default_belief: f32) -> Self {
        Self {
            beliefs: vec![default_belief.clamp(0.0, 1.0); width * height],
            obstacles: HashSet::new(),
            width,
            height,
        }
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Check if grid coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Convert grid coordinates to flat array index
    #[inline]
    pub fn coord_to_index(&self, coord: GridCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    /// Convert flat array index to grid coordinates
    #[inline]
    pub fn index_to_coord(&self, index: usize) -> GridCoord {
        GridCoord::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Seed the ground-truth obstacle set.
    ///
    /// Every cell is bounds-checked before any is inserted, so a failed call
    /// leaves the set untouched.
    pub fn set_obstacle_cells<I>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = GridCoord>,
    {
        let cells: Vec<GridCoord> = cells.into_iter().collect();
        for &cell in &cells {
            if !self.in_bounds(cell) {
                return Err(DishaError::OutOfBounds {
                    x: cell.x,
                    y: cell.y,
                });
            }
        }
        self.obstacles.extend(cells);
        Ok(())
    }

    /// Check whether a cell is a ground-truth obstacle.
    ///
    /// For the sensor model and goal validation only - the planner must
    /// never consult this.
    #[inline]
    pub fn is_obstacle(&self, coord: GridCoord) -> bool {
        self.obstacles.contains(&coord)
    }

    /// The ground-truth obstacle set
    #[inline]
    pub fn obstacles(&self) -> &HashSet<GridCoord> {
        &self.obstacles
    }

    /// Query the belief value at a cell
    #[inline]
    pub fn belief(&self, coord: GridCoord) -> Result<f32> {
        self.coord_to_index(coord)
            .map(|i| self.beliefs[i])
            .ok_or(DishaError::OutOfBounds {
                x: coord.x,
                y: coord.y,
            })
    }

    /// Set the belief at a cell to fully occupied (1.0)
    pub fn mark_occupied(&mut self, coord: GridCoord) -> Result<()> {
        match self.coord_to_index(coord) {
            Some(i) => {
                self.beliefs[i] = 1.0;
                Ok(())
            }
            None => Err(DishaError::OutOfBounds {
                x: coord.x,
                y: coord.y,
            }),
        }
    }

    /// Decay the belief at a cell by `amount`, clamped at 0.0
    pub fn decay(&mut self, coord: GridCoord, amount: f32) -> Result<()> {
        match self.coord_to_index(coord) {
            Some(i) => {
                self.beliefs[i] = (self.beliefs[i] - amount).max(0.0);
                Ok(())
            }
            None => Err(DishaError::OutOfBounds {
                x: coord.x,
                y: coord.y,
            }),
        }
    }

    /// Check if a cell can be stepped on: in bounds and believed free.
    ///
    /// Shared traversability predicate for the planner and the greedy
    /// fallback.
    #[inline]
    pub fn is_traversable(&self, coord: GridCoord, threshold: f32) -> bool {
        match self.coord_to_index(coord) {
            Some(i) => self.beliefs[i] < threshold,
            None => false,
        }
    }

    /// Raw access to the belief array (for snapshots and rendering)
    #[inline]
    pub fn beliefs(&self) -> &[f32] {
        &self.beliefs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_clamps_default() {
        let grid = OccupancyGrid::new(4, 3, 1.5);
        assert_eq!(grid.cell_count(), 12);
        assert_eq!(grid.belief(GridCoord::new(0, 0)).unwrap(), 1.0);

        let grid = OccupancyGrid::new(4, 3, -0.3);
        assert_eq!(grid.belief(GridCoord::new(3, 2)).unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut grid = OccupancyGrid::new(5, 5, 0.0);
        assert!(grid.belief(GridCoord::new(5, 0)).is_err());
        assert!(grid.belief(GridCoord::new(0, -1)).is_err());
        assert!(grid.mark_occupied(GridCoord::new(-1, 2)).is_err());
        assert!(grid.decay(GridCoord::new(2, 5), 0.1).is_err());
    }

    #[test]
    fn test_mark_and_decay() {
        let mut grid = OccupancyGrid::new(5, 5, 0.0);
        let c = GridCoord::new(2, 2);

        grid.mark_occupied(c).unwrap();
        assert_eq!(grid.belief(c).unwrap(), 1.0);

        grid.decay(c, 0.4).unwrap();
        assert!((grid.belief(c).unwrap() - 0.6).abs() < 1e-6);

        // Decay never goes below zero
        grid.decay(c, 10.0).unwrap();
        assert_eq!(grid.belief(c).unwrap(), 0.0);
        grid.decay(c, 0.05).unwrap();
        assert_eq!(grid.belief(c).unwrap(), 0.0);
    }

    #[test]
    fn test_traversability_threshold() {
        let mut grid = OccupancyGrid::new(5, 5, 0.0);
        let c = GridCoord::new(1, 1);
        assert!(grid.is_traversable(c, 0.5));

        grid.mark_occupied(c).unwrap();
        assert!(!grid.is_traversable(c, 0.5));

        grid.decay(c, 0.6).unwrap();
        assert!(grid.is_traversable(c, 0.5));

        // Out of bounds is never traversable
        assert!(!grid.is_traversable(GridCoord::new(9, 9), 0.5));
    }

    #[test]
    fn test_obstacle_seeding() {
        let mut grid = OccupancyGrid::new(10, 10, 0.0);
        grid.set_obstacle_cells([GridCoord::new(3, 3), GridCoord::new(3, 4)])
            .unwrap();
        assert!(grid.is_obstacle(GridCoord::new(3, 3)));
        assert!(!grid.is_obstacle(GridCoord::new(4, 3)));

        // Ground truth is disjoint from belief
        assert_eq!(grid.belief(GridCoord::new(3, 3)).unwrap(), 0.0);
    }

    #[test]
    fn test_obstacle_seeding_rejects_out_of_bounds() {
        let mut grid = OccupancyGrid::new(10, 10, 0.0);
        let result = grid.set_obstacle_cells([GridCoord::new(3, 3), GridCoord::new(10, 0)]);
        assert!(result.is_err());
        // Failed call leaves the set untouched
        assert!(!grid.is_obstacle(GridCoord::new(3, 3)));
    }

    #[test]
    fn test_index_round_trip() {
        let grid = OccupancyGrid::new(7, 4, 0.0);
        for y in 0..4 {
            for x in 0..7 {
                let c = GridCoord::new(x, y);
                let i = grid.coord_to_index(c).unwrap();
                assert_eq!(grid.index_to_coord(i), c);
            }
        }
    }
}
