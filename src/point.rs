//! Integer cell coordinates for the occupancy grid.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Grid coordinates (integer cell indices)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// X coordinate (column index)
    pub x: i32,
    /// Y coordinate (row index)
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate - path length on 4-connected grids
    #[inline]
    pub fn manhattan_distance(&self, other: &GridCoord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance (max of x and y distance) - used for 8-connected grids
    #[inline]
    pub fn chebyshev_distance(&self, other: &GridCoord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Euclidean distance to another coordinate
    #[inline]
    pub fn euclidean_distance(&self, other: &GridCoord) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Get the 4 cardinal neighbors (N, E, S, W)
    #[inline]
    pub fn neighbors_4(&self) -> [GridCoord; 4] {
        [
            GridCoord::new(self.x, self.y + 1), // North
            GridCoord::new(self.x + 1, self.y), // East
            GridCoord::new(self.x, self.y - 1), // South
            GridCoord::new(self.x - 1, self.y), // West
        ]
    }

    /// Get the 8 neighbors (including diagonals)
    #[inline]
    pub fn neighbors_8(&self) -> [GridCoord; 8] {
        [
            GridCoord::new(self.x, self.y + 1),     // N
            GridCoord::new(self.x + 1, self.y + 1), // NE
            GridCoord::new(self.x + 1, self.y),     // E
            GridCoord::new(self.x + 1, self.y - 1), // SE
            GridCoord::new(self.x, self.y - 1),     // S
            GridCoord::new(self.x - 1, self.y - 1), // SW
            GridCoord::new(self.x - 1, self.y),     // W
            GridCoord::new(self.x - 1, self.y + 1), // NW
        ]
    }
}

impl Add for GridCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        GridCoord::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for GridCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        GridCoord::new(self.x - other.x, self.y - other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_4() {
        let c = GridCoord::new(5, 5);
        let n4 = c.neighbors_4();
        assert_eq!(n4[0], GridCoord::new(5, 6)); // N
        assert_eq!(n4[1], GridCoord::new(6, 5)); // E
        assert_eq!(n4[2], GridCoord::new(5, 4)); // S
        assert_eq!(n4[3], GridCoord::new(4, 5)); // W
    }

    #[test]
    fn test_neighbors_8_count_unique() {
        let c = GridCoord::new(0, 0);
        let n8 = c.neighbors_8();
        for (i, a) in n8.iter().enumerate() {
            assert_eq!(a.chebyshev_distance(&c), 1);
            for b in &n8[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_distances() {
        let a = GridCoord::new(0, 0);
        let b = GridCoord::new(3, 4);
        assert_eq!(a.manhattan_distance(&b), 7);
        assert_eq!(a.chebyshev_distance(&b), 4);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-6);
    }
}
