//! A* pathfinding over the occupancy belief grid.
//!
//! The planner is stateless: every call performs a full search against the
//! belief snapshot it is handed, so it is safe to call each tick with
//! refreshed belief. A cell is traversable iff its belief is below the
//! occupancy threshold; ground truth is never consulted.

use crate::grid::OccupancyGrid;
use crate::point::GridCoord;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::f32::consts::SQRT_2;

/// Neighbor offset set defining legal single-step moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Cardinal moves only, edge cost 1.0
    #[default]
    FourWay,
    /// Cardinals plus diagonals, diagonal edge cost √2
    EightWay,
}

const FOUR_WAY_OFFSETS: [(GridCoord, f32); 4] = [
    (GridCoord::new(0, 1), 1.0),  // N
    (GridCoord::new(1, 0), 1.0),  // E
    (GridCoord::new(0, -1), 1.0), // S
    (GridCoord::new(-1, 0), 1.0), // W
];

const EIGHT_WAY_OFFSETS: [(GridCoord, f32); 8] = [
    (GridCoord::new(0, 1), 1.0),      // N
    (GridCoord::new(1, 1), SQRT_2),   // NE
    (GridCoord::new(1, 0), 1.0),      // E
    (GridCoord::new(1, -1), SQRT_2),  // SE
    (GridCoord::new(0, -1), 1.0),     // S
    (GridCoord::new(-1, -1), SQRT_2), // SW
    (GridCoord::new(-1, 0), 1.0),     // W
    (GridCoord::new(-1, 1), SQRT_2),  // NW
];

impl Connectivity {
    /// Step offsets with their edge costs, in fixed enumeration order.
    ///
    /// The order is part of the planner's reproducibility contract: it fixes
    /// insertion order into the open set and therefore tie-breaking.
    #[inline]
    pub fn offsets(&self) -> &'static [(GridCoord, f32)] {
        match self {
            Connectivity::FourWay => &FOUR_WAY_OFFSETS,
            Connectivity::EightWay => &EIGHT_WAY_OFFSETS,
        }
    }

    /// True if `step` (difference between consecutive poses) is a legal move.
    pub fn is_legal_step(&self, step: GridCoord) -> bool {
        self.offsets().iter().any(|&(off, _)| off == step)
    }
}

/// Planner configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Active neighbor offset set
    #[serde(default)]
    pub connectivity: Connectivity,

    /// Cells with belief at or above this value are not traversable (default: 0.5)
    #[serde(default = "default_occupancy_threshold")]
    pub occupancy_threshold: f32,

    /// Node-expansion budget for pathological grids (default: 100_000)
    #[serde(default = "default_max_expansions")]
    pub max_expansions: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::default(),
            occupancy_threshold: default_occupancy_threshold(),
            max_expansions: default_max_expansions(),
        }
    }
}

fn default_occupancy_threshold() -> f32 {
    0.5
}
fn default_max_expansions() -> usize {
    100_000
}

/// Reason a plan came back empty.
///
/// None of these is an error to the caller: the controller answers every
/// failure the same way, by falling back to a greedy step or stalling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanFailure {
    /// Start cell is not traversable under the current belief
    StartBlocked,
    /// Goal cell is not traversable under the current belief
    GoalBlocked,
    /// Open set exhausted without reaching the goal
    NoPath,
    /// Node-expansion budget exceeded
    BudgetExhausted,
    /// Start or goal is outside the grid
    OutOfBounds,
}

/// Result of one planning call
#[derive(Clone, Debug)]
pub struct PlanResult {
    /// Poses from start to goal inclusive; empty on failure
    pub path: Vec<GridCoord>,
    /// Accumulated path cost (infinity on failure)
    pub cost: f32,
    /// Number of nodes popped from the open set
    pub nodes_expanded: usize,
    /// Why the path is empty, if it is
    pub failure: Option<PlanFailure>,
}

impl PlanResult {
    fn failed(reason: PlanFailure, nodes_expanded: usize) -> Self {
        Self {
            path: Vec::new(),
            cost: f32::INFINITY,
            nodes_expanded,
            failure: Some(reason),
        }
    }

    /// True if a path was found
    #[inline]
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}

/// A node in the A* open set
#[derive(Clone, Debug)]
struct AStarNode {
    coord: GridCoord,
    g_cost: f32,
    f_cost: f32,
    /// Insertion sequence number; earlier insertions win f-cost ties
    seq: u64,
}

impl Eq for AStarNode {}

impl PartialEq for AStarNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord && self.seq == other.seq
    }
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; equal f falls through to
        // the sequence number so the earliest-inserted node pops first
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path from `start` to `goal` over the belief grid.
///
/// Standard A* with f = g + h, h = Euclidean distance to the goal, which is
/// admissible and consistent for both connectivity modes at the stated edge
/// costs. Returns the path start..=goal on success; on failure the path is
/// empty and `failure` says why.
pub fn plan(
    grid: &OccupancyGrid,
    start: GridCoord,
    goal: GridCoord,
    config: &PlannerConfig,
) -> PlanResult {
    trace!(
        "[AStar] plan: start=({},{}) goal=({},{})",
        start.x,
        start.y,
        goal.x,
        goal.y
    );

    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        debug!("[AStar] FAILED: OutOfBounds - start or goal outside grid");
        return PlanResult::failed(PlanFailure::OutOfBounds, 0);
    }

    let threshold = config.occupancy_threshold;
    if !grid.is_traversable(start, threshold) {
        debug!("[AStar] FAILED: StartBlocked at ({},{})", start.x, start.y);
        return PlanResult::failed(PlanFailure::StartBlocked, 0);
    }
    if !grid.is_traversable(goal, threshold) {
        debug!("[AStar] FAILED: GoalBlocked at ({},{})", goal.x, goal.y);
        return PlanResult::failed(PlanFailure::GoalBlocked, 0);
    }

    let mut open_set = BinaryHeap::new();
    let mut closed_set: HashSet<GridCoord> = HashSet::new();
    let mut came_from: HashMap<GridCoord, GridCoord> = HashMap::new();
    let mut g_scores: HashMap<GridCoord, f32> = HashMap::new();
    let mut next_seq: u64 = 0;

    open_set.push(AStarNode {
        coord: start,
        g_cost: 0.0,
        f_cost: start.euclidean_distance(&goal),
        seq: next_seq,
    });
    g_scores.insert(start, 0.0);

    let mut nodes_expanded = 0;

    while let Some(current) = open_set.pop() {
        nodes_expanded += 1;

        if nodes_expanded > config.max_expansions {
            debug!(
                "[AStar] FAILED: BudgetExhausted ({} nodes)",
                nodes_expanded
            );
            return PlanResult::failed(PlanFailure::BudgetExhausted, nodes_expanded);
        }

        if current.coord == goal {
            return reconstruct_path(&came_from, goal, current.g_cost, nodes_expanded);
        }

        // Skip nodes already finalized with a cost no worse than this one
        if !closed_set.insert(current.coord) {
            continue;
        }

        for &(offset, step_cost) in config.connectivity.offsets() {
            let neighbor = current.coord + offset;

            if closed_set.contains(&neighbor) {
                continue;
            }
            if !grid.is_traversable(neighbor, threshold) {
                continue;
            }

            let tentative_g = current.g_cost + step_cost;
            let best_g = g_scores.get(&neighbor).copied().unwrap_or(f32::INFINITY);
            if tentative_g < best_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                next_seq += 1;
                open_set.push(AStarNode {
                    coord: neighbor,
                    g_cost: tentative_g,
                    f_cost: tentative_g + neighbor.euclidean_distance(&goal),
                    seq: next_seq,
                });
            }
        }
    }

    debug!(
        "[AStar] FAILED: NoPath after expanding {} nodes",
        nodes_expanded
    );
    PlanResult::failed(PlanFailure::NoPath, nodes_expanded)
}

fn reconstruct_path(
    came_from: &HashMap<GridCoord, GridCoord>,
    goal: GridCoord,
    cost: f32,
    nodes_expanded: usize,
) -> PlanResult {
    let mut path = Vec::new();
    let mut current = goal;

    while let Some(&prev) = came_from.get(&current) {
        path.push(current);
        current = prev;
    }
    path.push(current); // Add start
    path.reverse();

    trace!(
        "[AStar] SUCCESS: path length={} cells, cost={:.2}, nodes_expanded={}",
        path.len(),
        cost,
        nodes_expanded
    );

    PlanResult {
        path,
        cost,
        nodes_expanded,
        failure: None,
    }
}
