//! Tick-driven execution controller.
//!
//! Owns every piece of mutable session state - belief grid, robot pose,
//! goal, current path, history - and advances the simulation one discrete
//! step per `tick()` call. External drivers only ever call `tick()`,
//! `set_goal()` and `snapshot()`; rendering happens outside, between ticks.
//!
//! One tick, in order: check arrival, sense, decide whether to replan,
//! advance one step (planned path or greedy fallback), record history.

use crate::config::DishaConfig;
use crate::error::{DishaError, Result};
use crate::grid::OccupancyGrid;
use crate::planner::{self, PlannerConfig};
use crate::point::GridCoord;
use crate::sensor::{self, ScanStats, SensorConfig};
use log::{debug, info, warn};
use rand::Rng;
use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};

/// Controller state, exposed through [`Snapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// No valid path; planning (or greedy-stepping) toward the goal
    Planning,
    /// Consuming a planned path one step per tick
    Following,
    /// Neither planning nor the greedy fallback yields progress
    Stalled,
    /// Robot pose equals the goal; terminal until the goal changes
    Reached,
}

/// Read-only view of the session, safe to take between ticks.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Belief values, row-major
    pub belief: Vec<f32>,
    /// Current robot pose
    pub robot: GridCoord,
    /// Current goal pose
    pub goal: GridCoord,
    /// Remaining planned path (possibly empty)
    pub path: Vec<GridCoord>,
    /// Controller mode
    pub mode: Mode,
}

/// Execution controller for one navigation session.
pub struct NavController {
    grid: OccupancyGrid,
    pose: GridCoord,
    goal: GridCoord,
    /// Remaining planned path; head is the next step
    path: VecDeque<GridCoord>,
    /// Previously occupied poses, append-only
    history: Vec<GridCoord>,
    /// Membership mirror of `history` for the greedy fallback
    visited: HashSet<GridCoord>,
    mode: Mode,
    sensor: SensorConfig,
    planner: PlannerConfig,
    /// Goal change requested from outside, applied at the next tick start
    pending_goal: Option<GridCoord>,
    /// Goal changed since the last tick
    goal_changed: bool,
    /// At least one tick has run
    ticked: bool,
}

impl NavController {
    /// Build a session from configuration.
    ///
    /// Fails with `OutOfBounds` if an obstacle or pose lies outside the
    /// grid, or `InvalidGoal` if the initial goal sits on a ground-truth
    /// obstacle.
    pub fn new(config: &DishaConfig) -> Result<Self> {
        let mut grid = OccupancyGrid::new(
            config.grid.width,
            config.grid.height,
            config.grid.default_belief,
        );
        grid.set_obstacle_cells(
            config
                .grid
                .obstacles
                .iter()
                .map(|&[x, y]| GridCoord::new(x, y)),
        )?;

        let pose = GridCoord::new(config.robot.start[0], config.robot.start[1]);
        if !grid.in_bounds(pose) {
            return Err(DishaError::OutOfBounds {
                x: pose.x,
                y: pose.y,
            });
        }

        let goal = GridCoord::new(config.robot.goal[0], config.robot.goal[1]);
        Self::validate_goal(&grid, goal)?;

        info!(
            "Session: {}x{} grid, {} obstacle cells, start ({},{}), goal ({},{})",
            grid.width(),
            grid.height(),
            grid.obstacles().len(),
            pose.x,
            pose.y,
            goal.x,
            goal.y
        );

        Ok(Self {
            grid,
            pose,
            goal,
            path: VecDeque::new(),
            history: vec![pose],
            visited: HashSet::from([pose]),
            mode: Mode::Planning,
            sensor: config.sensor.clone(),
            planner: config.planner.clone(),
            pending_goal: None,
            goal_changed: false,
            ticked: false,
        })
    }

    fn validate_goal(grid: &OccupancyGrid, goal: GridCoord) -> Result<()> {
        if !grid.in_bounds(goal) {
            return Err(DishaError::OutOfBounds {
                x: goal.x,
                y: goal.y,
            });
        }
        if grid.is_obstacle(goal) {
            return Err(DishaError::InvalidGoal {
                x: goal.x,
                y: goal.y,
            });
        }
        Ok(())
    }

    /// Request a goal change, honored at the start of the next tick.
    ///
    /// Rejects goals outside the grid or on a ground-truth obstacle cell;
    /// on rejection the previous goal and mode are untouched.
    pub fn set_goal(&mut self, x: i32, y: i32) -> Result<()> {
        let goal = GridCoord::new(x, y);
        Self::validate_goal(&self.grid, goal)?;
        self.pending_goal = Some(goal);
        Ok(())
    }

    /// Pick a uniformly random non-obstacle cell as a goal candidate.
    ///
    /// The random source is injected so goal selection stays reproducible
    /// under a seeded generator. Returns `None` only if every cell is a
    /// ground-truth obstacle.
    pub fn random_free_goal<R: Rng>(&self, rng: &mut R) -> Option<GridCoord> {
        let free: Vec<GridCoord> = (0..self.grid.cell_count())
            .map(|i| self.grid.index_to_coord(i))
            .filter(|c| !self.grid.is_obstacle(*c))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.gen_range(0..free.len())])
    }

    /// Advance the simulation by one step; returns the mode after the tick.
    pub fn tick(&mut self) -> Mode {
        // Queued goal changes apply atomically at tick start, never mid-tick
        if let Some(goal) = self.pending_goal.take() {
            if goal != self.goal {
                info!(
                    "Goal changed: ({},{}) -> ({},{})",
                    self.goal.x, self.goal.y, goal.x, goal.y
                );
                self.goal = goal;
                self.goal_changed = true;
                if self.mode == Mode::Reached {
                    self.mode = Mode::Planning;
                }
            }
        }

        // 1. Arrival check; Reached is a no-op state until the goal moves
        if self.pose == self.goal {
            if self.mode != Mode::Reached {
                info!("Goal reached at ({},{})", self.pose.x, self.pose.y);
            }
            self.mode = Mode::Reached;
            self.ticked = true;
            return self.mode;
        }

        // 2. Refresh belief around the current pose
        let stats = match sensor::scan(&mut self.grid, self.pose, &self.sensor) {
            Ok(stats) => stats,
            Err(e) => {
                // Scan cells are bounds-filtered, so this cannot happen
                warn!("Sensor scan failed: {}", e);
                ScanStats::default()
            }
        };
        debug!(
            "Scan at ({},{}): {} decayed, {} marked, {} occluded",
            self.pose.x, self.pose.y, stats.cells_decayed, stats.cells_marked, stats.rays_occluded
        );

        // 3. Replan on the first tick, on goal change, or when the stored
        // path is gone or its next step is no longer believed free
        let first_tick = !self.ticked;
        self.ticked = true;
        let path_invalid = match self.path.front() {
            Some(&next) => !self
                .grid
                .is_traversable(next, self.planner.occupancy_threshold),
            None => true,
        };
        if first_tick || self.goal_changed || path_invalid {
            self.goal_changed = false;
            self.replan();
        }

        // 4. Advance one step: planned path head, or greedy fallback
        let next = match self.mode {
            Mode::Following => self.path.pop_front(),
            _ => self.greedy_step(),
        };

        match next {
            Some(step) => {
                // 5. Record the newly occupied pose
                self.pose = step;
                self.history.push(step);
                self.visited.insert(step);
                if self.pose == self.goal {
                    info!("Goal reached at ({},{})", self.pose.x, self.pose.y);
                    self.mode = Mode::Reached;
                }
            }
            None => {
                if self.mode != Mode::Stalled {
                    warn!(
                        "Stalled at ({},{}): no plan and no untried neighbor",
                        self.pose.x, self.pose.y
                    );
                }
                self.mode = Mode::Stalled;
            }
        }

        self.mode
    }

    /// Run the planner from the current pose; on success store the path
    /// with its start cell discarded and switch to Following.
    fn replan(&mut self) {
        let result = planner::plan(&self.grid, self.pose, self.goal, &self.planner);
        if result.success() {
            let mut path: VecDeque<GridCoord> = result.path.into();
            path.pop_front(); // The start cell is the current pose
            debug!(
                "Replanned: {} steps, cost {:.2}, {} nodes expanded",
                path.len(),
                result.cost,
                result.nodes_expanded
            );
            self.path = path;
            self.mode = Mode::Following;
        } else {
            debug!(
                "Plan failed ({:?}), falling back to greedy stepping",
                result.failure
            );
            self.path.clear();
            self.mode = Mode::Planning;
        }
    }

    /// Greedy fallback: the traversable neighbor closest to the goal that
    /// has not been visited before. `None` means stall in place.
    fn greedy_step(&self) -> Option<GridCoord> {
        let mut candidates: Vec<GridCoord> = self
            .planner
            .connectivity
            .offsets()
            .iter()
            .map(|&(offset, _)| self.pose + offset)
            .filter(|&c| {
                self.grid
                    .is_traversable(c, self.planner.occupancy_threshold)
            })
            .collect();

        // Stable sort: equidistant candidates keep the offset-table order
        candidates.sort_by(|a, b| {
            a.euclidean_distance(&self.goal)
                .partial_cmp(&b.euclidean_distance(&self.goal))
                .unwrap_or(Ordering::Equal)
        });

        candidates.into_iter().find(|c| !self.visited.contains(c))
    }

    /// Read-only view of the session state. Safe between ticks.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            belief: self.grid.beliefs().to_vec(),
            robot: self.pose,
            goal: self.goal,
            path: self.path.iter().copied().collect(),
            mode: self.mode,
        }
    }

    /// Current robot pose
    #[inline]
    pub fn pose(&self) -> GridCoord {
        self.pose
    }

    /// Current goal pose
    #[inline]
    pub fn goal(&self) -> GridCoord {
        self.goal
    }

    /// Current mode
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The belief grid
    #[inline]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Poses occupied so far, in order
    #[inline]
    pub fn history(&self) -> &[GridCoord] {
        &self.history
    }
}
