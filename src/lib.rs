//! # DishaNav: Grid Navigation Simulator
//!
//! Simulates an autonomous agent navigating a 2-D grid world under partial
//! observability. The agent keeps a per-cell occupancy *belief*, senses
//! ground-truth obstacles with a simulated 360° range scan, plans
//! collision-free paths with A*, and executes them one step per tick,
//! replanning whenever the goal moves or the belief invalidates the path.
//!
//! ## Quick Start
//!
//! ```rust
//! use disha_nav::{DishaConfig, Mode, NavController};
//!
//! let config = DishaConfig::default();
//! let mut nav = NavController::new(&config).unwrap();
//!
//! while nav.tick() != Mode::Reached {
//!     let snap = nav.snapshot();
//!     // hand `snap` to a renderer between ticks
//!     # if snap.mode == Mode::Stalled { break; }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`point`]: integer cell coordinates and distance helpers
//! - [`grid`]: occupancy belief grid plus the ground-truth obstacle set
//! - [`sensor`]: deterministic ray-cast scan writing belief updates
//! - [`planner`]: stateless A* over the belief snapshot
//! - [`controller`]: tick loop, replanning policy, greedy fallback
//! - [`config`]: TOML configuration surface
//!
//! Control flow per tick:
//!
//! ```text
//! tick() ──► Sensor ──► belief grid ──► replan? ──► A* planner
//!                                                       │
//!            pose/history update ◄── one path step ◄────┘
//!                    │
//!                    ▼
//!            snapshot() ──► external renderer (between ticks only)
//! ```
//!
//! The session is single-threaded and synchronous: a tick runs sensing,
//! optional planning, and one step of movement to completion before
//! anything else may observe the state. Goal changes requested from
//! outside are queued and applied at the start of the next tick.

pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod planner;
pub mod point;
pub mod sensor;

// Re-export main types at crate root
pub use config::DishaConfig;
pub use controller::{Mode, NavController, Snapshot};
pub use error::{DishaError, Result};
pub use grid::OccupancyGrid;
pub use planner::{plan, Connectivity, PlanFailure, PlanResult, PlannerConfig};
pub use point::GridCoord;
pub use sensor::{scan, ScanStats, SensorConfig};
