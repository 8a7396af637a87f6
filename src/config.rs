//! Configuration loading for DishaNav
//!
//! All options have defaults reproducing the reference session: a 50x50
//! grid with a vertical wall at x = 25, start (10, 10), goal (40, 40).

use crate::error::{DishaError, Result};
use crate::planner::PlannerConfig;
use crate::sensor::SensorConfig;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DishaConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

/// Grid dimensions and ground-truth obstacle layout
#[derive(Clone, Debug, Deserialize)]
pub struct GridConfig {
    /// Grid width in cells (default: 50)
    #[serde(default = "default_width")]
    pub width: usize,

    /// Grid height in cells (default: 50)
    #[serde(default = "default_height")]
    pub height: usize,

    /// Initial belief for every cell (default: 0.0, confidently free)
    #[serde(default)]
    pub default_belief: f32,

    /// Ground-truth obstacle cells as [x, y] pairs
    /// (default: wall at x = 25 for y in [10, 40))
    #[serde(default = "default_obstacles")]
    pub obstacles: Vec<[i32; 2]>,
}

/// Start and goal poses
#[derive(Clone, Debug, Deserialize)]
pub struct RobotConfig {
    /// Start pose [x, y] (default: [10, 10])
    #[serde(default = "default_start")]
    pub start: [i32; 2],

    /// Initial goal pose [x, y] (default: [40, 40])
    #[serde(default = "default_goal")]
    pub goal: [i32; 2],
}

/// Driver loop settings - presentation only, no core semantics
#[derive(Clone, Debug, Deserialize)]
pub struct DriverConfig {
    /// Delay between ticks in milliseconds (default: 100)
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Tick budget before the driver gives up (default: 500)
    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
}

// Default value functions
fn default_width() -> usize {
    50
}
fn default_height() -> usize {
    50
}
fn default_obstacles() -> Vec<[i32; 2]> {
    (10..40).map(|y| [25, y]).collect()
}
fn default_start() -> [i32; 2] {
    [10, 10]
}
fn default_goal() -> [i32; 2] {
    [40, 40]
}
fn default_tick_interval() -> u64 {
    100
}
fn default_max_ticks() -> usize {
    500
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            default_belief: 0.0,
            obstacles: default_obstacles(),
        }
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            goal: default_goal(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            max_ticks: default_max_ticks(),
        }
    }
}

impl DishaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DishaError::Config(format!("Failed to read config file: {}", e)))?;
        let config: DishaConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Connectivity;

    #[test]
    fn test_defaults_reproduce_reference_session() {
        let config = DishaConfig::default();
        assert_eq!(config.grid.width, 50);
        assert_eq!(config.grid.height, 50);
        assert_eq!(config.grid.obstacles.len(), 30);
        assert!(config.grid.obstacles.contains(&[25, 10]));
        assert!(config.grid.obstacles.contains(&[25, 39]));
        assert!(!config.grid.obstacles.contains(&[25, 40]));
        assert_eq!(config.robot.start, [10, 10]);
        assert_eq!(config.robot.goal, [40, 40]);
        assert_eq!(config.sensor.num_rays, 36);
        assert_eq!(config.sensor.max_range, 10);
        assert_eq!(config.planner.connectivity, Connectivity::FourWay);
        assert_eq!(config.planner.occupancy_threshold, 0.5);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [grid]
            width = 30
            height = 20
            obstacles = [[5, 5], [5, 6]]

            [planner]
            connectivity = "eight_way"
            occupancy_threshold = 0.6

            [driver]
            tick_interval_ms = 0
        "#;
        let config: DishaConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.grid.width, 30);
        assert_eq!(config.grid.height, 20);
        assert_eq!(config.grid.obstacles, vec![[5, 5], [5, 6]]);
        assert_eq!(config.planner.connectivity, Connectivity::EightWay);
        assert!((config.planner.occupancy_threshold - 0.6).abs() < 1e-6);
        // Unspecified sections keep their defaults
        assert_eq!(config.sensor.num_rays, 36);
        assert_eq!(config.robot.goal, [40, 40]);
        assert_eq!(config.driver.tick_interval_ms, 0);
        assert_eq!(config.driver.max_ticks, 500);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result: std::result::Result<DishaConfig, _> =
            toml::from_str("planner = \"not a table\"").map_err(DishaError::from);
        assert!(matches!(result, Err(DishaError::Config(_))));
    }
}
