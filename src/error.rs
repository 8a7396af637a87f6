//! Error types for DishaNav

use thiserror::Error;

/// DishaNav error type
#[derive(Error, Debug)]
pub enum DishaError {
    #[error("Coordinate ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },

    #[error("Goal ({x}, {y}) is on a ground-truth obstacle")]
    InvalidGoal { x: i32, y: i32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for DishaError {
    fn from(e: toml::de::Error) -> Self {
        DishaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DishaError>;
