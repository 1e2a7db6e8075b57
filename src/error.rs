//! Error types for galaxy.
//!
//! Configuration errors are raised before any sampling begins; packing errors
//! are programmer errors (bad indices, undersized destinations) and are
//! returned immediately instead of being clamped.

use thiserror::Error;

/// Errors raised while validating or loading a [`GalaxyConfig`](crate::GalaxyConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("particle count must be greater than zero")]
    ZeroParticleCount,

    #[error("galaxy radius must be greater than zero")]
    ZeroGalaxyRadius,

    #[error("ellipse twist must be finite, got {0}")]
    InvalidEllipseTwist(f32),

    #[error("speed distance floor must be positive and finite, got {0}")]
    InvalidDistanceFloor(f32),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the record packer and its destinations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("record index {index} out of range for {count} records")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("destination holds {available} bytes but {required} are required")]
    DestinationTooSmall { required: usize, available: usize },

    #[error("failed to allocate {records} records of {stride} bytes")]
    Allocation { records: usize, stride: usize },
}

/// Errors that abort galaxy generation as a whole.
#[derive(Error, Debug)]
pub enum GalaxyError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("vertex packing failed: {0}")]
    Pack(#[from] PackError),

    #[error("failed to allocate {count} {what}")]
    Allocation { what: &'static str, count: usize },
}
