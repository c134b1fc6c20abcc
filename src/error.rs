//! Error types for level configuration and round activation.

use thiserror::Error;

use crate::level::StageId;

/// Precondition violations in a level configuration, reported when a round
/// is activated rather than discovered mid-simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    /// Playable rectangle has zero (or negative) area.
    #[error("Playable area {width}x{height} has no area")]
    EmptyPlayableArea { width: f32, height: f32 },

    /// Playable rectangle extends past the arena.
    #[error("Playable area is not contained in the arena")]
    PlayableOutsideArena,

    /// Obstacle with negative or non-finite dimensions.
    #[error("Obstacle {index} is malformed: {width}x{height} at ({x}, {y})")]
    MalformedObstacle {
        index: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },

    /// Spawn threshold that would never (or always) fire.
    #[error("{which} spawn threshold must be positive and finite, got {value}")]
    InvalidThreshold { which: &'static str, value: f32 },

    /// Avatar would start inside an obstacle and could never move.
    #[error("Avatar start ({x}, {y}) overlaps obstacle {index}")]
    AvatarStartBlocked { x: f32, y: f32, index: usize },

    /// Avatar start is outside the playable area.
    #[error("Avatar start ({x}, {y}) is outside the playable area")]
    AvatarStartOutside { x: f32, y: f32 },

    /// Stage has not been unlocked in the supplied save state.
    #[error("Stage {0} is locked")]
    StageLocked(StageId),
}

/// Errors that can occur when loading configuration data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Level parsed but failed validation.
    #[error(transparent)]
    Level(#[from] LevelError),

    /// Tuning value out of range.
    #[error("Invalid tuning value for {field}: {value}")]
    InvalidTuning { field: &'static str, value: f32 },
}
