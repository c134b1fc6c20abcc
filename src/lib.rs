//! Gem Rush - a 2D gem collecting arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, movement, spawning, animation, round state)
//! - `level`: Stage layouts and level configuration
//! - `progress`: Save state (unlocked stages)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and activation errors

pub mod error;
pub mod level;
pub mod progress;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, LevelError};
pub use level::{LevelConfig, StageId};
pub use progress::Progress;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz host frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport the stages were laid out on
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 480.0;

    /// Number of gem colors (and collected slots)
    pub const GEM_COLOR_COUNT: usize = 6;

    /// Avatar animation
    pub const AVATAR_IDLE_FRAME_TIME: f32 = 0.2;
    pub const AVATAR_MOVE_FRAME_TIME: f32 = 0.1;
    pub const AVATAR_CYCLE_FRAMES: u8 = 10;
    /// Dying plays frames 0..=10; frame 10 is blank
    pub const AVATAR_DEATH_FRAMES: u8 = 10;

    /// Gem animation
    pub const GEM_FRAME_TIME: f32 = 0.05;
    pub const GEM_FRAMES: u8 = 11;
    pub const GEM_PAUSE_TIME: f32 = 1.0;
    pub const SPARKLE_FRAMES: u8 = 10;
    /// Sparkle overlay starts once the primary frame passes this index
    pub const SPARKLE_START_FRAME: u8 = 5;

    /// Hazard animation (2-frame flicker)
    pub const HAZARD_FRAME_TIME: f32 = 0.2;
    pub const HAZARD_FRAMES: u8 = 2;
}
