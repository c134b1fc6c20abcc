//! Game balance values
//!
//! Everything that shapes the feel of a round but not the stage layout.
//! Defaults match the shipped game; a JSON file may override any subset.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::Rect;

/// Data-driven balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Avatar ===
    /// Movement speed (pixels/s per unit of input)
    pub avatar_speed: f32,
    /// Collision box offset from the avatar's center
    pub avatar_body_offset: Vec2,
    /// Collision box size
    pub avatar_body_size: Vec2,

    // === Gems ===
    /// Fewest gems in one spawn wave
    pub gem_wave_min: u32,
    /// Most gems in one spawn wave
    pub gem_wave_max: u32,
    /// Clearance kept between a new gem and the avatar/obstacles
    pub gem_spawn_margin: f32,
    /// Rejection-sampling attempts before a gem spawn is skipped
    pub spawn_attempts: u32,

    // === Hazards ===
    /// Collision radius (sprite is a 2r square)
    pub hazard_radius: f32,
    /// Speed with no gems collected (pixels/s)
    pub hazard_base_speed: f32,
    /// Extra speed per distinct color collected
    pub hazard_speed_per_gem: f32,
    /// Hazard threshold multiplier for each newly collected color
    pub hazard_ratchet_factor: f32,
    /// Hazard threshold never drops below this (seconds)
    pub hazard_threshold_floor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            avatar_speed: 100.0,
            avatar_body_offset: Vec2::new(-16.0, -16.0),
            avatar_body_size: Vec2::new(32.0, 38.0),

            gem_wave_min: 1,
            gem_wave_max: 5,
            gem_spawn_margin: 8.0,
            spawn_attempts: 64,

            hazard_radius: 16.0,
            hazard_base_speed: 100.0,
            hazard_speed_per_gem: 30.0,
            hazard_ratchet_factor: 0.75,
            hazard_threshold_floor: 0.33,
        }
    }
}

impl Tuning {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path);
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("avatar_speed", self.avatar_speed),
            ("avatar_body_size.x", self.avatar_body_size.x),
            ("avatar_body_size.y", self.avatar_body_size.y),
            ("hazard_radius", self.hazard_radius),
            ("hazard_base_speed", self.hazard_base_speed),
            ("hazard_threshold_floor", self.hazard_threshold_floor),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidTuning { field, value });
            }
        }
        if !(self.gem_spawn_margin.is_finite() && self.gem_spawn_margin >= 0.0) {
            return Err(ConfigError::InvalidTuning {
                field: "gem_spawn_margin",
                value: self.gem_spawn_margin,
            });
        }
        if !(self.hazard_speed_per_gem.is_finite() && self.hazard_speed_per_gem >= 0.0) {
            return Err(ConfigError::InvalidTuning {
                field: "hazard_speed_per_gem",
                value: self.hazard_speed_per_gem,
            });
        }
        if !(self.hazard_ratchet_factor > 0.0 && self.hazard_ratchet_factor < 1.0) {
            return Err(ConfigError::InvalidTuning {
                field: "hazard_ratchet_factor",
                value: self.hazard_ratchet_factor,
            });
        }
        if self.gem_wave_min == 0 || self.gem_wave_min > self.gem_wave_max {
            return Err(ConfigError::InvalidTuning {
                field: "gem_wave_min",
                value: self.gem_wave_min as f32,
            });
        }
        if self.spawn_attempts == 0 {
            return Err(ConfigError::InvalidTuning {
                field: "spawn_attempts",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Avatar collision box for an avatar centered at `position`
    pub fn avatar_body(&self, position: Vec2) -> Rect {
        Rect::from_origin(position + self.avatar_body_offset, self.avatar_body_size)
    }

    /// Hazard speed after `distinct_collected` colors
    pub fn hazard_speed(&self, distinct_collected: usize) -> f32 {
        self.hazard_base_speed + self.hazard_speed_per_gem * distinct_collected as f32
    }
}
