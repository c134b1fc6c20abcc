//! Stage layouts
//!
//! A level is the static part of a round: where the avatar may walk, which
//! walls block it, where it starts and how often things spawn. The three
//! built-in stages were laid out on an 800x480 viewport.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::{ConfigError, LevelError};
use crate::sim::{Rect, rect_overlaps_rect};
use crate::tuning::Tuning;

/// Stage identifiers, in unlock order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageId {
    One,
    Two,
    Three,
}

impl StageId {
    pub const ALL: [StageId; 3] = [StageId::One, StageId::Two, StageId::Three];

    /// Stage unlocked by completing this one
    pub fn next(self) -> Option<StageId> {
        match self {
            StageId::One => Some(StageId::Two),
            StageId::Two => Some(StageId::Three),
            StageId::Three => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::One => "One",
            StageId::Two => "Two",
            StageId::Three => "Three",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "one" | "1" => Some(StageId::One),
            "two" | "2" => Some(StageId::Two),
            "three" | "3" => Some(StageId::Three),
            _ => None,
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static configuration for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub stage: StageId,
    /// Full field; hazards enter and leave through its side edges
    pub arena: Rect,
    /// Region the avatar and gems are kept to
    pub playable: Rect,
    /// Walls (never move)
    #[serde(default)]
    pub obstacles: Vec<Rect>,
    /// Avatar center at round start and after each death
    pub avatar_start: Vec2,
    /// Seconds between gem waves
    pub gem_threshold: f32,
    /// Seconds between hazards, before any difficulty ratchet
    pub hazard_threshold: f32,
}

impl LevelConfig {
    /// Built-in layout for `stage`
    pub fn stage(stage: StageId) -> Self {
        let arena = Rect::new(0.0, 0.0, VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
        match stage {
            StageId::One => Self {
                stage,
                arena,
                playable: Rect::new(95.0, 120.0, VIEWPORT_WIDTH - 185.0, VIEWPORT_HEIGHT - 250.0),
                obstacles: Vec::new(),
                avatar_start: Vec2::new(VIEWPORT_WIDTH / 2.0, VIEWPORT_HEIGHT / 2.0),
                gem_threshold: 6.0,
                hazard_threshold: 2.0,
            },
            StageId::Two => {
                let playable =
                    Rect::new(85.0, 80.0, VIEWPORT_WIDTH - 165.0, VIEWPORT_HEIGHT - 195.0);
                Self {
                    stage,
                    arena,
                    playable,
                    obstacles: vec![
                        Rect::new(176.0, 146.0, 60.0, 270.0),
                        Rect::new(347.0, playable.top(), 60.0, 250.0),
                        Rect::new(542.0, 146.0, 60.0, 270.0),
                    ],
                    avatar_start: Vec2::new(playable.right() - 48.0, playable.bottom() - 30.0),
                    gem_threshold: 3.0,
                    hazard_threshold: 2.0,
                }
            }
            StageId::Three => {
                let playable =
                    Rect::new(85.0, 80.0, VIEWPORT_WIDTH - 165.0, VIEWPORT_HEIGHT - 195.0);
                Self {
                    stage,
                    arena,
                    playable,
                    obstacles: vec![
                        // Upper ledges
                        Rect::new(220.0, 140.0, 160.0, 1.0),
                        Rect::new(425.0, 140.0, 160.0, 1.0),
                        // Pillars
                        Rect::new(212.0, 210.0, 50.0, 75.0),
                        Rect::new(539.0, 210.0, 50.0, 75.0),
                        // Posts along the top edge
                        Rect::new(210.0, playable.top() + 15.0, 5.0, 40.0),
                        Rect::new(585.0, playable.top() + 15.0, 5.0, 40.0),
                        // Long walls with a gap in the middle
                        Rect::new(425.0, 230.0, 320.0, 20.0),
                        Rect::new(60.0, 230.0, 315.0, 20.0),
                    ],
                    avatar_start: Vec2::new(playable.right() - 48.0, playable.bottom() - 30.0),
                    gem_threshold: 12.0,
                    hazard_threshold: 4.0,
                }
            }
        }
    }

    /// Parse and validate a level from JSON
    pub fn from_json(json: &str, tuning: &Tuning) -> Result<Self, ConfigError> {
        let level: LevelConfig = serde_json::from_str(json)?;
        level.validate(tuning)?;
        Ok(level)
    }

    /// Load a level from a JSON file
    pub fn load(path: &str, tuning: &Tuning) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let level = Self::from_json(&json, tuning)?;
        log::info!(
            "Loaded stage {} from {} ({} obstacles)",
            level.stage,
            path,
            level.obstacles.len()
        );
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every precondition a round relies on
    pub fn validate(&self, tuning: &Tuning) -> Result<(), LevelError> {
        let p = &self.playable;
        if !p.is_well_formed() || p.is_degenerate() {
            return Err(LevelError::EmptyPlayableArea {
                width: p.width,
                height: p.height,
            });
        }
        if !self.arena.is_well_formed() || !self.arena.contains_rect(p) {
            return Err(LevelError::PlayableOutsideArena);
        }

        for (index, o) in self.obstacles.iter().enumerate() {
            if !o.is_well_formed() {
                return Err(LevelError::MalformedObstacle {
                    index,
                    x: o.x,
                    y: o.y,
                    width: o.width,
                    height: o.height,
                });
            }
        }

        for (which, value) in [("Gem", self.gem_threshold), ("Hazard", self.hazard_threshold)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LevelError::InvalidThreshold { which, value });
            }
        }

        let start = self.avatar_start;
        let inside = start.is_finite()
            && start.x >= p.left()
            && start.x <= p.right()
            && start.y >= p.top()
            && start.y <= p.bottom();
        if !inside {
            return Err(LevelError::AvatarStartOutside {
                x: start.x,
                y: start.y,
            });
        }

        let body = tuning.avatar_body(start);
        if let Some(index) = self
            .obstacles
            .iter()
            .position(|o| rect_overlaps_rect(o, &body))
        {
            return Err(LevelError::AvatarStartBlocked {
                x: start.x,
                y: start.y,
                index,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_stages_are_valid() {
        let tuning = Tuning::default();
        for stage in StageId::ALL {
            let level = LevelConfig::stage(stage);
            assert_eq!(level.stage, stage);
            assert_eq!(level.validate(&tuning), Ok(()), "stage {stage}");
        }
    }

    #[test]
    fn test_stage_chain() {
        assert_eq!(StageId::One.next(), Some(StageId::Two));
        assert_eq!(StageId::Two.next(), Some(StageId::Three));
        assert_eq!(StageId::Three.next(), None);
        assert_eq!(StageId::from_str("TWO"), Some(StageId::Two));
        assert_eq!(StageId::from_str("3"), Some(StageId::Three));
        assert_eq!(StageId::from_str("four"), None);
    }

    #[test]
    fn test_zero_area_playable_rejected() {
        let mut level = LevelConfig::stage(StageId::One);
        level.playable.height = 0.0;
        assert!(matches!(
            level.validate(&Tuning::default()),
            Err(LevelError::EmptyPlayableArea { .. })
        ));
    }

    #[test]
    fn test_negative_obstacle_rejected() {
        let mut level = LevelConfig::stage(StageId::Two);
        level.obstacles[1].width = -5.0;
        assert!(matches!(
            level.validate(&Tuning::default()),
            Err(LevelError::MalformedObstacle { index: 1, .. })
        ));
    }

    #[test]
    fn test_bad_thresholds_rejected() {
        let mut level = LevelConfig::stage(StageId::One);
        level.hazard_threshold = 0.0;
        assert!(matches!(
            level.validate(&Tuning::default()),
            Err(LevelError::InvalidThreshold { which: "Hazard", .. })
        ));

        level.hazard_threshold = 2.0;
        level.gem_threshold = f32::NAN;
        assert!(matches!(
            level.validate(&Tuning::default()),
            Err(LevelError::InvalidThreshold { which: "Gem", .. })
        ));
    }

    #[test]
    fn test_blocked_start_rejected() {
        let mut level = LevelConfig::stage(StageId::Two);
        level.avatar_start = Vec2::new(200.0, 200.0);
        assert!(matches!(
            level.validate(&Tuning::default()),
            Err(LevelError::AvatarStartBlocked { index: 0, .. })
        ));
    }

    #[test]
    fn test_start_outside_rejected() {
        let mut level = LevelConfig::stage(StageId::One);
        level.avatar_start = Vec2::new(10.0, 10.0);
        assert!(matches!(
            level.validate(&Tuning::default()),
            Err(LevelError::AvatarStartOutside { .. })
        ));
    }

    #[test]
    fn test_playable_must_fit_arena() {
        let mut level = LevelConfig::stage(StageId::One);
        level.arena = Rect::new(0.0, 0.0, 300.0, 300.0);
        assert_eq!(
            level.validate(&Tuning::default()),
            Err(LevelError::PlayableOutsideArena)
        );
    }

    #[test]
    fn test_json_round_trip_of_stage_three() {
        let tuning = Tuning::default();
        let level = LevelConfig::stage(StageId::Three);
        let json = level.to_json().unwrap();
        let parsed = LevelConfig::from_json(&json, &tuning).unwrap();
        assert_eq!(parsed, level);
    }

    #[test]
    fn test_json_with_invalid_level_is_level_error() {
        let json = r#"{
            "stage": "One",
            "arena": { "x": 0.0, "y": 0.0, "width": 800.0, "height": 480.0 },
            "playable": { "x": 100.0, "y": 100.0, "width": 0.0, "height": 100.0 },
            "avatar_start": [150.0, 150.0],
            "gem_threshold": 6.0,
            "hazard_threshold": 2.0
        }"#;
        let err = LevelConfig::from_json(json, &Tuning::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Level(LevelError::EmptyPlayableArea { .. })
        ));
    }
}
