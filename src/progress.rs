//! Save state: which stages the player has unlocked
//!
//! Owned by the caller and passed into round activation; a completed round
//! reports the stage it unlocks and the caller records it here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::level::StageId;
use crate::sim::RoundEvent;

/// Unlocked stages (stage One is always available)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    unlocked: BTreeSet<StageId>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Fresh save: only stage One unlocked
    pub fn new() -> Self {
        Self {
            unlocked: BTreeSet::from([StageId::One]),
        }
    }

    pub fn is_unlocked(&self, stage: StageId) -> bool {
        stage == StageId::One || self.unlocked.contains(&stage)
    }

    /// Returns true if the stage was newly unlocked
    pub fn unlock(&mut self, stage: StageId) -> bool {
        let newly = self.unlocked.insert(stage);
        if newly {
            log::info!("Stage {} unlocked", stage);
        }
        newly
    }

    /// Apply a round-complete event; other events are ignored
    pub fn record(&mut self, event: &RoundEvent) -> bool {
        match event {
            RoundEvent::RoundComplete {
                unlocks: Some(next),
                ..
            } => self.unlock(*next),
            _ => false,
        }
    }

    pub fn unlocked_stages(&self) -> impl Iterator<Item = StageId> + '_ {
        StageId::ALL.into_iter().filter(|s| self.is_unlocked(*s))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a save file, falling back to a fresh save if it is missing or unreadable
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(progress) => {
                    log::info!("Loaded save state from {}", path);
                    progress
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt save state {}: {}", path, e);
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No save state at {}, starting fresh", path);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        log::info!("Save state written to {}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_save_has_stage_one_only() {
        let p = Progress::new();
        assert!(p.is_unlocked(StageId::One));
        assert!(!p.is_unlocked(StageId::Two));
        assert!(!p.is_unlocked(StageId::Three));
        assert_eq!(p.unlocked_stages().collect::<Vec<_>>(), vec![StageId::One]);
    }

    #[test]
    fn test_unlock_reports_newly() {
        let mut p = Progress::new();
        assert!(p.unlock(StageId::Two));
        assert!(!p.unlock(StageId::Two));
        assert!(p.is_unlocked(StageId::Two));
    }

    #[test]
    fn test_record_round_complete() {
        let mut p = Progress::new();
        assert!(!p.record(&RoundEvent::LethalHit));
        assert!(p.record(&RoundEvent::RoundComplete {
            stage: StageId::One,
            unlocks: Some(StageId::Two),
        }));
        assert!(!p.record(&RoundEvent::RoundComplete {
            stage: StageId::Three,
            unlocks: None,
        }));
        assert!(p.is_unlocked(StageId::Two));
    }

    #[test]
    fn test_json_round_trip() {
        let mut p = Progress::new();
        p.unlock(StageId::Three);
        let json = p.to_json().unwrap();
        assert_eq!(Progress::from_json(&json).unwrap(), p);
    }

    #[test]
    fn test_missing_file_is_fresh_save() {
        let p = Progress::load_or_default("/nonexistent/gem-rush-save.json");
        assert_eq!(p, Progress::new());
    }
}
