//! Round events and the observer seam
//!
//! Each tick returns the events it produced, in the order they happened.
//! Audio, scoring and screen flow hook in through [`RoundObserver`] instead
//! of being called from the simulation.

use serde::{Deserialize, Serialize};

use super::state::{Direction, GemColor};
use crate::level::StageId;

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// The gem timer fired and replaced the field with a fresh wave
    GemsSpawned { count: usize },
    /// A hazard entered the arena
    HazardSpawned {
        id: u32,
        direction: Direction,
        speed: f32,
    },
    /// The avatar picked up a gem; `newly` is false for a repeat color
    Collected { color: GemColor, newly: bool },
    /// A hazard touched the avatar and the round's progress was wiped
    LethalHit,
    /// The death animation finished and the avatar is back at its start
    Respawned,
    /// All six colors collected
    RoundComplete {
        stage: StageId,
        unlocks: Option<StageId>,
    },
}

impl RoundEvent {
    /// Forward this event to the matching observer hook
    pub fn dispatch<O: RoundObserver + ?Sized>(&self, observer: &mut O) {
        match self {
            RoundEvent::GemsSpawned { count } => observer.on_gems_spawned(*count),
            RoundEvent::HazardSpawned { id, direction, .. } => {
                observer.on_hazard_spawned(*id, *direction)
            }
            RoundEvent::Collected { color, newly } => observer.on_collect(*color, *newly),
            RoundEvent::LethalHit => observer.on_lethal_hit(),
            RoundEvent::Respawned => observer.on_respawn(),
            RoundEvent::RoundComplete { stage, unlocks } => {
                observer.on_round_complete(*stage, *unlocks)
            }
        }
    }
}

/// Collaborator notified of round events (every hook defaults to a no-op)
pub trait RoundObserver {
    fn on_collect(&mut self, _color: GemColor, _newly: bool) {}

    fn on_lethal_hit(&mut self) {}

    fn on_round_complete(&mut self, _stage: StageId, _unlocks: Option<StageId>) {}

    fn on_gems_spawned(&mut self, _count: usize) {}

    fn on_hazard_spawned(&mut self, _id: u32, _direction: Direction) {}

    fn on_respawn(&mut self) {}
}

/// Dispatch a batch of events in order
pub fn dispatch_all<O: RoundObserver + ?Sized>(events: &[RoundEvent], observer: &mut O) {
    for event in events {
        event.dispatch(observer);
    }
}
