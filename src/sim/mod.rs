//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time comes from the caller
//! - Seeded RNG only (one generator per round)
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod animation;
pub mod events;
pub mod movement;
pub mod shape;
pub mod spawn;
pub mod state;
pub mod tick;

pub use animation::{AnimationSignal, AvatarAnimation, AvatarPose, GemAnimation, HazardAnimation};
pub use events::{RoundEvent, RoundObserver, dispatch_all};
pub use movement::{Resolution, clamp_intent, resolve};
pub use shape::{
    Axis, Circle, Rect, Shape, circle_overlaps_circle, circle_overlaps_rect, rect_overlaps_rect,
};
pub use spawn::{SpawnArea, SpawnTimer, spawn_gem, spawn_gem_wave, spawn_hazard};
pub use state::{
    Avatar, CollectedGems, Direction, EntityIds, Gem, GemColor, Hazard, Round, RoundPhase,
};
pub use tick::{TickInput, autopilot, tick};
