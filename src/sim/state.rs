//! Round state and entity types
//!
//! Everything a round mutates per tick lives in [`Round`]. Gems and hazards
//! are owned exclusively by its lists; removing one destroys it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::{AvatarAnimation, GemAnimation, HazardAnimation};
use super::shape::{Circle, Rect};
use super::spawn::SpawnTimer;
use crate::consts::GEM_COLOR_COUNT;
use crate::error::LevelError;
use crate::level::{LevelConfig, StageId};
use crate::progress::Progress;
use crate::tuning::Tuning;

/// Phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Normal simulation
    Active,
    /// Death animation playing; nothing spawns or collides
    Dying,
    /// All six colors collected (terminal)
    Complete,
}

/// Gem colors; the discriminant is the collected-slot index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GemColor {
    Red = 0,
    Yellow = 1,
    Green = 2,
    Blue = 3,
    Indigo = 4,
    Purple = 5,
}

impl GemColor {
    pub const ALL: [GemColor; GEM_COLOR_COUNT] = [
        GemColor::Red,
        GemColor::Yellow,
        GemColor::Green,
        GemColor::Blue,
        GemColor::Indigo,
        GemColor::Purple,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Sprite size in pixels (width, height)
    pub fn sprite_size(self) -> Vec2 {
        match self {
            GemColor::Red => Vec2::new(28.0, 28.0),
            GemColor::Yellow => Vec2::new(20.0, 30.0),
            GemColor::Green => Vec2::new(18.0, 30.0),
            GemColor::Blue => Vec2::new(19.0, 22.0),
            GemColor::Indigo => Vec2::new(24.0, 26.0),
            GemColor::Purple => Vec2::new(27.0, 26.0),
        }
    }

    /// Frames in this color's sprite strip
    pub fn frame_count(self) -> u8 {
        match self {
            GemColor::Red | GemColor::Yellow | GemColor::Blue => 11,
            GemColor::Green | GemColor::Indigo | GemColor::Purple => 10,
        }
    }
}

/// The six collected-color slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedGems([bool; GEM_COLOR_COUNT]);

impl CollectedGems {
    pub fn is_collected(&self, color: GemColor) -> bool {
        self.0[color.index()]
    }

    /// Mark a color; returns true if it was not already marked
    pub fn mark(&mut self, color: GemColor) -> bool {
        let slot = &mut self.0[color.index()];
        let newly = !*slot;
        *slot = true;
        newly
    }

    /// Distinct colors collected
    pub fn count(&self) -> usize {
        self.0.iter().filter(|c| **c).count()
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|c| *c)
    }

    pub fn clear(&mut self) {
        self.0 = [false; GEM_COLOR_COUNT];
    }

    pub fn as_array(&self) -> [bool; GEM_COLOR_COUNT] {
        self.0
    }
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    /// Center of the sprite
    pub position: Vec2,
    /// Collision box (kept in lockstep with `position`)
    pub bounds: Rect,
    /// Sprite faces left (flipped)
    pub facing_left: bool,
    pub animation: AvatarAnimation,
    start: Vec2,
}

impl Avatar {
    pub fn new(start: Vec2, tuning: &Tuning) -> Self {
        Self {
            position: start,
            bounds: tuning.avatar_body(start),
            facing_left: true,
            animation: AvatarAnimation::new(),
            start,
        }
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn is_alive(&self) -> bool {
        !self.animation.is_dying()
    }

    /// Back to the start position, idle, facing left
    pub fn restart(&mut self, tuning: &Tuning) {
        *self = Self::new(self.start, tuning);
    }
}

/// A collectible gem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gem {
    pub id: u32,
    pub color: GemColor,
    /// Top-left corner of the sprite
    pub position: Vec2,
    pub collected: bool,
    pub animation: GemAnimation,
}

impl Gem {
    pub fn new(id: u32, color: GemColor, position: Vec2) -> Self {
        Self {
            id,
            color,
            position,
            collected: false,
            animation: GemAnimation::new(),
        }
    }

    /// Collision circle centered on the sprite
    pub fn shape(&self) -> Circle {
        Self::shape_at(self.color, self.position)
    }

    /// Primary frame within this color's sprite strip
    pub fn frame(&self) -> u8 {
        self.animation.frame().min(self.color.frame_count() - 1)
    }

    pub fn shape_at(color: GemColor, position: Vec2) -> Circle {
        let size = color.sprite_size();
        Circle::new(position + size / 2.0, (size.x + size.y) / 4.0)
    }
}

/// Horizontal travel direction of a hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// A projectile crossing the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    /// Top-left corner of the sprite (a 2r square)
    pub position: Vec2,
    pub direction: Direction,
    /// Pixels per second
    pub speed: f32,
    pub radius: f32,
    pub animation: HazardAnimation,
}

impl Hazard {
    pub fn new(id: u32, position: Vec2, direction: Direction, speed: f32, radius: f32) -> Self {
        Self {
            id,
            position,
            direction,
            speed,
            radius,
            animation: HazardAnimation::default(),
        }
    }

    pub fn shape(&self) -> Circle {
        Circle::new(self.position + Vec2::splat(self.radius), self.radius)
    }

    /// Move along the travel direction
    pub fn advance(&mut self, dt: f32) {
        self.position.x += self.direction.sign() * self.speed * dt;
    }

    /// True once the hazard is entirely past the arena edge it is heading for
    pub fn has_left(&self, arena: &Rect) -> bool {
        match self.direction {
            Direction::Left => self.position.x + 2.0 * self.radius < arena.left(),
            Direction::Right => self.position.x > arena.right(),
        }
    }
}

/// Monotonic entity ID allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Authoritative state of one round
#[derive(Debug, Clone)]
pub struct Round {
    pub stage: StageId,
    /// Seed the round's generator was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: RoundPhase,
    pub avatar: Avatar,
    /// Live gems (sorted by id)
    pub gems: Vec<Gem>,
    /// Live hazards (sorted by id)
    pub hazards: Vec<Hazard>,
    pub collected: CollectedGems,
    pub gem_timer: SpawnTimer,
    pub hazard_timer: SpawnTimer,
    /// Seconds of simulated time since activation
    pub elapsed: f32,
    /// Deaths so far this round
    pub deaths: u32,
    pub(crate) rng: Pcg32,
    pub(crate) ids: EntityIds,
    pub(crate) arena: Rect,
    pub(crate) playable: Rect,
    pub(crate) obstacles: Vec<Rect>,
}

impl Round {
    /// Activate a stage for play
    ///
    /// Fails if the stage is still locked in `progress` or the level breaks
    /// a precondition of the simulation.
    pub fn activate(
        level: &LevelConfig,
        progress: &Progress,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, LevelError> {
        if !progress.is_unlocked(level.stage) {
            return Err(LevelError::StageLocked(level.stage));
        }
        Self::new(level, tuning, seed)
    }

    /// Create a round without consulting the save state
    pub fn new(level: &LevelConfig, tuning: Tuning, seed: u64) -> Result<Self, LevelError> {
        level.validate(&tuning)?;

        log::info!(
            "Stage {} activated: seed={}, gems every {}s, hazards every {}s, {} obstacles",
            level.stage,
            seed,
            level.gem_threshold,
            level.hazard_threshold,
            level.obstacles.len()
        );

        Ok(Self {
            stage: level.stage,
            seed,
            avatar: Avatar::new(level.avatar_start, &tuning),
            tuning,
            phase: RoundPhase::Active,
            gems: Vec::new(),
            hazards: Vec::new(),
            collected: CollectedGems::default(),
            gem_timer: SpawnTimer::new(level.gem_threshold),
            hazard_timer: SpawnTimer::new(level.hazard_threshold),
            elapsed: 0.0,
            deaths: 0,
            rng: Pcg32::seed_from_u64(seed),
            ids: EntityIds::default(),
            arena: level.arena,
            playable: level.playable,
            obstacles: level.obstacles.clone(),
        })
    }

    pub fn arena(&self) -> &Rect {
        &self.arena
    }

    pub fn playable(&self) -> &Rect {
        &self.playable
    }

    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RoundPhase::Complete
    }

    /// Fraction of the gem wait still to go (1.0 right after a wave)
    pub fn gem_timer_remaining(&self) -> f32 {
        self.gem_timer.remaining_fraction()
    }

    /// Lethal hit: wipe the field and progress, start the death animation
    pub(crate) fn reset_after_hit(&mut self) {
        self.gems.clear();
        self.hazards.clear();
        self.gem_timer.reset();
        self.hazard_timer.reset();
        self.collected.clear();
        self.avatar.animation.start_dying();
        self.phase = RoundPhase::Dying;
        self.deaths += 1;
    }

    /// Death animation done: avatar back at its start
    pub(crate) fn respawn(&mut self) {
        self.avatar.restart(&self.tuning);
        self.phase = RoundPhase::Active;
    }
}
