//! Sprite animation state machines
//!
//! Each animated entity owns an elapsed-time accumulator and a discrete
//! frame index. The renderer maps the frame index to a sprite cell; nothing
//! here knows about textures.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Outcome of advancing a one-shot animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationSignal {
    /// Still playing (or cyclic)
    Running,
    /// A one-shot sequence has played out
    Finished,
}

/// Cyclic frame counter with a fixed frame duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameLoop {
    timer: f32,
    frame: u8,
    frame_time: f32,
    frames: u8,
}

impl FrameLoop {
    pub fn new(frame_time: f32, frames: u8) -> Self {
        Self {
            timer: 0.0,
            frame: 0,
            frame_time,
            frames: frames.max(1),
        }
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Advance by `dt`, wrapping modulo the frame count
    pub fn update(&mut self, dt: f32) {
        self.timer += dt;
        while self.timer >= self.frame_time {
            self.timer -= self.frame_time;
            self.frame = (self.frame + 1) % self.frames;
        }
    }

    pub fn restart(&mut self) {
        self.timer = 0.0;
        self.frame = 0;
    }
}

/// Avatar animation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AvatarPose {
    #[default]
    Idle,
    Moving,
    /// Terminal until the controller resets the avatar
    Dying,
}

/// Idle/Moving/Dying state machine for the avatar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvatarAnimation {
    pose: AvatarPose,
    cycle: FrameLoop,
    death_timer: f32,
    death_frame: u8,
}

impl Default for AvatarAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarAnimation {
    pub fn new() -> Self {
        Self {
            pose: AvatarPose::Idle,
            cycle: FrameLoop::new(AVATAR_IDLE_FRAME_TIME, AVATAR_CYCLE_FRAMES),
            death_timer: 0.0,
            death_frame: 0,
        }
    }

    pub fn pose(&self) -> AvatarPose {
        self.pose
    }

    pub fn is_dying(&self) -> bool {
        self.pose == AvatarPose::Dying
    }

    /// Current frame within the active pose
    pub fn frame(&self) -> u8 {
        match self.pose {
            AvatarPose::Dying => self.death_frame,
            _ => self.cycle.frame(),
        }
    }

    /// The last death frame is blank
    pub fn is_visible(&self) -> bool {
        !(self.pose == AvatarPose::Dying && self.death_frame >= AVATAR_DEATH_FRAMES)
    }

    /// Advance the animation
    ///
    /// `moving` is only consulted while alive. Switching between Idle and
    /// Moving restarts the cycle from frame 0.
    pub fn update(&mut self, dt: f32, moving: bool) -> AnimationSignal {
        match self.pose {
            AvatarPose::Dying => self.update_dying(dt),
            AvatarPose::Idle if moving => {
                self.enter(AvatarPose::Moving);
                AnimationSignal::Running
            }
            AvatarPose::Moving if !moving => {
                self.enter(AvatarPose::Idle);
                AnimationSignal::Running
            }
            _ => {
                self.cycle.update(dt);
                AnimationSignal::Running
            }
        }
    }

    fn update_dying(&mut self, dt: f32) -> AnimationSignal {
        self.death_timer += dt;
        while self.death_timer >= AVATAR_MOVE_FRAME_TIME {
            if self.death_frame >= AVATAR_DEATH_FRAMES {
                return AnimationSignal::Finished;
            }
            self.death_timer -= AVATAR_MOVE_FRAME_TIME;
            self.death_frame += 1;
        }
        AnimationSignal::Running
    }

    fn enter(&mut self, pose: AvatarPose) {
        self.pose = pose;
        self.cycle = match pose {
            AvatarPose::Moving => FrameLoop::new(AVATAR_MOVE_FRAME_TIME, AVATAR_CYCLE_FRAMES),
            _ => FrameLoop::new(AVATAR_IDLE_FRAME_TIME, AVATAR_CYCLE_FRAMES),
        };
    }

    /// Start the death sequence (ignored if already dying)
    pub fn start_dying(&mut self) {
        if self.pose != AvatarPose::Dying {
            self.pose = AvatarPose::Dying;
            self.death_timer = 0.0;
            self.death_frame = 0;
        }
    }

    /// Back to Idle, frame 0
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Gem shimmer: a burst of primary frames with a sparkle overlay, then a pause
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GemAnimation {
    timer: f32,
    /// `GEM_FRAMES` means resting between bursts
    frame: u8,
    sparkle: Option<u8>,
}

impl Default for GemAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl GemAnimation {
    /// Gems start at rest
    pub fn new() -> Self {
        Self {
            timer: 0.0,
            frame: GEM_FRAMES,
            sparkle: None,
        }
    }

    /// Primary frame, clamped to the last frame while resting
    pub fn frame(&self) -> u8 {
        self.frame.min(GEM_FRAMES - 1)
    }

    pub fn is_resting(&self) -> bool {
        self.frame >= GEM_FRAMES && self.sparkle.is_none()
    }

    pub fn sparkle_frame(&self) -> Option<u8> {
        self.sparkle
    }

    pub fn update(&mut self, dt: f32) {
        self.timer += dt;
        loop {
            let step = if self.is_resting() {
                GEM_PAUSE_TIME
            } else {
                GEM_FRAME_TIME
            };
            if self.timer < step {
                break;
            }
            self.timer -= step;

            if self.is_resting() {
                self.frame = 0;
                continue;
            }

            if let Some(s) = self.sparkle {
                let next = s + 1;
                self.sparkle = (next < SPARKLE_FRAMES).then_some(next);
            }
            if self.frame < GEM_FRAMES {
                self.frame += 1;
                if self.frame == SPARKLE_START_FRAME + 1 && self.sparkle.is_none() {
                    self.sparkle = Some(0);
                }
            }
        }
    }
}

/// Hazard flicker: a two-frame loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardAnimation(FrameLoop);

impl Default for HazardAnimation {
    fn default() -> Self {
        Self(FrameLoop::new(HAZARD_FRAME_TIME, HAZARD_FRAMES))
    }
}

impl HazardAnimation {
    pub fn frame(&self) -> u8 {
        self.0.frame()
    }

    pub fn update(&mut self, dt: f32) {
        self.0.update(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_loop_wraps_and_catches_up() {
        let mut l = FrameLoop::new(0.25, 2);
        l.update(0.25);
        assert_eq!(l.frame(), 1);
        l.update(0.25);
        assert_eq!(l.frame(), 0);
        // Large dt advances several frames at once
        l.update(0.75);
        assert_eq!(l.frame(), 1);
    }

    #[test]
    fn test_hazard_flicker() {
        let mut a = HazardAnimation::default();
        a.update(0.1);
        assert_eq!(a.frame(), 0);
        a.update(0.125);
        assert_eq!(a.frame(), 1);
        a.update(0.25);
        assert_eq!(a.frame(), 0);
    }

    #[test]
    fn test_avatar_idle_to_moving_restarts_cycle() {
        let mut a = AvatarAnimation::new();
        a.update(0.5, false);
        assert_eq!(a.pose(), AvatarPose::Idle);
        assert_eq!(a.frame(), 2);

        a.update(0.016, true);
        assert_eq!(a.pose(), AvatarPose::Moving);
        assert_eq!(a.frame(), 0);

        a.update(0.25, true);
        assert_eq!(a.frame(), 2);

        a.update(0.016, false);
        assert_eq!(a.pose(), AvatarPose::Idle);
        assert_eq!(a.frame(), 0);
    }

    #[test]
    fn test_avatar_cycle_wraps() {
        let mut a = AvatarAnimation::new();
        a.update(0.125, true);
        for _ in 0..11 {
            a.update(0.125, true);
        }
        // 11 * 0.125 = 1.375s at 0.1s per frame -> 13 frames, wraps to 3
        assert_eq!(a.frame(), 3);
    }

    #[test]
    fn test_dying_ignores_input_and_finishes() {
        let mut a = AvatarAnimation::new();
        a.start_dying();
        assert!(a.is_dying());

        // 10 frames of 0.125 > 0.1: advances one frame per update
        for expected in 1..=8 {
            assert_eq!(a.update(0.125, true), AnimationSignal::Running);
            assert_eq!(a.pose(), AvatarPose::Dying);
            assert!(a.frame() >= expected);
        }

        let mut finished = false;
        for _ in 0..10 {
            if a.update(0.125, true) == AnimationSignal::Finished {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert!(!a.is_visible());
        assert_eq!(a.frame(), AVATAR_DEATH_FRAMES);
    }

    #[test]
    fn test_death_takes_eleven_frame_periods() {
        let mut a = AvatarAnimation::new();
        a.start_dying();
        assert_eq!(a.update(1.0, false), AnimationSignal::Running);
        assert_eq!(a.update(0.125, false), AnimationSignal::Finished);
    }

    #[test]
    fn test_start_dying_is_idempotent() {
        let mut a = AvatarAnimation::new();
        a.start_dying();
        a.update(0.25, false);
        let frame = a.frame();
        a.start_dying();
        assert_eq!(a.frame(), frame);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut a = AvatarAnimation::new();
        a.start_dying();
        a.update(2.0, false);
        a.reset();
        assert_eq!(a.pose(), AvatarPose::Idle);
        assert_eq!(a.frame(), 0);
        assert!(a.is_visible());
    }

    #[test]
    fn test_gem_rests_then_bursts_with_sparkle() {
        let mut g = GemAnimation::new();
        assert!(g.is_resting());

        g.update(0.5);
        assert!(g.is_resting());

        // Pause ends at 1.0s
        g.update(0.5);
        assert!(!g.is_resting());
        assert_eq!(g.frame(), 0);
        assert_eq!(g.sparkle_frame(), None);

        // Six frames in, the sparkle starts
        for _ in 0..6 {
            g.update(GEM_FRAME_TIME);
        }
        assert_eq!(g.frame(), 6);
        assert_eq!(g.sparkle_frame(), Some(0));
    }

    #[test]
    fn test_gem_burst_completes_and_rests_again() {
        let mut g = GemAnimation::new();
        g.update(GEM_PAUSE_TIME);
        // Sparkle starts at step 6 and lasts 10 steps, so the burst is 16 steps
        for _ in 0..16 {
            assert!(!g.is_resting());
            g.update(GEM_FRAME_TIME * 1.001);
        }
        assert!(g.is_resting());
        assert_eq!(g.sparkle_frame(), None);
        assert_eq!(g.frame(), GEM_FRAMES - 1);
    }
}
