//! Avatar movement against static obstacles
//!
//! Movement is resolved one axis at a time so the avatar slides along a
//! wall instead of stopping dead when it pushes into it diagonally.

use glam::Vec2;

use super::shape::{Axis, Rect, rect_overlaps_rect};

/// Result of resolving one tick of movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// New avatar center
    pub position: Vec2,
    /// New collision box
    pub bounds: Rect,
    /// Displacement actually applied
    pub applied: Vec2,
}

/// Soft boundary clamp
///
/// Once the avatar's center is past an edge of the playable area, intent
/// that would take it further out along that axis is dropped. Intent back
/// toward the inside is untouched.
pub fn clamp_intent(position: Vec2, intent: Vec2, playable: &Rect) -> Vec2 {
    let mut clamped = intent;
    if (position.x < playable.left() && clamped.x < 0.0)
        || (position.x > playable.right() && clamped.x > 0.0)
    {
        clamped.x = 0.0;
    }
    if (position.y < playable.top() && clamped.y < 0.0)
        || (position.y > playable.bottom() && clamped.y > 0.0)
    {
        clamped.y = 0.0;
    }
    clamped
}

/// Resolve a movement intent against the obstacle set
///
/// `intent` is the displacement for this tick (already scaled by speed and
/// dt). Three candidates are tested against every obstacle in one pass:
/// horizontal-only, vertical-only and combined. A single-axis hit blocks
/// only that axis. A combined hit on an obstacle that neither single-axis
/// candidate touches is a corner, and blocks both axes.
pub fn resolve(
    position: Vec2,
    bounds: &Rect,
    intent: Vec2,
    playable: &Rect,
    obstacles: &[Rect],
) -> Resolution {
    let intent = clamp_intent(position, intent, playable);

    let moved_x = bounds.shift(Axis::Horizontal, intent.x);
    let moved_y = bounds.shift(Axis::Vertical, intent.y);
    let moved_both = moved_x.shift(Axis::Vertical, intent.y);

    let mut valid_x = intent.x != 0.0;
    let mut valid_y = intent.y != 0.0;
    let mut corner = false;

    for obstacle in obstacles {
        let hit_x = rect_overlaps_rect(obstacle, &moved_x);
        let hit_y = rect_overlaps_rect(obstacle, &moved_y);
        if hit_x {
            valid_x = false;
        }
        if hit_y {
            valid_y = false;
        }
        if !hit_x && !hit_y && rect_overlaps_rect(obstacle, &moved_both) {
            corner = true;
            break;
        }
    }

    match (valid_x && !corner, valid_y && !corner) {
        (true, true) => Resolution {
            position: position + intent,
            bounds: moved_both,
            applied: intent,
        },
        (true, false) => Resolution {
            position: position + Vec2::new(intent.x, 0.0),
            bounds: moved_x,
            applied: Vec2::new(intent.x, 0.0),
        },
        (false, true) => Resolution {
            position: position + Vec2::new(0.0, intent.y),
            bounds: moved_y,
            applied: Vec2::new(0.0, intent.y),
        },
        (false, false) => Resolution {
            position,
            bounds: *bounds,
            applied: Vec2::ZERO,
        },
    }
}
