//! Fixed timestep round tick
//!
//! Advances a round deterministically. Order within an active tick:
//! spawn timers, avatar movement, hazard motion, gem pickups, hazard hits,
//! the win check, then animation.

use glam::Vec2;

use super::animation::AnimationSignal;
use super::events::RoundEvent;
use super::movement::{clamp_intent, resolve};
use super::shape::circle_overlaps_rect;
use super::spawn::{SpawnArea, spawn_gem_wave, spawn_hazard};
use super::state::{Round, RoundPhase};

/// Autopilot stops steering on an axis once within this many pixels
const AUTOPILOT_DEADZONE: f32 = 2.0;
/// Extra clearance the autopilot keeps above and below a hazard's row
const DODGE_MARGIN: f32 = 6.0;
/// How far ahead (in seconds of hazard travel) the autopilot looks
const DODGE_LOOKAHEAD: f32 = 1.2;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement direction from the input device, each axis in [-1, 1]
    pub movement: Vec2,
    /// Demo mode - the simulation steers the avatar itself
    pub autopilot: bool,
}

/// Advance the round by `dt` seconds and return what happened
pub fn tick(round: &mut Round, input: &TickInput, dt: f32) -> Vec<RoundEvent> {
    let mut events = Vec::new();
    match round.phase {
        RoundPhase::Complete => {}
        RoundPhase::Dying => tick_dying(round, dt, &mut events),
        RoundPhase::Active => tick_active(round, input, dt, &mut events),
    }
    events
}

fn tick_dying(round: &mut Round, dt: f32, events: &mut Vec<RoundEvent>) {
    if round.avatar.animation.update(dt, false) == AnimationSignal::Finished {
        round.respawn();
        log::info!("Avatar respawned at {:?}", round.avatar.position);
        events.push(RoundEvent::Respawned);
    }
}

fn tick_active(round: &mut Round, input: &TickInput, dt: f32, events: &mut Vec<RoundEvent>) {
    round.elapsed += dt;

    // --- Spawning ---
    round.gem_timer.advance(dt);
    round.hazard_timer.advance(dt);

    if round.gem_timer.fire() {
        round.gems.clear();
        let area = SpawnArea {
            playable: &round.playable,
            obstacles: &round.obstacles,
            avatar: &round.avatar.bounds,
        };
        let wave = spawn_gem_wave(&mut round.rng, &area, &round.tuning, &mut round.ids);
        log::info!("Gem wave of {} at t={:.2}s", wave.len(), round.elapsed);
        events.push(RoundEvent::GemsSpawned { count: wave.len() });
        round.gems = wave;
    }

    if round.hazard_timer.fire() {
        let hazard = spawn_hazard(
            &mut round.rng,
            &round.arena,
            &round.playable,
            round.collected.count(),
            &round.tuning,
            &mut round.ids,
        );
        events.push(RoundEvent::HazardSpawned {
            id: hazard.id,
            direction: hazard.direction,
            speed: hazard.speed,
        });
        round.hazards.push(hazard);
    }

    // --- Avatar movement ---
    let steering = if input.autopilot {
        autopilot(round)
    } else {
        input.movement
    };
    let steering = if steering.is_finite() {
        steering.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
    } else {
        Vec2::ZERO
    };
    let intent = steering * round.tuning.avatar_speed * dt;
    let moving = clamp_intent(round.avatar.position, intent, &round.playable) != Vec2::ZERO;

    let resolved = resolve(
        round.avatar.position,
        &round.avatar.bounds,
        intent,
        &round.playable,
        &round.obstacles,
    );
    round.avatar.position = resolved.position;
    round.avatar.bounds = resolved.bounds;
    if steering.x < 0.0 {
        round.avatar.facing_left = true;
    } else if steering.x > 0.0 {
        round.avatar.facing_left = false;
    }

    // --- Hazard motion ---
    for hazard in &mut round.hazards {
        hazard.advance(dt);
    }
    let arena = round.arena;
    round.hazards.retain(|h| !h.has_left(&arena));

    // --- Gem pickups (every overlapping gem counts) ---
    let body = round.avatar.bounds;
    for gem in &mut round.gems {
        if !circle_overlaps_rect(&gem.shape(), &body) {
            continue;
        }
        gem.collected = true;
        let newly = round.collected.mark(gem.color);
        if newly {
            round.hazard_timer.ratchet(
                round.tuning.hazard_ratchet_factor,
                round.tuning.hazard_threshold_floor,
            );
            log::debug!(
                "New color {:?}, hazards now every {:.3}s",
                gem.color,
                round.hazard_timer.threshold()
            );
        }
        events.push(RoundEvent::Collected {
            color: gem.color,
            newly,
        });
    }
    round.gems.retain(|g| !g.collected);

    // --- Hazard hits (first one is enough) ---
    let hit = round
        .hazards
        .iter()
        .find(|h| circle_overlaps_rect(&h.shape(), &body))
        .map(|h| h.id);
    if let Some(id) = hit {
        round.reset_after_hit();
        log::info!(
            "Avatar hit by hazard {} at t={:.2}s (death {})",
            id,
            round.elapsed,
            round.deaths
        );
        events.push(RoundEvent::LethalHit);
        return;
    }

    // --- Win check ---
    if round.collected.is_complete() {
        round.phase = RoundPhase::Complete;
        let unlocks = round.stage.next();
        log::info!(
            "Stage {} complete at t={:.2}s after {} deaths",
            round.stage,
            round.elapsed,
            round.deaths
        );
        events.push(RoundEvent::RoundComplete {
            stage: round.stage,
            unlocks,
        });
    }

    // --- Animation ---
    round.avatar.animation.update(dt, moving);
    for gem in &mut round.gems {
        gem.animation.update(dt);
    }
    for hazard in &mut round.hazards {
        hazard.animation.update(dt);
    }
}

/// Demo-mode steering
///
/// Sidesteps the nearest hazard closing in on the avatar's row. Otherwise
/// heads for the nearest gem of a color still missing (any gem if none),
/// and drifts back to the start when the field is empty.
pub fn autopilot(round: &Round) -> Vec2 {
    let body = round.avatar.bounds;
    let center = round.avatar.position;

    let threat = round
        .hazards
        .iter()
        .filter_map(|h| {
            let c = h.shape();
            let in_row = c.center.y + c.radius + DODGE_MARGIN > body.top()
                && c.center.y - c.radius - DODGE_MARGIN < body.bottom();
            // Positive while the hazard is still approaching
            let ahead = (center.x - c.center.x) * h.direction.sign();
            let reach = h.speed * DODGE_LOOKAHEAD + c.radius + body.width;
            (in_row && ahead > -body.width && ahead < reach).then_some((ahead, c))
        })
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((_, c)) = threat {
        let playable = &round.playable;
        let mut dir = if center.y <= c.center.y { -1.0 } else { 1.0 };
        // Pinned against an edge, go the other way
        if (dir < 0.0 && center.y <= playable.top()) || (dir > 0.0 && center.y >= playable.bottom())
        {
            dir = -dir;
        }
        return Vec2::new(0.0, dir);
    }

    let nearest = |missing_only: bool| {
        round
            .gems
            .iter()
            .filter(|g| !missing_only || !round.collected.is_collected(g.color))
            .map(|g| g.shape().center)
            .min_by(|a, b| {
                a.distance_squared(center)
                    .partial_cmp(&b.distance_squared(center))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    };
    let target = nearest(true)
        .or_else(|| nearest(false))
        .unwrap_or(round.avatar.start());

    steer_toward(center, target)
}

fn steer_toward(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let axis = |d: f32| {
        if d.abs() > AUTOPILOT_DEADZONE {
            d.signum()
        } else {
            0.0
        }
    };
    Vec2::new(axis(delta.x), axis(delta.y))
}
