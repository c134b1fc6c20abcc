//! Timer-driven spawning of gems and hazards
//!
//! Two independent accumulator/threshold pairs gate the spawns. The spawn
//! functions only read the round's geometry and draw from the round's
//! generator; the controller decides what to do with the results.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::shape::{Rect, circle_overlaps_rect};
use super::state::{Direction, EntityIds, Gem, GemColor, Hazard};
use crate::tuning::Tuning;

/// Accumulator that fires each time it reaches its threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    accumulator: f32,
    threshold: f32,
    initial: f32,
}

impl SpawnTimer {
    pub fn new(threshold: f32) -> Self {
        Self {
            accumulator: 0.0,
            threshold,
            initial: threshold,
        }
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn advance(&mut self, dt: f32) {
        self.accumulator += dt;
    }

    /// Consume one threshold's worth of time if available
    pub fn fire(&mut self) -> bool {
        if self.accumulator >= self.threshold {
            self.accumulator -= self.threshold;
            true
        } else {
            false
        }
    }

    /// Shrink the threshold by `factor`, never below `floor` and never upward
    pub fn ratchet(&mut self, factor: f32, floor: f32) {
        let next = (self.threshold * factor).max(floor);
        self.threshold = next.min(self.threshold);
    }

    /// Zero the accumulator and restore the initial threshold
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.threshold = self.initial;
    }

    /// Fraction of the threshold still to wait
    pub fn remaining_fraction(&self) -> f32 {
        ((self.threshold - self.accumulator) / self.threshold).clamp(0.0, 1.0)
    }
}

/// Read-only view of the geometry a gem must keep clear of
#[derive(Debug, Clone, Copy)]
pub struct SpawnArea<'a> {
    pub playable: &'a Rect,
    pub obstacles: &'a [Rect],
    pub avatar: &'a Rect,
}

/// Place one gem by rejection sampling
///
/// The gem's center is drawn uniformly from the playable area inset by half
/// the sprite size. A candidate is rejected while its collision circle,
/// grown by the spawn margin, overlaps the avatar or any obstacle. Returns
/// `None` once the retry cap is used up.
pub fn spawn_gem<R: Rng>(
    rng: &mut R,
    area: &SpawnArea<'_>,
    tuning: &Tuning,
    ids: &mut EntityIds,
    color: Option<GemColor>,
) -> Option<Gem> {
    let color = color.unwrap_or_else(|| random_color(rng));
    let size = color.sprite_size();
    let centers = area.playable.inset(size / 2.0);

    for _ in 0..tuning.spawn_attempts {
        let center = Vec2::new(
            centers.left() + rng.random::<f32>() * centers.width,
            centers.top() + rng.random::<f32>() * centers.height,
        );
        let position = center - size / 2.0;
        let clearance = Gem::shape_at(color, position).grow(tuning.gem_spawn_margin);

        if circle_overlaps_rect(&clearance, area.avatar) {
            continue;
        }
        if area
            .obstacles
            .iter()
            .any(|o| circle_overlaps_rect(&clearance, o))
        {
            continue;
        }

        let gem = Gem::new(ids.allocate(), color, position);
        log::debug!("Gem {} ({:?}) at {:?}", gem.id, color, position);
        return Some(gem);
    }

    log::warn!(
        "No clear spot for a {:?} gem after {} attempts, skipping",
        color,
        tuning.spawn_attempts
    );
    None
}

/// Spawn a wave of between `gem_wave_min` and `gem_wave_max` random gems
///
/// Gems that cannot be placed are skipped, so the wave may come up short.
pub fn spawn_gem_wave<R: Rng>(
    rng: &mut R,
    area: &SpawnArea<'_>,
    tuning: &Tuning,
    ids: &mut EntityIds,
) -> Vec<Gem> {
    let count = rng.random_range(tuning.gem_wave_min..=tuning.gem_wave_max);
    (0..count)
        .filter_map(|_| spawn_gem(rng, area, tuning, ids, None))
        .collect()
}

/// Uniform draw over the six colors
pub fn random_color<R: Rng>(rng: &mut R) -> GemColor {
    GemColor::ALL[rng.random_range(0..GemColor::ALL.len())]
}

/// Launch a hazard from a random side of the arena
///
/// It starts just outside the left or right arena edge, heading for the
/// opposite side, with its center at a uniform height within the playable
/// area. Speed grows with the number of distinct colors collected.
pub fn spawn_hazard<R: Rng>(
    rng: &mut R,
    arena: &Rect,
    playable: &Rect,
    distinct_collected: usize,
    tuning: &Tuning,
    ids: &mut EntityIds,
) -> Hazard {
    let radius = tuning.hazard_radius;
    let from_right = rng.random_bool(0.5);
    let center_y = playable.top() + rng.random::<f32>() * playable.height;

    let (x, direction) = if from_right {
        (arena.right(), Direction::Left)
    } else {
        (arena.left() - 2.0 * radius, Direction::Right)
    };
    let speed = tuning.hazard_speed(distinct_collected);

    let hazard = Hazard::new(
        ids.allocate(),
        Vec2::new(x, center_y - radius),
        direction,
        speed,
        radius,
    );
    log::debug!(
        "Hazard {} heading {:?} at y={} speed={}",
        hazard.id,
        direction,
        center_y,
        speed
    );
    hazard
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playable() -> Rect {
        Rect::new(85.0, 80.0, 635.0, 285.0)
    }

    #[test]
    fn test_timer_fires_once_per_threshold() {
        let mut t = SpawnTimer::new(6.0);
        t.advance(5.5);
        assert!(!t.fire());
        t.advance(0.5);
        assert!(t.fire());
        assert_eq!(t.accumulator(), 0.0);
        assert!(!t.fire());
    }

    #[test]
    fn test_timer_keeps_overshoot() {
        let mut t = SpawnTimer::new(2.0);
        t.advance(2.5);
        assert!(t.fire());
        assert_eq!(t.accumulator(), 0.5);
        t.advance(1.5);
        assert!(t.fire());
    }

    #[test]
    fn test_ratchet_decays_to_floor_and_resets() {
        let mut t = SpawnTimer::new(2.0);
        t.ratchet(0.75, 0.33);
        assert_eq!(t.threshold(), 1.5);
        for _ in 0..20 {
            let before = t.threshold();
            t.ratchet(0.75, 0.33);
            assert!(t.threshold() <= before);
        }
        assert_eq!(t.threshold(), 0.33);

        t.advance(0.2);
        t.reset();
        assert_eq!(t.threshold(), 2.0);
        assert_eq!(t.accumulator(), 0.0);
    }

    #[test]
    fn test_ratchet_never_raises_threshold_below_floor() {
        let mut t = SpawnTimer::new(0.2);
        t.ratchet(0.75, 0.33);
        assert_eq!(t.threshold(), 0.2);
    }

    #[test]
    fn test_remaining_fraction() {
        let mut t = SpawnTimer::new(4.0);
        assert_eq!(t.remaining_fraction(), 1.0);
        t.advance(1.0);
        assert_eq!(t.remaining_fraction(), 0.75);
    }

    #[test]
    fn test_wave_size_and_clearance() {
        let tuning = Tuning::default();
        let playable = playable();
        let obstacles = vec![
            Rect::new(176.0, 146.0, 60.0, 270.0),
            Rect::new(347.0, 80.0, 60.0, 250.0),
            Rect::new(542.0, 146.0, 60.0, 270.0),
        ];
        let avatar = tuning.avatar_body(Vec2::new(672.0, 335.0));
        let area = SpawnArea {
            playable: &playable,
            obstacles: &obstacles,
            avatar: &avatar,
        };

        let mut rng = Pcg32::seed_from_u64(42);
        let mut ids = EntityIds::default();
        for _ in 0..200 {
            let wave = spawn_gem_wave(&mut rng, &area, &tuning, &mut ids);
            assert!((1..=5).contains(&wave.len()));
            for gem in &wave {
                let grown = gem.shape().grow(tuning.gem_spawn_margin);
                assert!(!circle_overlaps_rect(&grown, &avatar));
                for o in &obstacles {
                    assert!(!circle_overlaps_rect(&grown, o));
                }
                let c = gem.shape().center;
                assert!(c.x >= playable.left() && c.x <= playable.right());
                assert!(c.y >= playable.top() && c.y <= playable.bottom());
            }
        }
    }

    #[test]
    fn test_specified_color_is_used() {
        let tuning = Tuning::default();
        let playable = playable();
        let avatar = Rect::new(0.0, 0.0, 1.0, 1.0);
        let area = SpawnArea {
            playable: &playable,
            obstacles: &[],
            avatar: &avatar,
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ids = EntityIds::default();
        let gem = spawn_gem(&mut rng, &area, &tuning, &mut ids, Some(GemColor::Indigo)).unwrap();
        assert_eq!(gem.color, GemColor::Indigo);
        assert!(!gem.collected);
    }

    #[test]
    fn test_spawn_gives_up_when_area_is_blocked() {
        let tuning = Tuning::default();
        let playable = playable();
        let wall = Rect::new(0.0, 0.0, 800.0, 480.0);
        let obstacles = [wall];
        let avatar = Rect::new(0.0, 0.0, 1.0, 1.0);
        let area = SpawnArea {
            playable: &playable,
            obstacles: &obstacles,
            avatar: &avatar,
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let mut ids = EntityIds::default();
        assert!(spawn_gem(&mut rng, &area, &tuning, &mut ids, None).is_none());
        assert!(spawn_gem_wave(&mut rng, &area, &tuning, &mut ids).is_empty());
    }

    #[test]
    fn test_all_colors_appear() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = [false; 6];
        for _ in 0..500 {
            seen[random_color(&mut rng).index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_hazard_enters_from_an_edge() {
        let tuning = Tuning::default();
        let arena = Rect::new(0.0, 0.0, 800.0, 480.0);
        let playable = playable();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ids = EntityIds::default();
        let (mut lefts, mut rights) = (0, 0);

        for _ in 0..100 {
            let h = spawn_hazard(&mut rng, &arena, &playable, 2, &tuning, &mut ids);
            assert_eq!(h.speed, 160.0);
            let c = h.shape();
            assert!(c.center.y >= playable.top() && c.center.y <= playable.bottom());
            match h.direction {
                Direction::Left => {
                    rights += 1;
                    assert_eq!(h.position.x, arena.right());
                }
                Direction::Right => {
                    lefts += 1;
                    assert_eq!(c.center.x + c.radius, arena.left());
                }
            }
        }
        assert!(lefts > 0 && rights > 0);
    }
}
