use bevy::math::{Vec2, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::f32::consts::TAU;

use crate::config::BubbleTuning;
use crate::touch::forces;
use crate::touch::haptics::Theme;
use crate::touch::tracker::{TouchId, TouchSnapshot};

/// Force weights used when combining into the velocity
const GRAVITY_WEIGHT: f32 = 0.7;
const ORBIT_WEIGHT: f32 = 0.2;
const CHAOS_WEIGHT: f32 = 1.0;
const REPULSION_WEIGHT: f32 = 0.3;

const BREATHING_STEP: f32 = 0.1;
const BREATHING_AMPLITUDE: f32 = 0.3;

/// Length of one physics tick when driven by `step`
pub const TICK_SECS: f32 = 1.0 / 60.0;
/// Ticks `step` will run per call before dropping time
const MAX_TICKS_PER_STEP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BubbleId(pub u64);

/// A particle swirling around the touch that spawned it
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: BubbleId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub base_size: f32,
    pub breathing_phase: f32,
    pub breathing_speed: f32,
    /// 0.0..=1.0
    pub opacity: f32,
    pub color: Vec4,
    pub touch_id: TouchId,
}

impl Bubble {
    /// Rendered diameter, pulsing with the breathing phase
    pub fn size(&self) -> f32 {
        self.base_size * (1.0 + BREATHING_AMPLITUDE * self.breathing_phase.sin())
    }

    pub fn radius(&self) -> f32 {
        self.size() * 0.5
    }

    /// Is `point` within this bubble's radius plus `tolerance`?
    pub fn overlaps(&self, point: Vec2, tolerance: f32) -> bool {
        self.position.distance(point) <= self.radius() + tolerance
    }
}

/// What changed during an `update_touches` call
#[derive(Debug, Clone, Default)]
pub struct TouchUpdate {
    /// Touches that received a bubble batch, in seeding order
    pub seeded: Vec<TouchId>,
    /// Bubbles whose touch ended; the presentation layer fades them out
    pub retired: Vec<Bubble>,
}

/// Bubble simulation in screen space (top-left origin, `bounds` = screen size)
#[derive(Debug)]
pub struct BubbleField {
    tuning: BubbleTuning,
    bounds: Vec2,
    touches: TouchSnapshot,
    /// Touches that already received their batch, with their colour slot
    seeded: BTreeMap<TouchId, usize>,
    bubbles: Vec<Bubble>,
    next_id: u64,
    rng: StdRng,
    accumulator: f32,
}

impl BubbleField {
    pub fn new(tuning: BubbleTuning, bounds: Vec2) -> Self {
        Self::with_rng(tuning, bounds, StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic field for tests
    #[cfg(test)]
    pub fn with_seed(tuning: BubbleTuning, bounds: Vec2, seed: u64) -> Self {
        Self::with_rng(tuning, bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tuning: BubbleTuning, bounds: Vec2, rng: StdRng) -> Self {
        BubbleField {
            tuning,
            bounds,
            touches: TouchSnapshot::new(),
            seeded: BTreeMap::new(),
            bubbles: Vec::new(),
            next_id: 0,
            rng,
            accumulator: 0.0,
        }
    }

    // === Queries ===

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    // === Mutation ===

    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    /// Replace the tracked touches: seed new ones, retire bubbles of lifted ones
    pub fn update_touches(&mut self, touches: &TouchSnapshot, theme: Theme) -> TouchUpdate {
        let mut update = TouchUpdate::default();

        // Retire bubbles whose touch is gone
        let (kept, retired): (Vec<_>, Vec<_>) = std::mem::take(&mut self.bubbles)
            .into_iter()
            .partition(|b| touches.contains(b.touch_id));
        self.bubbles = kept;
        update.retired = retired;
        self.seeded.retain(|id, _| touches.contains(*id));

        if !update.retired.is_empty() {
            log::debug!("retired {} bubbles", update.retired.len());
        }

        let new_touches: Vec<_> = touches
            .iter()
            .filter(|(id, _)| !self.seeded.contains_key(id))
            .take(self.tuning.max_new_touches_per_update)
            .collect();

        for (id, position) in new_touches {
            let slot = self.free_slot();
            let color = theme.touch_color(slot);
            for _ in 0..self.tuning.bubble_count {
                let bubble = self.spawn_bubble(id, position, color);
                self.bubbles.push(bubble);
            }
            self.seeded.insert(id, slot);
            update.seeded.push(id);
            log::debug!(
                "seeded {} {} bubbles for touch {} at {:?}",
                self.tuning.bubble_count,
                theme,
                id,
                position
            );
        }

        self.touches = touches.clone();
        update
    }

    /// Lowest colour slot no live touch holds
    fn free_slot(&self) -> usize {
        (0..=self.seeded.len())
            .find(|slot| !self.seeded.values().any(|taken| taken == slot))
            .unwrap_or(self.seeded.len())
    }

    fn spawn_bubble(&mut self, touch_id: TouchId, position: Vec2, color: Vec4) -> Bubble {
        let t = self.tuning;
        let rng = &mut self.rng;

        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random_range(t.spawn_speed.0..=t.spawn_speed.1);

        let bubble = Bubble {
            id: BubbleId(self.next_id),
            position,
            velocity: Vec2::from_angle(angle) * speed,
            base_size: rng.random_range(t.base_size.0..=t.base_size.1),
            breathing_phase: rng.random_range(0.0..TAU),
            breathing_speed: rng.random_range(t.breathing_speed.0..=t.breathing_speed.1),
            opacity: rng.random_range(t.opacity.0..=t.opacity.1),
            color,
            touch_id,
        };
        self.next_id += 1;
        bubble
    }

    /// Advance the simulation by one tick
    pub fn update_physics(&mut self) {
        let t = self.tuning;
        let bounds = self.bounds;

        // Collect positions first so every bubble sees the same frame
        let positions: Vec<(BubbleId, Vec2)> =
            self.bubbles.iter().map(|b| (b.id, b.position)).collect();

        for bubble in &mut self.bubbles {
            bubble.breathing_phase =
                (bubble.breathing_phase + BREATHING_STEP * bubble.breathing_speed).rem_euclid(TAU);

            let Some(touch) = self.touches.get(bubble.touch_id) else {
                // Owner gone this tick: hold position
                continue;
            };

            let gravity = forces::gravity(bubble.position, touch, t.pull_strength);
            let orbital = forces::orbital(bubble.position, touch, t.orbit_speed);
            let chaos = forces::chaos(&mut self.rng, t.chaos_strength);
            let neighbours = positions
                .iter()
                .filter(|(id, _)| *id != bubble.id)
                .map(|&(_, pos)| pos);
            let repulsion = forces::repulsion(bubble.position, neighbours, t.repulsion_radius)
                * t.repulsion_strength;

            bubble.velocity += gravity * GRAVITY_WEIGHT
                + orbital * ORBIT_WEIGHT
                + chaos * CHAOS_WEIGHT
                + repulsion * REPULSION_WEIGHT;

            bubble.velocity *= t.damping;
            bubble.velocity = bubble.velocity.clamp_length_max(t.max_speed);

            // Clamp to the screen without bouncing
            let radius = bubble.radius();
            let next = bubble.position + bubble.velocity;
            bubble.position = Vec2::new(
                clamp_axis(next.x, radius, bounds.x),
                clamp_axis(next.y, radius, bounds.y),
            );
        }
    }

    /// Run as many fixed ticks as `dt` covers; returns ticks run
    pub fn step(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);

        let mut ticks = 0;
        while self.accumulator >= TICK_SECS && ticks < MAX_TICKS_PER_STEP {
            self.update_physics();
            self.accumulator -= TICK_SECS;
            ticks += 1;
        }

        // Drop time we could not catch up on
        if ticks == MAX_TICKS_PER_STEP {
            self.accumulator = self.accumulator.min(TICK_SECS * 0.5);
        }
        ticks
    }

    /// Remove every bubble and touch immediately, no fade
    pub fn clear_all(&mut self) {
        log::debug!("cleared {} bubbles", self.bubbles.len());
        self.bubbles.clear();
        self.touches = TouchSnapshot::new();
        self.seeded.clear();
        self.accumulator = 0.0;
    }
}

/// Keep `value` within `[radius, extent - radius]`, centring when it cannot fit
fn clamp_axis(value: f32, radius: f32, extent: f32) -> f32 {
    if extent <= radius * 2.0 {
        extent * 0.5
    } else {
        value.clamp(radius, extent - radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::presets;

    const SCREEN: Vec2 = Vec2::new(390.0, 844.0);

    fn field() -> BubbleField {
        BubbleField::with_seed(presets::CALM, SCREEN, 42)
    }

    #[test]
    fn test_new_touch_spawns_batch_at_touch() {
        let mut field = field();
        let touches = TouchSnapshot::new().with(0, Vec2::new(100.0, 100.0));

        let update = field.update_touches(&touches, Theme::Dawn);

        assert_eq!(update.seeded, vec![TouchId(0)]);
        assert_eq!(field.bubbles().len(), 8);
        for bubble in field.bubbles() {
            assert_eq!(bubble.position, Vec2::new(100.0, 100.0));
            assert_eq!(bubble.touch_id, TouchId(0));
            assert_eq!(bubble.color, Theme::Dawn.touch_color(0));
            assert!((0.6..=1.0).contains(&bubble.opacity));
            let speed = bubble.velocity.length();
            assert!(speed >= 2.0 - 1e-4 && speed <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_existing_touch_is_not_reseeded() {
        let mut field = field();
        let touches = TouchSnapshot::new().with(0, Vec2::new(100.0, 100.0));
        field.update_touches(&touches, Theme::Dawn);

        let moved = TouchSnapshot::new().with(0, Vec2::new(120.0, 100.0));
        let update = field.update_touches(&moved, Theme::Dawn);

        assert!(update.seeded.is_empty());
        assert_eq!(field.bubbles().len(), 8);
    }

    #[test]
    fn test_spawn_capped_per_call() {
        let mut field = field();
        let touches = TouchSnapshot::new()
            .with(1, Vec2::new(50.0, 50.0))
            .with(2, Vec2::new(150.0, 50.0))
            .with(3, Vec2::new(250.0, 50.0));

        let first = field.update_touches(&touches, Theme::Tide);
        assert_eq!(first.seeded, vec![TouchId(1), TouchId(2)]);
        assert_eq!(field.bubbles().len(), 16);
        assert!(field.bubbles().iter().all(|b| b.touch_id != TouchId(3)));

        let second = field.update_touches(&touches, Theme::Tide);
        assert_eq!(second.seeded, vec![TouchId(3)]);
        assert_eq!(field.bubbles().len(), 24);
    }

    #[test]
    fn test_lifted_touch_retires_its_bubbles() {
        let mut field = field();
        let both = TouchSnapshot::new()
            .with(0, Vec2::new(100.0, 100.0))
            .with(1, Vec2::new(200.0, 300.0));
        field.update_touches(&both, Theme::Dawn);
        field.update_physics();

        let only_one = TouchSnapshot::new().with(1, Vec2::new(200.0, 300.0));
        let update = field.update_touches(&only_one, Theme::Dawn);

        assert_eq!(update.retired.len(), 8);
        assert!(update.retired.iter().all(|b| b.touch_id == TouchId(0)));
        assert!(field.bubbles().iter().all(|b| b.touch_id == TouchId(1)));
        assert_eq!(field.bubbles().len(), 8);
    }

    #[test]
    fn test_relanded_id_gets_fresh_batch() {
        let mut field = field();
        let touches = TouchSnapshot::new().with(4, Vec2::new(100.0, 100.0));
        field.update_touches(&touches, Theme::Dawn);
        field.update_touches(&TouchSnapshot::new(), Theme::Dawn);
        assert!(field.bubbles().is_empty());

        let update = field.update_touches(&touches, Theme::Dawn);
        assert_eq!(update.seeded, vec![TouchId(4)]);
        assert_eq!(field.bubbles().len(), 8);
    }

    #[test]
    fn test_speed_never_exceeds_max() {
        let tuning = BubbleTuning {
            chaos_strength: 5.0,
            pull_strength: 10.0,
            spawn_speed: (20.0, 30.0),
            ..presets::CALM
        };
        let mut field = BubbleField::with_seed(tuning, SCREEN, 3);
        let touches = TouchSnapshot::new()
            .with(0, Vec2::new(30.0, 30.0))
            .with(1, Vec2::new(300.0, 700.0));
        field.update_touches(&touches, Theme::Ember);

        for _ in 0..240 {
            field.update_physics();
            for bubble in field.bubbles() {
                assert!(bubble.velocity.length() <= tuning.max_speed + 1e-3);
            }
        }
    }

    #[test]
    fn test_positions_stay_on_screen() {
        let mut field = field();
        // Touches in the corners push bubbles against the walls
        let touches = TouchSnapshot::new()
            .with(0, Vec2::new(0.0, 0.0))
            .with(1, Vec2::new(SCREEN.x, SCREEN.y));
        field.update_touches(&touches, Theme::Dusk);

        for _ in 0..300 {
            field.update_physics();
            for bubble in field.bubbles() {
                let r = bubble.radius();
                assert!(bubble.position.x >= r - 1e-3 && bubble.position.x <= SCREEN.x - r + 1e-3);
                assert!(bubble.position.y >= r - 1e-3 && bubble.position.y <= SCREEN.y - r + 1e-3);
            }
        }
    }

    #[test]
    fn test_missing_touch_holds_position() {
        let mut field = field();
        let touches = TouchSnapshot::new().with(0, Vec2::new(100.0, 100.0));
        field.update_touches(&touches, Theme::Dawn);
        field.update_physics();

        field.touches = TouchSnapshot::new();
        let before = field.bubbles().to_vec();
        field.update_physics();

        for (old, new) in before.iter().zip(field.bubbles()) {
            assert_eq!(old.position, new.position);
            assert_eq!(old.velocity, new.velocity);
            assert_ne!(old.breathing_phase, new.breathing_phase);
        }
    }

    #[test]
    fn test_touch_colour_independent_of_frame_timing() {
        let first = TouchSnapshot::new().with(0, Vec2::new(100.0, 100.0));
        let both = first.clone().with(1, Vec2::new(200.0, 100.0));
        let colours = |field: &BubbleField, id: u64| -> Vec<Vec4> {
            field
                .bubbles()
                .iter()
                .filter(|b| b.touch_id == TouchId(id))
                .map(|b| b.color)
                .collect()
        };

        // Both fingers land in the same frame
        let mut together = field();
        together.update_touches(&both, Theme::Dusk);

        // Second finger lands a frame later
        let mut staggered = field();
        staggered.update_touches(&first, Theme::Dusk);
        staggered.update_touches(&both, Theme::Dusk);

        for field in [&together, &staggered] {
            assert!(colours(field, 0).iter().all(|c| *c == Theme::Dusk.touch_color(0)));
            assert!(colours(field, 1).iter().all(|c| *c == Theme::Dusk.touch_color(1)));
        }
        assert_ne!(Theme::Dusk.touch_color(0), Theme::Dusk.touch_color(1));
    }

    #[test]
    fn test_lifted_touch_frees_its_colour() {
        let mut field = field();
        let both = TouchSnapshot::new()
            .with(0, Vec2::new(100.0, 100.0))
            .with(1, Vec2::new(200.0, 100.0));
        field.update_touches(&both, Theme::Moss);

        let regrip = TouchSnapshot::new()
            .with(1, Vec2::new(200.0, 100.0))
            .with(2, Vec2::new(300.0, 100.0));
        field.update_touches(&regrip, Theme::Moss);

        let new_touch = field.bubbles().iter().find(|b| b.touch_id == TouchId(2));
        assert_eq!(new_touch.map(|b| b.color), Some(Theme::Moss.touch_color(0)));
    }

    /// Field with one touch and a single bubble placed by hand
    fn placed_field(tuning: BubbleTuning, touch: Vec2, bubbles: &[(Vec2, Vec2)]) -> BubbleField {
        let mut field = BubbleField::with_seed(
            BubbleTuning {
                bubble_count: bubbles.len(),
                ..tuning
            },
            SCREEN,
            7,
        );
        field.update_touches(&TouchSnapshot::new().with(0, touch), Theme::Dawn);
        for (bubble, &(position, velocity)) in field.bubbles.iter_mut().zip(bubbles) {
            bubble.position = position;
            bubble.velocity = velocity;
        }
        field
    }

    #[test]
    fn test_tick_combines_weighted_forces_then_damps() {
        let tuning = BubbleTuning {
            chaos_strength: 0.0,
            ..presets::CALM
        };
        let mut field = placed_field(
            tuning,
            Vec2::new(200.0, 200.0),
            &[(Vec2::new(100.0, 200.0), Vec2::ZERO)],
        );

        field.update_physics();

        // gravity (0.6, 0) * 0.7 + orbital (0, 0.5) * 0.2, then damping 0.92
        let expected = Vec2::new(0.42, 0.10) * 0.92;
        let bubble = &field.bubbles()[0];
        assert!((bubble.velocity - expected).length() < 1e-5);
        assert!((bubble.position - (Vec2::new(100.0, 200.0) + expected)).length() < 1e-4);
    }

    #[test]
    fn test_damping_bleeds_speed_without_forces() {
        let tuning = BubbleTuning {
            pull_strength: 0.0,
            orbit_speed: 0.0,
            chaos_strength: 0.0,
            ..presets::CALM
        };
        let mut field = placed_field(
            tuning,
            Vec2::new(200.0, 400.0),
            &[(Vec2::new(100.0, 400.0), Vec2::new(2.0, 0.0))],
        );

        field.update_physics();
        assert!((field.bubbles()[0].velocity - Vec2::new(1.84, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_close_neighbours_push_apart() {
        let tuning = BubbleTuning {
            pull_strength: 0.0,
            orbit_speed: 0.0,
            chaos_strength: 0.0,
            ..presets::CALM
        };
        let mut field = placed_field(
            tuning,
            Vec2::new(200.0, 600.0),
            &[
                (Vec2::new(195.0, 400.0), Vec2::ZERO),
                (Vec2::new(205.0, 400.0), Vec2::ZERO),
            ],
        );

        field.update_physics();

        // (24 - 10) / 24 * 0.3 * 0.92 outward each
        let push = 14.0 / 24.0 * 0.3 * 0.92;
        let [left, right] = [&field.bubbles()[0], &field.bubbles()[1]];
        assert!((left.velocity - Vec2::new(-push, 0.0)).length() < 1e-5);
        assert!((right.velocity - Vec2::new(push, 0.0)).length() < 1e-5);
        assert!(left.position.distance(right.position) > 10.0);
    }

    #[test]
    fn test_breathing_phase_wraps() {
        let mut field = placed_field(
            presets::CALM,
            Vec2::new(200.0, 200.0),
            &[(Vec2::new(200.0, 200.0), Vec2::ZERO)],
        );
        field.bubbles[0].breathing_phase = TAU - 0.01;

        field.update_physics();

        let phase = field.bubbles()[0].breathing_phase;
        assert!((0.0..TAU).contains(&phase));
        assert!(phase < 1.0);
    }

    #[test]
    fn test_breathing_modulates_size() {
        let mut bubble = Bubble {
            id: BubbleId(0),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            base_size: 10.0,
            breathing_phase: 0.0,
            breathing_speed: 1.0,
            opacity: 1.0,
            color: Vec4::ONE,
            touch_id: TouchId(0),
        };
        assert!((bubble.size() - 10.0).abs() < 1e-5);

        bubble.breathing_phase = std::f32::consts::FRAC_PI_2;
        assert!((bubble.size() - 13.0).abs() < 1e-4);
        assert!(bubble.overlaps(Vec2::new(8.0, 0.0), 2.0));
        assert!(!bubble.overlaps(Vec2::new(9.0, 0.0), 2.0));
    }

    #[test]
    fn test_clear_all_is_immediate() {
        let mut field = field();
        let touches = TouchSnapshot::new().with(0, Vec2::new(100.0, 100.0));
        field.update_touches(&touches, Theme::Dawn);
        field.clear_all();

        assert!(field.bubbles().is_empty());
        // Same touch is treated as new again
        let update = field.update_touches(&touches, Theme::Dawn);
        assert_eq!(update.seeded.len(), 1);
        assert!(update.retired.is_empty());
    }

    #[test]
    fn test_step_runs_fixed_ticks() {
        let mut field = field();
        assert_eq!(field.step(TICK_SECS * 0.5), 0);
        assert_eq!(field.step(TICK_SECS * 0.6), 1);
        assert_eq!(field.step(TICK_SECS * 2.0), 2);
        assert_eq!(field.step(1.0), MAX_TICKS_PER_STEP);
        assert!(field.accumulator < TICK_SECS);
    }

    #[test]
    fn test_tiny_screen_centres_bubbles() {
        assert_eq!(clamp_axis(3.0, 10.0, 12.0), 6.0);
        assert_eq!(clamp_axis(-5.0, 2.0, 100.0), 2.0);
        assert_eq!(clamp_axis(150.0, 2.0, 100.0), 98.0);
    }
}
