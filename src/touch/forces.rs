use bevy::math::Vec2;
use rand::Rng;

/// Distances are clamped to this before dividing
pub const MIN_DISTANCE: f32 = 1.0;

/// Unit direction from `from` toward `to` (shorter when closer than `MIN_DISTANCE`)
pub fn direction_toward(from: Vec2, to: Vec2) -> Vec2 {
    let diff = to - from;
    diff / diff.length().max(MIN_DISTANCE)
}

/// Pull toward the touch point
pub fn gravity(bubble: Vec2, touch: Vec2, pull_strength: f32) -> Vec2 {
    direction_toward(bubble, touch) * pull_strength
}

/// Gravity direction rotated 90°, gives the swirl around the touch
pub fn orbital(bubble: Vec2, touch: Vec2, orbit_speed: f32) -> Vec2 {
    direction_toward(bubble, touch).perp() * orbit_speed
}

/// Independent per-axis jitter in [-strength, strength]
pub fn chaos(rng: &mut impl Rng, strength: f32) -> Vec2 {
    if strength <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.random_range(-strength..=strength),
        rng.random_range(-strength..=strength),
    )
}

/// Push away from one neighbour, fading linearly to zero at `radius`
pub fn repulsion_from(position: Vec2, other: Vec2, radius: f32) -> Vec2 {
    let diff = position - other;
    let distance = diff.length();

    if distance <= MIN_DISTANCE || distance >= radius {
        return Vec2::ZERO;
    }

    let falloff = (radius - distance) / radius;
    diff / distance * falloff
}

/// Summed push away from every neighbour in range
pub fn repulsion(position: Vec2, others: impl IntoIterator<Item = Vec2>, radius: f32) -> Vec2 {
    others
        .into_iter()
        .map(|other| repulsion_from(position, other, radius))
        .sum()
}
