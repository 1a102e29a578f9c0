use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::{
    camera::{GameCamera, MainCamera, screen_to_world},
    game::SphereSession,
    touch::{Bubble, HoldPhase},
    visual::utils::{ease_in_quad, ease_out_cubic},
};

/// How long a retired bubble takes to disappear
pub const FADE_SECS: f32 = 0.35;

/// Growth of a fading bubble at the end of its fade
const FADE_GROWTH: f32 = 0.5;

/// A bubble whose touch ended, fading out
#[derive(Debug, Clone)]
pub struct FadingBubble {
    pub bubble: Bubble,
    pub elapsed: f32,
}

impl FadingBubble {
    /// 0.0 = just retired, 1.0 = gone
    pub fn progress(&self) -> f32 {
        (self.elapsed / FADE_SECS).min(1.0)
    }

    pub fn alpha(&self) -> f32 {
        self.bubble.opacity * (1.0 - ease_in_quad(self.progress()))
    }

    pub fn radius(&self) -> f32 {
        self.bubble.radius() * (1.0 + FADE_GROWTH * ease_out_cubic(self.progress()))
    }
}

#[derive(Resource, Default, Debug)]
pub struct FadingBubbles {
    bubbles: Vec<FadingBubble>,
}

impl FadingBubbles {
    pub fn retire(&mut self, retired: Vec<Bubble>) {
        self.bubbles.extend(retired.into_iter().map(|bubble| FadingBubble {
            bubble,
            elapsed: 0.0,
        }));
    }

    /// Advance every fade and drop finished ones
    pub fn advance(&mut self, dt: f32) {
        for fading in &mut self.bubbles {
            fading.elapsed += dt;
        }
        self.bubbles.retain(|f| f.elapsed < FADE_SECS);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FadingBubble> {
        self.bubbles.iter()
    }

    pub fn clear(&mut self) {
        self.bubbles.clear();
    }
}

/// System: advance fade-outs
pub fn fade_retired_bubbles(time: Res<Time>, mut fading: ResMut<FadingBubbles>) {
    fading.advance(time.delta_secs());
}

/// System: draw live and fading bubbles as flat rings on the board
pub fn draw_bubbles(
    session: Res<SphereSession>,
    fading: Res<FadingBubbles>,
    game_camera: Res<GameCamera>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut gizmos: Gizmos,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let scale = game_camera.world_per_pixel();
    let flat = Quat::from_rotation_x(FRAC_PI_2);

    let live = session
        .bubbles()
        .iter()
        .map(|b| (b.position, b.radius(), b.color, b.opacity));
    let retired = fading
        .iter()
        .map(|f| (f.bubble.position, f.radius(), f.bubble.color, f.alpha()));

    for (position, radius, color, alpha) in live.chain(retired) {
        let Some(world) = screen_to_world(camera, camera_transform, position) else {
            continue;
        };
        gizmos.circle(
            Isometry3d::new(world, flat),
            radius * scale,
            Color::srgba(color.x, color.y, color.z, color.w * alpha),
        );
    }

    // Hold feedback: faint ring while dwelling, solid once armed
    let ring = match session.hold_phase() {
        HoldPhase::Idle => return,
        HoldPhase::ArmPending => Color::srgba(1.0, 1.0, 1.0, 0.25),
        HoldPhase::Armed => Color::WHITE,
    };
    let center = session.screen() * 0.5;
    if let Some(world) = screen_to_world(camera, camera_transform, center) {
        gizmos.circle(
            Isometry3d::new(world, flat),
            session.screen().min_element() * 0.4 * scale,
            ring,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::touch::{BubbleId, TouchId};

    fn bubble() -> Bubble {
        Bubble {
            id: BubbleId(1),
            position: Vec2::new(10.0, 10.0),
            velocity: Vec2::ZERO,
            base_size: 10.0,
            breathing_phase: 0.0,
            breathing_speed: 1.0,
            opacity: 0.8,
            color: Vec4::ONE,
            touch_id: TouchId(0),
        }
    }

    #[test]
    fn test_fade_runs_out() {
        let mut fading = FadingBubbles::default();
        fading.retire(vec![bubble(), bubble()]);
        assert_eq!(fading.iter().count(), 2);

        fading.advance(FADE_SECS * 0.5);
        assert_eq!(fading.iter().count(), 2);

        fading.advance(FADE_SECS * 0.6);
        assert_eq!(fading.iter().count(), 0);
    }

    #[test]
    fn test_fade_dims_and_grows() {
        let mut fading = FadingBubble {
            bubble: bubble(),
            elapsed: 0.0,
        };
        assert!((fading.alpha() - 0.8).abs() < 1e-6);
        assert!((fading.radius() - 5.0).abs() < 1e-6);

        fading.elapsed = FADE_SECS * 0.5;
        assert!(fading.alpha() < 0.8);
        assert!(fading.radius() > 5.0);
    }
}
