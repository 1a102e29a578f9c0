use bevy::camera::ScalingMode;
use bevy::prelude::*;

use crate::game::SphereSession;

/// Logical window size used before the first resize is seen
pub const DEFAULT_SCREEN: Vec2 = Vec2::new(390.0, 844.0);

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameCamera>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, update_screen_metrics);
    }
}

#[derive(Resource)]
pub struct GameCamera {
    /// Visible world height
    pub scale: f32,
    /// Logical window size in pixels (the touch core's coordinate space)
    pub screen: Vec2,
}

impl Default for GameCamera {
    fn default() -> Self {
        Self {
            scale: 8.0,
            screen: DEFAULT_SCREEN,
        }
    }
}

impl GameCamera {
    /// World units covered by one logical pixel
    pub fn world_per_pixel(&self) -> f32 {
        if self.screen.y <= 0.0 {
            return 0.0;
        }
        self.scale / self.screen.y
    }
}

#[derive(Component)]
pub struct MainCamera;

/// Top-down orthographic camera looking at the XZ plane, +Z up on screen
fn setup_camera(mut commands: Commands, game_camera: Res<GameCamera>) {
    let projection = Projection::Orthographic(OrthographicProjection {
        scaling_mode: ScalingMode::FixedVertical {
            viewport_height: game_camera.scale,
        },
        near: 0.0,
        far: 1000.0,
        ..OrthographicProjection::default_3d()
    });
    commands.spawn((
        Camera3d::default(),
        projection,
        Transform::from_xyz(0.0, 10.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
        MainCamera,
    ));
}

/// Window (logical) position to a point on the y=0 plane
pub fn screen_to_world(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    position: Vec2,
) -> Option<Vec3> {
    camera
        .viewport_to_world(camera_transform, position)
        .ok()
        .map(|ray| {
            let t = -ray.origin.y / ray.direction.y;
            ray.origin + ray.direction * t
        })
}

/// Track window size and hand it to the touch core as its bounds
fn update_screen_metrics(
    mut game_camera: ResMut<GameCamera>,
    session: Option<ResMut<SphereSession>>,
    windows: Query<&Window>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let size = Vec2::new(window.width(), window.height());
    if (size - game_camera.screen).length() < 0.5 {
        return;
    }

    game_camera.screen = size;
    if let Some(mut session) = session {
        session.set_screen(size);
    }
    info!("Screen bounds updated: {:?}", size);
}
