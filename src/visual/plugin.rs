use bevy::prelude::*;

use crate::camera::DEFAULT_SCREEN;
use crate::config::Tuning;
use crate::game::SphereSession;
use crate::input::{PointerEvent, collect_pointer_events};
use crate::touch::HoldEvent;
use crate::visual::bubbles::{FadingBubbles, draw_bubbles, fade_retired_bubbles};
use crate::visual::haptics::{HapticRequest, play_haptics};

pub struct SpherePlugin;

impl Plugin for SpherePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FadingBubbles>()
            .add_message::<HapticRequest>()
            .add_systems(Startup, setup_session)
            .add_systems(
                Update,
                (
                    // Touch state first, then one core frame
                    feed_pointer_events,
                    run_session_frame,
                    // Presentation
                    fade_retired_bubbles,
                    draw_bubbles,
                    play_haptics,
                )
                    .chain()
                    .after(collect_pointer_events),
            );
    }
}

/// System: load tuning and create the sphere session
fn setup_session(mut commands: Commands, windows: Query<&Window>) {
    let tuning = match Tuning::load() {
        Ok(tuning) => {
            info!("Loaded tuning: {} bubbles per touch", tuning.bubbles.bubble_count);
            tuning
        }
        Err(err) => {
            warn!("{} - falling back to defaults", err);
            Tuning::default()
        }
    };

    let screen = windows
        .single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(DEFAULT_SCREEN);

    commands.insert_resource(SphereSession::new(tuning, screen));
}

/// System: hand pointer events to the touch tracker
fn feed_pointer_events(
    mut pointer_events: MessageReader<PointerEvent>,
    mut session: ResMut<SphereSession>,
) {
    for event in pointer_events.read() {
        session.handle_touch(event.to_touch_event());
    }
}

/// System: run one core frame and dispatch its outputs
fn run_session_frame(
    time: Res<Time>,
    mut session: ResMut<SphereSession>,
    mut fading: ResMut<FadingBubbles>,
    mut haptics: MessageWriter<HapticRequest>,
) {
    let was_interactive = session.is_interactive();
    let report = session.frame(time.delta_secs());

    fading.retire(report.retired);
    for effect in report.haptics {
        haptics.write(HapticRequest(effect));
    }

    for event in &report.hold_events {
        match event {
            HoldEvent::Armed => info!("Three-finger hold armed - swipe to switch"),
            HoldEvent::Disarmed => debug!("Hold released"),
            HoldEvent::Swiped(direction) => info!("Swipe {:?}", direction),
        }
    }

    if let Some(theme) = report.theme_changed {
        let (index, count) = session.carousel().position();
        info!("Sphere {} ({}/{})", theme, index, count);
    }

    // Leaving bubble mode drops bubbles with no fade
    if was_interactive && !session.is_interactive() {
        fading.clear();
    }
}
