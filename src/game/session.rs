// game/session.rs

use bevy::math::Vec2;
use bevy::prelude::Resource;

use crate::config::Tuning;
use crate::game::carousel::SphereCarousel;
use crate::touch::{
    Bubble, BubbleField, HapticEffect, HoldEvent, HoldGestureDetector, HoldPhase,
    IdleHapticTrigger, Intensity, SwipeDirection, Theme, TouchEvent, TouchId, TouchTracker,
};

/// One interactive sphere screen: owns the whole touch core and runs it per frame
#[derive(Debug, Resource)]
pub struct SphereSession {
    screen: Vec2,
    tracker: TouchTracker,
    bubbles: BubbleField,
    hold: HoldGestureDetector,
    idle: IdleHapticTrigger,
    carousel: SphereCarousel,
    /// Bubble mode; toggled by vertical armed swipes
    interactive: bool,
}

/// Everything the presentation layer needs to react to after a frame
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub haptics: Vec<HapticEffect>,
    pub seeded: Vec<TouchId>,
    /// Bubbles to fade out
    pub retired: Vec<Bubble>,
    pub hold_events: Vec<HoldEvent>,
    /// Theme selected by a swipe this frame
    pub theme_changed: Option<Theme>,
    pub physics_ticks: u32,
}

impl SphereSession {
    pub fn new(tuning: Tuning, screen: Vec2) -> Self {
        Self::from_field(tuning, screen, BubbleField::new(tuning.bubbles, screen))
    }

    /// Deterministic session for tests
    #[cfg(test)]
    pub fn with_seed(tuning: Tuning, screen: Vec2, seed: u64) -> Self {
        Self::from_field(
            tuning,
            screen,
            BubbleField::with_seed(tuning.bubbles, screen, seed),
        )
    }

    fn from_field(tuning: Tuning, screen: Vec2, bubbles: BubbleField) -> Self {
        SphereSession {
            screen,
            tracker: TouchTracker::new(),
            bubbles,
            hold: HoldGestureDetector::new(tuning.hold, tuning.swipe),
            idle: IdleHapticTrigger::new(tuning.idle),
            carousel: SphereCarousel::starting_at(tuning.theme),
            interactive: true,
        }
    }

    // === Query Methods ===

    pub fn bubbles(&self) -> &[Bubble] {
        self.bubbles.bubbles()
    }

    pub fn theme(&self) -> Theme {
        self.carousel.current()
    }

    pub fn carousel(&self) -> &SphereCarousel {
        &self.carousel
    }

    pub fn is_armed(&self) -> bool {
        self.hold.is_armed()
    }

    pub fn hold_phase(&self) -> HoldPhase {
        self.hold.phase()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    // === Mutation Methods ===

    pub fn handle_touch(&mut self, event: TouchEvent) {
        self.tracker.handle(event);
    }

    pub fn set_screen(&mut self, screen: Vec2) {
        self.screen = screen;
        self.bubbles.set_bounds(screen);
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        if self.interactive == interactive {
            return;
        }
        self.interactive = interactive;
        if !interactive {
            self.bubbles.clear_all();
            self.idle.clear();
        }
        log::info!("interactive mode {}", if interactive { "on" } else { "off" });
    }

    /// Run one frame: touches first, then physics, then gestures, then idle pulses
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        let mut report = FrameReport::default();
        let touches = self.tracker.snapshot();
        let theme = self.carousel.current();

        if self.interactive {
            let update = self.bubbles.update_touches(&touches, theme);
            let intensity = Intensity::for_touch_count(touches.len());
            report.haptics.extend(
                update
                    .seeded
                    .iter()
                    .map(|_| HapticEffect::Themed { theme, intensity }),
            );
            report.seeded = update.seeded;
            report.retired = update.retired;
            report.physics_ticks = self.bubbles.step(dt);
        }

        report.hold_events = self.hold.update(&touches, dt);
        for event in report.hold_events.clone() {
            match event {
                HoldEvent::Armed => report.haptics.push(HapticEffect::HoldArmed),
                HoldEvent::Swiped(direction) => {
                    report.haptics.push(HapticEffect::Swipe(direction));
                    report.theme_changed = self.apply_swipe(direction);
                }
                HoldEvent::Disarmed => {}
            }
        }

        if self.interactive {
            let pulses = self
                .idle
                .update(&touches, self.bubbles.bubbles(), self.screen.x, dt);
            report.haptics.extend(pulses);
        }

        report
    }

    /// Horizontal swipes rotate the carousel, vertical ones toggle bubble mode
    fn apply_swipe(&mut self, direction: SwipeDirection) -> Option<Theme> {
        if direction.is_horizontal() {
            let theme = self.carousel.rotate(direction);
            if let Some(theme) = theme {
                log::info!("sphere switched to {}", theme);
            }
            theme
        } else {
            self.set_interactive(!self.interactive);
            None
        }
    }
}
