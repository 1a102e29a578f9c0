use bevy::math::Vec2;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::{HoldTuning, SwipeTuning};
use crate::touch::haptics::SwipeDirection;
use crate::touch::timer::DelayedCheck;
use crate::touch::tracker::{TouchId, TouchSnapshot};

/// Number of fingers that make up the hold
pub const HOLD_FINGERS: usize = 3;

/// Shortest frame used when measuring pan velocity
const MIN_PAN_DT: f32 = 1.0 / 60.0;
/// Weight of the newest frame in the smoothed pan velocity
const VELOCITY_SMOOTHING: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPhase {
    Idle,
    ArmPending,
    Armed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEvent {
    Armed,
    Disarmed,
    Swiped(SwipeDirection),
}

#[derive(Debug, Clone, Copy)]
struct Pan {
    origin: Vec2,
    last: Vec2,
    velocity: Vec2,
}

/// Three-finger hold that arms a one-shot directional swipe
#[derive(Debug)]
pub struct HoldGestureDetector {
    hold: HoldTuning,
    swipe: SwipeTuning,
    active_ids: Option<BTreeSet<TouchId>>,
    start_positions: BTreeMap<TouchId, Vec2>,
    armed: bool,
    pending: DelayedCheck<BTreeSet<TouchId>>,
    pan: Option<Pan>,
}

impl HoldGestureDetector {
    pub fn new(hold: HoldTuning, swipe: SwipeTuning) -> Self {
        HoldGestureDetector {
            hold,
            swipe,
            active_ids: None,
            start_positions: BTreeMap::new(),
            armed: false,
            pending: DelayedCheck::new(),
            pan: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn phase(&self) -> HoldPhase {
        if self.armed {
            HoldPhase::Armed
        } else if self.pending.is_pending() {
            HoldPhase::ArmPending
        } else {
            HoldPhase::Idle
        }
    }

    /// Re-evaluate against this frame's touches, `dt` seconds after the last call
    pub fn update(&mut self, touches: &TouchSnapshot, dt: f32) -> Vec<HoldEvent> {
        let mut events = Vec::new();

        if touches.len() != HOLD_FINGERS {
            self.reset(&mut events);
            return events;
        }

        let ids = touches.ids();
        if self.active_ids.as_ref() != Some(&ids) {
            self.begin_dwell(ids, touches, &mut events);
            return events;
        }

        if let Some(tag) = self.pending.tick(dt) {
            self.confirm_dwell(tag, touches, &mut events);
        } else if self.armed {
            self.track_pan(touches, dt, &mut events);
        }

        events
    }

    /// Fire the armed swipe if either axis crosses its threshold; consumes the arm
    pub fn try_consume_swipe(&mut self, translation: Vec2, velocity: Vec2) -> Option<SwipeDirection> {
        if !self.armed {
            return None;
        }

        let crossed = |t: f32, v: f32| {
            t.abs() >= self.swipe.min_translation || v.abs() >= self.swipe.min_velocity
        };
        let horizontal = crossed(translation.x, velocity.x);
        let vertical = crossed(translation.y, velocity.y);

        let direction = match (horizontal, vertical) {
            (false, false) => return None,
            (true, true) if translation.y.abs() > translation.x.abs() => {
                vertical_direction(translation, velocity)
            }
            (true, _) => horizontal_direction(translation, velocity),
            (false, true) => vertical_direction(translation, velocity),
        };

        self.armed = false;
        self.pan = None;
        log::info!("hold swipe {:?}", direction);
        Some(direction)
    }

    fn begin_dwell(
        &mut self,
        ids: BTreeSet<TouchId>,
        touches: &TouchSnapshot,
        events: &mut Vec<HoldEvent>,
    ) {
        if self.armed {
            self.armed = false;
            events.push(HoldEvent::Disarmed);
        }
        self.pan = None;
        self.start_positions = touches.iter().collect();
        self.pending.schedule(ids.clone(), self.hold.dwell_secs);
        log::debug!("hold dwell started for {:?}", ids);
        self.active_ids = Some(ids);
    }

    fn confirm_dwell(
        &mut self,
        tag: BTreeSet<TouchId>,
        touches: &TouchSnapshot,
        events: &mut Vec<HoldEvent>,
    ) {
        if self.active_ids.as_ref() != Some(&tag) {
            log::debug!("stale hold check for {:?}", tag);
            return;
        }

        let drifted = self.start_positions.iter().any(|(&id, &start)| {
            touches
                .get(id)
                .is_none_or(|now| now.distance(start) > self.hold.tolerance)
        });
        if drifted {
            log::debug!("hold not armed: fingers drifted");
            return;
        }

        self.armed = true;
        if let Some(centroid) = touches.centroid() {
            self.pan = Some(Pan {
                origin: centroid,
                last: centroid,
                velocity: Vec2::ZERO,
            });
        }
        log::info!("three-finger hold armed");
        events.push(HoldEvent::Armed);
    }

    fn track_pan(&mut self, touches: &TouchSnapshot, dt: f32, events: &mut Vec<HoldEvent>) {
        let (Some(pan), Some(centroid)) = (self.pan.as_mut(), touches.centroid()) else {
            return;
        };

        let translation = centroid - pan.origin;
        let sample = (centroid - pan.last) / dt.max(MIN_PAN_DT);
        pan.velocity = pan.velocity.lerp(sample, VELOCITY_SMOOTHING);
        pan.last = centroid;
        let velocity = pan.velocity;

        if let Some(direction) = self.try_consume_swipe(translation, velocity) {
            events.push(HoldEvent::Swiped(direction));
        }
    }

    fn reset(&mut self, events: &mut Vec<HoldEvent>) {
        self.pending.cancel();
        self.start_positions.clear();
        self.active_ids = None;
        self.pan = None;
        if self.armed {
            self.armed = false;
            log::debug!("hold disarmed");
            events.push(HoldEvent::Disarmed);
        }
    }
}

fn horizontal_direction(translation: Vec2, velocity: Vec2) -> SwipeDirection {
    if dominant_sign(translation.x, velocity.x) < 0.0 {
        SwipeDirection::Left
    } else {
        SwipeDirection::Right
    }
}

/// Screen y grows downward
fn vertical_direction(translation: Vec2, velocity: Vec2) -> SwipeDirection {
    if dominant_sign(translation.y, velocity.y) < 0.0 {
        SwipeDirection::Up
    } else {
        SwipeDirection::Down
    }
}

fn dominant_sign(translation: f32, velocity: f32) -> f32 {
    if translation != 0.0 { translation } else { velocity }
}
