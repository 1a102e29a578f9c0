use bevy::math::Vec2;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::config::IdleTuning;
use crate::touch::bubbles::Bubble;
use crate::touch::haptics::{HapticEffect, ScreenZone};
use crate::touch::timer::RepeatingTimer;
use crate::touch::tracker::{TouchId, TouchSnapshot};

#[derive(Debug)]
struct IdleTouch {
    last_position: Vec2,
    /// Where the touch came to rest; `None` while moving
    idle_anchor: Option<Vec2>,
    timer: RepeatingTimer,
}

/// Pulses while a resting finger sits on a bubble
#[derive(Debug)]
pub struct IdleHapticTrigger {
    tuning: IdleTuning,
    touches: BTreeMap<TouchId, IdleTouch>,
}

impl IdleHapticTrigger {
    pub fn new(tuning: IdleTuning) -> Self {
        IdleHapticTrigger {
            tuning,
            touches: BTreeMap::new(),
        }
    }

    pub fn is_idle(&self, id: TouchId) -> bool {
        self.touches
            .get(&id)
            .is_some_and(|t| t.idle_anchor.is_some())
    }

    /// Is the repeating pulse running for this touch?
    pub fn is_triggering(&self, id: TouchId) -> bool {
        self.touches.get(&id).is_some_and(|t| t.timer.is_running())
    }

    pub fn clear(&mut self) {
        self.touches.clear();
    }

    pub fn update(
        &mut self,
        touches: &TouchSnapshot,
        bubbles: &[Bubble],
        screen_width: f32,
        dt: f32,
    ) -> Vec<HapticEffect> {
        let tuning = self.tuning;
        let offset = tuning.offset();
        let overlapping = |point: Vec2| {
            bubbles
                .iter()
                .any(|b| b.overlaps(point, tuning.overlap_tolerance))
        };

        self.touches.retain(|id, _| touches.contains(*id));

        let mut effects = Vec::new();
        for (id, position) in touches.iter() {
            let state = match self.touches.entry(id) {
                Entry::Vacant(entry) => {
                    entry.insert(IdleTouch {
                        last_position: position,
                        idle_anchor: None,
                        timer: RepeatingTimer::new(tuning.interval_secs),
                    });
                    continue;
                }
                Entry::Occupied(entry) => entry.into_mut(),
            };

            let movement = position.distance(state.last_position);
            state.last_position = position;

            // Moving always wins over resting
            if movement >= tuning.movement_threshold {
                if state.timer.is_running() {
                    log::trace!("touch {} moved, idle pulse stopped", id);
                }
                state.timer.stop();
                state.idle_anchor = None;
                continue;
            }

            let point = position + offset;

            if state.idle_anchor.is_none() {
                state.idle_anchor = Some(position);
                if overlapping(point) {
                    log::trace!("touch {} resting on a bubble", id);
                    state.timer.start();
                }
                continue;
            }

            for _ in 0..state.timer.tick(dt) {
                if overlapping(point) {
                    effects.push(HapticEffect::Pop(ScreenZone::from_x(point.x, screen_width)));
                } else {
                    state.timer.stop();
                    break;
                }
            }
        }

        effects
    }
}
