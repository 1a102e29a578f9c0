use bevy::math::Vec2;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable identifier for one physical finger contact (`u64::MAX` = mouse)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub u64);

impl fmt::Display for TouchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Cancelled,
}

impl TouchPhase {
    /// Phases that keep a touch in the next snapshot
    pub fn is_active(self) -> bool {
        matches!(
            self,
            TouchPhase::Began | TouchPhase::Moved | TouchPhase::Stationary
        )
    }
}

/// One raw touch event, in screen coordinates (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub id: TouchId,
    pub phase: TouchPhase,
    pub position: Vec2,
}

impl TouchEvent {
    pub fn new(id: u64, phase: TouchPhase, position: Vec2) -> Self {
        TouchEvent {
            id: TouchId(id),
            phase,
            position,
        }
    }
}

/// Per-frame view of every live touch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchSnapshot {
    touches: BTreeMap<TouchId, Vec2>,
}

impl TouchSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a touch position
    #[cfg(test)]
    pub fn with(mut self, id: u64, position: Vec2) -> Self {
        self.touches.insert(TouchId(id), position);
        self
    }

    pub fn get(&self, id: TouchId) -> Option<Vec2> {
        self.touches.get(&id).copied()
    }

    pub fn contains(&self, id: TouchId) -> bool {
        self.touches.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    /// Touches in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (TouchId, Vec2)> + '_ {
        self.touches.iter().map(|(&id, &pos)| (id, pos))
    }

    pub fn ids(&self) -> BTreeSet<TouchId> {
        self.touches.keys().copied().collect()
    }

    /// Mean position of all touches
    pub fn centroid(&self) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        let sum: Vec2 = self.touches.values().copied().sum();
        Some(sum / self.touches.len() as f32)
    }
}

impl FromIterator<(TouchId, Vec2)> for TouchSnapshot {
    fn from_iter<I: IntoIterator<Item = (TouchId, Vec2)>>(iter: I) -> Self {
        TouchSnapshot {
            touches: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TrackedTouch {
    position: Vec2,
    phase: TouchPhase,
}

/// Folds raw begin/move/end/cancel events into one snapshot per frame
#[derive(Debug, Default)]
pub struct TouchTracker {
    touches: BTreeMap<TouchId, TrackedTouch>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: TouchEvent) {
        match event.phase {
            TouchPhase::Began => {
                log::trace!("touch {} began at {:?}", event.id, event.position);
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                // Never seen as active: nothing to report
                if !self.touches.contains_key(&event.id) {
                    return;
                }
                log::trace!("touch {} {:?}", event.id, event.phase);
            }
            TouchPhase::Moved | TouchPhase::Stationary => {}
        }

        self.touches.insert(
            event.id,
            TrackedTouch {
                position: event.position,
                phase: event.phase,
            },
        );
    }

    /// Emit this frame's snapshot, then forget lifted touches and mark the rest stationary
    pub fn snapshot(&mut self) -> TouchSnapshot {
        let snapshot = self
            .touches
            .iter()
            .filter(|(_, touch)| touch.phase.is_active())
            .map(|(&id, touch)| (id, touch.position))
            .collect();

        self.touches.retain(|_, touch| touch.phase.is_active());
        for touch in self.touches.values_mut() {
            touch.phase = TouchPhase::Stationary;
        }

        snapshot
    }
}
