use bevy::input::touch::{TouchInput, TouchPhase as BevyTouchPhase};
use bevy::prelude::*;
use bevy::window::CursorMoved;

use crate::touch::{TouchEvent, TouchPhase};

/// Touch id reserved for the mouse, away from platform finger ids
pub const MOUSE_TOUCH_ID: u64 = u64::MAX;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorPos>()
            .add_message::<PointerEvent>()
            .add_systems(Update, (track_cursor_pos, collect_pointer_events).chain());
    }
}

#[derive(Message, Debug, Clone)]
pub struct PointerEvent {
    /// Window (logical) coordinates: pixels from top-left
    pub position: Vec2,
    pub event_type: PointerEventType,
    /// Platform finger id, or `MOUSE_TOUCH_ID`
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerEvent {
    /// Convert into the touch core's event
    pub fn to_touch_event(&self) -> TouchEvent {
        let phase = match self.event_type {
            PointerEventType::Down => TouchPhase::Began,
            PointerEventType::Move => TouchPhase::Moved,
            PointerEventType::Up => TouchPhase::Ended,
            PointerEventType::Cancel => TouchPhase::Cancelled,
        };
        TouchEvent::new(self.id, phase, self.position)
    }
}

#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CursorPos(pub Option<Vec2>);

fn track_cursor_pos(mut ev_cursor: MessageReader<CursorMoved>, mut pos: ResMut<CursorPos>) {
    for e in ev_cursor.read() {
        // last event wins
        pos.0 = Some(e.position);
    }
}

pub fn collect_pointer_events(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    cursor: Res<CursorPos>,
    mut touch_events: MessageReader<TouchInput>,
    mut out: MessageWriter<PointerEvent>,
) {
    if let Some(p) = cursor.0 {
        if mouse_buttons.just_pressed(MouseButton::Left) {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Down,
                id: MOUSE_TOUCH_ID,
            });
        } else if mouse_buttons.pressed(MouseButton::Left) {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Move,
                id: MOUSE_TOUCH_ID,
            });
        }
        if mouse_buttons.just_released(MouseButton::Left) {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Up,
                id: MOUSE_TOUCH_ID,
            });
        }
    }

    for ev in touch_events.read() {
        let event_type = match ev.phase {
            BevyTouchPhase::Started => PointerEventType::Down,
            BevyTouchPhase::Moved => PointerEventType::Move,
            BevyTouchPhase::Ended => PointerEventType::Up,
            BevyTouchPhase::Canceled => PointerEventType::Cancel,
        };
        out.write(PointerEvent {
            position: ev.position,
            event_type,
            id: ev.id,
        });
    }
}
