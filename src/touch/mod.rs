//! Frame-driven touch core: tracking, bubble physics, hold gesture and idle pulses.

pub mod bubbles;
pub mod forces;
pub mod haptics;
pub mod hold;
pub mod idle;
pub mod timer;
pub mod tracker;

pub use bubbles::{Bubble, BubbleField, BubbleId, TouchUpdate};
pub use haptics::{HapticEffect, Intensity, ScreenZone, SwipeDirection, Theme};
pub use hold::{HoldEvent, HoldGestureDetector, HoldPhase};
pub use idle::IdleHapticTrigger;
pub use tracker::{TouchEvent, TouchId, TouchPhase, TouchSnapshot, TouchTracker};
