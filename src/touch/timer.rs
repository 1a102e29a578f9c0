//! Frame-driven timers. Hosts advance them with the frame delta instead of
//! relying on wall-clock callbacks, so every timer is testable by stepping.

/// One-shot check that fires once after a delay, tagged with what it was scheduled for
#[derive(Debug, Clone, Default)]
pub struct DelayedCheck<T> {
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    tag: T,
    remaining: f32,
}

impl<T: Clone> DelayedCheck<T> {
    pub fn new() -> Self {
        DelayedCheck { pending: None }
    }

    /// Schedule a check, superseding any pending one
    pub fn schedule(&mut self, tag: T, delay_secs: f32) {
        self.pending = Some(Pending {
            tag,
            remaining: delay_secs.max(0.0),
        });
    }

    /// Drop the pending check (no-op when nothing is pending)
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Advance time; returns the tag once when the delay has elapsed
    pub fn tick(&mut self, dt: f32) -> Option<T> {
        let pending = self.pending.as_mut()?;
        pending.remaining -= dt;
        if pending.remaining > 0.0 {
            return None;
        }
        self.pending.take().map(|p| p.tag)
    }
}

/// Fires every `interval` seconds while running
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    interval: f32,
    elapsed: f32,
    running: bool,
}

impl RepeatingTimer {
    pub fn new(interval: f32) -> Self {
        RepeatingTimer {
            interval,
            elapsed: 0.0,
            running: false,
        }
    }

    /// Start from zero; restarting a running timer resets its phase
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance time; returns how many intervals completed during `dt`
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.running || self.interval <= 0.0 {
            return 0;
        }

        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}
