use bevy::math::Vec2;
use serde::Deserialize;
use std::fmt;

use crate::touch::Theme;

const TUNING_JSON: &str = include_str!("../assets/tuning.json");

/// Motion presets for the bubble field
pub mod presets {
    use super::BubbleTuning;

    /// Slow swirl, lots of damping (default)
    pub const CALM: BubbleTuning = BubbleTuning {
        bubble_count: 8,
        max_new_touches_per_update: 2,
        pull_strength: 0.6,
        orbit_speed: 0.5,
        chaos_strength: 0.3,
        repulsion_radius: 24.0,
        repulsion_strength: 1.0,
        damping: 0.92,
        max_speed: 6.0,
        spawn_speed: (2.0, 5.0),
        base_size: (8.0, 16.0),
        breathing_speed: (0.5, 1.5),
        opacity: (0.6, 1.0),
    };
}

/// Error loading or validating tuning values
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Could not parse tuning: {}", msg),
            ConfigError::Invalid { field, reason } => {
                write!(f, "Invalid tuning value `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BubbleTuning {
    /// Bubbles spawned per new touch
    pub bubble_count: usize,
    /// New touches seeded per `update_touches` call
    pub max_new_touches_per_update: usize,
    pub pull_strength: f32,
    pub orbit_speed: f32,
    /// Half-width of the per-axis random jitter
    pub chaos_strength: f32,
    pub repulsion_radius: f32,
    pub repulsion_strength: f32,
    /// Velocity multiplier per tick (0.0 = full stop, 1.0 = no damping)
    pub damping: f32,
    pub max_speed: f32,
    pub spawn_speed: (f32, f32),
    pub base_size: (f32, f32),
    pub breathing_speed: (f32, f32),
    pub opacity: (f32, f32),
}

impl Default for BubbleTuning {
    fn default() -> Self {
        presets::CALM
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HoldTuning {
    /// How long three fingers must rest before arming
    pub dwell_secs: f32,
    /// Max drift from the start position while dwelling
    pub tolerance: f32,
}

impl Default for HoldTuning {
    fn default() -> Self {
        HoldTuning {
            dwell_secs: 2.0,
            tolerance: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwipeTuning {
    pub min_translation: f32,
    /// Units per second
    pub min_velocity: f32,
}

impl Default for SwipeTuning {
    fn default() -> Self {
        SwipeTuning {
            min_translation: 80.0,
            min_velocity: 300.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct IdleTuning {
    /// Frame-to-frame movement below this counts as resting
    pub movement_threshold: f32,
    pub interval_secs: f32,
    /// Extra reach added to a bubble's radius when testing overlap
    pub overlap_tolerance: f32,
    /// Shift applied to the touch position before overlap tests
    pub touch_offset: [f32; 2],
}

impl IdleTuning {
    pub fn offset(&self) -> Vec2 {
        Vec2::from(self.touch_offset)
    }
}

impl Default for IdleTuning {
    fn default() -> Self {
        IdleTuning {
            movement_threshold: 5.0,
            interval_secs: 0.3,
            overlap_tolerance: 5.0,
            touch_offset: [0.0, 0.0],
        }
    }
}

/// All tunable constants of the touch core
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Sphere shown first
    pub theme: Theme,
    pub bubbles: BubbleTuning,
    pub hold: HoldTuning,
    pub swipe: SwipeTuning,
    pub idle: IdleTuning,
}

impl Tuning {
    /// Load the tuning bundled with the app
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_json(TUNING_JSON)
    }

    /// Parse and validate; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.bubbles;

        if b.bubble_count == 0 {
            return Err(invalid("bubbles.bubble_count", "must be at least 1"));
        }
        if !(b.damping > 0.0 && b.damping < 1.0) {
            return Err(invalid(
                "bubbles.damping",
                format!("{} is outside (0, 1)", b.damping),
            ));
        }
        if b.max_speed <= 0.0 {
            return Err(invalid("bubbles.max_speed", "must be positive"));
        }
        if b.repulsion_radius <= 1.0 {
            return Err(invalid("bubbles.repulsion_radius", "must be greater than 1"));
        }
        if b.chaos_strength < 0.0 {
            return Err(invalid("bubbles.chaos_strength", "must not be negative"));
        }
        check_range("bubbles.spawn_speed", b.spawn_speed)?;
        check_range("bubbles.base_size", b.base_size)?;
        check_range("bubbles.breathing_speed", b.breathing_speed)?;
        check_range("bubbles.opacity", b.opacity)?;
        if b.opacity.0 < 0.0 || b.opacity.1 > 1.0 {
            return Err(invalid("bubbles.opacity", "must lie within [0, 1]"));
        }

        if self.hold.dwell_secs <= 0.0 {
            return Err(invalid("hold.dwell_secs", "must be positive"));
        }
        if self.hold.tolerance < 0.0 {
            return Err(invalid("hold.tolerance", "must not be negative"));
        }
        if self.swipe.min_translation <= 0.0 || self.swipe.min_velocity <= 0.0 {
            return Err(invalid("swipe", "thresholds must be positive"));
        }
        if self.idle.interval_secs <= 0.0 {
            return Err(invalid("idle.interval_secs", "must be positive"));
        }
        if self.idle.movement_threshold < 0.0 || self.idle.overlap_tolerance < 0.0 {
            return Err(invalid("idle", "thresholds must not be negative"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_range(field: &'static str, (min, max): (f32, f32)) -> Result<(), ConfigError> {
    if !(min.is_finite() && max.is_finite()) || min > max || min < 0.0 {
        return Err(invalid(
            field,
            format!("[{}, {}] is not a valid range", min, max),
        ));
    }
    Ok(())
}
