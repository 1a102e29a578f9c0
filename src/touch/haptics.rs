use bevy::math::Vec4;
use serde::Deserialize;
use std::fmt;

/// Sphere theme, selects bubble colors and themed pulses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dawn,
    Dusk,
    Tide,
    Ember,
    Moss,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Dawn,
        Theme::Dusk,
        Theme::Tide,
        Theme::Ember,
        Theme::Moss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dawn => "dawn",
            Theme::Dusk => "dusk",
            Theme::Tide => "tide",
            Theme::Ember => "ember",
            Theme::Moss => "moss",
        }
    }

    /// Bubble color for the n-th seeded touch of a frame
    pub fn touch_color(self, slot: usize) -> Vec4 {
        let [primary, secondary] = self.palette();
        if slot % 2 == 0 { primary } else { secondary }
    }

    fn palette(self) -> [Vec4; 2] {
        match self {
            Theme::Dawn => [
                Vec4::new(1.0, 0.72, 0.45, 1.0), // apricot
                Vec4::new(1.0, 0.55, 0.62, 1.0), // rose
            ],
            Theme::Dusk => [
                Vec4::new(0.55, 0.45, 0.95, 1.0),
                Vec4::new(0.85, 0.40, 0.80, 1.0),
            ],
            Theme::Tide => [
                Vec4::new(0.25, 0.70, 1.0, 1.0),
                Vec4::new(0.30, 0.95, 0.85, 1.0),
            ],
            Theme::Ember => [
                Vec4::new(1.0, 0.35, 0.15, 1.0),
                Vec4::new(1.0, 0.80, 0.20, 1.0),
            ],
            Theme::Moss => [
                Vec4::new(0.45, 0.85, 0.35, 1.0),
                Vec4::new(0.75, 0.95, 0.50, 1.0),
            ],
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intensity {
    Soft,
    Medium,
    Strong,
}

impl Intensity {
    /// Tier from how many fingers are down
    pub fn for_touch_count(count: usize) -> Self {
        match count {
            0 | 1 => Intensity::Soft,
            2 => Intensity::Medium,
            _ => Intensity::Strong,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Intensity::Soft => "soft",
            Intensity::Medium => "medium",
            Intensity::Strong => "strong",
        }
    }
}

/// Horizontal third of the screen a pulse is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenZone {
    Left,
    Center,
    Right,
}

impl ScreenZone {
    pub fn from_x(x: f32, width: f32) -> Self {
        if width <= 0.0 {
            return ScreenZone::Center;
        }
        let t = x / width;
        if t < 1.0 / 3.0 {
            ScreenZone::Left
        } else if t > 2.0 / 3.0 {
            ScreenZone::Right
        } else {
            ScreenZone::Center
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    pub fn is_horizontal(self) -> bool {
        matches!(self, SwipeDirection::Left | SwipeDirection::Right)
    }
}

/// Every feedback pulse the core can ask the platform for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticEffect {
    /// Resting finger over a bubble
    Pop(ScreenZone),
    /// Bubbles seeded for a new touch
    Themed { theme: Theme, intensity: Intensity },
    /// Three-finger hold armed
    HoldArmed,
    /// Armed swipe consumed
    Swipe(SwipeDirection),
}

impl HapticEffect {
    /// Symbolic name handed to the platform haptic layer
    pub fn identifier(&self) -> String {
        match self {
            HapticEffect::Pop(zone) => match zone {
                ScreenZone::Left => "pop_left".to_string(),
                ScreenZone::Center => "pop_center".to_string(),
                ScreenZone::Right => "pop_right".to_string(),
            },
            HapticEffect::Themed { theme, intensity } => {
                format!("{}_{}", theme.name(), intensity.name())
            }
            HapticEffect::HoldArmed => "hold_armed".to_string(),
            HapticEffect::Swipe(direction) => match direction {
                SwipeDirection::Left => "swipe_left".to_string(),
                SwipeDirection::Right => "swipe_right".to_string(),
                SwipeDirection::Up => "swipe_up".to_string(),
                SwipeDirection::Down => "swipe_down".to_string(),
            },
        }
    }
}
