// game/carousel.rs

use crate::touch::haptics::{SwipeDirection, Theme};

/// Sphere selection, one theme per sphere, wrapping at both ends
#[derive(Debug, Clone, Default)]
pub struct SphereCarousel {
    index: usize,
}

impl SphereCarousel {
    pub fn starting_at(theme: Theme) -> Self {
        let index = Theme::ALL.iter().position(|&t| t == theme).unwrap_or(0);
        SphereCarousel { index }
    }

    pub fn current(&self) -> Theme {
        Theme::ALL[self.index]
    }

    pub fn next(&mut self) -> Theme {
        self.index = (self.index + 1) % Theme::ALL.len();
        self.current()
    }

    pub fn previous(&mut self) -> Theme {
        self.index = (self.index + Theme::ALL.len() - 1) % Theme::ALL.len();
        self.current()
    }

    /// Swiping left brings in the next sphere; vertical swipes don't rotate
    pub fn rotate(&mut self, direction: SwipeDirection) -> Option<Theme> {
        match direction {
            SwipeDirection::Left => Some(self.next()),
            SwipeDirection::Right => Some(self.previous()),
            SwipeDirection::Up | SwipeDirection::Down => None,
        }
    }

    /// Position for a "2/5" style indicator (1-based)
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, Theme::ALL.len())
    }
}
