// ============================================================================
// EASING FUNCTIONS for smooth animations
// ============================================================================

/// Ease-out cubic: fast at start, decelerates at end
pub fn ease_out_cubic(t: f32) -> f32 {
    let x = 1.0 - t.clamp(0.0, 1.0);
    1.0 - x * x * x
}

/// Ease-in quadratic: slow at start, accelerates
pub fn ease_in_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}
