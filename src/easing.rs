//! Easing curves
//!
//! Map normalized time in [0, 1] to normalized progress in [0, 1].

/// Fast start, gentle landing
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Symmetric S-curve; passes through (0.5, 0.5)
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[inline]
pub fn ease_in_expo(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else {
        2f32.powf(10.0 * t - 10.0)
    }
}

#[inline]
pub fn ease_out_expo(t: f32) -> f32 {
    if t == 1.0 {
        1.0
    } else {
        1.0 - 2f32.powf(-10.0 * t)
    }
}

/// Inverse of [`ease_in_out_cubic`]: the normalized time at which it reaches `p`
pub fn ease_in_out_cubic_inverse(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    if p < 0.5 {
        (p / 4.0).cbrt()
    } else {
        1.0 - (2.0 * (1.0 - p)).cbrt() / 2.0
    }
}
