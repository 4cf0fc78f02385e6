//! Easing curves.
//!
//! A curve maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
//! The "soft" variants use a cubic instead of a quadratic, which spends
//! longer near the slow end and suits long slide-in sheets.

/// Available easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Starts slow, accelerates.
    EaseIn,
    /// Starts fast, decelerates.
    #[default]
    EaseOut,
    /// Slow at both ends.
    EaseInOut,
    /// Cubic ease-in.
    SoftEaseIn,
    /// Cubic ease-out.
    SoftEaseOut,
    /// Cubic ease-in-out.
    SoftEaseInOut,
}

/// Apply `easing` to linear progress `t`. Input outside `[0, 1]` is clamped.
///
/// ```
/// use trellis::widget::animation::{ease, Easing};
///
/// assert_eq!(ease(Easing::Linear, 0.25), 0.25);
/// assert!(ease(Easing::EaseOut, 0.5) > 0.5);
/// assert!(ease(Easing::SoftEaseIn, 0.5) < ease(Easing::EaseIn, 0.5));
/// ```
#[inline]
pub fn ease(easing: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t.powi(2),
        Easing::EaseOut => 1.0 - (1.0 - t).powi(2),
        Easing::EaseInOut => in_out(t, 2),
        Easing::SoftEaseIn => t.powi(3),
        Easing::SoftEaseOut => 1.0 - (1.0 - t).powi(3),
        Easing::SoftEaseInOut => in_out(t, 3),
    }
}

/// Symmetric in-out curve of the given power.
#[inline]
fn in_out(t: f32, power: i32) -> f32 {
    let scale = 2f32.powi(power - 1);
    if t < 0.5 {
        scale * t.powi(power)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(power) / 2.0
    }
}
