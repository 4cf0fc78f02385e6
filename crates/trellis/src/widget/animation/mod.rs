//! Scalar animation used for visual offsets.
//!
//! - [`Easing`]: progress curves
//! - [`Anim`]: a value interpolated from a start to a target over a duration

mod anim;
mod easing;

pub use anim::Anim;
pub use easing::{Easing, ease};
