//! Interpolated scalar value.

use std::time::{Duration, Instant};

use super::easing::{Easing, ease};

/// A scalar moving from one value to a target over a duration.
///
/// `Anim` holds no clock of its own: every query takes the current instant,
/// so callers decide what "now" is (the widget tree passes its frame time).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anim {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Anim {
    /// A settled animation at `value`.
    pub fn new(value: f32, now: Instant) -> Self {
        Self {
            from: value,
            to: value,
            start: now,
            duration: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    /// Current value at `now`.
    pub fn value(&self, now: Instant) -> f32 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * ease(self.easing, t)
    }

    /// Value the animation is heading to.
    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Easing of the current run.
    #[inline]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Linear progress of the current run in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Whether the value has reached its target at `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Jump to `value` without animating.
    pub fn set_immediate(&mut self, value: f32, now: Instant) {
        *self = Self::new(value, now);
    }

    /// Start moving from the current value toward `target`.
    ///
    /// A running animation is retargeted from wherever it is at `now`.
    pub fn set_target(&mut self, target: f32, duration: Duration, easing: Easing, now: Instant) {
        self.from = self.value(now);
        self.to = target;
        self.start = now;
        self.duration = duration;
        self.easing = easing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_value() {
        let now = Instant::now();
        let anim = Anim::new(12.0, now);
        assert_eq!(anim.value(now), 12.0);
        assert!(anim.is_finished(now));
    }

    #[test]
    fn test_linear_interpolation() {
        let t0 = Instant::now();
        let mut anim = Anim::new(0.0, t0);
        anim.set_target(100.0, Duration::from_millis(200), Easing::Linear, t0);

        assert!(!anim.is_finished(t0));
        let mid = anim.value(t0 + Duration::from_millis(100));
        assert!((mid - 50.0).abs() < 0.01);
        assert!(anim.is_finished(t0 + Duration::from_millis(200)));
        assert_eq!(anim.value(t0 + Duration::from_secs(5)), 100.0);
    }

    #[test]
    fn test_retarget_continues_from_current_value() {
        let t0 = Instant::now();
        let mut anim = Anim::new(0.0, t0);
        anim.set_target(100.0, Duration::from_millis(100), Easing::Linear, t0);

        let t1 = t0 + Duration::from_millis(50);
        anim.set_target(0.0, Duration::from_millis(100), Easing::Linear, t1);
        assert!((anim.value(t1) - 50.0).abs() < 0.01);
        assert_eq!(anim.target(), 0.0);
    }

    #[test]
    fn test_query_before_start_is_clamped() {
        let t0 = Instant::now();
        let mut anim = Anim::new(10.0, t0);
        let later = t0 + Duration::from_millis(10);
        anim.set_target(20.0, Duration::from_millis(100), Easing::EaseIn, later);
        assert_eq!(anim.value(t0), 10.0);
    }
}
