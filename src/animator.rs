//! Sweeps a value back and forth across a range, for demos.

use std::f64::consts::PI;
use std::time::Duration;

use bon::Builder;

/// Integer animation between `from` and `to` that runs forever, reversing at
/// each end and easing in and out of every pass.
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct ValueAnimator {
    #[builder(default = 0)]
    pub from: i64,
    #[builder(default = 100)]
    pub to: i64,
    #[builder(default = Duration::from_millis(5000))]
    pub duration: Duration,
}

impl Default for ValueAnimator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ValueAnimator {
    pub fn new(from: i64, to: i64, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Value at `elapsed` since the animation started. Passes alternate
    /// `from -> to` and `to -> from`; fractional values truncate toward `from`.
    pub fn value_at(&self, elapsed: Duration) -> i64 {
        let period = self.duration.as_secs_f64();
        if period <= 0.0 {
            return self.to;
        }
        let progress = elapsed.as_secs_f64() / period;
        let pass = progress.floor();
        let mut t = progress - pass;
        if pass as u64 % 2 == 1 {
            t = 1.0 - t;
        }
        let eased = accelerate_decelerate(t);
        let span = self.to as i128 - self.from as i128;
        let value = self.from as i128 + (eased * span as f64) as i128;
        value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

/// Slow at both ends, fastest in the middle.
pub fn accelerate_decelerate(t: f64) -> f64 {
    ((t + 1.0) * PI).cos() / 2.0 + 0.5
}
