use std::time::Duration;

use tokio::time::Instant;

/// A scalar easing from `from` to `to` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Motion {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl Motion {
    pub(crate) fn new(from: f32, to: f32, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    pub(crate) fn still(value: f32, now: Instant) -> Self {
        Self::new(value, value, now, Duration::ZERO)
    }

    pub(crate) fn target(&self) -> f32 {
        self.to
    }

    pub(crate) fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub(crate) fn value_at(&self, now: Instant) -> f32 {
        let t = ease_out_cubic(self.progress(now));
        self.from + (self.to - self.from) * t
    }

    pub(crate) fn is_done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Continues from wherever the motion is at `now`.
    pub(crate) fn retarget(&self, to: f32, now: Instant, duration: Duration) -> Self {
        Self::new(self.value_at(now), to, now, duration)
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
