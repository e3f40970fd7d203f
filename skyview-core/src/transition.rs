use std::time::Duration;

/// Offset of a fully hidden forecast panel.
pub const HIDDEN_OFFSET: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Open,
    Close,
}

/// One-shot linear slide of the forecast panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideTransition {
    pub direction: SlideDirection,
    pub duration: Duration,
}

impl SlideTransition {
    pub fn new(direction: SlideDirection, duration: Duration) -> Self {
        Self { direction, duration }
    }

    /// Fraction of the duration elapsed, in `0.0..=1.0`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Panel offset from its resting place: `HIDDEN_OFFSET` when hidden, `0.0` when shown.
    pub fn offset(&self, elapsed: Duration) -> f64 {
        let p = self.progress(elapsed);
        let shown = match self.direction {
            SlideDirection::Open => p,
            SlideDirection::Close => 1.0 - p,
        };
        HIDDEN_OFFSET * (1.0 - shown)
    }

    /// [`Self::offset`] scaled onto `0..=max_rows` terminal rows.
    pub fn offset_rows(&self, elapsed: Duration, max_rows: usize) -> usize {
        (self.offset(elapsed) / HIDDEN_OFFSET * max_rows as f64).round() as usize
    }
}
