use std::time::Duration;

/// display refresh, timers count down at this rate too
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Accumulates wall time and reports when a 60Hz frame boundary is crossed.
#[derive(Debug)]
pub struct FrameScheduler {
    elapsed: Duration,
    frame: Duration,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::with_frame(FRAME_DURATION)
    }

    pub fn with_frame(frame: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            frame,
        }
    }

    /// Add `delta` to the accumulator. When a whole frame has built up the
    /// accumulator resets and this returns true.
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.elapsed += delta;
        if self.elapsed < self.frame {
            return false;
        }
        self.elapsed = Duration::ZERO;
        true
    }

    pub fn until_next_frame(&self) -> Duration {
        self.frame.saturating_sub(self.elapsed)
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_until_frame() {
        let mut s = FrameScheduler::with_frame(Duration::from_millis(16));
        assert!(!s.advance(Duration::from_millis(5)));
        assert!(!s.advance(Duration::from_millis(10)));
        assert_eq!(s.until_next_frame(), Duration::from_millis(1));
        assert!(s.advance(Duration::from_millis(1)));
        assert_eq!(s.until_next_frame(), Duration::from_millis(16));
    }

    #[test]
    fn test_long_stall_is_one_frame() {
        let mut s = FrameScheduler::new();
        assert!(s.advance(Duration::from_secs(1)));
        assert!(!s.advance(Duration::ZERO));
    }
}
