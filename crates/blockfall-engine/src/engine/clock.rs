use std::time::{Duration, Instant};

/// Converts wall-clock samples into a logical frame counter.
///
/// A frame is accepted once at least one frame interval (`1000 / rate`
/// milliseconds, rounded down) has passed since the last accepted frame.
/// Game rules only ever look at [`Self::ticks`], so gravity speed does not
/// depend on how often the host samples the clock.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use blockfall_engine::FrameClock;
///
/// let start = Instant::now();
/// let mut clock = FrameClock::new(60, start);
/// assert_eq!(clock.frame_interval(), Duration::from_millis(16));
///
/// assert!(!clock.sample(start + Duration::from_millis(10)));
/// assert!(clock.sample(start + Duration::from_millis(16)));
/// assert_eq!(clock.ticks(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_interval: Duration,
    last_frame: Instant,
    ticks: u64,
}

impl FrameClock {
    /// Creates a clock counting from `start`.
    ///
    /// A zero `frame_rate` is treated as 1 frame per second.
    #[must_use]
    pub fn new(frame_rate: u32, start: Instant) -> Self {
        let millis = 1000 / u64::from(frame_rate.max(1));
        Self {
            frame_interval: Duration::from_millis(millis),
            last_frame: start,
            ticks: 0,
        }
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Number of accepted frames.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Feeds a wall-clock sample; returns `true` if a frame was accepted.
    ///
    /// Samples older than the last accepted frame are ignored.
    pub fn sample(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_frame) < self.frame_interval {
            return false;
        }
        self.ticks += 1;
        self.last_frame = now;
        true
    }
}
