use std::time::{Duration, Instant};

/// Most intervals reported by one [`Ticker::poll`]; older missed fires are
/// dropped so a stalled driver does not burst.
pub const MAX_CATCH_UP: u32 = 10;

/// Fixed-interval timer polled by a driver loop.
///
/// The ticker owns no thread. A loop calls [`Ticker::poll`] with the current
/// instant and runs the returned number of steps, which keeps simulation
/// cadence independent of how often the screen is drawn.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use cell_sim::sim::ticker::Ticker;
///
/// let t0 = Instant::now();
/// let mut ticker = Ticker::new(Duration::from_millis(100), t0);
/// assert_eq!(ticker.poll(t0 + Duration::from_millis(50)), 0);
/// assert_eq!(ticker.poll(t0 + Duration::from_millis(250)), 2);
/// assert_eq!(ticker.poll(t0 + Duration::from_millis(300)), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last: Instant,
}

impl Ticker {
    /// Creates a ticker whose first fire is one `interval` after `now`.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn new(interval: Duration, now: Instant) -> Self {
        assert!(!interval.is_zero(), "ticker interval must be > 0");
        Self {
            interval,
            last: now,
        }
    }

    /// Returns how many whole intervals elapsed since the last fire, capped
    /// at [`MAX_CATCH_UP`], and moves the reference point forward.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last);
        let due = elapsed.as_nanos() / self.interval.as_nanos();
        if due == 0 {
            return 0;
        }
        if due > u128::from(MAX_CATCH_UP) {
            self.last = now;
            return MAX_CATCH_UP;
        }
        let due = due as u32;
        self.last += self.interval * due;
        due
    }

    /// Instant of the next fire.
    pub fn next_deadline(&self) -> Instant {
        self.last + self.interval
    }

    /// Changes the interval; the next fire is measured from `now`.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        assert!(!interval.is_zero(), "ticker interval must be > 0");
        self.interval = interval;
        self.last = now;
    }

    /// Restarts the interval from `now` without firing.
    pub fn reset(&mut self, now: Instant) {
        self.last = now;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
