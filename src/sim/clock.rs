use chrono::{Duration, NaiveDateTime};

/// Simulated time between two consecutive ticks.
pub const TICK_SPACING_SECS: i64 = 1;

/// A simulation clock that stamps telemetry samples.
///
/// Time is synthetic: the wall clock captured when the session started plus
/// one second per recorded tick, so history spacing never depends on how
/// fast ticks are actually driven.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cell_sim::sim::clock::SimClock;
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1)
///     .and_then(|d| d.and_hms_opt(0, 0, 0))
///     .unwrap();
/// let mut clock = SimClock::new(start);
/// clock.advance();
/// clock.advance();
/// assert_eq!(clock.ticks(), 2);
/// assert_eq!(clock.timestamp().to_string(), "2025-01-01 00:00:02");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    /// Wall clock at session start.
    started_at: NaiveDateTime,
    /// Ticks recorded since start or the last reset.
    ticks: u64,
}

impl SimClock {
    /// Creates a clock anchored at `started_at` with no ticks recorded.
    pub fn new(started_at: NaiveDateTime) -> Self {
        Self {
            started_at,
            ticks: 0,
        }
    }

    /// Creates a clock anchored at the local wall clock.
    pub fn now() -> Self {
        Self::new(chrono::Local::now().naive_local())
    }

    /// Timestamp for the tick about to be recorded.
    pub fn timestamp(&self) -> NaiveDateTime {
        let offset = i64::try_from(self.ticks).unwrap_or(i64::MAX / TICK_SPACING_SECS);
        self.started_at + Duration::seconds(offset * TICK_SPACING_SECS)
    }

    /// Records one tick.
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    /// Restarts counting from zero; the anchor is unchanged.
    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }
}
