use std::{fmt, ops};

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Seconds between the Unix epoch and J2000 (2000-01-01 12:00:00 UTC).
const J2000_UNIX_SECONDS: i64 = 946_728_000;

/// Seconds per simulated day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

fn j2000() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::seconds(J2000_UNIX_SECONDS)
}

/// Simulation time, measured from the J2000 epoch.
///
/// The orbit evaluator consumes this as fractional days; the UI converts
/// it back to a calendar date for display.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SimTime(Duration);

impl SimTime {
    /// Simulation time corresponding to the current wall clock.
    pub fn now() -> Self {
        Self::from_datetime(OffsetDateTime::now_utc())
    }

    pub fn from_datetime(datetime: OffsetDateTime) -> Self {
        Self(datetime - j2000())
    }

    pub fn to_datetime(self) -> OffsetDateTime {
        j2000() + self.0
    }

    pub fn from_days(days: f64) -> Self {
        Self(Duration::seconds_f64(days * SECONDS_PER_DAY))
    }

    /// Fractional days since J2000.
    pub fn days(self) -> f64 {
        self.0.as_seconds_f64() / SECONDS_PER_DAY
    }
}

impl ops::Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> Self::Output {
        SimTime(self.0 + rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimTime({}d)", self.days())
    }
}

impl fmt::Debug for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
