//! Timestamp - Recording-time instant
//!
//! Microsecond ticks since the session epoch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::time::Duration;

/// Recording-time instant with microsecond resolution.
///
/// Timestamps come from the recorded session clock, not from the wall
/// clock of the machine replaying it. They are totally ordered and
/// subtraction yields a `std::time::Duration`.
///
/// # Examples
/// ```
/// use contracts::Timestamp;
/// use std::time::Duration;
///
/// let a = Timestamp::from_millis(100);
/// let b = Timestamp::from_millis(250);
/// assert!(a < b);
/// assert_eq!(b - a, Duration::from_millis(150));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from microsecond ticks.
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Create a timestamp from millisecond ticks.
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * 1_000)
    }

    /// Create a timestamp from fractional seconds.
    ///
    /// Negative and non-finite inputs clamp to the epoch.
    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            Self((secs * 1e6) as u64)
        } else {
            Self(0)
        }
    }

    /// Microsecond ticks since the session epoch.
    #[inline]
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Fractional seconds since the session epoch.
    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1e6
    }

    /// Elapsed time since `earlier`, saturating to zero if `earlier`
    /// is actually later than `self`.
    #[inline]
    pub fn duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }

    /// Timestamp advanced by `d`, or `None` on overflow.
    #[inline]
    pub fn checked_add(self, d: Duration) -> Option<Timestamp> {
        u64::try_from(d.as_micros())
            .ok()
            .and_then(|micros| self.0.checked_add(micros))
            .map(Timestamp)
    }
}

impl Sub for Timestamp {
    type Output = Duration;

    /// Saturating difference, see [`Timestamp::duration_since`].
    #[inline]
    fn sub(self, rhs: Timestamp) -> Duration {
        self.duration_since(rhs)
    }
}

impl From<u64> for Timestamp {
    #[inline]
    fn from(micros: u64) -> Self {
        Self(micros)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s", self.as_secs_f64())
    }
}
