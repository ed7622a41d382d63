//! Calendar scalar types carried by entities.
//!
//! # Responsibility
//! - Define whole-day `Date` and epoch-based `Timestamp` values.
//!
//! # Invariants
//! - `Timestamp::nanos` is always in `0..1_000_000_000`.
//! - A `Date` is a plain triple; calendar validity is not enforced here.

use serde::{Deserialize, Serialize};

/// Whole calendar date without a time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl Date {
    pub fn new(year: i32, month: i32, day: i32) -> Self {
        Self { year, month, day }
    }
}

/// Point in time as seconds plus sub-second nanoseconds since the unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Microseconds since the epoch, truncating sub-microsecond precision.
    ///
    /// Saturates at `i64::MIN`/`i64::MAX` for seconds beyond roughly
    /// +/-292,000 years; such values do not survive a round trip.
    pub fn as_micros(&self) -> i64 {
        self.seconds
            .saturating_mul(1_000_000)
            .saturating_add(i64::from(self.nanos) / 1_000)
    }

    /// Rebuilds a timestamp from microseconds since the epoch.
    ///
    /// Uses euclidean division so pre-epoch values keep non-negative nanos.
    pub fn from_micros(micros: i64) -> Self {
        let seconds = micros.div_euclid(1_000_000);
        // rem_euclid is in 0..1_000_000, so the cast cannot truncate.
        let nanos = micros.rem_euclid(1_000_000) as i32 * 1_000;
        Self { seconds, nanos }
    }
}
