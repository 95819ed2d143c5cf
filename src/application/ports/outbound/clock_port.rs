//! Time and randomness ports
//!
//! Services take these instead of calling `Utc::now()` or `rand` directly so
//! energy regeneration, quest expiry and pattern generation can be replayed
//! deterministically in tests.

use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Random value in `min..=max` (inclusive on both ends)
    fn gen_range(&self, min: u32, max: u32) -> u32;
}
