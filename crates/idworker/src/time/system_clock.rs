use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// Reads the operating system's wall clock on every call.
///
/// This clock follows NTP corrections, so it can move backward; generators
/// report that as [`Error::ClockMovedBackward`]. Use [`MonotonicClock`] if
/// you would rather never observe a regression.
///
/// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // a clock set before 1970 reads as zero
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}
