use std::time::{SystemTime, UNIX_EPOCH};

/// Unix epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH_MS: u64 = 0;

/// Default custom epoch: Wednesday, January 1, 2020 00:00:00 UTC
pub const DEFAULT_EPOCH_MS: u64 = 1_577_836_800_000;

/// A source of wall-clock timestamps in milliseconds since the Unix epoch.
///
/// This abstraction lets generators take the real system clock in production
/// and a scripted clock in tests. Snowflake generators subtract their
/// configured epoch from the returned value themselves; implementations
/// always report absolute Unix milliseconds.
///
/// # Example
///
/// ```
/// use sequin::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// The system wall clock.
///
/// Reads [`SystemTime::now`] on every call. Unlike a monotonic timer, the
/// value can regress when the host clock is adjusted (NTP step, manual
/// change); the generators own the policy for absorbing or rejecting such
/// regressions.
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(core::time::Duration::ZERO)
            .as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_past_default_epoch() {
        let now = SystemClock.current_millis();
        assert!(now > DEFAULT_EPOCH_MS);
    }
}
