use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::base32::DecodeError;
use crate::error::Result;
use crate::generator::SerialGenerator;
use crate::id::Ulid;
use crate::rand::{RandSource, SecureRandom, ThreadRandom};
use crate::time::{SystemClock, TimeSource};

/// Instrumentation counters for a [`UlidGenerator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UlidStats {
    /// Total ids handed out.
    pub generated: u64,
    /// Same-millisecond ids produced by incrementing the previous
    /// randomness instead of drawing fresh bytes.
    pub monotonic_increments: u64,
    /// Increments that exhausted the 80-bit space within one millisecond
    /// and fell back to fresh randomness.
    pub randomness_overflows: u64,
}

#[derive(Debug)]
struct UlidState {
    last_millis: u64,
    last_random: [u8; Ulid::RANDOM_BYTES],
    stats: UlidStats,
}

/// A thread-safe generator of 128-bit lexicographically sortable [`Ulid`]s.
///
/// Generation never fails: randomness-counter overflow within a millisecond
/// is absorbed by drawing fresh bytes and is only visible in the stats. As
/// with [`SnowflakeGenerator`], every call runs under the instance's mutex,
/// so one instance serializes generation across all its callers.
///
/// In monotonic mode, ids minted within the same millisecond carry the
/// previous randomness plus one, so they sort strictly after earlier ids
/// from the same instance.
///
/// # Example
///
/// ```
/// use sequin::{SerialGenerator, UlidGenerator};
///
/// let generator = UlidGenerator::monotonic();
/// let id = generator.next_string()?;
/// assert_eq!(id.len(), 26);
/// # Ok::<(), sequin::Error>(())
/// ```
///
/// [`SnowflakeGenerator`]: crate::generator::SnowflakeGenerator
pub struct UlidGenerator<T: TimeSource, R: RandSource> {
    monotonic: bool,
    state: Arc<Mutex<UlidState>>,
    time: T,
    rng: R,
}

impl UlidGenerator<SystemClock, ThreadRandom> {
    /// Creates a monotonic generator over the system clock and the
    /// thread-local RNG.
    pub fn monotonic() -> Self {
        Self::new(true, SystemClock, ThreadRandom)
    }

    /// Creates a non-monotonic generator over the system clock and the
    /// thread-local RNG. Every id draws fresh randomness.
    pub fn non_monotonic() -> Self {
        Self::new(false, SystemClock, ThreadRandom)
    }
}

impl UlidGenerator<SystemClock, SecureRandom> {
    /// Creates a generator that draws randomness directly from the OS
    /// entropy source, trading throughput for generator-state-free
    /// randomness.
    pub fn secure(monotonic: bool) -> Self {
        Self::new(monotonic, SystemClock, SecureRandom)
    }
}

impl<T: TimeSource, R: RandSource> UlidGenerator<T, R> {
    /// Creates a new generator from a clock and a randomness source.
    pub fn new(monotonic: bool, time: T, rng: R) -> Self {
        Self::from_state(monotonic, 0, [0u8; Ulid::RANDOM_BYTES], time, rng)
    }

    /// Creates a generator preloaded with explicit state.
    ///
    /// Useful for controlling the starting point in tests; typical use
    /// should prefer [`Self::new`].
    pub fn from_state(
        monotonic: bool,
        last_millis: u64,
        last_random: [u8; Ulid::RANDOM_BYTES],
        time: T,
        rng: R,
    ) -> Self {
        Self {
            monotonic,
            state: Arc::new(Mutex::new(UlidState {
                last_millis,
                last_random,
                stats: UlidStats::default(),
            })),
            time,
            rng,
        }
    }

    /// Returns the current time of the injected clock, in milliseconds since
    /// the Unix epoch.
    pub fn current_time_millis(&self) -> u64 {
        self.time.current_millis()
    }

    /// Returns a consistent snapshot of the instrumentation counters.
    pub fn stats(&self) -> UlidStats {
        self.state.lock().stats
    }

    /// Resets all instrumentation counters to zero.
    pub fn reset_stats(&self) {
        self.state.lock().stats = UlidStats::default();
    }

    /// Generates the next id. Infallible.
    pub fn next_ulid(&self) -> Ulid {
        let mut state = self.state.lock();

        let now = self.time.current_millis();
        let random = if self.monotonic && now == state.last_millis {
            match increment_be(&state.last_random) {
                Some(bumped) => {
                    state.stats.monotonic_increments += 1;
                    bumped
                }
                // The 80-bit space is exhausted for this millisecond; start
                // over with fresh randomness.
                None => {
                    state.stats.randomness_overflows += 1;
                    self.draw()
                }
            }
        } else {
            self.draw()
        };

        state.last_millis = now;
        state.last_random = random;
        state.stats.generated += 1;

        Ulid::from_timestamp_and_bytes(now, &random)
    }

    /// Generates the next id and re-encodes it as a [`Uuid`].
    pub fn next_uuid(&self) -> Uuid {
        self.next_ulid().to_uuid()
    }

    /// Converts a 26-character ULID string into the canonical 36-character
    /// hyphenated lowercase-hex UUID form.
    ///
    /// # Errors
    ///
    /// [`DecodeError`] for any input that is not exactly 26 characters of
    /// the Crockford alphabet (aliases included); no partial output is
    /// produced.
    pub fn to_standard_uuid_format(&self, encoded: &str) -> Result<String, DecodeError> {
        Ulid::from_base32(encoded).map(|id| id.to_uuid().to_string())
    }

    fn draw(&self) -> [u8; Ulid::RANDOM_BYTES] {
        let mut bytes = [0u8; Ulid::RANDOM_BYTES];
        self.rng.fill_bytes(&mut bytes);
        bytes
    }
}

impl<T: TimeSource, R: RandSource> SerialGenerator for UlidGenerator<T, R> {
    type Output = Ulid;

    fn next(&self) -> Result<Ulid> {
        Ok(self.next_ulid())
    }
}

/// Increments 10 bytes as an unsigned big-endian integer, carrying from the
/// least-significant byte upward. `None` when the carry escapes the
/// most-significant byte.
fn increment_be(bytes: &[u8; Ulid::RANDOM_BYTES]) -> Option<[u8; Ulid::RANDOM_BYTES]> {
    let mut out = *bytes;
    for byte in out.iter_mut().rev() {
        let (value, overflowed) = byte.overflowing_add(1);
        *byte = value;
        if !overflowed {
            return Some(out);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_carries_through_low_bytes() {
        let bytes = [0, 0, 0, 0, 0, 0, 0, 0, 1, 0xFF];
        assert_eq!(
            increment_be(&bytes),
            Some([0, 0, 0, 0, 0, 0, 0, 0, 2, 0x00])
        );
    }

    #[test]
    fn increment_detects_exhaustion() {
        assert_eq!(increment_be(&[0xFF; Ulid::RANDOM_BYTES]), None);
    }
}
