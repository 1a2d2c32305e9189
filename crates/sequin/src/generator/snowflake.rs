use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::warn;

use crate::error::{ConfigError, Error, Result};
use crate::generator::SerialGenerator;
use crate::id::SnowflakeId;
use crate::time::{DEFAULT_EPOCH_MS, SystemClock, TimeSource};

/// Default clock-backward tolerance in milliseconds.
pub const DEFAULT_CLOCK_TOLERANCE_MS: u64 = 10;

/// Upper bound on the time spent waiting for the clock to advance past an
/// exhausted millisecond before the call fails with
/// [`Error::ClockStalled`].
const STALL_LIMIT_MS: u64 = 100;

/// Construction parameters for a [`SnowflakeGenerator`].
///
/// Validated once at construction; see [`SnowflakeGenerator::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnowflakeConfig {
    /// Datacenter id, `0..=31`.
    pub datacenter_id: u64,
    /// Worker id, `0..=31`.
    pub worker_id: u64,
    /// Custom epoch in milliseconds since the Unix epoch. Must be positive
    /// and not in the future.
    pub epoch_millis: u64,
    /// Starting value for the per-millisecond sequence, `0..=4095`.
    pub initial_sequence: u64,
    /// Maximum backward clock jump absorbed by blocking instead of failing.
    pub clock_tolerance_millis: u64,
}

impl Default for SnowflakeConfig {
    fn default() -> Self {
        Self {
            datacenter_id: 0,
            worker_id: 0,
            epoch_millis: DEFAULT_EPOCH_MS,
            initial_sequence: 0,
            clock_tolerance_millis: DEFAULT_CLOCK_TOLERANCE_MS,
        }
    }
}

/// Instrumentation counters for a [`SnowflakeGenerator`].
///
/// Snapshots are taken under the generation lock, so the fields are always
/// mutually consistent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnowflakeStats {
    /// Total ids handed out.
    pub generated: u64,
    /// Sequence exhaustions absorbed by waiting for the next millisecond.
    pub sequence_overflows: u64,
    /// Backward clock jumps observed, whether tolerated or fatal.
    pub clock_regressions: u64,
}

#[derive(Debug)]
struct SnowflakeState {
    last_millis: u64,
    sequence: u64,
    stats: SnowflakeStats,
}

/// A thread-safe generator of 64-bit time-ordered [`SnowflakeId`]s.
///
/// Every call runs its entire check-mutate-compute sequence under the
/// instance's mutex, which makes one instance safe to share across
/// arbitrarily many producer threads at the cost of serializing generation.
/// The two blocking paths (absorbing a tolerated clock regression, waiting
/// out an exhausted sequence) sleep while the lock is held, so a stalled
/// call delays all other callers of the same instance.
///
/// Uniqueness across generator instances is the operator's responsibility:
/// assign each instance a distinct datacenter/worker pair.
///
/// # Example
///
/// ```
/// use sequin::{SerialGenerator, SnowflakeConfig, SnowflakeGenerator, SystemClock};
///
/// let generator = SnowflakeGenerator::new(SnowflakeConfig::default(), SystemClock)?;
/// let a = generator.next()?;
/// let b = generator.next()?;
/// assert!(a < b);
/// # Ok::<(), sequin::Error>(())
/// ```
#[derive(Debug)]
pub struct SnowflakeGenerator<T: TimeSource> {
    datacenter_id: u64,
    worker_id: u64,
    epoch_millis: u64,
    clock_tolerance_millis: u64,
    state: Arc<Mutex<SnowflakeState>>,
    time: T,
}

impl SnowflakeGenerator<SystemClock> {
    /// Creates a generator driven by the system wall clock.
    pub fn with_system_clock(config: SnowflakeConfig) -> Result<Self, ConfigError> {
        Self::new(config, SystemClock)
    }
}

impl<T: TimeSource> SnowflakeGenerator<T> {
    /// Creates a new generator after validating `config` against the id
    /// layout and the supplied clock.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if an id exceeds its 5-bit field, the initial
    /// sequence exceeds its 12-bit field, or the epoch is zero or ahead of
    /// `time`.
    pub fn new(config: SnowflakeConfig, time: T) -> Result<Self, ConfigError> {
        if config.datacenter_id > SnowflakeId::DATACENTER_MASK {
            return Err(ConfigError::DatacenterIdOutOfRange {
                got: config.datacenter_id,
                max: SnowflakeId::DATACENTER_MASK,
            });
        }
        if config.worker_id > SnowflakeId::WORKER_MASK {
            return Err(ConfigError::WorkerIdOutOfRange {
                got: config.worker_id,
                max: SnowflakeId::WORKER_MASK,
            });
        }
        if config.initial_sequence > SnowflakeId::SEQUENCE_MASK {
            return Err(ConfigError::SequenceOutOfRange {
                got: config.initial_sequence,
                max: SnowflakeId::SEQUENCE_MASK,
            });
        }
        if config.epoch_millis == 0 {
            return Err(ConfigError::EpochZero);
        }
        let now = time.current_millis();
        if config.epoch_millis > now {
            return Err(ConfigError::EpochInFuture {
                epoch_millis: config.epoch_millis,
                now_millis: now,
            });
        }

        Ok(Self {
            datacenter_id: config.datacenter_id,
            worker_id: config.worker_id,
            epoch_millis: config.epoch_millis,
            clock_tolerance_millis: config.clock_tolerance_millis,
            state: Arc::new(Mutex::new(SnowflakeState {
                last_millis: 0,
                sequence: config.initial_sequence,
                stats: SnowflakeStats::default(),
            })),
            time,
        })
    }

    /// Returns the current time of the injected clock, in milliseconds since
    /// the Unix epoch.
    pub fn current_time_millis(&self) -> u64 {
        self.time.current_millis()
    }

    /// Returns a consistent snapshot of the instrumentation counters.
    pub fn stats(&self) -> SnowflakeStats {
        self.state.lock().stats
    }

    /// Resets all instrumentation counters to zero.
    pub fn reset_stats(&self) {
        self.state.lock().stats = SnowflakeStats::default();
    }

    /// Generates the next id.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockBackward`] if the wall clock regressed further than
    ///   the configured tolerance. Tolerated regressions are absorbed by
    ///   sleeping for the regression plus one millisecond and resampling.
    /// - [`Error::ClockStalled`] if the sequence was exhausted and the clock
    ///   failed to advance within the bounded wait.
    pub fn try_next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.state.lock();

        let mut now = self.time.current_millis();
        if now < state.last_millis {
            state.stats.clock_regressions += 1;
            now = self.absorb_regression(state.last_millis, now)?;
        }

        if now == state.last_millis {
            state.sequence = (state.sequence + 1) & SnowflakeId::SEQUENCE_MASK;
            if state.sequence == 0 {
                state.stats.sequence_overflows += 1;
                now = self.wait_for_next_millis(state.last_millis)?;
            }
        } else {
            state.sequence = 0;
        }

        state.last_millis = now;
        state.stats.generated += 1;

        Ok(SnowflakeId::from_components(
            now - self.epoch_millis,
            self.datacenter_id,
            self.worker_id,
            state.sequence,
        ))
    }

    /// Blocks through a tolerated regression and resamples the clock.
    ///
    /// The caller holds the state lock; a regression still visible after the
    /// sleep is treated the same as one beyond tolerance.
    #[cold]
    #[inline(never)]
    fn absorb_regression(&self, last_millis: u64, now_millis: u64) -> Result<u64> {
        let delta = last_millis - now_millis;
        if delta > self.clock_tolerance_millis {
            return Err(Error::ClockBackward {
                last_millis,
                now_millis,
                tolerance_millis: self.clock_tolerance_millis,
            });
        }

        warn!(
            last_millis,
            now_millis, delta, "clock regressed within tolerance, blocking"
        );
        thread::sleep(Duration::from_millis(delta + 1));

        let resampled = self.time.current_millis();
        if resampled < last_millis {
            return Err(Error::ClockBackward {
                last_millis,
                now_millis: resampled,
                tolerance_millis: self.clock_tolerance_millis,
            });
        }
        Ok(resampled)
    }

    /// Waits for the clock to advance past `last_millis`, resampling every
    /// millisecond, up to [`STALL_LIMIT_MS`].
    #[cold]
    #[inline(never)]
    fn wait_for_next_millis(&self, last_millis: u64) -> Result<u64> {
        for _ in 0..STALL_LIMIT_MS {
            let now = self.time.current_millis();
            if now > last_millis {
                return Ok(now);
            }
            thread::sleep(Duration::from_millis(1));
        }
        Err(Error::ClockStalled {
            waited_millis: STALL_LIMIT_MS,
        })
    }
}

impl<T: TimeSource> SerialGenerator for SnowflakeGenerator<T> {
    type Output = SnowflakeId;

    fn next(&self) -> Result<SnowflakeId> {
        self.try_next_id()
    }
}
