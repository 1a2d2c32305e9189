use crate::base32::DecodeError;

/// Convenience alias used across the crate's generation APIs.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Rejected constructor arguments.
///
/// Raised once, at generator construction; a generator that constructed
/// successfully never reports these again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Datacenter id does not fit the 5-bit field.
    #[error("datacenter id {got} exceeds maximum {max}")]
    DatacenterIdOutOfRange { got: u64, max: u64 },

    /// Worker id does not fit the 5-bit field.
    #[error("worker id {got} exceeds maximum {max}")]
    WorkerIdOutOfRange { got: u64, max: u64 },

    /// Initial sequence does not fit the 12-bit field.
    #[error("initial sequence {got} exceeds maximum {max}")]
    SequenceOutOfRange { got: u64, max: u64 },

    /// The custom epoch must be strictly positive.
    #[error("epoch must be a positive timestamp")]
    EpochZero,

    /// The custom epoch lies ahead of the configured clock.
    #[error("epoch {epoch_millis} ms is in the future (clock reads {now_millis} ms)")]
    EpochInFuture { epoch_millis: u64, now_millis: u64 },
}

/// All runtime faults the generators can surface.
///
/// Sequence exhaustion and randomness-counter overflow are deliberately
/// absent: both are absorbed internally and only show up in the stats
/// counters.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid constructor arguments.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The wall clock regressed further than the configured tolerance.
    ///
    /// Not retried internally: resuming silently could hand out duplicate or
    /// decreasing ids.
    #[error(
        "clock moved backwards: last id generated at {last_millis} ms, \
         clock reads {now_millis} ms (tolerance {tolerance_millis} ms)"
    )]
    ClockBackward {
        last_millis: u64,
        now_millis: u64,
        tolerance_millis: u64,
    },

    /// The clock failed to advance past an exhausted millisecond within the
    /// bounded wait.
    #[error("clock failed to advance within {waited_millis} ms")]
    ClockStalled { waited_millis: u64 },

    /// Malformed ULID text.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Composite order-code generation failed; the source, when present,
    /// carries the underlying generator fault.
    #[error("order code generation failed")]
    OrderCode(#[source] Option<Box<Error>>),
}
