use core::fmt;

/// A 64-bit Snowflake-style identifier.
///
/// - 1 bit reserved (always zero, keeps the value positive as a signed 64-bit
///   integer)
/// - 41 bits timestamp delta in milliseconds since a configurable epoch
/// - 5 bits datacenter id
/// - 5 bits worker id
/// - 12 bits per-millisecond sequence
///
/// ```text
///  Bit Index:  63 62        22 21      17 16      12 11         0
///              +--+------------+----------+---------+-----------+
///  Field:      |r | timestamp  |datacenter| worker  | sequence  |
///              +--+------------+----------+---------+-----------+
///              |<---- MSB ------- 64 bits ------------- LSB --->|
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SnowflakeId {
    id: u64,
}

const _: () = {
    assert!(
        SnowflakeId::RESERVED_BITS
            + SnowflakeId::TIMESTAMP_BITS
            + SnowflakeId::DATACENTER_BITS
            + SnowflakeId::WORKER_BITS
            + SnowflakeId::SEQUENCE_BITS
            == u64::BITS,
        "layout must match underlying type width"
    );
};

impl SnowflakeId {
    pub const RESERVED_BITS: u32 = 1;
    pub const TIMESTAMP_BITS: u32 = 41;
    pub const DATACENTER_BITS: u32 = 5;
    pub const WORKER_BITS: u32 = 5;
    pub const SEQUENCE_BITS: u32 = 12;

    pub const SEQUENCE_SHIFT: u32 = 0;
    pub const WORKER_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
    pub const DATACENTER_SHIFT: u32 = Self::WORKER_SHIFT + Self::WORKER_BITS;
    pub const TIMESTAMP_SHIFT: u32 = Self::DATACENTER_SHIFT + Self::DATACENTER_BITS;

    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
    pub const DATACENTER_MASK: u64 = (1 << Self::DATACENTER_BITS) - 1;
    pub const WORKER_MASK: u64 = (1 << Self::WORKER_BITS) - 1;
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Packs the four components into an id.
    ///
    /// Components are masked to their field widths; the timestamp must fit
    /// its 41 bits.
    #[must_use]
    pub const fn from_components(
        timestamp_delta: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        debug_assert!(timestamp_delta <= Self::TIMESTAMP_MASK, "timestamp overflow");
        let t = (timestamp_delta & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let d = (datacenter_id & Self::DATACENTER_MASK) << Self::DATACENTER_SHIFT;
        let w = (worker_id & Self::WORKER_MASK) << Self::WORKER_SHIFT;
        let s = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self { id: t | d | w | s }
    }

    /// Extracts the timestamp delta in milliseconds since the generator's
    /// epoch.
    #[must_use]
    pub const fn timestamp_delta(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the datacenter id.
    #[must_use]
    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> Self::DATACENTER_SHIFT) & Self::DATACENTER_MASK
    }

    /// Extracts the worker id.
    #[must_use]
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_SHIFT) & Self::WORKER_MASK
    }

    /// Extracts the per-millisecond sequence.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Converts this id into its raw integer representation.
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw integer into an id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
            .field("timestamp_delta", &self.timestamp_delta())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_shifts_match_layout() {
        assert_eq!(SnowflakeId::WORKER_SHIFT, 12);
        assert_eq!(SnowflakeId::DATACENTER_SHIFT, 17);
        assert_eq!(SnowflakeId::TIMESTAMP_SHIFT, 22);
    }

    #[test]
    fn components_roundtrip() {
        let id = SnowflakeId::from_components(1000, 1, 1, 0);
        assert_eq!(id.timestamp_delta(), 1000);
        assert_eq!(id.datacenter_id(), 1);
        assert_eq!(id.worker_id(), 1);
        assert_eq!(id.sequence(), 0);
        assert_eq!(id.to_raw(), 4_194_439_168);
    }

    #[test]
    fn max_fields_roundtrip() {
        let id = SnowflakeId::from_components(
            SnowflakeId::TIMESTAMP_MASK,
            SnowflakeId::DATACENTER_MASK,
            SnowflakeId::WORKER_MASK,
            SnowflakeId::SEQUENCE_MASK,
        );
        assert_eq!(id.timestamp_delta(), SnowflakeId::TIMESTAMP_MASK);
        assert_eq!(id.datacenter_id(), 31);
        assert_eq!(id.worker_id(), 31);
        assert_eq!(id.sequence(), 4095);
        // Reserved sign bit stays clear.
        assert_eq!(id.to_raw() >> 63, 0);
    }

    #[test]
    fn display_is_decimal() {
        let id = SnowflakeId::from_raw(4_194_439_168);
        assert_eq!(id.to_string(), "4194439168");
    }
}
