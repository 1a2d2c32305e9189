use core::fmt;
use core::str::FromStr;

use uuid::Uuid;

use crate::base32::{self, DecodeError, ENCODED_LEN};

/// A 128-bit ULID.
///
/// - 48 bits timestamp in milliseconds since the Unix epoch
/// - 80 bits randomness
///
/// ```text
///  Bit Index:  127            80 79           0
///              +----------------+-------------+
///  Field:      | timestamp (48) | random (80) |
///              +----------------+-------------+
///              |<-- MSB -- 128 bits -- LSB -->|
/// ```
///
/// The canonical text form is 26 Crockford Base32 characters (10 for the
/// timestamp, 16 for the randomness) and sorts lexicographically in
/// generation order. [`Ulid::to_uuid`] re-encodes the same 128 bits in the
/// hyphenated UUID layout for interoperability.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Ulid {
    id: u128,
}

impl Ulid {
    pub const TIMESTAMP_BITS: u32 = 48;
    pub const RANDOM_BITS: u32 = 80;

    pub const RANDOM_SHIFT: u32 = 0;
    pub const TIMESTAMP_SHIFT: u32 = Self::RANDOM_SHIFT + Self::RANDOM_BITS;

    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
    pub const RANDOM_MASK: u128 = (1 << Self::RANDOM_BITS) - 1;

    /// Number of random bytes backing the 80-bit randomness field.
    pub const RANDOM_BYTES: usize = 10;

    /// Packs a timestamp and a random value into a ULID.
    #[must_use]
    pub const fn from_parts(timestamp_millis: u64, random: u128) -> Self {
        let t = ((timestamp_millis & Self::TIMESTAMP_MASK) as u128) << Self::TIMESTAMP_SHIFT;
        let r = (random & Self::RANDOM_MASK) << Self::RANDOM_SHIFT;
        Self { id: t | r }
    }

    /// Packs a timestamp and 10 big-endian random bytes into a ULID.
    #[must_use]
    pub const fn from_timestamp_and_bytes(
        timestamp_millis: u64,
        random: &[u8; Self::RANDOM_BYTES],
    ) -> Self {
        let mut buf = [0u8; 16];
        let mut i = 0;
        while i < Self::RANDOM_BYTES {
            buf[16 - Self::RANDOM_BYTES + i] = random[i];
            i += 1;
        }
        Self::from_parts(timestamp_millis, u128::from_be_bytes(buf))
    }

    /// Extracts the timestamp in milliseconds since the Unix epoch.
    #[must_use]
    pub const fn timestamp_millis(&self) -> u64 {
        ((self.id >> Self::TIMESTAMP_SHIFT) as u64) & Self::TIMESTAMP_MASK
    }

    /// Extracts the 80-bit randomness field.
    #[must_use]
    pub const fn random(&self) -> u128 {
        (self.id >> Self::RANDOM_SHIFT) & Self::RANDOM_MASK
    }

    /// Returns the randomness field as 10 big-endian bytes.
    #[must_use]
    pub const fn random_bytes(&self) -> [u8; Self::RANDOM_BYTES] {
        let be = self.random().to_be_bytes();
        let mut out = [0u8; Self::RANDOM_BYTES];
        let mut i = 0;
        while i < Self::RANDOM_BYTES {
            out[i] = be[16 - Self::RANDOM_BYTES + i];
            i += 1;
        }
        out
    }

    /// Converts this id into its raw integer representation.
    #[must_use]
    pub const fn to_raw(&self) -> u128 {
        self.id
    }

    /// Converts a raw integer into an id.
    #[must_use]
    pub const fn from_raw(raw: u128) -> Self {
        Self { id: raw }
    }

    /// Re-encodes the same 128 bits as a [`Uuid`].
    ///
    /// This is a pure re-encoding, not a new value; `Uuid`'s `Display` is
    /// the canonical lowercase hyphenated 8-4-4-4-12 layout.
    #[must_use]
    pub const fn to_uuid(&self) -> Uuid {
        Uuid::from_u128(self.id)
    }

    /// Decodes the canonical 26-character Crockford Base32 form.
    ///
    /// Case-insensitive; the aliases `I`/`L` decode as 1 and `O` as 0.
    ///
    /// # Errors
    ///
    /// [`DecodeError`] if the input is not exactly 26 characters or contains
    /// a byte outside the accepted alphabet.
    pub fn from_base32(encoded: &str) -> Result<Self, DecodeError> {
        base32::decode(encoded).map(Self::from_raw)
    }

    /// Writes the canonical 26-character form into a stack buffer.
    #[must_use]
    pub fn encode(&self) -> [u8; ENCODED_LEN] {
        let mut buf = [0u8; ENCODED_LEN];
        base32::encode(self.id, &mut buf);
        buf
    }
}

impl fmt::Display for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buf = self.encode();
        // The buffer holds only Crockford alphabet characters, all ASCII.
        f.write_str(core::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ulid")
            .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
            .field("timestamp_millis", &self.timestamp_millis())
            .field("random", &format_args!("0x{:x}", self.random()))
            .finish()
    }
}

impl FromStr for Ulid {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base32(s)
    }
}

impl TryFrom<&str> for Ulid {
    type Error = DecodeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_base32(s)
    }
}

impl From<Ulid> for u128 {
    fn from(id: Ulid) -> Self {
        id.to_raw()
    }
}

impl From<Ulid> for Uuid {
    fn from(id: Ulid) -> Self {
        id.to_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_roundtrip() {
        let id = Ulid::from_parts(1_469_922_850_259, 1_012_768_647_078_601_740_696_923);
        assert_eq!(id.timestamp_millis(), 1_469_922_850_259);
        assert_eq!(id.random(), 1_012_768_647_078_601_740_696_923);
        assert_eq!(id.to_string(), "01ARZ3NDEKTSV4RRFFQ69G5FAV");
    }

    #[test]
    fn byte_parts_roundtrip() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A];
        let id = Ulid::from_timestamp_and_bytes(42, &bytes);
        assert_eq!(id.timestamp_millis(), 42);
        assert_eq!(id.random_bytes(), bytes);
    }

    #[test]
    fn zero_is_all_zero_characters() {
        let id = Ulid::from_parts(0, 0);
        assert_eq!(id.to_string(), "00000000000000000000000000");
    }

    #[test]
    fn from_str_roundtrips_display() {
        let id = Ulid::from_parts(1_611_559_180_765, 885_339_478_614_498_720_052_741);
        let text = id.to_string();
        assert_eq!(text.parse::<Ulid>().unwrap(), id);
    }

    #[test]
    fn uuid_preserves_bits() {
        let id = Ulid::from_parts(1_469_922_850_259, 0xDEAD_BEEF);
        assert_eq!(id.to_uuid().as_u128(), id.to_raw());
    }

    #[test]
    fn uuid_text_is_hyphenated_lowercase_hex() {
        let id = Ulid::from_base32("01AN4Z07BY79KA1307SR9X4MV3").unwrap();
        let text = id.to_uuid().to_string();
        assert_eq!(text.len(), 36);
        for (i, c) in text.char_indices() {
            if matches!(i, 8 | 13 | 18 | 23) {
                assert_eq!(c, '-');
            } else {
                assert!(c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
            }
        }
    }
}
