/// Malformed Crockford Base32 input.
///
/// Decoding fails fast and completely: no partial value is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input is not exactly the fixed encoded length.
    #[error("expected {expected} characters, got {len}")]
    InvalidLength { len: usize, expected: usize },

    /// The input contains a byte outside the accepted alphabet.
    #[error("invalid character 0x{byte:02x} at index {index}")]
    InvalidChar { byte: u8, index: usize },
}
