mod crockford;
mod error;

pub(crate) use crockford::{decode, encode};
pub use crockford::{ALPHABET, ENCODED_LEN};
pub use error::*;
