use core::fmt;

use crate::error::Result;

/// The minimal generation contract shared by every generator in this crate.
///
/// Identifier-assignment call sites depend on nothing else: they obtain a
/// typed value via [`SerialGenerator::next`] or its textual rendering via
/// [`SerialGenerator::next_string`]. A call either returns a fully valid
/// identifier or fails; there is no partial or best-effort output.
pub trait SerialGenerator {
    /// The typed identifier this generator produces.
    type Output: fmt::Display;

    /// Generates the next identifier.
    fn next(&self) -> Result<Self::Output>;

    /// Generates the next identifier and renders it as text.
    ///
    /// The default implementation delegates through the output's `Display`:
    /// decimal for integer-shaped ids, Crockford Base32 for ULIDs.
    fn next_string(&self) -> Result<String> {
        Ok(self.next()?.to_string())
    }
}
