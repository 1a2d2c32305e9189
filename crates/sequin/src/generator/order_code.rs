use tracing::error;

use crate::error::{Error, Result};
use crate::generator::{SerialGenerator, SnowflakeGenerator};
use crate::time::TimeSource;

/// A composite generator of decimal business order codes.
///
/// Each code is the wrapped generator's current wall-clock milliseconds
/// concatenated with its next snowflake id rendered in decimal. The prefix
/// makes codes sort by generation time; the embedded snowflake keeps them
/// unique.
///
/// All underlying faults are logged with context and re-raised as a single
/// [`Error::OrderCode`], so callers see one failure mode regardless of what
/// went wrong underneath.
///
/// # Example
///
/// ```
/// use sequin::{OrderCodeGenerator, SerialGenerator, SnowflakeConfig, SnowflakeGenerator};
///
/// let inner = SnowflakeGenerator::with_system_clock(SnowflakeConfig::default())?;
/// let orders = OrderCodeGenerator::new(inner);
/// let code = orders.next_string()?;
/// assert!(code.chars().all(|c| c.is_ascii_digit()));
/// # Ok::<(), sequin::Error>(())
/// ```
pub struct OrderCodeGenerator<T: TimeSource> {
    inner: SnowflakeGenerator<T>,
}

impl<T: TimeSource> OrderCodeGenerator<T> {
    /// Wraps a snowflake generator.
    pub fn new(inner: SnowflakeGenerator<T>) -> Self {
        Self { inner }
    }

    /// Returns a reference to the wrapped generator, e.g. for stats.
    pub fn inner(&self) -> &SnowflakeGenerator<T> {
        &self.inner
    }
}

impl<T: TimeSource> SerialGenerator for OrderCodeGenerator<T> {
    /// The decimal concatenation of a millisecond timestamp and a snowflake
    /// id exceeds 64 bits, so the integer form is 128-bit.
    type Output = u128;

    fn next(&self) -> Result<u128> {
        let code = self.next_string()?;
        code.parse().map_err(|parse_err| {
            error!(code = %code, error = %parse_err, "order code exceeds the integer range");
            Error::OrderCode(None)
        })
    }

    fn next_string(&self) -> Result<String> {
        let timestamp = self.inner.current_time_millis();
        match self.inner.next_string() {
            Ok(serial) => Ok(format!("{timestamp}{serial}")),
            Err(err) => {
                error!(timestamp, error = %err, "order code generation failed");
                Err(Error::OrderCode(Some(Box::new(err))))
            }
        }
    }
}
