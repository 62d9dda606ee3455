//! Error types for reading plausibility failures
//!
//! Kept small and `Copy`: a rejected row carries just enough context
//! to log why it was dropped, without any allocation.

use thiserror::Error;

/// Result type for reading validation
pub type ReadingResult<T> = Result<T, ReadingError>;

/// Why a sensor reading was rejected before classification
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ReadingError {
    /// Value is NaN or infinite - the store handed back garbage
    #[error("invalid value: not a finite number")]
    InvalidValue,

    /// Value is finite but outside the plausible range for the quantity
    #[error("value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// The reading that failed validation
        value: f32,
        /// Minimum plausible value
        min: f32,
        /// Maximum plausible value
        max: f32,
    },
}
