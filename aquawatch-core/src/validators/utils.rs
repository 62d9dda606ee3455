//! Shared validation helpers
//!
//! Pure functions, no allocation - every validator funnels through
//! these so finiteness and range behave identically across quantities.

use crate::errors::{ReadingError, ReadingResult};

/// Reject NaN and infinities before any range comparison
pub fn check_finite(value: f32) -> ReadingResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ReadingError::InvalidValue)
    }
}

/// Check that a finite value lies inside `[min, max]`
pub fn check_range(value: f32, min: f32, max: f32) -> ReadingResult<()> {
    if value < min || value > max {
        Err(ReadingError::OutOfRange { value, min, max })
    } else {
        Ok(())
    }
}
