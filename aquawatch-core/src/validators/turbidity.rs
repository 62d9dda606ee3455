//! Turbidity plausibility validator
//!
//! Turbidity here is a transparency depth in cm - zero means opaque
//! water, and the probe tops out at its own staff length.

use crate::errors::ReadingResult;

use super::utils;
use super::Validator;

/// Turbidity validator for transparency-depth readings in cm
#[derive(Debug, Clone)]
pub struct TurbidityValidator {
    min_cm: f32,
    max_cm: f32,
}

impl Default for TurbidityValidator {
    fn default() -> Self {
        Self {
            min_cm: 0.0,
            max_cm: 100.0, // Probe staff length
        }
    }
}

impl TurbidityValidator {
    /// Create a validator with custom limits
    pub fn new_with_limits(min: f32, max: f32) -> Self {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        Self {
            min_cm: min.max(0.0),
            max_cm: max,
        }
    }
}

impl Validator for TurbidityValidator {
    fn validate(&self, value: f32) -> ReadingResult<()> {
        utils::check_finite(value)?;
        utils::check_range(value, self.min_cm, self.max_cm)
    }

    fn bounds(&self) -> (f32, f32) {
        (self.min_cm, self.max_cm)
    }
}
