//! pH plausibility validator
//!
//! The pH scale is bounded by definition, so anything outside 0-14 is a
//! broken probe or a decoding bug, never water.

use crate::errors::ReadingResult;

use super::utils;
use super::Validator;

/// pH validator on the 0-14 scale
#[derive(Debug, Clone)]
pub struct PhValidator {
    min_ph: f32,
    max_ph: f32,
}

impl Default for PhValidator {
    fn default() -> Self {
        Self {
            min_ph: 0.0,
            max_ph: 14.0,
        }
    }
}

impl PhValidator {
    /// Validator for managed freshwater (tighter constraints)
    ///
    /// Stocked cages are kept well inside the survivable band; values
    /// outside it are worth flagging even when chemically possible.
    pub fn freshwater() -> Self {
        Self {
            min_ph: 4.0,
            max_ph: 11.0,
        }
    }
}

impl Validator for PhValidator {
    fn validate(&self, value: f32) -> ReadingResult<()> {
        utils::check_finite(value)?;
        utils::check_range(value, self.min_ph, self.max_ph)
    }

    fn bounds(&self) -> (f32, f32) {
        (self.min_ph, self.max_ph)
    }
}
