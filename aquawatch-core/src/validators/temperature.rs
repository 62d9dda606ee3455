//! Temperature plausibility validator
//!
//! Open freshwater sits in a narrow thermal band: it cannot drop much
//! below freezing while a cage still floats in it, and sustained water
//! above the mid-forties would have killed the stock long before the
//! dashboard mattered. Readings outside that band are sensor faults.

use crate::errors::ReadingResult;

use super::utils;
use super::Validator;

/// Temperature validator for Celsius readings
#[derive(Debug, Clone)]
pub struct TemperatureValidator {
    /// Minimum plausible water temperature in °C
    min_celsius: f32,
    /// Maximum plausible water temperature in °C
    max_celsius: f32,
}

impl Default for TemperatureValidator {
    fn default() -> Self {
        Self {
            // Supercooled fringe under surface ice
            min_celsius: -5.0,

            // Hot-spring-fed shallows are the extreme upper end
            max_celsius: 45.0,
        }
    }
}

impl TemperatureValidator {
    /// Create a validator with custom limits
    pub fn new_with_limits(min: f32, max: f32) -> Self {
        // Sanity check: can't have min > max
        let (min, max) = if min > max { (max, min) } else { (min, max) };

        Self {
            min_celsius: min,
            max_celsius: max,
        }
    }

    /// Validator for a stocked tropical cage (tighter constraints)
    pub fn stocked_cage() -> Self {
        Self {
            min_celsius: 10.0, // Tilapia stop feeding well above this
            max_celsius: 40.0, // Gauge ceiling on the dashboard
        }
    }
}

impl Validator for TemperatureValidator {
    fn validate(&self, value: f32) -> ReadingResult<()> {
        utils::check_finite(value)?;
        utils::check_range(value, self.min_celsius, self.max_celsius)
    }

    fn bounds(&self) -> (f32, f32) {
        (self.min_celsius, self.max_celsius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ReadingError;

    #[test]
    fn valid_temperature() {
        let validator = TemperatureValidator::default();
        assert!(validator.validate(22.5).is_ok());
        assert!(validator.validate(-2.0).is_ok());
    }

    #[test]
    fn temperature_out_of_range() {
        let validator = TemperatureValidator::default();
        assert!(validator.validate(-40.0).is_err());
        assert!(validator.validate(80.0).is_err());
    }

    #[test]
    fn non_finite_rejected_before_range() {
        let validator = TemperatureValidator::default();
        assert_eq!(
            validator.validate(f32::NAN),
            Err(ReadingError::InvalidValue)
        );
    }

    #[test]
    fn stocked_cage_limits() {
        let validator = TemperatureValidator::stocked_cage();

        // Plausible open water, but lethal in a stocked cage
        assert!(validator.validate(4.0).is_err());

        // Normal tropical lake surface
        assert!(validator.validate(26.0).is_ok());
    }

    #[test]
    fn swapped_limits_are_repaired() {
        let validator = TemperatureValidator::new_with_limits(40.0, 10.0);
        assert_eq!(validator.bounds(), (10.0, 40.0));
    }
}
