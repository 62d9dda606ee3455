//! Plausibility Validators for Water-Quality Readings
//!
//! ## Overview
//!
//! The remote store gives back whatever the ingestion side wrote, and
//! field hardware does occasionally write garbage: NaN from a flooded
//! probe, a pH of 97 from a byte-order bug, a negative turbidity from a
//! miscalibrated conversion. Feeding such rows to the classifier yields
//! confident nonsense, so every reading passes a plausibility gate
//! before it is classified or charted.
//!
//! Two layers per quantity:
//!
//! 1. **Finiteness** - NaN and ±∞ are rejected outright
//!    ([`ReadingError::InvalidValue`]).
//! 2. **Range** - finite values outside the plausible window for open
//!    freshwater are rejected ([`ReadingError::OutOfRange`]).
//!
//! The default windows are deliberately wide - they exist to catch
//! corrupt rows, not to second-guess unusual but genuine conditions.
//! Tighter presets exist for deployments that know their site.
//!
//! ```
//! use aquawatch_core::validators::ReadingValidators;
//! use aquawatch_core::SensorReading;
//!
//! let validators = ReadingValidators::default();
//! let reading = SensorReading::new(22.5, 10.0, 7.2, 0);
//! assert!(validators.validate(&reading).is_ok());
//!
//! let garbage = SensorReading::new(f32::NAN, 10.0, 7.2, 0);
//! assert!(validators.validate(&garbage).is_err());
//! ```

mod ph;
mod temperature;
mod turbidity;
mod utils;

pub use ph::PhValidator;
pub use temperature::TemperatureValidator;
pub use turbidity::TurbidityValidator;

use crate::errors::ReadingResult;
use crate::reading::SensorReading;

/// Core validator trait - one implementation per measured quantity
pub trait Validator {
    /// Validate a single value
    fn validate(&self, value: f32) -> ReadingResult<()>;

    /// The plausible window this validator enforces
    fn bounds(&self) -> (f32, f32);
}

/// The full plausibility gate for one sensor reading
///
/// Bundles the three per-quantity validators so callers cannot forget
/// one of them.
#[derive(Debug, Clone, Default)]
pub struct ReadingValidators {
    /// Temperature gate
    pub temperature: TemperatureValidator,
    /// Turbidity gate
    pub turbidity: TurbidityValidator,
    /// pH gate
    pub ph: PhValidator,
}

impl ReadingValidators {
    /// Validate all three fields of a reading, first failure wins
    pub fn validate(&self, reading: &SensorReading) -> ReadingResult<()> {
        self.temperature.validate(reading.temperature)?;
        self.turbidity.validate(reading.turbidity)?;
        self.ph.validate(reading.ph)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausible_reading_passes() {
        let validators = ReadingValidators::default();
        let reading = SensorReading::new(24.0, 35.0, 7.8, 0);
        assert!(validators.validate(&reading).is_ok());
    }

    #[test]
    fn first_bad_field_wins() {
        let validators = ReadingValidators::default();
        let reading = SensorReading::new(f32::INFINITY, -3.0, 99.0, 0);
        // Temperature is checked first
        assert!(validators.validate(&reading).is_err());
    }
}
