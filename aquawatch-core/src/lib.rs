//! Core domain model for AquaWatch
//!
//! Holds the pieces every other crate builds on: sensor readings and
//! security events, quality labels, plausibility validation, the clock
//! abstraction, and the TTL-bounded fetch cache.
//!
//! Key constraints:
//! - No I/O here - remote access lives in `aquawatch-store`
//! - No persistent state - the cache is process-scoped and dies with it
//! - Deterministic time - everything takes a [`time::TimeSource`] or an
//!   explicit timestamp so tests never sleep
//!
//! ```
//! use aquawatch_core::{SensorReading, ReadingValidators};
//!
//! let reading = SensorReading::new(22.5, 10.0, 7.2, 1_700_000_000_000);
//! let validators = ReadingValidators::default();
//!
//! match validators.validate(&reading) {
//!     Ok(_) => {}, // plausible, safe to classify
//!     Err(e) => {}, // reject and log
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod errors;
pub mod reading;
pub mod time;
pub mod validators;

// Public API
pub use cache::{CacheEntry, FetchCache, QueryKey};
pub use errors::{ReadingError, ReadingResult};
pub use reading::{QualityLabel, SecurityEvent, SensorReading};
pub use validators::{
    PhValidator,
    ReadingValidators,
    TemperatureValidator,
    TurbidityValidator,
};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
