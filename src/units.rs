//! Temperature unit preference seam

use serde::{Deserialize, Serialize};

/// Unit used when formatting temperature readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl Default for TemperatureUnit {
    fn default() -> Self {
        TemperatureUnit::Celsius
    }
}

/// Convert a Celsius value to Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Read-only access to the user's unit preferences.
///
/// The preference is owned and mutated elsewhere; the formatter reads it
/// on every format call so an external change takes effect on the next
/// refresh tick.
pub trait UnitPreferences: Send + Sync {
    fn temperature_unit(&self) -> TemperatureUnit;
}

/// Fixed unit preference, for hosts without a preference provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedUnits(pub TemperatureUnit);

impl UnitPreferences for FixedUnits {
    fn temperature_unit(&self) -> TemperatureUnit {
        self.0
    }
}
