//! Per-kind value formatting
//!
//! Turns one sensor reading into the short string shown on a display cell.
//! Every anomaly (missing value) degrades to a dash; formatting never fails.

use crate::sensor::{SensorKind, SensorReading};
use crate::units::{celsius_to_fahrenheit, TemperatureUnit, UnitPreferences};
use std::sync::Arc;

/// Text shown when a sensor has no current value.
const NO_VALUE: &str = "-";

/// Formats sensor readings with unit suffixes and per-kind precision.
///
/// The temperature unit preference is read on every call, so an external
/// preference change is picked up on the next refresh.
pub struct ValueFormatter {
    units: Arc<dyn UnitPreferences>,
}

impl ValueFormatter {
    pub fn new(units: Arc<dyn UnitPreferences>) -> Self {
        Self { units }
    }

    /// Format one reading for display.
    ///
    /// Rounding follows Rust's float `Display` (round-half-to-even at the
    /// requested precision), so a 3500 MHz-range clock reads "4MHz" after
    /// the kilo scale-down.
    pub fn format(&self, reading: &SensorReading) -> String {
        let Some(value) = reading.value else {
            return NO_VALUE.to_string();
        };

        match reading.kind {
            SensorKind::Voltage => format!("{value:.2}V"),
            SensorKind::Clock => format!("{:.0}MHz", value / 1000.0),
            SensorKind::Load => format!("{value:.0}%"),
            SensorKind::Temperature => match self.units.temperature_unit() {
                TemperatureUnit::Celsius => format!("{value:.0}°C"),
                TemperatureUnit::Fahrenheit => {
                    format!("{:.0}°F", celsius_to_fahrenheit(value))
                }
            },
            SensorKind::Fan => format!("{:.0}R", value / 1000.0),
            SensorKind::Flow => format!("{:.0}L/h", value / 1000.0),
            SensorKind::Control => format!("{value:.0}%"),
            SensorKind::Level => format!("{value:.0}%"),
            SensorKind::Power => format!("{value:.0}W"),
            SensorKind::Data => format!("{value:.0}GB"),
            // "GB" kept verbatim from the upstream format table, defect and all.
            SensorKind::Factor => format!("{value:.3}GB"),
        }
    }
}
