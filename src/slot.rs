//! One display-eligible sensor and its cached lines

use crate::format::ValueFormatter;
use crate::sensor::{Sensor, SensorId};
use std::sync::Arc;

/// Pairs a sensor with the two lines it contributes to the display.
///
/// `line1` carries the sensor display name, `line2` the formatted value.
/// Both are recomputed on every refresh tick; between ticks they hold the
/// last rendered text.
pub struct SensorSlot {
    sensor: Arc<dyn Sensor>,
    pub line1: String,
    pub line2: String,
}

impl SensorSlot {
    pub fn new(sensor: Arc<dyn Sensor>) -> Self {
        Self {
            sensor,
            line1: String::new(),
            line2: String::new(),
        }
    }

    pub fn sensor_id(&self) -> &SensorId {
        self.sensor.id()
    }

    /// Recompute both lines from a fresh reading.
    pub fn refresh(&mut self, formatter: &ValueFormatter) {
        let reading = self.sensor.reading();
        self.line2 = formatter.format(&reading);
        self.line1 = reading.name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{SensorKind, StaticSensor};
    use crate::units::{FixedUnits, TemperatureUnit};

    #[test]
    fn test_refresh_fills_both_lines() {
        let formatter = ValueFormatter::new(Arc::new(FixedUnits(TemperatureUnit::Celsius)));
        let sensor = Arc::new(
            StaticSensor::new("/cpu/0/load/0", SensorKind::Load, "CPU Total", "CPU")
                .with_value(42.0),
        );
        let mut slot = SensorSlot::new(sensor);

        slot.refresh(&formatter);
        assert_eq!(slot.line1, "CPU Total");
        assert_eq!(slot.line2, "42%");
    }

    #[test]
    fn test_absent_value_degrades_to_dash() {
        let formatter = ValueFormatter::new(Arc::new(FixedUnits(TemperatureUnit::Celsius)));
        let sensor = Arc::new(StaticSensor::new(
            "/gpu/0/fan/0",
            SensorKind::Fan,
            "GPU Fan",
            "GPU",
        ));
        let mut slot = SensorSlot::new(sensor);

        slot.refresh(&formatter);
        assert_eq!(slot.line2, "-");
    }
}
