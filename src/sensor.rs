//! Sensor model and the hardware-subsystem seam
//!
//! The hardware monitor owns discovery and value acquisition; this crate only
//! consumes snapshots through the [`Sensor`] and [`Hardware`] traits and
//! reacts to [`HardwareEvent`] notifications delivered by the host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Opaque, stable identifier for one physical sensor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(String);

impl SensorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SensorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SensorId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Kind of quantity a sensor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    Voltage,
    Clock,
    Load,
    Temperature,
    Fan,
    Flow,
    Control,
    Level,
    Power,
    Data,
    Factor,
}

/// Immutable snapshot of one sensor, taken at refresh time.
#[derive(Debug, Clone)]
pub struct SensorReading {
    pub id: SensorId,
    pub kind: SensorKind,
    /// `None` while the sensor has no current value.
    pub value: Option<f32>,
    /// Sensor display name (e.g. "CPU Core").
    pub name: String,
    /// Name of the hardware the sensor belongs to.
    pub hardware_name: String,
}

/// One sensor exposed by the hardware subsystem.
pub trait Sensor: Send + Sync {
    fn id(&self) -> &SensorId;

    /// Snapshot the current state of the sensor.
    fn reading(&self) -> SensorReading;
}

/// One hardware node in the monitor's device tree.
pub trait Hardware: Send + Sync {
    fn name(&self) -> &str;

    fn sensors(&self) -> Vec<Arc<dyn Sensor>>;

    fn sub_hardware(&self) -> Vec<Arc<dyn Hardware>>;
}

/// Notifications delivered by the hardware subsystem.
///
/// Hardware events cover the whole sub-tree of the named node; sensor events
/// are for a single sensor.
pub enum HardwareEvent {
    HardwareAdded(Arc<dyn Hardware>),
    HardwareRemoved(Arc<dyn Hardware>),
    SensorAdded(Arc<dyn Sensor>),
    SensorRemoved(SensorId),
}

/// A sensor with an externally settable value.
///
/// Useful for hosts that push values instead of exposing a polling API, and
/// as a stand-in sensor in tests and the demo binary.
pub struct StaticSensor {
    id: SensorId,
    kind: SensorKind,
    name: String,
    hardware_name: String,
    value: Mutex<Option<f32>>,
}

impl StaticSensor {
    pub fn new(
        id: impl Into<SensorId>,
        kind: SensorKind,
        name: impl Into<String>,
        hardware_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            hardware_name: hardware_name.into(),
            value: Mutex::new(None),
        }
    }

    pub fn with_value(self, value: f32) -> Self {
        self.set_value(Some(value));
        self
    }

    pub fn set_value(&self, value: Option<f32>) {
        *self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = value;
    }
}

impl Sensor for StaticSensor {
    fn id(&self) -> &SensorId {
        &self.id
    }

    fn reading(&self) -> SensorReading {
        SensorReading {
            id: self.id.clone(),
            kind: self.kind,
            value: *self.value.lock().unwrap_or_else(PoisonError::into_inner),
            name: self.name.clone(),
            hardware_name: self.hardware_name.clone(),
        }
    }
}

/// A fixed hardware node built from parts, for tests and the demo binary.
#[derive(Default)]
pub struct StaticHardware {
    name: String,
    sensors: Vec<Arc<dyn Sensor>>,
    children: Vec<Arc<dyn Hardware>>,
}

impl StaticHardware {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sensors: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_sensor(mut self, sensor: Arc<dyn Sensor>) -> Self {
        self.sensors.push(sensor);
        self
    }

    pub fn with_sub_hardware(mut self, hardware: Arc<dyn Hardware>) -> Self {
        self.children.push(hardware);
        self
    }
}

impl Hardware for StaticHardware {
    fn name(&self) -> &str {
        &self.name
    }

    fn sensors(&self) -> Vec<Arc<dyn Sensor>> {
        self.sensors.clone()
    }

    fn sub_hardware(&self) -> Vec<Arc<dyn Hardware>> {
        self.children.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_sensor_reading() {
        let sensor = StaticSensor::new(
            "/cpu/0/temperature/0",
            SensorKind::Temperature,
            "CPU Core",
            "CPU",
        );
        assert!(sensor.reading().value.is_none());

        sensor.set_value(Some(42.5));
        let reading = sensor.reading();
        assert_eq!(reading.value, Some(42.5));
        assert_eq!(reading.name, "CPU Core");
        assert_eq!(reading.hardware_name, "CPU");
    }

    #[test]
    fn test_static_hardware_tree() {
        let sub = StaticHardware::new("SuperIO").with_sensor(Arc::new(StaticSensor::new(
            "/lpc/fan/0",
            SensorKind::Fan,
            "Fan #1",
            "SuperIO",
        )));
        let root = StaticHardware::new("Mainboard")
            .with_sensor(Arc::new(StaticSensor::new(
                "/mb/voltage/0",
                SensorKind::Voltage,
                "VCore",
                "Mainboard",
            )))
            .with_sub_hardware(Arc::new(sub));

        assert_eq!(root.sensors().len(), 1);
        assert_eq!(root.sub_hardware().len(), 1);
        assert_eq!(root.sub_hardware()[0].sensors().len(), 1);
    }
}
