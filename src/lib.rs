//! vfd-sens: rotating sensor readouts for small character displays
//!
//! This library provides the core of a front-panel sensor readout:
//! - Sensor model and the hardware-subsystem seam
//! - Per-kind value formatting honoring a temperature unit preference
//! - 2-cell / 4-cell layout rotation driven by an external periodic tick
//! - Sensor-set membership with a persistence seam for the selection
//!
//! Hardware discovery, the display transport itself, and any configuration
//! UI live behind the `Hardware`, `DisplayClient`, and `SelectionStore`
//! traits respectively.

pub mod constants;
pub mod display;
pub mod format;
pub mod rotator;
pub mod sensor;
pub mod settings;
pub mod slot;
pub mod transport;
pub mod units;

// Re-export commonly used types
pub use display::SensorDisplay;
pub use format::ValueFormatter;
pub use rotator::{DisplayRotator, LayoutMode};
pub use sensor::{
    Hardware, HardwareEvent, Sensor, SensorId, SensorKind, SensorReading, StaticHardware,
    StaticSensor,
};
pub use settings::{FileSelectionStore, MemorySelectionStore, SelectionStore};
pub use slot::SensorSlot;
pub use transport::{
    ClientOp, ConsoleClient, DisplayClient, DisplayError, FieldAlignment, RecordingClient,
    TableLayout, TextField,
};
pub use units::{celsius_to_fahrenheit, FixedUnits, TemperatureUnit, UnitPreferences};
