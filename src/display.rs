//! Sensor-set membership and the top-level display facade
//!
//! `SensorDisplay` glues the three seams together: hardware events come in,
//! the selection store decides which sensors are display-eligible, and the
//! rotator renders whatever is currently in the set.

use crate::rotator::DisplayRotator;
use crate::sensor::{Hardware, HardwareEvent, Sensor, SensorId};
use crate::settings::SelectionStore;
use crate::transport::DisplayClient;
use crate::units::UnitPreferences;
use std::sync::Arc;

/// Rotating sensor readout bound to one external display.
pub struct SensorDisplay {
    rotator: DisplayRotator,
    store: Box<dyn SelectionStore>,
}

impl SensorDisplay {
    pub fn new(
        client: Box<dyn DisplayClient>,
        store: Box<dyn SelectionStore>,
        units: Arc<dyn UnitPreferences>,
    ) -> Self {
        Self {
            rotator: DisplayRotator::new(client, units),
            store,
        }
    }

    /// Replace the rotator's wall-clock source (tests, custom hosts).
    pub fn with_time_source(mut self, source: impl Fn() -> String + Send + 'static) -> Self {
        self.rotator.set_time_source(Box::new(source));
        self
    }

    pub fn sensor_count(&self) -> usize {
        self.rotator.slot_count()
    }

    pub fn contains(&self, id: &SensorId) -> bool {
        self.rotator.contains(id)
    }

    /// Whether this sensor is persisted as display-enabled.
    pub fn is_selected(&self, id: &SensorId) -> bool {
        self.store.is_selected(id)
    }

    /// Render one tick; see [`DisplayRotator::refresh`].
    pub fn refresh(&mut self, packed: bool, show_time: bool) {
        self.rotator.refresh(packed, show_time);
    }

    /// Put a sensor on the display. Adding a sensor that is already shown
    /// is a no-op. The selection is persisted so the sensor comes back
    /// after a restart.
    pub fn add_sensor(&mut self, sensor: Arc<dyn Sensor>) {
        if self.rotator.contains(sensor.id()) {
            return;
        }
        log::debug!("adding sensor {} to display set", sensor.id());
        self.store.set_selected(sensor.id(), true);
        self.rotator.add_slot(sensor);
    }

    /// Take a sensor off the display. Removing an unknown sensor is a
    /// no-op. `delete_config` distinguishes user deselection (drop the
    /// persisted entry) from hardware disappearing (keep it, so the sensor
    /// returns when the hardware does).
    pub fn remove_sensor(&mut self, id: &SensorId, delete_config: bool) {
        if !self.rotator.contains(id) {
            return;
        }
        log::debug!("removing sensor {id} from display set");
        if delete_config {
            self.store.remove(id);
        }
        self.rotator.remove_slot(id);
    }

    /// Consume one hardware-subsystem notification.
    ///
    /// Hardware add/remove walks the whole sub-hardware tree; each sensor
    /// found is a membership candidate gated on its persisted selection.
    pub fn handle_event(&mut self, event: HardwareEvent) {
        match event {
            HardwareEvent::HardwareAdded(hardware) => self.hardware_added(&hardware),
            HardwareEvent::HardwareRemoved(hardware) => self.hardware_removed(&hardware),
            HardwareEvent::SensorAdded(sensor) => self.sensor_added(sensor),
            HardwareEvent::SensorRemoved(id) => self.remove_sensor(&id, false),
        }
    }

    /// The transport asked us to close the session.
    pub fn handle_close_order(&mut self) {
        self.rotator.close_session();
    }

    /// Release the display session. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.rotator.close_session();
    }

    fn hardware_added(&mut self, hardware: &Arc<dyn Hardware>) {
        log::debug!("hardware added: {}", hardware.name());
        for sensor in hardware.sensors() {
            self.sensor_added(sensor);
        }
        for sub in hardware.sub_hardware() {
            self.hardware_added(&sub);
        }
    }

    fn hardware_removed(&mut self, hardware: &Arc<dyn Hardware>) {
        log::debug!("hardware removed: {}", hardware.name());
        for sensor in hardware.sensors() {
            self.remove_sensor(sensor.id(), false);
        }
        for sub in hardware.sub_hardware() {
            self.hardware_removed(&sub);
        }
    }

    fn sensor_added(&mut self, sensor: Arc<dyn Sensor>) {
        if self.store.is_selected(sensor.id()) {
            self.add_sensor(sensor);
        }
    }
}

impl Drop for SensorDisplay {
    fn drop(&mut self) {
        self.shutdown();
    }
}
