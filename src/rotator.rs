//! Layout selection and time-sliced rotation of the visible cells
//!
//! The rotator owns the ordered slot list and the display session. An
//! external periodic tick drives [`DisplayRotator::refresh`]; membership
//! changes arrive through the slot operations. Two states: `Inactive`
//! (no slots, display not claimed) and `Active` (session open, cells
//! updated every tick).

use crate::constants::{CLIENT_NAME, MAX_LINE_CHARS, PACKED_NAME_CHARS, TICKS_PER_SWITCH};
use crate::format::ValueFormatter;
use crate::sensor::{Sensor, SensorId};
use crate::slot::SensorSlot;
use crate::transport::{DisplayClient, FieldAlignment, TableLayout, TextField};
use crate::units::UnitPreferences;
use std::sync::Arc;

/// Cell geometry currently declared to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Two cells, one sensor at a time: name on top, value below.
    Simple,
    /// Four cells, up to four truncated readouts at once.
    Packed,
}

impl LayoutMode {
    fn from_packed(packed: bool) -> Self {
        if packed {
            LayoutMode::Packed
        } else {
            LayoutMode::Simple
        }
    }

    fn layout(self) -> TableLayout {
        match self {
            LayoutMode::Simple => TableLayout::new(2, 1),
            LayoutMode::Packed => TableLayout::new(2, 2),
        }
    }
}

type TimeSource = Box<dyn Fn() -> String + Send>;

fn wall_clock() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Owns the active slots, the layout mode, and the rotation cursor.
pub struct DisplayRotator {
    client: Box<dyn DisplayClient>,
    formatter: ValueFormatter,
    slots: Vec<SensorSlot>,
    mode: LayoutMode,
    /// Index of the sensor currently shown in simple mode; always a valid
    /// slot index, or 0 when the slot list is empty.
    cursor: usize,
    ticks: u32,
    active: bool,
    time_source: TimeSource,
    top: TextField,
    bottom: TextField,
    top_right: TextField,
    bottom_right: TextField,
}

impl DisplayRotator {
    pub fn new(client: Box<dyn DisplayClient>, units: Arc<dyn UnitPreferences>) -> Self {
        Self {
            client,
            formatter: ValueFormatter::new(units),
            slots: Vec::new(),
            mode: LayoutMode::Simple,
            cursor: 0,
            ticks: 0,
            active: false,
            time_source: Box::new(wall_clock),
            top: TextField::new(FieldAlignment::MiddleLeft, 0, 0),
            bottom: TextField::new(FieldAlignment::MiddleLeft, 0, 1),
            top_right: TextField::new(FieldAlignment::MiddleRight, 1, 0),
            bottom_right: TextField::new(FieldAlignment::MiddleRight, 1, 1),
        }
    }

    /// Replace the wall-clock source used for the time readout.
    pub fn with_time_source(mut self, source: impl Fn() -> String + Send + 'static) -> Self {
        self.set_time_source(Box::new(source));
        self
    }

    pub(crate) fn set_time_source(&mut self, source: TimeSource) {
        self.time_source = source;
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn contains(&self, id: &SensorId) -> bool {
        self.slots.iter().any(|slot| slot.sensor_id() == id)
    }

    /// Append a slot for this sensor. The caller has already rejected
    /// duplicates. Opens the display session when this is the first slot.
    pub(crate) fn add_slot(&mut self, sensor: Arc<dyn Sensor>) {
        self.slots.push(SensorSlot::new(sensor));
        self.cursor = 0;
        if self.slots.len() == 1 {
            self.activate();
        }
    }

    /// Remove the slot for this sensor, if present. Closes the display
    /// session when the last slot goes away.
    pub(crate) fn remove_slot(&mut self, id: &SensorId) -> bool {
        let Some(index) = self.slots.iter().position(|slot| slot.sensor_id() == id) else {
            return false;
        };
        self.slots.remove(index);
        self.cursor = 0;
        if self.slots.is_empty() {
            self.deactivate();
        }
        true
    }

    /// Render one tick.
    ///
    /// `packed` selects the 4-cell layout, `show_time` reserves room for the
    /// wall-clock readout. With no active sensors this performs no transport
    /// calls at all.
    pub fn refresh(&mut self, packed: bool, show_time: bool) {
        if self.slots.is_empty() {
            return;
        }

        let requested = LayoutMode::from_packed(packed);
        if requested != self.mode {
            self.mode = requested;
            log::debug!("switching display layout to {:?}", self.mode);
            if let Err(e) = self.declare_fields() {
                log::warn!("display layout switch failed: {e}");
            }
        }

        for slot in &mut self.slots {
            slot.refresh(&self.formatter);
        }

        let time = (self.time_source)();
        match self.mode {
            LayoutMode::Packed => self.refresh_packed(show_time, &time),
            LayoutMode::Simple => self.refresh_simple(show_time, &time),
        }

        // One past the end after advancing means wrap to the first sensor.
        if self.cursor >= self.slots.len() {
            self.cursor = 0;
        }
    }

    /// Close the display session regardless of state. Used on teardown and
    /// when the transport orders a close.
    pub(crate) fn close_session(&mut self) {
        self.active = false;
        if let Err(e) = self.client.close() {
            log::warn!("display session close failed: {e}");
        }
    }

    fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        log::info!("first sensor selected, opening display session");
        if let Err(e) = self.open_session() {
            log::warn!("display session open failed: {e}");
        }
    }

    fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        log::info!("last sensor removed, closing display session");
        self.close_session();
    }

    fn open_session(&mut self) -> crate::transport::Result<()> {
        self.client.open()?;
        self.client.set_name(CLIENT_NAME)?;
        self.declare_fields()
    }

    fn declare_fields(&mut self) -> crate::transport::Result<()> {
        self.client.set_layout(self.mode.layout())?;
        match self.mode {
            LayoutMode::Simple => self
                .client
                .create_fields(&[self.top.clone(), self.bottom.clone()]),
            LayoutMode::Packed => self.client.create_fields(&[
                self.top.clone(),
                self.bottom.clone(),
                self.top_right.clone(),
                self.bottom_right.clone(),
            ]),
        }
    }

    fn refresh_packed(&mut self, show_time: bool, time: &str) {
        let mut fields: Vec<TextField> = Vec::with_capacity(4);
        let mut cell = 0usize;

        if show_time {
            // The first physical cell always shows the time; the sensor that
            // would have landed there is bumped one cell down.
            self.top.text = time.to_string();
            fields.push(self.top.clone());
            cell = 1;
        }

        for slot in &self.slots {
            if cell >= 4 {
                // Slots beyond the fourth cell are not shown this tick.
                break;
            }
            let text = packed_cell_text(slot);
            let field = match cell {
                0 => &mut self.top,
                1 => &mut self.bottom,
                2 => &mut self.top_right,
                _ => &mut self.bottom_right,
            };
            field.text = text;
            fields.push(field.clone());
            cell += 1;
        }

        self.send(&fields);

        // Rotation in packed mode only ever toggles the phase between the
        // first two slots, mirroring the original display plugin.
        self.ticks += 1;
        if self.ticks == TICKS_PER_SWITCH {
            self.ticks = 0;
            self.cursor = if self.cursor == 1 { 0 } else { 1 };
        }
    }

    fn refresh_simple(&mut self, show_time: bool, time: &str) {
        let slot = &self.slots[self.cursor];
        let mut second = slot.line2.clone();
        if show_time {
            let time_chars = time.chars().count();
            while second.chars().count() + time_chars < MAX_LINE_CHARS {
                second.push(' ');
            }
            second.push_str(time);
        }

        self.top.text = slot.line1.clone();
        self.bottom.text = second;
        let fields = [self.top.clone(), self.bottom.clone()];
        self.send(&fields);

        self.ticks += 1;
        if self.ticks == TICKS_PER_SWITCH {
            self.ticks = 0;
            self.cursor += 1;
        }
    }

    fn send(&mut self, fields: &[TextField]) {
        let result = match fields {
            [] => return,
            [single] => self.client.set_field(single),
            many => self.client.set_fields(many),
        };
        if let Err(e) = result {
            log::warn!("display write failed: {e}");
        }
    }
}

/// Cell text for packed mode: a short name prefix, a colon, then the value.
///
/// Names shorter than the prefix length are used whole rather than padded,
/// so "IO" renders as "IO:42%".
fn packed_cell_text(slot: &SensorSlot) -> String {
    let prefix: String = slot.line1.chars().take(PACKED_NAME_CHARS).collect();
    format!("{prefix}:{}", slot.line2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{SensorKind, StaticSensor};
    use crate::transport::{ClientOp, RecordingClient};
    use crate::units::{FixedUnits, TemperatureUnit};
    use std::sync::Mutex;

    fn rotator() -> (DisplayRotator, Arc<Mutex<Vec<ClientOp>>>) {
        let client = RecordingClient::new();
        let ops = client.ops();
        let rotator = DisplayRotator::new(
            Box::new(client),
            Arc::new(FixedUnits(TemperatureUnit::Celsius)),
        )
        .with_time_source(|| "12:34:56".to_string());
        (rotator, ops)
    }

    fn load_sensor(id: &str, name: &str, value: f32) -> Arc<StaticSensor> {
        Arc::new(StaticSensor::new(id, SensorKind::Load, name, "CPU").with_value(value))
    }

    fn shown_top_lines(ops: &[ClientOp]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                ClientOp::SetFields(fields) => Some(fields[0].text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_refresh_without_sensors_makes_no_transport_calls() {
        let (mut rotator, ops) = rotator();
        rotator.refresh(false, false);
        rotator.refresh(true, true);
        assert!(ops.lock().unwrap().is_empty());
    }

    #[test]
    fn test_first_slot_opens_session_once() {
        let (mut rotator, ops) = rotator();
        rotator.add_slot(load_sensor("/cpu/0/load/0", "CPU Total", 50.0));
        rotator.add_slot(load_sensor("/cpu/0/load/1", "CPU Core #1", 25.0));

        {
            let recorded = ops.lock().unwrap();
            assert_eq!(
                recorded
                    .iter()
                    .filter(|op| matches!(op, ClientOp::Open))
                    .count(),
                1
            );
            assert!(recorded.contains(&ClientOp::SetName("vfd-sens".to_string())));
            assert!(recorded.contains(&ClientOp::SetLayout(TableLayout::new(2, 1))));
        }

        rotator.refresh(false, false);
        let recorded = ops.lock().unwrap();
        assert!(matches!(recorded.last(), Some(ClientOp::SetFields(_))));
    }

    #[test]
    fn test_last_slot_removal_closes_session() {
        let (mut rotator, ops) = rotator();
        let sensor = load_sensor("/cpu/0/load/0", "CPU Total", 50.0);
        rotator.add_slot(sensor.clone());
        assert!(rotator.is_active());

        assert!(rotator.remove_slot(sensor.id()));
        assert!(!rotator.is_active());
        assert_eq!(rotator.slot_count(), 0);
        assert_eq!(*ops.lock().unwrap().last().unwrap(), ClientOp::Close);
    }

    #[test]
    fn test_simple_mode_shows_name_and_value() {
        let (mut rotator, ops) = rotator();
        rotator.add_slot(load_sensor("/cpu/0/load/0", "CPU Total", 50.0));
        rotator.refresh(false, false);

        let recorded = ops.lock().unwrap();
        let Some(ClientOp::SetFields(fields)) = recorded.last() else {
            panic!("expected a batched field write");
        };
        assert_eq!(fields[0].text, "CPU Total");
        assert_eq!(fields[1].text, "50%");
    }

    #[test]
    fn test_simple_mode_rotation_fairness() {
        let (mut rotator, ops) = rotator();
        let names = ["CPU Total", "CPU Core #1", "CPU Core #2"];
        for (i, name) in names.iter().enumerate() {
            rotator.add_slot(load_sensor(&format!("/cpu/0/load/{i}"), name, 10.0));
        }

        for _ in 0..(TICKS_PER_SWITCH as usize * names.len()) {
            rotator.refresh(false, false);
        }

        let shown = shown_top_lines(&ops.lock().unwrap());
        for name in names {
            assert_eq!(
                shown.iter().filter(|line| line.as_str() == name).count(),
                TICKS_PER_SWITCH as usize,
                "sensor {name} not shown fairly",
            );
        }
    }

    #[test]
    fn test_cursor_wraps_after_last_sensor() {
        let (mut rotator, _ops) = rotator();
        rotator.add_slot(load_sensor("/cpu/0/load/0", "CPU Total", 50.0));

        // Four ticks advance the cursor past the only sensor; it must wrap.
        for _ in 0..TICKS_PER_SWITCH {
            rotator.refresh(false, false);
        }
        assert_eq!(rotator.cursor, 0);
    }

    #[test]
    fn test_layout_switch_redeclares_fields() {
        let (mut rotator, ops) = rotator();
        rotator.add_slot(load_sensor("/cpu/0/load/0", "CPU Total", 50.0));
        rotator.refresh(false, false);
        ops.lock().unwrap().clear();

        rotator.refresh(true, false);
        let recorded = ops.lock().unwrap();
        assert_eq!(recorded[0], ClientOp::SetLayout(TableLayout::new(2, 2)));
        let ClientOp::CreateFields(fields) = &recorded[1] else {
            panic!("expected field declaration after layout switch");
        };
        assert_eq!(fields.len(), 4);
        assert_eq!(rotator.mode(), LayoutMode::Packed);
    }

    #[test]
    fn test_packed_mode_truncates_names_to_three_chars() {
        let (mut rotator, ops) = rotator();
        rotator.add_slot(load_sensor("/cpu/0/load/0", "CPU Total", 50.0));
        rotator.add_slot(load_sensor("/io/0/load/0", "IO", 25.0));
        rotator.refresh(true, false);

        let recorded = ops.lock().unwrap();
        let Some(ClientOp::SetFields(fields)) = recorded.last() else {
            panic!("expected a batched field write");
        };
        assert_eq!(fields[0].text, "CPU:50%");
        // Short names are clamped, not padded or panicked on.
        assert_eq!(fields[1].text, "IO:25%");
    }

    #[test]
    fn test_packed_mode_caps_at_four_cells() {
        let (mut rotator, ops) = rotator();
        for i in 0..6 {
            rotator.add_slot(load_sensor(
                &format!("/cpu/0/load/{i}"),
                &format!("Core #{i}"),
                10.0,
            ));
        }
        rotator.refresh(true, false);

        let recorded = ops.lock().unwrap();
        let Some(ClientOp::SetFields(fields)) = recorded.last() else {
            panic!("expected a batched field write");
        };
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[3].text, "Cor:10%");
        assert_eq!((fields[3].column, fields[3].row), (1, 1));
    }

    #[test]
    fn test_packed_mode_time_bumps_first_sensor() {
        let (mut rotator, ops) = rotator();
        rotator.add_slot(load_sensor("/cpu/0/load/0", "CPU Total", 50.0));
        rotator.refresh(true, true);

        let recorded = ops.lock().unwrap();
        let Some(ClientOp::SetFields(fields)) = recorded.last() else {
            panic!("expected a batched field write");
        };
        assert_eq!(fields[0].text, "12:34:56");
        assert_eq!((fields[0].column, fields[0].row), (0, 0));
        assert_eq!(fields[1].text, "CPU:50%");
        assert_eq!((fields[1].column, fields[1].row), (0, 1));
    }

    #[test]
    fn test_simple_mode_time_pads_to_line_width() {
        let (mut rotator, ops) = rotator();
        let sensor = Arc::new(
            StaticSensor::new("/cpu/0/temperature/0", SensorKind::Temperature, "CPU", "CPU")
                .with_value(43.0),
        );
        rotator.add_slot(sensor);
        rotator.refresh(false, true);

        let recorded = ops.lock().unwrap();
        let Some(ClientOp::SetFields(fields)) = recorded.last() else {
            panic!("expected a batched field write");
        };
        // "43°C" (4 chars) padded to 8, then the 8-char time: 16 chars total.
        assert_eq!(fields[1].text, "43°C    12:34:56");
        assert_eq!(fields[1].text.chars().count(), MAX_LINE_CHARS);
    }

    #[test]
    fn test_simple_mode_skips_padding_when_line_is_full() {
        let (mut rotator, ops) = rotator();
        let sensor = Arc::new(
            StaticSensor::new("/ram/data/0", SensorKind::Factor, "Memory", "RAM")
                .with_value(1234.567),
        );
        rotator.add_slot(sensor);
        rotator.refresh(false, true);

        let recorded = ops.lock().unwrap();
        let Some(ClientOp::SetFields(fields)) = recorded.last() else {
            panic!("expected a batched field write");
        };
        // Value line alone is already 10 chars; time is appended unpadded.
        assert_eq!(fields[1].text, "1234.567GB12:34:56");
    }

    #[test]
    fn test_add_resets_cursor() {
        let (mut rotator, _ops) = rotator();
        rotator.add_slot(load_sensor("/cpu/0/load/0", "CPU Total", 50.0));
        rotator.add_slot(load_sensor("/cpu/0/load/1", "CPU Core #1", 25.0));

        // Advance onto the second sensor, then add a third.
        for _ in 0..TICKS_PER_SWITCH {
            rotator.refresh(false, false);
        }
        assert_eq!(rotator.cursor, 1);

        rotator.add_slot(load_sensor("/cpu/0/load/2", "CPU Core #2", 15.0));
        assert_eq!(rotator.cursor, 0);
    }
}
