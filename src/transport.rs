//! Display-client transport seam
//!
//! The physical display (VFD, character LCD, front-panel applet) sits behind
//! [`DisplayClient`]. The core declares a field layout once per mode switch
//! and then pushes text into the declared fields on every tick. Connection
//! and session management beyond this call surface belong to the transport
//! implementation.

use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Errors surfaced by a display transport.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("display session is not open")]
    NotOpen,
    #[error("display transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, DisplayError>;

/// Horizontal placement of text within a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAlignment {
    MiddleLeft,
    MiddleRight,
}

/// One text cell of the display grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub text: String,
    pub alignment: FieldAlignment,
    pub column: u8,
    pub row: u8,
}

impl TextField {
    pub fn new(alignment: FieldAlignment, column: u8, row: u8) -> Self {
        Self {
            text: String::new(),
            alignment,
            column,
            row,
        }
    }
}

/// Grid geometry declared to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub rows: u8,
    pub columns: u8,
}

impl TableLayout {
    pub fn new(rows: u8, columns: u8) -> Self {
        Self { rows, columns }
    }
}

/// Outbound interface to the display.
///
/// Calls are expected to be non-blocking from the core's point of view;
/// the core logs and swallows errors rather than propagating them.
pub trait DisplayClient: Send {
    /// Open the display session.
    fn open(&mut self) -> Result<()>;

    /// Announce the client name shown by the display host.
    fn set_name(&mut self, name: &str) -> Result<()>;

    /// Declare the grid geometry.
    fn set_layout(&mut self, layout: TableLayout) -> Result<()>;

    /// Declare the set of fields the following writes will target.
    fn create_fields(&mut self, fields: &[TextField]) -> Result<()>;

    /// Write a single field.
    fn set_field(&mut self, field: &TextField) -> Result<()>;

    /// Write several fields in one round trip.
    fn set_fields(&mut self, fields: &[TextField]) -> Result<()>;

    /// Close the display session. Closing a closed session is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// Display client that renders to the log, for headless use and the demo.
#[derive(Debug, Default)]
pub struct ConsoleClient {
    open: bool,
}

impl ConsoleClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(DisplayError::NotOpen)
        }
    }
}

impl DisplayClient for ConsoleClient {
    fn open(&mut self) -> Result<()> {
        self.open = true;
        log::info!("display session opened");
        Ok(())
    }

    fn set_name(&mut self, name: &str) -> Result<()> {
        self.ensure_open()?;
        log::info!("display client name: {name}");
        Ok(())
    }

    fn set_layout(&mut self, layout: TableLayout) -> Result<()> {
        self.ensure_open()?;
        log::info!("display layout: {}x{}", layout.rows, layout.columns);
        Ok(())
    }

    fn create_fields(&mut self, fields: &[TextField]) -> Result<()> {
        self.ensure_open()?;
        log::debug!("declared {} display fields", fields.len());
        Ok(())
    }

    fn set_field(&mut self, field: &TextField) -> Result<()> {
        self.ensure_open()?;
        log::info!("[{},{}] {}", field.column, field.row, field.text);
        Ok(())
    }

    fn set_fields(&mut self, fields: &[TextField]) -> Result<()> {
        self.ensure_open()?;
        for field in fields {
            log::info!("[{},{}] {}", field.column, field.row, field.text);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            log::info!("display session closed");
        }
        Ok(())
    }
}

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOp {
    Open,
    SetName(String),
    SetLayout(TableLayout),
    CreateFields(Vec<TextField>),
    SetField(TextField),
    SetFields(Vec<TextField>),
    Close,
}

/// Display client that records every call, for assertions in tests.
///
/// The operations vec is shared; keep a handle from [`RecordingClient::ops`]
/// before boxing the client into the core.
#[derive(Debug, Default)]
pub struct RecordingClient {
    ops: Arc<Mutex<Vec<ClientOp>>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Arc<Mutex<Vec<ClientOp>>> {
        self.ops.clone()
    }

    fn record(&self, op: ClientOp) {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
    }
}

impl DisplayClient for RecordingClient {
    fn open(&mut self) -> Result<()> {
        self.record(ClientOp::Open);
        Ok(())
    }

    fn set_name(&mut self, name: &str) -> Result<()> {
        self.record(ClientOp::SetName(name.to_string()));
        Ok(())
    }

    fn set_layout(&mut self, layout: TableLayout) -> Result<()> {
        self.record(ClientOp::SetLayout(layout));
        Ok(())
    }

    fn create_fields(&mut self, fields: &[TextField]) -> Result<()> {
        self.record(ClientOp::CreateFields(fields.to_vec()));
        Ok(())
    }

    fn set_field(&mut self, field: &TextField) -> Result<()> {
        self.record(ClientOp::SetField(field.clone()));
        Ok(())
    }

    fn set_fields(&mut self, fields: &[TextField]) -> Result<()> {
        self.record(ClientOp::SetFields(fields.to_vec()));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.record(ClientOp::Close);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_client_rejects_writes_while_closed() {
        let mut client = ConsoleClient::new();
        let field = TextField::new(FieldAlignment::MiddleLeft, 0, 0);
        assert!(matches!(
            client.set_field(&field),
            Err(DisplayError::NotOpen)
        ));

        client.open().unwrap();
        assert!(client.set_field(&field).is_ok());
    }

    #[test]
    fn test_console_client_close_is_idempotent() {
        let mut client = ConsoleClient::new();
        client.open().unwrap();
        client.close().unwrap();
        client.close().unwrap();
    }

    #[test]
    fn test_recording_client_keeps_call_order() {
        let mut client = RecordingClient::new();
        let ops = client.ops();

        client.open().unwrap();
        client.set_layout(TableLayout::new(2, 1)).unwrap();
        client.close().unwrap();

        let recorded = ops.lock().unwrap();
        assert_eq!(
            *recorded,
            vec![
                ClientOp::Open,
                ClientOp::SetLayout(TableLayout::new(2, 1)),
                ClientOp::Close,
            ]
        );
    }
}
