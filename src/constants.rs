//! Shared constants for the display core

/// Refresh ticks between rotation steps.
pub const TICKS_PER_SWITCH: u32 = 4;

/// Character capacity of one display line.
pub const MAX_LINE_CHARS: usize = 16;

/// Characters of the name line kept in a packed cell.
pub const PACKED_NAME_CHARS: usize = 3;

/// Client name announced to the display transport when a session opens.
pub const CLIENT_NAME: &str = "vfd-sens";
