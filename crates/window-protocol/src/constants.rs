//! Protocol constants
//!
//! These constants define the frame marker bytes, field widths, and result
//! codes used in the Agilent window serial protocol.

// ============================================================================
// Frame markers
// ============================================================================

/// Start-of-transmission marker, first byte of every frame.
pub const STX: u8 = 0x02;
/// End-of-transmission marker, last byte covered by the checksum.
pub const ETX: u8 = 0x03;

// ============================================================================
// Address field
// ============================================================================

/// Bias added to the device address to form the on-wire address byte.
pub const ADDR_OFFSET: u8 = 0x80;
/// Highest valid device address (5-bit field).
pub const ADDR_MAX: u8 = 31;

// ============================================================================
// Field widths
// ============================================================================

/// Window numbers are sent as this many ASCII decimal digits.
pub const WIN_WIDTH: usize = 3;
/// Highest window number expressible in [`WIN_WIDTH`] digits.
pub const WIN_MAX: u16 = 999;
/// Integer data for numeric windows is zero-padded to this many characters.
pub const NUMERIC_WIDTH: usize = 6;
/// The checksum trails ETX as this many uppercase hex ASCII digits.
pub const CHECKSUM_WIDTH: usize = 2;

// ============================================================================
// Read/write selector (the byte after the window number)
// ============================================================================

/// Selector for a read request.
pub const RW_READ: u8 = b'0';
/// Selector for a write request (also echoed in write confirmations).
pub const RW_WRITE: u8 = b'1';

// ============================================================================
// Result codes (controller → host, 3-byte control replies)
// ============================================================================

/// Write accepted.
pub const RESULT_ACK: u8 = 0x06;
/// Frame rejected (bad checksum, framing, or otherwise unexecutable).
pub const RESULT_NACK: u8 = 0x15;
/// The addressed window does not exist on this controller.
pub const RESULT_UNKNOWN_WINDOW: u8 = 0x32;
/// The data field does not match the window's type.
pub const RESULT_DATA_TYPE_ERROR: u8 = 0x33;
/// The value is outside the window's accepted range.
pub const RESULT_OUT_OF_RANGE: u8 = 0x34;
/// The window is not writable (or not accessible in the current mode).
pub const RESULT_WIN_DISABLED: u8 = 0x35;

// ============================================================================
// Frame geometry (head = bytes before ETX, STX included)
// ============================================================================

/// Head length of a control reply: STX + ADDR + result code.
pub const CONTROL_HEAD_LEN: usize = 3;
/// Minimum head length of a data reply: STX + ADDR + WIN + RW, no data.
pub const DATA_HEAD_MIN: usize = 2 + WIN_WIDTH + 1;
/// Shortest complete reply on the wire: control head + ETX + checksum.
pub const FRAME_MIN: usize = CONTROL_HEAD_LEN + 1 + CHECKSUM_WIDTH;
