//! Common types used in the protocol.

use std::cmp::Ordering;

use crate::constants::*;
use crate::error::{ProtocolError, ProtocolResult};

/// On-wire representation of a window's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean flag, sent as a single `'0'` or `'1'` character.
    Logic,
    /// Integer value, sent as six zero-padded decimal characters.
    Numeric,
    /// Free-form text (labels, model strings, pre-formatted numbers).
    Alphanumeric,
}

/// Result code carried by a 3-byte control reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// Write accepted.
    Ack,
    /// Frame rejected.
    Nack,
    /// Window not implemented on this controller.
    UnknownWindow,
    /// Data field does not match the window's type.
    DataTypeError,
    /// Value outside the accepted range.
    OutOfRange,
    /// Window not writable or currently disabled.
    WinDisabled,
}

impl ResultCode {
    /// The wire byte for this result code.
    pub fn code(&self) -> u8 {
        match self {
            ResultCode::Ack => RESULT_ACK,
            ResultCode::Nack => RESULT_NACK,
            ResultCode::UnknownWindow => RESULT_UNKNOWN_WINDOW,
            ResultCode::DataTypeError => RESULT_DATA_TYPE_ERROR,
            ResultCode::OutOfRange => RESULT_OUT_OF_RANGE,
            ResultCode::WinDisabled => RESULT_WIN_DISABLED,
        }
    }

    /// The typed error a non-ACK code decodes to.
    ///
    /// Calling this on [`ResultCode::Ack`] is a caller bug; it maps to
    /// [`ProtocolError::UnknownResultCode`] rather than panicking.
    pub fn into_error(self) -> ProtocolError {
        match self {
            ResultCode::Ack => ProtocolError::UnknownResultCode(RESULT_ACK),
            ResultCode::Nack => ProtocolError::Nack,
            ResultCode::UnknownWindow => ProtocolError::UnknownWindow,
            ResultCode::DataTypeError => {
                ProtocolError::DataType("reported by controller".to_string())
            }
            ResultCode::OutOfRange => {
                ProtocolError::OutOfRange("reported by controller".to_string())
            }
            ResultCode::WinDisabled => {
                ProtocolError::WinDisabled("reported by controller".to_string())
            }
        }
    }
}

impl TryFrom<u8> for ResultCode {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            RESULT_ACK => Ok(ResultCode::Ack),
            RESULT_NACK => Ok(ResultCode::Nack),
            RESULT_UNKNOWN_WINDOW => Ok(ResultCode::UnknownWindow),
            RESULT_DATA_TYPE_ERROR => Ok(ResultCode::DataTypeError),
            RESULT_OUT_OF_RANGE => Ok(ResultCode::OutOfRange),
            RESULT_WIN_DISABLED => Ok(ResultCode::WinDisabled),
            other => Err(ProtocolError::UnknownResultCode(other)),
        }
    }
}

/// Static description of one controller window.
///
/// Device catalogs are `const` tables of these; the encoder consults the
/// `writable` flag and `datatype` before any bytes are produced.
///
/// Equality and ordering consider the window number alone, so descriptors
/// sort by window and a catalog entry compares equal to an ad-hoc
/// descriptor for the same window.
#[derive(Debug, Clone, Copy)]
pub struct WindowDescriptor {
    /// Window number, `0..=999`.
    pub win: u16,
    /// Whether the controller accepts writes to this window.
    pub writable: bool,
    /// On-wire data type.
    pub datatype: DataType,
    /// Human-readable label for logs and diagnostics.
    pub label: &'static str,
}

impl WindowDescriptor {
    /// Create a descriptor. `win` must fit the 3-digit wire field; catalog
    /// tables are `const`, so a bad number fails at compile time.
    pub const fn new(win: u16, writable: bool, datatype: DataType, label: &'static str) -> Self {
        assert!(win <= WIN_MAX, "window number exceeds 3 digits");
        WindowDescriptor {
            win,
            writable,
            datatype,
            label,
        }
    }

    /// The window number as its 3-digit ASCII wire form.
    pub fn win_digits(&self) -> [u8; WIN_WIDTH] {
        [
            b'0' + (self.win / 100) as u8,
            b'0' + (self.win / 10 % 10) as u8,
            b'0' + (self.win % 10) as u8,
        ]
    }
}

impl PartialEq for WindowDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.win == other.win
    }
}

impl Eq for WindowDescriptor {}

impl PartialOrd for WindowDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WindowDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.win.cmp(&other.win)
    }
}

impl std::fmt::Display for WindowDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "win {:03} ({})", self.win, self.label)
    }
}

/// Bias a device address into its on-wire byte.
pub fn encode_addr(addr: u8) -> ProtocolResult<u8> {
    if addr > ADDR_MAX {
        return Err(ProtocolError::InvalidAddress(addr));
    }
    Ok(addr + ADDR_OFFSET)
}

/// Recover a device address from its on-wire byte.
pub fn decode_addr(byte: u8) -> ProtocolResult<u8> {
    if byte < ADDR_OFFSET || byte > ADDR_OFFSET + ADDR_MAX {
        return Err(ProtocolError::InvalidAddress(byte));
    }
    Ok(byte - ADDR_OFFSET)
}
