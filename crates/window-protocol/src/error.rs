//! Protocol error types.

use thiserror::Error;

/// Result alias used throughout the protocol crate.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur when encoding or decoding window protocol frames.
///
/// The `Nack` family mirrors the controller's control-reply result codes;
/// `DataType`, `OutOfRange`, and `WinDisabled` are also raised locally by
/// the encoder when a request would be rejected before it is worth sending.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// No ETX terminator (or trailing checksum digits) received yet.
    ///
    /// Distinct from the malformed-frame errors: the caller may simply
    /// need to read more bytes.
    #[error("incomplete frame: terminator not received")]
    IncompleteFrame,

    /// The received checksum digits disagree with the computed value.
    #[error("checksum mismatch: computed {computed:02X}, received {received:?}")]
    ChecksumMismatch {
        /// XOR fold computed over the received frame.
        computed: u8,
        /// Checksum digits as they arrived on the wire.
        received: String,
    },

    /// Frame is too short to be valid.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Inbound data exceeded the reply accumulation bound without an ETX.
    #[error("frame too long: maximum {max} bytes, got {actual}")]
    FrameTooLong {
        /// Maximum allowed length.
        max: usize,
        /// Bytes accumulated so far.
        actual: usize,
    },

    /// Frame bytes that cannot be interpreted (missing STX, stray data).
    #[error("invalid frame data: {0}")]
    InvalidData(String),

    /// Device address outside the 5-bit range, on either direction of the
    /// wire (request address above 31, or reply address byte below 0x80).
    #[error("invalid device address: 0x{0:02X}")]
    InvalidAddress(u8),

    /// Window field is not three ASCII decimal digits.
    #[error("invalid window field: {0}")]
    InvalidWindow(String),

    /// Control reply carried a result code outside the known set.
    #[error("unrecognized result code: 0x{0:02X}")]
    UnknownResultCode(u8),

    /// Controller rejected the frame outright (result code 0x15).
    #[error("controller sent NACK")]
    Nack,

    /// Controller does not implement the addressed window (0x32).
    #[error("unknown window for this controller")]
    UnknownWindow,

    /// Data does not match the window's type (0x33), or the value handed
    /// to the encoder cannot be represented in the window's type.
    #[error("data type error: {0}")]
    DataType(String),

    /// Value outside the window's accepted range (0x34), or a logic write
    /// of an integer other than 0 or 1.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// Window is not writable (0x35), or a local write attempt against a
    /// read-only window descriptor.
    #[error("window disabled: {0}")]
    WinDisabled(String),
}
