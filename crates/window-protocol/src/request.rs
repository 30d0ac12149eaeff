//! Request encoding (host → controller).

use crate::checksum;
use crate::constants::*;
use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{encode_addr, WindowDescriptor};
use crate::value::WindowValue;

/// A single read or write request against one window.
///
/// Construction is infallible; all validation happens in [`Request::encode`]
/// so a rejected request provably produced no bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<'a> {
    /// The window being addressed.
    pub descriptor: &'a WindowDescriptor,
    /// Value to write; `None` for reads.
    pub value: Option<WindowValue>,
    /// Target device address, `0..=31`.
    pub addr: u8,
    /// Whether this is a write.
    pub write: bool,
}

impl<'a> Request<'a> {
    /// A read of the window's current value.
    pub fn read(descriptor: &'a WindowDescriptor, addr: u8) -> Self {
        Request {
            descriptor,
            value: None,
            addr,
            write: false,
        }
    }

    /// A write of `value` to the window.
    pub fn write(descriptor: &'a WindowDescriptor, value: WindowValue, addr: u8) -> Self {
        Request {
            descriptor,
            value: Some(value),
            addr,
            write: true,
        }
    }

    /// Encode the request into a complete wire frame, checksum included.
    ///
    /// Writes are guarded locally: a write against a read-only descriptor
    /// is [`ProtocolError::WinDisabled`] and a write without a value is
    /// [`ProtocolError::DataType`], both before any bytes are produced.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        let wire_addr = encode_addr(self.addr)?;

        let data = if self.write {
            if !self.descriptor.writable {
                return Err(ProtocolError::WinDisabled(format!(
                    "{} is read-only",
                    self.descriptor
                )));
            }
            match &self.value {
                Some(value) => Some(value.encode_for(self.descriptor.datatype)?),
                None => {
                    return Err(ProtocolError::DataType(format!(
                        "write to {} requires a value",
                        self.descriptor
                    )))
                }
            }
        } else {
            None
        };

        let mut frame = Vec::with_capacity(FRAME_MIN + NUMERIC_WIDTH);
        frame.push(STX);
        frame.push(wire_addr);
        frame.extend_from_slice(&self.descriptor.win_digits());
        frame.push(if self.write { RW_WRITE } else { RW_READ });
        if let Some(data) = data {
            frame.extend_from_slice(&data);
        }
        frame.push(ETX);

        let digits = checksum::render(checksum::compute(&frame));
        frame.extend_from_slice(&digits);
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    const REMOTE: WindowDescriptor = WindowDescriptor::new(8, true, DataType::Logic, "Remote");
    const STATUS: WindowDescriptor =
        WindowDescriptor::new(205, false, DataType::Numeric, "Pump status");
    const SET_POINT: WindowDescriptor =
        WindowDescriptor::new(102, true, DataType::Numeric, "R1 set point");

    #[test]
    fn test_worked_example_write_frame() {
        // Window 8, logic write of true, address 0.
        let frame = Request::write(&REMOTE, WindowValue::Logic(true), 0)
            .encode()
            .unwrap();
        assert_eq!(frame, b"\x02\x80\x30\x30\x38\x31\x31\x03BB");
    }

    #[test]
    fn test_read_frame_has_no_data_field() {
        let frame = Request::read(&STATUS, 3).encode().unwrap();
        // STX, 0x83, "205", '0', ETX, two checksum digits.
        assert_eq!(frame[0], STX);
        assert_eq!(frame[1], 0x83);
        assert_eq!(&frame[2..5], b"205");
        assert_eq!(frame[5], RW_READ);
        assert_eq!(frame[6], ETX);
        assert_eq!(frame.len(), 9);
    }

    #[test]
    fn test_write_frame_carries_padded_data() {
        let frame = Request::write(&SET_POINT, WindowValue::Integer(867), 0)
            .encode()
            .unwrap();
        assert_eq!(&frame[2..5], b"102");
        assert_eq!(frame[5], RW_WRITE);
        assert_eq!(&frame[6..12], b"000867");
        assert_eq!(frame[12], ETX);
    }

    #[test]
    fn test_checksum_digits_match_frame_body() {
        let frame = Request::write(&SET_POINT, WindowValue::Integer(1), 5)
            .encode()
            .unwrap();
        let etx = frame.iter().position(|&b| b == ETX).unwrap();
        let digits = checksum::render(checksum::compute(&frame[..=etx]));
        assert_eq!(&frame[etx + 1..], &digits);
    }

    #[test]
    fn test_write_to_read_only_window_fails_locally() {
        let err = Request::write(&STATUS, WindowValue::Integer(5), 0)
            .encode()
            .unwrap_err();
        assert!(matches!(err, ProtocolError::WinDisabled(_)));
    }

    #[test]
    fn test_write_without_value_is_a_type_error() {
        let request = Request {
            descriptor: &REMOTE,
            value: None,
            addr: 0,
            write: true,
        };
        let err = request.encode().unwrap_err();
        assert!(matches!(err, ProtocolError::DataType(_)));
    }

    #[test]
    fn test_address_out_of_range_rejected() {
        let err = Request::read(&STATUS, 32).encode().unwrap_err();
        assert_eq!(err, ProtocolError::InvalidAddress(32));
    }

    #[test]
    fn test_value_on_read_is_ignored() {
        let request = Request {
            descriptor: &REMOTE,
            value: Some(WindowValue::Logic(true)),
            addr: 0,
            write: false,
        };
        let frame = request.encode().unwrap();
        assert_eq!(frame[5], RW_READ);
        assert_eq!(frame[6], ETX);
    }
}
