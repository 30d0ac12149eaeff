//! Reply decoding (controller → host).
//!
//! Replies come in two shapes:
//!
//! - **control**: `STX ADDR CODE ETX CHECKSUM`, the controller's verdict on
//!   a write (or its complaint about the request);
//! - **data**: `STX ADDR WIN RW DATA ETX CHECKSUM`, echoing the window and
//!   carrying its current value.
//!
//! Payload bytes are kept raw; converting them to typed values is an
//! explicit step that belongs to the driver layer.

use crate::checksum;
use crate::constants::*;
use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{decode_addr, encode_addr, ResultCode};

/// A decoded reply frame.
///
/// A successfully decoded control reply always carries [`ResultCode::Ack`];
/// every other code is raised as its typed [`ProtocolError`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// 3-byte control reply.
    Control {
        /// Replying device address.
        addr: u8,
        /// The result code (always `Ack` on the success path).
        code: ResultCode,
    },
    /// Data reply echoing a window and its value.
    Data {
        /// Replying device address.
        addr: u8,
        /// Echoed window number.
        win: u16,
        /// Whether the controller registered the request as a write.
        write: bool,
        /// Raw value bytes, untyped.
        data: Vec<u8>,
    },
}

impl Response {
    /// Decode one reply frame, through ETX plus the two checksum digits.
    ///
    /// A frame with no ETX, or with ETX but without its checksum digits,
    /// is [`ProtocolError::IncompleteFrame`]: not yet an error, just not
    /// enough bytes. Everything else wrong is a malformed frame. The
    /// checksum is verified before the frame is interpreted.
    pub fn decode(buf: &[u8]) -> ProtocolResult<Response> {
        let etx = buf
            .iter()
            .position(|&b| b == ETX)
            .ok_or(ProtocolError::IncompleteFrame)?;
        if buf.len() < etx + 1 + CHECKSUM_WIDTH {
            return Err(ProtocolError::IncompleteFrame);
        }

        let framed = &buf[..=etx];
        let digits = &buf[etx + 1..etx + 1 + CHECKSUM_WIDTH];
        checksum::verify(framed, digits)?;

        let head = &buf[..etx];
        if head.len() < CONTROL_HEAD_LEN {
            return Err(ProtocolError::FrameTooShort {
                expected: CONTROL_HEAD_LEN,
                actual: head.len(),
            });
        }
        if head[0] != STX {
            return Err(ProtocolError::InvalidData(format!(
                "frame does not start with STX (got 0x{:02X})",
                head[0]
            )));
        }
        let addr = decode_addr(head[1])?;

        if head.len() == CONTROL_HEAD_LEN {
            let code = ResultCode::try_from(head[2])?;
            if code != ResultCode::Ack {
                return Err(code.into_error());
            }
            return Ok(Response::Control { addr, code });
        }

        if head.len() < DATA_HEAD_MIN {
            return Err(ProtocolError::FrameTooShort {
                expected: DATA_HEAD_MIN,
                actual: head.len(),
            });
        }

        let win = parse_win(&head[2..2 + WIN_WIDTH])?;
        let write = head[2 + WIN_WIDTH] == RW_WRITE;
        let data = head[2 + WIN_WIDTH + 1..].to_vec();

        Ok(Response::Data {
            addr,
            win,
            write,
            data,
        })
    }

    /// The replying device address.
    pub fn addr(&self) -> u8 {
        match self {
            Response::Control { addr, .. } => *addr,
            Response::Data { addr, .. } => *addr,
        }
    }

    /// The raw payload bytes of a data reply, if this is one.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Response::Control { .. } => None,
            Response::Data { data, .. } => Some(data),
        }
    }

    /// Whether this is a write confirmation (control reply or write echo).
    pub fn is_write(&self) -> bool {
        match self {
            Response::Control { .. } => true,
            Response::Data { write, .. } => *write,
        }
    }
}

fn parse_win(digits: &[u8]) -> ProtocolResult<u16> {
    let mut win = 0u16;
    for &d in digits {
        if !d.is_ascii_digit() {
            return Err(ProtocolError::InvalidWindow(format!(
                "non-digit 0x{d:02X} in window field"
            )));
        }
        win = win * 10 + (d - b'0') as u16;
    }
    Ok(win)
}

/// Encode the controller's side of a data reply. Used by scripted fake
/// controllers in tests and by bench harnesses; applies the same address
/// validation as request encoding.
pub fn encode_data_reply(
    addr: u8,
    win: u16,
    write: bool,
    data: &[u8],
) -> ProtocolResult<Vec<u8>> {
    if win > WIN_MAX {
        return Err(ProtocolError::InvalidWindow(format!(
            "window {win} exceeds 3 digits"
        )));
    }
    let mut frame = Vec::with_capacity(FRAME_MIN + data.len() + WIN_WIDTH);
    frame.push(STX);
    frame.push(encode_addr(addr)?);
    frame.extend_from_slice(format!("{win:03}").as_bytes());
    frame.push(if write { RW_WRITE } else { RW_READ });
    frame.extend_from_slice(data);
    frame.push(ETX);
    let digits = checksum::render(checksum::compute(&frame));
    frame.extend_from_slice(&digits);
    Ok(frame)
}

/// Encode the controller's side of a 3-byte control reply.
pub fn encode_control_reply(addr: u8, code: ResultCode) -> ProtocolResult<Vec<u8>> {
    let mut frame = Vec::with_capacity(FRAME_MIN);
    frame.push(STX);
    frame.push(encode_addr(addr)?);
    frame.push(code.code());
    frame.push(ETX);
    let digits = checksum::render(checksum::compute(&frame));
    frame.extend_from_slice(&digits);
    Ok(frame)
}
