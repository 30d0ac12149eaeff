//! XOR checksum over the framed bytes.
//!
//! The checksum covers every byte strictly after STX up to and including
//! ETX, and travels on the wire as two uppercase hex ASCII digits appended
//! after ETX.

use crate::constants::{CHECKSUM_WIDTH, STX};
use crate::error::{ProtocolError, ProtocolResult};

/// Compute the XOR fold of `frame`.
///
/// A leading STX is skipped; everything else is folded, so callers can pass
/// either a whole frame (STX through ETX) or just the covered range.
pub fn compute(frame: &[u8]) -> u8 {
    let body = match frame.first() {
        Some(&STX) => &frame[1..],
        _ => frame,
    };
    body.iter().fold(0u8, |acc, b| acc ^ b)
}

/// Render a checksum as its two-digit uppercase hex wire form.
///
/// Values below 0x10 keep their leading zero; the wire form is always
/// exactly [`CHECKSUM_WIDTH`] bytes.
pub fn render(checksum: u8) -> [u8; CHECKSUM_WIDTH] {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    [HEX[(checksum >> 4) as usize], HEX[(checksum & 0x0F) as usize]]
}

/// Parse the two hex digits trailing ETX back into a checksum value.
///
/// Either case is accepted on input; anything that is not two hex digits is
/// a checksum mismatch against `computed` (the frame cannot be trusted).
pub fn parse(digits: &[u8], computed: u8) -> ProtocolResult<u8> {
    let text = std::str::from_utf8(digits)
        .ok()
        .filter(|s| s.len() == CHECKSUM_WIDTH);
    match text.and_then(|s| u8::from_str_radix(s, 16).ok()) {
        Some(value) => Ok(value),
        None => Err(ProtocolError::ChecksumMismatch {
            computed,
            received: String::from_utf8_lossy(digits).into_owned(),
        }),
    }
}

/// Validate the checksum digits received for `frame` (STX through ETX).
///
/// Returns the verified checksum value, or [`ProtocolError::ChecksumMismatch`]
/// carrying both sides of the disagreement.
pub fn verify(frame: &[u8], digits: &[u8]) -> ProtocolResult<u8> {
    let computed = compute(frame);
    let received = parse(digits, computed)?;
    if received == computed {
        Ok(computed)
    } else {
        Err(ProtocolError::ChecksumMismatch {
            computed,
            received: String::from_utf8_lossy(digits).into_owned(),
        })
    }
}
