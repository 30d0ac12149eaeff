//! Inbound frame accumulation.
//!
//! Transports hand raw reads to a [`FrameBuffer`]; a complete reply is one
//! ETX-terminated frame plus the two trailing checksum digits:
//!
//! ```text
//! +-----+------+----------------+-----+------------+
//! | STX | ADDR | payload ...    | ETX | checksum×2 |
//! +-----+------+----------------+-----+------------+
//! ```

use bytes::BytesMut;

use crate::constants::{CHECKSUM_WIDTH, ETX};
use crate::error::{ProtocolError, ProtocolResult};

/// Upper bound on one reply's size. Generous for a protocol whose longest
/// payload is a short label; anything bigger means the peer is not speaking
/// the protocol and ETX may never come.
pub const MAX_REPLY_SIZE: usize = 256;

/// Accumulates raw transport reads and splits off complete replies.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl FrameBuffer {
    /// Create an empty frame buffer.
    pub fn new() -> Self {
        FrameBuffer {
            buffer: BytesMut::with_capacity(MAX_REPLY_SIZE),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to split one complete reply off the front of the buffer.
    ///
    /// Returns `Ok(Some(reply))` with the bytes through ETX and its
    /// checksum digits, `Ok(None)` if more data is needed, or
    /// [`ProtocolError::FrameTooLong`] if the accumulation bound was hit
    /// without seeing ETX.
    pub fn take_reply(&mut self) -> ProtocolResult<Option<Vec<u8>>> {
        let etx = self.buffer.iter().position(|&b| b == ETX);
        match etx {
            Some(i) if self.buffer.len() >= i + 1 + CHECKSUM_WIDTH => {
                let reply = self.buffer.split_to(i + 1 + CHECKSUM_WIDTH).to_vec();
                log::trace!("reply complete: {} bytes", reply.len());
                Ok(Some(reply))
            }
            // ETX seen, checksum digits still in flight.
            Some(_) => Ok(None),
            None if self.buffer.len() > MAX_REPLY_SIZE => {
                log::debug!(
                    "no ETX within {} buffered bytes, peer is not framing",
                    self.buffer.len()
                );
                Err(ProtocolError::FrameTooLong {
                    max: MAX_REPLY_SIZE,
                    actual: self.buffer.len(),
                })
            }
            None => Ok(None),
        }
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any buffered bytes (after a timeout the stream is desynced and
    /// a partial reply must not bleed into the next exchange).
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
