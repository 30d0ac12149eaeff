//! Exclusive request/reply session over one channel.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};
use window_protocol::FrameBuffer;

use crate::channel::Channel;
use crate::error::{ClientError, ClientResult};

/// Scratch size for one transport read.
const READ_CHUNK: usize = 64;

/// Cap on how much stale input is drained before an exchange; a peer that
/// keeps the line busy past this is broken and the exchange will say so.
const DRAIN_LIMIT: usize = 1024;

struct Link {
    channel: Channel,
    buffer: FrameBuffer,
}

/// One controller link enforcing the protocol's half-duplex discipline.
///
/// A single mutex guards the channel across the whole write-then-read
/// exchange, so exactly one request is in flight; tokio's mutex queues
/// waiters in arrival order, giving concurrent callers fair turns. The
/// guard is released on every exit path: success, transport error,
/// timeout, and cancellation alike.
///
/// The session never retries. A failed exchange is reported as-is;
/// reconnect and retry policy belongs to the caller.
pub struct Session {
    link: Mutex<Link>,
    timeout: Duration,
}

impl Session {
    /// Wrap a connected channel. `timeout` bounds each exchange.
    pub fn new(channel: Channel, timeout: Duration) -> Self {
        Session {
            link: Mutex::new(Link {
                channel,
                buffer: FrameBuffer::new(),
            }),
            timeout,
        }
    }

    /// Send one request frame and read back one complete reply
    /// (through ETX plus the checksum digits).
    pub async fn send(&self, frame: &[u8]) -> ClientResult<Vec<u8>> {
        let mut link = self.link.lock().await;

        // Anything still pending here belongs to an abandoned exchange (a
        // timeout or cancellation upstream); it must not be taken for the
        // reply to the frame we are about to send.
        Self::discard_stale(&mut link).await;

        match timeout(self.timeout, Self::exchange(&mut link, frame)).await {
            Ok(reply) => reply,
            Err(_) => {
                link.buffer.clear();
                warn!("exchange timed out after {:?}", self.timeout);
                Err(ClientError::Timeout {
                    after: self.timeout,
                })
            }
        }
    }

    /// Drop leftover bytes, both already-buffered ones and any sitting
    /// unread in the stream (a late reply to a timed-out request).
    async fn discard_stale(link: &mut Link) {
        let mut stale = link.buffer.buffered_len();
        link.buffer.clear();

        let mut scratch = [0u8; READ_CHUNK];
        while stale < DRAIN_LIMIT {
            match timeout(Duration::ZERO, link.channel.read_some(&mut scratch)).await {
                Ok(Ok(n)) => stale += n,
                // Nothing ready, or the read failed; the exchange proper
                // will surface any real transport error.
                _ => break,
            }
        }
        if stale > 0 {
            debug!("discarded {} stale bytes from a previous exchange", stale);
        }
    }

    async fn exchange(link: &mut Link, frame: &[u8]) -> ClientResult<Vec<u8>> {
        link.channel.write_frame(frame).await?;

        let mut scratch = [0u8; READ_CHUNK];
        loop {
            let n = link.channel.read_some(&mut scratch).await?;
            link.buffer.push(&scratch[..n]);
            if let Some(reply) = link.buffer.take_reply()? {
                return Ok(reply);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
    use window_protocol::{encode_data_reply, Response, ETX};

    /// Read exactly one request frame (through ETX plus two checksum digits)
    /// from the fake controller's side of the line.
    async fn read_request(far: &mut DuplexStream) -> Vec<u8> {
        let mut request = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            far.read_exact(&mut byte).await.expect("request read");
            request.push(byte[0]);
            if byte[0] == ETX {
                break;
            }
        }
        let mut digits = [0u8; 2];
        far.read_exact(&mut digits).await.expect("checksum read");
        request.extend_from_slice(&digits);
        request
    }

    #[tokio::test]
    async fn test_send_reads_one_full_reply() {
        let (channel, mut far) = Channel::loopback(256);
        let session = Session::new(channel, Duration::from_secs(1));

        let controller = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let n = far.read(&mut buf).await.unwrap();
            assert_eq!(&buf[..2], b"\x02\x83");
            let reply = encode_data_reply(3, 205, false, b"000005").unwrap();
            // Dribble the reply to exercise accumulation.
            for chunk in reply.chunks(3) {
                far.write_all(chunk).await.unwrap();
                far.flush().await.unwrap();
            }
            n
        });

        let request = b"\x02\x832050\x03"; // checksum digits irrelevant to the fake
        let reply = session.send(request).await.unwrap();
        let response = Response::decode(&reply).unwrap();
        assert_eq!(response.data().unwrap(), b"000005");
        assert_eq!(controller.await.unwrap(), request.len());
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_failure() {
        let (channel, _far) = Channel::loopback(256);
        let session = Session::new(channel, Duration::from_millis(20));

        // The fake never answers; _far is kept alive so the stream stays open.
        let err = session.send(b"\x02\x802050\x03AA").await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_stale_bytes_do_not_leak_into_next_exchange() {
        let (channel, mut far) = Channel::loopback(256);
        let session = Session::new(channel, Duration::from_millis(50));

        // First exchange times out, then its reply limps in late.
        let err = session.send(b"\x02\x808100\x03AA").await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }));
        let late = encode_data_reply(0, 810, false, b"001234").unwrap();
        far.write_all(&late).await.unwrap();

        // Second exchange must get its own reply, not the stale one. The
        // fake reads whole frames so the stale 8100 request can't satisfy
        // its read of the live request.
        let controller = tokio::spawn(async move {
            let _ = read_request(&mut far).await;
            let _ = read_request(&mut far).await;
            let reply = encode_data_reply(0, 811, false, b"000042").unwrap();
            far.write_all(&reply).await.unwrap();
        });

        let reply = session.send(b"\x02\x808110\x03AB").await.unwrap();
        match Response::decode(&reply).unwrap() {
            Response::Data { win, data, .. } => {
                assert_eq!(win, 811);
                assert_eq!(data, b"000042");
            }
            other => panic!("unexpected response: {other:?}"),
        }
        controller.await.unwrap();
    }
}
