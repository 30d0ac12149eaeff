//! Client error types.

use std::time::Duration;

use thiserror::Error;
use window_protocol::ProtocolError;

/// Result alias used throughout the client crate.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from driving a controller link.
///
/// Protocol-shaped failures pass through transparently so callers can match
/// [`ProtocolError`] variants without caring which layer surfaced them; the
/// remaining variants are the transport failures (connect, I/O, timeout),
/// which all mean the same thing to retry policy: this exchange is gone.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Frame-level failure, local guard, or controller-reported error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Transport-level I/O failure.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port could not be opened or configured.
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The peer closed the stream mid-session.
    #[error("connection closed by peer")]
    Closed,

    /// The exchange did not complete within the configured timeout.
    #[error("exchange timed out after {after:?}")]
    Timeout {
        /// The timeout that expired.
        after: Duration,
    },
}

impl ClientError {
    /// Whether this is a transport failure (as opposed to a protocol or
    /// controller-reported error). Transport failures say nothing about
    /// the request itself; callers may reconnect and try again.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Io(_)
                | ClientError::Serial(_)
                | ClientError::Connect(_)
                | ClientError::Closed
                | ClientError::Timeout { .. }
        )
    }
}
