//! Driver-layer error taxonomy.

use agilent_client::ClientError;
use thiserror::Error;

/// Result type for driver operations.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Errors surfaced by the device drivers.
///
/// Transport and protocol failures pass through from the layers below
/// untouched, so callers can still match on `ProtocolError` variants
/// (a controller NACK looks the same whichever driver raised it).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Transport or protocol failure from the session underneath.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The controller answered with the wrong shape of reply.
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),

    /// A reply payload did not parse as the type the window carries.
    #[error("window {window}: unreadable value {text:?}")]
    BadReading {
        /// Window the payload came from.
        window: u16,
        /// The offending payload, rendered for the log.
        text: String,
    },

    /// Status word outside the documented set.
    #[error("unknown status code {0}")]
    UnknownStatus(i64),

    /// Pressure-unit encoding outside the family table.
    #[error("unknown pressure unit code {0}")]
    UnknownUnit(i64),
}
