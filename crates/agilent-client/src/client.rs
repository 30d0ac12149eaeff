//! Request dispatch: encode, exchange, decode.

use std::sync::Arc;

use tracing::trace;
use window_protocol::{Request, Response, WindowDescriptor, WindowValue};

use crate::error::ClientResult;
use crate::session::Session;

/// One controller on a session.
///
/// Pairs a device address with the session it is reached over. Sessions are
/// shared via `Arc` so several clients (RS-485 multi-drop, one address per
/// controller) can take fair turns on one line.
#[derive(Clone)]
pub struct WindowClient {
    session: Arc<Session>,
    addr: u8,
}

impl WindowClient {
    /// A client for the device at `addr` on `session`.
    pub fn new(session: Arc<Session>, addr: u8) -> Self {
        WindowClient { session, addr }
    }

    /// The device address this client dials.
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// Read the window's current value.
    pub async fn read(&self, descriptor: &WindowDescriptor) -> ClientResult<Response> {
        self.dispatch(descriptor, None, false).await
    }

    /// Write `value` to the window.
    pub async fn write(
        &self,
        descriptor: &WindowDescriptor,
        value: WindowValue,
    ) -> ClientResult<Response> {
        self.dispatch(descriptor, Some(value), true).await
    }

    /// One full round trip against a window: encode the request (local
    /// guards run here, before any bytes move), perform the exclusive
    /// exchange, decode the reply.
    pub async fn dispatch(
        &self,
        descriptor: &WindowDescriptor,
        value: Option<WindowValue>,
        write: bool,
    ) -> ClientResult<Response> {
        let request = Request {
            descriptor,
            value,
            addr: self.addr,
            write,
        };
        let frame = request.encode()?;
        trace!("addr {} {} -> {} bytes", self.addr, descriptor, frame.len());

        let reply = self.session.send(&frame).await?;
        let response = Response::decode(&reply)?;
        trace!("addr {} {} <- {:?}", self.addr, descriptor, response);
        Ok(response)
    }
}
