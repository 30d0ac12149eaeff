//! Typed conversion of raw reply payloads.
//!
//! Replies come off the wire as raw bytes. Turning a payload into an
//! application value is an explicit step the drivers take window by
//! window; nothing here guesses a type from the bytes.

use agilent_client::WindowClient;
use window_protocol::{Response, WindowDescriptor, WindowValue};

use crate::error::{DriverError, DriverResult};

fn bad(window: u16, payload: &[u8]) -> DriverError {
    DriverError::BadReading {
        window,
        text: String::from_utf8_lossy(payload).into_owned(),
    }
}

/// Payload of a data reply; a control reply is `UnexpectedReply`.
pub fn data_reply(response: &Response) -> DriverResult<&[u8]> {
    response.data().ok_or_else(|| {
        DriverError::UnexpectedReply("control reply where a data reply was required".to_string())
    })
}

/// `"0"`/`"1"` payload as a bool.
pub fn parse_logic(window: u16, payload: &[u8]) -> DriverResult<bool> {
    match payload {
        b"0" => Ok(false),
        b"1" => Ok(true),
        _ => Err(bad(window, payload)),
    }
}

/// Decimal payload (zero-padded, optionally signed) as an integer.
pub fn parse_integer(window: u16, payload: &[u8]) -> DriverResult<i64> {
    let text = std::str::from_utf8(payload).map_err(|_| bad(window, payload))?;
    text.trim().parse().map_err(|_| bad(window, payload))
}

/// Numeric payload as a float. Gauge windows report scientific notation
/// like `1.5E-05`; plain zero-padded decimals parse the same way.
pub fn parse_float(window: u16, payload: &[u8]) -> DriverResult<f64> {
    let text = std::str::from_utf8(payload).map_err(|_| bad(window, payload))?;
    text.trim().parse().map_err(|_| bad(window, payload))
}

/// Alphanumeric payload as text. Controllers speak Latin-1, so every
/// byte maps to the matching Unicode scalar.
pub fn parse_text(payload: &[u8]) -> String {
    payload.iter().map(|&byte| char::from(byte)).collect()
}

/// Read `descriptor` and return the raw payload, checking that the
/// controller echoed the window that was asked for.
pub async fn read_raw(
    client: &WindowClient,
    descriptor: &WindowDescriptor,
) -> DriverResult<Vec<u8>> {
    let response = client.read(descriptor).await?;
    match response {
        Response::Data { win, data, .. } if win == descriptor.win => Ok(data),
        Response::Data { win, .. } => Err(DriverError::UnexpectedReply(format!(
            "asked for window {}, controller answered for window {}",
            descriptor.win, win
        ))),
        Response::Control { .. } => Err(DriverError::UnexpectedReply(
            "control reply where a data reply was required".to_string(),
        )),
    }
}

/// Read a Logic window.
pub async fn read_logic(client: &WindowClient, descriptor: &WindowDescriptor) -> DriverResult<bool> {
    let payload = read_raw(client, descriptor).await?;
    parse_logic(descriptor.win, &payload)
}

/// Read a Numeric window as an integer.
pub async fn read_integer(
    client: &WindowClient,
    descriptor: &WindowDescriptor,
) -> DriverResult<i64> {
    let payload = read_raw(client, descriptor).await?;
    parse_integer(descriptor.win, &payload)
}

/// Read a Numeric window as a float.
pub async fn read_float(client: &WindowClient, descriptor: &WindowDescriptor) -> DriverResult<f64> {
    let payload = read_raw(client, descriptor).await?;
    parse_float(descriptor.win, &payload)
}

/// Read an Alphanumeric window as text.
pub async fn read_text(
    client: &WindowClient,
    descriptor: &WindowDescriptor,
) -> DriverResult<String> {
    let payload = read_raw(client, descriptor).await?;
    Ok(parse_text(&payload))
}

/// Write `value` to `descriptor` and require the ACK control reply.
pub async fn write_value(
    client: &WindowClient,
    descriptor: &WindowDescriptor,
    value: WindowValue,
) -> DriverResult<()> {
    let response = client.write(descriptor, value).await?;
    match response {
        Response::Control { .. } => Ok(()),
        Response::Data { win, .. } => Err(DriverError::UnexpectedReply(format!(
            "data reply for window {} where an ACK was required",
            win
        ))),
    }
}
