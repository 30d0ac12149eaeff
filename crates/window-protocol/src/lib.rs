//! Agilent Window Serial Protocol
//!
//! This crate provides types and utilities for the "window" request/response
//! protocol spoken by Agilent vacuum pump controllers (TwisTorr turbo
//! controllers, IPC Mini ion pump controllers) over RS-232/RS-485 or the
//! controllers' telnet service. Every controller setting and reading is a
//! numbered *window* (0..=999) that can be read, and sometimes written,
//! one request/reply pair at a time.
//!
//! # Protocol Overview
//!
//! Requests and replies are Latin-1 byte frames:
//!
//! ```text
//! request:        STX ADDR WIN×3 RW [DATA] ETX CHECKSUM×2
//! control reply:  STX ADDR CODE ETX CHECKSUM×2
//! data reply:     STX ADDR WIN×3 RW DATA ETX CHECKSUM×2
//! ```
//!
//! `ADDR` is the device address biased by 0x80, `WIN` is the window number
//! as three ASCII digits, `RW` selects read (`'0'`) or write (`'1'`), and
//! the checksum is the XOR of everything after STX through ETX, sent as two
//! uppercase hex digits.
//!
//! This crate is I/O-free: encoding produces byte vectors, decoding
//! consumes byte slices, and [`FrameBuffer`] turns raw reads into complete
//! replies. Transports and drivers live in the `agilent-client` and
//! `agilent-drivers` crates.
//!
//! # Example
//!
//! ```rust,ignore
//! use window_protocol::{DataType, Request, Response, WindowDescriptor, WindowValue};
//!
//! const REMOTE: WindowDescriptor =
//!     WindowDescriptor::new(8, true, DataType::Logic, "Remote");
//!
//! // Build a write request
//! let frame = Request::write(&REMOTE, WindowValue::Logic(true), 0).encode()?;
//!
//! // Parse a reply
//! let response = Response::decode(&received_data)?;
//! ```

pub mod checksum;
mod constants;
mod error;
mod frame;
mod request;
mod response;
mod types;
mod value;

pub use constants::*;
pub use error::*;
pub use frame::*;
pub use request::*;
pub use response::*;
pub use types::*;
pub use value::*;
