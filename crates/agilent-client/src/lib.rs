//! Transport layer for Agilent vacuum pump controllers.
//!
//! The window protocol is strictly half-duplex: one request goes out, one
//! reply comes back, nothing else moves on the line. This crate supplies
//! the pieces that enforce that discipline over real transports:
//!
//! - [`Channel`]: the byte stream itself (TCP to the controller's telnet
//!   service, a local serial port, or an in-memory loopback for tests);
//! - [`Session`]: one channel behind an async mutex spanning each whole
//!   write-then-read exchange, with a timeout that surfaces as an ordinary
//!   transport failure;
//! - [`WindowClient`]: address + session, dispatching encoded requests and
//!   decoding replies via the `window-protocol` crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use agilent_client::{Channel, Session, TcpConfig, WindowClient};
//! use std::sync::Arc;
//!
//! let config = TcpConfig::new("192.168.1.100");
//! let channel = Channel::connect_tcp(&config).await?;
//! let session = Arc::new(Session::new(channel, config.timeout));
//! let client = WindowClient::new(session, 0);
//! ```

mod channel;
mod client;
mod config;
mod error;
mod session;

pub use channel::*;
pub use client::*;
pub use config::*;
pub use error::*;
pub use session::*;
