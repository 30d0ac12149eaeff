//! Typed drivers for Agilent vacuum pump controllers.
//!
//! Each supported controller family gets a plain driver struct composing
//! an `agilent_client::WindowClient`; there is no device base type. The
//! per-family window catalogs are `const` descriptor tables
//! ([`twistorr`], [`ipc_mini`], [`windows`] for the shared ones), and
//! converting a reply payload into a typed value is an explicit step
//! ([`reading`]) the drivers take window by window.
//!
//! Supported controllers:
//!
//! - TwisTorr 74 FS turbo pump rack controller ([`TwisTorrDriver`])
//! - IPC Mini ion pump controller ([`IpcMiniDriver`])
//!
//! The [`VacuumController`] trait is the seam for callers that poll a
//! mixed rack and do not care about the family.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use agilent_client::{Channel, Session, TcpConfig, WindowClient};
//! use agilent_drivers::TwisTorrDriver;
//!
//! let config = TcpConfig::new("192.168.1.100");
//! let channel = Channel::connect_tcp(&config).await?;
//! let session = Arc::new(Session::new(channel, Duration::from_secs(1)));
//! let mut pump = TwisTorrDriver::new(WindowClient::new(session, 0));
//!
//! pump.connect().await?;
//! let pressure = pump.pressure().await?;
//! let unit = pump.pressure_unit().await?;
//! println!("{pressure:.2e} {unit}");
//! ```

mod driver;
mod error;
pub mod ipc_mini;
mod reading;
pub mod twistorr;
mod units;
pub mod windows;

pub use driver::*;
pub use error::*;
pub use ipc_mini::{IpcMiniDriver, IpcMiniError, IpcMiniStatus};
pub use reading::*;
pub use twistorr::{TwisTorrDriver, TwisTorrError, TwisTorrStatus};
pub use units::*;
