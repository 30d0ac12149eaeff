//! Transport configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Factory line speed of the supported controllers.
pub const DEFAULT_BAUD: u32 = 9600;
/// Default read/write timeout for one serial exchange.
pub const DEFAULT_SERIAL_TIMEOUT: Duration = Duration::from_millis(100);
/// The controllers' LAN service speaks raw frames on the telnet port.
pub const DEFAULT_TCP_PORT: u16 = 23;
/// Default timeout for one TCP exchange (and for connecting).
pub const DEFAULT_TCP_TIMEOUT: Duration = Duration::from_secs(1);

/// Serial line settings (the controller's RS-232 or RS-485 side).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    /// Line speed; 8N1 framing is fixed.
    pub baud: u32,
    /// Timeout for one request/reply exchange.
    pub timeout: Duration,
}

impl SerialConfig {
    /// Settings for `port` with factory baud and the default timeout.
    pub fn new(port: impl Into<String>) -> Self {
        SerialConfig {
            port: port.into(),
            ..Default::default()
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            port: "/dev/ttyUSB0".to_string(),
            baud: DEFAULT_BAUD,
            timeout: DEFAULT_SERIAL_TIMEOUT,
        }
    }
}

/// LAN settings (the controller's telnet service).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpConfig {
    /// Host name or address of the controller.
    pub host: String,
    /// TCP port of the window service.
    pub port: u16,
    /// Timeout for connecting and for one request/reply exchange.
    pub timeout: Duration,
}

impl TcpConfig {
    /// Settings for `host` on the default telnet port.
    pub fn new(host: impl Into<String>) -> Self {
        TcpConfig {
            host: host.into(),
            ..Default::default()
        }
    }
}

impl Default for TcpConfig {
    fn default() -> Self {
        TcpConfig {
            host: "localhost".to_string(),
            port: DEFAULT_TCP_PORT,
            timeout: DEFAULT_TCP_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_defaults() {
        let config = SerialConfig::new("/dev/ttyS1");
        assert_eq!(config.port, "/dev/ttyS1");
        assert_eq!(config.baud, DEFAULT_BAUD);
        assert_eq!(config.timeout, DEFAULT_SERIAL_TIMEOUT);
    }

    #[test]
    fn test_tcp_defaults() {
        let config = TcpConfig::new("pump-7.lab");
        assert_eq!(config.port, DEFAULT_TCP_PORT);
        assert_eq!(config.timeout, DEFAULT_TCP_TIMEOUT);
    }
}
