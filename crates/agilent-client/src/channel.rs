//! Byte channels to a controller.

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, error, info};

use crate::config::{SerialConfig, TcpConfig};
use crate::error::{ClientError, ClientResult};

/// One byte stream to a controller.
///
/// The protocol is identical over every variant; only connection setup
/// differs. `Loopback` is an in-memory pipe whose far end is handed to the
/// caller, used by tests and scripted fake controllers.
#[derive(Debug)]
pub enum Channel {
    /// Raw TCP to the controller's telnet service.
    Tcp(TcpStream),
    /// Local serial port (RS-232 or RS-485).
    Serial(SerialStream),
    /// In-memory pipe for tests.
    Loopback(DuplexStream),
}

impl Channel {
    /// Connect to a controller's LAN service.
    pub async fn connect_tcp(config: &TcpConfig) -> ClientResult<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        debug!("connecting to {}", addr);

        match timeout(config.timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => {
                // One frame per write; don't let Nagle sit on it.
                if let Err(e) = stream.set_nodelay(true) {
                    debug!("TCP_NODELAY: {}", e);
                }
                info!("connected to {}", addr);
                Ok(Channel::Tcp(stream))
            }
            Ok(Err(e)) => {
                error!("connect {}: {}", addr, e);
                Err(ClientError::Connect(format!(
                    "failed to connect to {addr}: {e}"
                )))
            }
            Err(_) => Err(ClientError::Timeout {
                after: config.timeout,
            }),
        }
    }

    /// Open a controller's serial port. The controllers are fixed at 8N1.
    pub fn open_serial(config: &SerialConfig) -> ClientResult<Self> {
        debug!("opening {} at {} baud", config.port, config.baud);

        let stream = tokio_serial::new(&config.port, config.baud)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .timeout(config.timeout)
            .open_native_async()?;

        info!("opened {}", config.port);
        Ok(Channel::Serial(stream))
    }

    /// An in-memory channel; the returned far end plays the controller.
    pub fn loopback(capacity: usize) -> (Self, DuplexStream) {
        let (near, far) = tokio::io::duplex(capacity);
        (Channel::Loopback(near), far)
    }

    /// Write a whole frame and flush it.
    pub(crate) async fn write_frame(&mut self, data: &[u8]) -> ClientResult<()> {
        match self {
            Channel::Tcp(stream) => stream.write_all(data).await?,
            Channel::Serial(stream) => {
                stream.write_all(data).await?;
                stream.flush().await?;
            }
            Channel::Loopback(stream) => stream.write_all(data).await?,
        }
        Ok(())
    }

    /// Read whatever is available into `buf`.
    ///
    /// Returns the byte count; a closed stream is [`ClientError::Closed`]
    /// rather than a zero-length read.
    pub(crate) async fn read_some(&mut self, buf: &mut [u8]) -> ClientResult<usize> {
        let n = match self {
            Channel::Tcp(stream) => stream.read(buf).await?,
            Channel::Serial(stream) => stream.read(buf).await?,
            Channel::Loopback(stream) => stream.read(buf).await?,
        };
        if n == 0 {
            return Err(ClientError::Closed);
        }
        Ok(n)
    }
}
