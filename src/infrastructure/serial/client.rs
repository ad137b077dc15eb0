use crate::core::communication::command::TERMINATOR;
use crate::core::communication::{Connector, Link, TransportType};
use crate::domain::{config::ConnectionConfig, error::{Sys8x00Error, Sys8x00Result}};
use async_trait::async_trait;
use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinError;
use tracing::{debug, info};

type SharedPort = Arc<Mutex<Box<dyn SerialPort>>>;

/// Opens the serial line to a unit or an RS-485 bus, always 8N1
#[derive(Debug, Clone)]
pub struct SerialConnector {
    port: String,
    baud_rate: u32,
}

pub struct SerialLink {
    port: SharedPort,
    timeout: Duration,
}

impl SerialConnector {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
        }
    }

    pub fn from_config(config: &ConnectionConfig) -> Sys8x00Result<Self> {
        match config {
            ConnectionConfig::Serial { port, baud_rate } => Ok(Self::new(port.clone(), *baud_rate)),
            _ => Err(Sys8x00Error::Config {
                message: "Invalid connection type for serial client".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Connector for SerialConnector {
    type Link = SerialLink;

    fn transport_type(&self) -> TransportType {
        TransportType::Serial
    }

    async fn connect(&self, timeout: Duration) -> Sys8x00Result<SerialLink> {
        let builder = serialport::new(self.port.as_str(), self.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(timeout);

        let port = tokio::task::spawn_blocking(move || builder.open())
            .await
            .map_err(join_error)??;

        info!("Serial port {} opened at {} baud", self.port, self.baud_rate);

        Ok(SerialLink {
            port: Arc::new(Mutex::new(port)),
            timeout,
        })
    }
}

#[async_trait]
impl Link for SerialLink {
    async fn send(&mut self, data: &[u8]) -> Sys8x00Result<()> {
        let port = Arc::clone(&self.port);
        let frame = data.to_vec();

        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let mut port = port.lock().map_err(poisoned)?;
            port.write_all(&frame)?;
            port.flush()
        })
        .await
        .map_err(join_error)??;

        debug!("Sent {} bytes over serial", data.len());
        Ok(())
    }

    async fn read_reply(&mut self) -> Sys8x00Result<Vec<u8>> {
        let port = Arc::clone(&self.port);
        let timeout = self.timeout;

        let reply = tokio::task::spawn_blocking(move || -> io::Result<Vec<u8>> {
            let mut port = port.lock().map_err(poisoned)?;
            read_until_terminator_with(&mut *port, timeout, |port, remaining| {
                port.set_timeout(remaining).map_err(io::Error::from)
            })
        })
        .await
        .map_err(join_error)??;

        if reply.is_empty() {
            return Err(Sys8x00Error::Timeout);
        }

        debug!("Received {} bytes over serial", reply.len());
        Ok(reply)
    }
}

/// Read byte by byte until the terminator or until `timeout` elapses.
///
/// Whatever arrived before the deadline is returned, terminated or not.
pub fn read_until_terminator<R: Read + ?Sized>(reader: &mut R, timeout: Duration) -> io::Result<Vec<u8>> {
    read_until_terminator_with(reader, timeout, |_, _| Ok(()))
}

/// Same as [`read_until_terminator`], calling `before_read` with the time
/// left until the deadline ahead of every read.
///
/// The serial link uses the hook to set the port timeout to the remaining
/// time. A timeout too large to add to the current instant means no deadline.
pub fn read_until_terminator_with<R, F>(reader: &mut R, timeout: Duration, mut before_read: F) -> io::Result<Vec<u8>>
where
    R: Read + ?Sized,
    F: FnMut(&mut R, Duration) -> io::Result<()>,
{
    let deadline = Instant::now().checked_add(timeout);
    let mut reply = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        let remaining = match deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => timeout,
        };
        if remaining.is_zero() {
            break;
        }

        before_read(reader, remaining)?;

        match reader.read(&mut byte) {
            Ok(0) => {}
            Ok(_) => {
                reply.push(byte[0]);
                if byte[0] == TERMINATOR {
                    break;
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => break,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(reply)
}

fn join_error(e: JoinError) -> Sys8x00Error {
    Sys8x00Error::Io(io::Error::new(io::ErrorKind::Other, e))
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> io::Error {
    io::Error::new(io::ErrorKind::Other, "serial port lock poisoned")
}
