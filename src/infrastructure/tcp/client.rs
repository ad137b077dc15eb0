use crate::core::communication::{Connector, Link, TransportType};
use crate::domain::{config::ConnectionConfig, error::{Sys8x00Error, Sys8x00Result}};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

/// Replies are read in a single chunk of at most this many bytes
pub const RECEIVE_BUFFER_SIZE: usize = 1024;

/// Opens TCP connections to a serial-to-Ethernet gateway or a unit's network port
#[derive(Debug, Clone)]
pub struct TcpConnector {
    host: String,
    port: u16,
}

pub struct TcpLink {
    stream: TcpStream,
    timeout: Duration,
}

impl TcpConnector {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn from_config(config: &ConnectionConfig) -> Sys8x00Result<Self> {
        match config {
            ConnectionConfig::Tcp { host, port } => Ok(Self::new(host.clone(), *port)),
            _ => Err(Sys8x00Error::Config {
                message: "Invalid connection type for TCP client".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Link = TcpLink;

    fn transport_type(&self) -> TransportType {
        TransportType::Tcp
    }

    async fn connect(&self, timeout: Duration) -> Sys8x00Result<TcpLink> {
        let stream = tokio::time::timeout(
            timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| Sys8x00Error::Timeout)??;

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        info!("TCP connection established to {}:{}", self.host, self.port);

        Ok(TcpLink { stream, timeout })
    }
}

#[async_trait]
impl Link for TcpLink {
    async fn send(&mut self, data: &[u8]) -> Sys8x00Result<()> {
        let stream = &mut self.stream;
        tokio::time::timeout(self.timeout, async move {
            stream.write_all(data).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| Sys8x00Error::Timeout)??;

        debug!("Sent {} bytes over TCP", data.len());
        Ok(())
    }

    async fn read_reply(&mut self) -> Sys8x00Result<Vec<u8>> {
        let mut buffer = [0u8; RECEIVE_BUFFER_SIZE];

        let n = tokio::time::timeout(self.timeout, self.stream.read(&mut buffer))
            .await
            .map_err(|_| Sys8x00Error::Timeout)??;

        if n == 0 {
            debug!("TCP connection closed by peer");
        } else {
            debug!("Received {} bytes over TCP", n);
        }

        Ok(buffer[..n].to_vec())
    }
}
