use crate::domain::error::Sys8x00Result;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Transport type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Serial,
    Tcp,
}

impl std::fmt::Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportType::Serial => write!(f, "serial"),
            TransportType::Tcp => write!(f, "tcp"),
        }
    }
}

impl TransportType {
    /// Prefix used for communication diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            TransportType::Serial => "Serial",
            TransportType::Tcp => "TCP",
        }
    }
}

/// An open connection to a power supply.
///
/// The connection is closed when the link is dropped.
#[async_trait]
pub trait Link: Send {
    /// Write a complete frame
    async fn send(&mut self, data: &[u8]) -> Sys8x00Result<()>;

    /// Read one reply, returning the raw bytes received.
    ///
    /// Fails with `Timeout` when nothing arrives in time.
    async fn read_reply(&mut self) -> Sys8x00Result<Vec<u8>>;
}

/// Opens fresh links to one transport target
#[async_trait]
pub trait Connector: Send + Sync {
    type Link: Link;

    /// Get the transport type
    fn transport_type(&self) -> TransportType;

    /// Open a new link, bounded by `timeout`
    async fn connect(&self, timeout: Duration) -> Sys8x00Result<Self::Link>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_type_display() {
        assert_eq!(TransportType::Serial.to_string(), "serial");
        assert_eq!(TransportType::Tcp.to_string(), "tcp");
        assert_eq!(TransportType::Tcp.label(), "TCP");
    }
}
