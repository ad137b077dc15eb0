use crate::core::communication::TransportType;
use crate::domain::error::{Sys8x00Error, Sys8x00Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Highest address on a SYS8X00 multi-drop bus
pub const MAX_BUS_ADDRESS: u8 = 63;

/// Tool configuration, as read from `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sys8x00Config {
    /// Defaults applied when the matching CLI flag is absent
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Default values for the query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Serial baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Communication timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    /// Delay between `ADR` and `VER` in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

/// Connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConnectionConfig {
    /// Serial line, always 8 data bits, no parity, 1 stop bit
    #[serde(rename = "serial")]
    Serial { port: String, baud_rate: u32 },
    #[serde(rename = "tcp")]
    Tcp { host: String, port: u16 },
}

/// Timing parameters for a single query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Connect and read timeout
    pub timeout: Duration,
    /// Pause after `ADR` so the unit can latch the address
    pub settle: Duration,
}

/// Address of one unit on the bus, always within `0..=63`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BusAddress(u8);

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_timeout_secs() -> f64 {
    2.0
}

fn default_settle_ms() -> u64 {
    100
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            baud_rate: default_baud_rate(),
            timeout_secs: default_timeout_secs(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl DefaultsConfig {
    /// Build query options, letting an explicit timeout override the file value
    pub fn query_options(&self, timeout_secs: Option<f64>) -> Sys8x00Result<QueryOptions> {
        Ok(QueryOptions {
            timeout: timeout_from_secs(timeout_secs.unwrap_or(self.timeout_secs))?,
            settle: Duration::from_millis(self.settle_ms),
        })
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            settle: Duration::from_millis(default_settle_ms()),
        }
    }
}

impl ConnectionConfig {
    pub fn transport_type(&self) -> TransportType {
        match self {
            ConnectionConfig::Serial { .. } => TransportType::Serial,
            ConnectionConfig::Tcp { .. } => TransportType::Tcp,
        }
    }

    /// Build a TCP connection from a `host:port` argument
    pub fn tcp_from_target(target: &str) -> Sys8x00Result<Self> {
        let (host, port) = parse_tcp_target(target)?;
        Ok(ConnectionConfig::Tcp { host, port })
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionConfig::Serial { port, baud_rate } => {
                write!(f, "serial: {} at {} baud", port, baud_rate)
            }
            ConnectionConfig::Tcp { host, port } => write!(f, "TCP: {}:{}", host, port),
        }
    }
}

impl BusAddress {
    pub fn new(value: u8) -> Sys8x00Result<Self> {
        if value > MAX_BUS_ADDRESS {
            return Err(Sys8x00Error::InvalidAddress(value as u16));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Every address on the bus, in ascending order
    pub fn all() -> impl Iterator<Item = BusAddress> {
        (0..=MAX_BUS_ADDRESS).map(BusAddress)
    }
}

impl TryFrom<u8> for BusAddress {
    type Error = Sys8x00Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BusAddress> for u8 {
    fn from(address: BusAddress) -> Self {
        address.0
    }
}

impl fmt::Display for BusAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Split a `host:port` argument.
///
/// Exactly one colon is accepted, the host must be non-empty and the port
/// must fit in a `u16`.
pub fn parse_tcp_target(target: &str) -> Sys8x00Result<(String, u16)> {
    let invalid = || Sys8x00Error::InvalidTarget(target.to_string());

    let mut parts = target.split(':');
    let (host, port) = match (parts.next(), parts.next(), parts.next()) {
        (Some(host), Some(port), None) => (host.trim(), port.trim()),
        _ => return Err(invalid()),
    };

    if host.is_empty() {
        return Err(invalid());
    }
    let port = port.parse::<u16>().map_err(|_| invalid())?;

    Ok((host.to_string(), port))
}

/// Convert a timeout given in seconds, rejecting zero, negative and non-finite values
pub fn timeout_from_secs(secs: f64) -> Sys8x00Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(Sys8x00Error::Config {
            message: format!("Timeout must be a positive number of seconds (got {})", secs),
        });
    }
    Duration::try_from_secs_f64(secs).map_err(|e| Sys8x00Error::Config {
        message: format!("Invalid timeout {}: {}", secs, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = Sys8x00Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Sys8x00Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.defaults.baud_rate, 9600);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Sys8x00Config = toml::from_str("[defaults]\nbaud_rate = 19200\n").unwrap();
        assert_eq!(config.defaults.baud_rate, 19200);
        assert_eq!(config.defaults.timeout_secs, 2.0);
        assert_eq!(config.defaults.settle_ms, 100);
        assert_eq!(config.defaults.log_level, "warn");
    }

    #[test]
    fn test_query_options_override() {
        let defaults = DefaultsConfig::default();
        let options = defaults.query_options(None).unwrap();
        assert_eq!(options, QueryOptions::default());

        let options = defaults.query_options(Some(0.5)).unwrap();
        assert_eq!(options.timeout, Duration::from_millis(500));
        assert!(defaults.query_options(Some(0.0)).is_err());
    }

    #[test]
    fn test_parse_tcp_target() {
        assert_eq!(
            parse_tcp_target("192.168.1.100:4001").unwrap(),
            ("192.168.1.100".to_string(), 4001)
        );
        assert!(matches!(
            parse_tcp_target("192.168.1.100"),
            Err(Sys8x00Error::InvalidTarget(_))
        ));
        assert!(parse_tcp_target("host:port").is_err());
        assert!(parse_tcp_target(":4001").is_err());
        assert!(parse_tcp_target("a:b:4001").is_err());
        assert!(parse_tcp_target("host:70000").is_err());
    }

    #[test]
    fn test_bus_address_bounds() {
        assert_eq!(BusAddress::new(0).unwrap().value(), 0);
        assert_eq!(BusAddress::new(63).unwrap().value(), 63);
        assert!(matches!(
            BusAddress::new(64),
            Err(Sys8x00Error::InvalidAddress(64))
        ));
        assert_eq!(BusAddress::new(7).unwrap().to_string(), "07");
    }

    #[test]
    fn test_all_addresses_ascending() {
        let all: Vec<u8> = BusAddress::all().map(BusAddress::value).collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all.first(), Some(&0));
        assert_eq!(all.last(), Some(&63));
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_connection_display() {
        let serial = ConnectionConfig::Serial {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
        };
        assert_eq!(serial.to_string(), "serial: /dev/ttyUSB0 at 9600 baud");
        assert_eq!(serial.transport_type(), TransportType::Serial);

        let tcp = ConnectionConfig::tcp_from_target("10.0.0.5:4001").unwrap();
        assert_eq!(tcp.to_string(), "TCP: 10.0.0.5:4001");
        assert_eq!(tcp.transport_type(), TransportType::Tcp);
    }
}
