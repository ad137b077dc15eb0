//! SYS8X00 Library
//!
//! Firmware version queries for Danfysik SYS8X00 power supplies over a
//! serial line or a TCP socket, including bus address scanning.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use self::core::communication::{Connector, DeviceCommand, Link, TransportType};
pub use self::core::query::VersionQuery;
pub use self::core::scan::{scan_addresses, scan_addresses_with, ScanEvent, ScanHit, ScanReport};
pub use domain::config::{BusAddress, ConnectionConfig, QueryOptions, Sys8x00Config};
pub use domain::error::{Sys8x00Error, Sys8x00Result};
pub use infrastructure::serial::SerialConnector;
pub use infrastructure::tcp::TcpConnector;
