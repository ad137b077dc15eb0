use crate::domain::config::{BusAddress, ConnectionConfig, DefaultsConfig};
use crate::domain::error::{Sys8x00Error, Sys8x00Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Command line arguments for the version query tool
#[derive(Parser, Debug)]
#[command(
    name = "sys8x00-version",
    version = env!("CARGO_PKG_VERSION"),
    about = "Query Danfysik SYS8X00 version",
    long_about = "Query the firmware version of a Danfysik SYS8X00 power supply over a serial line or a TCP socket, optionally addressing one unit on a shared bus or scanning all 64 addresses."
)]
pub struct Args {
    /// Serial port (e.g., /dev/ttyUSB0)
    #[arg(short, long)]
    pub serial: Option<String>,

    /// Serial baudrate [default: 9600]
    #[arg(short, long)]
    pub baudrate: Option<u32>,

    /// TCP host:port (e.g., 192.168.1.100:4001)
    #[arg(short, long, value_name = "HOST:PORT")]
    pub tcp: Option<String>,

    /// Power supply address (0-63)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=63))]
    pub addr: Option<u8>,

    /// Scan all addresses (0-63) to find responding power supplies
    #[arg(long)]
    pub scan: bool,

    /// Communication timeout in seconds [default: 2.0]
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// List available serial ports and exit
    #[arg(long)]
    pub list_ports: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
    /// CSV output
    Csv,
}

impl Args {
    /// Resolve the transport flags into a connection.
    ///
    /// Exactly one of `--serial` and `--tcp` must be given. A malformed
    /// `--tcp` target is rejected here, before anything is opened.
    pub fn connection(&self, defaults: &DefaultsConfig) -> Sys8x00Result<ConnectionConfig> {
        match (&self.serial, &self.tcp) {
            (None, None) => Err(Sys8x00Error::MissingTransport),
            (Some(_), Some(_)) => Err(Sys8x00Error::ConflictingTransport),
            (Some(port), None) => Ok(ConnectionConfig::Serial {
                port: port.clone(),
                baud_rate: self.baudrate.unwrap_or(defaults.baud_rate),
            }),
            (None, Some(target)) => ConnectionConfig::tcp_from_target(target),
        }
    }

    pub fn address(&self) -> Sys8x00Result<Option<BusAddress>> {
        self.addr.map(BusAddress::new).transpose()
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
