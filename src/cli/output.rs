use crate::cli::args::OutputFormat;
use crate::core::communication::TransportType;
use crate::core::scan::{ScanEvent, ScanHit, ScanReport};
use crate::domain::config::{BusAddress, ConnectionConfig};
use serde::Serialize;
use std::io::{self, Write};
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_version(&self, report: &VersionReport) -> Result<(), OutputError>;
    fn write_scan_progress(&self, event: &ScanEvent<'_>) -> Result<(), OutputError>;
    fn write_scan(&self, report: &ScanReport) -> Result<(), OutputError>;
    fn write_ports(&self, ports: &[String]) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::Sys8x00Error {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Outcome of a single version query
#[derive(Debug, Clone, Serialize)]
pub struct VersionReport {
    pub transport: TransportType,
    pub target: String,
    pub address: Option<BusAddress>,
    pub response: String,
}

impl VersionReport {
    pub fn new(connection: &ConnectionConfig, address: Option<BusAddress>, response: String) -> Self {
        let target = match connection {
            ConnectionConfig::Serial { port, .. } => port.clone(),
            ConnectionConfig::Tcp { host, port } => format!("{}:{}", host, port),
        };
        Self {
            transport: connection.transport_type(),
            target,
            address,
            response,
        }
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_version(&self, report: &VersionReport) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                println!("Version response: {}", report.response);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            OutputFormat::Table => {
                println!("{}", Table::new(vec![VersionTableRow::from(report)]));
            }
            OutputFormat::Csv => {
                println!("transport,target,address,response");
                println!(
                    "{},{},{},{}",
                    report.transport,
                    csv_field(&report.target),
                    report.address.map(|a| a.to_string()).unwrap_or_default(),
                    csv_field(&report.response)
                );
            }
        }
        Ok(())
    }

    fn write_scan_progress(&self, event: &ScanEvent<'_>) -> Result<(), OutputError> {
        if self.format != OutputFormat::Text {
            return Ok(());
        }

        let mut stdout = io::stdout().lock();
        match event {
            ScanEvent::Probing(address) => {
                write!(stdout, "Testing address {}... ", address)?;
            }
            ScanEvent::Probed(_, Ok(response)) => {
                writeln!(stdout, "✓ (Response: {})", response)?;
            }
            ScanEvent::Probed(_, Err(e)) => {
                writeln!(stdout, "✗ ({})", e)?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn write_scan(&self, report: &ScanReport) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                println!();
                println!(
                    "Scan complete. Found {} responding power supplies:",
                    report.len()
                );
                for hit in &report.responding {
                    println!("  Address {}: {}", hit.address, hit.response);
                }
                if report.is_empty() {
                    println!("  No power supplies responded.");
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            OutputFormat::Table => {
                if !report.is_empty() {
                    let rows: Vec<ScanTableRow> = report.responding.iter().map(ScanTableRow::from).collect();
                    println!("{}", Table::new(rows));
                }
            }
            OutputFormat::Csv => {
                println!("address,response");
                for hit in &report.responding {
                    println!("{},{}", hit.address, csv_field(&hit.response));
                }
            }
        }
        Ok(())
    }

    fn write_ports(&self, ports: &[String]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(ports)?);
            }
            OutputFormat::Csv => {
                println!("port");
                for port in ports {
                    println!("{}", csv_field(port));
                }
            }
            OutputFormat::Text | OutputFormat::Table => {
                println!("Available serial ports:");
                for port in ports {
                    println!("  {}", port);
                }
            }
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        // Machine-readable formats keep stdout for the result alone
        if self.format == OutputFormat::Text {
            println!("{}", message);
        }
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                println!("{}", error);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "error": error,
                    "level": "error"
                });
                eprintln!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                eprintln!("{}", error);
            }
        }
        Ok(())
    }
}

/// Table row for a single version reply
#[derive(Tabled)]
struct VersionTableRow {
    transport: String,
    target: String,
    address: String,
    response: String,
}

impl From<&VersionReport> for VersionTableRow {
    fn from(report: &VersionReport) -> Self {
        Self {
            transport: report.transport.to_string(),
            target: report.target.clone(),
            address: report.address.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()),
            response: report.response.clone(),
        }
    }
}

/// Table row for scan results
#[derive(Tabled)]
struct ScanTableRow {
    address: String,
    response: String,
}

impl From<&ScanHit> for ScanTableRow {
    fn from(hit: &ScanHit) -> Self {
        Self {
            address: hit.address.to_string(),
            response: hit.response.clone(),
        }
    }
}

/// Quote a CSV field when it contains a separator, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
