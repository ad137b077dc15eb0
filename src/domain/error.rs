use thiserror::Error;

/// Unified error type for the SYS8X00 tooling
#[derive(Error, Debug)]
pub enum Sys8x00Error {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("Network error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Communication timeout")]
    Timeout,

    #[error("TCP argument must be in format host:port (got '{0}')")]
    InvalidTarget(String),

    #[error("Invalid bus address {0} (must be 0-63)")]
    InvalidAddress(u16),

    #[error("Invalid reply: {0}")]
    Decode(String),

    #[error("No response from device")]
    NoResponse,

    #[error("Must specify either --serial or --tcp")]
    MissingTransport,

    #[error("Specify only one of --serial or --tcp")]
    ConflictingTransport,

    #[error("No power supplies responded")]
    NoUnitsFound,

    #[error("Failed to get version response")]
    QueryFailed,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Output error: {0}")]
    Output(String),
}

pub type Sys8x00Result<T> = Result<T, Sys8x00Error>;
