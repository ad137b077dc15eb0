use crate::domain::config::BusAddress;
use crate::domain::error::{Sys8x00Error, Sys8x00Result};
use std::fmt;

/// Terminator for commands sent to and replies read from the unit
pub const TERMINATOR: u8 = b'\r';

/// Commands understood by the SYS8X00 command interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// `ADR nn`: direct following commands to one unit on the bus
    Address(BusAddress),
    /// `VER`: request the firmware identification string
    Version,
}

impl DeviceCommand {
    /// Wire form of the command, carriage-return terminated
    pub fn encode(&self) -> Vec<u8> {
        let mut frame = self.to_string().into_bytes();
        frame.push(TERMINATOR);
        frame
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCommand::Address(address) => write!(f, "ADR {}", address),
            DeviceCommand::Version => write!(f, "VER"),
        }
    }
}

/// Decode a raw reply as ASCII and strip surrounding whitespace
pub fn decode_reply(raw: &[u8]) -> Sys8x00Result<String> {
    if !raw.is_ascii() {
        return Err(Sys8x00Error::Decode(format!(
            "reply is not ASCII: {:02X?}",
            raw
        )));
    }

    // ASCII is always valid UTF-8
    let text = String::from_utf8_lossy(raw);
    Ok(text.trim().to_string())
}
