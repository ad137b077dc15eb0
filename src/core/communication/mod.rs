// Communication module - Transport abstraction and wire commands
pub mod command;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use command::{decode_reply, DeviceCommand};
pub use transport::{Connector, Link, TransportType};
