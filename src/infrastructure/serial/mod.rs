// Serial module - Serial line transport
pub mod client;

pub use client::{SerialConnector, SerialLink};
