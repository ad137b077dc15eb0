// TCP module - TCP socket transport
pub mod client;

pub use client::{TcpConnector, TcpLink};
