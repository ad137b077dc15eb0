// Core module - Protocol framing, version query and bus scan
pub mod communication;
pub mod query;
pub mod scan;
