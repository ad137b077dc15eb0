// Domain module - Configuration types and errors
pub mod config;
pub mod error;
