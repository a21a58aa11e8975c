//! Infrastructure adapters for console output and configuration.

pub mod config;
pub mod console;
