//! CPURB - CPU Rust Bench
//!
//! Runs a fixed set of synthetic compute workloads locally or on a remote
//! HTTP endpoint and reports timing, throughput and an aggregate score.

use std::fmt;

pub mod app;
pub mod bench;
pub mod config;
pub mod models;
pub mod remote;
pub mod report;
pub mod server;
pub mod simple;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum CpurbError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// A workload failed while running
    WorkloadFailed(String),
    /// Registry construction error
    RegistryError(String),
    /// TUI rendering or interaction error
    TuiError(String),
    /// HTTP service error
    ServerError(String),
    /// Fetching results from the remote endpoint failed
    RemoteError(String),
}

impl fmt::Display for CpurbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpurbError::IoError(err) => write!(f, "I/O error: {}", err),
            CpurbError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            CpurbError::WorkloadFailed(msg) => write!(f, "Workload failed: {}", msg),
            CpurbError::RegistryError(msg) => write!(f, "Registry error: {}", msg),
            CpurbError::TuiError(msg) => write!(f, "TUI error: {}", msg),
            CpurbError::ServerError(msg) => write!(f, "Server error: {}", msg),
            CpurbError::RemoteError(msg) => write!(f, "Remote benchmark error: {}", msg),
        }
    }
}

impl std::error::Error for CpurbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CpurbError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CpurbError {
    fn from(err: std::io::Error) -> Self {
        CpurbError::IoError(err)
    }
}

impl From<serde_json::Error> for CpurbError {
    fn from(err: serde_json::Error) -> Self {
        CpurbError::RemoteError(format!("JSON decoding error: {}", err))
    }
}

impl From<toml::de::Error> for CpurbError {
    fn from(err: toml::de::Error) -> Self {
        CpurbError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for CpurbError {
    fn from(err: toml::ser::Error) -> Self {
        CpurbError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

impl From<reqwest::Error> for CpurbError {
    fn from(err: reqwest::Error) -> Self {
        CpurbError::RemoteError(err.to_string())
    }
}

/// Result type alias for CPURB operations
pub type Result<T> = std::result::Result<T, CpurbError>;

/// Error handling utilities
pub mod error {
    use super::CpurbError;

    /// Convert error to a message suitable for the results view
    pub fn user_friendly_message(error: &CpurbError) -> String {
        match error {
            CpurbError::RemoteError(_) => "Failed to fetch results from server.".to_string(),
            CpurbError::WorkloadFailed(msg) => format!("Benchmark run failed: {}", msg),
            CpurbError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            CpurbError::ServerError(_) => {
                "The benchmark server could not start. Check the host and port.".to_string()
            }
            _ => error.to_string(),
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "cpurb";
pub const CONFIG_FILE: &str = "cpurb.toml";
pub const BENCHMARK_ROUTE: &str = "/api/benchmark";
