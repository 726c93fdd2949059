//! Configuration management module
//!
//! Handles loading, saving, and validation of benchmark configuration,
//! plus the per-mode workload size tables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::{CpurbError, Result, APP_NAME, BENCHMARK_ROUTE, CONFIG_FILE};

/// Workload size selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Small workloads, the only mode run by the server
    #[default]
    Lite,
    /// Large workloads for local runs
    Full,
}

/// Size constants for every workload in one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSizes {
    /// Upper bound of the prime search
    pub prime_limit: u64,
    /// Argument of the recursive Fibonacci call
    pub fibonacci_n: u32,
    /// Iterations of the math loop
    pub math_iterations: u64,
    /// Number of elements to sort
    pub sort_size: usize,
    /// Side length of the square matrices
    pub matrix_dimension: usize,
}

const LITE_SIZES: WorkloadSizes = WorkloadSizes {
    prime_limit: 10_000,
    fibonacci_n: 35,
    math_iterations: 200_000,
    sort_size: 25_000,
    matrix_dimension: 80,
};

const FULL_SIZES: WorkloadSizes = WorkloadSizes {
    prime_limit: 100_000,
    fibonacci_n: 40,
    math_iterations: 1_000_000,
    sort_size: 100_000,
    matrix_dimension: 150,
};

impl ExecutionMode {
    /// Size table for this mode
    pub fn sizes(&self) -> WorkloadSizes {
        match self {
            ExecutionMode::Lite => LITE_SIZES,
            ExecutionMode::Full => FULL_SIZES,
        }
    }

    /// Get a human-readable description of the mode
    pub fn description(&self) -> &'static str {
        match self {
            ExecutionMode::Lite => "Lite",
            ExecutionMode::Full => "Full",
        }
    }
}

impl WorkloadSizes {
    /// Apply the server route reductions on top of these sizes
    pub fn with_remote_sizing(self, remote: &RemoteSizing) -> Self {
        Self {
            math_iterations: remote.math_iterations,
            matrix_dimension: remote.matrix_dimension,
            ..self
        }
    }
}

/// Extra reductions applied to the Lite sizes when running behind the HTTP endpoint.
///
/// The two values are tuned independently to fit the hosting platform's
/// function timeout, so they are not derived from each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSizing {
    pub math_iterations: u64,
    pub matrix_dimension: usize,
}

impl Default for RemoteSizing {
    fn default() -> Self {
        Self {
            math_iterations: 100_000,
            matrix_dimension: 60,
        }
    }
}

/// HTTP service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Label reported as `platform` in the server system info
    pub platform_label: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            platform_label: "Serverless Function".to_string(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Benchmark configuration structure containing all run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Mode used for local runs
    pub mode: ExecutionMode,
    /// Pause before each local workload so the UI can redraw
    #[serde(with = "pause_serde")]
    pub step_pause: Duration,
    /// Endpoint queried for remote results
    pub remote_url: String,
    /// Server route size reductions
    pub remote: RemoteSizing,
    /// HTTP service settings
    pub server: ServerConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Lite,
            step_pause: Duration::from_millis(50),
            remote_url: format!("http://127.0.0.1:8080{}", BENCHMARK_ROUTE),
            remote: RemoteSizing::default(),
            server: ServerConfig::default(),
        }
    }
}

impl BenchmarkConfig {
    /// Create a new benchmark configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes for a local run in the configured mode
    pub fn local_sizes(&self) -> WorkloadSizes {
        self.mode.sizes()
    }

    /// Sizes for a server run: always Lite, reduced by `remote`
    pub fn remote_sizes(&self) -> WorkloadSizes {
        ExecutionMode::Lite.sizes().with_remote_sizing(&self.remote)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        const MAX_STEP_PAUSE: Duration = Duration::from_secs(5);
        if self.step_pause > MAX_STEP_PAUSE {
            return Err(CpurbError::ConfigError(format!(
                "Step pause too long: {}ms (max: {}ms)",
                self.step_pause.as_millis(),
                MAX_STEP_PAUSE.as_millis()
            )));
        }

        if self.remote.math_iterations == 0 {
            return Err(CpurbError::ConfigError(
                "Remote math iterations must be greater than 0".to_string(),
            ));
        }

        if self.remote.matrix_dimension == 0 {
            return Err(CpurbError::ConfigError(
                "Remote matrix dimension must be greater than 0".to_string(),
            ));
        }

        if self.server.host.trim().is_empty() {
            return Err(CpurbError::ConfigError(
                "Server host must not be empty".to_string(),
            ));
        }

        if !(self.remote_url.starts_with("http://") || self.remote_url.starts_with("https://")) {
            return Err(CpurbError::ConfigError(format!(
                "Remote URL must use http or https: {}",
                self.remote_url
            )));
        }

        Ok(())
    }

    /// Set the local execution mode
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the pause inserted before each local workload
    pub fn with_step_pause(mut self, pause: Duration) -> Self {
        self.step_pause = pause;
        self
    }

    /// Set the remote endpoint URL
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = url.into();
        self
    }

    /// Set the server bind host and port
    pub fn with_server_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.server.host = host.into();
        self.server.port = port;
        self
    }

    /// Load configuration from the standard config file location
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            CpurbError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            CpurbError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the standard config file location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CpurbError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| {
            CpurbError::ConfigError(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/cpurb/cpurb.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            CpurbError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

// Durations are written as humantime strings ("50ms") in the config file
mod pause_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mode_size_tables() {
        let lite = ExecutionMode::Lite.sizes();
        assert_eq!(lite.prime_limit, 10_000);
        assert_eq!(lite.fibonacci_n, 35);
        assert_eq!(lite.math_iterations, 200_000);
        assert_eq!(lite.sort_size, 25_000);
        assert_eq!(lite.matrix_dimension, 80);

        let full = ExecutionMode::Full.sizes();
        assert_eq!(full.prime_limit, 100_000);
        assert_eq!(full.fibonacci_n, 40);
        assert_eq!(full.math_iterations, 1_000_000);
        assert_eq!(full.sort_size, 100_000);
        assert_eq!(full.matrix_dimension, 150);
    }

    #[test]
    fn test_remote_sizes_reduce_only_math_and_matrix() {
        let config = BenchmarkConfig::default().with_mode(ExecutionMode::Full);
        let sizes = config.remote_sizes();
        let lite = ExecutionMode::Lite.sizes();

        assert_eq!(sizes.math_iterations, 100_000);
        assert_eq!(sizes.matrix_dimension, 60);
        assert_eq!(sizes.prime_limit, lite.prime_limit);
        assert_eq!(sizes.fibonacci_n, lite.fibonacci_n);
        assert_eq!(sizes.sort_size, lite.sort_size);
    }

    #[test]
    fn test_toml_serialization() {
        let config = BenchmarkConfig::default()
            .with_mode(ExecutionMode::Full)
            .with_step_pause(Duration::from_millis(120));
        let toml_str = toml::to_string(&config).expect("Failed to serialize to TOML");
        assert!(toml_str.contains("mode = \"full\""));
        assert!(toml_str.contains("step_pause = \"120ms\""));

        let deserialized: BenchmarkConfig =
            toml::from_str(&toml_str).expect("Failed to deserialize from TOML");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BenchmarkConfig = toml::from_str("mode = \"full\"\n[server]\nport = 9000\n")
            .expect("partial config should parse");
        assert_eq!(config.mode, ExecutionMode::Full);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.step_pause, Duration::from_millis(50));
        assert_eq!(config.remote, RemoteSizing::default());
    }

    #[test]
    fn test_validation() {
        assert!(BenchmarkConfig::default().validate().is_ok());

        let config = BenchmarkConfig::default().with_step_pause(Duration::from_secs(10));
        assert!(config.validate().is_err());

        let mut config = BenchmarkConfig::default();
        config.remote.matrix_dimension = 0;
        assert!(config.validate().is_err());

        let mut config = BenchmarkConfig::default();
        config.remote.math_iterations = 0;
        assert!(config.validate().is_err());

        let config = BenchmarkConfig::default().with_remote_url("ftp://example.com");
        assert!(config.validate().is_err());

        let config = BenchmarkConfig::default().with_server_address("  ", 80);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = BenchmarkConfig::load_from(&temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, BenchmarkConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("cpurb.toml");

        let config = BenchmarkConfig::default()
            .with_mode(ExecutionMode::Full)
            .with_server_address("127.0.0.1", 3000);
        config.save_to(&path).unwrap();

        let loaded = BenchmarkConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cpurb.toml");
        fs::write(&path, "step_pause = \"not a duration\"").unwrap();
        assert!(matches!(
            BenchmarkConfig::load_from(&path),
            Err(CpurbError::ConfigError(_))
        ));
    }

    #[test]
    fn test_config_file_path() {
        let path = BenchmarkConfig::config_file_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("cpurb"));
        assert!(path.to_string_lossy().contains("cpurb.toml"));
    }
}
