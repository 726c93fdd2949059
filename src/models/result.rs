//! Benchmark result data models
//!
//! Contains the per-workload result record, the ordered result set produced
//! by one runner pass, and the aggregate performance score.

use crate::models::system::SystemInfo;
use crate::util::units::{calculate_rate, duration_millis, format_number};
use crate::{CpurbError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Sanity-check value produced by a workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryOutput {
    /// Integer result such as a prime count or a rounded sum
    Count(u64),
    /// Non-integer value found in a decoded payload
    Number(f64),
    /// Textual result such as a matrix shape
    Text(String),
}

impl fmt::Display for PrimaryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryOutput::Count(n) => write!(f, "{}", format_number(*n as f64)),
            PrimaryOutput::Number(n) => write!(f, "{}", format_number(*n)),
            PrimaryOutput::Text(s) => f.write_str(s),
        }
    }
}

/// Outcome of a single workload invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    /// Human-readable description of the work performed
    pub description: String,
    /// Wall-clock time of the timed region in milliseconds
    pub duration_ms: f64,
    /// Sanity-check output of the computation
    pub primary_output: PrimaryOutput,
    /// Throughput in workload-specific operations per second
    pub ops_per_second: f64,
    /// Failure message when the workload could not run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BenchmarkResult {
    /// Build a result from the elapsed time and the number of operations performed.
    /// The rate is rounded to the nearest integer; a zero elapsed time gives a rate of 0.
    pub fn new(
        description: impl Into<String>,
        elapsed: Duration,
        primary_output: PrimaryOutput,
        operations: f64,
    ) -> Self {
        Self {
            description: description.into(),
            duration_ms: duration_millis(elapsed),
            primary_output,
            ops_per_second: calculate_rate(operations, elapsed).round(),
            error: None,
        }
    }

    /// Sentinel result for a workload that failed on the server
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            description: "Test failed to run on the server.".to_string(),
            duration_ms: 0.0,
            primary_output: PrimaryOutput::Text("Error".to_string()),
            ops_per_second: 0.0,
            error: Some(message.into()),
        }
    }

    /// Whether this result carries a failure
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Contribution of this result to the performance score
    pub fn score_term(&self) -> f64 {
        self.ops_per_second.max(1.0).log10() * 10_000.0
    }

    /// Get a human-readable one-line summary
    pub fn summary(&self) -> String {
        match &self.error {
            Some(error) => format!("{} - Error: {}", self.description, error),
            None => format!(
                "{} - {:.2}ms - {} ops/s - result {}",
                self.description,
                self.duration_ms,
                format_number(self.ops_per_second),
                self.primary_output
            ),
        }
    }
}

/// Aggregate score: `round(sum(log10(max(ops, 1)) * 10000))`
pub fn performance_score<'a, I>(results: I) -> i64
where
    I: IntoIterator<Item = &'a BenchmarkResult>,
{
    let total: f64 = results.into_iter().map(BenchmarkResult::score_term).sum();
    total.round() as i64
}

/// Results of one runner pass keyed by workload name, in registry order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: Vec<(String, BenchmarkResult)>,
}

impl ResultSet {
    /// Create an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a result set from ordered entries, rejecting duplicate names
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, BenchmarkResult)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (name, result) in entries {
            set.push(name.into(), result)?;
        }
        Ok(set)
    }

    pub(crate) fn push(&mut self, name: String, result: BenchmarkResult) -> Result<()> {
        if self.get(&name).is_some() {
            return Err(CpurbError::RegistryError(format!(
                "Duplicate workload name in result set: {}",
                name
            )));
        }
        self.entries.push((name, result));
        Ok(())
    }

    // Caller guarantees the name is not present yet
    pub(crate) fn append(&mut self, name: &str, result: BenchmarkResult) {
        debug_assert!(self.get(name).is_none(), "duplicate workload {}", name);
        self.entries.push((name.to_string(), result));
    }

    /// Look up the result for a workload
    pub fn get(&self, name: &str) -> Option<&BenchmarkResult> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, result)| result)
    }

    /// Iterate over `(name, result)` pairs in registry order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BenchmarkResult)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Workload names in registry order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries marked as failed
    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_error()).count()
    }

    /// Aggregate performance score for this set
    pub fn performance_score(&self) -> i64 {
        performance_score(self.entries.iter().map(|(_, r)| r))
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        super::ordered::serialize(&self.entries, serializer)
    }
}

impl<'de> Deserialize<'de> for ResultSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Self {
            entries: super::ordered::deserialize(deserializer)?,
        })
    }
}

/// Response body of the remote benchmark endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteReport {
    pub results: ResultSet,
    pub system_info: SystemInfo,
}
