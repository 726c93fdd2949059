//! Workload registry
//!
//! An immutable, ordered list of named workloads. Both the local runner and
//! the HTTP endpoint consume the same registry.

use crate::bench::workloads;
use crate::config::WorkloadSizes;
use crate::models::BenchmarkResult;
use crate::{CpurbError, Result};
use std::fmt;

/// Signature shared by every workload entry point
pub type WorkloadFn = fn(&WorkloadSizes) -> Result<BenchmarkResult>;

pub const PRIME_NUMBERS: &str = "Prime Numbers";
pub const FIBONACCI: &str = "Fibonacci";
pub const MATH_OPERATIONS: &str = "Math Operations";
pub const ARRAY_SORTING: &str = "Array Sorting";
pub const MATRIX_MULTIPLICATION: &str = "Matrix Multiplication";

/// A display name paired with the function that runs the workload
#[derive(Clone)]
pub struct WorkloadSpec {
    name: String,
    run: WorkloadFn,
}

impl fmt::Debug for WorkloadSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadSpec").field("name", &self.name).finish_non_exhaustive()
    }
}

impl WorkloadSpec {
    pub fn new(name: impl Into<String>, run: WorkloadFn) -> Self {
        Self {
            name: name.into(),
            run,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the workload without any failure isolation
    pub fn run(&self, sizes: &WorkloadSizes) -> Result<BenchmarkResult> {
        (self.run)(sizes)
    }
}

/// Ordered collection of uniquely named workloads
#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<WorkloadSpec>,
}

impl Registry {
    /// Build a registry, rejecting empty or duplicate names
    pub fn new(specs: Vec<WorkloadSpec>) -> Result<Self> {
        for (i, spec) in specs.iter().enumerate() {
            if spec.name.trim().is_empty() {
                return Err(CpurbError::RegistryError(format!(
                    "Workload at position {} has an empty name",
                    i
                )));
            }
            if specs[..i].iter().any(|other| other.name == spec.name) {
                return Err(CpurbError::RegistryError(format!(
                    "Duplicate workload name: {}",
                    spec.name
                )));
            }
        }
        Ok(Self { specs })
    }

    /// The five standard CPU workloads in display order
    pub fn standard() -> Self {
        Self {
            specs: vec![
                WorkloadSpec::new(PRIME_NUMBERS, workloads::prime_count),
                WorkloadSpec::new(FIBONACCI, workloads::recursive_fibonacci),
                WorkloadSpec::new(MATH_OPERATIONS, workloads::math_loop),
                WorkloadSpec::new(ARRAY_SORTING, workloads::array_sort),
                WorkloadSpec::new(MATRIX_MULTIPLICATION, workloads::matrix_multiply),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkloadSpec> {
        self.specs.iter()
    }

    pub fn get(&self, name: &str) -> Option<&WorkloadSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|spec| spec.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
