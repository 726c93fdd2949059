//! Benchmark runner
//!
//! Invokes every registered workload in order, one at a time, and collects a
//! fresh [`ResultSet`]. The local path stops at the first failure; the
//! isolated (server) path turns each failure into an error-marked result and
//! keeps going.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::bench::registry::{Registry, WorkloadSpec};
use crate::config::{ExecutionMode, WorkloadSizes};
use crate::models::{BenchmarkResult, ResultSet};
use crate::{CpurbError, Result};

/// Callbacks invoked by the runner around each workload.
///
/// Hooks run outside the timed region of a workload.
pub trait StepHook {
    fn before_step(&mut self, _index: usize, _name: &str) {}

    fn after_step(&mut self, _index: usize, _name: &str, _result: &BenchmarkResult) {}
}

/// Hook that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl StepHook for NoopHook {}

/// Sleeps before each workload so a host UI gets a chance to redraw
#[derive(Debug, Clone, Copy)]
pub struct PauseHook {
    pause: Duration,
}

impl PauseHook {
    pub fn new(pause: Duration) -> Self {
        Self { pause }
    }
}

impl StepHook for PauseHook {
    fn before_step(&mut self, _index: usize, _name: &str) {
        if !self.pause.is_zero() {
            std::thread::sleep(self.pause);
        }
    }
}

/// Runs a registry with a fixed set of workload sizes
#[derive(Debug, Clone)]
pub struct Runner<'r> {
    registry: &'r Registry,
    sizes: WorkloadSizes,
}

impl<'r> Runner<'r> {
    pub fn new(registry: &'r Registry, sizes: WorkloadSizes) -> Self {
        Self { registry, sizes }
    }

    pub fn for_mode(registry: &'r Registry, mode: ExecutionMode) -> Self {
        Self::new(registry, mode.sizes())
    }

    pub fn sizes(&self) -> &WorkloadSizes {
        &self.sizes
    }

    /// Run every workload, aborting on the first failure
    pub fn run_local(&self) -> Result<ResultSet> {
        self.run_local_with(&mut NoopHook)
    }

    pub fn run_local_with(&self, hook: &mut dyn StepHook) -> Result<ResultSet> {
        let mut results = ResultSet::new();
        for (index, spec) in self.registry.iter().enumerate() {
            hook.before_step(index, spec.name());
            let result = invoke(spec, &self.sizes).map_err(|e| {
                tracing::error!(workload = spec.name(), error = %e, "Local run aborted");
                e
            })?;
            tracing::debug!(
                workload = spec.name(),
                duration_ms = result.duration_ms,
                ops_per_second = result.ops_per_second,
                "Workload finished"
            );
            hook.after_step(index, spec.name(), &result);
            results.append(spec.name(), result);
        }
        Ok(results)
    }

    /// Run every workload, replacing each failure with an error-marked result
    pub fn run_isolated(&self) -> ResultSet {
        self.run_isolated_with(&mut NoopHook)
    }

    pub fn run_isolated_with(&self, hook: &mut dyn StepHook) -> ResultSet {
        let mut results = ResultSet::new();
        for (index, spec) in self.registry.iter().enumerate() {
            hook.before_step(index, spec.name());
            let result = match invoke(spec, &self.sizes) {
                Ok(result) => {
                    tracing::debug!(
                        workload = spec.name(),
                        duration_ms = result.duration_ms,
                        ops_per_second = result.ops_per_second,
                        "Workload finished"
                    );
                    result
                }
                Err(e) => {
                    tracing::warn!(workload = spec.name(), error = %e, "Workload failed");
                    BenchmarkResult::failed(failure_message(&e))
                }
            };
            hook.after_step(index, spec.name(), &result);
            results.append(spec.name(), result);
        }
        results
    }
}

/// Run one workload, converting a panic into a workload failure
pub fn invoke(spec: &WorkloadSpec, sizes: &WorkloadSizes) -> Result<BenchmarkResult> {
    match panic::catch_unwind(AssertUnwindSafe(|| spec.run(sizes))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "workload panicked".to_string()
            };
            Err(CpurbError::WorkloadFailed(message))
        }
    }
}

fn failure_message(error: &CpurbError) -> String {
    match error {
        CpurbError::WorkloadFailed(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrimaryOutput;
    use std::time::Instant;

    fn tiny_sizes() -> WorkloadSizes {
        WorkloadSizes {
            prime_limit: 100,
            fibonacci_n: 10,
            math_iterations: 10,
            sort_size: 10,
            matrix_dimension: 2,
        }
    }

    fn ok_workload(sizes: &WorkloadSizes) -> Result<BenchmarkResult> {
        Ok(BenchmarkResult::new(
            "ok",
            Duration::from_millis(1),
            PrimaryOutput::Count(sizes.prime_limit),
            1.0,
        ))
    }

    fn failing_workload(_: &WorkloadSizes) -> Result<BenchmarkResult> {
        Err(CpurbError::WorkloadFailed("allocation failed".to_string()))
    }

    fn panicking_workload(_: &WorkloadSizes) -> Result<BenchmarkResult> {
        panic!("arithmetic overflow")
    }

    #[derive(Default)]
    struct RecordingHook {
        started: Vec<String>,
        finished: Vec<(usize, String)>,
    }

    impl StepHook for RecordingHook {
        fn before_step(&mut self, _index: usize, name: &str) {
            self.started.push(name.to_string());
        }

        fn after_step(&mut self, index: usize, name: &str, _result: &BenchmarkResult) {
            self.finished.push((index, name.to_string()));
        }
    }

    fn registry_with_failure() -> Registry {
        Registry::new(vec![
            WorkloadSpec::new("First", ok_workload),
            WorkloadSpec::new("Broken", failing_workload),
            WorkloadSpec::new("Panics", panicking_workload),
            WorkloadSpec::new("Last", ok_workload),
        ])
        .unwrap()
    }

    #[test]
    fn test_local_run_follows_registry_order() {
        let registry = Registry::standard();
        let runner = Runner::new(&registry, tiny_sizes());
        let mut hook = RecordingHook::default();

        let results = runner.run_local_with(&mut hook).unwrap();
        assert_eq!(results.names(), registry.names());
        assert_eq!(hook.started, registry.names());
        assert_eq!(hook.finished.len(), registry.len());
        assert_eq!(hook.finished[4].0, 4);
        assert_eq!(results.failed_count(), 0);
    }

    #[test]
    fn test_isolated_run_marks_failures_and_continues() {
        let registry = registry_with_failure();
        let runner = Runner::new(&registry, tiny_sizes());

        let results = runner.run_isolated();
        assert_eq!(results.names(), vec!["First", "Broken", "Panics", "Last"]);
        assert_eq!(results.failed_count(), 2);

        let broken = results.get("Broken").unwrap();
        assert_eq!(broken.error.as_deref(), Some("allocation failed"));
        assert_eq!(broken.duration_ms, 0.0);
        assert_eq!(broken.ops_per_second, 0.0);

        let panicked = results.get("Panics").unwrap();
        assert_eq!(panicked.error.as_deref(), Some("arithmetic overflow"));

        for name in ["First", "Last"] {
            let ok = results.get(name).unwrap();
            assert!(ok.error.is_none());
            assert_eq!(ok.primary_output, PrimaryOutput::Count(100));
            assert_eq!(ok.ops_per_second, 1000.0);
        }
    }

    #[test]
    fn test_local_run_aborts_on_failure() {
        let registry = registry_with_failure();
        let runner = Runner::new(&registry, tiny_sizes());
        let mut hook = RecordingHook::default();

        let err = runner.run_local_with(&mut hook);
        assert!(matches!(err, Err(CpurbError::WorkloadFailed(_))));
        assert_eq!(hook.started, vec!["First", "Broken"]);
        assert_eq!(hook.finished.len(), 1);
    }

    #[test]
    fn test_invoke_converts_panics() {
        let spec = WorkloadSpec::new("Panics", panicking_workload);
        match invoke(&spec, &tiny_sizes()) {
            Err(CpurbError::WorkloadFailed(msg)) => assert_eq!(msg, "arithmetic overflow"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_each_run_builds_a_fresh_set() {
        let registry = Registry::new(vec![WorkloadSpec::new("Only", ok_workload)]).unwrap();
        let runner = Runner::new(&registry, tiny_sizes());
        let first = runner.run_isolated();
        let second = runner.run_isolated();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    fn timed_workload(sizes: &WorkloadSizes) -> Result<BenchmarkResult> {
        let start = Instant::now();
        let sum: u64 = (0..sizes.math_iterations).map(std::hint::black_box).sum();
        Ok(BenchmarkResult::new(
            "timed",
            start.elapsed(),
            PrimaryOutput::Count(sum),
            sizes.math_iterations as f64,
        ))
    }

    #[test]
    fn test_pause_runs_before_each_step_outside_timing() {
        let registry = Registry::new(vec![
            WorkloadSpec::new("First", timed_workload),
            WorkloadSpec::new("Second", timed_workload),
        ])
        .unwrap();
        let runner = Runner::new(&registry, tiny_sizes());
        let pause = Duration::from_millis(20);

        let started = Instant::now();
        let results = runner.run_local_with(&mut PauseHook::new(pause)).unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= pause * 2, "elapsed {:?}", elapsed);
        for name in ["First", "Second"] {
            let result = results.get(name).unwrap();
            assert!(
                result.duration_ms < pause.as_secs_f64() * 1000.0,
                "{} took {}ms",
                name,
                result.duration_ms
            );
        }
    }

    #[test]
    fn test_zero_pause_does_not_sleep() {
        let registry = Registry::new(vec![WorkloadSpec::new("Only", ok_workload)]).unwrap();
        let runner = Runner::new(&registry, tiny_sizes());
        let started = Instant::now();
        assert!(runner.run_local_with(&mut PauseHook::new(Duration::ZERO)).is_ok());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_for_mode_uses_mode_sizes() {
        let registry = Registry::standard();
        let runner = Runner::for_mode(&registry, ExecutionMode::Full);
        assert_eq!(runner.sizes(), &ExecutionMode::Full.sizes());
    }
}
