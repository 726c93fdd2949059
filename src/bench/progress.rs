//! Progress reporting for runner passes
//!
//! Bridges the synchronous runner to an async consumer (the TUI or the CLI
//! progress bar) over a tokio channel.

use std::time::Duration;
use tokio::sync::mpsc;

use crate::bench::runner::{PauseHook, StepHook};
use crate::models::BenchmarkResult;

/// Stage of a single workload
#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    Started,
    Finished(BenchmarkResult),
}

/// Progress update sent during a runner pass
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Zero-based position of the workload in the registry
    pub index: usize,
    /// Number of workloads in the pass
    pub total: usize,
    /// Workload name
    pub name: String,
    pub status: StepStatus,
}

impl ProgressUpdate {
    /// Calculate completion percentage (0.0 to 1.0)
    pub fn completion_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let done = match self.status {
            StepStatus::Started => self.index,
            StepStatus::Finished(_) => self.index + 1,
        };
        done as f64 / self.total as f64
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, StepStatus::Finished(_))
    }
}

/// Step hook that forwards progress over a channel.
///
/// Must be driven from a blocking thread (for example inside
/// `tokio::task::spawn_blocking`), never from an async task.
#[derive(Debug)]
pub struct ChannelHook {
    tx: mpsc::Sender<ProgressUpdate>,
    total: usize,
    pause: PauseHook,
}

impl ChannelHook {
    pub fn new(tx: mpsc::Sender<ProgressUpdate>, total: usize) -> Self {
        Self {
            tx,
            total,
            pause: PauseHook::new(Duration::ZERO),
        }
    }

    /// Sleep this long before each workload so the consumer can redraw
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = PauseHook::new(pause);
        self
    }

    fn send(&self, index: usize, name: &str, status: StepStatus) {
        let update = ProgressUpdate {
            index,
            total: self.total,
            name: name.to_string(),
            status,
        };
        // The receiver going away only means nobody is watching anymore
        if self.tx.blocking_send(update).is_err() {
            tracing::trace!("Progress receiver dropped");
        }
    }
}

impl StepHook for ChannelHook {
    fn before_step(&mut self, index: usize, name: &str) {
        self.send(index, name, StepStatus::Started);
        self.pause.before_step(index, name);
    }

    fn after_step(&mut self, index: usize, name: &str, result: &BenchmarkResult) {
        self.send(index, name, StepStatus::Finished(result.clone()));
    }
}
