//! Benchmark engine module
//!
//! Contains the CPU workloads, the registry that orders them, and the
//! runner that executes a registry with progress reporting.

pub mod progress;
pub mod registry;
pub mod runner;
pub mod workloads;

// Re-export commonly used types
pub use progress::{ChannelHook, ProgressUpdate, StepStatus};
pub use registry::{Registry, WorkloadFn, WorkloadSpec};
pub use runner::{invoke, NoopHook, PauseHook, Runner, StepHook};
