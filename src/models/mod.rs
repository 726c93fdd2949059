//! Data models module
//!
//! Contains benchmark result records, the ordered result set with its
//! aggregate score, and execution environment descriptions.

mod ordered;
pub mod result;
pub mod system;

// Re-export commonly used types
pub use result::{performance_score, BenchmarkResult, PrimaryOutput, RemoteReport, ResultSet};
pub use system::SystemInfo;
