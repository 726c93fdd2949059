//! TUI screen components
//!
//! Contains individual screen implementations for different application states.

pub mod results;
pub mod running;
pub mod start;

pub use results::{PanelContent, ResultAction, ResultsScreen};
pub use running::{RunKind, RunningScreen, StepState};
pub use start::{MenuAction, StartScreen};
