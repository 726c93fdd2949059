//! Utility functions module
//!
//! Contains helper functions for rate calculation and number formatting.

pub mod units;

// Re-export commonly used functions
pub use units::{
    calculate_rate, duration_millis,
    format_number, format_compact_count, format_duration_ms, humanize_key,
};
