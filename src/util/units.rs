//! Units formatting and conversion utilities
//!
//! Provides functions for rate calculation and human-readable formatting of
//! counts, durations and system info keys.

use std::time::Duration;

/// Calculate operations per second from an operation count and elapsed time
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use cpurb::util::units::calculate_rate;
///
/// let rate = calculate_rate(1000.0, Duration::from_millis(500));
/// assert!((rate - 2000.0).abs() < 0.01);
/// ```
pub fn calculate_rate(operations: f64, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }

    operations / duration.as_secs_f64()
}

/// Duration in fractional milliseconds
pub fn duration_millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Format a number with thousands separators and at most three decimals
///
/// # Examples
/// ```
/// use cpurb::util::units::format_number;
///
/// assert_eq!(format_number(1234567.0), "1,234,567");
/// assert_eq!(format_number(-1500.25), "-1,500.25");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let whole = abs.trunc() as u64;
    let fraction = format!("{:.3}", abs.fract());
    let fraction = fraction.trim_start_matches('0').trim_end_matches('0');
    let fraction = if fraction == "." { "" } else { fraction };

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}{}", if negative { "-" } else { "" }, grouped, fraction)
}

/// Format a workload size compactly
///
/// # Examples
/// ```
/// use cpurb::util::units::format_compact_count;
///
/// assert_eq!(format_compact_count(200_000), "200K");
/// assert_eq!(format_compact_count(1_000_000), "1M");
/// ```
pub fn format_compact_count(count: u64) -> String {
    fn scaled(count: u64, unit: u64, suffix: &str) -> String {
        if count % unit == 0 {
            format!("{}{}", count / unit, suffix)
        } else {
            format!("{:.1}{}", count as f64 / unit as f64, suffix)
        }
    }

    if count >= 1_000_000 {
        scaled(count, 1_000_000, "M")
    } else if count >= 1_000 {
        scaled(count, 1_000, "K")
    } else {
        count.to_string()
    }
}

/// Format a millisecond duration the way result tables show it
pub fn format_duration_ms(millis: f64) -> String {
    format!("{:.2}ms", millis)
}

/// Turn a camelCase key into a title-cased label ("nodeVersion" -> "Node Version")
pub fn humanize_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}
