//! Plain-text rendering of benchmark results for the command line

use crate::error::user_friendly_message;
use crate::models::{BenchmarkResult, RemoteReport, ResultSet, SystemInfo};
use crate::util::units::{format_duration_ms, format_number, humanize_key};
use crate::CpurbError;

const NAME_WIDTH: usize = 22;
const DESCRIPTION_WIDTH: usize = 34;
const TIME_WIDTH: usize = 12;
const RATE_WIDTH: usize = 14;

/// Results table with one row per workload, failures shown inline
pub fn render_results(results: &ResultSet) -> String {
    let mut out = String::new();
    let header = format!(
        "{:<nw$} {:<dw$} {:>tw$} {:>rw$}  {}",
        "Test",
        "Description",
        "Time",
        "Ops/sec",
        "Result",
        nw = NAME_WIDTH,
        dw = DESCRIPTION_WIDTH,
        tw = TIME_WIDTH,
        rw = RATE_WIDTH
    );
    push_line(&mut out, &header);
    push_line(
        &mut out,
        &"-".repeat(NAME_WIDTH + DESCRIPTION_WIDTH + TIME_WIDTH + RATE_WIDTH + 12),
    );
    for (name, result) in results.iter() {
        push_line(&mut out, &render_row(name, result));
    }
    out
}

fn render_row(name: &str, result: &BenchmarkResult) -> String {
    let outcome = match &result.error {
        Some(error) => format!("Error: {}", error),
        None => result.primary_output.to_string(),
    };
    format!(
        "{:<nw$} {:<dw$} {:>tw$} {:>rw$}  {}",
        name,
        result.description,
        format_duration_ms(result.duration_ms),
        format_number(result.ops_per_second),
        outcome,
        nw = NAME_WIDTH,
        dw = DESCRIPTION_WIDTH,
        tw = TIME_WIDTH,
        rw = RATE_WIDTH
    )
}

/// Key/value listing with humanized keys
pub fn render_system_info(info: &SystemInfo) -> String {
    let mut out = String::new();
    for (key, value) in info.iter() {
        push_line(&mut out, &format!("  {}: {}", humanize_key(key), value));
    }
    out
}

/// Full panel: title, table, score and system info
pub fn render_panel(title: &str, results: &ResultSet, info: &SystemInfo) -> String {
    let mut out = String::new();
    push_line(&mut out, &format!("== {} ==", title));
    out.push_str(&render_results(results));
    push_line(
        &mut out,
        &format!(
            "\nPerformance Score: {}",
            format_number(results.performance_score() as f64)
        ),
    );
    if results.failed_count() > 0 {
        push_line(
            &mut out,
            &format!("{} of {} tests failed", results.failed_count(), results.len()),
        );
    }
    push_line(&mut out, "\nSystem Info");
    out.push_str(&render_system_info(info));
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Page-level error shown in place of a result panel
pub fn render_error(title: &str, error: &CpurbError) -> String {
    format!("== {} ==\nError: {}\n", title, user_friendly_message(error))
}

/// Local panel followed by the remote panel or its error
pub fn render_comparison(
    local: &ResultSet,
    local_info: &SystemInfo,
    remote: std::result::Result<&RemoteReport, &CpurbError>,
) -> String {
    let mut out = render_panel("Local", local, local_info);
    out.push('\n');
    match remote {
        Ok(report) => {
            out.push_str(&render_panel("Server", &report.results, &report.system_info));
            push_line(
                &mut out,
                &format!(
                    "\nScore difference (local - server): {}",
                    local.performance_score() - report.results.performance_score()
                ),
            );
        }
        Err(error) => out.push_str(&render_error("Server", error)),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrimaryOutput;
    use std::time::Duration;

    fn sample_results() -> ResultSet {
        ResultSet::from_entries(vec![
            (
                "Prime Numbers",
                BenchmarkResult::new(
                    "Finding primes up to 10,000",
                    Duration::from_millis(4),
                    PrimaryOutput::Count(1229),
                    10_000.0,
                ),
            ),
            ("Fibonacci", BenchmarkResult::failed("stack overflow")),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_results_rows() {
        let table = render_results(&sample_results());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Test"));
        assert!(lines[2].contains("Finding primes up to 10,000"));
        assert!(lines[2].contains("4.00ms"));
        assert!(lines[2].contains("2,500,000"));
        assert!(lines[2].ends_with("1,229"));
        assert!(lines[3].contains("Error: stack overflow"));
    }

    #[test]
    fn test_render_panel_includes_score_and_info() {
        let mut info = SystemInfo::new();
        info.insert("platform", "linux");
        info.insert("cores", "8");

        let panel = render_panel("Local", &sample_results(), &info);
        assert!(panel.starts_with("== Local =="));
        // log10(2_500_000) * 10000 = 63979.4
        assert!(panel.contains("Performance Score: 63,979"));
        assert!(panel.contains("1 of 2 tests failed"));
        assert!(panel.contains("  Platform: linux"));
        assert!(panel.contains("  Cores: 8"));
    }

    #[test]
    fn test_render_panel_line_layout() {
        let mut info = SystemInfo::new();
        info.insert("platform", "linux");

        let panel = render_panel("Server", &sample_results(), &info);
        let lines: Vec<&str> = panel.lines().collect();
        assert_eq!(lines[0], "== Server ==");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Performance Score: 63,979");
        assert_eq!(lines[7], "1 of 2 tests failed");
        assert_eq!(&lines[8..], ["", "System Info", "  Platform: linux"]);
        assert!(panel.ends_with("linux\n"));
    }

    #[test]
    fn test_render_comparison_with_remote_error() {
        let info = SystemInfo::new();
        let error = CpurbError::RemoteError("connection refused".to_string());
        let text = render_comparison(&sample_results(), &info, Err(&error));
        assert!(text.contains("== Local =="));
        assert!(text.contains("== Server ==\nError: Failed to fetch results from server."));
    }

    #[test]
    fn test_render_comparison_with_remote_report() {
        let info = SystemInfo::new();
        let report = RemoteReport {
            results: sample_results(),
            system_info: SystemInfo::new(),
        };
        let text = render_comparison(&sample_results(), &info, Ok(&report));
        assert!(text.contains("== Server =="));
        assert!(text.contains("Score difference (local - server): 0"));
    }
}
