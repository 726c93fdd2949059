//! Running screen implementation
//!
//! Displays per-workload progress for a local run, or a waiting indicator
//! while the server benchmark is in flight.

use crate::bench::{ProgressUpdate, StepStatus};
use crate::config::ExecutionMode;
use crate::models::BenchmarkResult;
use crate::util::units::{format_duration_ms, format_number};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Row, Table},
    Frame,
};
use std::time::Instant;

/// What the screen is currently waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Local(ExecutionMode),
    Remote,
}

/// State of one workload row
#[derive(Debug, Clone, PartialEq)]
pub enum StepState {
    Pending,
    Running,
    Done(BenchmarkResult),
}

#[derive(Debug, Clone, PartialEq)]
struct StepRow {
    name: String,
    state: StepState,
}

/// Running screen component
#[derive(Debug)]
pub struct RunningScreen {
    kind: RunKind,
    steps: Vec<StepRow>,
    started_at: Instant,
    completed: bool,
    /// Error message if the run failed
    error_message: Option<String>,
}

impl Default for RunningScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningScreen {
    /// Create a new running screen
    pub fn new() -> Self {
        Self {
            kind: RunKind::Local(ExecutionMode::Lite),
            steps: Vec::new(),
            started_at: Instant::now(),
            completed: false,
            error_message: None,
        }
    }

    /// Reset for a local run over the given workload names
    pub fn start_local<S: AsRef<str>>(&mut self, mode: ExecutionMode, names: &[S]) {
        self.reset(RunKind::Local(mode));
        self.steps = names
            .iter()
            .map(|name| StepRow {
                name: name.as_ref().to_string(),
                state: StepState::Pending,
            })
            .collect();
    }

    /// Reset for a server run
    pub fn start_remote(&mut self) {
        self.reset(RunKind::Remote);
    }

    fn reset(&mut self, kind: RunKind) {
        self.kind = kind;
        self.steps.clear();
        self.started_at = Instant::now();
        self.completed = false;
        self.error_message = None;
    }

    pub fn kind(&self) -> RunKind {
        self.kind
    }

    /// Apply a progress update from the runner
    pub fn update_progress(&mut self, update: ProgressUpdate) {
        let Some(row) = self.steps.get_mut(update.index) else {
            tracing::warn!(index = update.index, "Progress update for unknown step");
            return;
        };
        row.state = match update.status {
            StepStatus::Started => StepState::Running,
            StepStatus::Finished(result) => StepState::Done(result),
        };
    }

    pub fn step_state(&self, index: usize) -> Option<&StepState> {
        self.steps.get(index).map(|row| &row.state)
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: String) {
        self.error_message = Some(error);
    }

    /// Check if the run is completed
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Check if there's an error
    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    /// Get the error message
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Fraction of finished workloads (0.0 to 1.0)
    pub fn completion_ratio(&self) -> f64 {
        if self.completed {
            return 1.0;
        }
        if self.steps.is_empty() {
            return 0.0;
        }
        let done = self
            .steps
            .iter()
            .filter(|row| matches!(row.state, StepState::Done(_)))
            .count();
        done as f64 / self.steps.len() as f64
    }

    /// Render the running screen
    pub fn render(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Progress bar
                Constraint::Min(8),    // Step table
                Constraint::Length(4), // Status/Error area
                Constraint::Length(3), // Help text
            ])
            .split(size);

        self.render_title(f, chunks[0]);
        self.render_progress_bar(f, chunks[1]);
        self.render_steps(f, chunks[2]);
        self.render_status(f, chunks[3]);
        self.render_help(f, chunks[4]);
    }

    fn render_title(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let what = match self.kind {
            RunKind::Local(mode) => format!("Local Benchmark ({})", mode.description()),
            RunKind::Remote => "Server Benchmark".to_string(),
        };
        let (suffix, color) = if self.has_error() {
            ("Error", Color::Red)
        } else if self.is_completed() {
            ("Completed", Color::Green)
        } else {
            ("Running", Color::Cyan)
        };

        let title_widget = Paragraph::new(format!("{} - {}", what, suffix))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );

        f.render_widget(title_widget, area);
    }

    fn render_progress_bar(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let ratio = self.completion_ratio();
        let elapsed = humantime::format_duration(std::time::Duration::from_secs(
            self.started_at.elapsed().as_secs(),
        ));
        let label = format!("{}% | Elapsed: {}", (ratio * 100.0) as u16, elapsed);

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title("Progress")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(label);

        f.render_widget(gauge, area);
    }

    fn render_steps(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let rows: Vec<Row> = if self.kind == RunKind::Remote {
            vec![Row::new(vec![
                "Server".to_string(),
                if self.is_completed() {
                    "Results received".to_string()
                } else {
                    "Waiting for server results...".to_string()
                },
            ])]
        } else {
            self.steps
                .iter()
                .map(|row| {
                    let (status, style) = match &row.state {
                        StepState::Pending => ("Pending".to_string(), Style::default().fg(Color::DarkGray)),
                        StepState::Running => ("Running...".to_string(), Style::default().fg(Color::Yellow)),
                        StepState::Done(result) => match &result.error {
                            Some(error) => (format!("Error: {}", error), Style::default().fg(Color::Red)),
                            None => (
                                format!(
                                    "{} | {} ops/s",
                                    format_duration_ms(result.duration_ms),
                                    format_number(result.ops_per_second)
                                ),
                                Style::default().fg(Color::Green),
                            ),
                        },
                    };
                    Row::new(vec![row.name.clone(), status]).style(style)
                })
                .collect()
        };

        let table = Table::new(rows, [Constraint::Length(24), Constraint::Min(20)])
            .block(
                Block::default()
                    .title("Workloads")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .column_spacing(2);

        f.render_widget(table, area);
    }

    fn render_status(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let (text, style) = if let Some(error) = &self.error_message {
            (
                vec![
                    Line::from(Span::styled(
                        "Error occurred:",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
                ],
                Style::default().fg(Color::Red),
            )
        } else if self.is_completed() {
            (
                vec![
                    Line::from(Span::styled(
                        "Benchmark completed!",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from("Press Enter to view results."),
                ],
                Style::default().fg(Color::Green),
            )
        } else {
            (
                vec![
                    Line::from("Benchmark is running..."),
                    Line::from("Workloads cannot be interrupted once started."),
                ],
                Style::default().fg(Color::White),
            )
        };

        let status = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .title("Status")
                .borders(Borders::ALL)
                .border_style(style),
        );

        f.render_widget(status, area);
    }

    fn render_help(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let key = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let help_text = if self.is_completed() {
            vec![Line::from(vec![
                Span::styled("Enter", key),
                Span::raw(" View Results  "),
                Span::styled("Esc", key),
                Span::raw(" Back to Menu"),
            ])]
        } else if self.has_error() {
            vec![Line::from(vec![
                Span::styled("Esc", key),
                Span::raw(" Back to Menu  "),
                Span::styled("Q", key),
                Span::raw(" Quit"),
            ])]
        } else {
            vec![Line::from(vec![Span::styled("Q", key), Span::raw(" Quit")])]
        };

        let help = Paragraph::new(help_text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );

        f.render_widget(help, area);
    }
}
