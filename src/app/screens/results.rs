//! Results screen implementation
//!
//! Shows the local and server result sets side by side, each with its
//! performance score, system information and inline per-workload errors.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::models::{ResultSet, SystemInfo};
use crate::util::units::{format_duration_ms, format_number, humanize_key};

/// Content of one result panel
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PanelContent {
    /// Nothing has been run on this side yet
    #[default]
    Empty,
    Results {
        label: String,
        results: ResultSet,
        system_info: SystemInfo,
    },
    /// Page-level failure replacing the whole panel
    Error(String),
}

impl PanelContent {
    pub fn score(&self) -> Option<i64> {
        match self {
            PanelContent::Results { results, .. } => Some(results.performance_score()),
            _ => None,
        }
    }
}

/// Available actions on the results screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    RerunLocal,
    RunRemote,
    Back,
}

impl ResultAction {
    /// Get all available actions
    pub fn all() -> [Self; 3] {
        [Self::RerunLocal, Self::RunRemote, Self::Back]
    }

    /// Get display text for the action
    pub fn display_text(&self) -> &'static str {
        match self {
            Self::RerunLocal => "Run Local Again",
            Self::RunRemote => "Run Server",
            Self::Back => "Back to Menu",
        }
    }
}

/// Results screen component
#[derive(Debug)]
pub struct ResultsScreen {
    local: PanelContent,
    remote: PanelContent,
    selected_action: ResultAction,
}

impl ResultsScreen {
    /// Create a new results screen
    pub fn new() -> Self {
        Self {
            local: PanelContent::Empty,
            remote: PanelContent::Empty,
            selected_action: ResultAction::RunRemote,
        }
    }

    pub fn set_local(&mut self, label: impl Into<String>, results: ResultSet, system_info: SystemInfo) {
        self.local = PanelContent::Results {
            label: label.into(),
            results,
            system_info,
        };
    }

    pub fn set_local_error(&mut self, message: impl Into<String>) {
        self.local = PanelContent::Error(message.into());
    }

    pub fn set_remote(&mut self, results: ResultSet, system_info: SystemInfo) {
        self.remote = PanelContent::Results {
            label: "Server".to_string(),
            results,
            system_info,
        };
    }

    pub fn set_remote_error(&mut self, message: impl Into<String>) {
        self.remote = PanelContent::Error(message.into());
    }

    pub fn local(&self) -> &PanelContent {
        &self.local
    }

    pub fn remote(&self) -> &PanelContent {
        &self.remote
    }

    /// Whether anything has been recorded on either side
    pub fn has_content(&self) -> bool {
        self.local != PanelContent::Empty || self.remote != PanelContent::Empty
    }

    /// Get selected action
    pub fn selected_action(&self) -> ResultAction {
        self.selected_action
    }

    /// Select next action
    pub fn select_next_action(&mut self) {
        let actions = ResultAction::all();
        let current = actions
            .iter()
            .position(|a| *a == self.selected_action)
            .unwrap_or(0);
        self.selected_action = actions[(current + 1) % actions.len()];
    }

    /// Select previous action
    pub fn select_previous_action(&mut self) {
        let actions = ResultAction::all();
        let current = actions
            .iter()
            .position(|a| *a == self.selected_action)
            .unwrap_or(0);
        let prev = if current == 0 { actions.len() - 1 } else { current - 1 };
        self.selected_action = actions[prev];
    }

    /// Render the results screen
    pub fn render(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(14),   // Panels
                Constraint::Length(3), // Actions
                Constraint::Length(3), // Help text
            ])
            .split(size);

        self.render_title(f, chunks[0]);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        render_panel(f, panels[0], "Local", &self.local);
        render_panel(f, panels[1], "Server", &self.remote);

        self.render_actions(f, chunks[2]);
        self.render_help(f, chunks[3]);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let mut text = String::from("Benchmark Results");
        if let (Some(local), Some(remote)) = (self.local.score(), self.remote.score()) {
            text = format!(
                "{} | Local {} vs Server {}",
                text,
                format_number(local as f64),
                format_number(remote as f64)
            );
        }

        let title = Paragraph::new(text)
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );

        f.render_widget(title, area);
    }

    fn render_actions(&self, f: &mut Frame, area: Rect) {
        let actions_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(60),
                Constraint::Min(0),
            ])
            .split(area)[1];

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(actions_area);

        for (action, slot) in ResultAction::all().iter().zip(buttons.iter()) {
            let selected = *action == self.selected_action;
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let button = Paragraph::new(action.display_text())
                .style(style)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(if selected {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::White)
                }));
            f.render_widget(button, *slot);
        }
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let key = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let help_text = vec![Line::from(vec![
            Span::styled("←→", key),
            Span::raw(" Navigate  "),
            Span::styled("Enter", key),
            Span::raw(" Select  "),
            Span::styled("Esc", key),
            Span::raw(" Back"),
        ])];

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

fn render_panel(f: &mut Frame, area: Rect, side: &str, content: &PanelContent) {
    match content {
        PanelContent::Empty => {
            let text = vec![
                Line::from(""),
                Line::from("No results yet"),
                Line::from(""),
                Line::from(Span::styled(
                    "Run a benchmark to see results here.",
                    Style::default().fg(Color::Yellow),
                )),
            ];
            let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .title(side.to_string())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            f.render_widget(paragraph, area);
        }
        PanelContent::Error(message) => {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Error",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red))),
            ];
            let paragraph = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .title(side.to_string())
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                );
            f.render_widget(paragraph, area);
        }
        PanelContent::Results {
            label,
            results,
            system_info,
        } => {
            let rows = panel_rows(results, system_info);
            let table = Table::new(rows, [Constraint::Length(22), Constraint::Min(20)])
                .block(
                    Block::default()
                        .title(label.clone())
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Cyan)),
                )
                .column_spacing(1);
            f.render_widget(table, area);
        }
    }
}

fn panel_rows<'a>(results: &'a ResultSet, system_info: &'a SystemInfo) -> Vec<Row<'a>> {
    let heading = |text: &'a str, color: Color| {
        Row::new(vec![text.to_string(), String::new()])
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let mut rows = Vec::new();
    for (name, result) in results.iter() {
        rows.push(Row::new(vec![name.to_string(), result.description.clone()]).style(
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        match &result.error {
            Some(error) => rows.push(
                Row::new(vec!["  Error:".to_string(), error.clone()])
                    .style(Style::default().fg(Color::Red)),
            ),
            None => {
                rows.push(Row::new(vec![
                    "  Time:".to_string(),
                    format_duration_ms(result.duration_ms),
                ]));
                rows.push(Row::new(vec![
                    "  Ops/sec:".to_string(),
                    format_number(result.ops_per_second),
                ]));
                rows.push(Row::new(vec![
                    "  Result:".to_string(),
                    result.primary_output.to_string(),
                ]));
            }
        }
    }

    rows.push(Row::new(vec![String::new(), String::new()]));
    rows.push(
        Row::new(vec![
            "Performance Score".to_string(),
            format_number(results.performance_score() as f64),
        ])
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
    );

    rows.push(Row::new(vec![String::new(), String::new()]));
    rows.push(heading("System Info", Color::Magenta));
    for (key, value) in system_info.iter() {
        rows.push(Row::new(vec![
            format!("  {}:", humanize_key(key)),
            value.to_string(),
        ]));
    }
    rows
}

impl Default for ResultsScreen {
    fn default() -> Self {
        Self::new()
    }
}
