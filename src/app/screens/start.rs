//! Start screen implementation
//!
//! Main menu with the local runs, the server run, the results view and exit.
//! Includes navigation highlighting and responsive layout.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::config::ExecutionMode;

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    RunLocal(ExecutionMode),
    RunRemote,
    ViewResults,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::RunLocal(ExecutionMode::Lite),
        MenuAction::RunLocal(ExecutionMode::Full),
        MenuAction::RunRemote,
        MenuAction::ViewResults,
        MenuAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::RunLocal(ExecutionMode::Lite) => "Run Local Benchmark (Lite)",
            MenuAction::RunLocal(ExecutionMode::Full) => "Run Local Benchmark (Full)",
            MenuAction::RunRemote => "Run Server Benchmark",
            MenuAction::ViewResults => "View Results",
            MenuAction::Quit => "Quit",
        }
    }
}

/// Start screen component with the main menu
#[derive(Debug)]
pub struct StartScreen {
    selected_index: usize,
    list_state: ListState,
    remote_url: String,
    has_results: bool,
}

impl StartScreen {
    /// Create a new start screen
    pub fn new(remote_url: impl Into<String>) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            selected_index: 0,
            list_state,
            remote_url: remote_url.into(),
            has_results: false,
        }
    }

    /// Get the currently selected menu entry
    pub fn selected_action(&self) -> MenuAction {
        MenuAction::ALL[self.selected_index]
    }

    /// Record whether any run has produced results yet
    pub fn set_has_results(&mut self, has_results: bool) {
        self.has_results = has_results;
    }

    /// Move selection up
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        } else {
            self.selected_index = MenuAction::ALL.len() - 1;
        }
        self.list_state.select(Some(self.selected_index));
    }

    /// Move selection down
    pub fn select_next(&mut self) {
        if self.selected_index < MenuAction::ALL.len() - 1 {
            self.selected_index += 1;
        } else {
            self.selected_index = 0;
        }
        self.list_state.select(Some(self.selected_index));
    }

    /// Render the start screen
    pub fn render(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Title and subtitle
                Constraint::Min(9),    // Menu
                Constraint::Length(3), // Server URL
                Constraint::Length(3), // Help text
            ])
            .split(size);

        self.render_title(f, chunks[0]);
        self.render_menu(f, chunks[1]);

        let server = Paragraph::new(format!("Server: {}", self.remote_url))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(server, chunks[2]);

        self.render_help(f, chunks[3]);
    }

    fn render_title(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let title_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(2)])
            .split(area);

        let title = Paragraph::new("CPURB")
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
        f.render_widget(title, title_chunks[0]);

        let subtitle = Paragraph::new("CPU Rust Bench - local vs. server")
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center);
        f.render_widget(subtitle, title_chunks[1]);
    }

    fn render_menu(&mut self, f: &mut Frame, area: ratatui::layout::Rect) {
        let items: Vec<ListItem> = MenuAction::ALL
            .iter()
            .map(|action| {
                let style = if *action == MenuAction::ViewResults && !self.has_results {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                ListItem::new(action.label()).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Main Menu"))
            .highlight_style(Style::default().bg(Color::Cyan).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_help(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let key = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let help_text = vec![Line::from(vec![
            Span::styled("↑↓", key),
            Span::raw(" Navigate  "),
            Span::styled("Enter", key),
            Span::raw(" Select  "),
            Span::styled("Q", key),
            Span::raw(" Quit"),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_screen_creation() {
        let screen = StartScreen::new("http://localhost:8080/api/benchmark");
        assert_eq!(screen.selected_index, 0);
        assert_eq!(
            screen.selected_action(),
            MenuAction::RunLocal(ExecutionMode::Lite)
        );
        assert!(!screen.has_results);
    }

    #[test]
    fn test_menu_navigation() {
        let mut screen = StartScreen::new("");

        screen.select_next();
        assert_eq!(
            screen.selected_action(),
            MenuAction::RunLocal(ExecutionMode::Full)
        );
        screen.select_next();
        assert_eq!(screen.selected_action(), MenuAction::RunRemote);
        screen.select_next();
        screen.select_next();
        assert_eq!(screen.selected_action(), MenuAction::Quit);

        // Wraps to the beginning
        screen.select_next();
        assert_eq!(screen.selected_index, 0);
    }

    #[test]
    fn test_menu_navigation_up() {
        let mut screen = StartScreen::new("");

        // Moving up from the first item wraps to the last
        screen.select_previous();
        assert_eq!(screen.selected_action(), MenuAction::Quit);

        screen.select_previous();
        assert_eq!(screen.selected_action(), MenuAction::ViewResults);
    }

    #[test]
    fn test_labels_are_distinct() {
        let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();
        for (i, label) in labels.iter().enumerate() {
            assert!(!labels[..i].contains(label));
        }
    }
}
