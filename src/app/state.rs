//! Screen state and key mapping for the TUI

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Main menu with the run options
    #[default]
    Start,
    /// Workloads running with per-step progress
    Running,
    /// Local and server result panels
    Results,
    /// Leaving the application
    Exit,
}

/// Key press translated into a screen-independent action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
    Quit,
}

/// Tracks the current screen and whether the loop should stop
#[derive(Debug, Default)]
pub struct StateManager {
    current_state: AppState,
    should_quit: bool,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_state(&self) -> AppState {
        self.current_state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Switch screens. Moving to [`AppState::Exit`] also stops the loop.
    pub fn transition_to(&mut self, new_state: AppState) {
        self.current_state = new_state;
        if new_state == AppState::Exit {
            self.should_quit = true;
        }
    }

    /// Map a key press to an action, `None` for keys the TUI ignores
    pub fn key_to_navigation(key: KeyEvent) -> Option<NavigationAction> {
        let action = match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => NavigationAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                NavigationAction::Quit
            }
            KeyCode::Up | KeyCode::Char('k') => NavigationAction::Up,
            KeyCode::Down | KeyCode::Char('j') => NavigationAction::Down,
            KeyCode::Left | KeyCode::Char('h') => NavigationAction::Left,
            KeyCode::Right | KeyCode::Char('l') => NavigationAction::Right,
            KeyCode::Enter | KeyCode::Char(' ') => NavigationAction::Select,
            KeyCode::Esc | KeyCode::Backspace => NavigationAction::Back,
            _ => return None,
        };
        Some(action)
    }
}
