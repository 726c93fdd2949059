//! Main application controller
//!
//! Manages the TUI, application state, background runs and the screen
//! rendering loop.

use crate::{
    app::{
        screens::{MenuAction, ResultAction, ResultsScreen, RunningScreen, StartScreen},
        state::{AppState, NavigationAction, StateManager},
        tui::Tui,
    },
    bench::{ChannelHook, ProgressUpdate, Registry, Runner},
    config::{BenchmarkConfig, ExecutionMode},
    error::user_friendly_message,
    models::{RemoteReport, ResultSet, SystemInfo},
    remote::RemoteClient,
    CpurbError, Result,
};
use std::io;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Run currently executing in the background
enum PendingRun {
    Local {
        mode: ExecutionMode,
        handle: JoinHandle<Result<ResultSet>>,
        progress_rx: mpsc::Receiver<ProgressUpdate>,
    },
    Remote {
        handle: JoinHandle<Result<RemoteReport>>,
    },
}

/// TUI application controller
pub struct App {
    /// Terminal UI handler
    tui: Tui,
    /// Application state manager
    state_manager: StateManager,
    /// Application config
    config: BenchmarkConfig,
    registry: Registry,
    /// Screen components
    start_screen: StartScreen,
    running_screen: RunningScreen,
    results_screen: ResultsScreen,
    pending: Option<PendingRun>,
    last_mode: ExecutionMode,
}

impl App {
    /// Create a new application instance
    pub fn new(config: BenchmarkConfig) -> Result<Self> {
        Ok(Self {
            tui: Tui::new()?,
            state_manager: StateManager::new(),
            start_screen: StartScreen::new(config.remote_url.clone()),
            last_mode: config.mode,
            config,
            registry: Registry::standard(),
            running_screen: RunningScreen::new(),
            results_screen: ResultsScreen::new(),
            pending: None,
        })
    }

    /// Initialize the application and TUI
    pub fn init(&mut self) -> Result<()> {
        self.tui.init()?;
        Ok(())
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        while !self.state_manager.should_quit() {
            self.poll_pending().await;
            self.draw()?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Restore the terminal
    pub fn shutdown(&mut self) -> Result<()> {
        self.tui.restore()?;
        Ok(())
    }

    /// Draw the current screen
    fn draw(&mut self) -> io::Result<()> {
        self.tui.draw(|f| match self.state_manager.current_state() {
            AppState::Start => self.start_screen.render(f),
            AppState::Running => self.running_screen.render(f),
            AppState::Results => self.results_screen.render(f),
            AppState::Exit => {}
        })
    }

    /// Drain progress updates and collect finished runs
    async fn poll_pending(&mut self) {
        let finished = match &mut self.pending {
            None => false,
            Some(PendingRun::Local {
                handle,
                progress_rx,
                ..
            }) => {
                while let Ok(update) = progress_rx.try_recv() {
                    self.running_screen.update_progress(update);
                }
                handle.is_finished()
            }
            Some(PendingRun::Remote { handle }) => handle.is_finished(),
        };
        if !finished {
            return;
        }

        match self.pending.take() {
            Some(PendingRun::Local {
                mode,
                handle,
                mut progress_rx,
            }) => {
                while let Ok(update) = progress_rx.try_recv() {
                    self.running_screen.update_progress(update);
                }
                match flatten(handle.await) {
                    Ok(results) => {
                        tracing::info!(score = results.performance_score(), "Local run finished");
                        self.results_screen.set_local(
                            format!("Local ({})", mode.description()),
                            results,
                            SystemInfo::detect_local(),
                        );
                        self.running_screen.mark_completed();
                    }
                    Err(e) => {
                        let message = user_friendly_message(&e);
                        self.results_screen.set_local_error(message.clone());
                        self.running_screen.set_error(message);
                    }
                }
            }
            Some(PendingRun::Remote { handle }) => match flatten(handle.await) {
                Ok(report) => {
                    self.results_screen
                        .set_remote(report.results, report.system_info);
                    self.running_screen.mark_completed();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Remote run failed");
                    let message = user_friendly_message(&e);
                    self.results_screen.set_remote_error(message.clone());
                    self.running_screen.set_error(message);
                }
            },
            None => {}
        }
        self.start_screen
            .set_has_results(self.results_screen.has_content());
    }

    fn start_local(&mut self, mode: ExecutionMode) {
        let registry = self.registry.clone();
        let total = registry.len();
        let sizes = mode.sizes();
        let pause = self.config.step_pause;
        let (tx, progress_rx) = mpsc::channel(64);

        self.running_screen.start_local(mode, &registry.names());
        let handle = tokio::task::spawn_blocking(move || {
            let runner = Runner::new(&registry, sizes);
            let mut hook = ChannelHook::new(tx, total).with_pause(pause);
            runner.run_local_with(&mut hook)
        });

        self.last_mode = mode;
        self.pending = Some(PendingRun::Local {
            mode,
            handle,
            progress_rx,
        });
        self.state_manager.transition_to(AppState::Running);
    }

    fn start_remote(&mut self) {
        let url = self.config.remote_url.clone();
        self.running_screen.start_remote();
        let handle = tokio::spawn(async move { RemoteClient::new()?.fetch(&url).await });
        self.pending = Some(PendingRun::Remote { handle });
        self.state_manager.transition_to(AppState::Running);
    }

    /// Handle keyboard events and update state
    fn handle_events(&mut self) -> Result<()> {
        let Some(key) = self.tui.handle_events()? else {
            return Ok(());
        };
        if let Some(nav_action) = StateManager::key_to_navigation(key) {
            // Global key handling
            if nav_action == NavigationAction::Quit {
                self.state_manager.quit();
                return Ok(());
            }

            // Screen-specific key handling
            match self.state_manager.current_state() {
                AppState::Start => self.handle_start_screen_events(nav_action),
                AppState::Running => self.handle_running_screen_events(nav_action),
                AppState::Results => self.handle_results_screen_events(nav_action),
                AppState::Exit => self.state_manager.quit(),
            }
        }
        Ok(())
    }

    fn handle_start_screen_events(&mut self, action: NavigationAction) {
        match action {
            NavigationAction::Up => self.start_screen.select_previous(),
            NavigationAction::Down => self.start_screen.select_next(),
            NavigationAction::Select => match self.start_screen.selected_action() {
                MenuAction::RunLocal(mode) => self.start_local(mode),
                MenuAction::RunRemote => self.start_remote(),
                MenuAction::ViewResults => self.state_manager.transition_to(AppState::Results),
                MenuAction::Quit => self.state_manager.transition_to(AppState::Exit),
            },
            NavigationAction::Back => self.state_manager.quit(),
            _ => {}
        }
    }

    fn handle_running_screen_events(&mut self, action: NavigationAction) {
        // Workloads cannot be interrupted; keys only act once the run is over
        if self.pending.is_some() {
            return;
        }
        match action {
            NavigationAction::Select if self.running_screen.is_completed() => {
                self.state_manager.transition_to(AppState::Results);
            }
            NavigationAction::Select | NavigationAction::Back => {
                self.state_manager.transition_to(AppState::Start);
            }
            _ => {}
        }
    }

    fn handle_results_screen_events(&mut self, action: NavigationAction) {
        match action {
            NavigationAction::Left => self.results_screen.select_previous_action(),
            NavigationAction::Right => self.results_screen.select_next_action(),
            NavigationAction::Select => match self.results_screen.selected_action() {
                ResultAction::RerunLocal => self.start_local(self.last_mode),
                ResultAction::RunRemote => self.start_remote(),
                ResultAction::Back => self.state_manager.transition_to(AppState::Start),
            },
            NavigationAction::Back => self.state_manager.transition_to(AppState::Start),
            _ => {}
        }
    }
}

fn flatten<T>(joined: std::result::Result<Result<T>, tokio::task::JoinError>) -> Result<T> {
    match joined {
        Ok(outcome) => outcome,
        Err(e) => Err(CpurbError::WorkloadFailed(format!(
            "Benchmark task did not complete: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flatten_join_error() {
        let handle = tokio::spawn(async {
            if true {
                panic!("lost");
            }
            Ok::<(), CpurbError>(())
        });
        let joined: std::result::Result<Result<()>, _> = handle.await;
        assert!(matches!(flatten(joined), Err(CpurbError::WorkloadFailed(_))));
    }

    #[test]
    fn test_flatten_passes_inner_result() {
        let ok: std::result::Result<Result<u32>, tokio::task::JoinError> = Ok(Ok(7));
        assert_eq!(flatten(ok).unwrap(), 7);

        let err: std::result::Result<Result<u32>, tokio::task::JoinError> =
            Ok(Err(CpurbError::RemoteError("down".to_string())));
        assert!(matches!(flatten(err), Err(CpurbError::RemoteError(_))));
    }
}
