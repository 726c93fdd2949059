//! Non-interactive run helpers used by the command line subcommands

use indicatif::{ProgressBar, ProgressStyle};

use crate::bench::{ChannelHook, ProgressUpdate, Registry, Runner, StepStatus};
use crate::config::BenchmarkConfig;
use crate::models::{RemoteReport, ResultSet, SystemInfo};
use crate::remote::RemoteClient;
use crate::{CpurbError, Result};

/// Run the local benchmark on a blocking thread and stream progress to a bar.
pub async fn run_local(config: &BenchmarkConfig) -> Result<(ResultSet, SystemInfo)> {
    let registry = Registry::standard();
    let total = registry.len();
    let sizes = config.local_sizes();
    let pause = config.step_pause;

    let (tx, mut rx) = tokio::sync::mpsc::channel::<ProgressUpdate>(32);
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .map_err(|e| CpurbError::TuiError(e.to_string()))?
            .progress_chars("=> "),
    );

    let bar = pb.clone();
    let handle = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            match update.status {
                StepStatus::Started => bar.set_message(format!("Running {}...", update.name)),
                StepStatus::Finished(_) => bar.inc(1),
            }
        }
    });

    tracing::info!(mode = config.mode.description(), "Starting local run");
    let outcome = tokio::task::spawn_blocking(move || {
        let runner = Runner::new(&registry, sizes);
        let mut hook = ChannelHook::new(tx, total).with_pause(pause);
        runner.run_local_with(&mut hook)
    })
    .await
    .map_err(|e| CpurbError::WorkloadFailed(e.to_string()))?;

    handle.await.ok();
    match outcome {
        Ok(results) => {
            pb.finish_with_message("done");
            Ok((results, SystemInfo::detect_local()))
        }
        Err(e) => {
            pb.abandon_with_message("failed");
            Err(e)
        }
    }
}

/// Fetch a server run behind a spinner
pub async fn fetch_remote(url: &str) -> Result<RemoteReport> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Waiting for server results...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let outcome = RemoteClient::new()?.fetch(url).await;
    spinner.finish_and_clear();
    outcome
}
