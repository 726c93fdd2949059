use clap::{Parser, Subcommand};
use cpurb::app::App;
use cpurb::config::{BenchmarkConfig, ExecutionMode};
use cpurb::models::SystemInfo;
use cpurb::{report, server, simple, Result};
use std::path::PathBuf;

/// CPU Rust Bench - compare local CPU throughput against a server run
#[derive(Parser)]
#[command(name = "cpurb", version, about)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the workloads on this machine
    Local {
        /// Use the large workload sizes
        #[arg(long)]
        full: bool,
    },
    /// Fetch a fresh run from the benchmark server
    Remote {
        /// Benchmark endpoint URL
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
    /// Run locally, then fetch the server run and show both
    Compare {
        /// Use the large workload sizes for the local run
        #[arg(long)]
        full: bool,
        /// Benchmark endpoint URL
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
    /// Serve the benchmark endpoint over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Interactive terminal interface (default)
    Tui,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    // Keep the alternate screen free of log lines
    let default_level = match command {
        Commands::Tui => "warn",
        _ => "info",
    };
    setup_logging(cli.log_level.as_deref().unwrap_or(default_level));

    let config = match &cli.config {
        Some(path) => BenchmarkConfig::load_from(path)?,
        None => BenchmarkConfig::load()?,
    };

    match command {
        Commands::Local { full } => {
            let mode = mode_for(full, &config);
            let config = config.with_mode(mode);
            let (results, info) = simple::run_local(&config).await?;
            let title = format!("Local ({})", config.mode.description());
            print!("{}", report::render_panel(&title, &results, &info));
        }
        Commands::Remote { url } => {
            let url = url.unwrap_or(config.remote_url);
            match simple::fetch_remote(&url).await {
                Ok(remote) => print!(
                    "{}",
                    report::render_panel("Server", &remote.results, &remote.system_info)
                ),
                Err(e) => {
                    tracing::error!(error = %e, "Remote benchmark failed");
                    eprint!("{}", report::render_error("Server", &e));
                    std::process::exit(1);
                }
            }
        }
        Commands::Compare { full, url } => {
            let mode = mode_for(full, &config);
            let config = config.with_mode(mode);
            let url = url.unwrap_or_else(|| config.remote_url.clone());
            let (local, local_info) = simple::run_local(&config).await?;
            let remote = simple::fetch_remote(&url).await;
            if let Err(e) = &remote {
                tracing::error!(error = %e, "Remote benchmark failed");
            }
            print!(
                "{}",
                report::render_comparison(&local, &local_info, remote.as_ref())
            );
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let config = config.with_server_address(host, port);
            config.validate()?;
            server::serve(&config).await?;
        }
        Commands::Tui => {
            tracing::debug!(system = ?SystemInfo::detect_local(), "Starting TUI");
            let mut app = App::new(config)?;
            app.init()?;
            let outcome = app.run().await;
            app.shutdown()?;
            outcome?;
        }
    }

    Ok(())
}

fn mode_for(full: bool, config: &BenchmarkConfig) -> ExecutionMode {
    if full {
        ExecutionMode::Full
    } else {
        config.mode
    }
}

fn setup_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
