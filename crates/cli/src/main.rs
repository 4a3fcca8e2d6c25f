//! # Ferrous Filters
//!
//! Keeps subscribed filter lists cached on disk, refreshes them in the
//! background and feeds them to the filtering engine.

mod bootstrap;
mod di;

use clap::{Parser, Subcommand};
use ferrous_filters_domain::{CliOverrides, Config};
use ferrous_filters_jobs::{FilterRefreshJob, JobRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::di::{FilterServices, UseCases};

#[derive(Parser)]
#[command(name = "ferrous-filters")]
#[command(version)]
#[command(about = "Filter list subscription manager")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long, default_value = "ferrous-filters.toml")]
    config: PathBuf,

    /// Working directory holding the data directory
    #[arg(short = 'w', long, default_value = ".")]
    work_dir: PathBuf,

    /// Log level (overrides config file)
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// Seconds between refresh checks (overrides config file)
    #[arg(long)]
    refresh_tick_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve filters and refresh them in the background (default)
    ///
    /// The filter list is read once at startup. Admin commands run while
    /// the daemon is up take effect on its next start.
    Run {
        /// Refetch every enabled filter on the first cycle
        #[arg(long)]
        force_refresh: bool,
    },
    /// Run a single refresh cycle and print the filter list
    Refresh {
        /// Ignore staleness and refetch every enabled filter
        #[arg(long)]
        force: bool,
    },
    /// Print the filter list as JSON
    List,
    /// Subscribe to a filter list
    Add {
        url: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        disabled: bool,
    },
    /// Unsubscribe from a filter list and delete its cached file
    Remove { url: String },
    Enable { url: String },
    Disable { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        log_level: cli.log_level.clone(),
        refresh_tick_secs: cli.refresh_tick_secs,
    };
    let config = bootstrap::load_config(&cli.config, overrides)?;
    bootstrap::init_logging(&config);

    info!(
        config_file = %cli.config.display(),
        filters = config.filtering.filters.len(),
        "Configuration loaded"
    );

    let services = FilterServices::new(&config, &cli.work_dir).await?;
    let use_cases = UseCases::new(&services, &config);

    match cli.command.unwrap_or(Command::Run {
        force_refresh: false,
    }) {
        Command::Run { force_refresh } => {
            run(&config, &cli.config, &services, &use_cases, force_refresh).await?;
        }
        Command::Refresh { force } => {
            let updated = use_cases.refresh_filters.execute(force).await?;
            info!(updated, "Refresh finished");
            print_filters(&use_cases).await?;
            bootstrap::save_config(&cli.config, &services.registry).await?;
        }
        Command::List => {
            print_filters(&use_cases).await?;
        }
        Command::Add {
            url,
            name,
            disabled,
        } => {
            use_cases.add_filter.execute(url, name, !disabled).await?;
            bootstrap::save_config(&cli.config, &services.registry).await?;
        }
        Command::Remove { url } => {
            use_cases.remove_filter.execute(&url).await?;
            bootstrap::save_config(&cli.config, &services.registry).await?;
        }
        Command::Enable { url } => {
            use_cases.set_filter_enabled.execute(&url, true).await?;
            bootstrap::save_config(&cli.config, &services.registry).await?;
        }
        Command::Disable { url } => {
            use_cases.set_filter_enabled.execute(&url, false).await?;
            bootstrap::save_config(&cli.config, &services.registry).await?;
        }
    }

    Ok(())
}

async fn run(
    config: &Config,
    config_path: &Path,
    services: &FilterServices,
    use_cases: &UseCases,
    force_refresh: bool,
) -> anyhow::Result<()> {
    // Persist ids assigned during load before anything else edits the file.
    bootstrap::save_config(config_path, &services.registry).await?;

    let shutdown = CancellationToken::new();

    let refresh_job = Arc::new(
        FilterRefreshJob::new(use_cases.refresh_filters.clone())
            .with_interval(config.filtering.refresh_tick())
            .with_cancellation(shutdown.clone()),
    );
    if force_refresh {
        refresh_job.request_force_refresh();
    }

    let mut jobs = JobRunner::new()
        .with_filter_refresh(refresh_job)
        .start()
        .await;

    info!("Ferrous Filters ready, press Ctrl+C to stop");

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
        }
        Some(joined) = jobs.join_next() => {
            match joined {
                Ok(Err(e)) => error!(error = %e, "Background job failed, halting"),
                Ok(Ok(())) => error!("Background job stopped unexpectedly, halting"),
                Err(e) => error!(error = %e, "Background job panicked, halting"),
            }
            std::process::exit(1);
        }
    }

    info!("Shutting down");
    shutdown.cancel();
    while jobs.join_next().await.is_some() {}
    services.engine.stop();

    bootstrap::save_filter_names(config_path, &services.registry).await
}

async fn print_filters(use_cases: &UseCases) -> anyhow::Result<()> {
    let filters = use_cases.list_filters.execute().await;
    println!("{}", serde_json::to_string_pretty(&filters)?);
    Ok(())
}
