//! hostwatch - periodic host health monitor
//!
//! Main entry point: loads the configuration, installs logging and runs the
//! scheduler.

mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hostwatch_config::{Config, ConfigLoader, ConfigValidator};
use hostwatch_daemon::{Scheduler, SignalHandler};
use hostwatch_monitor::{Collaborators, Dispatcher, HealthCycle};

use cli::{Cli, Commands};

/// Install the console and daily-rotated file subscribers.
///
/// The returned guard flushes the file writer on drop and must live as long
/// as the process logs.
fn init_tracing(log_dir: &Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    // Files are named hostwatch.<date>.log; old ones are removed by the
    // retention sweep, not by the appender.
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("hostwatch")
        .filename_suffix("log")
        .build(log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    Ok(guard)
}

/// Print the validation report; fail when it has errors.
fn validate(path: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let report = ConfigValidator::validate(config)?;

    for warning in &report.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        eprintln!("error: {}: {}", error.path, error.message);
    }

    report.into_result()?;
    println!("Configuration {} is valid", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let config = ConfigLoader::load(&cli.config)?;

    if command == Commands::Validate {
        return validate(&cli.config, &config);
    }

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    let _guard = init_tracing(&config.log_directory)?;

    info!("Loaded configuration from {}", cli.config.display());
    for warning in &warnings {
        warn!("Configuration warning at {}: {}", warning.path, warning.message);
    }

    let config = Arc::new(config);
    let dispatcher = Arc::new(Dispatcher::from_config(&config));
    info!("Notification channels: {}", dispatcher.channel_names().join(", "));

    let cycle = HealthCycle::new(config.clone(), Collaborators::live(), dispatcher.clone());
    let signals = SignalHandler::new();
    let scheduler = Scheduler::new(cycle, dispatcher, config.check_interval(), signals.clone());

    match command {
        Commands::Check => scheduler.run_once().await,
        Commands::Run | Commands::Validate => {
            signals.setup_os_signals().await?;
            scheduler.run().await?;
        }
    }

    Ok(())
}
