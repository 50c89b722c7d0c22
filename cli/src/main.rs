//! API Governor CLI - terminal host for the analysis engine.
//!
//! ```text
//! main() -> GovernorConfig::load() -> AnalyzerGateway + TerminalHost
//!              |
//!              v
//!     AnalysisOrchestrator ---> lint | diff | report
//!              |
//!              v
//!        EventTriggers -------> watch (open sweep, save polling, Ctrl-C)
//! ```

mod cli;
mod commands;
mod terminal;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use governor_analyzer::AnalyzerGateway;
use governor_config::GovernorConfig;
use governor_engine::{AnalysisOrchestrator, AnalysisSettings, EventTriggers};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{Cli, Command};
use crate::terminal::TerminalHost;

const LOG_FILE_NAME: &str = "api-governor.log";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let mut warnings = Vec::new();

    match open_log_file(log_dirs(), &mut warnings) {
        Some((path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = %path.display(), "Logging initialized");
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(env_filter)
                .init();
        }
    }

    for warning in warnings {
        tracing::warn!("{warning}");
    }
}

/// `logs/` beside the config file, then under `./.api-governor`.
fn log_dirs() -> impl Iterator<Item = PathBuf> {
    governor_config::config_path()
        .and_then(|config| config.parent().map(Path::to_path_buf))
        .into_iter()
        .chain(std::iter::once(PathBuf::from(".api-governor")))
        .map(|dir| dir.join("logs"))
}

/// First log file that can be opened for append. Failures are collected for
/// replay once logging is up.
fn open_log_file(
    dirs: impl IntoIterator<Item = PathBuf>,
    warnings: &mut Vec<String>,
) -> Option<(PathBuf, fs::File)> {
    dirs.into_iter().find_map(|dir| {
        if let Err(e) = fs::create_dir_all(&dir) {
            warnings.push(format!("Failed to create log dir {}: {e}", dir.display()));
            return None;
        }
        let path = dir.join(LOG_FILE_NAME);
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some((path, file)),
            Err(e) => {
                warnings.push(format!("Failed to open log file {}: {e}", path.display()));
                None
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let config =
        GovernorConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(
        python = %config.python_path,
        module = %config.module,
        policy = %config.policy,
        auto_lint = config.auto_lint,
        "Configuration resolved"
    );

    let gateway = AnalyzerGateway::new(config.analyzer_command());
    let settings = AnalysisSettings::from_config(&config);

    match cli.command {
        Command::Lint { files, json } => {
            let host = Arc::new(TerminalHost::stdio(None, false));
            let orchestrator = AnalysisOrchestrator::new(gateway, host, settings);
            commands::lint(&orchestrator, &files, json).await
        }
        Command::Diff { file, baseline } => {
            let host = Arc::new(TerminalHost::stdio(None, false));
            let orchestrator = AnalysisOrchestrator::new(gateway, host, settings);
            commands::diff(&orchestrator, &file, baseline).await
        }
        Command::Report {
            file,
            open,
            workspace,
        } => {
            let host = Arc::new(TerminalHost::stdio(workspace, open));
            let orchestrator = AnalysisOrchestrator::new(gateway, host, settings);
            commands::report(&orchestrator, &file).await
        }
        Command::Watch { files } => {
            let host = Arc::new(TerminalHost::stdio(None, false));
            let orchestrator = AnalysisOrchestrator::new(gateway, host, settings);
            let triggers = EventTriggers::new(orchestrator, config.auto_lint);
            commands::watch(triggers, &files, config.auto_lint).await
        }
    }
}
