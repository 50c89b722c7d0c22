//! Subcommand handlers.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use governor_analyzer::Analyzer;
use governor_engine::{
    AnalysisOrchestrator, AnalysisOutcome, ArtifactState, EventTriggers, TriggerSource,
};
use governor_types::{Diagnostic, DiagnosticsSnapshot, Document};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::terminal::{TerminalHost, load_document};

/// How often `watch` checks modification times.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Serialize)]
struct DocumentDiagnostics<'a> {
    path: &'a Path,
    diagnostics: &'a [Diagnostic],
}

pub async fn lint<A: Analyzer>(
    orchestrator: &AnalysisOrchestrator<A, TerminalHost>,
    files: &[PathBuf],
    json: bool,
) -> Result<ExitCode> {
    let documents = files
        .iter()
        .map(|path| load_document(path))
        .collect::<Result<Vec<_>>>()?;

    let handles: Vec<_> = documents
        .into_iter()
        .map(|document| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                let outcome = orchestrator.lint(&document, TriggerSource::Command).await;
                (document, outcome)
            })
        })
        .collect();

    let mut failed = false;
    let mut linted = Vec::with_capacity(handles.len());
    for handle in handles {
        let (document, outcome) = handle.await.context("lint task panicked")?;
        failed |= outcome.is_failure() || outcome.summary().is_some_and(|s| s.errors > 0);
        linted.push(document);
    }

    let mut stdout = std::io::stdout().lock();
    if json {
        let snapshot = orchestrator.registry().snapshot();
        writeln!(stdout, "{}", snapshot_json(&snapshot)?)?;
    } else {
        for document in &linted {
            for diagnostic in orchestrator.registry().get(document.id()).iter() {
                writeln!(stdout, "{}", diagnostic.display_with_path(document.id().path()))?;
            }
        }
    }

    Ok(exit_code(failed))
}

pub async fn diff<A: Analyzer>(
    orchestrator: &AnalysisOrchestrator<A, TerminalHost>,
    file: &Path,
    baseline: Option<PathBuf>,
) -> Result<ExitCode> {
    let document = load_document(file)?;
    let outcome = orchestrator.diff(&document, baseline).await;
    let failed = match outcome {
        AnalysisOutcome::DiffReported {
            breaking_changes, ..
        } => breaking_changes > 0,
        AnalysisOutcome::Cancelled => {
            eprintln!("Diff cancelled: no baseline given");
            true
        }
        _ => true,
    };
    Ok(exit_code(failed))
}

pub async fn report<A: Analyzer>(
    orchestrator: &AnalysisOrchestrator<A, TerminalHost>,
    file: &Path,
) -> Result<ExitCode> {
    let document = load_document(file)?;
    let failed = match orchestrator.report(&document).await {
        AnalysisOutcome::ReportGenerated { artifact, .. } => {
            matches!(artifact, ArtifactState::OpenFailed(_))
        }
        _ => true,
    };
    Ok(exit_code(failed))
}

/// Open every file, then re-lint on modification until Ctrl-C.
pub async fn watch<A: Analyzer>(
    triggers: EventTriggers<A, TerminalHost>,
    files: &[PathBuf],
    auto_lint: bool,
) -> Result<ExitCode> {
    if !auto_lint {
        eprintln!("warning: auto_lint is disabled; saves will not be linted");
    }

    let documents = files
        .iter()
        .map(|path| load_document(path))
        .collect::<Result<Vec<_>>>()?;
    let host = triggers.orchestrator().host();
    host.set_active(documents.last().cloned());
    host.set_open(documents);

    let mut watcher = SaveWatcher::new(files);
    let mut pending = triggers.activate();

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Ctrl-C handler failed");
                }
                break;
            }
            _ = ticker.tick() => {
                pending.extend(fire_saves(&triggers, &mut watcher));
                if reap_finished(&mut pending).await > 0 {
                    let snapshot = triggers.orchestrator().registry().snapshot();
                    eprintln!("{}", watch_status(&snapshot));
                }
            }
        }
    }

    tracing::info!(outstanding = pending.len(), "Watch stopped");
    triggers.deactivate();
    Ok(ExitCode::SUCCESS)
}

/// Last seen modification time per watched file. A change counts as a save.
struct SaveWatcher {
    files: Vec<PathBuf>,
    modified: HashMap<PathBuf, SystemTime>,
}

impl SaveWatcher {
    fn new(files: &[PathBuf]) -> Self {
        let modified = files
            .iter()
            .filter_map(|path| Some((path.clone(), modified_time(path)?)))
            .collect();
        Self {
            files: files.to_vec(),
            modified,
        }
    }

    /// Reload every file whose modification time moved since the last call.
    fn changed(&mut self) -> Vec<Document> {
        let mut saved = Vec::new();
        for path in &self.files {
            let Some(mtime) = modified_time(path) else {
                continue;
            };
            if self.modified.insert(path.clone(), mtime) == Some(mtime) {
                continue;
            }
            match load_document(path) {
                Ok(document) => saved.push(document),
                Err(e) => tracing::warn!(error = %e, "Reload failed"),
            }
        }
        saved
    }
}

/// Run the save trigger for each changed file, making it the active document.
fn fire_saves<A: Analyzer>(
    triggers: &EventTriggers<A, TerminalHost>,
    watcher: &mut SaveWatcher,
) -> Vec<JoinHandle<AnalysisOutcome>> {
    let host = triggers.orchestrator().host();
    watcher
        .changed()
        .into_iter()
        .filter_map(|document| {
            tracing::debug!(document = %document.id(), "Saved");
            host.set_active(Some(document.clone()));
            triggers.on_save(document)
        })
        .collect()
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Await and drop every finished handle. Returns how many finished.
async fn reap_finished(pending: &mut Vec<JoinHandle<AnalysisOutcome>>) -> usize {
    let mut finished = 0;
    let mut index = 0;
    while index < pending.len() {
        if pending[index].is_finished() {
            if let Err(e) = pending.swap_remove(index).await {
                tracing::warn!(error = %e, "Analysis task failed");
            }
            finished += 1;
        } else {
            index += 1;
        }
    }
    finished
}

fn watch_status(snapshot: &DiagnosticsSnapshot) -> String {
    let status = snapshot.status_string();
    if status.is_empty() {
        "API Governor: clean".to_string()
    } else {
        format!("API Governor: {status}")
    }
}

fn snapshot_json(snapshot: &DiagnosticsSnapshot) -> Result<String> {
    let documents: Vec<DocumentDiagnostics<'_>> = snapshot
        .documents()
        .iter()
        .map(|(id, diagnostics)| DocumentDiagnostics {
            path: id.path(),
            diagnostics,
        })
        .collect();
    serde_json::to_string_pretty(&documents).context("failed to serialize diagnostics")
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
