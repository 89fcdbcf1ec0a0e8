//! Runs a confirmed selection of installers one after another.
//!
//! Each installer is started through the platform shell as
//! `"<path>" <silent flags>`, the engine waits for it to exit, and the exit
//! code becomes an [`Outcome`]. Installs never overlap, so a search path
//! update made after one installer is seen by the next.

use anyhow::{Result, anyhow};
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::error::SbiError;
use crate::outcome::Outcome;
use crate::reconcile::reconcile_runtime_path;
use crate::runtime::Runtime;
use crate::selection::{SelectedArtifact, Selection};
use crate::technology::FlagTable;

/// Exit code an installer returns for "installed, restart required".
///
/// Only Windows reports exit codes outside 0..=255, so on Unix this never matches.
pub const RESTART_REQUIRED_EXIT_CODE: i32 = -125071;

/// Progress reported while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Started { artifact: String, command: String },
    Finished { artifact: String, outcome: Outcome },
    Done,
}

/// Command line for an installer: the quoted path, a space, then the flags.
pub fn build_command(path: &Path, flags: &str) -> String {
    format!("\"{}\" {}", path.display(), flags)
}

/// Map an installer's exit code to its outcome, before any reconciliation.
pub fn classify_exit(code: Option<i32>) -> Outcome {
    match code {
        Some(0) => Outcome::Succeeded,
        Some(RESTART_REQUIRED_EXIT_CODE) => Outcome::SucceededRestartRequired,
        _ => Outcome::Failed,
    }
}

pub struct Engine<R: Runtime> {
    runtime: R,
    root: PathBuf,
    flags: FlagTable,
    outcomes: IndexMap<String, Outcome>,
}

impl<R: Runtime> Engine<R> {
    pub fn new(runtime: R, root: PathBuf, flags: FlagTable) -> Self {
        Self {
            runtime,
            root,
            flags,
            outcomes: IndexMap::new(),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Outcomes of every installer run so far, latest result per file name.
    pub fn outcomes(&self) -> &IndexMap<String, Outcome> {
        &self.outcomes
    }

    /// The command that would run for `entry`.
    pub fn command_for(&self, entry: &SelectedArtifact) -> Result<String, SbiError> {
        let (_, flags) = self.flags.resolve(&entry.technology)?;
        Ok(build_command(&entry.artifact.path(&self.root), flags))
    }

    /// Install every selected artifact in order, reporting progress through
    /// `on_event`. The selection is empty afterwards.
    #[tracing::instrument(skip_all, fields(count = selection.len()))]
    pub fn run_batch<F: FnMut(BatchEvent)>(&mut self, selection: &mut Selection, mut on_event: F) {
        for entry in selection.take() {
            let name = entry.artifact.name.clone();
            let outcome = self.install_one(&entry, &mut on_event);
            debug!("{}: {:?}", name, outcome);
            self.outcomes.insert(name.clone(), outcome.clone());
            on_event(BatchEvent::Finished {
                artifact: name,
                outcome,
            });
        }
        on_event(BatchEvent::Done);
    }

    fn install_one<F: FnMut(BatchEvent)>(&self, entry: &SelectedArtifact, on_event: &mut F) -> Outcome {
        let name = &entry.artifact.name;
        let command = match self.command_for(entry) {
            Ok(command) => command,
            Err(e) => {
                warn!("Not running {}: {}", name, e);
                return Outcome::UnknownTechnology {
                    technology: entry.technology.clone(),
                };
            }
        };

        info!("Installing {} as {}", name, entry.technology);
        on_event(BatchEvent::Started {
            artifact: name.clone(),
            command: command.clone(),
        });

        let code = match self.runtime.run_shell(&command) {
            Ok(code) => code,
            Err(e) => {
                warn!("Failed to run installer {}: {:#}", name, e);
                return Outcome::Failed;
            }
        };

        match classify_exit(code) {
            Outcome::Succeeded if entry.artifact.is_runtime_installer() => Outcome::Runtime {
                path: reconcile_runtime_path(&self.runtime),
            },
            outcome => outcome,
        }
    }
}

/// A batch running on a worker thread.
pub struct BatchHandle<R: Runtime> {
    pub events: Receiver<BatchEvent>,
    worker: JoinHandle<Engine<R>>,
}

impl<R: Runtime> BatchHandle<R> {
    /// Wait for the worker and take the engine back.
    pub fn join(self) -> Result<Engine<R>> {
        self.worker
            .join()
            .map_err(|_| anyhow!("Installer worker thread panicked"))
    }
}

/// Run a batch on a background thread so the caller stays free to render
/// progress. Installs are still strictly sequential.
pub fn spawn_batch<R: Runtime + 'static>(mut engine: Engine<R>, mut selection: Selection) -> BatchHandle<R> {
    let (tx, rx): (Sender<BatchEvent>, Receiver<BatchEvent>) = mpsc::channel();
    let worker = thread::spawn(move || {
        debug!("Installer worker started");
        engine.run_batch(&mut selection, |event| {
            // The receiver may stop listening, the batch still runs to completion
            let _ = tx.send(event);
        });
        engine
    });
    BatchHandle { events: rx, worker }
}
