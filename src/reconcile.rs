//! Makes a freshly installed Python runtime reachable for the rest of the batch.
//!
//! Only the runtime's view of the environment is touched: the update is
//! visible to this process and to installers it starts later, and is never
//! persisted to the system or a shell profile.

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::outcome::PathStatus;
use crate::runtime::Runtime;

pub const PATH_VAR: &str = "PATH";

/// Search path fragment meaning the runtime is already reachable.
pub const RUNTIME_PATH_MARKER: &str = "python";

/// Version directory the runtime installs into, next to the interpreter.
pub const RUNTIME_VERSION_DIR: &str = "Python311";

pub const RUNTIME_SCRIPTS_DIR: &str = "Scripts";

#[cfg(windows)]
pub const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_SEPARATOR: char = ':';

/// Directories to prepend to the search path for the interpreter at `interpreter`.
pub fn runtime_dirs(interpreter: &Path) -> [PathBuf; 2] {
    let install_dir = interpreter
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(RUNTIME_VERSION_DIR);
    let scripts_dir = install_dir.join(RUNTIME_SCRIPTS_DIR);
    [install_dir, scripts_dir]
}

/// Check the search path for the runtime and prepend its directories if missing.
#[tracing::instrument(skip(runtime))]
pub fn reconcile_runtime_path<R: Runtime>(runtime: &R) -> PathStatus {
    let current = runtime.env_var(PATH_VAR).unwrap_or_default();
    if current.contains(RUNTIME_PATH_MARKER) {
        debug!("{} already contains '{}'", PATH_VAR, RUNTIME_PATH_MARKER);
        return PathStatus::AlreadyOnPath;
    }

    let Some(interpreter) = runtime.interpreter_path() else {
        info!("No Python interpreter found, {} left unchanged", PATH_VAR);
        return PathStatus::InterpreterMissing;
    };

    let [install_dir, scripts_dir] = runtime_dirs(&interpreter);
    let mut updated = format!(
        "{}{}{}",
        install_dir.display(),
        PATH_SEPARATOR,
        scripts_dir.display()
    );
    if !current.is_empty() {
        updated.push(PATH_SEPARATOR);
        updated.push_str(&current);
    }

    runtime.set_env_var(PATH_VAR, &updated);
    info!(
        "Added {} and {} to {}",
        install_dir.display(),
        scripts_dir.display(),
        PATH_VAR
    );

    PathStatus::Added { interpreter }
}
