use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Directory scanned for installers when no root is given.
pub const DEFAULT_ROOT_DIR: &str = "exefile";

/// Type hint file read when no hint file is given.
pub const DEFAULT_HINTS_FILE: &str = "options.txt";

/// Default artifact root: `<current dir>/exefile`
#[tracing::instrument(skip(runtime))]
pub fn default_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let root = runtime.current_dir()?.join(DEFAULT_ROOT_DIR);
    debug!("Using default artifact root {:?}", root);
    Ok(root)
}

/// Default type hint file: `<current dir>/options.txt`
#[tracing::instrument(skip(runtime))]
pub fn default_hints_path<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    Ok(runtime.current_dir()?.join(DEFAULT_HINTS_FILE))
}
