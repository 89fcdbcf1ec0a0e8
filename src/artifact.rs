use anyhow::Result;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// File extension that marks an installer executable (matched case-insensitively).
pub const INSTALLER_EXTENSION: &str = "exe";

/// File name fragment marking a Python runtime installer.
pub const RUNTIME_ARTIFACT_MARKER: &str = "pyth";

/// An installer file found under the artifact root. Identity is the file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Artifact {
    pub name: String,
    /// Immediate subdirectory of the root the file lives in, if not the root itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdir: Option<String>,
}

impl Artifact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subdir: None,
        }
    }

    pub fn in_subdir(name: impl Into<String>, subdir: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subdir: Some(subdir.into()),
        }
    }

    /// Full path of the installer below `root`.
    pub fn path(&self, root: &Path) -> PathBuf {
        match &self.subdir {
            Some(subdir) => root.join(subdir).join(&self.name),
            None => root.join(&self.name),
        }
    }

    pub fn is_runtime_installer(&self) -> bool {
        self.name.contains(RUNTIME_ARTIFACT_MARKER)
    }
}

fn is_installer(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(INSTALLER_EXTENSION))
}

fn file_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str();
    if name.is_none() {
        debug!("Skipping non UTF-8 file name {:?}", path);
    }
    name.map(str::to_string)
}

/// Find installer executables in `root` and its immediate subdirectories.
///
/// Directory structure: `<root>/<file>.exe` or `<root>/<subdir>/<file>.exe`.
/// When two directories hold the same file name, the root wins, then the
/// first subdirectory in name order. The result is sorted by file name.
#[tracing::instrument(skip(runtime))]
pub fn discover_artifacts<R: Runtime>(runtime: &R, root: &Path) -> Result<Vec<Artifact>> {
    let mut artifacts = Vec::new();

    if !runtime.exists(root) {
        debug!("Artifact root {:?} does not exist", root);
        return Ok(artifacts);
    }

    let mut entries = runtime.read_dir(root)?;
    entries.sort();

    let (subdirs, files): (Vec<PathBuf>, Vec<PathBuf>) =
        entries.into_iter().partition(|path| runtime.is_dir(path));

    let mut seen = HashSet::new();
    let mut add = |artifact: Artifact| {
        if seen.insert(artifact.name.clone()) {
            artifacts.push(artifact);
        } else {
            warn!(
                "Ignoring duplicate installer {:?}, a file with the same name was found first",
                artifact.path(root)
            );
        }
    };

    for path in files.iter().filter(|path| is_installer(path)) {
        if let Some(name) = file_name(path) {
            add(Artifact::new(name));
        }
    }

    for subdir_path in &subdirs {
        let Some(subdir) = file_name(subdir_path) else {
            continue;
        };
        let mut children = match runtime.read_dir(subdir_path) {
            Ok(children) => children,
            Err(e) => {
                warn!("Skipping unreadable directory {:?}: {:#}", subdir_path, e);
                continue;
            }
        };
        children.sort();
        for path in children {
            if is_installer(&path) && !runtime.is_dir(&path) {
                if let Some(name) = file_name(&path) {
                    add(Artifact::in_subdir(name, subdir.clone()));
                }
            }
        }
    }

    artifacts.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Found {} installer(s) under {:?}", artifacts.len(), root);
    Ok(artifacts)
}
