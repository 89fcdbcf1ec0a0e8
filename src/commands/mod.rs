//! Use cases behind the CLI subcommands.

pub mod config;
mod flags;
mod install;
mod list;
mod paths;

pub use config::Config;
pub use flags::flags;
pub use install::{InstallOptions, build_selection, install};
pub use list::{ArtifactEntry, artifact_entries, list};
pub use paths::{DEFAULT_HINTS_FILE, DEFAULT_ROOT_DIR, default_hints_path, default_root};
