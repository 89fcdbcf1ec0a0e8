//! Runtime abstraction for system operations.
//!
//! Everything the installer engine needs from the host goes through the
//! [`Runtime`] trait, so the engine can be driven by a mock in tests.
//!
//! # Structure
//!
//! - `env` - Environment variables, interpreter lookup and privilege checks
//! - `fs` - Directory listing and file reads
//! - `process` - Shell command execution
//! - `user` - User interaction (confirmation prompts)

mod env;
mod fs;
mod process;
mod user;

use anyhow::Result;
use std::collections::HashMap;
use std::env as std_env;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    /// Set an environment variable for this process and every child it spawns
    /// afterwards. The change is never persisted outside the process.
    fn set_env_var(&self, key: &str, value: &str);

    fn current_dir(&self) -> Result<PathBuf>;

    /// Locate a Python interpreter on the current search path.
    fn interpreter_path(&self) -> Option<PathBuf>;

    // File System
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    fn read_to_string(&self, path: &Path) -> Result<String>;

    // Processes
    /// Run a command line through the platform shell and wait for it to exit.
    /// Returns the exit code, or `None` if the child was terminated without one.
    fn run_shell(&self, command: &str) -> Result<Option<i32>>;

    // Privilege
    fn is_privileged(&self) -> bool;

    // User interaction
    /// Prompt user for confirmation. Returns true if user confirms (y/yes), false otherwise.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// The host system. Environment writes land in a process-local overlay that
/// is applied to every spawned child.
#[derive(Default)]
pub struct RealRuntime {
    env_overrides: Mutex<HashMap<String, String>>,
}

impl RealRuntime {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn set_env_var(&self, key: &str, value: &str) {
        self.set_env_var_impl(key, value)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn interpreter_path(&self) -> Option<PathBuf> {
        self.interpreter_path_impl()
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn run_shell(&self, command: &str) -> Result<Option<i32>> {
        self.run_shell_impl(command)
    }

    fn is_privileged(&self) -> bool {
        self.is_privileged_impl()
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.confirm_impl(prompt)
    }
}
