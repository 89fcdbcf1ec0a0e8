//! Environment and system information operations.

use anyhow::{Context, Result};
use log::debug;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::{MutexGuard, PoisonError};

use super::RealRuntime;

/// Interpreter names searched for, in order.
const INTERPRETER_CANDIDATES: [&str; 3] = ["python", "python3", "py"];

impl RealRuntime {
    pub(crate) fn overrides(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.env_overrides
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        if let Some(value) = self.overrides().get(key) {
            return Ok(value.clone());
        }
        env::var(key)
    }

    #[tracing::instrument(skip(self, value))]
    pub(crate) fn set_env_var_impl(&self, key: &str, value: &str) {
        debug!("Setting {} for this process and its children", key);
        self.overrides().insert(key.to_string(), value.to_string());
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn current_dir_impl(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to get current directory")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn interpreter_path_impl(&self) -> Option<PathBuf> {
        let search_path = self.env_var_impl("PATH").ok()?;
        let cwd = env::current_dir().ok()?;
        INTERPRETER_CANDIDATES.iter().find_map(|name| {
            which::which_in(name, Some(&search_path), &cwd)
                .inspect(|path| debug!("Found interpreter {:?}", path))
                .ok()
        })
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_privileged_impl(&self) -> bool {
        #[cfg(unix)]
        return nix::unistd::geteuid().as_raw() == 0;

        #[cfg(windows)]
        return is_elevated::is_elevated();
    }
}
