//! Shell command execution.

use anyhow::{Context, Result};
use log::debug;
use std::process::Command;

use super::RealRuntime;

/// Wrap a command line so the platform shell parses it.
#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    use std::os::windows::process::CommandExt;

    // cmd strips one pair of outer quotes, so the quoted installer path survives
    let mut command = Command::new("cmd");
    command.arg("/C").raw_arg(format!("\"{}\"", command_line));
    command
}

#[cfg(not(windows))]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    command
}

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn run_shell_impl(&self, command_line: &str) -> Result<Option<i32>> {
        let mut command = shell_command(command_line);
        command.envs(self.overrides().iter());

        debug!("Running {:?}", command_line);
        let status = command
            .status()
            .with_context(|| format!("Failed to start shell for: {}", command_line))?;
        debug!("{:?} exited with {:?}", command_line, status);

        Ok(status.code())
    }
}
