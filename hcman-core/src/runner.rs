/*!
 * Shell Command Execution
 * Runs a command line through the shell and captures what it printed
 */

use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::error::{ManagerError, Result};

/// Captured result of one shell invocation.
///
/// Only `stdout` is meaningful to callers. The exit code and stderr are kept
/// for diagnostics and never decide success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle)
    }
}

pub trait CommandRunner: Send + Sync {
    /// Runs `command` to completion and returns its standard output.
    ///
    /// Fails only when the process cannot be spawned; a non-zero exit is
    /// still a successful run.
    fn run(&self, command: &str) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        (**self).run(command)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Arc<R> {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        (**self).run(command)
    }
}

/// Runs commands as `<shell> -c <command>`, the way `popen` does.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new("/bin/sh")
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        tracing::debug!("Running: {}", command);

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ManagerError::Launch {
                command: command.to_string(),
                source,
            })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        tracing::debug!(
            "`{}` exited with {:?} ({} bytes of output)",
            command,
            result.exit_code,
            result.stdout.len()
        );
        if !result.stderr.trim().is_empty() {
            tracing::debug!("stderr: {}", result.stderr.trim());
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_full_stdout() {
        let runner = ShellRunner::default();
        let output = runner.run("printf 'one\\ntwo\\n'").unwrap();
        assert_eq!(output.stdout, "one\ntwo\n");
        assert_eq!(output.exit_code, Some(0));
    }

    #[test]
    fn non_zero_exit_is_not_an_error() {
        let runner = ShellRunner::default();
        let output = runner.run("echo failed; exit 3").unwrap();
        assert_eq!(output.stdout, "failed\n");
        assert_eq!(output.exit_code, Some(3));
    }

    #[test]
    fn stderr_is_kept_apart_from_stdout() {
        let runner = ShellRunner::default();
        let output = runner.run("echo out; echo err >&2").unwrap();
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[test]
    fn missing_shell_is_a_launch_error() {
        let runner = ShellRunner::new("/nonexistent/hcman-shell");
        let err = runner.run("true").unwrap_err();
        assert!(err.is_launch());
        assert!(err.to_string().contains("`true`"));
    }
}
