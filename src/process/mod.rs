//! External command execution with captured output and a hard timeout

use crate::core::{ProvisionError, ProvisionResult};
use crate::di::CommandRunner;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// A command line to run, independent of how it is run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// The command line as a single string, for logs and error details
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exit status and captured text of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Turn a non-zero exit into `ProvisionError::Process`.
    pub fn into_result(self, spec: &CommandSpec) -> ProvisionResult<CommandOutput> {
        if self.success() {
            return Ok(self);
        }

        let detail = if self.stderr.trim().is_empty() {
            self.stdout.trim().to_string()
        } else {
            self.stderr.trim().to_string()
        };

        Err(ProvisionError::Process {
            command: spec.display(),
            code: self.status,
            stderr: detail,
        })
    }
}

/// Runs commands as real child processes.
///
/// The child is killed when the timeout elapses.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, spec: &CommandSpec, timeout: Duration) -> ProvisionResult<CommandOutput> {
        debug!(
            "Running command: {} (cwd: {:?}, timeout: {}s)",
            spec.display(),
            spec.cwd,
            timeout.as_secs()
        );

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        cmd.kill_on_drop(true);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(Stdio::null());
        if let Some(ref dir) = spec.cwd {
            cmd.current_dir(dir);
        }

        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ProvisionError::Timeout {
                    command: spec.display(),
                    seconds: timeout.as_secs(),
                })
            }
        };

        let output = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !output.success() {
            debug!("Command failed with status {:?}", output.status);
            if !output.stderr.trim().is_empty() {
                debug!("Stderr:\n{}", output.stderr.trim());
            }
        }

        Ok(output)
    }
}
