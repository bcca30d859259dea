//! Shell command execution.
//!
//! Commands run to completion with stdout and stderr fully captured; the
//! session never sees partial output.

use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Combined result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Stdout followed by stderr.
    pub output: String,
    pub exit_code: i32,
    /// False when the shell could not be spawned at all.
    pub started: bool,
}

impl CommandOutput {
    pub fn new(output: impl Into<String>, exit_code: i32) -> Self {
        Self {
            output: output.into(),
            exit_code,
            started: true,
        }
    }

    /// Result for a command whose shell never started: the error text with
    /// exit code 1.
    pub fn not_started(message: impl Into<String>) -> Self {
        Self {
            started: false,
            ..Self::new(message, 1)
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a command line and captures its output.
///
/// Implementations never fail: a command that cannot be started is
/// reported as its error text with exit code 1.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run(&self, command: &str) -> CommandOutput;
}

/// Executes commands through the platform shell (`sh -c` / `cmd /C`).
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    program: String,
    flag: String,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        if cfg!(windows) {
            Self::new("cmd", "/C")
        } else {
            Self::new("sh", "-c")
        }
    }
}

impl ShellExecutor {
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }
}

#[async_trait]
impl Executor for ShellExecutor {
    async fn run(&self, command: &str) -> CommandOutput {
        debug!(program = %self.program, command, "spawning shell command");

        let result = Command::new(&self.program)
            .arg(&self.flag)
            .arg(command)
            .stdin(Stdio::inherit())
            .output()
            .await;

        match result {
            Ok(output) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                CommandOutput::new(text, exit_code(output.status))
            }
            Err(e) => {
                debug!(error = %e, "failed to spawn shell");
                CommandOutput::not_started(format!("Failed to run {}: {}", self.program, e))
            }
        }
    }
}

/// Exit code of a finished process; signals map to `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
