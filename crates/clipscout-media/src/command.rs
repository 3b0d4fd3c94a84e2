//! External tool command builder and runner.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};

/// Longest stderr tail kept in error values.
const STDERR_TAIL_CHARS: usize = 2000;

/// Builder for an external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add `flag value`.
    pub fn option(self, flag: &str, value: impl Into<OsString>) -> Self {
        self.arg(flag).arg(value)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn build_args(&self) -> &[OsString] {
        &self.args
    }

    fn display_args(&self) -> String {
        self.args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured output of a successful run.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs tool commands with an optional timeout and cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    cancel_rx: Option<watch::Receiver<bool>>,
    timeout: Option<Duration>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run `cmd` to completion.
    ///
    /// The child is killed when the timeout expires or cancellation is
    /// signalled. A non-zero exit status becomes [`MediaError::CommandFailed`]
    /// carrying the stderr tail.
    pub async fn run(&self, cmd: &ToolCommand) -> MediaResult<CommandOutput> {
        let binary = check_tool(cmd.program())?;
        debug!("Running {} {}", cmd.program(), cmd.display_args());

        let child = Command::new(&binary)
            .args(cmd.build_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let wait = child.wait_with_output();
        let cancelled = wait_for_cancel(self.cancel_rx.clone());

        let output = match self.timeout {
            Some(limit) => tokio::select! {
                result = tokio::time::timeout(limit, wait) => match result {
                    Ok(output) => output?,
                    Err(_) => {
                        warn!(
                            program = cmd.program(),
                            timeout_secs = limit.as_secs(),
                            "Command timed out, killing process"
                        );
                        return Err(MediaError::Timeout(limit.as_secs()));
                    }
                },
                _ = cancelled => {
                    info!(program = cmd.program(), "Command cancelled, killing process");
                    return Err(MediaError::Cancelled);
                }
            },
            None => tokio::select! {
                output = wait => output?,
                _ = cancelled => {
                    info!(program = cmd.program(), "Command cancelled, killing process");
                    return Err(MediaError::Cancelled);
                }
            },
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            debug!(program = cmd.program(), stderr = %stderr, "Command failed");
            Err(MediaError::command_failed(
                cmd.program(),
                "exited with non-zero status",
                Some(stderr_tail(&stderr)),
                output.status.code(),
            ))
        }
    }
}

/// Resolves once cancellation is signalled; never resolves without a receiver.
async fn wait_for_cancel(rx: Option<watch::Receiver<bool>>) {
    match rx {
        Some(mut rx) => {
            let signalled = rx.wait_for(|cancelled| *cancelled).await.map(|_| ()).is_ok();
            if !signalled {
                // Sender dropped without cancelling
                std::future::pending::<()>().await;
            }
        }
        None => std::future::pending::<()>().await,
    }
}

fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    let count = trimmed.chars().count();
    if count <= STDERR_TAIL_CHARS {
        trimmed.to_string()
    } else {
        trimmed.chars().skip(count - STDERR_TAIL_CHARS).collect()
    }
}

/// Resolve a tool on PATH (or an explicit path).
pub fn check_tool(program: &str) -> MediaResult<PathBuf> {
    which::which(program).map_err(|_| MediaError::ToolNotFound(program.to_string()))
}
