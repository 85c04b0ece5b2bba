//! Passthrough to a host command shell.
//!
//! Each invocation spawns `<shell> -c <line>` in its own process group:
//! - working directory = the session directory
//! - stdin closed
//! - stdout and stderr captured in full
//! - time-bounded; on timeout the whole group is killed and nothing is kept

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::commands::CommandError;

/// Shell used when none is configured.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Captured result of a finished host command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if the child was terminated by a signal.
    pub status: Option<i32>,
}

impl HostOutput {
    /// Text shown to the user: stdout, then a labelled stderr block.
    pub fn render(&self) -> String {
        let mut out = self.stdout.trim().to_string();
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("Error: ");
            out.push_str(stderr);
        }

        if out.is_empty() {
            "Command executed successfully".to_string()
        } else {
            out
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Capability to run a raw command line on the host.
pub trait HostShell: Send + Sync {
    fn run<'a>(
        &'a self,
        line: &'a str,
        cwd: &'a Path,
        limit: Duration,
    ) -> BoxFuture<'a, Result<HostOutput, CommandError>>;
}

/// Runs command lines through a real shell binary.
#[derive(Clone, Debug)]
pub struct SystemShell {
    program: String,
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl SystemShell {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn spawn_and_wait(
        &self,
        line: &str,
        cwd: &Path,
        limit: Duration,
    ) -> Result<HostOutput, CommandError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-c")
            .arg(line)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .process_group(0);

        let child = cmd.spawn().map_err(|e| {
            CommandError::Unknown(format!("Failed to start '{}': {}", self.program, e))
        })?;
        let pid = child.id();
        debug!(pid = ?pid, cwd = %cwd.display(), "spawned host command");

        match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(HostOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                status: output.status.code(),
            }),
            Ok(Err(e)) => Err(CommandError::Unknown(format!(
                "Failed to wait for command: {}",
                e
            ))),
            Err(_) => {
                warn!(pid = ?pid, ?limit, "host command timed out");
                if let Some(pid) = pid {
                    kill_group(pid);
                }
                Err(CommandError::Timeout(limit))
            }
        }
    }
}

impl HostShell for SystemShell {
    fn run<'a>(
        &'a self,
        line: &'a str,
        cwd: &'a Path,
        limit: Duration,
    ) -> BoxFuture<'a, Result<HostOutput, CommandError>> {
        self.spawn_and_wait(line, cwd, limit).boxed()
    }
}

/// Kill every process left in the group led by `pid`.
///
/// The direct child is also reaped by `kill_on_drop`; this catches anything
/// it spawned.
fn kill_group(pid: u32) {
    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if let Err(errno) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        debug!(pid, %errno, "process group already gone");
    }
}

/// Refuses every passthrough; used when host execution is switched off.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledShell;

impl HostShell for DisabledShell {
    fn run<'a>(
        &'a self,
        line: &'a str,
        _cwd: &'a Path,
        _limit: Duration,
    ) -> BoxFuture<'a, Result<HostOutput, CommandError>> {
        let verb = line.split_whitespace().next().unwrap_or_default().to_string();
        async move { Err(CommandError::InvalidArgument(format!("Unknown command: {}", verb))) }
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    const LIMIT: Duration = Duration::from_secs(10);

    #[test]
    fn test_render_stdout_only() {
        let out = HostOutput {
            stdout: "hello\n".into(),
            stderr: String::new(),
            status: Some(0),
        };
        assert_eq!(out.render(), "hello");
        assert!(out.success());
    }

    #[test]
    fn test_render_labels_stderr() {
        let out = HostOutput {
            stdout: "partial\n".into(),
            stderr: "boom\n".into(),
            status: Some(1),
        };
        assert_eq!(out.render(), "partial\nError: boom");
        assert!(!out.success());
    }

    #[test]
    fn test_render_empty_sentinel() {
        let out = HostOutput::default();
        assert_eq!(out.render(), "Command executed successfully");
    }

    #[tokio::test]
    async fn test_runs_in_given_directory() {
        let dir = tempfile::tempdir().unwrap();
        let shell = SystemShell::default();

        let out = shell.run("pwd", dir.path(), LIMIT).await.unwrap();

        assert_eq!(out.stdout.trim(), dir.path().display().to_string());
        assert!(out.success());
    }

    #[tokio::test]
    async fn test_captures_stderr_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let shell = SystemShell::default();

        let out = shell
            .run("echo out; echo err 1>&2; exit 3", dir.path(), LIMIT)
            .await
            .unwrap();

        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
        assert_eq!(out.status, Some(3));
    }

    #[tokio::test]
    async fn test_timeout_kills_and_discards_output() {
        let dir = tempfile::tempdir().unwrap();
        let shell = SystemShell::default();
        let limit = Duration::from_millis(300);

        let started = Instant::now();
        let result = shell.run("echo leaked; sleep 5", dir.path(), limit).await;

        assert_eq!(result, Err(CommandError::Timeout(limit)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_missing_shell_binary() {
        let dir = tempfile::tempdir().unwrap();
        let shell = SystemShell::new("/nonexistent/shell");

        let result = shell.run("true", dir.path(), LIMIT).await;

        assert!(matches!(result, Err(CommandError::Unknown(_))));
    }

    #[tokio::test]
    async fn test_disabled_shell_refuses() {
        let dir = tempfile::tempdir().unwrap();
        let result = DisabledShell.run("uptime -p", dir.path(), LIMIT).await;

        assert_eq!(
            result,
            Err(CommandError::InvalidArgument("Unknown command: uptime".into()))
        );
    }
}
