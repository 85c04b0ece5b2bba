//! Process builtins: ps, top, kill.

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::info;

use super::{require, CommandError};
use crate::context::InterpreterState;
use crate::shell::HostShell;
use crate::system::{process_report, ProcessView};

/// `ps` and `top`: snapshot of the busiest processes.
pub async fn snapshot(
    view: ProcessView,
    state: &InterpreterState,
    shell: &dyn HostShell,
) -> Result<String, CommandError> {
    process_report(shell, state.cwd.path(), view).await
}

/// `kill <pid>`: polite termination request.
pub fn terminate(args: &[String]) -> Result<String, CommandError> {
    let raw = require(args, 0, "Process ID required")?;
    let pid = parse_pid(raw)?;

    match signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        Ok(()) => {
            info!(pid, "sent SIGTERM");
            Ok(format!("Process {} terminated", pid))
        }
        Err(Errno::ESRCH) => Err(CommandError::NotFound(format!("Process {} not found", pid))),
        Err(Errno::EPERM) => Err(CommandError::PermissionDenied(format!(
            "cannot signal process {}",
            pid
        ))),
        Err(errno) => Err(CommandError::Unknown(format!(
            "Failed to signal process {}: {}",
            pid, errno
        ))),
    }
}

/// Zero and negatives would address process groups, not a single process.
fn parse_pid(raw: &str) -> Result<i32, CommandError> {
    match raw.parse::<i32>() {
        Ok(pid) if pid > 0 => Ok(pid),
        _ => Err(CommandError::InvalidArgument("Invalid process ID".to_string())),
    }
}
