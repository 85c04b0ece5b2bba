//! Interpreter session state.
//!
//! This module owns everything a session mutates between commands: the
//! tracked working directory and the bounded command history. It also hosts
//! path resolution, since every filesystem operand is resolved against the
//! tracked directory.

mod cwd;
mod history;
pub mod path;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use crate::commands::CommandError;
use crate::security::PathPolicy;

pub use cwd::CurrentDir;
pub use history::{
    HistoryEntry, HistoryLog, HistoryRecord, API_VIEW_LIMIT, DEFAULT_CAPACITY, DISPLAY_VIEW_LIMIT,
};

/// Mutable state of one interpreter session.
#[derive(Debug)]
pub struct InterpreterState {
    pub cwd: CurrentDir,
    pub history: HistoryLog,
    policy: PathPolicy,
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self::new(CurrentDir::default(), DEFAULT_CAPACITY, PathPolicy::default())
    }
}

impl InterpreterState {
    pub fn new(cwd: CurrentDir, history_capacity: usize, policy: PathPolicy) -> Self {
        Self {
            cwd,
            history: HistoryLog::new(history_capacity),
            policy,
        }
    }

    pub fn policy(&self) -> PathPolicy {
        self.policy
    }

    /// Resolve a raw operand against the tracked directory.
    ///
    /// Under [`PathPolicy::Confined`] operands that could leave the working
    /// directory are refused before resolution.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, CommandError> {
        if !self.policy.allows(raw) {
            return Err(CommandError::PermissionDenied(format!(
                "'{}' is outside the working directory",
                raw
            )));
        }
        Ok(path::resolve(raw, self.cwd.path()))
    }
}
