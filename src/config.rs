//! Runtime configuration.
//!
//! Every knob is read from a `RUSTY_WEBTERM_*` environment variable; anything
//! unset keeps its default.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::context::DEFAULT_CAPACITY;
use crate::security::PathPolicy;
use crate::shell::{DisabledShell, HostShell, SystemShell, DEFAULT_SHELL};

pub const ENV_SHELL: &str = "RUSTY_WEBTERM_SHELL";
pub const ENV_TIMEOUT_SECS: &str = "RUSTY_WEBTERM_TIMEOUT_SECS";
pub const ENV_HISTORY_CAP: &str = "RUSTY_WEBTERM_HISTORY_CAP";
pub const ENV_CONFINE_PATHS: &str = "RUSTY_WEBTERM_CONFINE_PATHS";
pub const ENV_DISABLE_SHELL: &str = "RUSTY_WEBTERM_DISABLE_SHELL";
pub const ENV_LOG_DIR: &str = "RUSTY_WEBTERM_LOG_DIR";

/// Passthrough wall-clock limit when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Shell binary used for passthrough (`<shell> -c <line>`).
    pub shell: String,
    pub command_timeout: Duration,
    pub history_capacity: usize,
    /// Refuse operands containing `..` or starting with `/`.
    pub confine_paths: bool,
    /// Turn unknown verbs into errors instead of running them on the host.
    pub disable_shell: bool,
    /// `None` means `logs/` beside the executable.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            command_timeout: DEFAULT_TIMEOUT,
            history_capacity: DEFAULT_CAPACITY,
            confine_paths: false,
            disable_shell: false,
            log_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(shell) = get(ENV_SHELL) {
            config.shell = shell;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))?;
            if secs == 0 {
                bail!("{ENV_TIMEOUT_SECS} must be greater than zero");
            }
            config.command_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get(ENV_HISTORY_CAP) {
            let cap: usize = raw
                .parse()
                .with_context(|| format!("{ENV_HISTORY_CAP} must be a positive integer, got '{raw}'"))?;
            if cap == 0 {
                bail!("{ENV_HISTORY_CAP} must be greater than zero");
            }
            config.history_capacity = cap;
        }
        if let Some(raw) = get(ENV_CONFINE_PATHS) {
            config.confine_paths = parse_flag(ENV_CONFINE_PATHS, &raw)?;
        }
        if let Some(raw) = get(ENV_DISABLE_SHELL) {
            config.disable_shell = parse_flag(ENV_DISABLE_SHELL, &raw)?;
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    pub fn path_policy(&self) -> PathPolicy {
        if self.confine_paths {
            PathPolicy::Confined
        } else {
            PathPolicy::Permissive
        }
    }

    pub fn host_shell(&self) -> Arc<dyn HostShell> {
        if self.disable_shell {
            Arc::new(DisabledShell)
        } else {
            Arc::new(SystemShell::new(self.shell.clone()))
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{key} must be a boolean (true/false), got '{raw}'"),
    }
}
