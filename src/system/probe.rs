//! Bounded, read-only host probes.
//!
//! Probes run short scripts through the session's [`HostShell`]:
//! - read-only commands only (best-effort)
//! - time-bounded
//! - output-bounded

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::shell::HostShell;

#[derive(Clone, Debug)]
pub struct ProbeConfig {
    /// Per-probe timeout.
    pub total_timeout: Duration,
    /// Max bytes of stdout kept.
    pub max_output_bytes: usize,
    /// Max lines of stdout kept.
    pub max_lines: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            total_timeout: Duration::from_secs(3),
            max_output_bytes: 16 * 1024,
            max_lines: 60,
        }
    }
}

impl ProbeConfig {
    /// Limits for probes that list every process on the host.
    pub fn process_listing() -> Self {
        Self {
            total_timeout: Duration::from_secs(5),
            max_output_bytes: 1024 * 1024,
            max_lines: 16 * 1024,
        }
    }
}

pub(crate) fn truncate_lines(s: &str, max_lines: usize) -> String {
    let mut out = String::new();
    for (i, line) in s.lines().enumerate() {
        if i >= max_lines {
            break;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

pub(crate) fn truncate_bytes_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    // Find a valid UTF-8 boundary <= max_bytes.
    let mut cut = 0usize;
    for (idx, _) in s.char_indices() {
        if idx > max_bytes {
            break;
        }
        cut = idx;
    }
    &s[..cut]
}

/// Run `script` and return its bounded stdout, or `None` if the probe failed
/// or printed nothing.
pub async fn run_probe(
    shell: &dyn HostShell,
    cwd: &Path,
    cfg: &ProbeConfig,
    script: &str,
) -> Option<String> {
    let output = match shell.run(script, cwd, cfg.total_timeout).await {
        Ok(output) => output,
        Err(err) => {
            warn!(%err, "system probe failed");
            return None;
        }
    };

    if !output.stderr.trim().is_empty() {
        debug!(stderr = %output.stderr.trim(), "system probe stderr");
    }

    let s = truncate_bytes_utf8(&output.stdout, cfg.max_output_bytes);
    let s = truncate_lines(s, cfg.max_lines);
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
