//! System information collaborator.
//!
//! Gathers host facts for the `sysinfo`, `ps` and `top` builtins and for the
//! structured summary handed to front ends. Everything is collected through
//! short shell probes, so a sandboxed build without a host shell degrades to
//! error text instead of failing.

mod probe;
mod process;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::commands::CommandError;
use crate::shell::HostShell;

pub use probe::{run_probe, ProbeConfig};
pub use process::{parse_process_list, process_report, render_table, ProcessInfo, ProcessView};

/// Prints `key=value` lines; every block is best-effort.
const SUMMARY_SCRIPT: &str = r#"
printf 'platform=%s\n' "$(uname -s 2>/dev/null)"
printf 'release=%s\n' "$(uname -r 2>/dev/null)"
printf 'architecture=%s\n' "$(uname -m 2>/dev/null)"
printf 'hostname=%s\n' "$(uname -n 2>/dev/null)"
printf 'cpu_count=%s\n' "$(getconf _NPROCESSORS_ONLN 2>/dev/null)"
printf 'boot_time=%s\n' "$(uptime -s 2>/dev/null)"
if [ -r /proc/meminfo ]; then
  awk '/^MemTotal:/ {print "memory_total_kb=" $2} /^MemAvailable:/ {print "memory_available_kb=" $2}' /proc/meminfo
fi
df -Pk / 2>/dev/null | awk 'NR==2 {print "disk_total_kb=" $2; print "disk_used_kb=" $3; print "disk_free_kb=" $4}'
"#;

/// Structured host summary. Sizes are in bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSummary {
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub release: Option<String>,
    pub architecture: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cpu_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub boot_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memory_total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memory_available: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub disk_total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub disk_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub disk_free: Option<u64>,
}

impl SystemSummary {
    /// Summary built from compile-time facts only.
    pub fn fallback() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            cpu_count: std::thread::available_parallelism().ok().map(usize::from),
            ..Self::default()
        }
    }

    /// Parse probe output, keeping fallback values for anything missing.
    pub fn parse(raw: &str) -> Self {
        let mut summary = Self::fallback();
        for line in raw.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let kib = || value.parse::<u64>().ok().and_then(|kb| kb.checked_mul(1024));
            match key.trim() {
                "platform" => summary.platform = value.to_string(),
                "release" => summary.release = Some(value.to_string()),
                "architecture" => summary.architecture = value.to_string(),
                "hostname" => summary.hostname = Some(value.to_string()),
                "cpu_count" => {
                    if let Ok(count) = value.parse() {
                        summary.cpu_count = Some(count);
                    }
                }
                "boot_time" => summary.boot_time = Some(value.to_string()),
                "memory_total_kb" => summary.memory_total = kib(),
                "memory_available_kb" => summary.memory_available = kib(),
                "disk_total_kb" => summary.disk_total = kib(),
                "disk_used_kb" => summary.disk_used = kib(),
                "disk_free_kb" => summary.disk_free = kib(),
                _ => {}
            }
        }
        summary
    }

    /// Multi-line report printed by the `sysinfo` builtin.
    pub fn render(&self) -> String {
        let mut lines = vec![
            "System Information:".to_string(),
            "===================".to_string(),
            String::new(),
        ];

        match &self.release {
            Some(release) => lines.push(format!("Platform: {} {}", self.platform, release)),
            None => lines.push(format!("Platform: {}", self.platform)),
        }
        lines.push(format!("Architecture: {}", self.architecture));
        if let Some(host) = &self.hostname {
            lines.push(format!("Hostname: {}", host));
        }
        lines.push(format!(
            "CPU Cores: {}",
            self.cpu_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        ));

        if let Some(total) = self.memory_total {
            lines.push(String::new());
            lines.push("Memory:".to_string());
            lines.push(format!("  Total: {}", format_bytes(total)));
            if let Some(available) = self.memory_available {
                let used = total.saturating_sub(available);
                lines.push(format!(
                    "  Used: {} ({:.1}%)",
                    format_bytes(used),
                    percent(used, total)
                ));
                lines.push(format!("  Available: {}", format_bytes(available)));
            }
        }

        if let Some(total) = self.disk_total {
            lines.push(String::new());
            lines.push("Disk:".to_string());
            lines.push(format!("  Total: {}", format_bytes(total)));
            if let Some(used) = self.disk_used {
                lines.push(format!(
                    "  Used: {} ({:.1}%)",
                    format_bytes(used),
                    percent(used, total)
                ));
            }
            if let Some(free) = self.disk_free {
                lines.push(format!("  Free: {}", format_bytes(free)));
            }
        }

        if let Some(boot) = &self.boot_time {
            lines.push(String::new());
            lines.push(format!("Boot Time: {}", boot));
        }

        lines.join("\n")
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Human-readable byte count, e.g. `1.5GB`.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if value < 1024.0 {
            return format!("{:.1}{}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1}PB", value)
}

/// Collect a structured summary. Never fails; missing facts stay `None`.
pub async fn collect_summary(shell: &dyn HostShell, cwd: &Path) -> SystemSummary {
    match run_probe(shell, cwd, &ProbeConfig::default(), SUMMARY_SCRIPT).await {
        Some(raw) => SystemSummary::parse(&raw),
        None => SystemSummary::fallback(),
    }
}

/// Text report for the `sysinfo` builtin.
pub async fn detailed_report(shell: &dyn HostShell, cwd: &Path) -> Result<String, CommandError> {
    let raw = run_probe(shell, cwd, &ProbeConfig::default(), SUMMARY_SCRIPT)
        .await
        .ok_or_else(|| CommandError::Unknown("Unable to collect system information".to_string()))?;
    Ok(SystemSummary::parse(&raw).render())
}
