//! Process table snapshots for the `ps` and `top` builtins.

use std::path::Path;

use crate::commands::CommandError;
use crate::shell::HostShell;

use super::probe::{run_probe, ProbeConfig};

/// Portable listing: one process per line, no header.
const PROCESS_SCRIPT: &str = "ps -A -o pid= -o pcpu= -o pmem= -o comm=";

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub cpu: f32,
    pub memory: f32,
    pub name: String,
}

/// Which table layout to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessView {
    /// `ps`: top 20 by CPU, name column first.
    List,
    /// `top`: top 15 by CPU, command column last.
    Top,
}

impl ProcessView {
    fn rows(self) -> usize {
        match self {
            ProcessView::List => 20,
            ProcessView::Top => 15,
        }
    }

    fn name_width(self) -> usize {
        match self {
            ProcessView::List => 20,
            ProcessView::Top => 15,
        }
    }
}

/// Parse `ps -o pid=,pcpu=,pmem=,comm=` output. Malformed lines are skipped.
pub fn parse_process_list(raw: &str) -> Vec<ProcessInfo> {
    raw.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let pid = fields.next()?.parse().ok()?;
            let cpu = fields.next()?.parse().ok()?;
            let memory = fields.next()?.parse().ok()?;
            let name = fields.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return None;
            }
            Some(ProcessInfo {
                pid,
                cpu,
                memory,
                name,
            })
        })
        .collect()
}

/// Render the busiest processes as a fixed-width table.
pub fn render_table(mut processes: Vec<ProcessInfo>, view: ProcessView) -> String {
    processes.sort_by(|a, b| b.cpu.total_cmp(&a.cpu).then(a.pid.cmp(&b.pid)));

    let width = view.name_width();
    let mut lines = match view {
        ProcessView::List => vec![
            format!("{:<8} {:<20} {:<8} {:<8}", "PID", "NAME", "CPU%", "MEM%"),
            "-".repeat(50),
        ],
        ProcessView::Top => vec![
            format!("{:<8} {:<8} {:<8} {:<15}", "PID", "CPU%", "MEM%", "COMMAND"),
            "-".repeat(45),
        ],
    };

    for proc in processes.iter().take(view.rows()) {
        let name: String = proc.name.chars().take(width).collect();
        let line = match view {
            ProcessView::List => format!(
                "{:<8} {:<20} {:<8.1} {:<8.1}",
                proc.pid, name, proc.cpu, proc.memory
            ),
            ProcessView::Top => format!(
                "{:<8} {:<8.1} {:<8.1} {:<15}",
                proc.pid, proc.cpu, proc.memory, name
            ),
        };
        lines.push(line);
    }

    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Snapshot the host process table and render it.
pub async fn process_report(
    shell: &dyn HostShell,
    cwd: &Path,
    view: ProcessView,
) -> Result<String, CommandError> {
    let raw = run_probe(shell, cwd, &ProbeConfig::process_listing(), PROCESS_SCRIPT)
        .await
        .ok_or_else(|| CommandError::Unknown("Unable to read the process table".to_string()))?;
    Ok(render_table(parse_process_list(&raw), view))
}
