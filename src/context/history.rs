//! Command history tracking and storage.
//!
//! This module keeps a bounded, chronological log of every line the
//! interpreter was asked to run. The oldest entry is evicted first once the
//! capacity is reached.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Maximum number of commands to keep in history.
pub const DEFAULT_CAPACITY: usize = 100;

/// Entries returned by the API view.
pub const API_VIEW_LIMIT: usize = 50;

/// Entries shown by the `history` builtin.
pub const DISPLAY_VIEW_LIMIT: usize = 20;

/// One recorded command line.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    command: String,
    timestamp: DateTime<Local>,
}

impl HistoryEntry {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

/// Serializable view of an entry with an ISO-8601 timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub command: String,
    pub timestamp: String,
}

impl From<&HistoryEntry> for HistoryRecord {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            command: entry.command.clone(),
            timestamp: entry.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryLog {
    /// Create a log holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a command line exactly as given, stamped with the local time.
    pub fn push(&mut self, command: impl Into<String>) {
        self.push_at(command.into(), Local::now());
    }

    fn push_at(&mut self, command: String, timestamp: DateTime<Local>) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry { command, timestamp });
    }

    /// The most recent `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        let start = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(start)
    }

    /// API view of the most recent `limit` entries.
    pub fn records(&self, limit: usize) -> Vec<HistoryRecord> {
        self.recent(limit).map(HistoryRecord::from).collect()
    }

    /// Human-readable view used by the `history` builtin.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return "No commands in history".to_string();
        }

        self.recent(DISPLAY_VIEW_LIMIT)
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    "{:2}. [{}] {}",
                    i + 1,
                    entry.timestamp.format("%H:%M:%S"),
                    entry.command
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order() {
        let mut log = HistoryLog::new(10);
        log.push("ls");
        log.push("pwd");
        log.push("ls");

        let commands: Vec<&str> = log.recent(10).map(HistoryEntry::command).collect();
        assert_eq!(commands, vec!["ls", "pwd", "ls"]);
    }

    #[test]
    fn test_bounded_fifo_eviction() {
        let mut log = HistoryLog::default();
        for i in 0..150 {
            log.push(format!("cmd{}", i));
        }

        assert_eq!(log.len(), 100);
        let commands: Vec<&str> = log.recent(100).map(HistoryEntry::command).collect();
        assert_eq!(commands.first(), Some(&"cmd50"));
        assert_eq!(commands.last(), Some(&"cmd149"));
        for (offset, command) in commands.iter().enumerate() {
            assert_eq!(*command, format!("cmd{}", offset + 50));
        }
    }

    #[test]
    fn test_records_view_limit() {
        let mut log = HistoryLog::default();
        for i in 0..80 {
            log.push(format!("echo {}", i));
        }

        let records = log.records(API_VIEW_LIMIT);
        assert_eq!(records.len(), 50);
        assert_eq!(records[0].command, "echo 30");
        assert_eq!(records[49].command, "echo 79");
        assert!(DateTime::parse_from_rfc3339(&records[0].timestamp).is_ok());
    }

    #[test]
    fn test_render_empty() {
        let log = HistoryLog::default();
        assert_eq!(log.render(), "No commands in history");
    }

    #[test]
    fn test_render_last_twenty() {
        let mut log = HistoryLog::default();
        for i in 0..25 {
            log.push(format!("cmd{}", i));
        }

        let rendered = log.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 20);
        assert!(lines[0].starts_with(" 1. ["));
        assert!(lines[0].ends_with("] cmd5"));
        assert!(lines[19].starts_with("20. ["));
        assert!(lines[19].ends_with("] cmd24"));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut log = HistoryLog::new(0);
        log.push("a");
        log.push("b");
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len(), 1);
        assert_eq!(log.recent(1).next().map(HistoryEntry::command), Some("b"));
    }
}
