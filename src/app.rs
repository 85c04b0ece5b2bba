//! Application facade.
//!
//! Owns the single interpreter session behind an async mutex together with the
//! translator, and routes raw user input to one or the other. Every payload it
//! returns is serializable so a web layer can emit it as JSON unchanged.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::ai::{self, Translation, Translator, FORCE_PREFIX};
use crate::config::Config;
use crate::context::{HistoryRecord, API_VIEW_LIMIT};
use crate::interpreter::CommandInterpreter;
use crate::system::{self, SystemSummary};

/// How a [`Reply`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// Direct execution.
    Command,
    /// Translated, then executed.
    AiCommand,
    /// Translated, nothing executed.
    AiResponse,
    Error,
}

/// Answer to one submitted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub success: bool,
    pub output: String,
    #[serde(rename = "type")]
    pub kind: ReplyKind,
}

impl Reply {
    fn new(success: bool, output: String, kind: ReplyKind) -> Self {
        Self {
            success,
            output,
            kind,
        }
    }
}

pub struct App {
    interpreter: Mutex<CommandInterpreter>,
    translator: Translator,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let translator = Translator::new().context("failed to compile translation rules")?;
        let interpreter = CommandInterpreter::from_config(config);
        info!(
            cwd = %interpreter.state().cwd,
            shell = %config.shell,
            timeout = ?config.command_timeout,
            policy = ?config.path_policy(),
            "interpreter ready"
        );
        Ok(Self::with_interpreter(interpreter, translator))
    }

    pub fn with_interpreter(interpreter: CommandInterpreter, translator: Translator) -> Self {
        Self {
            interpreter: Mutex::new(interpreter),
            translator,
        }
    }

    /// Run one command line. The session lock is held until it finishes.
    pub async fn execute(&self, line: &str) -> String {
        self.interpreter.lock().await.execute(line).await
    }

    pub fn translate(&self, query: &str) -> Translation {
        self.translator.translate(query)
    }

    /// Most recent entries, capped at [`API_VIEW_LIMIT`].
    pub async fn history(&self, limit: usize) -> Vec<HistoryRecord> {
        let interpreter = self.interpreter.lock().await;
        interpreter.state().history.records(limit.min(API_VIEW_LIMIT))
    }

    pub async fn system_summary(&self) -> SystemSummary {
        let interpreter = self.interpreter.lock().await;
        system::collect_summary(interpreter.shell(), interpreter.state().cwd.path()).await
    }

    pub async fn current_dir(&self) -> String {
        self.interpreter.lock().await.state().cwd.to_string()
    }

    /// Route raw input: natural language goes through the translator first.
    pub async fn submit(&self, input: &str) -> Reply {
        let input = input.trim();
        if input.is_empty() {
            return Reply::new(false, "Error: Empty command".to_string(), ReplyKind::Error);
        }

        let query = match input.strip_prefix(FORCE_PREFIX) {
            Some(forced) => Some(forced.trim()),
            None if ai::is_natural_language(input) => Some(input),
            None => None,
        };

        let Some(query) = query else {
            let result = self.interpreter.lock().await.run(input).await;
            return Reply::new(!result.is_error(), result.output, ReplyKind::Command);
        };

        let translation = self.translate(query);
        match translation.command {
            Some(command) if translation.requires_execution => {
                debug!(%query, %command, "executing translated command");
                let result = self.interpreter.lock().await.run(&command).await;
                let output = format!(
                    "AI: {}\nExecuting: {}\n\n{}",
                    translation.explanation, command, result.output
                );
                Reply::new(!result.is_error(), output, ReplyKind::AiCommand)
            }
            _ => Reply::new(true, translation.explanation, ReplyKind::AiResponse),
        }
    }
}
