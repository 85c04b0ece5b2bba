//! rusty-webterm - the command interpreter behind a browser pseudo-terminal.
//!
//! This library provides:
//! - a builtin command set (filesystem, process and info commands) that runs
//!   in-process against per-session state
//! - passthrough of every other command line to a host shell, time-bounded
//! - a pattern-based translator from plain-English requests to commands
//! - an [`App`] facade whose replies serialize straight to JSON
//!
//! # Example
//!
//! ```no_run
//! use rusty_webterm::{App, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::new(&Config::from_env()?)?;
//!
//!     println!("{}", app.execute("ls").await);
//!
//!     let reply = app.submit("create a folder called demo").await;
//!     println!("{}", serde_json::to_string(&reply)?);
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod interpreter;
pub mod security;
pub mod shell;
pub mod system;
pub mod utils;

// Re-export commonly used types
pub use ai::{Translation, Translator};
pub use app::{App, Reply, ReplyKind};
pub use commands::{CommandError, CommandResult};
pub use config::Config;
pub use context::{HistoryRecord, InterpreterState};
pub use interpreter::CommandInterpreter;
pub use system::SystemSummary;
