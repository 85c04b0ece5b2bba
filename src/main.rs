//! Main entry point for the rusty-webterm REPL.
//!
//! Reads one line at a time from stdin, routes it through the [`App`] facade
//! and prints the reply. `exit`, `quit` or end of input ends the session.
//! With `--json` every reply is printed as a JSON object instead of text.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use rusty_webterm::app::App;
use rusty_webterm::config::Config;
use rusty_webterm::utils;

#[tokio::main]
async fn main() -> Result<()> {
    let json_mode = std::env::args().skip(1).any(|arg| arg == "--json");
    let config = Config::from_env().context("invalid configuration")?;

    // Logging is optional; the REPL still works without a writable log dir.
    if let Err(e) = utils::logger::init_logging(config.log_dir.as_deref()) {
        eprintln!("Warning: {:#}", e);
    }

    let app = App::new(&config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        if !json_mode {
            let prompt = format!("{} $ ", app.current_dir().await);
            stdout.write_all(prompt.as_bytes()).await?;
            stdout.flush().await?;
        }

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        let reply = app.submit(line).await;
        let rendered = if json_mode {
            serde_json::to_string(&reply).context("failed to encode reply")?
        } else {
            reply.output
        };
        stdout.write_all(rendered.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("session ended");
    Ok(())
}
