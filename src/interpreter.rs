//! Command interpreter: one line in, one display string out.
//!
//! Builtins run in-process against [`InterpreterState`]; every other verb is
//! forwarded verbatim to the configured [`HostShell`]. Nothing escapes as a
//! panic or an `Err`: failures come back as `Error: <message>` text.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, error};

use crate::commands::{self, Builtin, CommandError, CommandResult};
use crate::config::{Config, DEFAULT_TIMEOUT};
use crate::context::{CurrentDir, InterpreterState};
use crate::shell::{HostShell, SystemShell};

/// Split a line into tokens, honouring shell quoting where it parses.
///
/// `#` is an ordinary character: `echo a #b` keeps `#b`.
pub fn tokenize(line: &str) -> Vec<String> {
    shlex::split(&escape_comment_marks(line))
        .unwrap_or_else(|| line.split_whitespace().map(String::from).collect())
}

/// Backslash-escape every unquoted `#` that starts a word, so the shlex
/// lexer never reads it as a comment.
fn escape_comment_marks(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut word_start = true;

    for ch in line.chars() {
        if escaped {
            escaped = false;
        } else {
            match quote {
                Some(q) if ch == q => quote = None,
                Some('"') if ch == '\\' => escaped = true,
                Some(_) => {}
                None => match ch {
                    '\\' => escaped = true,
                    '\'' | '"' => quote = Some(ch),
                    '#' if word_start => out.push('\\'),
                    _ => {}
                },
            }
        }
        word_start = quote.is_none() && !escaped && ch.is_whitespace();
        out.push(ch);
    }
    out
}

pub struct CommandInterpreter {
    state: InterpreterState,
    shell: Arc<dyn HostShell>,
    timeout: Duration,
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new(
            InterpreterState::default(),
            Arc::new(SystemShell::default()),
            DEFAULT_TIMEOUT,
        )
    }
}

impl CommandInterpreter {
    pub fn new(state: InterpreterState, shell: Arc<dyn HostShell>, timeout: Duration) -> Self {
        Self {
            state,
            shell,
            timeout,
        }
    }

    /// Session starting in the process working directory.
    pub fn from_config(config: &Config) -> Self {
        let state = InterpreterState::new(
            CurrentDir::default(),
            config.history_capacity,
            config.path_policy(),
        );
        Self::new(state, config.host_shell(), config.command_timeout)
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn shell(&self) -> &dyn HostShell {
        self.shell.as_ref()
    }

    /// Interpret one line and return the text to display.
    pub async fn execute(&mut self, line: &str) -> String {
        self.run(line).await.output
    }

    /// Like [`execute`](Self::execute) but keeps the failure class.
    pub async fn run(&mut self, line: &str) -> CommandResult {
        if line.trim().is_empty() {
            return CommandError::InvalidArgument("Empty command".to_string()).into();
        }

        self.state.history.push(line);
        let tokens = tokenize(line);

        let outcome = AssertUnwindSafe(self.interpret(line, &tokens))
            .catch_unwind()
            .await;
        let result = match outcome {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(%line, %message, "command panicked");
                Err(CommandError::Unknown(message))
            }
        };

        if let Err(err) = &result {
            debug!(%line, %err, "command failed");
        }
        result.into()
    }

    async fn interpret(&mut self, line: &str, tokens: &[String]) -> Result<String, CommandError> {
        let Some((verb, args)) = tokens.split_first() else {
            return Err(CommandError::InvalidArgument("Empty command".to_string()));
        };

        match Builtin::from_verb(verb) {
            Some(builtin) => {
                commands::dispatch(builtin, args, &mut self.state, self.shell.as_ref()).await
            }
            None => {
                debug!(%verb, "passing through to host shell");
                let output = self
                    .shell
                    .run(line, self.state.cwd.path(), self.timeout)
                    .await?;
                Ok(output.render())
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "command panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::PathPolicy;
    use crate::shell::{DisabledShell, HostOutput};
    use futures::future::BoxFuture;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    fn interpreter_in(dir: &Path) -> CommandInterpreter {
        interpreter_with(dir, Arc::new(SystemShell::default()), Duration::from_secs(10))
    }

    fn interpreter_with(
        dir: &Path,
        shell: Arc<dyn HostShell>,
        timeout: Duration,
    ) -> CommandInterpreter {
        let state = InterpreterState::new(
            CurrentDir::new(dir).unwrap(),
            100,
            PathPolicy::Permissive,
        );
        CommandInterpreter::new(state, shell, timeout)
    }

    struct PanickingShell;

    impl HostShell for PanickingShell {
        fn run<'a>(
            &'a self,
            _line: &'a str,
            _cwd: &'a Path,
            _limit: Duration,
        ) -> BoxFuture<'a, Result<HostOutput, CommandError>> {
            panic!("shell exploded")
        }
    }

    #[test]
    fn test_tokenize_quotes_and_fallback() {
        assert_eq!(tokenize("mkdir \"my dir\""), vec!["mkdir", "my dir"]);
        assert_eq!(tokenize("  ls   -la  "), vec!["ls", "-la"]);
        // Unbalanced quote falls back to whitespace split.
        assert_eq!(tokenize("echo \"oops"), vec!["echo", "\"oops"]);
    }

    #[test]
    fn test_tokenize_keeps_hash_words() {
        assert_eq!(tokenize("echo hello #world"), vec!["echo", "hello", "#world"]);
        assert_eq!(tokenize("grep #include main.c"), vec!["grep", "#include", "main.c"]);
        assert_eq!(tokenize("echo a#b '#q' \"#d\""), vec!["echo", "a#b", "#q", "#d"]);
        assert_eq!(tokenize("echo \\#x"), vec!["echo", "#x"]);
    }

    #[tokio::test]
    async fn test_hash_operands_reach_builtins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.c"), "#include <stdio.h>\nint main;\n").unwrap();
        let mut interp = interpreter_in(dir.path());

        assert_eq!(interp.execute("echo a #b").await, "a #b");
        assert_eq!(interp.execute("grep #include main.c").await, "1: #include <stdio.h>");
    }

    struct RecordingShell {
        lines: Mutex<Vec<String>>,
    }

    impl HostShell for RecordingShell {
        fn run<'a>(
            &'a self,
            line: &'a str,
            _cwd: &'a Path,
            _limit: Duration,
        ) -> BoxFuture<'a, Result<HostOutput, CommandError>> {
            if let Ok(mut lines) = self.lines.lock() {
                lines.push(line.to_string());
            }
            async move { Ok(HostOutput::default()) }.boxed()
        }
    }

    #[tokio::test]
    async fn test_raw_line_recorded_and_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let shell = Arc::new(RecordingShell {
            lines: Mutex::new(Vec::new()),
        });
        let mut interp = interpreter_with(dir.path(), shell.clone(), Duration::from_secs(1));

        interp.execute("  uname   -a  ").await;
        interp.execute(" echo spaced ").await;

        assert_eq!(*shell.lines.lock().unwrap(), vec!["  uname   -a  ".to_string()]);
        let commands: Vec<&str> = interp.state().history.recent(10).map(|e| e.command()).collect();
        assert_eq!(commands, vec!["  uname   -a  ", " echo spaced "]);
    }

    #[tokio::test]
    async fn test_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_in(dir.path());

        interp.execute("echo hi").await;
        interp.execute("pwd").await;

        let commands: Vec<&str> = interp.state().history.recent(10).map(|e| e.command()).collect();
        assert_eq!(commands, vec!["echo hi", "pwd"]);
    }

    #[tokio::test]
    async fn test_empty_input_rejected_and_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_in(dir.path());

        assert_eq!(interp.execute("   ").await, "Error: Empty command");
        assert!(interp.state().history.is_empty());
    }

    #[tokio::test]
    async fn test_cd_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_in(dir.path());

        interp.execute("mkdir foo").await;
        interp.execute("cd foo").await;
        assert!(interp.execute("pwd").await.ends_with("foo"));

        interp.execute("cd ..").await;
        assert_eq!(interp.execute("pwd").await, dir.path().display().to_string());
    }

    #[tokio::test]
    async fn test_cd_nonexistent_keeps_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_in(dir.path());

        let out = interp.execute("cd nonexistent").await;
        assert!(out.starts_with("Error: "), "{out}");
        assert_eq!(interp.state().cwd.path(), dir.path());
    }

    #[tokio::test]
    async fn test_verbs_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_in(dir.path());

        assert_eq!(interp.execute("PWD").await, dir.path().display().to_string());
        assert_eq!(interp.execute("Echo a  b").await, "a b");
    }

    #[tokio::test]
    async fn test_quoted_operands() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_in(dir.path());

        interp.execute("mkdir \"two words\"").await;
        assert!(dir.path().join("two words").is_dir());
    }

    #[tokio::test]
    async fn test_mkdir_twice_and_touch_cat() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_in(dir.path());

        let first = interp.execute("mkdir x").await;
        assert_eq!(first, format!("Directory created: {}", dir.path().join("x").display()));

        let second = interp.run("mkdir x").await;
        assert!(matches!(second.error, Some(CommandError::AlreadyExists(_))));
        assert!(second.output.starts_with("Error: "));

        interp.execute("touch notes.txt").await;
        assert_eq!(interp.execute("cat notes.txt").await, "(empty file)");
    }

    #[tokio::test]
    async fn test_missing_operands() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_in(dir.path());

        let result = interp.run("mkdir").await;
        assert_eq!(result.error, Some(CommandError::InvalidArgument("Directory name required".into())));
        assert_eq!(result.output, "Error: Directory name required");

        assert_eq!(interp.execute("kill").await, "Error: Process ID required");
        assert_eq!(interp.execute("kill abc").await, "Error: Invalid process ID");
    }

    #[tokio::test]
    async fn test_passthrough_runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("work")).unwrap();
        let mut interp = interpreter_in(dir.path());

        interp.execute("cd work").await;
        let out = interp.execute("/bin/pwd").await;
        assert_eq!(out, dir.path().join("work").display().to_string());

        assert_eq!(interp.execute("true").await, "Command executed successfully");
        assert_eq!(interp.execute("printf 'a b'").await, "a b");
    }

    #[tokio::test]
    async fn test_passthrough_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let limit = Duration::from_millis(300);
        let mut interp = interpreter_with(dir.path(), Arc::new(SystemShell::default()), limit);

        let result = interp.run("sleep 5").await;
        assert_eq!(result.error, Some(CommandError::Timeout(limit)));
        assert_eq!(result.output, "Error: Command timed out after 300ms");
    }

    #[tokio::test]
    async fn test_disabled_shell_unknown_verb() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_with(dir.path(), Arc::new(DisabledShell), Duration::from_secs(1));

        assert_eq!(interp.execute("uptime").await, "Error: Unknown command: uptime");
        assert_eq!(interp.execute("echo still works").await, "still works");
    }

    #[tokio::test]
    async fn test_panics_become_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_with(dir.path(), Arc::new(PanickingShell), Duration::from_secs(1));

        let result = interp.run("boom").await;
        assert_eq!(result.error, Some(CommandError::Unknown("shell exploded".into())));
        assert_eq!(result.output, "Error: shell exploded");

        assert_eq!(interp.execute("echo alive").await, "alive");
    }

    #[tokio::test]
    async fn test_history_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter_in(dir.path());

        for i in 0..150 {
            interp.execute(&format!("echo {i}")).await;
        }

        let history = &interp.state().history;
        assert_eq!(history.len(), 100);
        assert_eq!(history.recent(1).next().unwrap().command(), "echo 149");
        assert_eq!(history.recent(100).next().unwrap().command(), "echo 50");
    }
}
