//! Informational builtins that never touch the filesystem.

use chrono::Local;
use nix::unistd::{getuid, User};

use super::CommandError;
use crate::context::InterpreterState;
use crate::shell::HostShell;
use crate::system;

/// ANSI "erase display" followed by "cursor home".
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub const HELP_TEXT: &str = "\
Available Commands:

File Operations:
  ls/dir [path]      - List directory contents
  cd [path]          - Change directory (no path: home)
  pwd                - Show current directory
  mkdir <name>       - Create directory
  rm/rmdir <path>    - Remove file or empty directory
  cp <src> <dst>     - Copy file
  mv <src> <dst>     - Move/rename file
  cat <file>         - Display file contents
  touch <file>       - Create empty file
  find <pattern> [path] - Find files matching pattern
  grep <text> <file> - Search text in file

System Operations:
  ps                 - List processes
  kill <pid>         - Terminate process
  top                - Show top processes
  sysinfo            - System information
  whoami             - Current user
  date               - Current date/time

Utility:
  echo <text>        - Print text
  clear              - Clear screen
  help               - Show this help
  history            - Command history

Anything else is run by the host shell.

Natural Language (prefix with '?' to force):
  create a folder called test
  search python files
  what is the current directory";

pub fn echo(args: &[String]) -> String {
    args.join(" ")
}

pub fn print_dir(state: &InterpreterState) -> String {
    state.cwd.to_string()
}

/// Login name: passwd entry, then `$USER`, then `user`.
pub fn whoami() -> String {
    if let Ok(Some(user)) = User::from_uid(getuid()) {
        return user.name;
    }
    std::env::var("USER")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "user".to_string())
}

pub fn date() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn history(state: &InterpreterState) -> String {
    state.history.render()
}

pub async fn sysinfo(state: &InterpreterState, shell: &dyn HostShell) -> Result<String, CommandError> {
    system::detailed_report(shell, state.cwd.path()).await
}
