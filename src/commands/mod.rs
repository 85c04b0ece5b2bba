//! Builtin command set.
//!
//! A builtin is recognised by its (case-insensitive) verb and runs in-process
//! against the session state. Anything unrecognised is left to the caller,
//! which forwards it to the host shell.

mod fs;
mod info;
mod process;
mod result;

use tracing::debug;

use crate::context::InterpreterState;
use crate::shell::HostShell;
use crate::system::ProcessView;

pub use info::{CLEAR_SCREEN, HELP_TEXT};
pub use result::{CommandError, CommandResult};

/// Every verb handled in-process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    List,
    ChangeDir,
    PrintDir,
    MakeDir,
    Remove,
    Copy,
    Move,
    Cat,
    Echo,
    Touch,
    Find,
    Grep,
    Ps,
    Kill,
    Top,
    WhoAmI,
    Date,
    Clear,
    Help,
    History,
    SysInfo,
}

impl Builtin {
    pub fn from_verb(verb: &str) -> Option<Self> {
        let builtin = match verb.to_ascii_lowercase().as_str() {
            "ls" | "dir" => Self::List,
            "cd" => Self::ChangeDir,
            "pwd" => Self::PrintDir,
            "mkdir" => Self::MakeDir,
            "rm" | "rmdir" => Self::Remove,
            "cp" => Self::Copy,
            "mv" => Self::Move,
            "cat" => Self::Cat,
            "echo" => Self::Echo,
            "touch" => Self::Touch,
            "find" => Self::Find,
            "grep" => Self::Grep,
            "ps" => Self::Ps,
            "kill" => Self::Kill,
            "top" => Self::Top,
            "whoami" => Self::WhoAmI,
            "date" => Self::Date,
            "clear" => Self::Clear,
            "help" => Self::Help,
            "history" => Self::History,
            "sysinfo" => Self::SysInfo,
            _ => return None,
        };
        Some(builtin)
    }
}

/// Run a builtin with its operands (verb already stripped).
pub async fn dispatch(
    builtin: Builtin,
    args: &[String],
    state: &mut InterpreterState,
    shell: &dyn HostShell,
) -> Result<String, CommandError> {
    debug!(?builtin, argc = args.len(), "dispatching builtin");
    match builtin {
        Builtin::List => fs::list(args, state),
        Builtin::ChangeDir => fs::change_dir(args, state),
        Builtin::PrintDir => Ok(info::print_dir(state)),
        Builtin::MakeDir => fs::make_dir(args, state),
        Builtin::Remove => fs::remove(args, state),
        Builtin::Copy => fs::copy(args, state),
        Builtin::Move => fs::rename(args, state),
        Builtin::Cat => fs::read_file(args, state),
        Builtin::Echo => Ok(info::echo(args)),
        Builtin::Touch => fs::create_file(args, state),
        Builtin::Find => fs::find(args, state),
        Builtin::Grep => fs::search_file(args, state),
        Builtin::Ps => process::snapshot(ProcessView::List, state, shell).await,
        Builtin::Kill => process::terminate(args),
        Builtin::Top => process::snapshot(ProcessView::Top, state, shell).await,
        Builtin::WhoAmI => Ok(info::whoami()),
        Builtin::Date => Ok(info::date()),
        Builtin::Clear => Ok(CLEAR_SCREEN.to_string()),
        Builtin::Help => Ok(HELP_TEXT.to_string()),
        Builtin::History => Ok(info::history(state)),
        Builtin::SysInfo => info::sysinfo(state, shell).await,
    }
}

/// Operand at `idx`, or `InvalidArgument(missing)`.
fn require<'a>(args: &'a [String], idx: usize, missing: &str) -> Result<&'a str, CommandError> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| CommandError::InvalidArgument(missing.to_string()))
}

fn require_pair<'a>(args: &'a [String], missing: &str) -> Result<(&'a str, &'a str), CommandError> {
    match args {
        [first, second, ..] => Ok((first.as_str(), second.as_str())),
        _ => Err(CommandError::InvalidArgument(missing.to_string())),
    }
}
