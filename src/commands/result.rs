//! Error taxonomy and result shape shared by every builtin.
//!
//! Handlers return `Result<String, CommandError>`; the interpreter folds that
//! into a [`CommandResult`] whose `output` is ready for display.

use std::io;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// Failure classes a command can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Missing or malformed operands.
    #[error("{0}")]
    InvalidArgument(String),

    /// Path or process absent.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("'{0}' is not a directory")]
    NotADirectory(String),

    #[error("Directory '{0}' is not empty")]
    DirectoryNotEmpty(String),

    /// Non-text content read as text.
    #[error("{0}")]
    Decode(String),

    /// Host shell exceeded its wall-clock limit.
    #[error("Command timed out after {0:?}")]
    Timeout(Duration),

    /// Anything not covered above, wrapped with its message.
    #[error("{0}")]
    Unknown(String),
}

impl CommandError {
    /// Classify an io failure that happened while operating on `path`.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let shown = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(format!("Path '{shown}' does not exist")),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(shown),
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(format!("'{shown}' already exists")),
            io::ErrorKind::NotADirectory => Self::NotADirectory(shown),
            io::ErrorKind::DirectoryNotEmpty => Self::DirectoryNotEmpty(shown),
            io::ErrorKind::IsADirectory => Self::InvalidArgument(format!("'{shown}' is a directory")),
            io::ErrorKind::InvalidData => Self::Decode(format!("Cannot read binary file '{shown}'")),
            _ => Self::Unknown(err.to_string()),
        }
    }
}

/// Outcome of one interpreted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Display text. Failures carry the `Error: ` prefix.
    pub output: String,
    /// The failure behind `output`, if any.
    pub error: Option<CommandError>,
}

impl CommandResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl From<CommandError> for CommandResult {
    fn from(err: CommandError) -> Self {
        Self {
            output: format!("Error: {err}"),
            error: Some(err),
        }
    }
}

impl From<Result<String, CommandError>> for CommandResult {
    fn from(result: Result<String, CommandError>) -> Self {
        match result {
            Ok(output) => Self::ok(output),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_renders_with_prefix() {
        let result: CommandResult = CommandError::InvalidArgument("Path required".into()).into();
        assert_eq!(result.output, "Error: Path required");
        assert!(result.is_error());
    }

    #[test]
    fn test_ok_result() {
        let result: CommandResult = Ok::<_, CommandError>("done".to_string()).into();
        assert_eq!(result.output, "done");
        assert!(!result.is_error());
    }

    #[test]
    fn test_from_io_classification() {
        let path = Path::new("/tmp/x");
        let cases = vec![
            (io::ErrorKind::NotFound, "NotFound"),
            (io::ErrorKind::PermissionDenied, "PermissionDenied"),
            (io::ErrorKind::AlreadyExists, "AlreadyExists"),
            (io::ErrorKind::DirectoryNotEmpty, "DirectoryNotEmpty"),
            (io::ErrorKind::InvalidData, "Decode"),
            (io::ErrorKind::Other, "Unknown"),
        ];

        for (kind, expected) in cases {
            let err = CommandError::from_io(io::Error::from(kind), path);
            let name = format!("{err:?}");
            assert!(name.starts_with(expected), "{kind:?} mapped to {name}");
        }
    }

    #[test]
    fn test_timeout_message() {
        let err = CommandError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Command timed out after 30s");
    }

    #[test]
    fn test_not_found_message_names_path() {
        let err = CommandError::from_io(io::Error::from(io::ErrorKind::NotFound), Path::new("/nope"));
        assert_eq!(err.to_string(), "Path '/nope' does not exist");
    }
}
