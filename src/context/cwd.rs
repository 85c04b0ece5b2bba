//! Current working directory tracking.
//!
//! The session directory is interpreter state only; the process working
//! directory is never changed. Every mutation is validated so the tracked
//! path always names an existing directory.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::commands::CommandError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentDir {
    path: PathBuf,
}

impl CurrentDir {
    /// Capture the current working directory from the process.
    pub fn capture() -> Option<Self> {
        let path = env::current_dir().ok()?;
        Self::new(path).ok()
    }

    /// Start tracking `path`, which must be an absolute existing directory.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CommandError> {
        let path = path.into();
        validate(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move to `target`. On failure the tracked directory is left unchanged.
    pub fn change_to(&mut self, target: PathBuf) -> Result<(), CommandError> {
        validate(&target)?;
        self.path = target;
        Ok(())
    }
}

impl Default for CurrentDir {
    fn default() -> Self {
        Self::capture()
            .or_else(|| dirs::home_dir().and_then(|home| Self::new(home).ok()))
            .unwrap_or_else(|| Self {
                path: PathBuf::from("/"),
            })
    }
}

impl fmt::Display for CurrentDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn validate(path: &Path) -> Result<(), CommandError> {
    if !path.is_absolute() {
        return Err(CommandError::InvalidArgument(format!(
            "'{}' is not an absolute path",
            path.display()
        )));
    }
    let metadata = fs::metadata(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => {
            CommandError::NotFound(format!("Directory '{}' does not exist", path.display()))
        }
        _ => CommandError::from_io(err, path),
    })?;
    if !metadata.is_dir() {
        return Err(CommandError::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        assert!(CurrentDir::new(dir.path()).is_ok());
        assert!(matches!(
            CurrentDir::new(&file),
            Err(CommandError::NotADirectory(_))
        ));
        assert!(matches!(
            CurrentDir::new(dir.path().join("missing")),
            Err(CommandError::NotFound(_))
        ));
    }

    #[test]
    fn test_relative_rejected() {
        assert!(matches!(
            CurrentDir::new("relative/dir"),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_failed_change_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let mut cwd = CurrentDir::new(dir.path()).unwrap();

        let result = cwd.change_to(dir.path().join("nowhere"));

        assert!(result.is_err());
        assert_eq!(cwd.path(), dir.path());
    }

    #[test]
    fn test_display() {
        let cwd = CurrentDir::new("/").unwrap();
        assert_eq!(cwd.to_string(), "/");
    }
}
