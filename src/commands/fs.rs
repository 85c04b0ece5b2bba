//! Filesystem builtins: ls, cd, mkdir, rm, cp, mv, cat, touch, find, grep.
//!
//! Every operand is resolved against the session directory before the
//! filesystem is touched, and operand counts are checked before anything is
//! resolved.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::Glob;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::{require, require_pair, CommandError};
use crate::context::InterpreterState;
use crate::security::PathPolicy;

/// Output of `cat` on a zero-length file.
pub const EMPTY_FILE: &str = "(empty file)";
/// Output of `find` when nothing matched.
pub const NO_FILES_FOUND: &str = "No files found";
/// Output of `grep` when nothing matched.
pub const NO_MATCHES_FOUND: &str = "No matches found";

/// `ls [path]`: one `[DIR]`/`[FILE]` line per entry, sorted.
pub fn list(args: &[String], state: &InterpreterState) -> Result<String, CommandError> {
    let path = match args.first() {
        Some(raw) => state.resolve(raw)?,
        None => state.cwd.path().to_path_buf(),
    };

    let entries = fs::read_dir(&path).map_err(|e| CommandError::from_io(e, &path))?;
    let mut lines = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CommandError::from_io(e, &path))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        // Follow symlinks like a plain stat; fall back to the link itself when dangling.
        let metadata = fs::metadata(entry.path())
            .or_else(|_| entry.metadata())
            .map_err(|e| CommandError::from_io(e, &entry.path()))?;
        if metadata.is_dir() {
            lines.push(format!("[DIR]  {}", name));
        } else {
            lines.push(format!("[FILE] {} ({} bytes)", name, metadata.len()));
        }
    }

    lines.sort();
    Ok(lines.join("\n"))
}

/// `cd [path]`: no operand means the home directory, which a confined
/// session refuses.
pub fn change_dir(args: &[String], state: &mut InterpreterState) -> Result<String, CommandError> {
    let target = match args.first() {
        Some(raw) => state.resolve(raw)?,
        None if state.policy() == PathPolicy::Confined => {
            return Err(CommandError::PermissionDenied(
                "home directory is outside the working directory".to_string(),
            ));
        }
        None => dirs::home_dir().ok_or_else(|| {
            CommandError::NotFound("Home directory could not be determined".to_string())
        })?,
    };

    state.cwd.change_to(target)?;
    info!(cwd = %state.cwd, "changed directory");
    Ok(format!("Changed directory to: {}", state.cwd))
}

/// `mkdir <name>`: creates missing parents, refuses an existing path.
pub fn make_dir(args: &[String], state: &InterpreterState) -> Result<String, CommandError> {
    let raw = require(args, 0, "Directory name required")?;
    let path = state.resolve(raw)?;

    if fs::symlink_metadata(&path).is_ok() {
        return Err(CommandError::AlreadyExists(format!(
            "Directory '{}' already exists",
            path.display()
        )));
    }
    fs::create_dir_all(&path).map_err(|e| CommandError::from_io(e, &path))?;
    Ok(format!("Directory created: {}", path.display()))
}

/// `rm <path>`: directories only when empty, files unconditionally.
pub fn remove(args: &[String], state: &InterpreterState) -> Result<String, CommandError> {
    let raw = require(args, 0, "Path required")?;
    let path = state.resolve(raw)?;

    let metadata = fs::symlink_metadata(&path).map_err(|e| CommandError::from_io(e, &path))?;
    if metadata.is_dir() {
        fs::remove_dir(&path).map_err(|e| CommandError::from_io(e, &path))?;
        Ok(format!("Directory removed: {}", path.display()))
    } else {
        fs::remove_file(&path).map_err(|e| CommandError::from_io(e, &path))?;
        Ok(format!("File removed: {}", path.display()))
    }
}

/// `cp <src> <dst>`: copies file contents, permissions and timestamps.
pub fn copy(args: &[String], state: &InterpreterState) -> Result<String, CommandError> {
    let (src_raw, dst_raw) = require_pair(args, "Source and destination required")?;
    let src = state.resolve(src_raw)?;
    let dst = state.resolve(dst_raw)?;

    let metadata = fs::metadata(&src).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            CommandError::NotFound(format!("Source file '{}' not found", src.display()))
        }
        _ => CommandError::from_io(e, &src),
    })?;
    if metadata.is_dir() {
        return Err(CommandError::InvalidArgument(format!(
            "'{}' is a directory",
            src.display()
        )));
    }

    let dst = into_directory(&src, dst);
    copy_file(&src, &dst, &metadata)?;
    Ok(format!("Copied '{}' to '{}'", src.display(), dst.display()))
}

/// `mv <src> <dst>`: rename, falling back to copy + delete across filesystems.
pub fn rename(args: &[String], state: &InterpreterState) -> Result<String, CommandError> {
    let (src_raw, dst_raw) = require_pair(args, "Source and destination required")?;
    let src = state.resolve(src_raw)?;
    let dst = state.resolve(dst_raw)?;

    let metadata = fs::symlink_metadata(&src).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            CommandError::NotFound(format!("Source '{}' not found", src.display()))
        }
        _ => CommandError::from_io(e, &src),
    })?;

    let dst = into_directory(&src, dst);
    match fs::rename(&src, &dst) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(src = %src.display(), dst = %dst.display(), "rename crosses devices, copying");
            move_across_devices(&src, &dst, &metadata)?;
        }
        Err(e) => return Err(CommandError::from_io(e, &src)),
    }
    Ok(format!("Moved '{}' to '{}'", src.display(), dst.display()))
}

/// `cat <path>`: whole file as UTF-8 text.
pub fn read_file(args: &[String], state: &InterpreterState) -> Result<String, CommandError> {
    let raw = require(args, 0, "Filename required")?;
    let path = state.resolve(raw)?;

    let text = read_text(&path)?;
    if text.is_empty() {
        Ok(EMPTY_FILE.to_string())
    } else {
        Ok(text)
    }
}

/// `touch <path>`: open for append and close; existing content is untouched.
pub fn create_file(args: &[String], state: &InterpreterState) -> Result<String, CommandError> {
    let raw = require(args, 0, "Filename required")?;
    let path = state.resolve(raw)?;

    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| CommandError::from_io(e, &path))?;
    Ok(format!("File created: {}", path.display()))
}

/// `find <pattern> [path]`: recursive glob match on file names.
pub fn find(args: &[String], state: &InterpreterState) -> Result<String, CommandError> {
    let pattern = require(args, 0, "Search pattern required")?;
    let root = match args.get(1) {
        Some(raw) => state.resolve(raw)?,
        None => state.cwd.path().to_path_buf(),
    };

    let matcher = Glob::new(pattern)
        .map_err(|e| CommandError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e)))?
        .compile_matcher();
    fs::metadata(&root).map_err(|e| CommandError::from_io(e, &root))?;

    let mut matches = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(%err, "find: skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            matches.push(entry.path().display().to_string());
        }
    }

    if matches.is_empty() {
        Ok(NO_FILES_FOUND.to_string())
    } else {
        Ok(matches.join("\n"))
    }
}

/// `grep <pattern> <path>`: case-insensitive substring search per line.
pub fn search_file(args: &[String], state: &InterpreterState) -> Result<String, CommandError> {
    let (pattern, raw) = require_pair(args, "Pattern and filename required")?;
    let path = state.resolve(raw)?;

    let text = read_text(&path)?;
    let needle = pattern.to_lowercase();
    let matches: Vec<String> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| line.to_lowercase().contains(&needle))
        .map(|(i, line)| format!("{}: {}", i + 1, line.trim()))
        .collect();

    if matches.is_empty() {
        Ok(NO_MATCHES_FOUND.to_string())
    } else {
        Ok(matches.join("\n"))
    }
}

fn read_text(path: &Path) -> Result<String, CommandError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            CommandError::NotFound(format!("File '{}' not found", path.display()))
        }
        _ => CommandError::from_io(e, path),
    })?;
    String::from_utf8(bytes)
        .map_err(|_| CommandError::Decode(format!("Cannot read binary file '{}'", path.display())))
}

/// An existing directory destination receives the source under its own name.
fn into_directory(src: &Path, dst: PathBuf) -> PathBuf {
    match src.file_name() {
        Some(name) if dst.is_dir() => dst.join(name),
        _ => dst,
    }
}

fn copy_file(src: &Path, dst: &Path, metadata: &fs::Metadata) -> Result<(), CommandError> {
    fs::copy(src, dst).map_err(|e| CommandError::from_io(e, dst))?;
    preserve_times(metadata, dst);
    Ok(())
}

fn preserve_times(metadata: &fs::Metadata, dst: &Path) {
    let mut times = fs::FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    let applied = fs::OpenOptions::new()
        .write(true)
        .open(dst)
        .and_then(|file| file.set_times(times));
    if let Err(err) = applied {
        debug!(dst = %dst.display(), %err, "could not preserve timestamps");
    }
}

fn move_across_devices(src: &Path, dst: &Path, metadata: &fs::Metadata) -> Result<(), CommandError> {
    if metadata.is_dir() {
        for entry in WalkDir::new(src) {
            let entry = entry.map_err(|e| walk_error(e, src))?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| CommandError::Unknown(e.to_string()))?;
            let target = dst.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(|e| CommandError::from_io(e, &target))?;
            } else {
                let file_meta = entry.metadata().map_err(|e| walk_error(e, entry.path()))?;
                copy_file(entry.path(), &target, &file_meta)?;
            }
        }
        fs::remove_dir_all(src).map_err(|e| CommandError::from_io(e, src))
    } else {
        copy_file(src, dst, metadata)?;
        fs::remove_file(src).map_err(|e| CommandError::from_io(e, src))
    }
}

fn walk_error(err: walkdir::Error, fallback: &Path) -> CommandError {
    let path = err.path().unwrap_or(fallback).to_path_buf();
    match err.into_io_error() {
        Some(io_err) => CommandError::from_io(io_err, &path),
        None => CommandError::Unknown(format!("Filesystem loop at '{}'", path.display())),
    }
}
