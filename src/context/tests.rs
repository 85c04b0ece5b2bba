//! Tests for session state and operand resolution.

use std::fs;
use std::path::PathBuf;

use crate::commands::CommandError;
use crate::context::{CurrentDir, InterpreterState};
use crate::security::PathPolicy;

fn state_in(dir: &std::path::Path, policy: PathPolicy) -> InterpreterState {
    InterpreterState::new(CurrentDir::new(dir).unwrap(), 100, policy)
}

#[test]
fn test_resolve_relative_against_cwd() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(dir.path(), PathPolicy::Permissive);

    assert_eq!(state.resolve("a.txt").unwrap(), dir.path().join("a.txt"));
    assert_eq!(state.resolve("/etc").unwrap(), PathBuf::from("/etc"));
}

#[test]
fn test_permissive_allows_parent_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(dir.path(), PathPolicy::Permissive);

    let parent = dir.path().parent().unwrap().to_path_buf();
    assert_eq!(state.resolve("..").unwrap(), parent);
}

#[test]
fn test_confined_rejects_escape() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(dir.path(), PathPolicy::Confined);

    assert!(matches!(
        state.resolve("../outside"),
        Err(CommandError::PermissionDenied(_))
    ));
    assert!(matches!(
        state.resolve("/etc/passwd"),
        Err(CommandError::PermissionDenied(_))
    ));
    assert_eq!(state.resolve("inside").unwrap(), dir.path().join("inside"));
}

#[test]
fn test_cwd_change_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("foo")).unwrap();
    let mut state = state_in(dir.path(), PathPolicy::Permissive);

    let target = state.resolve("foo").unwrap();
    state.cwd.change_to(target).unwrap();
    assert!(state.cwd.path().ends_with("foo"));

    let back = state.resolve("..").unwrap();
    state.cwd.change_to(back).unwrap();
    assert_eq!(state.cwd.path(), dir.path());
}

#[test]
fn test_history_capacity_from_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = InterpreterState::new(CurrentDir::new(dir.path()).unwrap(), 3, PathPolicy::Permissive);

    for cmd in ["a", "b", "c", "d"] {
        state.history.push(cmd);
    }

    assert_eq!(state.history.len(), 3);
    assert_eq!(state.history.records(10)[0].command, "b");
}
