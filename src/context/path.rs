//! Lexical path resolution against the session working directory.

use std::path::{Component, Path, PathBuf};

/// Resolve a user-supplied operand against `cwd`.
///
/// Relative operands are joined to `cwd`; the result is normalized with
/// [`normalize`]. The filesystem is never consulted, so existence and type
/// checks stay with the caller.
pub fn resolve(raw: &str, cwd: &Path) -> PathBuf {
    let candidate = Path::new(raw);
    if candidate.is_absolute() {
        normalize(candidate)
    } else {
        normalize(&cwd.join(candidate))
    }
}

/// Collapse `.` and `..` segments without touching the filesystem.
///
/// `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
