//! Directory traversal guard.
//!
//! `validate_path` is the traversal check. It only takes effect when the
//! session runs under [`PathPolicy::Confined`]; the default policy resolves
//! any operand, including absolute paths and `..` segments.

/// How strictly raw path operands are checked before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathPolicy {
    /// Every operand is resolved as given.
    #[default]
    Permissive,
    /// Operands must stay beneath the working directory.
    Confined,
}

impl PathPolicy {
    /// Returns true if `raw` may be resolved under this policy.
    pub fn allows(self, raw: &str) -> bool {
        match self {
            PathPolicy::Permissive => true,
            PathPolicy::Confined => validate_path(raw),
        }
    }
}

/// Check whether a path operand is safe to use.
///
/// # Rules
/// - Reject: any `..` (parent traversal)
/// - Reject: absolute paths (leading `/`)
/// - Allow: everything else
pub fn validate_path(path: &str) -> bool {
    !(path.contains("..") || path.starts_with('/'))
}
