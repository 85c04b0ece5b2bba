//! Path safety policy for filesystem operands.
//!
//! Builtins resolve every operand against the session's working directory.
//! This module decides whether a raw operand may be resolved at all.

mod guard;

pub use guard::{validate_path, PathPolicy};
