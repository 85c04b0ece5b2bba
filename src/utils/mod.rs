//! Utility modules for common functionality.
//!
//! Currently only the logging setup used by the REPL binary.

pub mod logger;
