//! Natural-language front end.
//!
//! Turns plain-English requests ("create a folder called test") into builtin
//! command lines. Translation is purely pattern based and deterministic.

mod rules;
mod translator;

pub use translator::{Translation, TranslationRule, Translator};

/// Prefixes that mark input as a natural-language request.
pub const AI_INDICATORS: &[&str] = &[
    "create", "make", "show me", "list all", "find", "search", "what is",
];

/// Leading marker that forces natural-language handling.
pub const FORCE_PREFIX: char = '?';

/// Whether `input` should be routed to the translator.
pub fn is_natural_language(input: &str) -> bool {
    let lowered = input.trim_start().to_lowercase();
    AI_INDICATORS
        .iter()
        .any(|indicator| lowered.starts_with(indicator))
}
