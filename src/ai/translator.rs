//! Pattern-based natural-language translator.
//!
//! Maps a small set of English phrasings onto builtin command lines. There is
//! no model behind it: queries are lowercased, matched against the phrase table (first match
//! wins) and only then against the extension triggers.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::{ExtensionRule, EXTENSION_RULES, PHRASE_RULES};

/// Outcome of translating one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub requires_execution: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub command: Option<String>,
    pub explanation: String,
}

impl Translation {
    fn execute(command: String, explanation: String) -> Self {
        Self {
            requires_execution: true,
            command: Some(command),
            explanation,
        }
    }

    fn not_understood(query: &str) -> Self {
        Self {
            requires_execution: false,
            command: None,
            explanation: format!(
                "I couldn't understand \"{}\". Try using specific commands like \"ls\", \"mkdir test\", or \"show me all files\".",
                query
            ),
        }
    }
}

/// One compiled phrase rule.
#[derive(Debug, Clone)]
pub struct TranslationRule {
    pattern: Regex,
    template: &'static str,
}

impl TranslationRule {
    pub fn new(pattern: &str, template: &'static str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { pattern, template })
    }

    /// Command line for `query`, if this rule matches anywhere in it.
    pub fn apply(&self, query: &str) -> Option<String> {
        let caps = self.pattern.captures(query)?;
        let args: Vec<&str> = caps
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        Some(fill_template(self.template, &args))
    }
}

fn fill_template(template: &str, args: &[&str]) -> String {
    let slots = template.matches("{}").count();
    if slots == 0 {
        return template.to_string();
    }
    if args.is_empty() {
        return template.replace(" {}", "");
    }
    if args.len() < slots {
        return template.split_whitespace().next().unwrap_or(template).to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    for arg in args.iter().take(slots) {
        if let Some((head, tail)) = rest.split_once("{}") {
            out.push_str(head);
            out.push_str(arg);
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

/// Immutable rule set built once per process.
#[derive(Debug, Clone)]
pub struct Translator {
    rules: Vec<TranslationRule>,
    extensions: &'static [ExtensionRule],
}

impl Translator {
    pub fn new() -> Result<Self, regex::Error> {
        let rules = PHRASE_RULES
            .iter()
            .map(|&(pattern, template)| TranslationRule::new(pattern, template))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules,
            extensions: EXTENSION_RULES,
        })
    }

    pub fn translate(&self, query: &str) -> Translation {
        let query = query.trim().to_lowercase();

        for rule in &self.rules {
            if let Some(command) = rule.apply(&query) {
                debug!(%query, %command, "phrase rule matched");
                let explanation = format!("Interpreting \"{}\" as: {}", query, command);
                return Translation::execute(command, explanation);
            }
        }

        if let Some(ext) = self
            .extensions
            .iter()
            .find(|ext| ext.triggers.iter().any(|t| query.contains(t)))
        {
            debug!(%query, command = ext.command, "extension rule matched");
            return Translation::execute(ext.command.to_string(), ext.explanation.to_string());
        }

        debug!(%query, "no translation rule matched");
        Translation::not_understood(&query)
    }
}
