//! Phrase tables for the natural-language translator.
//!
//! Templates use `{}` for each captured operand. Order matters: the first
//! matching pattern wins.

/// `(pattern, command template)` pairs, tried in order with search semantics.
pub const PHRASE_RULES: &[(&str, &str)] = &[
    (
        r"create (?:a )?(?:new )?(?:folder|directory) (?:called |named )?([^\s]+)",
        "mkdir {}",
    ),
    (
        r"make (?:a )?(?:new )?(?:folder|directory) (?:called |named )?([^\s]+)",
        "mkdir {}",
    ),
    (
        r"create (?:a )?(?:new )?file (?:called |named )?([^\s]+)",
        "touch {}",
    ),
    (r"remove (?:the )?(?:file|folder|directory) ([^\s]+)", "rm {}"),
    (r"delete (?:the )?(?:file|folder|directory) ([^\s]+)", "rm {}"),
    (r"(?:list|show) (?:all )?(?:the )?files?(?: in ([^\s]+))?", "ls {}"),
    (
        r"show me (?:all )?(?:the )?(?:files?|contents?)(?: (?:in|of) ([^\s]+))?",
        "ls {}",
    ),
    (r"find (?:all )?(?:files? )?(?:called |named )?([^\s]+)", "find {}"),
    (
        r"(?:show|display|read) (?:the )?(?:contents? of )?(?:file )?([^\s]+)",
        "cat {}",
    ),
    (r"what(?:'s| is) the current (?:directory|folder)", "pwd"),
    (r"where am i", "pwd"),
    (r"who am i", "whoami"),
    (r"go to (?:the )?(?:directory|folder) ([^\s]+)", "cd {}"),
];

/// Substring triggers checked once no phrase rule matched.
#[derive(Debug)]
pub struct ExtensionRule {
    pub triggers: &'static [&'static str],
    pub command: &'static str,
    pub explanation: &'static str,
}

pub const EXTENSION_RULES: &[ExtensionRule] = &[ExtensionRule {
    triggers: &["python files", ".py files"],
    command: "find *.py",
    explanation: "Searching for Python files",
}];
