//! Command catalog: built-in commands and bundled document descriptions.

use crate::Result;
use crate::models::{DocumentPath, Tier};
use crate::parser::FrontmatterParser;
use crate::services::DocumentResolver;
use crate::storage::is_internal;

/// Longest description shown in listings, including the ellipsis.
pub const DESCRIPTION_MAX_CHARS: usize = 80;

/// Description used when a document has no text.
pub const NO_DESCRIPTION: &str = "No description";

/// A command answered by a built-in handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinCommand {
    /// Command name.
    pub name: &'static str,
    /// Usage line without the `$$` marker.
    pub usage: &'static str,
    /// One-line description.
    pub description: &'static str,
}

/// Built-in commands that are always available.
pub const BUILTIN_COMMANDS: &[BuiltinCommand] = &[
    BuiltinCommand {
        name: "echo",
        usage: "echo <text>",
        description: "Return the text unchanged.",
    },
    BuiltinCommand {
        name: "lorem-ipsum",
        usage: "lorem-ipsum",
        description: "Return a paragraph of placeholder text.",
    },
    BuiltinCommand {
        name: "prompt",
        usage: "prompt [<name> [-- <instruction>]]",
        description: "List, show or save custom prompts.",
    },
    BuiltinCommand {
        name: "help",
        usage: "help",
        description: "Show this listing.",
    },
];

/// The notes command, listed only when a notes backend is configured.
pub const NOTES_COMMAND: BuiltinCommand = BuiltinCommand {
    name: "notes",
    usage: "notes <add|list|view|load|search|ai|tags|delete|help> ...",
    description: "Store, tag and search personal notes.",
};

/// A top-level bundled command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Command name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Bundled child names, sorted.
    pub subcommands: Vec<String>,
}

/// Extracts a one-line description from document text.
///
/// Front matter is skipped. The first non-empty line is taken, leading `#`
/// markers are removed, the text is cut after its first sentence, and lines
/// longer than [`DESCRIPTION_MAX_CHARS`] are truncated with `...`.
///
/// # Examples
///
/// ```rust
/// use pal::services::extract_description;
///
/// assert_eq!(
///     extract_description("---\na: 1\n---\n\n# Translate text. Keep formatting."),
///     "Translate text."
/// );
/// assert_eq!(extract_description("   \n"), "No description");
/// ```
#[must_use]
pub fn extract_description(content: &str) -> String {
    let body = FrontmatterParser::body(content);
    let Some(line) = body.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return NO_DESCRIPTION.to_string();
    };

    let line = line.trim_start_matches('#').trim();
    let line = match line.split_once(". ") {
        Some((sentence, _)) => format!("{sentence}."),
        None => line.to_string(),
    };

    if line.chars().count() > DESCRIPTION_MAX_CHARS {
        let truncated: String = line.chars().take(DESCRIPTION_MAX_CHARS - 3).collect();
        format!("{truncated}...")
    } else if line.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        line
    }
}

/// Lists top-level bundled commands with descriptions and subcommands.
///
/// Internal documents (`root`, `help`, `curl`) are skipped. A namespace
/// without its own document is described by its subcommand names.
///
/// # Errors
///
/// Returns an error if the document store cannot be read.
pub fn bundled_catalog(resolver: &DocumentResolver) -> Result<Vec<CatalogEntry>> {
    let store = resolver.store();
    let mut entries = Vec::new();

    for name in store.list_children(Tier::Bundled, &[])? {
        if is_internal(&name) {
            continue;
        }
        let Ok(path) = DocumentPath::from_name(&name) else {
            continue;
        };

        let subcommands = store.list_children(Tier::Bundled, std::slice::from_ref(&name))?;
        let description = match resolver.resolve(&path)? {
            Some(content) => extract_description(&content),
            None if !subcommands.is_empty() => format!("Commands: {}", subcommands.join(", ")),
            None => continue,
        };

        entries.push(CatalogEntry {
            name,
            description,
            subcommands,
        });
    }

    Ok(entries)
}
