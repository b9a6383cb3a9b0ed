//! Global and namespaced help.

use crate::Result;
use crate::models::{CommandResult, DocumentPath, ParsedCommand};
use crate::parser::FrontmatterParser;
use crate::services::{
    BUILTIN_COMMANDS, BuiltinCommand, DocumentResolver, NOTES_COMMAND, bundled_catalog,
};

/// Namespace of the global help command.
pub const HELP_COMMAND: &str = "help";

/// Flag prefix requesting namespaced help.
pub const HELP_FLAG: &str = "--help";

/// Returns true if `command` asks for help on its namespace.
#[must_use]
pub fn is_help_request(command: &ParsedCommand) -> bool {
    command.first_arg() == Some(HELP_COMMAND) || command.rest.trim_start().starts_with(HELP_FLAG)
}

/// Builds the `$$help` listing.
pub fn global(
    resolver: &DocumentResolver,
    command: &ParsedCommand,
    notes_enabled: bool,
) -> Result<Option<CommandResult>> {
    if command.namespace != HELP_COMMAND {
        return Ok(None);
    }

    let builtins: Vec<&BuiltinCommand> = BUILTIN_COMMANDS
        .iter()
        .chain(notes_enabled.then_some(&NOTES_COMMAND))
        .collect();

    let mut sections = vec!["## $$help".to_string()];

    let lines: Vec<String> = builtins
        .iter()
        .map(|b| format!("- `$${}` - {}", b.usage, b.description))
        .collect();
    sections.push(format!("**Built-in commands:**\n\n{}", lines.join("\n")));

    let lines: Vec<String> = bundled_catalog(resolver)?
        .into_iter()
        .filter(|entry| !builtins.iter().any(|b| b.name == entry.name))
        .map(|entry| {
            if entry.subcommands.is_empty() || entry.description.starts_with("Commands: ") {
                format!("- `$${}` - {}", entry.name, entry.description)
            } else {
                format!(
                    "- `$${}` - {} (subcommands: {})",
                    entry.name,
                    entry.description,
                    entry.subcommands.join(", ")
                )
            }
        })
        .collect();
    if !lines.is_empty() {
        sections.push(format!("**Commands:**\n\n{}", lines.join("\n")));
    }

    let custom = resolver.custom_names()?;
    if custom.is_empty() {
        sections.push("**Custom prompts:**\n\nNo custom prompts defined yet.".to_string());
    } else {
        let lines: Vec<String> = custom.iter().map(|n| format!("- `$${n}`")).collect();
        sections.push(format!("**Custom prompts:**\n\n{}", lines.join("\n")));
    }

    if let Some(usage) = resolver.resolve_name(HELP_COMMAND)? {
        let usage = FrontmatterParser::body(&usage);
        if !usage.trim().is_empty() {
            sections.push(usage.trim().to_string());
        }
    }

    Ok(Some(CommandResult::new(sections.join("\n\n"))))
}

/// Lists the children of a namespace for `$$<ns> help` and `$$<ns> --help`.
pub fn namespaced(resolver: &DocumentResolver, command: &ParsedCommand) -> Result<Option<CommandResult>> {
    if !is_help_request(command) {
        return Ok(None);
    }

    let namespace = &command.namespace;
    let children = match DocumentPath::from_name(namespace) {
        Ok(path) => resolver.list_children(path.segments())?,
        Err(_) => Vec::new(),
    };

    let body = if children.is_empty() {
        format!("No subcommands available for '{namespace}'.")
    } else {
        let lines: Vec<String> = children.iter().map(|c| format!("  - {namespace} {c}")).collect();
        format!("Available commands:\n\n{}", lines.join("\n"))
    };

    Ok(Some(CommandResult::new(format!("## $${namespace} {HELP_FLAG}\n\n{body}"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;
    use crate::storage::MemoryDocumentStore;
    use std::sync::Arc;
    use test_case::test_case;

    fn resolver() -> DocumentResolver {
        DocumentResolver::new(Arc::new(
            MemoryDocumentStore::new()
                .with_document(Tier::Bundled, "root", "Protocol")
                .with_document(Tier::Bundled, "help", "Use `$$<command> --help`.")
                .with_document(Tier::Bundled, "git", "# Git helpers. More text.")
                .with_document(Tier::Bundled, "git commit", "c")
                .with_document(Tier::Override, "git stash", "s")
                .with_document(Tier::Bundled, "notes", "Notes prompt")
                .with_document(Tier::Custom, "tr", "Translate"),
        ))
    }

    #[test_case("help", true ; "help token")]
    #[test_case("--help", true ; "flag")]
    #[test_case("  --help-me", true ; "flag prefix")]
    #[test_case("helpful", false ; "longer token")]
    #[test_case("commit help", false ; "not first")]
    #[test_case("", false ; "empty")]
    fn test_is_help_request(rest: &str, expected: bool) {
        assert_eq!(is_help_request(&ParsedCommand::new("git", rest)), expected);
    }

    #[test]
    fn test_global_help_sections() {
        let output = global(&resolver(), &ParsedCommand::new("help", ""), false)
            .unwrap()
            .unwrap()
            .output;

        assert!(output.starts_with("## $$help\n\n**Built-in commands:**"));
        assert!(output.contains("- `$$echo <text>` - Return the text unchanged."));
        assert!(output.contains("- `$$git` - Git helpers. (subcommands: commit)"));
        assert!(output.contains("- `$$notes` - Notes prompt"));
        assert!(output.contains("**Custom prompts:**\n\n- `$$tr`"));
        assert!(output.ends_with("Use `$$<command> --help`."));
        assert!(!output.contains("$$root"));
    }

    #[test]
    fn test_global_help_lists_native_notes_once() {
        let output = global(&resolver(), &ParsedCommand::new("help", ""), true)
            .unwrap()
            .unwrap()
            .output;
        assert_eq!(output.matches("`$$notes").count(), 1);
        assert!(output.contains("Store, tag and search personal notes."));
    }

    #[test]
    fn test_namespaced_help_merges_tiers() {
        let output = namespaced(&resolver(), &ParsedCommand::new("git", "--help"))
            .unwrap()
            .unwrap()
            .output;
        assert_eq!(
            output,
            "## $$git --help\n\nAvailable commands:\n\n  - git commit\n  - git stash"
        );
    }

    #[test]
    fn test_namespaced_help_without_children() {
        let output = namespaced(&resolver(), &ParsedCommand::new("tr", "help"))
            .unwrap()
            .unwrap()
            .output;
        assert_eq!(output, "## $$tr --help\n\nNo subcommands available for 'tr'.");
        assert!(namespaced(&resolver(), &ParsedCommand::new("tr", "hello")).unwrap().is_none());
    }
}
