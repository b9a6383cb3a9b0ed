//! Custom prompt management: `$$prompt [<name> [-- <instruction>]]`.

use crate::Result;
use crate::models::{CommandResult, DocumentPath, ParsedCommand};
use crate::services::DocumentResolver;

/// Namespace of the prompt management command.
pub const PROMPT_COMMAND: &str = "prompt";

/// Token separating a prompt name from its instruction.
pub const CONTENT_SEPARATOR: &str = "--";

/// Splits `rest` into a name and an optional instruction at a standalone `--`.
fn split_definition(rest: &str) -> (String, Option<String>) {
    let join_words = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut offset = 0;
    for token in rest.split_whitespace() {
        let start = offset + rest[offset..].find(token).unwrap_or(0);
        offset = start + token.len();

        if token == CONTENT_SEPARATOR {
            let content = rest[offset..].trim();
            return (
                join_words(&rest[..start]),
                (!content.is_empty()).then(|| content.to_string()),
            );
        }
    }

    (join_words(rest), None)
}

pub fn handle(resolver: &DocumentResolver, command: &ParsedCommand) -> Result<Option<CommandResult>> {
    if command.namespace != PROMPT_COMMAND {
        return Ok(None);
    }

    let (name, content) = split_definition(&command.rest);
    let result = match (name.is_empty(), content) {
        (true, None) => list(resolver)?,
        (_, Some(content)) => save(resolver, &name, &content)?,
        (false, None) => show(resolver, &name)?,
    };
    Ok(Some(result))
}

fn list(resolver: &DocumentResolver) -> Result<CommandResult> {
    let names = resolver.custom_names()?;
    let body = if names.is_empty() {
        "No custom prompts defined yet.".to_string()
    } else {
        let items: Vec<String> = names.iter().map(|n| format!("  - {n}")).collect();
        format!("Custom prompts:\n\n{}", items.join("\n"))
    };
    Ok(CommandResult::new(format!("## $$prompt\n\n{body}")))
}

fn show(resolver: &DocumentResolver, name: &str) -> Result<CommandResult> {
    let path = DocumentPath::from_name(name)?;
    let location = resolver.custom_location(&path);
    let name = path.name();

    let existing = match resolver.load_custom(&path)? {
        Some(raw) => Some(raw),
        None => resolver.resolve(&path)?,
    };

    let output = match existing {
        Some(definition) => format!(
            "## $$prompt {name}\n\n\
             File: `{}`\n\n\
             Current definition:\n\n```\n{definition}\n```\n\n\
             Show the full definition above to the user without summarizing it.",
            location.display()
        ),
        None => format!(
            "## $$prompt {name}\n\n\
             Error: Prompt not found.\n\n\
             To create it:\n$$prompt {name} {CONTENT_SEPARATOR} <instruction>\n\n\
             Or create file: `{}`",
            location.display()
        ),
    };
    Ok(CommandResult::new(output))
}

fn save(resolver: &DocumentResolver, name: &str, content: &str) -> Result<CommandResult> {
    let path = resolver.save_custom(name, content)?;
    let name = path.name();
    Ok(CommandResult::new(format!(
        "## $$prompt {name}\n\nPrompt '{name}' saved. Use it with: $${name} <input>"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;
    use crate::storage::MemoryDocumentStore;
    use std::sync::Arc;
    use test_case::test_case;

    fn resolver(store: MemoryDocumentStore) -> DocumentResolver {
        DocumentResolver::new(Arc::new(store))
    }

    fn run(resolver: &DocumentResolver, rest: &str) -> Result<String> {
        handle(resolver, &ParsedCommand::new("prompt", rest)).map(|r| r.map(|r| r.output).unwrap_or_default())
    }

    #[test_case("", "", None ; "empty")]
    #[test_case("tr", "tr", None ; "name only")]
    #[test_case("foo bar", "foo bar", None ; "multi word name")]
    #[test_case("tr -- Translate to French", "tr", Some("Translate to French") ; "name and content")]
    #[test_case("git add -- Stage with -- care", "git add", Some("Stage with -- care") ; "later separators kept")]
    #[test_case("tr --", "tr", None ; "trailing separator")]
    #[test_case("-- orphan", "", Some("orphan") ; "missing name")]
    fn test_split_definition(rest: &str, name: &str, content: Option<&str>) {
        let (n, c) = split_definition(rest);
        assert_eq!(n, name);
        assert_eq!(c.as_deref(), content);
    }

    #[test]
    fn test_ignores_other_namespaces() {
        let r = resolver(MemoryDocumentStore::new());
        assert!(handle(&r, &ParsedCommand::new("git", "")).unwrap().is_none());
    }

    #[test]
    fn test_list_empty_and_populated() {
        let r = resolver(MemoryDocumentStore::new());
        assert_eq!(run(&r, "").unwrap(), "## $$prompt\n\nNo custom prompts defined yet.");

        let r = resolver(
            MemoryDocumentStore::new()
                .with_document(Tier::Custom, "tr", "t")
                .with_document(Tier::Custom, "git add", "a"),
        );
        assert_eq!(
            run(&r, "").unwrap(),
            "## $$prompt\n\nCustom prompts:\n\n  - git add\n  - tr"
        );
    }

    #[test]
    fn test_save_then_show() {
        let r = resolver(MemoryDocumentStore::new());
        assert_eq!(
            run(&r, "Tr -- Translate:\\nkeep tone").unwrap(),
            "## $$prompt tr\n\nPrompt 'tr' saved. Use it with: $$tr <input>"
        );

        let shown = run(&r, "tr").unwrap();
        assert!(shown.starts_with("## $$prompt tr\n\nFile: `custom/tr.md`"));
        assert!(shown.contains("```\nTranslate:\nkeep tone\n```"));
    }

    #[test]
    fn test_show_falls_back_to_resolved_document() {
        let r = resolver(MemoryDocumentStore::new().with_document(Tier::Bundled, "review", "Review code"));
        assert!(run(&r, "review").unwrap().contains("```\nReview code\n```"));
    }

    #[test]
    fn test_show_missing_gives_creation_syntax() {
        let r = resolver(MemoryDocumentStore::new());
        let output = run(&r, "foo bar").unwrap();
        assert!(output.contains("Error: Prompt not found."));
        assert!(output.contains("$$prompt foo bar -- <instruction>"));
        assert!(output.contains("`custom/foo/bar.md`"));
    }

    #[test]
    fn test_save_without_name_is_invalid_input() {
        let r = resolver(MemoryDocumentStore::new());
        let err = run(&r, "-- orphan").unwrap_err();
        assert_eq!(err.to_string(), "invalid input: Prompt name is required");
    }
}
