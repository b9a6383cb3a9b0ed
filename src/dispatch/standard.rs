//! Fallback handler: assembles resolved instructions for the model.
//!
//! ```text
//! <protocol document>
//!
//! ## Command: git
//!
//! <git instructions>
//!
//! ## Subcommand: commit
//!
//! <git commit instructions>
//!
//! ## User Input
//!
//! <leftover text>
//! ```

use crate::Result;
use crate::models::{CommandResult, ParsedCommand};
use crate::parser::FrontmatterParser;
use crate::services::{DocumentResolver, PromptChainWalker};
use crate::storage::PROTOCOL_DOCUMENT;

use super::prompt::{CONTENT_SEPARATOR, PROMPT_COMMAND};

pub fn handle(
    resolver: &DocumentResolver,
    walker: &PromptChainWalker,
    command: &ParsedCommand,
) -> Result<CommandResult> {
    if command.is_empty() {
        return Ok(CommandResult::new("Error: No command provided"));
    }

    let tokens = command.tokens();
    let chain = walker.walk(tokens.as_slice())?;
    let namespace = &command.namespace;

    if chain.is_empty() {
        tracing::debug!(namespace = %namespace, "command did not resolve");
        return Ok(CommandResult::new(format!(
            "## $${namespace}\n\n\
             Error: Command '{namespace}' not found.\n\n\
             To create it:\n$${PROMPT_COMMAND} {namespace} {CONTENT_SEPARATOR} <instruction>"
        )));
    }

    let mut sections = Vec::with_capacity(chain.entries.len() + 2);

    let protocol_in_chain = chain.entries.iter().any(|e| e.path.name() == PROTOCOL_DOCUMENT);
    if !protocol_in_chain
        && let Some(protocol) = resolver.resolve_name(PROTOCOL_DOCUMENT)?
    {
        sections.push(FrontmatterParser::body(&protocol).trim().to_string());
    }

    for (depth, entry) in chain.entries.iter().enumerate() {
        let label = if depth == 0 { "Command" } else { "Subcommand" };
        let body = FrontmatterParser::body(&entry.content);
        sections.push(format!("## {label}: {}\n\n{}", entry.path.leaf(), body.trim()));
    }

    if !chain.leftover.is_empty() {
        sections.push(format!("## User Input\n\n{}", chain.leftover));
    }

    Ok(CommandResult::new(sections.join("\n\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;
    use crate::storage::MemoryDocumentStore;
    use std::sync::Arc;

    fn run(store: MemoryDocumentStore, namespace: &str, rest: &str) -> String {
        let resolver = DocumentResolver::new(Arc::new(store));
        let walker = PromptChainWalker::new(resolver.clone());
        handle(&resolver, &walker, &ParsedCommand::new(namespace, rest))
            .unwrap()
            .output
    }

    #[test]
    fn test_assembles_chain_and_input() {
        let store = MemoryDocumentStore::new()
            .with_document(Tier::Bundled, "root", "Protocol")
            .with_document(Tier::Bundled, "git", "---\nsubcommands:\n  commit: {}\n---\nGit rules")
            .with_document(Tier::Bundled, "git commit", "Commit rules");

        assert_eq!(
            run(store, "git", "commit fix the typo"),
            "Protocol\n\n## Command: git\n\nGit rules\n\n## Subcommand: commit\n\nCommit rules\n\n## User Input\n\nfix the typo"
        );
    }

    #[test]
    fn test_omits_empty_input_and_missing_protocol() {
        let store = MemoryDocumentStore::new().with_document(Tier::Custom, "tr", "Translate");
        assert_eq!(run(store, "tr", ""), "## Command: tr\n\nTranslate");
    }

    #[test]
    fn test_unresolved_namespace_suggests_creation() {
        let store = MemoryDocumentStore::new().with_document(Tier::Bundled, "root", "Protocol");
        let output = run(store, "nope", "some input");
        assert!(output.contains("Error: Command 'nope' not found."));
        assert!(output.contains("$$prompt nope -- <instruction>"));
        assert!(!output.contains("Protocol"));
    }

    #[test]
    fn test_protocol_not_repeated() {
        let store = MemoryDocumentStore::new().with_document(Tier::Bundled, "root", "Protocol");
        assert_eq!(run(store, "root", ""), "## Command: root\n\nProtocol");
    }

    #[test]
    fn test_empty_command() {
        assert_eq!(run(MemoryDocumentStore::new(), "", ""), "Error: No command provided");
    }
}
