//! Outer tool operations over the dispatcher.
//!
//! Transports (stdio, HTTP) call [`ToolRegistry::execute`] with a tool name
//! and JSON arguments.
//!
//! | Tool | Arguments | Result |
//! |------|-----------|--------|
//! | `run_pal_command` | `command` | Pipeline output |
//! | `list_pal_commands` | - | `Commands: a, b, ...` |
//! | `read_pal_resource` | `uri` | Document text |
//! | `list_pal_resources` | - | Resource URIs |
//!
//! Resource URIs take two forms: `pal://instructions/<path>.md` resolves a
//! document across tiers, `pal://prompts/<name>.md` reads a custom prompt.

mod definitions;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::Dispatcher;
use crate::models::{DocumentPath, Tier};
use crate::services::{BUILTIN_COMMANDS, NOTES_COMMAND};
use crate::{Error, Result};

/// Tool running a command line.
pub const RUN_PAL_COMMAND: &str = "run_pal_command";
/// Tool listing command names.
pub const LIST_PAL_COMMANDS: &str = "list_pal_commands";
/// Tool reading one resource.
pub const READ_PAL_RESOURCE: &str = "read_pal_resource";
/// Tool listing resource URIs.
pub const LIST_PAL_RESOURCES: &str = "list_pal_resources";

/// URI prefix of resolved documents.
pub const INSTRUCTIONS_URI_PREFIX: &str = "pal://instructions/";
/// URI prefix of custom prompts.
pub const PROMPTS_URI_PREFIX: &str = "pal://prompts/";

/// Registry of tools backed by a [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    dispatcher: Dispatcher,
    tools: BTreeMap<&'static str, ToolDefinition>,
}

impl ToolRegistry {
    /// Creates a registry with every pal tool.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        let mut tools = BTreeMap::new();
        tools.insert(RUN_PAL_COMMAND, definitions::run_command_tool());
        tools.insert(LIST_PAL_COMMANDS, definitions::list_commands_tool());
        tools.insert(READ_PAL_RESOURCE, definitions::read_resource_tool());
        tools.insert(LIST_PAL_RESOURCES, definitions::list_resources_tool());

        Self { dispatcher, tools }
    }

    /// Returns all tool definitions, sorted by name.
    #[must_use]
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    /// Gets a tool definition by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Executes a tool with the given arguments.
    ///
    /// Expected failures (missing documents, bad arguments) are returned as
    /// results with `is_error` set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] if `name` is not registered.
    pub async fn execute(&self, name: &str, arguments: Value) -> Result<ToolResult> {
        let outcome = match name {
            RUN_PAL_COMMAND => self.run_command(arguments).await,
            LIST_PAL_COMMANDS => self.list_commands().map(ToolResult::text),
            READ_PAL_RESOURCE => self.read_resource_tool(arguments),
            LIST_PAL_RESOURCES => self.list_resources().map(ToolResult::text),
            _ => return Err(Error::UnknownTool(name.to_string())),
        };

        Ok(outcome.unwrap_or_else(|e| {
            tracing::warn!(tool = name, error = %e, "tool failed");
            ToolResult::error(format!("Error: {e}"))
        }))
    }

    async fn run_command(&self, arguments: Value) -> Result<ToolResult> {
        let args: RunCommandArgs = parse_args(arguments)?;
        let command = args.command.trim();
        if command.is_empty() {
            return Ok(ToolResult::error("Error: No command provided"));
        }
        Ok(ToolResult::text(self.dispatcher.run(command).await))
    }

    /// Returns `Commands: a, b, ...` with built-ins first, then every document name.
    ///
    /// # Errors
    ///
    /// Returns an error if the document store cannot be read.
    pub fn list_commands(&self) -> Result<String> {
        let mut names: Vec<String> = BUILTIN_COMMANDS
            .iter()
            .chain(self.dispatcher.notes_enabled().then_some(&NOTES_COMMAND))
            .map(|b| b.name.to_string())
            .collect();

        for name in self.dispatcher.resolver().all_document_names()? {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(format!("Commands: {}", names.join(", ")))
    }

    fn read_resource_tool(&self, arguments: Value) -> Result<ToolResult> {
        let args: ReadResourceArgs = parse_args(arguments)?;
        match self.read_resource(&args.uri) {
            Ok(content) => Ok(ToolResult::text(content)),
            Err(Error::ResourceNotFound(uri)) => {
                Ok(ToolResult::error(format!("Resource not found: {uri}")))
            },
            Err(e) => Err(e),
        }
    }

    /// Reads a resource by URI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceNotFound`] for unknown schemes and missing
    /// documents, or an error if the store cannot be read.
    pub fn read_resource(&self, uri: &str) -> Result<String> {
        let not_found = || Error::ResourceNotFound(uri.to_string());
        let resolver = self.dispatcher.resolver();

        let content = if let Some(rest) = uri.strip_prefix(INSTRUCTIONS_URI_PREFIX) {
            let path = uri_to_path(rest).ok_or_else(not_found)?;
            resolver.resolve(&path)?
        } else if let Some(rest) = uri.strip_prefix(PROMPTS_URI_PREFIX) {
            let path = uri_to_path(rest).ok_or_else(not_found)?;
            resolver.load_custom(&path)?
        } else {
            None
        };

        content.ok_or_else(not_found)
    }

    /// Lists resource URIs: resolved documents first, then custom prompts.
    ///
    /// # Errors
    ///
    /// Returns an error if the document store cannot be read.
    pub fn list_resources(&self) -> Result<String> {
        let resolver = self.dispatcher.resolver();

        let mut instructions = BTreeSet::new();
        for tier in [Tier::Bundled, Tier::Override] {
            instructions.extend(resolver.documents(tier)?);
        }

        let uris: Vec<String> = instructions
            .iter()
            .map(|p| format!("{INSTRUCTIONS_URI_PREFIX}{}", p.uri_path()))
            .chain(
                resolver
                    .documents(Tier::Custom)?
                    .iter()
                    .map(|p| format!("{PROMPTS_URI_PREFIX}{}", p.uri_path())),
            )
            .collect();

        if uris.is_empty() {
            return Ok("No resources available.".to_string());
        }

        let lines: Vec<String> = uris.iter().map(|u| format!("  - {u}")).collect();
        Ok(format!("Available resources:\n{}", lines.join("\n")))
    }
}

/// Converts `git/commit.md` (or `git commit.md`) into a document path.
fn uri_to_path(rest: &str) -> Option<DocumentPath> {
    let rest = rest.strip_suffix(".md").unwrap_or(rest);
    DocumentPath::new(rest.split(|c: char| c == '/' || c.is_whitespace()).filter(|s| !s.is_empty())).ok()
}

fn parse_args<T: for<'de> Deserialize<'de>>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))
}

/// Arguments of `run_pal_command`.
#[derive(Debug, Deserialize)]
struct RunCommandArgs {
    #[serde(default)]
    command: String,
}

/// Arguments of `read_pal_resource`.
#[derive(Debug, Deserialize)]
struct ReadResourceArgs {
    uri: String,
}

/// Definition of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for input validation.
    pub input_schema: Value,
}

/// Result of a tool execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the result represents an error.
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Returns all text content joined by newlines.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Content types that can be returned by tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryNotesBackend, MemoryDocumentStore};
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> ToolRegistry {
        let store = MemoryDocumentStore::new()
            .with_document(Tier::Bundled, "root", "Protocol")
            .with_document(Tier::Bundled, "git", "Git")
            .with_document(Tier::Bundled, "git commit", "Commit")
            .with_document(Tier::Override, "git", "---\nmerge_strategy: append\n---\nMine")
            .with_document(Tier::Custom, "tr", "Translate")
            .with_document(Tier::Custom, "foo bar", "Nested");
        ToolRegistry::new(Dispatcher::new(Arc::new(store)))
    }

    #[test]
    fn test_tool_registry_creation() {
        let registry = registry();
        let names: Vec<&str> = registry.list_tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![LIST_PAL_COMMANDS, LIST_PAL_RESOURCES, READ_PAL_RESOURCE, RUN_PAL_COMMAND]
        );

        let run = registry.get_tool(RUN_PAL_COMMAND).unwrap();
        assert!(
            run.input_schema["required"]
                .as_array()
                .unwrap()
                .contains(&json!("command"))
        );
    }

    #[tokio::test]
    async fn test_run_command() {
        let registry = registry();
        let result = registry
            .execute(RUN_PAL_COMMAND, json!({"command": "echo hi | echo there"}))
            .await
            .unwrap();
        assert!(!result.is_error);
        assert_eq!(result.joined_text(), "hi\n\n---\n\nthere");
    }

    #[tokio::test]
    async fn test_run_empty_command() {
        let registry = registry();
        for args in [json!({"command": "  "}), json!({})] {
            let result = registry.execute(RUN_PAL_COMMAND, args).await.unwrap();
            assert!(result.is_error);
            assert_eq!(result.joined_text(), "Error: No command provided");
        }
    }

    #[tokio::test]
    async fn test_list_commands() {
        let registry = registry();
        let result = registry.execute(LIST_PAL_COMMANDS, json!({})).await.unwrap();
        assert_eq!(
            result.joined_text(),
            "Commands: echo, lorem-ipsum, prompt, help, foo bar, git, git commit, root, tr"
        );

        let with_notes = ToolRegistry::new(
            Dispatcher::new(Arc::new(MemoryDocumentStore::new()))
                .with_notes_backend(Arc::new(InMemoryNotesBackend::new())),
        );
        assert_eq!(
            with_notes.list_commands().unwrap(),
            "Commands: echo, lorem-ipsum, prompt, help, notes"
        );
    }

    #[tokio::test]
    async fn test_read_resource() {
        let registry = registry();

        let merged = registry
            .execute(READ_PAL_RESOURCE, json!({"uri": "pal://instructions/git.md"}))
            .await
            .unwrap();
        assert_eq!(merged.joined_text(), "Git\n\nMine");

        assert_eq!(registry.read_resource("pal://instructions/git/commit.md").unwrap(), "Commit");
        assert_eq!(registry.read_resource("pal://prompts/tr.md").unwrap(), "Translate");
        assert_eq!(registry.read_resource("pal://prompts/foo/bar.md").unwrap(), "Nested");
        assert_eq!(registry.read_resource("pal://prompts/foo bar.md").unwrap(), "Nested");

        let missing = registry
            .execute(READ_PAL_RESOURCE, json!({"uri": "pal://prompts/nope.md"}))
            .await
            .unwrap();
        assert!(missing.is_error);
        assert_eq!(missing.joined_text(), "Resource not found: pal://prompts/nope.md");

        assert!(matches!(
            registry.read_resource("file:///etc/passwd"),
            Err(Error::ResourceNotFound(_))
        ));
        assert!(matches!(
            registry.read_resource("pal://instructions/../secret.md"),
            Err(Error::ResourceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_resource_bad_arguments() {
        let registry = registry();
        let result = registry.execute(READ_PAL_RESOURCE, json!({})).await.unwrap();
        assert!(result.is_error);
        assert!(result.joined_text().starts_with("Error: invalid input:"));
    }

    #[test]
    fn test_list_resources() {
        assert_eq!(
            registry().list_resources().unwrap(),
            "Available resources:\n  - pal://instructions/git.md\n  - pal://instructions/git/commit.md\n  - pal://instructions/root.md\n  - pal://prompts/foo/bar.md\n  - pal://prompts/tr.md"
        );
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let err = registry().execute("curl", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::UnknownTool(name) if name == "curl"));
    }
}
