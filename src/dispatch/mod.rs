//! Command dispatch.
//!
//! Each pipeline segment is parsed and offered to a fixed, ordered list of
//! handlers. The first handler that accepts the command produces its output.
//!
//! | Order | Handler | Accepts |
//! |-------|---------|---------|
//! | 1 | [`HandlerKind::Echo`] | `echo` |
//! | 2 | [`HandlerKind::LoremIpsum`] | `lorem-ipsum` |
//! | 3 | [`HandlerKind::PromptManagement`] | `prompt` |
//! | 4 | [`HandlerKind::Notes`] | `notes`, only with a notes backend |
//! | 5 | [`HandlerKind::GlobalHelp`] | `help` |
//! | 6 | [`HandlerKind::NamespacedHelp`] | `<ns> help`, `<ns> --help` |
//! | 7 | [`HandlerKind::StandardPrompt`] | everything else |
//!
//! Handler errors never escape: they are rendered as `Error: ...` text.

mod builtin;
mod help;
mod notes;
mod prompt;
mod standard;

pub use builtin::{ECHO_COMMAND, LOREM_IPSUM, LOREM_IPSUM_COMMAND};
pub use help::{HELP_COMMAND, HELP_FLAG, is_help_request};
pub use notes::{
    GeneratedTags, KEYWORD_TAG_COUNT, MAX_SUGGESTED_TAGS, NOTES_NAMESPACE, NotesHandler,
    TagSuggester, keyword_tags, merge_tags, sanitize_tags, suggestion_request,
};
pub use prompt::{CONTENT_SEPARATOR, PROMPT_COMMAND};

use std::fmt;
use std::sync::Arc;

use tracing::Instrument;

use crate::config::{PalConfig, TagProvider};
use crate::models::{CommandResult, ParsedCommand};
use crate::parser::{PipelineSplitter, parse_command};
use crate::services::{DocumentResolver, PromptChainWalker};
use crate::storage::{DocumentStore, NotesBackend};
use crate::{Error, Result};

/// Separator placed between the outputs of pipeline segments.
pub const PIPELINE_SEPARATOR: &str = "\n\n---\n\n";

/// The handlers a command can be answered by, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Returns the input text unchanged.
    Echo,
    /// Returns placeholder text.
    LoremIpsum,
    /// Lists, shows and saves custom prompts.
    PromptManagement,
    /// Native notes command.
    Notes,
    /// Listing of every available command.
    GlobalHelp,
    /// Listing of a namespace's subcommands.
    NamespacedHelp,
    /// Resolved document chain; always answers.
    StandardPrompt,
}

impl HandlerKind {
    /// Every handler, in the order they are tried.
    pub const ORDER: &'static [Self] = &[
        Self::Echo,
        Self::LoremIpsum,
        Self::PromptManagement,
        Self::Notes,
        Self::GlobalHelp,
        Self::NamespacedHelp,
        Self::StandardPrompt,
    ];

    /// Returns the handler name used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Echo => "echo",
            Self::LoremIpsum => "lorem_ipsum",
            Self::PromptManagement => "prompt",
            Self::Notes => "notes",
            Self::GlobalHelp => "help",
            Self::NamespacedHelp => "namespaced_help",
            Self::StandardPrompt => "standard",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dispatches `$$` command lines.
///
/// Holds no mutable state; one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    resolver: DocumentResolver,
    walker: PromptChainWalker,
    splitter: PipelineSplitter,
    notes: Option<NotesHandler>,
    tag_provider: TagProvider,
}

impl Dispatcher {
    /// Creates a dispatcher over `store` with default settings and no notes backend.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let resolver = DocumentResolver::new(store);
        Self {
            walker: PromptChainWalker::new(resolver.clone()),
            resolver,
            splitter: PipelineSplitter::default(),
            notes: None,
            tag_provider: TagProvider::default(),
        }
    }

    /// Creates a dispatcher using the pipeline and notes settings in `config`.
    ///
    /// The notes backend is still supplied separately with
    /// [`Dispatcher::with_notes_backend`].
    #[must_use]
    pub fn with_config(store: Arc<dyn DocumentStore>, config: &PalConfig) -> Self {
        let mut dispatcher = Self::new(store);
        dispatcher.splitter = PipelineSplitter::new(&config.content_consuming);
        dispatcher.tag_provider = config.notes.tag_provider;
        dispatcher
    }

    /// Enables the native notes command.
    #[must_use]
    pub fn with_notes_backend(mut self, backend: Arc<dyn NotesBackend>) -> Self {
        self.notes = Some(NotesHandler::new(backend).with_tag_provider(self.tag_provider));
        self
    }

    /// Sets the tag suggester used when the tag provider is `sampling`.
    ///
    /// Has no effect until a notes backend is set.
    #[must_use]
    pub fn with_tag_suggester(mut self, suggester: Arc<dyn TagSuggester>) -> Self {
        self.notes = self.notes.map(|n| n.with_tag_suggester(suggester));
        self
    }

    /// Returns the document resolver.
    #[must_use]
    pub const fn resolver(&self) -> &DocumentResolver {
        &self.resolver
    }

    /// Returns true if the native notes command is enabled.
    #[must_use]
    pub const fn notes_enabled(&self) -> bool {
        self.notes.is_some()
    }

    /// Runs a full command line and joins segment outputs with [`PIPELINE_SEPARATOR`].
    ///
    /// Segments run sequentially. Empty input yields an empty string.
    pub async fn run(&self, input: &str) -> String {
        let segments = self.splitter.split(input);
        tracing::debug!(segments = segments.len(), "running pipeline");

        let mut outputs = Vec::with_capacity(segments.len());
        for segment in &segments {
            outputs.push(self.dispatch(&parse_command(segment)).await);
        }
        outputs.join(PIPELINE_SEPARATOR)
    }

    /// Answers one parsed command with the first accepting handler.
    pub async fn dispatch(&self, command: &ParsedCommand) -> String {
        let span = tracing::info_span!("dispatch", namespace = %command.namespace);

        async {
            for &kind in HandlerKind::ORDER {
                let outcome = self.try_handler(kind, command).await;
                let rendered = match outcome {
                    Ok(None) => continue,
                    Ok(Some(result)) => result.render(),
                    Err(e) => {
                        tracing::warn!(handler = %kind, error = %e, "handler failed");
                        error_text(&e)
                    },
                };

                metrics::counter!("pal_commands_total", "handler" => kind.as_str()).increment(1);
                tracing::debug!(handler = %kind, "command handled");
                return rendered;
            }

            // StandardPrompt answers every command.
            String::new()
        }
        .instrument(span)
        .await
    }

    async fn try_handler(
        &self,
        kind: HandlerKind,
        command: &ParsedCommand,
    ) -> Result<Option<CommandResult>> {
        match kind {
            HandlerKind::Echo => Ok(builtin::echo(command)),
            HandlerKind::LoremIpsum => Ok(builtin::lorem_ipsum(command)),
            HandlerKind::PromptManagement => prompt::handle(&self.resolver, command),
            HandlerKind::Notes => match &self.notes {
                Some(notes) => notes.handle(command).await,
                None => Ok(None),
            },
            HandlerKind::GlobalHelp => help::global(&self.resolver, command, self.notes_enabled()),
            HandlerKind::NamespacedHelp => help::namespaced(&self.resolver, command),
            HandlerKind::StandardPrompt => {
                standard::handle(&self.resolver, &self.walker, command).map(Some)
            },
        }
    }
}

fn error_text(error: &Error) -> String {
    match error {
        Error::InvalidInput(message) => format!("Error: {message}"),
        other => format!("Error: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;
    use crate::storage::{InMemoryNotesBackend, MemoryDocumentStore};

    fn dispatcher(store: MemoryDocumentStore) -> Dispatcher {
        Dispatcher::new(Arc::new(store))
    }

    #[test]
    fn test_handler_order() {
        assert_eq!(HandlerKind::ORDER.first(), Some(&HandlerKind::Echo));
        assert_eq!(HandlerKind::ORDER.last(), Some(&HandlerKind::StandardPrompt));
        assert_eq!(HandlerKind::ORDER.len(), 7);
        assert_eq!(HandlerKind::NamespacedHelp.to_string(), "namespaced_help");
    }

    #[tokio::test]
    async fn test_echo_beats_custom_document() {
        let d = dispatcher(MemoryDocumentStore::new().with_document(Tier::Custom, "echo", "custom"));
        assert_eq!(d.run("echo Hello World").await, "Hello World");
    }

    #[tokio::test]
    async fn test_pipeline_joined_with_separator() {
        let d = dispatcher(MemoryDocumentStore::new());
        let output = d.run("echo hi | lorem-ipsum").await;
        let (first, second) = output.split_once(PIPELINE_SEPARATOR).unwrap();
        assert_eq!(first, "hi");
        assert_eq!(second, LOREM_IPSUM);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let d = dispatcher(MemoryDocumentStore::new());
        assert_eq!(d.run("").await, "");
        assert_eq!(d.run("   ").await, "");
    }

    #[tokio::test]
    async fn test_handler_error_becomes_text() {
        let d = dispatcher(MemoryDocumentStore::new());
        assert_eq!(
            d.run("prompt -- orphan instruction").await,
            "Error: Prompt name is required"
        );
    }

    #[tokio::test]
    async fn test_prompt_is_content_consuming() {
        let d = dispatcher(MemoryDocumentStore::new());
        let output = d.run("prompt table -- Format as | a | b |").await;
        assert!(output.contains("Prompt 'table' saved."));
        assert!(d.run("prompt table").await.contains("Format as | a | b |"));
    }

    #[tokio::test]
    async fn test_notes_fall_through_without_backend() {
        let store = MemoryDocumentStore::new().with_document(Tier::Bundled, "notes", "Notes instructions");
        let d = dispatcher(store);
        assert!(!d.notes_enabled());
        assert_eq!(d.run("notes list").await, "## Command: notes\n\nNotes instructions\n\n## User Input\n\nlist");
    }

    #[tokio::test]
    async fn test_notes_with_backend() {
        let d = dispatcher(MemoryDocumentStore::new())
            .with_notes_backend(Arc::new(InMemoryNotesBackend::new()));
        assert!(d.notes_enabled());

        let output = d.run("notes add Meeting | with pipes").await;
        assert!(output.starts_with("## $$notes add\n\nNote added successfully."));
        assert!(!output.contains(PIPELINE_SEPARATOR));
        assert!(d.run("notes list").await.contains("**1 note(s)**"));
    }

    #[tokio::test]
    async fn test_quiet_result_is_wrapped() {
        let d = dispatcher(MemoryDocumentStore::new())
            .with_notes_backend(Arc::new(InMemoryNotesBackend::new()));
        d.run("notes add Secret plan").await;

        let output = d.run("notes load 1").await;
        assert!(output.starts_with("## $$notes load\n\nNote **Secret plan** loaded into context."));
        assert!(output.contains("<details>"));
        assert!(output.contains("Secret plan"));
    }

    #[tokio::test]
    async fn test_with_config_content_consuming() {
        let config = PalConfig::new().with_content_consuming(["tr"]);
        let d = Dispatcher::with_config(
            Arc::new(MemoryDocumentStore::new().with_document(Tier::Custom, "tr", "Translate")),
            &config,
        );
        let output = d.run("tr a | b").await;
        assert!(output.ends_with("## User Input\n\na | b"));
    }
}
