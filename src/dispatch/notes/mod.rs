//! Native notes command backed by a [`NotesBackend`].
//!
//! | Subcommand | Effect |
//! |------------|--------|
//! | `add [-t tags] <content>` | Store a note with user and generated tags |
//! | `list [-t tags]` | Ten most recent notes |
//! | `search [-t tags] <query>` | Keyword search |
//! | `ai [-t tags] <query>` | Semantic search |
//! | `view [-q] <id>` | Full note |
//! | `load <id>` | Full note in a collapsed context block |
//! | `tags <id> <t1,t2>` | Replace tags |
//! | `delete <id>` | Remove a note |
//! | `help` | Usage |
//!
//! `<id>` is a full id, a unique id prefix, or a one or two digit position in
//! the recent-notes list.

mod tags;

pub use tags::{
    GeneratedTags, KEYWORD_TAG_COUNT, MAX_SUGGESTED_TAGS, TagSuggester, keyword_tags,
    merge_tags, sanitize_tags, suggestion_request,
};

use std::sync::Arc;

use crate::Result;
use crate::config::TagProvider;
use crate::models::{CommandResult, NewNote, Note, ParsedCommand, SearchMode};
use crate::parser::flags::{extract_list_flag, extract_switch, split_list};
use crate::storage::NotesBackend;

/// Namespace of the notes command.
pub const NOTES_NAMESPACE: &str = "notes";

/// Notes shown by `list` and returned by searches.
const RESULT_LIMIT: usize = 10;

/// Recent notes addressable by position.
const INDEX_WINDOW: usize = 100;

/// Longest title shown in listings.
const LISTING_TITLE_CHARS: usize = 60;

/// Content characters shown in listings.
const PREVIEW_CHARS: usize = 100;

const USAGE: &str = "\
- `$$notes add [-t tags] <content>` - Add a new note
- `$$notes list [-t tags]` - List recent notes (optionally filtered by tags)
- `$$notes view <id>` - View full note by ID (partial ID or list position supported)
- `$$notes load <id>` - Load note quietly (minimal display)
- `$$notes tags <id> <tags>` - Replace the tags of a note
- `$$notes delete <id>` - Delete a note by ID
- `$$notes search [-t tags] <query>` - Keyword search (optionally filtered by tags)
- `$$notes ai [-t tags] <query>` - Semantic search (optionally filtered by tags)";

const TAG_FILTER_HINT: &str = "Use `-t tag1,tag2` or `--tags tag1,tag2` to filter by tags.";

const QUIET_SWITCHES: &[&str] = &["-q", "--quiet"];

/// Handles `$$notes ...` against a notes backend.
#[derive(Clone)]
pub struct NotesHandler {
    backend: Arc<dyn NotesBackend>,
    provider: TagProvider,
    suggester: Option<Arc<dyn TagSuggester>>,
}

impl std::fmt::Debug for NotesHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesHandler")
            .field("provider", &self.provider)
            .field("suggester", &self.suggester.is_some())
            .finish_non_exhaustive()
    }
}

impl NotesHandler {
    /// Creates a handler with keyword tagging.
    #[must_use]
    pub fn new(backend: Arc<dyn NotesBackend>) -> Self {
        Self {
            backend,
            provider: TagProvider::default(),
            suggester: None,
        }
    }

    /// Sets the tag provider.
    #[must_use]
    pub const fn with_tag_provider(mut self, provider: TagProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Sets the suggester used by [`TagProvider::Sampling`].
    #[must_use]
    pub fn with_tag_suggester(mut self, suggester: Arc<dyn TagSuggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    /// Answers a notes command, or `None` for other namespaces.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn handle(&self, command: &ParsedCommand) -> Result<Option<CommandResult>> {
        if command.namespace != NOTES_NAMESPACE {
            return Ok(None);
        }

        let rest = command.rest.trim();
        let (subcommand, args) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(sub, args)| (sub, args.trim()));

        let result = match subcommand.to_lowercase().as_str() {
            "add" => self.add(args).await?,
            "list" => self.list(args).await?,
            "search" => self.search("search", args, SearchMode::Keyword).await?,
            "ai" => self.search("ai", args, SearchMode::Semantic).await?,
            "view" => self.view("view", args, false).await?,
            "load" => self.view("load", args, true).await?,
            "tags" => self.retag(args).await?,
            "delete" => self.delete(args).await?,
            "help" => CommandResult::new(format!(
                "## $$notes help\n\n**Available commands:**\n\n{USAGE}\n\n\
                 **Tag filtering:**\n\n{TAG_FILTER_HINT}\n\
                 Example: `$$notes list -t docker,kubernetes`"
            )),
            _ => CommandResult::new(format!(
                "## $$notes\n\nUnknown subcommand. Available commands:\n\n{USAGE}\n\n{TAG_FILTER_HINT}"
            )),
        };
        Ok(Some(result))
    }

    async fn add(&self, args: &str) -> Result<CommandResult> {
        let (user_tags, content) = extract_list_flag(args, "-t", "--tags");
        if content.is_empty() {
            return Ok(CommandResult::new("## $$notes add\n\nError: No content provided."));
        }

        let generated = tags::generate(self.provider, self.suggester.as_deref(), &content).await;
        let all_tags = merge_tags(&user_tags, &generated.tags);
        let note = self
            .backend
            .add(NewNote::from_content(content).with_tags(all_tags))
            .await?;

        tracing::info!(id = note.short_id(), tags = note.tags.len(), "added note");

        let mut output = format!(
            "## $$notes add\n\nNote added successfully.\n\n**ID:** `{}`\n**Title:** {}\n**Tags:** {}",
            note.short_id(),
            note.title,
            comma_tags(&note.tags)
        );

        if let Some(excerpt) = generated.follow_up {
            output.push_str(&format!(
                "\n\n---\n\n**Action required:** Run `$$notes tags {} <tags>` now, \
                 choosing 3-5 semantic tags for this content:\n\n> {}",
                note.short_id(),
                excerpt.replace('\n', "\n> ")
            ));
        }

        Ok(CommandResult::new(output))
    }

    async fn list(&self, args: &str) -> Result<CommandResult> {
        let (filter, _) = extract_list_flag(args, "-t", "--tags");
        let notes = self.backend.list(&filter, RESULT_LIMIT).await?;

        if notes.is_empty() {
            return Ok(CommandResult::new(if filter.is_empty() {
                "## $$notes list\n\nNo notes found.".to_string()
            } else {
                format!("## $$notes list\n\nNo notes found with tags: {}", comma_tags(&filter))
            }));
        }

        let header = format!(
            "## $$notes list\n\n**{} note(s)**{}",
            notes.len(),
            filter_suffix(&filter)
        );
        Ok(CommandResult::new(with_entries(header, &notes)))
    }

    async fn search(&self, kind: &str, args: &str, mode: SearchMode) -> Result<CommandResult> {
        let (filter, query) = extract_list_flag(args, "-t", "--tags");
        let query = query.trim().trim_matches(|c| c == '"' || c == '\'');
        if query.is_empty() {
            return Ok(CommandResult::new(format!(
                "## $$notes {kind}\n\nError: No query provided."
            )));
        }

        let hits = self.backend.search(query, &filter, mode, RESULT_LIMIT).await?;
        let label = match mode {
            SearchMode::Keyword => "Search",
            SearchMode::Semantic => "AI Search",
        };
        let header = format!(
            "## $$notes {kind}\n\n**{label} for \"{query}\"** ({} hits){}",
            hits.len(),
            filter_suffix(&filter)
        );

        if hits.is_empty() {
            return Ok(CommandResult::new(format!("{header}\n\nNo results found.")));
        }
        Ok(CommandResult::new(with_entries(header, &hits)))
    }

    async fn view(&self, kind: &str, args: &str, quiet: bool) -> Result<CommandResult> {
        let (quiet_flag, remaining) = extract_switch(args, QUIET_SWITCHES);
        let Some(id) = remaining.split_whitespace().last() else {
            return Ok(CommandResult::new(format!(
                "## $$notes {kind}\n\nError: No note ID provided."
            )));
        };

        let Some(note) = self.lookup(id).await? else {
            return Ok(not_found(kind, id));
        };

        let full = format!(
            "### {}\n**ID:** `{}`\n**Tags:** {}\n**Created:** {}\n\n{}",
            note.title,
            note.id,
            spaced_tags(&note.tags).unwrap_or_else(|| "none".to_string()),
            created_date(&note),
            note.content
        );

        if quiet || quiet_flag {
            return Ok(CommandResult::quiet(
                full,
                format!("## $$notes load\n\nNote **{}** loaded into context.", note.title),
            ));
        }
        Ok(CommandResult::new(format!("## $$notes view\n\n{full}")))
    }

    async fn retag(&self, args: &str) -> Result<CommandResult> {
        let usage = || CommandResult::new("## $$notes tags\n\nUsage: `$$notes tags <id> <tag1,tag2,...>`");
        if args.is_empty() {
            return Ok(usage());
        }
        let Some((id, list)) = args.split_once(char::is_whitespace) else {
            return Ok(usage());
        };

        let new_tags = split_list(list);
        if new_tags.is_empty() {
            return Ok(CommandResult::new("## $$notes tags\n\nError: No tags provided."));
        }

        let Some(note) = self.lookup(id).await? else {
            return Ok(not_found("tags", id));
        };
        let Some(updated) = self.backend.update_tags(&note.id, new_tags).await? else {
            return Ok(not_found("tags", id));
        };

        tracing::info!(id = updated.short_id(), "updated note tags");
        Ok(CommandResult::new(format!(
            "## $$notes tags\n\nTags updated successfully.\n\n**Note:** {}\n**Old tags:** {}\n**New tags:** {}",
            updated.title,
            comma_tags(&note.tags),
            comma_tags(&updated.tags)
        )))
    }

    async fn delete(&self, args: &str) -> Result<CommandResult> {
        let id = args.trim();
        if id.is_empty() {
            return Ok(CommandResult::new("## $$notes delete\n\nError: No note ID provided."));
        }

        let Some(note) = self.lookup(id).await? else {
            return Ok(not_found("delete", id));
        };
        if !self.backend.delete(&note.id).await? {
            return Ok(not_found("delete", id));
        }

        tracing::info!(id = note.short_id(), "deleted note");
        Ok(CommandResult::new(format!(
            "## $$notes delete\n\nNote deleted successfully.\n\n**ID:** `{}`\n**Title:** {}",
            note.short_id(),
            note.title
        )))
    }

    /// Finds a note by list position, full id or unique id prefix.
    async fn lookup(&self, id: &str) -> Result<Option<Note>> {
        if id.len() <= 2 && id.chars().all(|c| c.is_ascii_digit()) {
            let position: usize = id.parse().unwrap_or(0);
            let recent = self.backend.list(&[], INDEX_WINDOW).await?;
            return Ok(position.checked_sub(1).and_then(|i| recent.into_iter().nth(i)));
        }

        let id = id.to_lowercase();
        if let Some(note) = self.backend.get(&id).await? {
            return Ok(Some(note));
        }

        let mut matches = self.backend.find_by_prefix(&id).await?;
        if matches.len() > 1 {
            tracing::debug!(prefix = %id, matches = matches.len(), "ambiguous note prefix");
            return Ok(None);
        }
        Ok(matches.pop())
    }
}

fn not_found(kind: &str, id: &str) -> CommandResult {
    CommandResult::new(format!("## $$notes {kind}\n\nError: Note '{id}' not found."))
}

fn comma_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return "none".to_string();
    }
    tags.iter().map(|t| format!("`{t}`")).collect::<Vec<_>>().join(", ")
}

fn spaced_tags(tags: &[String]) -> Option<String> {
    (!tags.is_empty()).then(|| tags.iter().map(|t| format!("`{t}`")).collect::<Vec<_>>().join(" "))
}

fn filter_suffix(filter: &[String]) -> String {
    if filter.is_empty() {
        String::new()
    } else {
        format!(" (filtered by: {})", comma_tags(filter))
    }
}

fn created_date(note: &Note) -> String {
    note.created_at.format("%Y-%m-%d").to_string()
}

fn flatten(text: &str) -> String {
    text.replace("\\n", " ").replace('\n', " ")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max - 3).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

fn with_entries(header: String, notes: &[Note]) -> String {
    let mut sections = vec![header];
    sections.extend(notes.iter().map(listing_entry));
    sections.join("\n\n")
}

fn listing_entry(note: &Note) -> String {
    let title = flatten(&note.title);
    let title = truncate(title.trim_start_matches(['#', ' ']).trim(), LISTING_TITLE_CHARS);

    let content = flatten(&note.content);
    let mut preview: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }

    let mut entry = format!(
        "### {title}\n**ID:** `{}` **Created:** {}",
        note.short_id(),
        created_date(note)
    );
    if let Some(tags) = spaced_tags(&note.tags) {
        entry.push_str(&format!("\n**Tags:** {tags}"));
    }
    entry.push_str(&format!("\n\n{preview}"));
    entry
}
