//! Note types for the notes command.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length before truncation.
pub const TITLE_MAX_CHARS: usize = 50;

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier (v4 UUID, hyphenated).
    pub id: String,
    /// Short title derived from the content.
    pub title: String,
    /// Full note content.
    pub content: String,
    /// Lowercased tags.
    pub tags: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Returns the first eight characters of the id.
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// A note about to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewNote {
    /// Short title.
    pub title: String,
    /// Full content.
    pub content: String,
    /// Tags in priority order.
    pub tags: Vec<String>,
}

impl NewNote {
    /// Creates a note with a title derived from `content`.
    #[must_use]
    pub fn from_content(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            title: derive_title(&content),
            content,
            tags: Vec::new(),
        }
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// How a search query is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Case-insensitive substring match.
    #[default]
    Keyword,
    /// Backend-defined semantic match.
    Semantic,
}

impl SearchMode {
    /// Returns the mode as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Semantic => "semantic",
        }
    }
}

/// Derives a title: the first sentence, truncated to [`TITLE_MAX_CHARS`].
#[must_use]
pub fn derive_title(content: &str) -> String {
    let first_line = content.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let sentence = first_line.split(". ").next().unwrap_or(first_line).trim();

    if sentence.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = sentence.chars().take(TITLE_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        sentence.to_string()
    }
}
