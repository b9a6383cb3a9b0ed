//! In-memory notes backend.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::NotesBackend;
use crate::models::{NewNote, Note, SearchMode};
use crate::{Error, Result};

/// In-memory notes backend.
///
/// Keyword search requires every query word to appear in the title, content
/// or tags. Semantic search ranks notes by how many query words they share.
#[derive(Debug, Default)]
pub struct InMemoryNotesBackend {
    notes: RwLock<Vec<Note>>,
}

impl InMemoryNotesBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored notes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.read().map(|n| n.len()).unwrap_or(0)
    }

    /// Returns true if no notes are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self, operation: &str) -> Result<Vec<Note>> {
        self.notes
            .read()
            .map(|notes| notes.clone())
            .map_err(|_| lock_error(operation))
    }
}

fn lock_error(operation: &str) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: "Lock poisoned".to_string(),
    }
}

fn has_any_tag(note: &Note, tags: &[String]) -> bool {
    tags.is_empty() || note.tags.iter().any(|t| tags.contains(t))
}

fn haystack(note: &Note) -> String {
    format!("{} {} {}", note.title, note.content, note.tags.join(" ")).to_lowercase()
}

fn newest_first(notes: &mut [Note]) {
    // Equal timestamps fall back to reverse insertion order.
    notes.reverse();
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl NotesBackend for InMemoryNotesBackend {
    async fn add(&self, note: NewNote) -> Result<Note> {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: note.title,
            content: note.content,
            tags: note.tags,
            created_at: Utc::now(),
        };

        self.notes
            .write()
            .map_err(|_| lock_error("add_note"))?
            .push(note.clone());

        Ok(note)
    }

    async fn list(&self, tags: &[String], limit: usize) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .snapshot("list_notes")?
            .into_iter()
            .filter(|n| has_any_tag(n, tags))
            .collect();
        newest_first(&mut notes);
        notes.truncate(limit);
        Ok(notes)
    }

    async fn search(
        &self,
        query: &str,
        tags: &[String],
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<Note>> {
        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        let mut notes = self.snapshot("search_notes")?;
        newest_first(&mut notes);

        let mut scored: Vec<(usize, Note)> = notes
            .into_iter()
            .filter(|n| has_any_tag(n, tags))
            .filter_map(|n| {
                let text = haystack(&n);
                let hits = words.iter().filter(|w| text.contains(w.as_str())).count();
                let matched = match mode {
                    SearchMode::Keyword => hits == words.len(),
                    SearchMode::Semantic => words.is_empty() || hits > 0,
                };
                matched.then_some((hits, n))
            })
            .collect();

        if mode == SearchMode::Semantic {
            scored.sort_by(|a, b| b.0.cmp(&a.0));
        }

        Ok(scored.into_iter().take(limit).map(|(_, n)| n).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Note>> {
        Ok(self
            .snapshot("get_note")?
            .into_iter()
            .find(|n| n.id == id))
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Note>> {
        let prefix = prefix.to_lowercase();
        Ok(self
            .snapshot("find_note")?
            .into_iter()
            .filter(|n| n.id.starts_with(&prefix))
            .collect())
    }

    async fn update_tags(&self, id: &str, tags: Vec<String>) -> Result<Option<Note>> {
        let mut notes = self.notes.write().map_err(|_| lock_error("update_tags"))?;
        Ok(notes.iter_mut().find(|n| n.id == id).map(|note| {
            note.tags = tags;
            note.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut notes = self.notes.write().map_err(|_| lock_error("delete_note"))?;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        Ok(notes.len() != before)
    }
}
