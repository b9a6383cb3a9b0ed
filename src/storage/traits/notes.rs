//! Notes backend trait definition.

use async_trait::async_trait;

use crate::Result;
use crate::models::{NewNote, Note, SearchMode};

/// Trait for note storage and search backends.
///
/// Search engines are remote services, so every operation is async.
#[async_trait]
pub trait NotesBackend: Send + Sync {
    /// Stores a new note and returns it with its assigned id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be stored.
    async fn add(&self, note: NewNote) -> Result<Note>;

    /// Lists the most recent notes, newest first.
    ///
    /// A non-empty `tags` keeps notes carrying any of the given tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    async fn list(&self, tags: &[String], limit: usize) -> Result<Vec<Note>>;

    /// Searches notes, best match first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    async fn search(
        &self,
        query: &str,
        tags: &[String],
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<Note>>;

    /// Gets a note by its full id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    async fn get(&self, id: &str) -> Result<Option<Note>>;

    /// Returns every note whose id starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Note>>;

    /// Replaces the tags of a note.
    ///
    /// # Returns
    ///
    /// The updated note, or `None` if no note has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be updated.
    async fn update_tags(&self, id: &str, tags: Vec<String>) -> Result<Option<Note>>;

    /// Deletes a note.
    ///
    /// # Returns
    ///
    /// True if deleted, false if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be deleted.
    async fn delete(&self, id: &str) -> Result<bool>;
}
