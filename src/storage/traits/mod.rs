//! Storage backend traits.

mod document;
mod notes;

pub use document::DocumentStore;
pub use notes::NotesBackend;
