//! Storage layer abstraction.
//!
//! | Store | Backend | Use |
//! |-------|---------|-----|
//! | [`FilesystemDocumentStore`] | Markdown files, one directory per tier | Default |
//! | [`MemoryDocumentStore`] | `RwLock` map | Tests, embedding |
//! | [`InMemoryNotesBackend`] | `RwLock` list | Notes without a search service |

// Allow significant_drop_tightening - lock guards are held for single statements.
#![allow(clippy::significant_drop_tightening)]

mod bundled;
mod filesystem;
mod memory;
mod notes;
pub mod traits;

pub use bundled::{
    BUNDLED_DOCUMENTS, INTERNAL_DOCUMENTS, PROTOCOL_DOCUMENT, is_internal, seed_bundled,
};
pub use filesystem::FilesystemDocumentStore;
pub use memory::MemoryDocumentStore;
pub use notes::InMemoryNotesBackend;
pub use traits::{DocumentStore, NotesBackend};
