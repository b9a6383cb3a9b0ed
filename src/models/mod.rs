//! Data models for pal.
//!
//! Value types shared by the parser, the document resolver and the
//! dispatcher.

mod command;
mod document;
mod note;

pub use command::{CommandResult, ParsedCommand};
pub use document::{
    DOCUMENT_EXTENSION, DocumentPath, Frontmatter, MergeStrategy, Tier, is_valid_segment,
};
pub use note::{NewNote, Note, SearchMode, TITLE_MAX_CHARS, derive_title};
