//! Bundled default documents.
//!
//! The defaults are compiled into the binary and written to the bundled
//! directory on demand with [`seed_bundled`].

use std::fs;
use std::path::Path;

use crate::models::DocumentPath;
use crate::{Error, Result};

/// Name of the protocol document prepended to every resolved prompt.
pub const PROTOCOL_DOCUMENT: &str = "root";

/// Bundled documents that are not user commands.
pub const INTERNAL_DOCUMENTS: &[&str] = &["root", "help", "curl"];

/// Default documents as `(name, content)` pairs.
pub const BUNDLED_DOCUMENTS: &[(&str, &str)] = &[
    ("root", include_str!("../../prompts/root.md")),
    ("help", include_str!("../../prompts/help.md")),
    ("curl", include_str!("../../prompts/curl.md")),
    ("git", include_str!("../../prompts/git.md")),
    ("git commit", include_str!("../../prompts/git/commit.md")),
    ("git review", include_str!("../../prompts/git/review.md")),
    ("review", include_str!("../../prompts/review.md")),
    ("tr", include_str!("../../prompts/tr.md")),
    ("notes", include_str!("../../prompts/notes.md")),
    ("notes add", include_str!("../../prompts/notes/add.md")),
    ("notes list", include_str!("../../prompts/notes/list.md")),
    ("notes view", include_str!("../../prompts/notes/view.md")),
    ("notes load", include_str!("../../prompts/notes/load.md")),
    ("notes search", include_str!("../../prompts/notes/search.md")),
    ("notes ai", include_str!("../../prompts/notes/ai.md")),
    ("notes tags", include_str!("../../prompts/notes/tags.md")),
    ("notes delete", include_str!("../../prompts/notes/delete.md")),
    ("notes help", include_str!("../../prompts/notes/help.md")),
];

/// Returns true if `name` is an internal bundled document hidden from help.
#[must_use]
pub fn is_internal(name: &str) -> bool {
    INTERNAL_DOCUMENTS.contains(&name)
}

/// Writes every bundled document missing from `dir`.
///
/// Existing files are left untouched, so seeding is idempotent.
///
/// # Returns
///
/// The number of files written.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be created.
pub fn seed_bundled(dir: &Path) -> Result<usize> {
    let mut written = 0;

    for (name, content) in BUNDLED_DOCUMENTS {
        let file = dir.join(DocumentPath::from_name(name)?.relative_file());
        if file.exists() {
            continue;
        }

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "seed_bundled_dir".to_string(),
                cause: format!("{}: {e}", parent.display()),
            })?;
        }

        fs::write(&file, content).map_err(|e| Error::OperationFailed {
            operation: "seed_bundled_file".to_string(),
            cause: format!("{}: {e}", file.display()),
        })?;
        written += 1;
    }

    tracing::debug!(dir = %dir.display(), written, "seeded bundled documents");
    Ok(written)
}
