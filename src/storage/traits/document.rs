//! Document store trait definition.

use std::path::PathBuf;

use crate::Result;
use crate::models::{DocumentPath, Tier};

/// Trait for tiered markdown document stores.
///
/// A store holds one namespace of documents per [`Tier`]. Implementations
/// must be safe to call concurrently; concurrent writes to the same path are
/// last-write-wins.
///
/// The trait is object-safe so the dispatcher can hold an
/// `Arc<dyn DocumentStore>`.
pub trait DocumentStore: Send + Sync {
    /// Reads the raw text of a document.
    ///
    /// # Returns
    ///
    /// The full document text including any front matter, or `None` if the
    /// tier has no document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be accessed.
    fn read(&self, tier: Tier, path: &DocumentPath) -> Result<Option<String>>;

    /// Writes a document, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnlyTier`](crate::Error::ReadOnlyTier) for the
    /// bundled tier, or an error if the store cannot be written.
    fn write(&self, tier: Tier, path: &DocumentPath, content: &str) -> Result<()>;

    /// Lists the immediate child names under `namespace`.
    ///
    /// An empty `namespace` lists top-level names. A child is either a
    /// document (`<namespace>/<child>`) or a node with documents beneath it.
    /// Names are sorted and unique.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be accessed.
    fn list_children(&self, tier: Tier, namespace: &[String]) -> Result<Vec<String>>;

    /// Returns true if the tier has a document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be accessed.
    fn exists(&self, tier: Tier, path: &DocumentPath) -> Result<bool>;

    /// Returns where the document at `path` lives, for display to users.
    ///
    /// Stores without a meaningful location return `None`.
    fn location(&self, _tier: Tier, _path: &DocumentPath) -> Option<PathBuf> {
        None
    }
}
