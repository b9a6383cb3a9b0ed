//! In-memory document storage.
//!
//! Useful for tests and for embedding pal without touching the filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use super::{BUNDLED_DOCUMENTS, DocumentStore};
use crate::models::{DocumentPath, Tier};
use crate::{Error, Result};

/// In-memory document storage.
///
/// Uses `RwLock` for thread-safe access with reader-writer semantics.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<BTreeMap<(Tier, DocumentPath), String>>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document to any tier, including the bundled tier.
    ///
    /// This is how bundled defaults are seeded; [`DocumentStore::write`]
    /// rejects the bundled tier.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a valid document name.
    pub fn insert(&self, tier: Tier, name: &str, content: impl Into<String>) -> Result<()> {
        let path = DocumentPath::from_name(name)?;
        let mut documents = self.documents.write().map_err(|_| Error::OperationFailed {
            operation: "insert_document".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;
        documents.insert((tier, path), content.into());
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert) that ignores invalid names.
    #[must_use]
    pub fn with_document(self, tier: Tier, name: &str, content: impl Into<String>) -> Self {
        if let Err(e) = self.insert(tier, name, content) {
            tracing::warn!(name, error = %e, "skipping document");
        }
        self
    }

    /// Creates a store pre-loaded with the bundled default documents.
    #[must_use]
    pub fn with_bundled_defaults() -> Self {
        BUNDLED_DOCUMENTS
            .iter()
            .fold(Self::new(), |store, (name, content)| {
                store.with_document(Tier::Bundled, name, *content)
            })
    }

    /// Returns the number of stored documents across all tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns true if the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn read(&self, tier: Tier, path: &DocumentPath) -> Result<Option<String>> {
        let documents = self.documents.read().map_err(|_| Error::OperationFailed {
            operation: "read_document".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;
        Ok(documents.get(&(tier, path.clone())).cloned())
    }

    fn write(&self, tier: Tier, path: &DocumentPath, content: &str) -> Result<()> {
        if !tier.is_writable() {
            return Err(Error::ReadOnlyTier(tier));
        }
        let mut documents = self.documents.write().map_err(|_| Error::OperationFailed {
            operation: "write_document".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;
        documents.insert((tier, path.clone()), content.to_string());
        Ok(())
    }

    fn list_children(&self, tier: Tier, namespace: &[String]) -> Result<Vec<String>> {
        let documents = self.documents.read().map_err(|_| Error::OperationFailed {
            operation: "list_documents".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;

        let children: BTreeSet<String> = documents
            .keys()
            .filter(|(t, _)| *t == tier)
            .filter_map(|(_, path)| {
                let segments = path.segments();
                (segments.len() > namespace.len() && segments.starts_with(namespace))
                    .then(|| segments[namespace.len()].clone())
            })
            .collect();

        Ok(children.into_iter().collect())
    }

    fn exists(&self, tier: Tier, path: &DocumentPath) -> Result<bool> {
        let documents = self.documents.read().map_err(|_| Error::OperationFailed {
            operation: "exists_document".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;
        Ok(documents.contains_key(&(tier, path.clone())))
    }
}
