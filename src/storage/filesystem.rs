//! Filesystem-based document storage.
//!
//! Each tier is a directory tree of markdown files. The document
//! `["git", "commit"]` in the custom tier lives at `{custom}/git/commit.md`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::DocumentStore;
use crate::config::PalConfig;
use crate::models::{DOCUMENT_EXTENSION, DocumentPath, Tier, is_valid_segment};
use crate::{Error, Result};

/// Filesystem-based document storage with one root directory per tier.
#[derive(Debug, Clone)]
pub struct FilesystemDocumentStore {
    bundled: PathBuf,
    overrides: PathBuf,
    custom: PathBuf,
}

impl FilesystemDocumentStore {
    /// Creates a store over the given tier roots.
    ///
    /// Directories are not created until something is written.
    #[must_use]
    pub fn new(
        bundled: impl Into<PathBuf>,
        overrides: impl Into<PathBuf>,
        custom: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bundled: bundled.into(),
            overrides: overrides.into(),
            custom: custom.into(),
        }
    }

    /// Creates a store using the directories from `config`.
    #[must_use]
    pub fn from_config(config: &PalConfig) -> Self {
        Self::new(
            &config.bundled_dir,
            &config.overrides_dir,
            &config.custom_dir,
        )
    }

    /// Returns the root directory of a tier.
    #[must_use]
    pub fn tier_root(&self, tier: Tier) -> &Path {
        match tier {
            Tier::Bundled => &self.bundled,
            Tier::Override => &self.overrides,
            Tier::Custom => &self.custom,
        }
    }

    /// Returns the file path a document occupies in a tier.
    #[must_use]
    pub fn document_file(&self, tier: Tier, path: &DocumentPath) -> PathBuf {
        self.tier_root(tier).join(path.relative_file())
    }

    fn namespace_dir(&self, tier: Tier, namespace: &[String]) -> Option<PathBuf> {
        if !namespace.iter().all(|s| is_valid_segment(s)) {
            return None;
        }
        let mut dir = self.tier_root(tier).to_path_buf();
        dir.extend(namespace);
        Some(dir)
    }
}

impl DocumentStore for FilesystemDocumentStore {
    fn read(&self, tier: Tier, path: &DocumentPath) -> Result<Option<String>> {
        let file = self.document_file(tier, path);

        match fs::read_to_string(&file) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) if file.is_dir() => {
                tracing::debug!(path = %file.display(), error = %e, "document path is a directory");
                Ok(None)
            },
            Err(e) => Err(Error::OperationFailed {
                operation: "read_document".to_string(),
                cause: format!("{}: {e}", file.display()),
            }),
        }
    }

    fn write(&self, tier: Tier, path: &DocumentPath, content: &str) -> Result<()> {
        if !tier.is_writable() {
            return Err(Error::ReadOnlyTier(tier));
        }

        let file = self.document_file(tier, path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_document_dir".to_string(),
                cause: format!("{}: {e}", parent.display()),
            })?;
        }

        fs::write(&file, content).map_err(|e| Error::OperationFailed {
            operation: "write_document".to_string(),
            cause: format!("{}: {e}", file.display()),
        })
    }

    fn list_children(&self, tier: Tier, namespace: &[String]) -> Result<Vec<String>> {
        let Some(dir) = self.namespace_dir(tier, namespace) else {
            return Ok(Vec::new());
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if !dir.is_dir() => {
                tracing::debug!(path = %dir.display(), error = %e, "namespace is not a directory");
                return Ok(Vec::new());
            },
            Err(e) => {
                return Err(Error::OperationFailed {
                    operation: "list_documents".to_string(),
                    cause: format!("{}: {e}", dir.display()),
                });
            },
        };

        let mut children: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.is_dir() {
                    entry.file_name().to_str().map(ToString::to_string)
                } else if path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION) {
                    path.file_stem().and_then(|s| s.to_str()).map(ToString::to_string)
                } else {
                    None
                }
            })
            .filter(|name| {
                // Paths are lowercased on lookup, so mixed-case files never resolve.
                let addressable = is_valid_segment(name) && *name == name.to_lowercase();
                if !addressable {
                    tracing::debug!(name = %name, path = %dir.display(), "skipping unaddressable entry");
                }
                addressable
            })
            .collect();

        children.sort();
        children.dedup();
        Ok(children)
    }

    fn exists(&self, tier: Tier, path: &DocumentPath) -> Result<bool> {
        Ok(self.document_file(tier, path).is_file())
    }

    fn location(&self, tier: Tier, path: &DocumentPath) -> Option<PathBuf> {
        Some(self.document_file(tier, path))
    }
}
