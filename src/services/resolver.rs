//! Tiered document resolution.
//!
//! Bundled documents are read-only defaults. A writable document (override
//! tier first, then custom) at the same path either replaces the bundled body
//! or combines with it according to its `merge_strategy` front matter.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::models::{DocumentPath, Frontmatter, Tier};
use crate::parser::FrontmatterParser;
use crate::storage::DocumentStore;
use crate::{Error, Result};

/// A writable-tier document split into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct WritableDocument {
    /// Tier the document was found in.
    pub tier: Tier,
    /// Parsed front matter.
    pub frontmatter: Frontmatter,
    /// Body without front matter.
    pub body: String,
}

/// Resolves document paths across tiers.
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct DocumentResolver {
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for DocumentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentResolver").finish_non_exhaustive()
    }
}

impl DocumentResolver {
    /// Creates a resolver over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Resolves the effective content at `path`.
    ///
    /// | Bundled | Writable | Result |
    /// |---------|----------|--------|
    /// | yes | no | Bundled text verbatim |
    /// | no | yes | Writable body |
    /// | yes | yes | Merged per the writable `merge_strategy` |
    /// | no | no | `None` |
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn resolve(&self, path: &DocumentPath) -> Result<Option<String>> {
        let bundled = self.store.read(Tier::Bundled, path)?;
        let writable = self.writable(path)?;

        let (outcome, content) = match (bundled, writable) {
            (Some(bundled), Some(writable)) => {
                let strategy = writable.frontmatter.merge_strategy();
                tracing::debug!(path = %path, tier = %writable.tier, strategy = %strategy, "merging document");
                ("merged", Some(strategy.merge(&bundled, &writable.body)))
            },
            (Some(bundled), None) => ("bundled", Some(bundled)),
            (None, Some(writable)) => ("writable", Some(writable.body)),
            (None, None) => ("missing", None),
        };

        metrics::counter!("pal_documents_resolved_total", "outcome" => outcome).increment(1);
        Ok(content)
    }

    /// Resolves a space-separated name such as `"git commit"`.
    ///
    /// Names that are not valid document paths resolve to `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn resolve_name(&self, name: &str) -> Result<Option<String>> {
        match DocumentPath::from_name(name) {
            Ok(path) => self.resolve(&path),
            Err(_) => Ok(None),
        }
    }

    /// Returns the first writable document at `path`, override tier first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn writable(&self, path: &DocumentPath) -> Result<Option<WritableDocument>> {
        for &tier in Tier::writable() {
            if let Some(raw) = self.store.read(tier, path)? {
                let (frontmatter, body) = FrontmatterParser::parse(&raw);
                return Ok(Some(WritableDocument {
                    tier,
                    frontmatter,
                    body,
                }));
            }
        }
        Ok(None)
    }

    /// Lists child names under `namespace` across all tiers, sorted and unique.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_children(&self, namespace: &[String]) -> Result<Vec<String>> {
        let mut children = BTreeSet::new();
        for &tier in Tier::all() {
            children.extend(self.store.list_children(tier, namespace)?);
        }
        Ok(children.into_iter().collect())
    }

    /// Lists every document path in `tier`, depth first, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn documents(&self, tier: Tier) -> Result<Vec<DocumentPath>> {
        let mut found = Vec::new();
        let mut pending: Vec<Vec<String>> = vec![Vec::new()];

        while let Some(namespace) = pending.pop() {
            for child in self.store.list_children(tier, &namespace)? {
                let mut segments = namespace.clone();
                segments.push(child);
                let Ok(path) = DocumentPath::new(&segments) else {
                    continue;
                };
                if self.store.exists(tier, &path)? {
                    found.push(path);
                }
                pending.push(segments);
            }
        }

        found.sort();
        Ok(found)
    }

    /// Returns the space-joined names of every document in every tier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn all_document_names(&self) -> Result<Vec<String>> {
        let mut names = BTreeSet::new();
        for &tier in Tier::all() {
            names.extend(self.documents(tier)?.iter().map(DocumentPath::name));
        }
        Ok(names.into_iter().collect())
    }

    /// Returns the names of all custom documents, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn custom_names(&self) -> Result<Vec<String>> {
        Ok(self
            .documents(Tier::Custom)?
            .iter()
            .map(DocumentPath::name)
            .collect())
    }

    /// Loads the raw text of a custom document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load_custom(&self, path: &DocumentPath) -> Result<Option<String>> {
        self.store.read(Tier::Custom, path)
    }

    /// Saves a custom document.
    ///
    /// Literal `\n` sequences in `content` become newlines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty or invalid name, or an
    /// error if the store cannot be written.
    pub fn save_custom(&self, name: &str, content: &str) -> Result<DocumentPath> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("Prompt name is required".to_string()));
        }

        let path = DocumentPath::from_name(name)?;
        let content = content.replace("\\n", "\n");
        self.store.write(Tier::Custom, &path, &content)?;

        metrics::counter!("pal_custom_prompts_saved_total").increment(1);
        tracing::info!(name = %path, "saved custom prompt");
        Ok(path)
    }

    /// Returns where a custom document lives, for display.
    #[must_use]
    pub fn custom_location(&self, path: &DocumentPath) -> PathBuf {
        self.store
            .location(Tier::Custom, path)
            .unwrap_or_else(|| PathBuf::from(Tier::Custom.as_str()).join(path.relative_file()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDocumentStore;

    fn resolver(store: MemoryDocumentStore) -> DocumentResolver {
        DocumentResolver::new(Arc::new(store))
    }

    fn path(name: &str) -> DocumentPath {
        DocumentPath::from_name(name).unwrap()
    }

    #[test]
    fn test_resolve_bundled_only() {
        let r = resolver(MemoryDocumentStore::new().with_document(Tier::Bundled, "git", "B"));
        assert_eq!(r.resolve(&path("git")).unwrap(), Some("B".to_string()));
    }

    #[test]
    fn test_resolve_writable_only_strips_frontmatter() {
        let r = resolver(MemoryDocumentStore::new().with_document(
            Tier::Custom,
            "tr",
            "---\nmerge_strategy: append\n---\nW",
        ));
        assert_eq!(r.resolve(&path("tr")).unwrap(), Some("W".to_string()));
    }

    #[test]
    fn test_resolve_merge_strategies() {
        for (front, expected) in [
            ("merge_strategy: append", "B\n\nW"),
            ("merge_strategy: prepend", "W\n\nB"),
            ("merge_strategy: override", "W"),
            ("merge_strategy: unknown", "W"),
            ("description: none", "W"),
        ] {
            let r = resolver(
                MemoryDocumentStore::new()
                    .with_document(Tier::Bundled, "git", "B")
                    .with_document(Tier::Override, "git", format!("---\n{front}\n---\nW")),
            );
            assert_eq!(r.resolve(&path("git")).unwrap().as_deref(), Some(expected), "{front}");
        }
    }

    #[test]
    fn test_override_tier_shadows_custom() {
        let r = resolver(
            MemoryDocumentStore::new()
                .with_document(Tier::Override, "git", "O")
                .with_document(Tier::Custom, "git", "C"),
        );
        assert_eq!(r.resolve(&path("git")).unwrap(), Some("O".to_string()));
        assert_eq!(r.writable(&path("git")).unwrap().unwrap().tier, Tier::Override);
    }

    #[test]
    fn test_resolve_missing_and_idempotent() {
        let r = resolver(MemoryDocumentStore::new().with_document(Tier::Bundled, "a", "x"));
        assert_eq!(r.resolve(&path("missing")).unwrap(), None);
        assert_eq!(r.resolve_name("../etc").unwrap(), None);
        assert_eq!(r.resolve(&path("a")).unwrap(), r.resolve(&path("a")).unwrap());
    }

    #[test]
    fn test_save_and_load_custom() {
        let r = resolver(MemoryDocumentStore::new());
        let saved = r.save_custom("Foo bar baz", "line one\\nline two").unwrap();

        assert_eq!(saved.segments(), ["foo", "bar", "baz"]);
        assert_eq!(
            r.load_custom(&path("foo bar baz")).unwrap(),
            Some("line one\nline two".to_string())
        );
        assert_eq!(
            r.custom_location(&saved),
            PathBuf::from("custom/foo/bar/baz.md")
        );
    }

    #[test]
    fn test_save_custom_rejects_empty_name() {
        let r = resolver(MemoryDocumentStore::new());
        let err = r.save_custom("  ", "x").unwrap_err();
        assert_eq!(err.to_string(), "invalid input: Prompt name is required");
    }

    #[test]
    fn test_documents_and_names() {
        let r = resolver(
            MemoryDocumentStore::new()
                .with_document(Tier::Bundled, "git", "g")
                .with_document(Tier::Bundled, "git commit", "c")
                .with_document(Tier::Custom, "foo bar baz", "f")
                .with_document(Tier::Custom, "tr", "t"),
        );

        assert_eq!(r.custom_names().unwrap(), vec!["foo bar baz", "tr"]);
        assert_eq!(
            r.all_document_names().unwrap(),
            vec!["foo bar baz", "git", "git commit", "tr"]
        );
        assert_eq!(r.list_children(&[]).unwrap(), vec!["foo", "git", "tr"]);
    }
}
