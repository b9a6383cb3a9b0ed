//! Document addressing, tiers, and front matter metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

use crate::{Error, Result};

/// File extension used for documents on disk.
pub const DOCUMENT_EXTENSION: &str = "md";

/// Ownership tier of a document.
///
/// Tiers are listed in the order callers should consider them: bundled
/// defaults first, then user overrides, then user-created custom documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Read-only defaults shipped with the crate.
    Bundled,
    /// User customizations that mirror bundled paths.
    Override,
    /// User-created documents under arbitrary names.
    Custom,
}

impl Tier {
    /// Returns the tier name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bundled => "bundled",
            Self::Override => "override",
            Self::Custom => "custom",
        }
    }

    /// Returns true if documents in this tier may be written.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !matches!(self, Self::Bundled)
    }

    /// Writable tiers in lookup order.
    #[must_use]
    pub const fn writable() -> &'static [Self] {
        &[Self::Override, Self::Custom]
    }

    /// All tiers in precedence order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Bundled, Self::Override, Self::Custom]
    }

    /// Parses a tier name. Accepts `user` as an alias for `override`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bundled" => Some(Self::Bundled),
            "override" | "user" => Some(Self::Override),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Address of a document: one or more lowercase path segments.
///
/// `"git add"` maps to `["git", "add"]`, stored as `git/add.md`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DocumentPath(Vec<String>);

impl DocumentPath {
    /// Creates a path from segments, lowercasing each one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the path is empty or any segment is
    /// not a valid segment (see [`is_valid_segment`]).
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();

        if segments.is_empty() {
            return Err(Error::InvalidInput("document path cannot be empty".to_string()));
        }

        if let Some(bad) = segments.iter().find(|s| !is_valid_segment(s)) {
            return Err(Error::InvalidInput(format!(
                "invalid path segment '{bad}': use letters, digits, '-', '_' or '.'"
            )));
        }

        Ok(Self(segments))
    }

    /// Parses a space-separated name such as `"foo bar baz"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the name is blank or contains an
    /// invalid segment.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::new(name.split_whitespace())
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the last segment.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// Returns a new path with `segment` appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the segment is invalid.
    pub fn child(&self, segment: &str) -> Result<Self> {
        let segment = segment.to_lowercase();
        if !is_valid_segment(&segment) {
            return Err(Error::InvalidInput(format!("invalid path segment '{segment}'")));
        }
        let mut segments = self.0.clone();
        segments.push(segment);
        Ok(Self(segments))
    }

    /// Returns the space-joined name, e.g. `"git add"`.
    #[must_use]
    pub fn name(&self) -> String {
        self.0.join(" ")
    }

    /// Returns the relative file path, e.g. `git/add.md`.
    #[must_use]
    pub fn relative_file(&self) -> PathBuf {
        let mut path: PathBuf = self.0.iter().collect();
        path.set_extension(DOCUMENT_EXTENSION);
        path
    }

    /// Returns the relative URI form, e.g. `git/add.md`.
    #[must_use]
    pub fn uri_path(&self) -> String {
        format!("{}.{DOCUMENT_EXTENSION}", self.0.join("/"))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns true if `segment` can be used as a single path component.
///
/// Segments are non-empty, do not start with a dot and contain only ASCII
/// alphanumerics, `-`, `_` and `.`.
#[must_use]
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// How a writable document combines with the bundled document at the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Writable body replaces the bundled body.
    #[default]
    Override,
    /// Bundled body, blank line, writable body.
    Append,
    /// Writable body, blank line, bundled body.
    Prepend,
}

impl MergeStrategy {
    /// Parses a strategy name. Unrecognized names fall back to `Override`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "append" => Self::Append,
            "prepend" => Self::Prepend,
            _ => Self::Override,
        }
    }

    /// Returns the strategy name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Append => "append",
            Self::Prepend => "prepend",
        }
    }

    /// Combines bundled and writable bodies.
    #[must_use]
    pub fn merge(&self, bundled: &str, writable: &str) -> String {
        match self {
            Self::Override => writable.to_string(),
            Self::Append => format!("{bundled}\n\n{writable}"),
            Self::Prepend => format!("{writable}\n\n{bundled}"),
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parsed front matter: a string-keyed mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frontmatter(Map<String, Value>);

impl Frontmatter {
    /// Creates an empty front matter mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing mapping.
    #[must_use]
    pub const fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns true if no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the declared merge strategy, defaulting to `Override`.
    #[must_use]
    pub fn merge_strategy(&self) -> MergeStrategy {
        self.0
            .get("merge_strategy")
            .and_then(Value::as_str)
            .map_or(MergeStrategy::Override, MergeStrategy::parse)
    }

    /// Returns the declared subcommand tokens.
    ///
    /// `None` when the key is absent. When the key is present but empty or
    /// null this is `Some` of an empty list, which callers treat as "no
    /// children allowed". A list of names is accepted as well as a mapping.
    #[must_use]
    pub fn subcommands(&self) -> Option<Vec<String>> {
        let value = self.0.get("subcommands")?;
        let keys = match value {
            Value::Object(map) => map.keys().map(|k| k.to_lowercase()).collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_lowercase)
                .collect(),
            _ => Vec::new(),
        };
        Some(keys)
    }

    /// Returns the `description` field, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }
}
