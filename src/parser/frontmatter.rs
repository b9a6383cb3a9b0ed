//! YAML front matter parsing.
//!
//! Documents may open with a metadata block:
//! ```text
//! ---
//! merge_strategy: append
//! subcommands:
//!   add: {}
//!   list: {}
//! ---
//! Body text.
//! ```
//!
//! Malformed metadata is never partially recovered: the whole input is
//! returned as the body with empty metadata.

use serde_json::Value;

use crate::models::Frontmatter;

/// Parser for YAML front matter in markdown documents.
pub struct FrontmatterParser;

impl FrontmatterParser {
    /// The front matter delimiter line.
    pub const DELIMITER: &'static str = "---";

    /// Splits `content` into front matter and body.
    ///
    /// The opening line must be exactly `---` and a later line must be exactly
    /// `---`. Without both, or when the block is not a YAML mapping, the
    /// metadata is empty and the body is `content` unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pal::parser::FrontmatterParser;
    /// use pal::MergeStrategy;
    ///
    /// let (meta, body) = FrontmatterParser::parse("---\nmerge_strategy: append\n---\nBody");
    /// assert_eq!(meta.merge_strategy(), MergeStrategy::Append);
    /// assert_eq!(body, "Body");
    ///
    /// let (meta, body) = FrontmatterParser::parse("No metadata");
    /// assert!(meta.is_empty());
    /// assert_eq!(body, "No metadata");
    /// ```
    #[must_use]
    pub fn parse(content: &str) -> (Frontmatter, String) {
        let Some((yaml, body)) = Self::split_block(content) else {
            return (Frontmatter::new(), content.to_string());
        };

        if yaml.trim().is_empty() {
            return (Frontmatter::new(), body.to_string());
        }

        match serde_yaml_ng::from_str::<Value>(yaml) {
            Ok(Value::Object(map)) => (Frontmatter::from_map(map), body.to_string()),
            Ok(Value::Null) => (Frontmatter::new(), body.to_string()),
            Ok(_) => {
                tracing::debug!("front matter is not a mapping, treating as body");
                (Frontmatter::new(), content.to_string())
            },
            Err(e) => {
                tracing::debug!(error = %e, "malformed front matter, treating as body");
                (Frontmatter::new(), content.to_string())
            },
        }
    }

    /// Returns the body with any valid front matter removed.
    #[must_use]
    pub fn body(content: &str) -> String {
        Self::parse(content).1
    }

    /// Locates the delimited block, returning the raw YAML and the body.
    fn split_block(content: &str) -> Option<(&str, &str)> {
        let mut lines = content.split_inclusive('\n');
        let first = lines.next()?;
        if !Self::is_delimiter(first) {
            return None;
        }

        let yaml_start = first.len();
        let mut offset = yaml_start;
        for line in lines {
            if Self::is_delimiter(line) {
                return Some((&content[yaml_start..offset], &content[offset + line.len()..]));
            }
            offset += line.len();
        }

        None
    }

    fn is_delimiter(line: &str) -> bool {
        line.trim_end_matches(['\r', '\n']) == Self::DELIMITER
    }
}
