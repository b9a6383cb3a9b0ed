//! Pipeline splitting.
//!
//! A pipeline is one input line holding several commands separated by `|`.
//! Not every pipe is a separator:
//!
//! - A pipe counts only when whitespace sits on both sides and the nearest
//!   non-whitespace characters on both sides are alphanumeric. `a|b`,
//!   `x || y` and `` `cmd` | `other` `` stay intact.
//! - Input that starts or ends with a pipe is a markdown table row and is
//!   returned as one segment.
//! - Input led by a content-consuming command (for example `notes add`) is
//!   returned as one segment so user content may contain pipes freely.

/// Character separating pipeline segments.
pub const PIPELINE_DELIMITER: char = '|';

/// Commands whose arguments are free-form content and are never split.
pub const DEFAULT_CONTENT_CONSUMING: &[&str] = &["notes add", "prompt"];

/// Splits input lines into command segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSplitter {
    content_consuming: Vec<Vec<String>>,
}

impl Default for PipelineSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_CONSUMING)
    }
}

impl PipelineSplitter {
    /// Creates a splitter with the given content-consuming command prefixes.
    ///
    /// Prefixes are matched token by token, case-insensitively.
    #[must_use]
    pub fn new<I, S>(content_consuming: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let content_consuming = content_consuming
            .into_iter()
            .map(|prefix| {
                prefix
                    .as_ref()
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
            })
            .filter(|tokens| !tokens.is_empty())
            .collect();

        Self { content_consuming }
    }

    /// Splits `input` into trimmed, non-empty segments.
    ///
    /// Empty or whitespace-only input yields no segments.
    #[must_use]
    pub fn split(&self, input: &str) -> Vec<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        if self.is_content_consuming(trimmed)
            || trimmed.starts_with(PIPELINE_DELIMITER)
            || trimmed.ends_with(PIPELINE_DELIMITER)
        {
            return vec![trimmed.to_string()];
        }

        let chars: Vec<(usize, char)> = trimmed.char_indices().collect();
        let mut segments = Vec::new();
        let mut start = 0;

        for (pos, &(idx, c)) in chars.iter().enumerate() {
            if c == PIPELINE_DELIMITER && is_separator(&chars, pos) {
                segments.push(&trimmed[start..idx]);
                start = idx + c.len_utf8();
            }
        }
        segments.push(&trimmed[start..]);

        segments
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Returns true if the leading tokens of `input` name a content-consuming
    /// command.
    #[must_use]
    pub fn is_content_consuming(&self, input: &str) -> bool {
        let tokens: Vec<String> = input
            .split_whitespace()
            .take(self.max_prefix_len())
            .map(str::to_lowercase)
            .collect();

        self.content_consuming.iter().any(|prefix| {
            tokens.len() >= prefix.len() && tokens.iter().zip(prefix).all(|(t, p)| t == p)
        })
    }

    fn max_prefix_len(&self) -> usize {
        self.content_consuming.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Splits `input` using the given content-consuming prefixes.
///
/// # Examples
///
/// ```rust
/// use pal::split_pipeline;
///
/// let segments = split_pipeline("echo a | echo b", &["notes add"]);
/// assert_eq!(segments, vec!["echo a", "echo b"]);
///
/// let segments = split_pipeline("notes add x | y", &["notes add"]);
/// assert_eq!(segments, vec!["notes add x | y"]);
/// ```
#[must_use]
pub fn split_pipeline<S: AsRef<str>>(input: &str, content_consuming: &[S]) -> Vec<String> {
    PipelineSplitter::new(content_consuming).split(input)
}

fn is_separator(chars: &[(usize, char)], pos: usize) -> bool {
    let before_is_space = pos
        .checked_sub(1)
        .and_then(|p| chars.get(p))
        .is_some_and(|(_, c)| c.is_whitespace());
    let after_is_space = chars.get(pos + 1).is_some_and(|(_, c)| c.is_whitespace());
    if !before_is_space || !after_is_space {
        return false;
    }

    let left = chars[..pos]
        .iter()
        .rev()
        .map(|(_, c)| *c)
        .find(|c| !c.is_whitespace());
    let right = chars[pos + 1..]
        .iter()
        .map(|(_, c)| *c)
        .find(|c| !c.is_whitespace());

    left.is_some_and(char::is_alphanumeric) && right.is_some_and(char::is_alphanumeric)
}
