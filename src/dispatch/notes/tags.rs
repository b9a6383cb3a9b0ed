//! Tag generation for new notes.
//!
//! | Provider | Tags | Extra output |
//! |----------|------|--------------|
//! | `none` | Keywords | - |
//! | `follow-up` | Keywords | Instruction to run `$$notes tags` with better tags |
//! | `sampling` | [`TagSuggester`] reply, keywords on failure | - |

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::Result;
use crate::config::TagProvider;

// Pattern is a compile-time literal and always valid.
macro_rules! lazy_regex {
    ($pattern:expr) => {
        LazyLock::new(|| Regex::new($pattern).unwrap_or_else(|_| unreachable!()))
    };
}

/// Words of four or more ASCII letters.
static WORD_PATTERN: LazyLock<Regex> = lazy_regex!(r"\b[a-zA-Z]{4,}\b");

/// Accepted shape of a suggested tag.
static TAG_PATTERN: LazyLock<Regex> = lazy_regex!(r"^[a-z0-9-]+$");

/// Frequent words never used as keyword tags.
const STOPWORDS: &[&str] = &[
    "this", "that", "with", "from", "have", "been", "were", "they", "their", "about", "would",
    "could", "should", "which", "there", "where", "when", "what", "some", "into", "more", "other",
    "very", "just", "also", "than", "then", "only", "here", "technical", "note",
];

/// Number of keyword tags extracted from content.
pub const KEYWORD_TAG_COUNT: usize = 3;

/// Maximum number of suggested tags kept.
pub const MAX_SUGGESTED_TAGS: usize = 5;

/// Suggested tags must be shorter than this.
const MAX_TAG_CHARS: usize = 30;

/// Content characters sent to a suggester.
const SUGGESTION_CONTENT_CHARS: usize = 2000;

/// Content characters quoted in a follow-up instruction.
const FOLLOW_UP_CONTENT_CHARS: usize = 500;

/// Asks a language model for tags, e.g. through a client's sampling capability.
#[async_trait]
pub trait TagSuggester: Send + Sync {
    /// Sends `request` and returns the raw reply, expected to be comma-separated tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be reached or declines.
    async fn suggest(&self, request: &str) -> Result<String>;
}

/// Tags produced for a new note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedTags {
    /// Generated tags, in order.
    pub tags: Vec<String>,
    /// Content excerpt to quote in a follow-up tagging instruction.
    pub follow_up: Option<String>,
}

/// Extracts the first distinct words of four or more letters that are not stopwords.
#[must_use]
pub fn keyword_tags(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    let mut tags: Vec<String> = Vec::new();

    for word in WORD_PATTERN.find_iter(&lowered).map(|m| m.as_str()) {
        if tags.len() == KEYWORD_TAG_COUNT {
            break;
        }
        if !STOPWORDS.contains(&word) && !tags.iter().any(|t| t == word) {
            tags.push(word.to_string());
        }
    }
    tags
}

/// Cleans a comma-separated model reply into valid tags.
#[must_use]
pub fn sanitize_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && t.chars().count() < MAX_TAG_CHARS)
        .map(|t| t.to_lowercase().replace(' ', "-"))
        .filter(|t| TAG_PATTERN.is_match(t))
        .take(MAX_SUGGESTED_TAGS)
        .collect()
}

/// Builds the request sent to a [`TagSuggester`].
#[must_use]
pub fn suggestion_request(content: &str) -> String {
    let excerpt: String = content.chars().take(SUGGESTION_CONTENT_CHARS).collect();
    format!(
        "Extract 3-5 topic tags for this note. \
         Return ONLY comma-separated lowercase single-word tags, nothing else. \
         Focus on the main technical concepts and topics.\n\n{excerpt}"
    )
}

/// Merges user tags (first) with generated tags, dropping duplicates.
#[must_use]
pub fn merge_tags(user: &[String], generated: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(user.len() + generated.len());
    for tag in user.iter().chain(generated) {
        if !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }
    merged
}

/// Generates tags for `content` with the configured provider.
pub async fn generate(
    provider: TagProvider,
    suggester: Option<&dyn TagSuggester>,
    content: &str,
) -> GeneratedTags {
    match provider {
        TagProvider::None => GeneratedTags {
            tags: keyword_tags(content),
            follow_up: None,
        },
        TagProvider::FollowUp => GeneratedTags {
            tags: keyword_tags(content),
            follow_up: Some(content.chars().take(FOLLOW_UP_CONTENT_CHARS).collect()),
        },
        TagProvider::Sampling => {
            let suggested = match suggester {
                Some(suggester) => match suggester.suggest(&suggestion_request(content)).await {
                    Ok(reply) => sanitize_tags(&reply),
                    Err(e) => {
                        tracing::warn!(error = %e, "tag suggestion failed");
                        Vec::new()
                    },
                },
                None => {
                    tracing::warn!("sampling tag provider configured without a suggester");
                    Vec::new()
                },
            };

            let tags = if suggested.is_empty() {
                keyword_tags(content)
            } else {
                suggested
            };
            tracing::debug!(provider = provider.as_str(), count = tags.len(), "generated tags");
            GeneratedTags {
                tags,
                follow_up: None,
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use test_case::test_case;

    struct FixedSuggester(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl TagSuggester for FixedSuggester {
        async fn suggest(&self, request: &str) -> Result<String> {
            assert!(request.starts_with("Extract 3-5 topic tags"));
            self.0
                .map(ToString::to_string)
                .map_err(|e| Error::OperationFailed {
                    operation: "suggest_tags".to_string(),
                    cause: e.to_string(),
                })
        }
    }

    #[test]
    fn test_keyword_tags() {
        assert_eq!(
            keyword_tags("This note is about Docker. Docker compose with Kubernetes and more"),
            vec!["docker", "compose", "kubernetes"]
        );
        assert_eq!(keyword_tags("This is just a note"), Vec::<String>::new());
    }

    #[test_case("Rust, async runtime , Tokio", &["rust", "async-runtime", "tokio"] ; "normalizes")]
    #[test_case("ok, c++, émoji, ", &["ok"] ; "drops invalid")]
    #[test_case("a,b,c,d,e,f,g", &["a", "b", "c", "d", "e"] ; "keeps five")]
    #[test_case("", &[] ; "empty")]
    fn test_sanitize_tags(raw: &str, expected: &[&str]) {
        assert_eq!(sanitize_tags(raw), expected);
    }

    #[test]
    fn test_sanitize_drops_long_tags() {
        let long = "x".repeat(MAX_TAG_CHARS);
        assert_eq!(sanitize_tags(&format!("{long},short")), vec!["short"]);
    }

    #[test]
    fn test_merge_tags_user_first() {
        let user = vec!["work".to_string(), "rust".to_string()];
        let generated = vec!["rust".to_string(), "async".to_string()];
        assert_eq!(merge_tags(&user, &generated), vec!["work", "rust", "async"]);
    }

    #[tokio::test]
    async fn test_generate_providers() {
        let content = "Kubernetes deployment rollout notes";

        let none = generate(TagProvider::None, None, content).await;
        assert_eq!(none.tags, vec!["kubernetes", "deployment", "rollout"]);
        assert!(none.follow_up.is_none());

        let follow_up = generate(TagProvider::FollowUp, None, content).await;
        assert_eq!(follow_up.follow_up.as_deref(), Some(content));

        let suggester = FixedSuggester(Ok("k8s, Ops"));
        let sampled = generate(TagProvider::Sampling, Some(&suggester), content).await;
        assert_eq!(sampled.tags, vec!["k8s", "ops"]);
    }

    #[tokio::test]
    async fn test_sampling_falls_back_to_keywords() {
        let content = "Kubernetes deployment rollout";

        let failing = FixedSuggester(Err("no sampling"));
        let tags = generate(TagProvider::Sampling, Some(&failing), content).await.tags;
        assert_eq!(tags, vec!["kubernetes", "deployment", "rollout"]);

        let useless = FixedSuggester(Ok("!!!, ???"));
        let tags = generate(TagProvider::Sampling, Some(&useless), content).await.tags;
        assert_eq!(tags, vec!["kubernetes", "deployment", "rollout"]);

        let tags = generate(TagProvider::Sampling, None, content).await.tags;
        assert_eq!(tags.len(), 3);
    }
}
