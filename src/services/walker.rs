//! Prompt chain walking.
//!
//! Turns a token sequence such as `["git", "commit", "fix", "typo"]` into the
//! chain of nested documents it addresses (`git`, `git commit`) plus the
//! leftover free text (`fix typo`).

use crate::Result;
use crate::models::DocumentPath;
use crate::parser::FrontmatterParser;
use crate::services::DocumentResolver;

/// One resolved document in a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry {
    /// Path of the document.
    pub path: DocumentPath,
    /// Resolved content, as returned by the resolver.
    pub content: String,
}

/// Result of walking a token sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptChain {
    /// Resolved documents, outermost first.
    pub entries: Vec<ChainEntry>,
    /// Unconsumed tokens joined by single spaces.
    pub leftover: String,
}

impl PromptChain {
    /// Returns true if not even the first token resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the deepest resolved path.
    #[must_use]
    pub fn deepest(&self) -> Option<&DocumentPath> {
        self.entries.last().map(|e| &e.path)
    }
}

/// Walks token sequences down the document tree.
#[derive(Debug, Clone)]
pub struct PromptChainWalker {
    resolver: DocumentResolver,
}

impl PromptChainWalker {
    /// Creates a walker backed by `resolver`.
    #[must_use]
    pub const fn new(resolver: DocumentResolver) -> Self {
        Self { resolver }
    }

    /// Resolves as many leading tokens as possible into nested documents.
    ///
    /// After each resolved document, its front matter decides whether to go
    /// deeper. With a `subcommands` key the walk continues only if the next
    /// token is one of its keys; an empty or null `subcommands` stops the
    /// walk. Without the key the walk tries the next token greedily.
    ///
    /// Tokens are matched case-insensitively. The first token that does not
    /// resolve, and everything after it, becomes the leftover.
    ///
    /// # Errors
    ///
    /// Returns an error if the document store cannot be read.
    pub fn walk<S: AsRef<str>>(&self, tokens: &[S]) -> Result<PromptChain> {
        let mut segments: Vec<String> = Vec::new();
        let mut entries = Vec::new();
        let mut cursor = 0;

        while let Some(token) = tokens.get(cursor) {
            let token = token.as_ref().to_lowercase();
            let Ok(path) = DocumentPath::new(segments.iter().chain(std::iter::once(&token))) else {
                break;
            };
            let Some(content) = self.resolver.resolve(&path)? else {
                break;
            };

            cursor += 1;
            segments.push(token);
            let (frontmatter, _) = FrontmatterParser::parse(&content);
            entries.push(ChainEntry { path, content });

            if let Some(allowed) = frontmatter.subcommands() {
                let next_allowed = tokens
                    .get(cursor)
                    .is_some_and(|next| allowed.contains(&next.as_ref().to_lowercase()));
                if !next_allowed {
                    break;
                }
            }
        }

        let leftover = tokens[cursor..]
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(" ");

        tracing::debug!(depth = entries.len(), leftover_len = leftover.len(), "walked prompt chain");
        Ok(PromptChain { entries, leftover })
    }
}
