//! # Pal
//!
//! Command dispatch and layered prompt resolution for `$$` assistant commands.
//!
//! Input following the `$$` marker is split into a pipeline of command
//! segments. Each segment is parsed into a namespace and free text, then
//! answered either by a built-in handler (echo, prompt management, help,
//! notes) or by walking a tree of markdown documents and returning the
//! resolved instructions for a language model to execute.
//!
//! ## Document tiers
//!
//! | Tier | Access | Purpose |
//! |------|--------|---------|
//! | Bundled | read-only | Defaults shipped with the crate |
//! | Override | read-write | User customizations mirroring bundled paths |
//! | Custom | read-write | Arbitrary user-defined commands |
//!
//! When a bundled document and a writable document share a path, the
//! writable document's `merge_strategy` front matter decides how they combine.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pal::dispatch::Dispatcher;
//! use pal::storage::MemoryDocumentStore;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryDocumentStore::new());
//! let dispatcher = Dispatcher::new(store);
//! let output = dispatcher.run("echo hi").await;
//! assert_eq!(output, "hi");
//! # });
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod dispatch;
pub mod models;
pub mod observability;
pub mod parser;
pub mod services;
pub mod storage;
pub mod tools;

pub use config::PalConfig;
pub use dispatch::{Dispatcher, PIPELINE_SEPARATOR};
pub use models::{CommandResult, DocumentPath, Frontmatter, MergeStrategy, ParsedCommand, Tier};
pub use parser::{parse_command, split_pipeline};
pub use services::{DocumentResolver, PromptChain, PromptChainWalker};
pub use storage::{DocumentStore, FilesystemDocumentStore, MemoryDocumentStore};

/// Error type for pal operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Empty prompt names, invalid path segments, malformed tool arguments |
/// | `OperationFailed` | Filesystem I/O, config parsing, logging setup |
/// | `ReadOnlyTier` | A write targets the bundled tier |
/// | `UnknownTool` | A tool name outside the registry is invoked |
/// | `ResourceNotFound` | A resource URI resolves to nothing |
///
/// Command dispatch never surfaces these to the caller; it renders them as
/// `Error: ...` text instead.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A write was attempted against a read-only tier.
    #[error("tier '{0}' is read-only")]
    ReadOnlyTier(Tier),

    /// The tool name is not registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A resource URI did not resolve.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
}

/// Result type alias for pal operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "read_document".to_string(),
            cause: "denied".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'read_document' failed: denied");

        let err = Error::ReadOnlyTier(Tier::Bundled);
        assert_eq!(err.to_string(), "tier 'bundled' is read-only");

        let err = Error::UnknownTool("frobnicate".to_string());
        assert_eq!(err.to_string(), "unknown tool: frobnicate");
    }
}
