//! Business logic services.
//!
//! | Service | Purpose |
//! |---------|---------|
//! | [`DocumentResolver`] | Tiered lookup with merge strategies |
//! | [`PromptChainWalker`] | Nested command resolution and leftover input |
//! | [`bundled_catalog`] | Help listings of bundled commands |

mod catalog;
mod resolver;
mod walker;

pub use catalog::{
    BUILTIN_COMMANDS, BuiltinCommand, CatalogEntry, DESCRIPTION_MAX_CHARS, NO_DESCRIPTION,
    NOTES_COMMAND, bundled_catalog, extract_description,
};
pub use resolver::{DocumentResolver, WritableDocument};
pub use walker::{ChainEntry, PromptChain, PromptChainWalker};
