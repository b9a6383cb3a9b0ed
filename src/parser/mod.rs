//! Input parsing.
//!
//! | Stage | Function | Output |
//! |-------|----------|--------|
//! | Pipeline | [`split_pipeline`] | Ordered command segments |
//! | Command | [`parse_command`] | [`ParsedCommand`](crate::models::ParsedCommand) |
//! | Front matter | [`FrontmatterParser::parse`] | Metadata plus body |
//! | Flags | [`flags::extract_list_flag`], [`flags::extract_switch`] | Values plus remaining text |

mod command;
pub mod flags;
mod frontmatter;
mod pipeline;

pub use command::parse_command;
pub use frontmatter::FrontmatterParser;
pub use pipeline::{DEFAULT_CONTENT_CONSUMING, PIPELINE_DELIMITER, PipelineSplitter, split_pipeline};
