//! Command segment parsing.

use crate::models::ParsedCommand;

/// Splits a command segment on its first whitespace run.
///
/// The first token becomes the lowercased namespace. Everything after the
/// whitespace run is kept verbatim as `rest`. Subcommands are not detected
/// here; the prompt chain walker decides that from the documents that exist.
///
/// # Examples
///
/// ```rust
/// use pal::parse_command;
///
/// let cmd = parse_command("GIT commit -m msg");
/// assert_eq!(cmd.namespace, "git");
/// assert_eq!(cmd.rest, "commit -m msg");
///
/// assert!(parse_command("").is_empty());
/// ```
#[must_use]
pub fn parse_command(segment: &str) -> ParsedCommand {
    let segment = segment.trim_start();
    if segment.is_empty() {
        return ParsedCommand::default();
    }

    match segment.find(char::is_whitespace) {
        Some(idx) => ParsedCommand::new(
            segment[..idx].to_lowercase(),
            segment[idx..].trim_start(),
        ),
        None => ParsedCommand::new(segment.to_lowercase(), ""),
    }
}
