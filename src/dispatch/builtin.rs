//! Echo and lorem-ipsum.

use crate::models::{CommandResult, ParsedCommand};

/// Namespace of the echo command.
pub const ECHO_COMMAND: &str = "echo";

/// Namespace of the placeholder text command.
pub const LOREM_IPSUM_COMMAND: &str = "lorem-ipsum";

/// Placeholder paragraph returned by `lorem-ipsum`.
pub const LOREM_IPSUM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. \
Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris \
nisi ut aliquip ex ea commodo consequat. Duis aute irure dolor in \
reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla \
pariatur. Excepteur sint occaecat cupidatat non proident, sunt in \
culpa qui officia deserunt mollit anim id est laborum.";

pub fn echo(command: &ParsedCommand) -> Option<CommandResult> {
    (command.namespace == ECHO_COMMAND).then(|| CommandResult::new(command.rest.clone()))
}

pub fn lorem_ipsum(command: &ParsedCommand) -> Option<CommandResult> {
    (command.namespace == LOREM_IPSUM_COMMAND).then(|| CommandResult::new(LOREM_IPSUM))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_returns_rest_verbatim() {
        let result = echo(&ParsedCommand::new("echo", "Hello  World | x")).unwrap();
        assert_eq!(result.output, "Hello  World | x");
        assert!(result.handled);

        assert_eq!(echo(&ParsedCommand::new("echo", "")).unwrap().output, "");
        assert!(echo(&ParsedCommand::new("echoes", "x")).is_none());
    }

    #[test]
    fn test_lorem_ipsum() {
        let result = lorem_ipsum(&ParsedCommand::new("lorem-ipsum", "ignored")).unwrap();
        assert!(result.output.starts_with("Lorem ipsum dolor sit amet"));
        assert!(result.output.ends_with("id est laborum."));
        assert!(!result.output.contains("  "));
        assert!(lorem_ipsum(&ParsedCommand::new("lorem", "")).is_none());
    }
}
