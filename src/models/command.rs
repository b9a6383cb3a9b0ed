//! Parsed commands and handler results.

/// A command segment split into namespace and remaining text.
///
/// The namespace is lowercased; `rest` keeps the caller's casing. An empty
/// namespace means the segment was empty, see [`ParsedCommand::is_empty`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ParsedCommand {
    /// Lowercased first token.
    pub namespace: String,
    /// Everything after the first whitespace run, untouched.
    pub rest: String,
}

impl ParsedCommand {
    /// Creates a parsed command.
    #[must_use]
    pub fn new(namespace: impl Into<String>, rest: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            rest: rest.into(),
        }
    }

    /// Returns true if there is no namespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Returns the namespace followed by the whitespace-split tokens of `rest`.
    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        std::iter::once(self.namespace.as_str())
            .filter(|ns| !ns.is_empty())
            .chain(self.rest.split_whitespace())
            .collect()
    }

    /// Returns the first token of `rest`, if any.
    #[must_use]
    pub fn first_arg(&self) -> Option<&str> {
        self.rest.split_whitespace().next()
    }
}

/// Output of a handler that accepted a command.
///
/// A handler that declines returns `None`; there is no unhandled result value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Full text delivered to the model.
    pub output: String,
    /// Optional short text for the human-facing view.
    pub display: Option<String>,
    /// Always true for constructed results.
    pub handled: bool,
}

impl CommandResult {
    /// Creates a result whose output is shown as-is.
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            display: None,
            handled: true,
        }
    }

    /// Creates a quiet result: `display` is shown, `output` is tucked away.
    #[must_use]
    pub fn quiet(output: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            display: Some(display.into()),
            handled: true,
        }
    }

    /// Renders the caller-visible text.
    ///
    /// Without `display` this is `output`. With `display`, the short text is
    /// followed by the full output inside a collapsed context block.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.display {
            None => self.output.clone(),
            Some(display) => format!(
                "{display}\n\n<details>\n<summary>Context</summary>\n\n{}\n\n</details>",
                self.output
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parsed_command_tokens() {
        let cmd = ParsedCommand::new("notes", "add  hello world");
        assert_eq!(cmd.tokens(), vec!["notes", "add", "hello", "world"]);
        assert_eq!(cmd.first_arg(), Some("add"));
        assert!(ParsedCommand::default().tokens().is_empty());
    }

    #[test]
    fn test_parsed_command_is_value_type() {
        let a = ParsedCommand::new("test", "sub rest");
        let b = ParsedCommand::new("test", "sub rest");
        assert_eq!(a, b);

        let set: HashSet<_> = [a].into_iter().collect();
        assert!(set.contains(&b));
    }

    #[test]
    fn test_render_plain() {
        let result = CommandResult::new("hello");
        assert!(result.handled);
        assert_eq!(result.render(), "hello");
    }

    #[test]
    fn test_render_quiet() {
        let result = CommandResult::quiet("full body", "Loaded.");
        let rendered = result.render();
        assert!(rendered.starts_with("Loaded.\n\n<details>"));
        assert!(rendered.contains("full body"));
        assert!(rendered.ends_with("</details>"));
    }
}
