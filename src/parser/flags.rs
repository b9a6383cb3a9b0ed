//! Inline flag extraction from free-text arguments.
//!
//! Commands take free text after their name, so flags are pulled out of the
//! text instead of being parsed by a full argument parser.

/// Removes a leading list flag such as `-t a,b`, `-ta,b` or `--tags a,b`.
///
/// Returns the lowercased, trimmed, non-empty values and the remaining text.
/// When no flag leads the input, the values are empty and the text is the
/// input with leading whitespace removed.
///
/// # Examples
///
/// ```rust
/// use pal::parser::flags::extract_list_flag;
///
/// let (tags, rest) = extract_list_flag("-t Work,Urgent Meeting at 3", "-t", "--tags");
/// assert_eq!(tags, vec!["work", "urgent"]);
/// assert_eq!(rest, "Meeting at 3");
///
/// let (tags, rest) = extract_list_flag("plain text", "-t", "--tags");
/// assert!(tags.is_empty());
/// assert_eq!(rest, "plain text");
/// ```
#[must_use]
pub fn extract_list_flag(input: &str, short: &str, long: &str) -> (Vec<String>, String) {
    let trimmed = input.trim_start();

    let after_flag = trimmed
        .strip_prefix(long)
        .filter(|after| after.starts_with(char::is_whitespace))
        .or_else(|| {
            trimmed
                .strip_prefix(short)
                .filter(|after| !after.starts_with('-'))
        });

    let Some(after_flag) = after_flag else {
        return (Vec::new(), trimmed.to_string());
    };

    let after_flag = after_flag.trim_start();
    let (value, rest) = after_flag
        .split_once(char::is_whitespace)
        .unwrap_or((after_flag, ""));

    if value.is_empty() {
        return (Vec::new(), trimmed.to_string());
    }

    (split_list(value), rest.trim_start().to_string())
}

/// Removes every standalone occurrence of the given switch tokens.
///
/// Returns whether any switch was present and the remaining tokens joined by
/// single spaces.
///
/// # Examples
///
/// ```rust
/// use pal::parser::flags::extract_switch;
///
/// let (quiet, rest) = extract_switch("abc123 -q", &["-q", "--quiet"]);
/// assert!(quiet);
/// assert_eq!(rest, "abc123");
/// ```
#[must_use]
pub fn extract_switch(input: &str, names: &[&str]) -> (bool, String) {
    let mut found = false;
    let remaining: Vec<&str> = input
        .split_whitespace()
        .filter(|token| {
            let is_switch = names.contains(token);
            found |= is_switch;
            !is_switch
        })
        .collect();

    (found, remaining.join(" "))
}

/// Splits a comma-separated list into lowercased, trimmed, non-empty values.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}
