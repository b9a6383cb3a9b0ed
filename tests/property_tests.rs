//! Property-based tests for pipeline splitting and command parsing.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Segments are trimmed and never empty
//! - Input without a standalone pipe is a single segment
//! - Content-consuming commands are never split
//! - Parsing lowercases the namespace and keeps the rest verbatim

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use pal::parser::PipelineSplitter;
use pal::parser::flags::{extract_list_flag, extract_switch};
use pal::{parse_command, split_pipeline};

const NO_CONSUMING: &[&str] = &[];

fn word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,8}"
}

fn words(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word(), 1..max)
}

proptest! {
    /// Property: every segment is trimmed and non-empty.
    #[test]
    fn prop_segments_trimmed_and_non_empty(input in "[a-z |\t]{0,60}") {
        for segment in split_pipeline(&input, NO_CONSUMING) {
            prop_assert!(!segment.is_empty());
            prop_assert_eq!(segment.trim(), segment.as_str());
        }
    }

    /// Property: whitespace-only input yields no segments.
    #[test]
    fn prop_blank_input_has_no_segments(input in "[ \t\n]{0,20}") {
        prop_assert!(split_pipeline(&input, NO_CONSUMING).is_empty());
    }

    /// Property: words joined by ` | ` split back into the same words.
    #[test]
    fn prop_standalone_pipes_split(parts in words(6)) {
        let input = parts.join(" | ");
        prop_assert_eq!(split_pipeline(&input, NO_CONSUMING), parts);
    }

    /// Property: pipes without surrounding spaces never split.
    #[test]
    fn prop_tight_pipes_do_not_split(parts in words(6)) {
        let input = parts.join("|");
        prop_assert_eq!(split_pipeline(&input, NO_CONSUMING), vec![input.clone()]);
    }

    /// Property: a double pipe is never a separator.
    #[test]
    fn prop_double_pipe_does_not_split(a in word(), b in word()) {
        let input = format!("{a} || {b}");
        prop_assert_eq!(split_pipeline(&input, NO_CONSUMING).len(), 1);
    }

    /// Property: table rows stay in one segment.
    #[test]
    fn prop_table_row_is_one_segment(parts in words(5)) {
        let input = format!("| {} |", parts.join(" | "));
        prop_assert_eq!(split_pipeline(&input, NO_CONSUMING), vec![input.clone()]);
    }

    /// Property: content-consuming prefixes keep the whole input, case-insensitively.
    #[test]
    fn prop_content_consuming_never_splits(parts in words(5), upper in any::<bool>()) {
        let prefix = if upper { "NOTES ADD" } else { "notes add" };
        let input = format!("{prefix} {}", parts.join(" | "));
        let splitter = PipelineSplitter::default();
        prop_assert!(splitter.is_content_consuming(&input));
        prop_assert_eq!(splitter.split(&input), vec![input.clone()]);
    }

    /// Property: the namespace is the lowercased first token, the rest is verbatim.
    #[test]
    fn prop_parse_command_structure(first in word(), rest in "[a-zA-Z0-9 ]{0,30}") {
        let rest = rest.trim_start().to_string();
        let cmd = parse_command(&format!("{first} {rest}"));
        prop_assert_eq!(cmd.namespace, first.to_lowercase());
        prop_assert_eq!(cmd.rest, rest);
    }

    /// Property: parsing ignores leading whitespace.
    #[test]
    fn prop_parse_ignores_leading_whitespace(pad in "[ \t]{0,5}", input in "[a-z]{1,8} [a-z]{1,8}") {
        prop_assert_eq!(parse_command(&format!("{pad}{input}")), parse_command(&input));
    }

    /// Property: extracted tags are lowercased, trimmed and non-empty.
    #[test]
    fn prop_list_flag_values_normalized(tags in words(4), text in "[a-z ]{0,20}") {
        let input = format!("-t {} {text}", tags.join(","));
        let (values, remaining) = extract_list_flag(&input, "-t", "--tags");
        let expected: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        prop_assert_eq!(values, expected);
        prop_assert_eq!(remaining, text.trim_start());
    }

    /// Property: a removed switch leaves the other words in order.
    #[test]
    fn prop_switch_removed_anywhere(before in words(3), after in words(3)) {
        let input = format!("{} -q {}", before.join(" "), after.join(" "));
        let (found, remaining) = extract_switch(&input, &["-q", "--quiet"]);
        prop_assert!(found);
        let expected: Vec<String> = before.into_iter().chain(after).collect();
        prop_assert_eq!(remaining, expected.join(" "));
    }
}
