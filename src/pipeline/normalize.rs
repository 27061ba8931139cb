//! Post-model cleanup of raw reply text.
//!
//! Reasoning models wrap their internal deliberation in `<think>` tags;
//! none of that belongs in a user-facing report.

use std::sync::LazyLock;

use regex::Regex;

/// Marker pair delimiting the model's internal reasoning.
const REASONING_OPEN: &str = "<think>";
const REASONING_CLOSE: &str = "</think>";

static REASONING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?s){REASONING_OPEN}.*?{REASONING_CLOSE}")).expect("valid regex")
});

/// Clean a raw model reply into presentable report text.
///
/// 1. Every `<think>…</think>` span is removed, tags included, across
///    lines, all of them, not just the first. An unterminated opening
///    tag strips to the end of the text.
/// 2. Whitespace-only lines collapse to empty lines.
/// 3. The whole result is trimmed.
///
/// Normalizing already-normalized text is a no-op.
pub fn normalize(raw: &str) -> String {
    let mut text = REASONING_RE.replace_all(raw, "").into_owned();

    if let Some(idx) = text.find(REASONING_OPEN) {
        text.truncate(idx);
    }

    let lines: Vec<&str> = text
        .lines()
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect();
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_reasoning_block_and_blank_line() {
        let raw = "<think>internal notes</think>Summary: fine.\n   \nNutrition Focus: eat well.";
        assert_eq!(normalize(raw), "Summary: fine.\n\nNutrition Focus: eat well.");
    }

    #[test]
    fn strips_every_reasoning_span() {
        let raw = "<think>one</think>A<think>two</think>B";
        assert_eq!(normalize(raw), "AB");
    }

    #[test]
    fn strips_multiline_reasoning() {
        let raw = "<think>\nline one\nline two\n</think>\nReport body.";
        assert_eq!(normalize(raw), "Report body.");
    }

    #[test]
    fn unterminated_reasoning_strips_to_end() {
        let raw = "Report body.\n<think>still thinking";
        assert_eq!(normalize(raw), "Report body.");
    }

    #[test]
    fn orphan_close_tag_is_left_alone() {
        let raw = "No open tag here</think> stays.";
        assert_eq!(normalize(raw), "No open tag here</think> stays.");
    }

    #[test]
    fn clean_text_unchanged() {
        let text = "Summary: all markers optimal.\n\nExercise Program: keep going.";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn collapses_whitespace_only_lines() {
        let raw = "a\n \t \nb\n      \nc";
        assert_eq!(normalize(raw), "a\n\nb\n\nc");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize("\n\n  report  \n\n"), "report");
    }

    #[test]
    fn empty_and_whitespace_inputs_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n  \n"), "");
        assert_eq!(normalize("<think>only thoughts</think>"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "<think>x</think>Summary: fine.\n   \nDetails.",
            "plain text",
            "a\n\n\nb",
            "",
            "<think>unclosed",
            "tail</think> orphan",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }
}
