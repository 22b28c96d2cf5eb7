//! Markdown to plain text for scoring.

use lsmd_core::clean::{remove_bold, remove_italic};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[.*?\]\(.*?\)").unwrap());

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").unwrap());

static INLINE_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]*)`").unwrap());

static HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*#+\s*").unwrap());

static BLOCKQUOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*>\s*").unwrap());

static RULE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(---|\*\*\*|___)[ \t]*$").unwrap());

static LIST_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*([-*+]|\d+\.)\s+").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip Markdown formatting so only the running text is scored.
///
/// The result is NFC-normalized, whitespace-collapsed and trimmed.
pub fn clean_markdown(text: &str) -> String {
    let text: String = text.nfc().collect();

    let text = IMAGE_REGEX.replace_all(&text, "");
    let text = LINK_REGEX.replace_all(&text, "$1");
    let text = remove_bold(&text);
    let text = remove_italic(&text);
    let text = INLINE_CODE_REGEX.replace_all(&text, "$1");
    let text = HEADING_REGEX.replace_all(&text, "");
    let text = BLOCKQUOTE_REGEX.replace_all(&text, "");
    let text = RULE_REGEX.replace_all(&text, "");
    let text = LIST_MARKER_REGEX.replace_all(&text, "");

    let text = text.replace("\\*", "*").replace("\\_", "_").replace("\\#", "#");
    WHITESPACE_REGEX.replace_all(&text, " ").trim().to_string()
}
