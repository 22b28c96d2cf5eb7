//! Markdown cleaning for the "simplified" corpus representation.
//!
//! The highlighted corpus keeps headings and bold emphasis; the simplified
//! corpus is the same text with that highlighting removed.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static HEADING_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s*(.*)$").unwrap());

static HEADING_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+\s*").unwrap());

// The regex crate has no backreferences, so each marker gets its own branch.
// Leftmost-first matching keeps a single pass over both markers.
static BOLD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*|__(.*?)__").unwrap());

static ITALIC_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*|_(.*?)_").unwrap());

static CODE_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());

static INLINE_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]*`").unwrap());

static IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());

static BLOCKQUOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^>\s*").unwrap());

static BLANK_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Turn every ATX heading line into its plain text.
pub fn remove_headings(text: &str) -> String {
    HEADING_LINE_REGEX.replace_all(text, "$1").into_owned()
}

/// Text of whichever marker branch matched.
fn inner_text(caps: &Captures<'_>) -> String {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or_else(String::new, |m| m.as_str().to_string())
}

/// Remove bold markers (`**x**` and `__x__`), keeping the text.
///
/// Both markers are handled in one pass, so text already unwrapped from one
/// marker is not scanned again for the other.
pub fn remove_bold(text: &str) -> String {
    BOLD_REGEX.replace_all(text, inner_text).into_owned()
}

/// Remove italic markers (`*x*` and `_x_`) in one pass, keeping the text.
pub fn remove_italic(text: &str) -> String {
    ITALIC_REGEX.replace_all(text, inner_text).into_owned()
}

/// Remove the highlighting layer: headings become plain lines, bold is unwrapped.
pub fn strip_highlighting(text: &str) -> String {
    remove_bold(&remove_headings(text))
}

/// Reduce highlighted Markdown to plain text for the simplified corpus.
///
/// Drops code, images, link targets, heading and blockquote markers, bold and
/// italic markers. List markers are kept so list structure survives.
pub fn strip_formatting(text: &str) -> String {
    let text = CODE_BLOCK_REGEX.replace_all(text, "");
    let text = INLINE_CODE_REGEX.replace_all(&text, "");
    let text = IMAGE_REGEX.replace_all(&text, "");
    let text = LINK_REGEX.replace_all(&text, "$1");
    let text = HEADING_MARKER_REGEX.replace_all(&text, "");
    let text = remove_bold(&text);
    let text = remove_italic(&text);
    let text = BLOCKQUOTE_REGEX.replace_all(&text, "");
    let text = BLANK_RUN_REGEX.replace_all(&text, "\n\n");

    text.trim().to_string()
}
