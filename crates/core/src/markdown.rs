//! Markdown block model and text output.
//!
//! Every block renders to one or more lines and is followed by exactly one
//! blank separator line; trailing blank lines of the document are dropped.

use serde::{Deserialize, Serialize};

/// Markdown hard line break: two trailing spaces before the newline.
pub const HARD_BREAK: &str = "  \n";

/// A block-level piece of Markdown output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkdownBlock {
    /// `#`-prefixed heading, level 1 to 6.
    Heading { level: u8, text: String },
    /// Plain paragraph with inline markup already applied.
    Paragraph(String),
    /// One list, including its nested sublists.
    List(Vec<ListItem>),
    /// A carousel slide: a bullet title followed by caption lines.
    SlideBullet { title: String, captions: Vec<String> },
}

impl MarkdownBlock {
    /// Create a heading, clamping the level into 1..=6.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        MarkdownBlock::Heading {
            level: level.clamp(1, 6),
            text: text.into(),
        }
    }

    /// Render the block to its output lines (without the separator).
    pub fn lines(&self) -> Vec<String> {
        match self {
            MarkdownBlock::Heading { level, text } => {
                let marker = "#".repeat(usize::from(*level));
                if text.is_empty() {
                    vec![marker]
                } else {
                    vec![format!("{} {}", marker, text)]
                }
            }
            MarkdownBlock::Paragraph(text) => vec![text.clone()],
            MarkdownBlock::List(items) => items.iter().map(ListItem::render).collect(),
            MarkdownBlock::SlideBullet { title, captions } => {
                let mut lines = Vec::with_capacity(captions.len() + 1);
                lines.push(format!("- {}", title));
                // Trailing double space keeps caption boundaries as hard breaks.
                lines.extend(captions.iter().map(|c| format!("{}  ", c)));
                lines
            }
        }
    }
}

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Nesting depth, 0 for top-level items.
    pub depth: usize,
    /// 1-based position for ordered lists, `None` for bullets.
    pub ordinal: Option<usize>,
    /// Inline-converted item text.
    pub text: String,
}

impl ListItem {
    /// Create a list item.
    pub fn new(depth: usize, ordinal: Option<usize>, text: impl Into<String>) -> Self {
        Self {
            depth,
            ordinal,
            text: text.into(),
        }
    }

    /// Render with two spaces of indentation per depth level.
    pub fn render(&self) -> String {
        let indent = "  ".repeat(self.depth);
        match self.ordinal {
            Some(n) => format!("{}{}. {}", indent, n, self.text),
            None => format!("{}- {}", indent, self.text),
        }
    }
}

/// Formatter joining blocks into a Markdown document body.
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Create a new formatter.
    pub fn new() -> Self {
        Self
    }

    /// Format blocks into Markdown, separated by blank lines.
    ///
    /// # Example output
    /// ```text
    /// # Title
    ///
    /// Hello **world**.
    /// ```
    pub fn format(&self, blocks: &[MarkdownBlock]) -> String {
        let mut lines: Vec<String> = Vec::new();
        for block in blocks {
            lines.extend(block.lines());
            lines.push(String::new());
        }

        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }

    /// Format and add a trailing newline to non-empty output.
    pub fn format_with_newline(&self, blocks: &[MarkdownBlock]) -> String {
        let formatted = self.format(blocks);
        if formatted.is_empty() {
            formatted
        } else {
            format!("{}\n", formatted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let blocks = vec![
            MarkdownBlock::heading(1, "Title"),
            MarkdownBlock::Paragraph("Hello **world**.".to_string()),
        ];
        let formatter = MarkdownFormatter::new();
        assert_eq!(formatter.format(&blocks), "# Title\n\nHello **world**.");
        assert_eq!(
            formatter.format_with_newline(&blocks),
            "# Title\n\nHello **world**.\n"
        );
    }

    #[test]
    fn test_empty_document() {
        let formatter = MarkdownFormatter::new();
        assert_eq!(formatter.format(&[]), "");
        assert_eq!(formatter.format_with_newline(&[]), "");
    }

    #[test]
    fn test_empty_heading_keeps_marker() {
        assert_eq!(MarkdownBlock::heading(2, "").lines(), vec!["##"]);
        assert_eq!(MarkdownBlock::heading(9, "x").lines(), vec!["###### x"]);
    }

    #[test]
    fn test_list_lines_stay_together() {
        let blocks = vec![
            MarkdownBlock::List(vec![
                ListItem::new(0, Some(1), "A"),
                ListItem::new(1, None, "nested"),
                ListItem::new(0, Some(2), "B"),
            ]),
            MarkdownBlock::Paragraph("after".to_string()),
        ];
        assert_eq!(
            MarkdownFormatter::new().format(&blocks),
            "1. A\n  - nested\n2. B\n\nafter"
        );
    }

    #[test]
    fn test_slide_bullet() {
        let block = MarkdownBlock::SlideBullet {
            title: "Slide".to_string(),
            captions: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(
            MarkdownFormatter::new().format(&[block]),
            "- Slide\nfirst  \nsecond  "
        );
    }
}
