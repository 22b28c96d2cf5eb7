//! Run-level document tree.

use serde::{Deserialize, Serialize};

use crate::fonts::FontTable;

/// A parsed TETML document.
#[derive(Debug, Clone, Default)]
pub struct TetmlDocument {
    /// Font table, keyed by font id.
    pub fonts: FontTable,

    /// Pages in document order.
    pub pages: Vec<Page>,
}

impl TetmlDocument {
    /// Iterate over all paragraphs of all pages.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.pages.iter().flat_map(|p| p.paragraphs.iter())
    }
}

/// One page of paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub paragraphs: Vec<Paragraph>,
}

/// A layout paragraph made of lines, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub lines: Vec<Line>,
}

impl Paragraph {
    /// Build a paragraph from lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

/// A text line made of words, left to right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub words: Vec<Word>,
}

impl Line {
    /// Build a line from words.
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }
}

/// A word's text and the font id of its first glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Raw text as extracted (may carry surrounding whitespace).
    pub text: String,

    /// Font id of the first glyph, if any glyph was present.
    pub font: Option<String>,
}

impl Word {
    /// Create a word set in the given font.
    pub fn new(text: impl Into<String>, font: Option<&str>) -> Self {
        Self {
            text: text.into(),
            font: font.map(str::to_string),
        }
    }
}
