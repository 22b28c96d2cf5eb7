//! Domain types for representing extracted documents.

use serde::{Deserialize, Serialize};

use crate::markdown::{MarkdownBlock, MarkdownFormatter};
use crate::Result;

/// Sidecar metadata written next to every Markdown file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Original filename (without path).
    pub source_file: String,

    /// Declared base URL or path, empty if absent.
    pub base_href: String,

    /// Document title element text, or the file stem for run-based input.
    pub html_title: String,

    /// Content of the `title` meta tag, empty if absent.
    pub meta_title: String,
}

impl DocumentMetadata {
    /// Create metadata with only the source filename set.
    pub fn new(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            ..Default::default()
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The format of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Web page markup.
    Html,
    /// TETML glyph/run-level PDF text extraction.
    Tetml,
}

impl SourceFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "tetml" => Some(Self::Tetml),
            _ => None,
        }
    }

    /// Canonical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Tetml => "tetml",
        }
    }
}

/// Markdown blocks and metadata extracted from one document.
///
/// Both artifacts are produced together so a writer can emit them as a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Detected format of the source file.
    pub format: SourceFormat,

    /// Sidecar metadata record.
    pub metadata: DocumentMetadata,

    /// Blocks in document order.
    pub blocks: Vec<MarkdownBlock>,
}

impl ExtractedDocument {
    /// Create a document with no blocks.
    pub fn new(format: SourceFormat, metadata: DocumentMetadata) -> Self {
        Self {
            format,
            metadata,
            blocks: Vec::new(),
        }
    }

    /// Append blocks in order.
    pub fn extend_blocks(&mut self, blocks: impl IntoIterator<Item = MarkdownBlock>) {
        self.blocks.extend(blocks);
    }

    /// Whether no block was extracted.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Markdown body without a trailing newline.
    pub fn markdown(&self) -> String {
        MarkdownFormatter::new().format(&self.blocks)
    }

    /// Markdown body as written to disk: a trailing newline unless empty.
    pub fn markdown_with_newline(&self) -> String {
        MarkdownFormatter::new().format_with_newline(&self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_json_has_four_fields() {
        let meta = DocumentMetadata {
            source_file: "12_LS.html".to_string(),
            base_href: "https://example.org/".to_string(),
            html_title: "Über uns".to_string(),
            meta_title: String::new(),
        };
        let json = meta.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert_eq!(obj["html_title"], "Über uns");
        assert!(json.contains("Über uns"));
        assert!(json.starts_with("{\n  \"source_file\""));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("HTML"), Some(SourceFormat::Html));
        assert_eq!(SourceFormat::from_extension("htm"), Some(SourceFormat::Html));
        assert_eq!(SourceFormat::from_extension("tetml"), Some(SourceFormat::Tetml));
        assert_eq!(SourceFormat::from_extension("pdf"), None);
        assert_eq!(SourceFormat::Tetml.extension(), "tetml");
    }

    #[test]
    fn test_empty_document_has_empty_body() {
        let doc = ExtractedDocument::new(SourceFormat::Html, DocumentMetadata::new("a.html"));
        assert!(doc.is_empty());
        assert_eq!(doc.markdown_with_newline(), "");
    }
}
