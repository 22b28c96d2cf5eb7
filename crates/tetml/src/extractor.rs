//! Run-based extraction: TETML paragraphs to Markdown blocks.

use lsmd_core::{DocumentMetadata, Error, ExtractedDocument, MarkdownBlock, Result, SourceFormat};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::model::{Paragraph, TetmlDocument};
use crate::parser::TetmlParser;

/// The two PDF variants of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentVariant {
    /// Keeps line breaks, bold and heading inference.
    #[default]
    Primary,
    /// Collapses each paragraph into one line without bold or headings.
    Secondary,
}

impl DocumentVariant {
    /// Separator placed between the lines of one paragraph.
    pub fn line_separator(&self) -> &'static str {
        match self {
            DocumentVariant::Primary => "\n",
            DocumentVariant::Secondary => " ",
        }
    }

    /// Whether bold fonts are rendered as bold.
    pub fn allows_bold(&self) -> bool {
        matches!(self, DocumentVariant::Primary)
    }

    /// Whether a paragraph's first font may turn it into a heading.
    pub fn infers_headings(&self) -> bool {
        matches!(self, DocumentVariant::Primary)
    }
}

/// Font id to heading level table. Ids are compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMap {
    levels: HashMap<String, u8>,
}

impl Default for HeadingMap {
    fn default() -> Self {
        Self::empty()
            .with_font("F1", 1)
            .with_font("F2", 2)
            .with_font("F4", 3)
    }
}

impl HeadingMap {
    /// Table without any heading fonts.
    pub fn empty() -> Self {
        Self {
            levels: HashMap::new(),
        }
    }

    /// Map a font id to a heading level (clamped to 1-6).
    pub fn with_font(mut self, font_id: &str, level: u8) -> Self {
        self.levels.insert(font_id.to_uppercase(), level.clamp(1, 6));
        self
    }

    /// Heading level for a font id, if mapped.
    pub fn level_for(&self, font_id: &str) -> Option<u8> {
        self.levels.get(&font_id.to_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Parse an `ID=LEVEL` entry such as `F1=1`.
    pub fn parse_entry(entry: &str) -> Result<(String, u8)> {
        let (id, level) = entry
            .split_once('=')
            .ok_or_else(|| Error::ConfigError(format!("Expected ID=LEVEL, got '{}'", entry)))?;

        let id = id.trim();
        if id.is_empty() {
            return Err(Error::ConfigError(format!("Missing font id in '{}'", entry)));
        }

        let level = level
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|l| (1..=6).contains(l))
            .ok_or_else(|| Error::ConfigError(format!("Heading level must be 1-6 in '{}'", entry)))?;

        Ok((id.to_string(), level))
    }
}

/// Extraction settings.
#[derive(Debug, Clone, Default)]
pub struct TetmlConfig {
    pub variant: DocumentVariant,
    pub heading_map: HeadingMap,
}

impl TetmlConfig {
    pub fn with_variant(mut self, variant: DocumentVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_heading_map(mut self, heading_map: HeadingMap) -> Self {
        self.heading_map = heading_map;
        self
    }
}

/// Converts parsed TETML into Markdown blocks.
#[derive(Debug, Clone, Default)]
pub struct TetmlExtractor {
    config: TetmlConfig,
}

impl TetmlExtractor {
    /// Create an extractor for the primary variant with the default heading fonts.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: TetmlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TetmlConfig {
        &self.config
    }

    /// Parse and extract a TETML document from a reader.
    pub fn extract_reader<R: Read>(&self, reader: R, source_file: &str) -> Result<ExtractedDocument> {
        let document = TetmlParser::new().parse(reader)?;
        Ok(self.extract(&document, source_file))
    }

    /// Extract a parsed document, one block per non-empty paragraph.
    pub fn extract(&self, document: &TetmlDocument, source_file: &str) -> ExtractedDocument {
        let mut extracted = ExtractedDocument::new(SourceFormat::Tetml, tetml_metadata(source_file));

        for paragraph in document.paragraphs() {
            if let Some(block) = self.paragraph_block(document, paragraph) {
                extracted.blocks.push(block);
            }
        }

        if extracted.is_empty() {
            log::warn!("No text extracted from '{}'", source_file);
        }

        extracted
    }

    /// Render one paragraph; `None` when it holds no words.
    pub fn paragraph_block(&self, document: &TetmlDocument, paragraph: &Paragraph) -> Option<MarkdownBlock> {
        let variant = self.config.variant;
        let mut first_font: Option<&str> = None;
        let mut lines = Vec::new();

        for line in &paragraph.lines {
            let mut words = Vec::new();
            for word in &line.words {
                let text = word.text.trim();
                if text.is_empty() {
                    continue;
                }

                let font = word.font.as_deref().filter(|f| !f.is_empty());
                if first_font.is_none() {
                    first_font = font;
                }

                match font {
                    Some(id) => words.push(document.fonts.style(id, variant.allows_bold()).wrap(text)),
                    None => words.push(text.to_string()),
                }
            }
            if !words.is_empty() {
                lines.push(words.join(" "));
            }
        }

        if lines.is_empty() {
            return None;
        }

        let text = lines.join(variant.line_separator()).trim().to_string();
        let level = first_font
            .filter(|_| variant.infers_headings())
            .and_then(|id| self.config.heading_map.level_for(id));

        Some(match level {
            Some(level) => MarkdownBlock::heading(level, text),
            None => MarkdownBlock::Paragraph(text),
        })
    }
}

/// Metadata for a TETML source: the file stem doubles as the title.
fn tetml_metadata(source_file: &str) -> DocumentMetadata {
    let stem = Path::new(source_file)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    DocumentMetadata {
        html_title: stem,
        ..DocumentMetadata::new(source_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontRecord;
    use crate::model::{Line, Page, Word};

    fn document(paragraphs: Vec<Paragraph>) -> TetmlDocument {
        let mut doc = TetmlDocument::default();
        doc.fonts.insert("F0", FontRecord::from_attributes(Some("Arial"), Some("400"), Some("0")));
        doc.fonts.insert("F1", FontRecord::from_attributes(Some("Arial-Bold"), Some("700"), None));
        doc.fonts.insert("F3", FontRecord::from_attributes(Some("Arial-BoldItalic"), None, Some("-12")));
        doc.fonts.insert("F5", FontRecord::from_attributes(Some("Arial"), Some("700"), None));
        doc.pages.push(Page { paragraphs });
        doc
    }

    fn line(words: &[(&str, &str)]) -> Line {
        Line::new(words.iter().map(|(t, f)| Word::new(*t, Some(*f))).collect())
    }

    fn secondary() -> TetmlExtractor {
        TetmlExtractor::new().with_config(TetmlConfig::default().with_variant(DocumentVariant::Secondary))
    }

    #[test]
    fn test_first_font_selects_heading() {
        let doc = document(vec![
            Paragraph::new(vec![line(&[("Titel", "F1")])]),
            Paragraph::new(vec![line(&[("Text", "F0"), ("hier", "F0")])]),
        ]);
        let md = TetmlExtractor::new().extract(&doc, "1_LS.tetml").markdown();
        assert_eq!(md, "# **Titel**\n\nText hier");
    }

    #[test]
    fn test_unmapped_first_font_never_yields_heading() {
        let doc = document(vec![Paragraph::new(vec![
            line(&[("Normal", "F0")]),
            line(&[("Fett", "F1")]),
        ])]);
        let md = TetmlExtractor::new().extract(&doc, "1_LS.tetml").markdown();
        assert_eq!(md, "Normal\n**Fett**");
        assert!(!md.contains('#'));
    }

    #[test]
    fn test_blank_words_do_not_count_as_first_font() {
        let doc = document(vec![Paragraph::new(vec![line(&[(" ", "F1"), ("Wort", "F0")])])]);
        let md = TetmlExtractor::new().extract(&doc, "x.tetml").markdown();
        assert_eq!(md, "Wort");
    }

    #[test]
    fn test_heading_font_ids_are_case_insensitive() {
        let doc = document(vec![Paragraph::new(vec![line(&[("Unter", "f2")])])]);
        let md = TetmlExtractor::new().extract(&doc, "x.tetml").markdown();
        assert_eq!(md, "## Unter");
    }

    #[test]
    fn test_bold_italic_wrapped_per_word() {
        let doc = document(vec![Paragraph::new(vec![line(&[("ganz", "F3"), ("wichtig", "F3")])])]);
        let md = TetmlExtractor::new().extract(&doc, "x.tetml").markdown();
        assert_eq!(md, "***ganz*** ***wichtig***");
    }

    #[test]
    fn test_secondary_variant_joins_lines_without_bold() {
        let doc = document(vec![Paragraph::new(vec![
            line(&[("Titel", "F1")]),
            line(&[("fett", "F5"), ("schief", "F3")]),
        ])]);
        assert_eq!(
            TetmlExtractor::new().extract(&doc, "x.tetml").markdown(),
            "# **Titel**\n**fett** ***schief***"
        );
        assert_eq!(secondary().extract(&doc, "x.tetml").markdown(), "Titel fett *schief*");
    }

    #[test]
    fn test_empty_paragraphs_are_dropped() {
        let doc = document(vec![
            Paragraph::new(vec![Line::default(), line(&[("  ", "F0")])]),
            Paragraph::new(vec![line(&[("a", "F0")])]),
            Paragraph::default(),
            Paragraph::new(vec![line(&[("b", "F0")])]),
        ]);
        let extracted = TetmlExtractor::new().extract(&doc, "x.tetml");
        assert_eq!(extracted.blocks.len(), 2);
        assert_eq!(extracted.markdown(), "a\n\nb");
    }

    #[test]
    fn test_words_without_font_stay_plain() {
        let doc = document(vec![Paragraph::new(vec![Line::new(vec![Word::new("frei", None)])])]);
        assert_eq!(TetmlExtractor::new().extract(&doc, "x.tetml").markdown(), "frei");
    }

    #[test]
    fn test_custom_heading_map() {
        let config = TetmlConfig::default().with_heading_map(HeadingMap::empty().with_font("F0", 4));
        let doc = document(vec![Paragraph::new(vec![line(&[("A", "F0")])]), Paragraph::new(vec![line(&[("B", "F1")])])]);
        let md = TetmlExtractor::new().with_config(config).extract(&doc, "x.tetml").markdown();
        assert_eq!(md, "#### A\n\n**B**");
    }

    #[test]
    fn test_metadata_uses_file_stem() {
        let extracted = TetmlExtractor::new().extract(&TetmlDocument::default(), "12_LS.tetml");
        assert_eq!(extracted.metadata.source_file, "12_LS.tetml");
        assert_eq!(extracted.metadata.html_title, "12_LS");
        assert_eq!(extracted.metadata.base_href, "");
        assert_eq!(extracted.metadata.meta_title, "");
        assert!(extracted.is_empty());
    }

    #[test]
    fn test_extract_reader() {
        let xml = r#"<TET xmlns="http://www.pdflib.com/XML/TET3/TET-3.0"><Document><Pages><Page><Content>
            <Para><Line><Word><Text>Hallo</Text><Box><Glyph font="F1">H</Glyph></Box></Word></Line></Para>
            <Para><Line><Word><Text>Welt</Text><Box><Glyph font="F0">W</Glyph></Box></Word></Line></Para>
            </Content></Page></Pages>
            <Resources><Fonts><Font id="F1" name="Foo-Bold" weight="700"/><Font id="F0" name="Foo"/></Fonts></Resources>
            </Document></TET>"#;
        let extracted = TetmlExtractor::new().extract_reader(xml.as_bytes(), "a.tetml").unwrap();
        assert_eq!(extracted.markdown_with_newline(), "# **Hallo**\n\nWelt\n");
    }

    #[test]
    fn test_parse_heading_entry() {
        assert_eq!(HeadingMap::parse_entry("F3=2").unwrap(), ("F3".to_string(), 2));
        assert_eq!(HeadingMap::parse_entry(" f7 = 6 ").unwrap(), ("f7".to_string(), 6));
        assert!(HeadingMap::parse_entry("F3").is_err());
        assert!(HeadingMap::parse_entry("F3=7").is_err());
        assert!(HeadingMap::parse_entry("=1").is_err());
    }

}
