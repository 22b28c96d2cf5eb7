//! Page-level extraction: regions to blocks, plus the metadata record.

use lsmd_core::{DocumentMetadata, Element, ExtractedDocument, MarkdownBlock, Result, SourceFormat};
use std::io::Read;

use crate::carousel::slide_blocks;
use crate::parser::HtmlParser;
use crate::region::{ContentLocator, ContentRegion, RegionKind};
use crate::walker::BlockWalker;

/// Extracts Markdown blocks and metadata from parsed HTML.
#[derive(Debug, Default)]
pub struct HtmlExtractor {
    locator: ContentLocator,
    walker: BlockWalker,
}

impl HtmlExtractor {
    /// Create an extractor with the default region strategies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom region locator.
    pub fn with_locator(mut self, locator: ContentLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Use a custom block walker.
    pub fn with_walker(mut self, walker: BlockWalker) -> Self {
        self.walker = walker;
        self
    }

    /// Parse and extract an HTML document from a reader.
    pub fn extract_reader<R: Read>(&self, reader: R, source_file: &str) -> Result<ExtractedDocument> {
        let document = HtmlParser::new().parse(reader)?;
        Ok(self.extract(&document, source_file))
    }

    /// Extract a parsed document.
    ///
    /// Regions without visible text are skipped; a document without any
    /// recognizable region yields no blocks.
    pub fn extract(&self, document: &Element, source_file: &str) -> ExtractedDocument {
        let mut extracted = ExtractedDocument::new(SourceFormat::Html, extract_metadata(document, source_file));

        for region in self.locator.locate(document) {
            if !region.element.has_visible_text() {
                log::debug!("Skipping empty <{}> region in {}", region.element.tag, source_file);
                continue;
            }
            extracted.extend_blocks(self.region_blocks(&region));
        }

        if extracted.is_empty() {
            log::warn!("No content extracted from '{}'", source_file);
        }

        extracted
    }

    /// Render a single region.
    pub fn region_blocks(&self, region: &ContentRegion<'_>) -> Vec<MarkdownBlock> {
        match region.kind {
            RegionKind::Carousel => slide_blocks(region.element),
            RegionKind::Content => self.walker.walk(region.element),
        }
    }
}

/// Read the base href, title and `title` meta tag of a page.
pub fn extract_metadata(document: &Element, source_file: &str) -> DocumentMetadata {
    let base_href = document
        .find(|el| el.is("base") && el.has_attr("href"))
        .and_then(|el| el.attr("href"))
        .map(|href| href.trim().to_string())
        .unwrap_or_default();

    let html_title = document
        .find(|el| el.is("title"))
        .map(|el| el.stripped_text(""))
        .unwrap_or_default();

    let meta_title = document
        .find(|el| el.is("meta") && el.attr("name") == Some("title"))
        .and_then(|el| el.attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    DocumentMetadata {
        source_file: source_file.to_string(),
        base_href,
        html_title,
        meta_title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> ExtractedDocument {
        HtmlExtractor::new()
            .extract_reader(html.as_bytes(), "1_LS.html")
            .unwrap()
    }

    #[test]
    fn test_content_div_end_to_end() {
        let doc = extract(r#"<div id="content"><h1>Title</h1><p>Hello <b>world</b>.</p></div>"#);
        assert_eq!(doc.markdown(), "# Title\n\nHello **world**.");
        assert_eq!(doc.markdown_with_newline(), "# Title\n\nHello **world**.\n");
    }

    #[test]
    fn test_sidebar_paragraph_is_omitted() {
        let doc = extract(
            r#"<div id="content"><p>Text</p><p class="sidebar">Anzeige</p><p class="MsoNormal">Mehr</p></div>"#,
        );
        assert_eq!(doc.markdown(), "Text\n\nMehr");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = r#"<main><h2>A</h2><ul><li>x<ol><li>y</li></ol></li></ul></main>
            <div class="flexslider flexslider-inpage"><ul class="slides"><li><h3>S</h3><p>c</p></li></ul></div>"#;
        assert_eq!(extract(html).markdown(), extract(html).markdown());
    }

    #[test]
    fn test_main_with_carousel() {
        let html = concat!(
            r#"<div id="main"><p>Intro</p></div>"#,
            r#"<div class="flexslider flexslider-inpage"><ul class="slides">"#,
            r#"<li><h3>Erste Folie</h3><p>Text eins</p></li>"#,
            r#"<li><span class="slide-titel">Zweite</span> Mehr Text</li>"#,
            r#"</ul></div>"#,
        );
        assert_eq!(
            extract(html).markdown(),
            "Intro\n\n- Erste Folie\nText eins  \n\n- Zweite\nMehr Text  "
        );
    }

    #[test]
    fn test_empty_regions_are_skipped() {
        let html = r#"<div id="main"> </div><div class="flexslider flexslider-inpage"><ul class="slides"><li><b>Nur</b></li></ul></div>"#;
        assert_eq!(extract(html).markdown(), "- **Nur**");
    }

    #[test]
    fn test_wrapper_fallback() {
        let html = concat!(
            r#"<div class="wpb_wrapper"><h2>Eins</h2><div class="wpb_wrapper"><p>innen</p></div></div>"#,
            r#"<div class="wpb_wrapper"><p>Zwei</p></div>"#,
        );
        assert_eq!(extract(html).markdown(), "## Eins\n\ninnen\n\nZwei");
    }

    #[test]
    fn test_no_region_yields_empty_body() {
        let doc = extract("<div class='nav'><p>Menü</p></div>");
        assert!(doc.is_empty());
        assert_eq!(doc.markdown_with_newline(), "");
    }

    #[test]
    fn test_metadata() {
        let html = r#"<html><head><base href=" https://example.org/ls/ "><title>
            Leichte Sprache </title><meta name="title" content=" Start "></head>
            <body><div id="content"><p>x</p></div></body></html>"#;
        let doc = extract(html);
        assert_eq!(
            doc.metadata,
            DocumentMetadata {
                source_file: "1_LS.html".to_string(),
                base_href: "https://example.org/ls/".to_string(),
                html_title: "Leichte Sprache".to_string(),
                meta_title: "Start".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_metadata_defaults_to_empty() {
        let doc = extract("<p>x</p>");
        assert_eq!(doc.metadata, DocumentMetadata::new("1_LS.html"));
    }
}
