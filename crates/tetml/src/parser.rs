//! TETML file parser implementation.

use lsmd_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Read;

use crate::fonts::FontRecord;
use crate::model::{Line, Page, Paragraph, TetmlDocument, Word};

/// Parser for TETML documents.
pub struct TetmlParser;

impl TetmlParser {
    /// Create a new TETML parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a TETML document from a reader.
    pub fn parse<R: Read>(&self, mut reader: R) -> Result<TetmlDocument> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.parse_str(&content)
    }

    /// Parse a TETML document held in memory.
    ///
    /// Fonts may be declared after the pages that use them, so styles are not
    /// resolved here.
    pub fn parse_str(&self, xml_content: &str) -> Result<TetmlDocument> {
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut state = ParseState::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => state.open(e),
                Ok(Event::Empty(ref e)) => {
                    state.open(e);
                    state.close(local_name(e.name().as_ref()));
                }
                Ok(Event::Text(ref e)) => {
                    if state.in_text {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::XmlError(format!("Bad text content: {}", e)))?;
                        state.push_text(&text);
                    }
                }
                Ok(Event::End(ref e)) => {
                    let name = e.name();
                    state.close(local_name(name.as_ref()));
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
        }

        log::debug!(
            "Parsed TETML: {} page(s), {} font(s)",
            state.document.pages.len(),
            state.document.fonts.len()
        );

        Ok(state.document)
    }
}

impl Default for TetmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A word being assembled from its `Text` and `Glyph` children.
#[derive(Debug, Default)]
struct PendingWord {
    text: Option<String>,
    font: Option<String>,
}

#[derive(Debug, Default)]
struct ParseState {
    document: TetmlDocument,
    page: Option<Page>,
    /// Open paragraphs, innermost last.
    paragraphs: Vec<Paragraph>,
    line: Option<Line>,
    word: Option<PendingWord>,
    in_text: bool,
}

impl ParseState {
    fn open(&mut self, e: &BytesStart<'_>) {
        let name = e.name();
        match local_name(name.as_ref()) {
            b"Font" => self.add_font(e),
            b"Page" => self.page = Some(Page::default()),
            b"Para" => self.paragraphs.push(Paragraph::default()),
            b"Line" => self.line = Some(Line::default()),
            b"Word" => self.word = Some(PendingWord::default()),
            b"Text" => {
                // Only the first Text of a word carries its content.
                if let Some(word) = self.word.as_mut() {
                    if word.text.is_none() {
                        word.text = Some(String::new());
                        self.in_text = true;
                    }
                }
            }
            b"Glyph" => {
                if let Some(word) = self.word.as_mut() {
                    if word.font.is_none() {
                        word.font = attribute(e, b"font").filter(|f| !f.is_empty());
                    }
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"Text" => self.in_text = false,
            b"Word" => {
                if let Some(PendingWord { text: Some(text), font }) = self.word.take() {
                    if let Some(line) = self.line.as_mut() {
                        line.words.push(Word { text, font });
                    }
                }
            }
            b"Line" => {
                if let Some(line) = self.line.take() {
                    if let Some(para) = self.paragraphs.last_mut() {
                        para.lines.push(line);
                    }
                }
            }
            b"Para" => {
                if let Some(para) = self.paragraphs.pop() {
                    if let Some(page) = self.page.as_mut() {
                        page.paragraphs.push(para);
                    }
                }
            }
            b"Page" => {
                if let Some(page) = self.page.take() {
                    self.document.pages.push(page);
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(buf) = self.word.as_mut().and_then(|w| w.text.as_mut()) {
            buf.push_str(text);
        }
    }

    fn add_font(&mut self, e: &BytesStart<'_>) {
        let Some(id) = attribute(e, b"id") else {
            return;
        };
        let record = FontRecord::from_attributes(
            attribute(e, b"name").as_deref(),
            attribute(e, b"weight").as_deref(),
            attribute(e, b"italicangle").as_deref(),
        );
        self.document.fonts.insert(id, record);
    }
}

/// Read an attribute value, ignoring any namespace prefix on the key.
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        if local_name(attr.key.as_ref()) == key {
            Some(
                attr.unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string()),
            )
        } else {
            None
        }
    })
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TET xmlns="http://www.pdflib.com/XML/TET3/TET-3.0" version="5.1">
<Document filename="1_LS.pdf">
<Pages>
<Page number="1">
<Content granularity="word">
<Para>
 <Box llx="1" lly="2">
  <Line>
   <Word><Text>Hallo</Text><Box><Glyph font="F1" size="20">H</Glyph><Glyph font="F0">a</Glyph></Box></Word>
   <Word><Text>Welt &amp; mehr</Text><Box><Glyph font="F0">W</Glyph></Box></Word>
  </Line>
  <Line>
   <Word><Text>   </Text><Box><Glyph font="F2">x</Glyph></Box></Word>
   <Word><Box><Glyph font="F0">y</Glyph></Box></Word>
  </Line>
 </Box>
</Para>
</Content>
</Page>
<Page number="2"><Content><Para><Line><Word><Text>Zwei</Text></Word></Line></Para></Content></Page>
</Pages>
<Resources>
<Fonts>
<Font id="F0" name="Arial" weight="400" italicangle="0"/>
<Font id="F1" name="Arial-BoldMT" weight="bold"/>
<Font name="NoId" weight="700"/>
</Fonts>
</Resources>
</Document>
</TET>"#;

    #[test]
    fn test_parse_structure() {
        let doc = TetmlParser::new().parse_str(SAMPLE).unwrap();
        assert_eq!(doc.pages.len(), 2);

        let para = &doc.pages[0].paragraphs[0];
        assert_eq!(para.lines.len(), 2);
        assert_eq!(
            para.lines[0].words,
            vec![Word::new("Hallo", Some("F1")), Word::new("Welt & mehr", Some("F0"))]
        );
        // Whitespace-only text is kept raw; words without Text are dropped.
        assert_eq!(para.lines[1].words, vec![Word::new("", Some("F2"))]);

        assert_eq!(doc.pages[1].paragraphs[0].lines[0].words, vec![Word::new("Zwei", None)]);
    }

    #[test]
    fn test_parse_fonts_after_pages() {
        let doc = TetmlParser::new().parse_str(SAMPLE).unwrap();
        assert_eq!(doc.fonts.len(), 2);
        let f1 = doc.fonts.get("F1").unwrap();
        assert_eq!(f1.name, "Arial-BoldMT");
        assert_eq!(f1.weight, 400);
        assert!(f1.is_bold());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = TetmlParser::new().parse_str("<TET><Page><Para></Page></TET>");
        assert!(matches!(result, Err(Error::XmlError(_))));
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"tet:Para"), b"Para");
        assert_eq!(local_name(b"Para"), b"Para");
    }
}
