//! TETML backend for corpus extraction.
//!
//! Parses TETML (the XML output of PDFlib TET) into pages, paragraphs, lines
//! and words, resolves word fonts to bold/italic/heading styling and renders
//! Markdown.

pub mod extractor;
pub mod fonts;
pub mod model;
pub mod parser;

pub use extractor::{DocumentVariant, HeadingMap, TetmlConfig, TetmlExtractor};
pub use fonts::{FontRecord, FontTable, TextStyle};
pub use model::{Line, Page, Paragraph, TetmlDocument, Word};
pub use parser::TetmlParser;
