//! Core markup tree, Markdown block model, metadata records and Markdown
//! cleaning shared by the document extractors.

pub mod clean;
pub mod error;
pub mod markdown;
pub mod markup;
pub mod types;

pub use error::{Error, Result};
pub use markdown::{ListItem, MarkdownBlock, MarkdownFormatter, HARD_BREAK};
pub use markup::{Element, MarkupNode};
pub use types::{DocumentMetadata, ExtractedDocument, SourceFormat};
