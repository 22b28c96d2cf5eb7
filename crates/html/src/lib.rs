//! HTML backend for corpus extraction.
//!
//! Parses web pages into the shared markup tree, locates the readable content
//! region and renders it as Markdown blocks plus a metadata record.

pub mod carousel;
pub mod extractor;
pub mod inline;
pub mod parser;
pub mod region;
pub mod walker;

pub use extractor::HtmlExtractor;
pub use inline::{BreakMode, InlineRun};
pub use parser::HtmlParser;
pub use region::{ContentLocator, ContentRegion, ElementSignature, RegionKind, RegionStrategy};
pub use walker::BlockWalker;
