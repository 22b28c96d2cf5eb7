//! HTML parser producing the owned markup tree.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use lsmd_core::{Element, Error, MarkupNode, Result};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::io::Read;

/// Tag name given to the synthetic document root.
pub const DOCUMENT_TAG: &str = "#document";

/// Parser for HTML documents.
///
/// Uses html5ever's browser-compatible tree builder, so malformed markup is
/// repaired rather than rejected. Comments, doctypes and processing
/// instructions are dropped.
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML document from a reader of UTF-8 bytes.
    pub fn parse<R: Read>(&self, mut reader: R) -> Result<Element> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut reader)
            .map_err(|e| Error::HtmlError(format!("Failed to read HTML: {}", e)))?;

        let mut root = Element::new(DOCUMENT_TAG);
        root.children = convert_children(&dom.document);
        Ok(root)
    }

    /// Parse an HTML document held in memory.
    pub fn parse_str(&self, html: &str) -> Result<Element> {
        self.parse(html.as_bytes())
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

fn convert_children(handle: &Handle) -> Vec<MarkupNode> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_node)
        .collect()
}

fn convert_node(handle: &Handle) -> Option<MarkupNode> {
    match handle.data {
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let mut element = Element::new(&*name.local);
            for attr in attrs.borrow().iter() {
                element = element.with_attr(&*attr.name.local, &*attr.value);
            }
            element.children = convert_children(handle);
            Some(MarkupNode::Element(element))
        }
        NodeData::Text { ref contents } => Some(MarkupNode::Text(contents.borrow().to_string())),
        _ => None,
    }
}
