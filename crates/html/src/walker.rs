//! Block-level walk over a content region.

use lsmd_core::{Element, ListItem, MarkdownBlock};

use crate::inline::{element_to_markdown, node_to_markdown, BreakMode};

/// Class that marks a word-processor paragraph as body text.
const DEFAULT_PARAGRAPH_CLASS: &str = "MsoNormal";

/// What an element contributes to the block walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Heading(u8),
    Paragraph,
    List,
    /// Not emitted itself; its children are walked.
    Container,
}

/// Recursive visitor turning a region into Markdown blocks.
#[derive(Debug, Clone)]
pub struct BlockWalker {
    /// Classes a `<p>` may carry (as its only class) and still count as body text.
    paragraph_classes: Vec<String>,
}

impl Default for BlockWalker {
    fn default() -> Self {
        Self {
            paragraph_classes: vec![DEFAULT_PARAGRAPH_CLASS.to_string()],
        }
    }
}

impl BlockWalker {
    /// Create a walker accepting unclassed and `MsoNormal` paragraphs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept paragraphs whose only class is `class`.
    pub fn with_paragraph_class(mut self, class: impl Into<String>) -> Self {
        self.paragraph_classes.push(class.into());
        self
    }

    /// Whether a `<p>` counts as body text rather than layout decoration.
    pub fn includes_paragraph(&self, p: &Element) -> bool {
        match p.attr("class") {
            None => true,
            Some(value) => {
                let tokens: Vec<&str> = value.split_whitespace().collect();
                matches!(tokens.as_slice(), [only] if self.paragraph_classes.iter().any(|c| c.as_str() == *only))
            }
        }
    }

    fn classify(&self, el: &Element) -> BlockKind {
        if let Some(level) = el.heading_level() {
            return BlockKind::Heading(level);
        }
        match el.tag.as_str() {
            "p" if self.includes_paragraph(el) => BlockKind::Paragraph,
            "ul" | "ol" => BlockKind::List,
            _ => BlockKind::Container,
        }
    }

    /// Walk the children of `region` in document order.
    ///
    /// Text directly under a container is layout whitespace and is ignored.
    pub fn walk(&self, region: &Element) -> Vec<MarkdownBlock> {
        region
            .child_elements()
            .flat_map(|child| self.visit(child))
            .collect()
    }

    fn visit(&self, el: &Element) -> Vec<MarkdownBlock> {
        match self.classify(el) {
            BlockKind::Heading(level) => {
                let text = element_to_markdown(el, BreakMode::Space);
                vec![MarkdownBlock::heading(level, text.trim())]
            }
            BlockKind::Paragraph => {
                let text = element_to_markdown(el, BreakMode::HardBreak);
                let text = text.trim();
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![MarkdownBlock::Paragraph(text.to_string())]
                }
            }
            BlockKind::List => {
                let items = list_items(el, 0);
                if items.is_empty() {
                    Vec::new()
                } else {
                    vec![MarkdownBlock::List(items)]
                }
            }
            BlockKind::Container => self.walk(el),
        }
    }
}

fn is_list(el: &Element) -> bool {
    el.is("ul") || el.is("ol")
}

/// Render a `<ul>`/`<ol>` and the lists nested directly in its items.
///
/// Only direct `<li>` children are items; numbering restarts for every list.
pub fn list_items(list: &Element, depth: usize) -> Vec<ListItem> {
    let ordered = list.is("ol");

    list.child_elements()
        .filter(|child| child.is("li"))
        .enumerate()
        .flat_map(|(idx, li)| {
            let text = li
                .children
                .iter()
                .filter(|child| !child.as_element().is_some_and(is_list))
                .map(|child| node_to_markdown(child, BreakMode::HardBreak))
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            let item = ListItem::new(depth, ordered.then_some(idx + 1), text);
            let nested = li
                .child_elements()
                .filter(|child| is_list(child))
                .flat_map(|sub| list_items(sub, depth + 1));

            std::iter::once(item).chain(nested).collect::<Vec<_>>()
        })
        .collect()
}
