//! Inline markup conversion.
//!
//! Inline content is first lifted into [`InlineRun`]s and then rendered.
//! Wrapped content is trimmed before markers are added, and a wrapper whose
//! content is empty renders to nothing.

use lsmd_core::{Element, MarkupNode, HARD_BREAK};

/// How `<br>` is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakMode {
    /// Markdown hard break (`"  \n"`), used for paragraphs and list items.
    #[default]
    HardBreak,
    /// A single space, used where output must stay on one line (headings, titles).
    Space,
}

/// A styled piece of inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineRun {
    Text(String),
    Bold(Vec<InlineRun>),
    Italic(Vec<InlineRun>),
    Link { href: String, children: Vec<InlineRun> },
    Code(Vec<InlineRun>),
    LineBreak,
}

impl InlineRun {
    /// Lift a markup node into inline runs.
    ///
    /// Elements without inline meaning are transparent: their children are
    /// lifted in place.
    pub fn from_node(node: &MarkupNode) -> Vec<InlineRun> {
        match node {
            MarkupNode::Text(text) => vec![InlineRun::Text(text.replace('\r', "").replace('\n', " "))],
            MarkupNode::Element(el) => Self::from_element(el),
        }
    }

    /// Lift an element into inline runs.
    pub fn from_element(el: &Element) -> Vec<InlineRun> {
        let children = || el.children.iter().flat_map(Self::from_node).collect::<Vec<_>>();
        match el.tag.as_str() {
            "strong" | "b" => vec![InlineRun::Bold(children())],
            "em" | "i" => vec![InlineRun::Italic(children())],
            "a" => vec![InlineRun::Link {
                href: el.attr("href").unwrap_or("").trim().to_string(),
                children: children(),
            }],
            "code" => vec![InlineRun::Code(children())],
            "br" => vec![InlineRun::LineBreak],
            _ => children(),
        }
    }

    /// Render this run to Markdown.
    pub fn render(&self, mode: BreakMode) -> String {
        match self {
            InlineRun::Text(text) => text.clone(),
            InlineRun::Bold(children) => wrap(&render_runs(children, mode), "**", "**"),
            InlineRun::Italic(children) => wrap(&render_runs(children, mode), "*", "*"),
            InlineRun::Code(children) => wrap(&render_runs(children, mode), "`", "`"),
            InlineRun::Link { href, children } => {
                let text = render_runs(children, mode);
                let text = text.trim();
                match (href.is_empty(), text.is_empty()) {
                    (false, false) => format!("[{}]({})", text, href),
                    (false, true) => href.clone(),
                    (true, _) => text.to_string(),
                }
            }
            InlineRun::LineBreak => match mode {
                BreakMode::HardBreak => HARD_BREAK.to_string(),
                BreakMode::Space => " ".to_string(),
            },
        }
    }
}

fn wrap(inner: &str, open: &str, close: &str) -> String {
    let inner = inner.trim();
    if inner.is_empty() {
        String::new()
    } else {
        format!("{}{}{}", open, inner, close)
    }
}

/// Render a sequence of runs by concatenation.
pub fn render_runs(runs: &[InlineRun], mode: BreakMode) -> String {
    runs.iter().map(|run| run.render(mode)).collect()
}

/// Convert a node's inline content to Markdown (untrimmed).
pub fn node_to_markdown(node: &MarkupNode, mode: BreakMode) -> String {
    render_runs(&InlineRun::from_node(node), mode)
}

/// Convert an element (including its own inline meaning) to Markdown (untrimmed).
pub fn element_to_markdown(el: &Element, mode: BreakMode) -> String {
    render_runs(&InlineRun::from_element(el), mode)
}
