//! Owned markup tree shared by the tree-based extractors.
//!
//! Parsers build this tree once per document; extraction only ever reads it.
//! Tag and attribute names are stored lowercased, children keep document order.

/// A node in a parsed markup document.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    /// A tagged element with attributes and children.
    Element(Element),
    /// A raw character run.
    Text(String),
}

impl MarkupNode {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        MarkupNode::Text(text.into())
    }

    /// Return the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(el) => Some(el),
            MarkupNode::Text(_) => None,
        }
    }

    /// Return the text if this node is a text run.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MarkupNode::Text(text) => Some(text),
            MarkupNode::Element(_) => None,
        }
    }
}

impl From<Element> for MarkupNode {
    fn from(el: Element) -> Self {
        MarkupNode::Element(el)
    }
}

impl From<&str> for MarkupNode {
    fn from(text: &str) -> Self {
        MarkupNode::Text(text.to_string())
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<MarkupNode>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into().to_lowercase(), value.into()));
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: impl Into<MarkupNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(MarkupNode::Text(text.into()))
    }

    /// Whether this element has the given (lowercase) tag name.
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Whether the tag is one of `h1`..`h6`.
    pub fn heading_level(&self) -> Option<u8> {
        match self.tag.as_str() {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the attribute is present (even with an empty value).
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// The `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Whitespace-separated class tokens.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Whether any class token equals `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Match a class signature.
    ///
    /// A single-token signature matches any class token; a signature with
    /// several tokens must equal the whole (whitespace-normalized) attribute.
    pub fn matches_class(&self, signature: &str) -> bool {
        let wanted: Vec<&str> = signature.split_whitespace().collect();
        match wanted.as_slice() {
            [] => false,
            [single] => self.has_class(single),
            _ => self.classes().eq(wanted.iter().copied()),
        }
    }

    /// Direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(MarkupNode::as_element)
    }

    /// All descendant nodes in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// All descendant elements in document order.
    pub fn descendant_elements(&self) -> impl Iterator<Item = &Element> {
        self.descendants().filter_map(MarkupNode::as_element)
    }

    /// First descendant element matching `pred`.
    pub fn find<P>(&self, mut pred: P) -> Option<&Element>
    where
        P: FnMut(&Element) -> bool,
    {
        self.descendant_elements().find(|&el| pred(el))
    }

    /// Every descendant element matching `pred`, in document order.
    pub fn find_all<P>(&self, mut pred: P) -> Vec<&Element>
    where
        P: FnMut(&Element) -> bool,
    {
        self.descendant_elements().filter(|&el| pred(el)).collect()
    }

    /// Descendant text runs in document order.
    pub fn text_runs(&self) -> impl Iterator<Item = &str> {
        self.descendants().filter_map(MarkupNode::as_text)
    }

    /// Concatenation of all descendant text.
    pub fn text_content(&self) -> String {
        self.text_runs().collect()
    }

    /// Trimmed, non-empty text runs joined with `separator`.
    pub fn stripped_text(&self, separator: &str) -> String {
        self.text_runs()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Whether any descendant text run has non-whitespace content.
    pub fn has_visible_text(&self) -> bool {
        self.text_runs().any(|t| !t.trim().is_empty())
    }
}

/// Pre-order iterator over the descendants of an element.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, MarkupNode>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a MarkupNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(node) => {
                    if let MarkupNode::Element(el) = node {
                        self.stack.push(el.children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .with_attr("class", "flexslider  flexslider-inpage")
            .with_child(
                Element::new("p")
                    .with_text("one ")
                    .with_child(Element::new("b").with_text("two")),
            )
            .with_text("  ")
            .with_child(Element::new("span").with_text("three"))
    }

    #[test]
    fn test_descendants_are_preorder() {
        let root = sample();
        let tags: Vec<&str> = root.descendant_elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["p", "b", "span"]);
        assert_eq!(root.text_content(), "one two  three");
    }

    #[test]
    fn test_stripped_text() {
        let root = sample();
        assert_eq!(root.stripped_text(" "), "one two three");
        assert_eq!(root.stripped_text(""), "onetwothree");
        assert!(root.has_visible_text());
        assert!(!Element::new("div").with_text(" \n ").has_visible_text());
    }

    #[test]
    fn test_class_matching() {
        let root = sample();
        assert!(root.has_class("flexslider"));
        assert!(root.matches_class("flexslider"));
        assert!(root.matches_class("flexslider flexslider-inpage"));
        assert!(!root.matches_class("flexslider-inpage flexslider"));
        assert!(!root.matches_class("flex"));
        assert!(!root.matches_class(""));
    }

    #[test]
    fn test_attributes() {
        let el = Element::new("A").with_attr("HREF", "x");
        assert_eq!(el.tag, "a");
        assert_eq!(el.attr("href"), Some("x"));
        assert!(!el.has_attr("class"));
        assert_eq!(Element::new("h3").heading_level(), Some(3));
        assert_eq!(Element::new("hr").heading_level(), None);
    }

    #[test]
    fn test_find() {
        let root = sample();
        assert_eq!(root.find(|e| e.is("b")).map(|e| e.text_content()), Some("two".to_string()));
        assert!(root.find(|e| e.is("ul")).is_none());
        assert_eq!(root.find_all(|e| e.is("p") || e.is("span")).len(), 2);
    }
}
