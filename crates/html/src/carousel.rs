//! Slide extraction for carousel/slider blocks.
//!
//! Each `<li>` of a slider is one slide. Slider markup varies a lot between
//! CMS themes, so the title and captions are found through fallbacks.

use lsmd_core::{Element, MarkdownBlock, MarkupNode};

use crate::inline::{element_to_markdown, BreakMode};

/// Class-name fragments that mark a slide title element.
const TITLE_CLASS_HINTS: &[&str] = &["titel", "title", "headline"];

/// Whether a region is a slider block.
pub fn is_carousel(el: &Element) -> bool {
    el.has_class("flexslider") || (el.is("ul") && el.has_class("slides"))
}

/// Render every slide of a carousel region as a bullet block.
///
/// Slides are all descendant `<li>` elements, so items of lists nested inside
/// a slide are treated as slides too.
pub fn slide_blocks(region: &Element) -> Vec<MarkdownBlock> {
    region
        .find_all(|el| el.is("li"))
        .into_iter()
        .filter_map(slide_block)
        .collect()
}

/// Render one slide, or `None` when it has neither title nor caption text.
pub fn slide_block(slide: &Element) -> Option<MarkdownBlock> {
    let title_el = title_element(slide);
    let mut title = match title_el {
        Some(el) => element_to_markdown(el, BreakMode::Space).trim().to_string(),
        None => fallback_title(slide),
    };

    let mut captions = paragraph_captions(slide);
    if captions.is_empty() {
        let texts = texts_outside(slide, title_el);
        if !texts.is_empty() {
            captions.push(texts.join(" "));
        }
    }

    if title.is_empty() {
        if captions.is_empty() {
            return None;
        }
        title = captions.remove(0);
    }

    Some(MarkdownBlock::SlideBullet { title, captions })
}

/// Title element: class hint, then heading, then bold text.
///
/// The class scan covers all descendants, including those of nested slides.
fn title_element(slide: &Element) -> Option<&Element> {
    slide
        .find(has_title_class)
        .or_else(|| slide.find(|el| el.heading_level().is_some()))
        .or_else(|| slide.find(|el| el.is("strong") || el.is("b")))
}

fn has_title_class(el: &Element) -> bool {
    let classes = el.classes().collect::<Vec<_>>().join(" ").to_lowercase();
    TITLE_CLASS_HINTS.iter().any(|hint| classes.contains(hint))
}

/// First line of the first direct child carrying any text.
fn fallback_title(slide: &Element) -> String {
    slide
        .children
        .iter()
        .map(|child| match child {
            MarkupNode::Text(text) => text.trim().to_string(),
            MarkupNode::Element(el) => el.stripped_text(" "),
        })
        .find(|text| !text.is_empty())
        .and_then(|text| text.lines().next().map(|line| line.trim().to_string()))
        .unwrap_or_default()
}

fn paragraph_captions(slide: &Element) -> Vec<String> {
    slide
        .find_all(|el| el.is("p"))
        .into_iter()
        .map(|p| element_to_markdown(p, BreakMode::HardBreak).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Trimmed, non-empty text runs under `el`, skipping the `skip` subtree.
fn texts_outside<'a>(el: &'a Element, skip: Option<&Element>) -> Vec<&'a str> {
    el.children
        .iter()
        .flat_map(|child| match child {
            MarkupNode::Text(text) => vec![text.trim()],
            MarkupNode::Element(inner) if skip.is_some_and(|s| std::ptr::eq(s, inner)) => Vec::new(),
            MarkupNode::Element(inner) => texts_outside(inner, skip),
        })
        .filter(|text| !text.is_empty())
        .collect()
}
