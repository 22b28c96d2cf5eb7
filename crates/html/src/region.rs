//! Content-region discovery.
//!
//! The corpus mixes many CMS export conventions, so the readable region is
//! found by trying an ordered list of strategies and keeping the first one
//! that selects anything. A failing specific strategy never blocks a more
//! generic one further down the list.

use lsmd_core::Element;
use std::fmt;

use crate::carousel::is_carousel;

/// How a selected region is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Generic block walk.
    Content,
    /// Slider block, one bullet per slide.
    Carousel,
}

/// A subtree judged to hold readable content.
#[derive(Debug, Clone, Copy)]
pub struct ContentRegion<'a> {
    pub element: &'a Element,
    pub kind: RegionKind,
}

impl<'a> ContentRegion<'a> {
    /// Wrap an element, detecting carousel blocks.
    pub fn new(element: &'a Element) -> Self {
        let kind = if is_carousel(element) {
            RegionKind::Carousel
        } else {
            RegionKind::Content
        };
        Self { element, kind }
    }
}

/// A tag plus optional id and class constraint, written like `div#main` or
/// `div.main-container`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSignature {
    tag: String,
    id: Option<String>,
    class: Option<String>,
}

impl ElementSignature {
    /// Match any element with this tag.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            class: None,
        }
    }

    /// Require an exact `id`.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Require a class (see [`Element::matches_class`]).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Whether `el` has this signature.
    pub fn matches(&self, el: &Element) -> bool {
        el.is(&self.tag)
            && self.id.as_deref().map_or(true, |id| el.id() == Some(id))
            && self.class.as_deref().map_or(true, |class| el.matches_class(class))
    }
}

impl fmt::Display for ElementSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }
        if let Some(class) = &self.class {
            write!(f, ".{}", class.split_whitespace().collect::<Vec<_>>().join("."))?;
        }
        Ok(())
    }
}

/// One way of finding content regions in a document.
pub trait RegionStrategy: fmt::Debug {
    /// Short description for logging.
    fn describe(&self) -> String;

    /// Select regions in document order; empty when the strategy does not apply.
    fn select<'a>(&self, document: &'a Element) -> Vec<&'a Element>;
}

/// First element with a given signature.
///
/// When the match is a main container (`id="main"` or a `<main>` element) and
/// a carousel signature is configured, all carousel blocks of the document are
/// appended as extra regions.
#[derive(Debug, Clone)]
pub struct SignatureStrategy {
    signature: ElementSignature,
    carousels: Option<ElementSignature>,
}

impl SignatureStrategy {
    /// Select the first element matching `signature`.
    pub fn new(signature: ElementSignature) -> Self {
        Self {
            signature,
            carousels: None,
        }
    }

    /// Append carousel blocks matching `carousels` next to main containers.
    pub fn with_carousels(mut self, carousels: ElementSignature) -> Self {
        self.carousels = Some(carousels);
        self
    }
}

fn is_main_container(el: &Element) -> bool {
    el.id() == Some("main") || el.is("main")
}

impl RegionStrategy for SignatureStrategy {
    fn describe(&self) -> String {
        self.signature.to_string()
    }

    fn select<'a>(&self, document: &'a Element) -> Vec<&'a Element> {
        let Some(primary) = document.find(|el| self.signature.matches(el)) else {
            return Vec::new();
        };

        let mut regions = vec![primary];
        if let Some(carousels) = &self.carousels {
            if is_main_container(primary) {
                regions.extend(document.find_all(|el| carousels.matches(el)));
            }
        }
        regions
    }
}

/// Outermost wrapper blocks: wrappers not nested inside another wrapper.
///
/// Falls back to every wrapper when none is outermost.
#[derive(Debug, Clone)]
pub struct WrapperStrategy {
    signature: ElementSignature,
}

impl WrapperStrategy {
    /// Collect outermost elements matching `signature`.
    pub fn new(signature: ElementSignature) -> Self {
        Self { signature }
    }
}

impl RegionStrategy for WrapperStrategy {
    fn describe(&self) -> String {
        format!("outermost {}", self.signature)
    }

    fn select<'a>(&self, document: &'a Element) -> Vec<&'a Element> {
        let outermost = outermost_matches(document, &self.signature);
        if outermost.is_empty() {
            document.find_all(|el| self.signature.matches(el))
        } else {
            outermost
        }
    }
}

fn outermost_matches<'a>(el: &'a Element, signature: &ElementSignature) -> Vec<&'a Element> {
    el.child_elements()
        .flat_map(|child| {
            if signature.matches(child) {
                vec![child]
            } else {
                outermost_matches(child, signature)
            }
        })
        .collect()
}

/// Ordered list of region strategies.
#[derive(Debug)]
pub struct ContentLocator {
    strategies: Vec<Box<dyn RegionStrategy>>,
}

impl Default for ContentLocator {
    fn default() -> Self {
        let carousels = ElementSignature::tag("div").with_class("flexslider flexslider-inpage");
        let signatures = [
            ElementSignature::tag("div").with_id("content"),
            ElementSignature::tag("div").with_id("main"),
            ElementSignature::tag("div").with_class("magazin-reader source-default"),
            ElementSignature::tag("div").with_class("main-container"),
            ElementSignature::tag("main").with_id("main"),
            ElementSignature::tag("div").with_class("main_wrapper"),
            ElementSignature::tag("div").with_id("inhalt"),
            ElementSignature::tag("main").with_class("main"),
            ElementSignature::tag("main"),
            ElementSignature::tag("div").with_class("main"),
            ElementSignature::tag("ul").with_class("slides"),
        ];

        let mut locator = Self::empty();
        for signature in signatures {
            locator = locator.with_strategy(SignatureStrategy::new(signature).with_carousels(carousels.clone()));
        }
        locator.with_strategy(WrapperStrategy::new(
            ElementSignature::tag("div").with_class("wpb_wrapper"),
        ))
    }
}

impl ContentLocator {
    /// Create a locator with the default CMS signatures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a locator without strategies.
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy with the lowest priority so far.
    pub fn with_strategy(mut self, strategy: impl RegionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Insert a strategy ahead of all others.
    pub fn with_priority_strategy(mut self, strategy: impl RegionStrategy + 'static) -> Self {
        self.strategies.insert(0, Box::new(strategy));
        self
    }

    /// Select the regions of the first strategy that finds any.
    pub fn locate<'a>(&self, document: &'a Element) -> Vec<ContentRegion<'a>> {
        for strategy in &self.strategies {
            let selected = strategy.select(document);
            if !selected.is_empty() {
                log::debug!(
                    "Content region: {} ({} region(s))",
                    strategy.describe(),
                    selected.len()
                );
                return selected.into_iter().map(ContentRegion::new).collect();
            }
        }

        log::debug!("No content region matched any of {} strategies", self.strategies.len());
        Vec::new()
    }
}
