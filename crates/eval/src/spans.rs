//! Bold and heading spans and their tolerant matching.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BOLD_SPAN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static HEADING_SPAN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^(#+)\s*(.+)$").unwrap());

/// Minimum overlap for two spans to count as the same highlight.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Kind of highlighting a span covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanKind {
    Bold,
    Heading,
}

/// A highlighted range of a Markdown string, in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl Span {
    pub fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        Self { start, end, kind }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Intersection over the covering range of both spans.
    pub fn overlap(&self, other: &Span) -> f64 {
        let intersection = self.end.min(other.end).saturating_sub(self.start.max(other.start));
        let union = self.end.max(other.end).saturating_sub(self.start.min(other.start));
        if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        }
    }
}

/// Collect bold spans followed by heading spans.
pub fn extract_spans(text: &str) -> Vec<Span> {
    let offsets = CharOffsets::new(text);

    let bold = BOLD_SPAN_REGEX
        .find_iter(text)
        .map(|m| Span::new(offsets.get(m.start()), offsets.get(m.end()), SpanKind::Bold));
    let headings = HEADING_SPAN_REGEX
        .find_iter(text)
        .map(|m| Span::new(offsets.get(m.start()), offsets.get(m.end()), SpanKind::Heading));

    bold.chain(headings).collect()
}

/// Byte offset to character offset lookup.
struct CharOffsets<'a> {
    text: &'a str,
}

impl<'a> CharOffsets<'a> {
    fn new(text: &'a str) -> Self {
        Self { text }
    }

    fn get(&self, byte_offset: usize) -> usize {
        self.text[..byte_offset].chars().count()
    }
}

/// Precision, recall and F1 of one prediction against its reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanScore {
    pub true_positives: usize,
    pub predicted: usize,
    pub expected: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Greedily pair predicted spans with unused reference spans of the same kind.
///
/// Each predicted span takes the first reference it overlaps by at least
/// `threshold`, so the result depends on span order. With nothing predicted
/// or nothing expected the corresponding ratio is 1.0.
pub fn match_spans(predicted: &[Span], expected: &[Span], threshold: f64) -> SpanScore {
    let mut used = vec![false; expected.len()];
    let mut true_positives = 0;

    for p in predicted {
        let hit = expected
            .iter()
            .enumerate()
            .find(|(i, r)| !used[*i] && r.kind == p.kind && p.overlap(r) >= threshold);
        if let Some((i, _)) = hit {
            used[i] = true;
            true_positives += 1;
        }
    }

    let precision = ratio(true_positives, predicted.len());
    let recall = ratio(true_positives, expected.len());
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    SpanScore {
        true_positives,
        predicted: predicted.len(),
        expected: expected.len(),
        precision,
        recall,
        f1,
    }
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        hits as f64 / total as f64
    }
}
