//! Scoring of simplified Markdown against references.
//!
//! Joins model outputs with reference outputs by record id and reports SARI,
//! Flesch-Kincaid grade levels and a bold/heading span F1.

pub mod clean;
pub mod readability;
pub mod records;
pub mod report;
pub mod sari;
pub mod spans;

pub use clean::clean_markdown;
pub use readability::flesch_kincaid_grade;
pub use records::{FieldNames, ModelRecord, RecordSet, ReferenceRecord};
pub use report::{EvaluationReport, Evaluator, PairScore};
pub use sari::sari_score;
pub use spans::{extract_spans, match_spans, Span, SpanKind, SpanScore};
