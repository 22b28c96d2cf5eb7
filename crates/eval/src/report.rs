//! Joining model output with references and averaging the scores.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clean::clean_markdown;
use crate::readability::flesch_kincaid_grade;
use crate::records::{ModelRecord, RecordSet, ReferenceRecord};
use crate::sari::sari_score;
use crate::spans::{extract_spans, match_spans, DEFAULT_THRESHOLD};

/// Scores of one model record against its reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub sari: f64,
    pub fkgl_input: f64,
    pub fkgl_prediction: f64,
    pub fkgl_reference: f64,
    pub markdown_f1: f64,
}

/// Averages over all records that have a reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Records scored.
    pub evaluated: usize,
    /// Model records without a reference.
    pub missing: usize,
    pub sari: f64,
    pub fkgl_input: f64,
    pub fkgl_prediction: f64,
    pub fkgl_reference: f64,
    pub markdown_f1: f64,
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Evaluation Results ===")?;
        writeln!(f, "Evaluated: {} (missing references: {})", self.evaluated, self.missing)?;
        writeln!(f, "Average SARI: {:.4}", self.sari)?;
        writeln!(f, "Average FKGL Input: {:.2}", self.fkgl_input)?;
        writeln!(f, "Average FKGL Model Output: {:.2}", self.fkgl_prediction)?;
        writeln!(f, "Average FKGL Reference: {:.2}", self.fkgl_reference)?;
        write!(f, "Average Markdown F1 (bold + headings): {:.4}", self.markdown_f1)
    }
}

/// Scores model records against references.
#[derive(Debug, Clone)]
pub struct Evaluator {
    threshold: f64,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum span overlap for the Markdown F1.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score one pair.
    ///
    /// SARI and grade levels use cleaned text; the span F1 uses the raw
    /// Markdown of prediction and reference.
    pub fn score_pair(&self, model: &ModelRecord, reference: &ReferenceRecord) -> PairScore {
        let source = clean_markdown(&model.input);
        let prediction = clean_markdown(&model.prediction);
        let gold = clean_markdown(&reference.reference);

        let spans = match_spans(
            &extract_spans(&model.prediction),
            &extract_spans(&reference.reference),
            self.threshold,
        );

        PairScore {
            sari: sari_score(&source, &prediction, &[gold.as_str()]),
            fkgl_input: flesch_kincaid_grade(&source),
            fkgl_prediction: flesch_kincaid_grade(&prediction),
            fkgl_reference: flesch_kincaid_grade(&gold),
            markdown_f1: spans.f1,
        }
    }

    /// Score every model record that has a reference with the same id.
    pub fn evaluate(
        &self,
        model: &RecordSet<ModelRecord>,
        references: &RecordSet<ReferenceRecord>,
    ) -> EvaluationReport {
        let mut scores = Vec::new();
        let mut missing = 0;

        for record in model.iter() {
            match references.get(&record.id) {
                Some(reference) => scores.push(self.score_pair(record, reference)),
                None => {
                    log::debug!("No reference for id '{}'", record.id);
                    missing += 1;
                }
            }
        }

        if missing > 0 {
            log::warn!("{} example(s) missing from reference file", missing);
        }

        EvaluationReport {
            evaluated: scores.len(),
            missing,
            sari: mean(scores.iter().map(|s| s.sari)),
            fkgl_input: mean(scores.iter().map(|s| s.fkgl_input)),
            fkgl_prediction: mean(scores.iter().map(|s| s.fkgl_prediction)),
            fkgl_reference: mean(scores.iter().map(|s| s.fkgl_reference)),
            markdown_f1: mean(scores.iter().map(|s| s.markdown_f1)),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
