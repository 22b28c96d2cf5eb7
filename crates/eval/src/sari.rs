//! SARI-style n-gram score for text simplification.

use std::collections::HashSet;

/// Highest n-gram order scored.
pub const MAX_ORDER: usize = 4;

/// Score a prediction against its source and one or more references.
///
/// For every n-gram order from 1 to 4, KEEP, DELETE and ADD are each scored
/// as an F1 over n-gram sets; the order score is their mean and the result is
/// the mean over all orders. Reference n-grams are pooled.
pub fn sari_score(source: &str, prediction: &str, references: &[&str]) -> f64 {
    let source_tokens = tokenize(source);
    let prediction_tokens = tokenize(prediction);
    let reference_tokens: Vec<Vec<&str>> = references.iter().map(|r| tokenize(r)).collect();

    let total: f64 = (1..=MAX_ORDER)
        .map(|n| {
            let src = ngrams(&source_tokens, n);
            let pred = ngrams(&prediction_tokens, n);
            let refs: HashSet<String> = reference_tokens.iter().flat_map(|r| ngrams(r, n)).collect();
            order_score(&src, &pred, &refs)
        })
        .sum();

    total / MAX_ORDER as f64
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

fn ngrams(tokens: &[&str], n: usize) -> HashSet<String> {
    tokens.windows(n).map(|w| w.join(" ")).collect()
}

fn order_score(src: &HashSet<String>, pred: &HashSet<String>, refs: &HashSet<String>) -> f64 {
    // KEEP: n-grams retained from the source that the references also keep.
    let kept: HashSet<&String> = pred.intersection(src).collect();
    let keep_needed: HashSet<&String> = src.intersection(refs).collect();
    let keep_hits = kept.intersection(&keep_needed).count();
    let keep = f1(
        ratio(keep_hits, kept.len()),
        ratio(keep_hits, keep_needed.len()),
    );

    // DELETE: source n-grams dropped by the prediction that the references drop too.
    let deleted: HashSet<&String> = src.difference(pred).collect();
    let delete_needed: HashSet<&String> = src.difference(refs).collect();
    let delete_hits = deleted.intersection(&delete_needed).count();
    let delete = f1(
        ratio(delete_hits, deleted.len()),
        ratio(delete_hits, delete_needed.len()),
    );

    // ADD: new n-grams of the prediction that the references introduce too.
    let added: HashSet<&String> = pred.difference(src).collect();
    let add_needed: HashSet<&String> = refs.difference(src).collect();
    let add_hits = added.intersection(&add_needed).count();
    let add = f1(ratio(add_hits, added.len()), ratio(add_hits, add_needed.len()));

    (keep + delete + add) / 3.0
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        hits as f64 / total as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_inputs_score_one() {
        let text = "Der Hund läuft schnell nach Hause";
        assert_eq!(sari_score(text, text, &[text]), 1.0);
    }

    #[test]
    fn test_empty_inputs_score_one() {
        assert_eq!(sari_score("", "", &[""]), 1.0);
        assert_eq!(sari_score("", "", &[]), 1.0);
    }

    #[test]
    fn test_copying_source_is_penalized() {
        let source = "Der Hund rennt sehr schnell nach Hause";
        let reference = "Der Hund rennt nach Hause";
        let copied = sari_score(source, source, &[reference]);
        let simplified = sari_score(source, reference, &[reference]);
        assert_eq!(simplified, 1.0);
        assert!(copied < simplified);
    }

    #[test]
    fn test_unrelated_prediction_scores_low() {
        let score = sari_score("a b c", "x y z", &["a b c"]);
        assert!(score < 0.5, "score was {}", score);
    }

    #[test]
    fn test_references_are_pooled() {
        let single = sari_score("a b", "a c", &["a d"]);
        let pooled = sari_score("a b", "a c", &["a d", "a c"]);
        assert!(pooled > single);
    }

    #[test]
    fn test_ngrams_are_sets() {
        let grams = ngrams(&["a", "a", "a"], 1);
        assert_eq!(grams.len(), 1);
        assert!(ngrams(&["a"], 2).is_empty());
    }
}
