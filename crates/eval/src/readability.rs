//! Flesch-Kincaid grade level.

use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_END_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

const VOWELS: &str = "aeiouyäöü";

/// Flesch-Kincaid grade level of plain text; 0.0 for text without words.
///
/// `0.39 * words/sentences + 11.8 * syllables/words - 15.59`, with syllables
/// estimated as vowel groups (at least one per word).
pub fn flesch_kincaid_grade(text: &str) -> f64 {
    let words = words(text);
    if words.is_empty() {
        return 0.0;
    }

    let sentences = sentence_count(text).max(1);
    let syllables: usize = words.iter().map(|w| syllable_count(w)).sum();

    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59
}

/// Whitespace tokens with surrounding punctuation removed.
fn words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .collect()
}

fn sentence_count(text: &str) -> usize {
    SENTENCE_END_REGEX
        .split(text)
        .filter(|sentence| sentence.chars().any(char::is_alphanumeric))
        .count()
}

fn syllable_count(word: &str) -> usize {
    let mut groups = 0;
    let mut in_vowel = false;
    for c in word.chars().flat_map(char::to_lowercase) {
        let is_vowel = VOWELS.contains(c);
        if is_vowel && !in_vowel {
            groups += 1;
        }
        in_vowel = is_vowel;
    }
    groups.max(1)
}
