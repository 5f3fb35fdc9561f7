//! Deterministic text metrics.
//!
//! Every function here is a pure function of its inputs. No wall-clock
//! time, no random source, nothing process-specific anywhere in the call
//! path from input text to output score. Repeated calls on the same input
//! return the same value bit for bit.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static PUNCT_STRIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\w]+|[^\w]+$").unwrap());

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]["'\u{201D}\u{2019})\]]*(?:\s|$)"#).unwrap());

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "is", "it",
        "that", "this", "with", "as", "by", "from", "was", "were", "are", "be", "been", "has",
        "have", "had", "not", "no", "do", "does", "did", "will", "would", "could", "should", "can",
        "may", "might", "if", "then", "than", "so", "up", "out", "about", "into", "over", "after",
        "before", "between", "through", "just", "also", "very", "more", "most", "some", "any",
        "each", "every", "all", "both", "few", "other", "such", "only", "own", "same", "too",
        "how", "what", "which", "who", "when", "where", "why", "i", "you", "we", "they", "he",
        "she", "me", "my", "your", "our",
    ]
    .into_iter()
    .collect()
});

/// Lowercased tokens with surrounding punctuation stripped, minus
/// stopwords. The shared vocabulary for every overlap-style metric.
pub fn content_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|t| {
            let stripped = PUNCT_STRIP_RE.replace_all(t, "").to_lowercase();
            if stripped.is_empty() || STOPWORDS.contains(stripped.as_str()) {
                None
            } else {
                Some(stripped)
            }
        })
        .collect()
}

/// Jaccard overlap between the content-word sets of two spans, in [0, 1].
/// Two empty spans overlap not at all.
pub fn lexical_overlap(a: &str, b: &str) -> f64 {
    let set_a: HashSet<String> = content_words(a).into_iter().collect();
    let set_b: HashSet<String> = content_words(b).into_iter().collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

/// Fraction of `next`'s distinct content words that do not appear in
/// `prev`, in [0, 1]. An empty `next` contributes nothing new.
pub fn novelty(prev: &str, next: &str) -> f64 {
    let prev_set: HashSet<String> = content_words(prev).into_iter().collect();
    let next_set: HashSet<String> = content_words(next).into_iter().collect();
    if next_set.is_empty() {
        return 0.0;
    }
    let fresh = next_set.iter().filter(|w| !prev_set.contains(*w)).count();
    fresh as f64 / next_set.len() as f64
}

/// Length/punctuation proxy for how charged a span is, in [0, 1].
/// Question and exclamation density plus a length component; no model, no
/// randomness.
pub fn engagement_intensity(text: &str) -> f64 {
    let wc = text.split_whitespace().count();
    if wc == 0 {
        return 0.0;
    }
    let emphatic = text.chars().filter(|c| *c == '!' || *c == '?').count();
    let emphasis = ((emphatic as f64 / wc as f64) * 10.0).min(0.5);
    let length = (wc as f64 / 120.0).min(0.5);
    emphasis + length
}

/// Mean sentence length in words and its coefficient of variation.
/// Returns `(0.0, 0.0)` for fewer than two sentences.
pub fn sentence_rhythm(text: &str) -> (f64, f64) {
    let lengths: Vec<f64> = SENTENCE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.split_whitespace().count() as f64)
        .collect();
    if lengths.len() < 2 {
        return (0.0, 0.0);
    }
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    if mean <= 0.0 {
        return (0.0, 0.0);
    }
    let variance = lengths.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / lengths.len() as f64;
    (mean, variance.sqrt() / mean)
}

/// Structural similarity between two spans in [0, 1]: length ratio scaled
/// by how closely their punctuation densities and sentence rhythms agree.
pub fn structural_similarity(a: &str, b: &str) -> f64 {
    let wa = a.split_whitespace().count();
    let wb = b.split_whitespace().count();
    if wa == 0 || wb == 0 {
        return 0.0;
    }
    let length_ratio = wa.min(wb) as f64 / wa.max(wb) as f64;
    let punct_density = |s: &str| {
        let chars = s.chars().count();
        if chars == 0 {
            0.0
        } else {
            s.chars().filter(|c| c.is_ascii_punctuation()).count() as f64 / chars as f64
        }
    };
    let punct_sim = 1.0 - (punct_density(a) - punct_density(b)).abs().min(1.0);
    let (_, cv_a) = sentence_rhythm(a);
    let (_, cv_b) = sentence_rhythm(b);
    let rhythm_sim = 1.0 - (cv_a - cv_b).abs().min(1.0);
    length_ratio * (punct_sim + rhythm_sim) / 2.0
}
