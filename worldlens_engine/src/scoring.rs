//! Similarity measures shared by the lifecycle manager and the matcher.

use rayon::prelude::*;
use std::collections::HashSet;
use std::hash::Hash;
use worldlens_core::{Pattern, PatternMatch};

/// Compute cosine similarity between two embedding vectors.
///
/// Returns 0.0 if the vectors differ in length or either has zero magnitude.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut mag_a = 0.0_f64;
    let mut mag_b = 0.0_f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = f64::from(*x);
        let y = f64::from(*y);
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom < f64::EPSILON {
        return 0.0;
    }

    dot / denom
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|` of two sets.
///
/// Returns 0.0 when either side is empty.
#[must_use]
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Jaccard similarity of the whitespace-separated tokens of two texts.
#[must_use]
pub fn token_jaccard(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();
    jaccard(&tokens_a, &tokens_b)
}

/// Closest candidate to `query` whose cosine distance is within
/// `max_distance`. Ties keep the earlier candidate.
#[must_use]
pub fn nearest(query: &[f32], candidates: Vec<Pattern>, max_distance: f64) -> Option<PatternMatch> {
    candidates
        .into_par_iter()
        .map(|pattern| {
            let similarity = cosine_similarity(query, &pattern.embedding);
            PatternMatch {
                pattern,
                similarity,
            }
        })
        .filter(|m| 1.0 - m.similarity <= max_distance)
        .reduce_with(|a, b| if b.similarity > a.similarity { b } else { a })
}
