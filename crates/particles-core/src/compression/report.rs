//! Result reporter: word counts and achieved reduction

use serde::{Deserialize, Serialize};

use super::words::count_words;

/// Measured outcome of a rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionResult {
    pub compressed_text: String,
    pub compressed_word_count: usize,
    /// Negative when the rewrite came back longer than the original
    pub actual_reduction_pct: i64,
}

/// Measure `compressed_text` against `original_text`
pub fn report(original_text: &str, compressed_text: &str) -> CompressionResult {
    measure(count_words(original_text), compressed_text)
}

/// Measure `compressed_text` against an already counted original
pub fn measure(original_word_count: usize, compressed_text: &str) -> CompressionResult {
    let compressed_word_count = count_words(compressed_text);
    CompressionResult {
        compressed_text: compressed_text.to_string(),
        compressed_word_count,
        actual_reduction_pct: reduction_pct(original_word_count, compressed_word_count),
    }
}

/// `round((1 - compressed / original) * 100)`, ties to even
///
/// An empty original reports 0.
pub fn reduction_pct(original_word_count: usize, compressed_word_count: usize) -> i64 {
    if original_word_count == 0 {
        return 0;
    }
    let ratio = compressed_word_count as f64 / original_word_count as f64;
    ((1.0 - ratio) * 100.0).round_ties_even() as i64
}
