// ============================================================
// Layer 3 — Review Domain Types
// ============================================================
// A movie review goes through two shapes:
//
//   raw text + rating    → RawReview   (straight from the dataset files)
//   encoded index grids  → EncodedText (after the TextEncoder runs)
//
// A Review pairs the two. Every view in EncodedText is derived
// from the same token sequence, truncated/padded to the
// configured maximum lengths, so the three grids always line
// up word-for-word.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// Number of rating classes produced by the classification head
pub const RATING_CLASSES: usize = 10;

/// Lowest and highest valid review ratings
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// One line of the dataset before encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    pub text:   String,
    pub rating: u8,
}

impl RawReview {
    pub fn new(text: impl Into<String>, rating: u8) -> Self {
        Self { text: text.into(), rating }
    }
}

/// Shape of the fixed-size grids every encoded review is padded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Words per review (`max_sentence_length`)
    pub max_word_num: usize,
    /// Characters per word (`max_word_length`)
    pub max_char_num: usize,
    /// Syllables per word (`max_syll_num`)
    pub max_syll_num: usize,
    /// Width of the dense word vector
    pub word_dim:     usize,
}

/// Flat, row-major encoded views of one review.
///
///   words: [max_word_num * word_dim]     dense word vectors
///   chars: [max_word_num * max_char_num] character indices
///   sylls: [max_word_num * max_syll_num] syllable indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedText {
    pub words: Vec<f32>,
    pub chars: Vec<i64>,
    pub sylls: Vec<i64>,
}

impl EncodedText {
    /// True when all three views have the lengths `shape` demands.
    pub fn matches(&self, shape: &GridShape) -> bool {
        self.words.len() == shape.max_word_num * shape.word_dim
            && self.chars.len() == shape.max_word_num * shape.max_char_num
            && self.sylls.len() == shape.max_word_num * shape.max_syll_num
    }
}

/// A labelled, encoded review. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub text:    String,
    pub encoded: EncodedText,
    pub rating:  u8,
}

/// Returns true if `rating` is on the 1..=10 scale.
pub fn is_valid_rating(rating: i64) -> bool {
    (MIN_RATING as i64..=MAX_RATING as i64).contains(&rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(is_valid_rating(1));
        assert!(is_valid_rating(10));
        assert!(!is_valid_rating(0));
        assert!(!is_valid_rating(11));
    }

    #[test]
    fn test_encoded_text_shape_check() {
        let shape = GridShape { max_word_num: 2, max_char_num: 3, max_syll_num: 1, word_dim: 4 };
        let enc = EncodedText {
            words: vec![0.0; 8],
            chars: vec![0; 6],
            sylls: vec![0; 2],
        };
        assert!(enc.matches(&shape));

        let short = EncodedText { chars: vec![0; 5], ..enc };
        assert!(!short.matches(&shape));
    }
}
