// ============================================================
// Layer 4 — Text Preprocessor / Encoder
// ============================================================
// Turns one raw review line into the three views the model
// reads, all aligned word-for-word:
//
//   "영화 좋다"
//       │ clean + split on whitespace
//       ▼
//   ["영화", "좋다"]                       (≤ max_word_num words)
//       │
//       ├─ word vectors   hashed, deterministic, word_dim wide
//       ├─ char indices   Hangul decomposed into jamo:
//       │                 영 → ㅇ ㅕ ㅇ,  화 → ㅎ ㅘ
//       └─ syllable ids   one per Hangul syllable
//
// Character vocabulary (252 slots, 148 used):
//   0        padding
//   1        unknown
//   2..=96   printable ASCII (0x20..=0x7E)
//   97..=147 Hangul compatibility jamo (U+3131..=U+3163)
//
// Syllable vocabulary (11173 slots):
//   0         padding / not a Hangul syllable
//   1..=11172 precomposed Hangul syllables U+AC00..=U+D7A3
//
// Reference: Unicode §3.12 (Conjoining Jamo Behavior)
//            Rust Book §8 (Strings in Rust)

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::review::{EncodedText, GridShape};
use crate::domain::traits::TextEncoder;

/// Rows in the character embedding table
pub const CHARACTER_SIZE: usize = 252;
/// Rows in the syllable embedding table
pub const SYLLABLE_SIZE: usize = 11173;

const PAD: i64 = 0;
const UNKNOWN_CHAR: i64 = 1;
const ASCII_OFFSET: i64 = 2;
const JAMO_OFFSET: i64 = 97;

const ASCII_FIRST: u32 = 0x20;
const ASCII_LAST: u32 = 0x7E;
const JAMO_FIRST: u32 = 0x3131;
const JAMO_LAST: u32 = 0x3163;
const SYLLABLE_FIRST: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;

const MEDIAL_FIRST: u32 = 0x314F;
const MEDIAL_COUNT: u32 = 21;
const FINAL_COUNT: u32 = 28;

/// Initial consonants in syllable order, as compatibility jamo
const INITIALS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ',
    'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// Final consonants (index 1..=27 of the syllable formula)
const FINALS: [char; 27] = [
    'ㄱ', 'ㄲ', 'ㄳ', 'ㄴ', 'ㄵ', 'ㄶ', 'ㄷ', 'ㄹ', 'ㄺ', 'ㄻ',
    'ㄼ', 'ㄽ', 'ㄾ', 'ㄿ', 'ㅀ', 'ㅁ', 'ㅂ', 'ㅄ', 'ㅅ', 'ㅆ',
    'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// Normalise a raw line: control characters and Unicode space
/// variants become plain spaces, runs of spaces collapse to one,
/// and the ends are trimmed.
pub fn clean(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| match c {
            '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Index of a single character in the character table.
pub fn char_index(c: char) -> i64 {
    let code = c as u32;
    match code {
        ASCII_FIRST..=ASCII_LAST => ASCII_OFFSET + (code - ASCII_FIRST) as i64,
        JAMO_FIRST..=JAMO_LAST   => JAMO_OFFSET + (code - JAMO_FIRST) as i64,
        _ => UNKNOWN_CHAR,
    }
}

/// Index of a single character in the syllable table.
pub fn syllable_index(c: char) -> i64 {
    let code = c as u32;
    match code {
        SYLLABLE_FIRST..=SYLLABLE_LAST => 1 + (code - SYLLABLE_FIRST) as i64,
        _ => PAD,
    }
}

/// Split a precomposed Hangul syllable into compatibility jamo.
/// Returns None for anything that is not a Hangul syllable.
pub fn decompose(c: char) -> Option<Vec<char>> {
    let code = c as u32;
    if !(SYLLABLE_FIRST..=SYLLABLE_LAST).contains(&code) {
        return None;
    }
    let offset  = code - SYLLABLE_FIRST;
    let initial = offset / (MEDIAL_COUNT * FINAL_COUNT);
    let medial  = (offset % (MEDIAL_COUNT * FINAL_COUNT)) / FINAL_COUNT;
    let last    = offset % FINAL_COUNT;

    let mut jamo = vec![INITIALS[initial as usize]];
    jamo.extend(char::from_u32(MEDIAL_FIRST + medial));
    if last > 0 {
        jamo.push(FINALS[(last - 1) as usize]);
    }
    Some(jamo)
}

/// Encoder for Korean review text: jamo-level characters,
/// syllables, and hashed word vectors.
#[derive(Debug, Clone)]
pub struct HangulEncoder {
    shape: GridShape,
}

impl HangulEncoder {
    pub fn new(shape: GridShape) -> Self {
        Self { shape }
    }

    /// Deterministic pseudo-random vector for `word`, values in [-0.5, 0.5).
    fn word_vector(&self, word: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        word.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());
        (0..self.shape.word_dim)
            .map(|_| rng.gen_range(-0.5f32..0.5))
            .collect()
    }

    fn char_row(&self, word: &str) -> Vec<i64> {
        let mut row: Vec<i64> = word
            .chars()
            .flat_map(|c| decompose(c).unwrap_or_else(|| vec![c]))
            .map(char_index)
            .take(self.shape.max_char_num)
            .collect();
        row.resize(self.shape.max_char_num, PAD);
        row
    }

    fn syllable_row(&self, word: &str) -> Vec<i64> {
        let mut row: Vec<i64> = word
            .chars()
            .map(syllable_index)
            .take(self.shape.max_syll_num)
            .collect();
        row.resize(self.shape.max_syll_num, PAD);
        row
    }
}

impl TextEncoder for HangulEncoder {
    fn shape(&self) -> GridShape {
        self.shape
    }

    fn encode(&self, text: &str) -> EncodedText {
        let s       = &self.shape;
        let cleaned = clean(text);
        let words: Vec<&str> = cleaned.split(' ').filter(|w| !w.is_empty()).take(s.max_word_num).collect();

        let mut encoded = EncodedText {
            words: Vec::with_capacity(s.max_word_num * s.word_dim),
            chars: Vec::with_capacity(s.max_word_num * s.max_char_num),
            sylls: Vec::with_capacity(s.max_word_num * s.max_syll_num),
        };

        for word in &words {
            encoded.words.extend(self.word_vector(word));
            encoded.chars.extend(self.char_row(word));
            encoded.sylls.extend(self.syllable_row(word));
        }

        // Pad missing word positions with zeros
        encoded.words.resize(s.max_word_num * s.word_dim, 0.0);
        encoded.chars.resize(s.max_word_num * s.max_char_num, PAD);
        encoded.sylls.resize(s.max_word_num * s.max_syll_num, PAD);
        encoded
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> HangulEncoder {
        HangulEncoder::new(GridShape { max_word_num: 3, max_char_num: 4, max_syll_num: 2, word_dim: 5 })
    }

    #[test]
    fn test_clean_collapses_and_trims() {
        assert_eq!(clean("  좋은\t\t영화\u{200B}였다  "), "좋은 영화 였다");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_decompose_with_and_without_final() {
        assert_eq!(decompose('가'), Some(vec!['ㄱ', 'ㅏ']));
        assert_eq!(decompose('영'), Some(vec!['ㅇ', 'ㅕ', 'ㅇ']));
        assert_eq!(decompose('힣'), Some(vec!['ㅎ', 'ㅣ', 'ㅎ']));
        assert_eq!(decompose('a'), None);
    }

    #[test]
    fn test_indices_stay_inside_tables() {
        for c in ['a', '~', ' ', 'ㄱ', 'ㅣ', '가', '힣', '😀', '中'] {
            assert!((0..CHARACTER_SIZE as i64).contains(&char_index(c)));
            assert!((0..SYLLABLE_SIZE as i64).contains(&syllable_index(c)));
        }
        assert_eq!(syllable_index('가'), 1);
        assert_eq!(syllable_index('힣'), 11172);
        assert_eq!(syllable_index('a'), 0);
        assert_eq!(char_index('😀'), UNKNOWN_CHAR);
    }

    #[test]
    fn test_encode_pads_and_truncates() {
        let enc = encoder();
        let out = enc.encode("영화 최고");
        assert!(out.matches(&enc.shape()));

        // "영화" → ㅇ ㅕ ㅇ ㅎ truncated to 4 chars
        let first_word = &out.chars[0..4];
        assert_eq!(first_word, &[char_index('ㅇ'), char_index('ㅕ'), char_index('ㅇ'), char_index('ㅎ')]);

        // Third word slot is padding everywhere
        assert!(out.chars[8..12].iter().all(|&c| c == 0));
        assert!(out.sylls[4..6].iter().all(|&s| s == 0));
        assert!(out.words[10..15].iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_encode_drops_words_beyond_max() {
        let enc = encoder();
        let out = enc.encode("a b c d e");
        assert!(out.matches(&enc.shape()));
        assert_eq!(out.chars[8], char_index('c'));
    }

    #[test]
    fn test_word_vectors_are_deterministic() {
        let enc = encoder();
        let a = enc.encode("재밌다");
        let b = enc.encode("  재밌다 ");
        assert_eq!(a, b);
        assert!(a.words[0..5].iter().all(|v| (-0.5..0.5).contains(v)));
        assert_ne!(enc.encode("별로").words, a.words);
    }
}
