// ============================================================
// Layer 4 — Review Batching
// ============================================================
// Two steps turn a list of reviews into model input:
//
//   1. batch_loader() slices the ordered list into contiguous
//      chunks of `batch_size`. Order is preserved, nothing is
//      dropped, and only the last chunk may be shorter:
//
//        2399 reviews, batch 800 → [800, 800, 799]
//
//      The returned iterator is lazy; calling batch_loader()
//      again restarts from the beginning.
//
//   2. ReviewBatcher (Burn's Batcher trait) stacks one chunk
//      into tensors with the batch as the leading dimension:
//
//        words  [batch, max_word_num, word_dim]      Float
//        chars  [batch, max_word_num, max_char_num]  Int
//        sylls  [batch, max_word_num, max_syll_num]  Int
//
//      Ratings stay on the host; the one-hot targets are built
//      from them by the objective.
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Slices)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::review::{EncodedText, GridShape, Review};

/// Split `items` into consecutive chunks of `batch_size`.
///
/// # Panics
/// Panics if `batch_size` is zero.
pub fn batch_loader<T>(items: &[T], batch_size: usize) -> std::slice::Chunks<'_, T> {
    assert!(batch_size > 0, "batch_size must be positive");
    items.chunks(batch_size)
}

/// Number of chunks `batch_loader` yields for `len` items.
pub fn batch_count(len: usize, batch_size: usize) -> usize {
    len.div_ceil(batch_size)
}

// ─── ReviewInput / ReviewBatch ────────────────────────────────────────────────
/// Model input for a batch of encoded reviews.
#[derive(Debug, Clone)]
pub struct ReviewInput<B: Backend> {
    pub words: Tensor<B, 3>,
    pub chars: Tensor<B, 3, Int>,
    pub sylls: Tensor<B, 3, Int>,
}

/// Model input plus the ratings it should predict.
#[derive(Debug, Clone)]
pub struct ReviewBatch<B: Backend> {
    pub input:   ReviewInput<B>,
    /// One rating per row, in batch order
    pub ratings: Vec<u8>,
}

// ─── ReviewBatcher ────────────────────────────────────────────────────────────
/// Holds the target device and grid shape so every batch is built
/// with the same dimensions on the same device.
#[derive(Clone, Debug)]
pub struct ReviewBatcher<B: Backend> {
    pub device: B::Device,
    pub shape:  GridShape,
}

impl<B: Backend> ReviewBatcher<B> {
    pub fn new(device: B::Device, shape: GridShape) -> Self {
        Self { device, shape }
    }

    fn stack(&self, items: &[&EncodedText]) -> ReviewInput<B> {
        let n = items.len();
        let s = &self.shape;

        let words: Vec<f32> = items.iter().flat_map(|e| e.words.iter().copied()).collect();
        let chars: Vec<i64> = items.iter().flat_map(|e| e.chars.iter().copied()).collect();
        let sylls: Vec<i64> = items.iter().flat_map(|e| e.sylls.iter().copied()).collect();

        let words = Tensor::<B, 3>::from_floats(
            TensorData::new(words, [n, s.max_word_num, s.word_dim]), &self.device,
        );
        let chars = Tensor::<B, 3, Int>::from_ints(
            TensorData::new(chars, [n, s.max_word_num, s.max_char_num]), &self.device,
        );
        let sylls = Tensor::<B, 3, Int>::from_ints(
            TensorData::new(sylls, [n, s.max_word_num, s.max_syll_num]), &self.device,
        );

        ReviewInput { words, chars, sylls }
    }
}

/// Labelled reviews → training / evaluation batch
impl<B: Backend> Batcher<Review, ReviewBatch<B>> for ReviewBatcher<B> {
    fn batch(&self, items: Vec<Review>) -> ReviewBatch<B> {
        let encoded: Vec<&EncodedText> = items.iter().map(|r| &r.encoded).collect();
        let input   = self.stack(&encoded);
        let ratings = items.iter().map(|r| r.rating).collect();

        ReviewBatch { input, ratings }
    }
}

/// Unlabelled encodings → inference input
impl<B: Backend> Batcher<EncodedText, ReviewInput<B>> for ReviewBatcher<B> {
    fn batch(&self, items: Vec<EncodedText>) -> ReviewInput<B> {
        let encoded: Vec<&EncodedText> = items.iter().collect();
        self.stack(&encoded)
    }
}
