// ============================================================
// Layer 4 — Movie Review Dataset
// ============================================================
// Holds every encoded review in memory. Implements Burn's
// Dataset trait so items can be fetched by index, and is
// reshuffled in place at the start of each epoch.
//
// Reference: Burn Book §4 (Datasets)

use burn::data::dataset::Dataset;
use rand::seq::SliceRandom;

use crate::domain::review::{RawReview, Review};
use crate::domain::traits::TextEncoder;

/// Encoded, labelled movie reviews held in memory.
pub struct MovieReviewDataset {
    reviews: Vec<Review>,
}

impl MovieReviewDataset {
    /// Encode every raw review with `encoder`.
    pub fn new(raw: Vec<RawReview>, encoder: &dyn TextEncoder) -> Self {
        let reviews = raw
            .into_iter()
            .map(|r| Review { encoded: encoder.encode(&r.text), text: r.text, rating: r.rating })
            .collect();
        Self { reviews }
    }

    /// Randomise the order in place. No fixed seed.
    pub fn shuffle_dataset(&mut self) {
        self.reviews.shuffle(&mut rand::thread_rng());
    }

    pub fn as_slice(&self) -> &[Review] { &self.reviews }
}

impl Dataset<Review> for MovieReviewDataset {
    fn get(&self, index: usize) -> Option<Review> {
        self.reviews.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.reviews.len()
    }
}
