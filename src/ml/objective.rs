// ============================================================
// Layer 5 — Objective: loss, decision rule, metrics
// ============================================================
//   scores  [batch, 10]   raw ReLU outputs, not probabilities
//   target  [batch, 10]   one-hot rating
//
//   loss      = mean((target - scores)²) over batch and classes
//   decision  = argmax(scores) + 1       ties → lowest index
//   accuracy  = mean(decision == rating)
//   mse       = mean((rating - decision)²)  integer-valued, for humans
//
// The target index for a rating is an open question: the
// original program hot-encodes the rating value itself (so 10
// has no slot), while the decision rule is zero-based. Both
// encodings are available through LabelEncoding.

use anyhow::{anyhow, Result};
use burn::{
    nn::loss::{MseLoss, Reduction},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::domain::review::RATING_CLASSES;

/// How a 1..=10 rating maps onto the 10 target slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelEncoding {
    /// Slot = rating. Rating 10 falls outside and encodes as all zeros.
    #[default]
    Raw,
    /// Slot = rating - 1, consistent with the decision rule.
    ZeroBased,
}

/// One-hot target row for `rating`.
pub fn one_hot(rating: u8, encoding: LabelEncoding) -> [f32; RATING_CLASSES] {
    let mut row = [0.0; RATING_CLASSES];
    let slot = match encoding {
        LabelEncoding::Raw       => rating as usize,
        LabelEncoding::ZeroBased => (rating as usize).wrapping_sub(1),
    };
    if let Some(v) = row.get_mut(slot) {
        *v = 1.0;
    }
    row
}

/// Stacked one-hot targets: [ratings.len(), 10].
pub fn one_hot_targets<B: Backend>(
    ratings:  &[u8],
    encoding: LabelEncoding,
    device:   &B::Device,
) -> Tensor<B, 2> {
    let flat: Vec<f32> = ratings.iter().flat_map(|&r| one_hot(r, encoding)).collect();
    Tensor::<B, 2>::from_floats(TensorData::new(flat, [ratings.len(), RATING_CLASSES]), device)
}

/// Mean squared error over batch and classes.
pub fn mse_loss<B: Backend>(scores: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    MseLoss::new().forward(scores, targets, Reduction::Mean)
}

/// argmax + 1 over one row of scores. Ties and NaNs resolve to the
/// lowest index, so the result is always in 1..=10.
pub fn decode_rating(scores: &[f32]) -> u8 {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    best as u8 + 1
}

/// Decode a whole score tensor on the host.
pub fn decode_ratings<B: Backend>(scores: Tensor<B, 2>) -> Result<Vec<u8>> {
    let values = scores
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read scores back from device: {e:?}"))?;
    Ok(values.chunks(RATING_CLASSES).map(decode_rating).collect())
}

/// Fraction of predictions equal to their rating.
pub fn accuracy(predicted: &[u8], ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let hits = predicted.iter().zip(ratings).filter(|(p, r)| p == r).count();
    hits as f64 / ratings.len() as f64
}

/// Mean squared difference between predicted and true ratings.
pub fn rating_mse(predicted: &[u8], ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = predicted
        .iter()
        .zip(ratings)
        .map(|(&p, &r)| (p as f64 - r as f64).powi(2))
        .sum();
    sum / ratings.len() as f64
}

/// Loss and monitoring metrics for one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchMetrics {
    pub loss:     f64,
    pub accuracy: f64,
    pub mse:      f64,
}

impl BatchMetrics {
    pub fn from_predictions(loss: f64, predicted: &[u8], ratings: &[u8]) -> Self {
        Self {
            loss,
            accuracy: accuracy(predicted, ratings),
            mse:      rating_mse(predicted, ratings),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_one_hot_zero_based_seven() {
        assert_eq!(one_hot(7, LabelEncoding::ZeroBased), [0., 0., 0., 0., 0., 0., 1., 0., 0., 0.]);
    }

    #[test]
    fn test_one_hot_raw_uses_rating_as_index() {
        assert_eq!(one_hot(7, LabelEncoding::Raw), [0., 0., 0., 0., 0., 0., 0., 1., 0., 0.]);
        assert_eq!(one_hot(1, LabelEncoding::Raw)[1], 1.0);
        // 10 has no slot under the raw encoding
        assert_eq!(one_hot(10, LabelEncoding::Raw), [0.0; RATING_CLASSES]);
    }

    #[test]
    fn test_decode_picks_argmax_plus_one() {
        let scores = [0.1, 5.2, 0.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(decode_rating(&scores), 2);
    }

    #[test]
    fn test_decode_ties_go_to_lowest_index() {
        assert_eq!(decode_rating(&[0.0; 10]), 1);
        assert_eq!(decode_rating(&[0., 0., 3., 0., 0., 3., 0., 0., 0., 0.]), 3);
        assert_eq!(decode_rating(&[f32::NAN, 0., 0., 0., 0., 0., 0., 0., 0., 0.]), 1);
    }

    #[test]
    fn test_decode_stays_in_range_for_extreme_scores() {
        let mut scores = [-1e30f32; 10];
        scores[9] = 1e30;
        assert_eq!(decode_rating(&scores), 10);
        for i in 0..10 {
            let mut s = [0.0f32; 10];
            s[i] = f32::MAX;
            let r = decode_rating(&s);
            assert!((1..=10).contains(&r));
        }
    }

    #[test]
    fn test_accuracy_counts_exact_matches() {
        assert_eq!(accuracy(&[3, 4, 5, 6], &[3, 4, 1, 1]), 0.5);
        assert_eq!(accuracy(&[], &[]), 0.0);
        for p in 1..=10u8 {
            for y in 1..=10u8 {
                assert_eq!(accuracy(&[p], &[y]), if p == y { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_rating_mse() {
        assert_eq!(rating_mse(&[1, 10], &[3, 10]), 2.0);
    }

    #[test]
    fn test_mse_loss_against_one_hot() {
        let device  = Default::default();
        let scores  = Tensor::<NdArray, 2>::from_floats(
            TensorData::new(vec![1.0f32; 20], [2, RATING_CLASSES]), &device,
        );
        let targets = one_hot_targets::<NdArray>(&[2, 5], LabelEncoding::ZeroBased, &device);
        // Each row: nine (1-0)² and one (1-1)² → 9/10
        let loss: f64 = mse_loss(scores, targets).into_scalar().elem::<f64>();
        assert!((loss - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_decode_ratings_from_tensor() {
        let mut flat = vec![0.0f32; 20];
        flat[4]  = 1.0;
        flat[19] = 2.0;
        let scores = Tensor::<NdArray, 2>::from_floats(TensorData::new(flat, [2, 10]), &Default::default());
        assert_eq!(decode_ratings(scores).unwrap(), vec![5, 10]);
    }
}
