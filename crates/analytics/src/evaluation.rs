//! Evaluation of the lead scoring model against observed conversions.
//!
//! Scores are produced upstream; this module only measures them: a binary
//! confusion matrix at the model's own decision threshold, the ROC curve over
//! every distinct score, and the area under it.

use bizdash_core::{AnalyticsError, Result};
use bizdash_data::{FeatureImportanceRecord, LeadScoreRecord};
use serde::Serialize;

/// Binary confusion matrix, positive class = converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
    pub true_positive: u64,
}

impl ConfusionMatrix {
    /// Counts outcomes of paired actual/predicted labels.
    ///
    /// # Errors
    /// Returns `LengthMismatch` if the slices differ in length.
    pub fn from_labels(actual: &[bool], predicted: &[bool]) -> Result<Self> {
        ensure_same_len("actual", actual.len(), "predicted", predicted.len())?;

        Ok(Self::tally(actual.iter().copied().zip(predicted.iter().copied())))
    }

    #[must_use]
    pub fn from_records(records: &[LeadScoreRecord]) -> Self {
        Self::tally(
            records
                .iter()
                .map(|record| (record.actual_converted, record.predicted_class)),
        )
    }

    fn tally(pairs: impl Iterator<Item = (bool, bool)>) -> Self {
        let mut matrix = Self::default();
        for pair in pairs {
            match pair {
                (false, false) => matrix.true_negative += 1,
                (false, true) => matrix.false_positive += 1,
                (true, false) => matrix.false_negative += 1,
                (true, true) => matrix.true_positive += 1,
            }
        }
        matrix
    }

    /// Rows are actual classes, columns predicted: `[[tn, fp], [fn, tp]]`.
    #[must_use]
    pub fn as_matrix(&self) -> [[u64; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    #[must_use]
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

/// One operating point of the ROC curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RocPoint {
    pub false_positive_rate: f64,
    pub true_positive_rate: f64,
    /// Scores `>= threshold` are classified positive; the first point uses +inf
    pub threshold: f64,
}

/// ROC curve with one point per distinct score, highest score first.
///
/// The curve starts at (0, 0) with an infinite threshold and ends at (1, 1).
///
/// # Errors
/// - `LengthMismatch` if the slices differ in length
/// - `UndefinedMetric` unless both classes are present
pub fn roc_curve(actual: &[bool], scores: &[f64]) -> Result<Vec<RocPoint>> {
    ensure_same_len("actual", actual.len(), "scores", scores.len())?;

    let positives = actual.iter().filter(|&&a| a).count();
    let negatives = actual.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(AnalyticsError::UndefinedMetric {
            metric: "ROC curve",
            reason: format!(
                "needs both classes, got {positives} positive and {negatives} negative samples"
            ),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut points = vec![RocPoint {
        false_positive_rate: 0.0,
        true_positive_rate: 0.0,
        threshold: f64::INFINITY,
    }];
    let (mut tp, mut fp) = (0usize, 0usize);

    for (position, &index) in order.iter().enumerate() {
        if actual[index] {
            tp += 1;
        } else {
            fp += 1;
        }

        // Emit once per run of tied scores
        let next_differs = order
            .get(position + 1)
            .map_or(true, |&next| scores[next] != scores[index]);
        if next_differs {
            points.push(RocPoint {
                false_positive_rate: fp as f64 / negatives as f64,
                true_positive_rate: tp as f64 / positives as f64,
                threshold: scores[index],
            });
        }
    }

    Ok(points)
}

/// Area under a ROC curve by the trapezoidal rule.
#[must_use]
pub fn area_under_curve(points: &[RocPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| {
            let width = w[1].false_positive_rate - w[0].false_positive_rate;
            width * (w[0].true_positive_rate + w[1].true_positive_rate) / 2.0
        })
        .sum()
}

/// ROC AUC of `scores` against `actual`.
///
/// # Errors
/// See [`roc_curve`].
pub fn roc_auc(actual: &[bool], scores: &[f64]) -> Result<f64> {
    Ok(area_under_curve(&roc_curve(actual, scores)?))
}

/// Everything the model evaluation page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadEvaluation {
    pub confusion_matrix: ConfusionMatrix,
    pub roc_curve: Vec<RocPoint>,
    pub auc: f64,
}

impl LeadEvaluation {
    /// # Errors
    /// Returns `UndefinedMetric` unless both converted and unconverted leads are present.
    pub fn from_records(records: &[LeadScoreRecord]) -> Result<Self> {
        let actual: Vec<bool> = records.iter().map(|r| r.actual_converted).collect();
        let scores: Vec<f64> = records.iter().map(|r| r.predicted_probability).collect();
        let roc_curve = roc_curve(&actual, &scores)?;

        Ok(Self {
            confusion_matrix: ConfusionMatrix::from_records(records),
            auc: area_under_curve(&roc_curve),
            roc_curve,
        })
    }
}

/// Features ordered by importance, most important first.
#[must_use]
pub fn rank_features(features: &[FeatureImportanceRecord]) -> Vec<FeatureImportanceRecord> {
    let mut ranked = features.to_vec();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn ensure_same_len(
    left: &'static str,
    left_len: usize,
    right: &'static str,
    right_len: usize,
) -> Result<()> {
    if left_len == right_len {
        Ok(())
    } else {
        Err(AnalyticsError::LengthMismatch {
            left,
            left_len,
            right,
            right_len,
        })
    }
}
