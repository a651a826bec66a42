//! Analysis contract shared by the engine and the presentation layer.
//!
//! An [`AnalysisResult`] is produced once by an engine and then owned by the
//! presentation state. Derived display values (percentages, classification)
//! are pure functions of the result and are never stored.

use super::error::{DetectorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Scores strictly above this value classify as manipulated.
pub const MANIPULATION_THRESHOLD: f64 = 0.5;

/// Returns `true` when `score` classifies as likely manipulated.
///
/// The comparison is strict: a score of exactly `0.5` is authentic.
///
/// ```
/// use deepfake_detector::domain::is_manipulated;
///
/// assert!(is_manipulated(0.51));
/// assert!(!is_manipulated(0.5));
/// ```
#[must_use]
pub fn is_manipulated(score: f64) -> bool {
    score > MANIPULATION_THRESHOLD
}

/// Converts a unit value to a whole percentage in `0..=100`.
///
/// Rounds half away from zero and clamps out-of-range input.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Overall classification of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Score above the threshold.
    Manipulated,
    /// Score at or below the threshold.
    Authentic,
}

/// One heuristic signal contributing to an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    /// Feature name, unique within a result.
    pub name: String,
    /// Signal strength in `[0, 1]`.
    pub value: f64,
    /// Human-readable explanation of what the feature measures.
    pub description: String,
}

impl FeatureScore {
    /// Creates a feature score.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            description: description.into(),
        }
    }

    /// Value as a whole percentage.
    #[must_use]
    pub fn value_percent(&self) -> u8 {
        to_percent(self.value)
    }

    /// Whether the feature is flagged high (`value > 0.5`).
    #[must_use]
    pub fn is_high(&self) -> bool {
        self.value > MANIPULATION_THRESHOLD
    }
}

/// Outcome of analysing one image.
///
/// `score` is the overall manipulation likelihood; `confidence` is the
/// engine's certainty in its own output and is independent of `score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Manipulation likelihood in `[0, 1]`.
    pub score: f64,
    /// Engine certainty in `[0, 1]`.
    pub confidence: f64,
    /// Ordered, non-empty feature breakdown.
    pub features: Vec<FeatureScore>,
}

impl AnalysisResult {
    /// Builds a result and checks its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::AnalysisFailure`] if any invariant is violated,
    /// see [`AnalysisResult::validate`].
    pub fn new(score: f64, confidence: f64, features: Vec<FeatureScore>) -> Result<Self> {
        let result = Self {
            score,
            confidence,
            features,
        };
        result.validate()?;
        Ok(result)
    }

    /// Checks that scores lie in `[0, 1]`, features are present and names
    /// are unique.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::AnalysisFailure`] describing the first
    /// violation found.
    pub fn validate(&self) -> Result<()> {
        check_unit("score", self.score)?;
        check_unit("confidence", self.confidence)?;

        if self.features.is_empty() {
            return Err(DetectorError::AnalysisFailure(
                "result has no features".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.features.len());
        for feature in &self.features {
            check_unit(&feature.name, feature.value)?;
            if !seen.insert(feature.name.as_str()) {
                return Err(DetectorError::AnalysisFailure(format!(
                    "duplicate feature {:?}",
                    feature.name
                )));
            }
        }

        Ok(())
    }

    /// Whether the result classifies as likely manipulated.
    #[must_use]
    pub fn is_manipulated(&self) -> bool {
        is_manipulated(self.score)
    }

    /// Classification of the result.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.is_manipulated() {
            Verdict::Manipulated
        } else {
            Verdict::Authentic
        }
    }

    /// Score as a whole percentage.
    #[must_use]
    pub fn score_percent(&self) -> u8 {
        to_percent(self.score)
    }

    /// Confidence as a whole percentage.
    #[must_use]
    pub fn confidence_percent(&self) -> u8 {
        to_percent(self.confidence)
    }
}

fn check_unit(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DetectorError::AnalysisFailure(format!(
            "{field} must be within [0, 1], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feature(name: &str, value: f64) -> FeatureScore {
        FeatureScore::new(name, value, "test feature")
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!is_manipulated(0.5));
        assert!(is_manipulated(0.500_001));
        assert!(!is_manipulated(0.0));
        assert!(is_manipulated(1.0));
    }

    #[test]
    fn percentages_round_half_up() {
        assert_eq!(to_percent(0.82), 82);
        assert_eq!(to_percent(0.915), 92);
        assert_eq!(to_percent(0.004), 0);
        assert_eq!(to_percent(0.005), 1);
        assert_eq!(to_percent(1.0), 100);
    }

    #[test]
    fn percentages_clamp_garbage() {
        assert_eq!(to_percent(f64::NAN), 0);
        assert_eq!(to_percent(-0.3), 0);
        assert_eq!(to_percent(7.0), 100);
    }

    #[test]
    fn validate_rejects_out_of_range_and_empty() {
        assert!(AnalysisResult::new(1.2, 0.9, vec![feature("a", 0.1)]).is_err());
        assert!(AnalysisResult::new(0.2, f64::NAN, vec![feature("a", 0.1)]).is_err());
        assert!(AnalysisResult::new(0.2, 0.9, vec![feature("a", -0.1)]).is_err());
        assert!(AnalysisResult::new(0.2, 0.9, vec![]).is_err());
    }

    #[test]
    fn validate_rejects_duplicate_feature_names() {
        let err = AnalysisResult::new(0.2, 0.9, vec![feature("a", 0.1), feature("a", 0.3)])
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn high_flag_follows_threshold() {
        assert!(feature("x", 0.51).is_high());
        assert!(!feature("x", 0.5).is_high());
    }

    #[test]
    fn verdict_matches_classification() {
        let fake = AnalysisResult::new(0.82, 0.91, vec![feature("a", 0.7)]).unwrap();
        let real = AnalysisResult::new(0.5, 0.91, vec![feature("a", 0.2)]).unwrap();
        assert_eq!(fake.verdict(), Verdict::Manipulated);
        assert_eq!(real.verdict(), Verdict::Authentic);
    }

    proptest! {
        #[test]
        fn classification_is_strictly_above_half(score in 0.0f64..=1.0) {
            prop_assert_eq!(is_manipulated(score), score > 0.5);
        }

        #[test]
        fn percents_stay_in_range(score in 0.0f64..=1.0, confidence in 0.0f64..=1.0, value in 0.0f64..=1.0) {
            let result = AnalysisResult::new(score, confidence, vec![feature("f", value)]).unwrap();
            prop_assert!(result.score_percent() <= 100);
            prop_assert!(result.confidence_percent() <= 100);
            prop_assert!(result.features[0].value_percent() <= 100);
            prop_assert_eq!(u32::from(result.score_percent()), (score * 100.0).round() as u32);
        }
    }
}
