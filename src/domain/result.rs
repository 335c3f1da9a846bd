//! Probability distributions and the interpreted classification result.

use serde::Serialize;

use super::labels::{ClassLabel, NUM_CLASSES};

/// Probability distribution over the diagnostic classes, in
/// model-output-index order.
///
/// The model ends in a softmax, so values are taken as non-negative and
/// summing to ~1.0. The pipeline never renormalizes: feeding it raw
/// logits produces undefined confidence values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Probabilities([f32; NUM_CLASSES]);

impl Probabilities {
    /// Wraps a raw probability triple.
    pub fn new(values: [f32; NUM_CLASSES]) -> Self {
        Self(values)
    }

    /// The probability assigned to a single class.
    pub fn score(&self, label: ClassLabel) -> f32 {
        self.0[label.index()]
    }

    /// The distribution as a fixed-size array.
    pub fn as_array(&self) -> &[f32; NUM_CLASSES] {
        &self.0
    }

    /// Iterates over `(label, probability)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassLabel, f32)> + '_ {
        ClassLabel::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Index of the maximum probability.
    ///
    /// Ties resolve to the first index encountered in ascending order,
    /// matching standard argmax semantics.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (index, &value) in self.0.iter().enumerate().skip(1) {
            if value > self.0[best] {
                best = index;
            }
        }
        best
    }
}

impl From<[f32; NUM_CLASSES]> for Probabilities {
    fn from(values: [f32; NUM_CLASSES]) -> Self {
        Self::new(values)
    }
}

/// The interpreted outcome of one classification call.
///
/// Created fresh per call and immutable afterwards; serializable for
/// whatever rendering layer sits downstream.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    /// Predicted diagnostic class (argmax of the distribution).
    pub label: ClassLabel,
    /// Confidence in percent: `100 × max(probabilities)`.
    pub confidence: f32,
    /// The full class probability distribution.
    pub probabilities: Probabilities,
    /// Follow-up recommendation for the predicted class.
    pub recommendation: &'static str,
}

impl ClassificationResult {
    /// Interprets a probability distribution into a result.
    ///
    /// Deterministic: identical distributions yield identical results.
    pub fn from_probabilities(probabilities: Probabilities) -> Self {
        let label = ClassLabel::ALL[probabilities.argmax()];
        Self {
            label,
            confidence: probabilities.score(label) * 100.0,
            probabilities,
            recommendation: label.recommendation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_tie_resolves_to_first_index() {
        let probabilities = Probabilities::new([0.4, 0.4, 0.2]);
        let result = ClassificationResult::from_probabilities(probabilities);
        assert_eq!(result.label, ClassLabel::Benign);
    }

    #[test]
    fn test_confidence_is_max_probability_in_percent() {
        let probabilities = Probabilities::new([0.1, 0.86, 0.04]);
        let result = ClassificationResult::from_probabilities(probabilities);
        assert_eq!(result.label, ClassLabel::Malignant);
        assert_eq!(result.confidence, 86.0);
        assert_eq!(result.recommendation, ClassLabel::Malignant.recommendation());
    }

    #[test]
    fn test_interpretation_is_deterministic() {
        let probabilities = Probabilities::new([0.2, 0.3, 0.5]);
        let first = ClassificationResult::from_probabilities(probabilities);
        let second = ClassificationResult::from_probabilities(probabilities);
        assert_eq!(first.label, second.label);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.probabilities, second.probabilities);
        assert_eq!(first.recommendation, second.recommendation);
    }

    #[test]
    fn test_distribution_is_preserved_unmodified() {
        let values = [0.05, 0.05, 0.9];
        let result = ClassificationResult::from_probabilities(values.into());
        assert_eq!(result.probabilities.as_array(), &values);

        let pairs: Vec<_> = result.probabilities.iter().collect();
        assert_eq!(pairs[0], (ClassLabel::Benign, 0.05));
        assert_eq!(pairs[2], (ClassLabel::Normal, 0.9));
    }

    #[test]
    fn test_result_serializes_to_json() {
        let result = ClassificationResult::from_probabilities(Probabilities::new([0.1, 0.2, 0.7]));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["label"], "normal");
        assert_eq!(json["probabilities"].as_array().unwrap().len(), 3);
        assert!(json["recommendation"].as_str().unwrap().len() > 0);
    }
}
