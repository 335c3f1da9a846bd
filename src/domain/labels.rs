//! Diagnostic class labels and their fixed recommendation table.
//!
//! The label-to-index mapping mirrors the class order the model was
//! trained with and is a contract, not something inferred at runtime.
//! The recommendation and severity tables live on the enum so that
//! adding a class without extending them is a compile error.

use serde::{Deserialize, Serialize};

/// Number of diagnostic classes the model predicts.
pub const NUM_CLASSES: usize = 3;

/// Diagnostic category for a breast ultrasound image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLabel {
    /// Benign lesion (model index 0).
    Benign,
    /// Malignant lesion (model index 1).
    Malignant,
    /// No lesion detected (model index 2).
    Normal,
}

impl ClassLabel {
    /// All labels in model-output-index order.
    pub const ALL: [ClassLabel; NUM_CLASSES] = [Self::Benign, Self::Malignant, Self::Normal];

    /// Maps a model output index to its label.
    ///
    /// Returns `None` for indices outside the trained class range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The model output index for this label.
    pub fn index(self) -> usize {
        match self {
            Self::Benign => 0,
            Self::Malignant => 1,
            Self::Normal => 2,
        }
    }

    /// Lowercase label name, matching the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            Self::Benign => "benign",
            Self::Malignant => "malignant",
            Self::Normal => "normal",
        }
    }

    /// The clinical follow-up recommendation for this diagnosis.
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Malignant => "Urgent oncology consultation required.",
            Self::Benign => "Regular surveillance recommended.",
            Self::Normal => "No immediate action necessary.",
        }
    }

    /// How urgently the recommendation should be framed downstream.
    pub fn severity(self) -> Severity {
        match self {
            Self::Malignant => Severity::Urgent,
            Self::Benign => Severity::Moderate,
            Self::Normal => Severity::Reassuring,
        }
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity framing for a diagnostic recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Immediate specialist follow-up.
    Urgent,
    /// Scheduled monitoring.
    Moderate,
    /// No action needed.
    Reassuring,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_mapping_is_bijective() {
        for (index, label) in ClassLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), index);
            assert_eq!(ClassLabel::from_index(index), Some(*label));
        }
        assert_eq!(ClassLabel::from_index(NUM_CLASSES), None);
    }

    #[test]
    fn test_every_label_has_a_specific_recommendation() {
        let mut seen = Vec::new();
        for label in ClassLabel::ALL {
            let recommendation = label.recommendation();
            assert!(!recommendation.is_empty());
            assert!(!seen.contains(&recommendation));
            seen.push(recommendation);
        }
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(ClassLabel::Malignant.severity(), Severity::Urgent);
        assert_eq!(ClassLabel::Benign.severity(), Severity::Moderate);
        assert_eq!(ClassLabel::Normal.severity(), Severity::Reassuring);
    }

    #[test]
    fn test_display_matches_serialized_form() {
        let json = serde_json::to_string(&ClassLabel::Malignant).unwrap();
        assert_eq!(json, format!("\"{}\"", ClassLabel::Malignant));
    }
}
