// ============================================================
// Layer 3 — Model Variants
// ============================================================
// The two classifier variants sharing one pipeline contract.
//
//   Logistic — multinomial logistic regression (probabilities)
//   Svm      — one-vs-rest linear SVM (hard decision only)

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelVariant {
    Logistic,
    Svm,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 2] = [ModelVariant::Logistic, ModelVariant::Svm];

    pub fn name(self) -> &'static str {
        match self {
            ModelVariant::Logistic => "logistic",
            ModelVariant::Svm      => "svm",
        }
    }

    /// Whether the variant can report a posterior class distribution.
    pub fn supports_probabilities(self) -> bool {
        matches!(self, ModelVariant::Logistic)
    }

    /// File name the artifact is persisted under.
    pub fn artifact_file_name(self) -> String {
        format!("{}_classifier.bin", self.name())
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_logistic_has_probabilities() {
        assert!(ModelVariant::Logistic.supports_probabilities());
        assert!(!ModelVariant::Svm.supports_probabilities());
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(ModelVariant::Logistic.artifact_file_name(), "logistic_classifier.bin");
        assert_eq!(ModelVariant::Svm.artifact_file_name(), "svm_classifier.bin");
    }
}
