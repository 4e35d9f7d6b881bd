// ============================================================
// Layer 3 — Comment Domain Types
// ============================================================
// Plain data carried between layers:
//
//   TrainingExample      — one labelled row of the corpus
//   ClassificationResult — what the inference service returns
//   ClassProbabilities   — optional per-class distribution
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// A single labelled comment from the training corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text:  String,
    pub label: String,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text:  text.into(),
            label: label.into(),
        }
    }

    /// A row is usable when its label is non-empty.
    /// Missing text is rejected earlier, by the loader.
    pub fn is_usable(&self) -> bool {
        !self.label.trim().is_empty()
    }
}

/// Per-class probabilities, sorted by probability descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities(Vec<(String, f32)>);

impl ClassProbabilities {
    /// Build from unsorted (label, probability) pairs.
    /// Equal probabilities are ordered by label.
    pub fn from_unsorted(mut pairs: Vec<(String, f32)>) -> Self {
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Self(pairs)
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[(String, f32)] {
        &self.0
    }

    /// The `n` most likely classes.
    pub fn top(&self, n: usize) -> &[(String, f32)] {
        &self.0[..n.min(self.0.len())]
    }
}

/// Output of classifying one comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub text:  String,
    pub label: String,
    pub reply: String,
    /// `None` when the variant cannot estimate probabilities
    /// or they were not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ClassProbabilities>,
}
