// ============================================================
// Layer 5 — Classification Pipeline Artifact
// ============================================================
// The fitted unit used for every prediction:
//
//   vectorizer  — vocabulary + IDF fixed at training time
//   classes     — label strings, ascending, index = score column
//   weights     — exported linear layer (coef + intercept)
//   variant     — which loss trained it (capabilities follow)
//
// Once built it is never mutated; retraining produces a new
// pipeline. All prediction methods take &self and touch no
// shared state, so one Arc<ClassificationPipeline> can serve
// any number of callers.

use serde::{Deserialize, Serialize};

use crate::data::dataset::SparseVector;
use crate::domain::comment::ClassProbabilities;
use crate::domain::error::{CapabilityUnavailable, ClassifierError};
use crate::domain::variant::ModelVariant;
use crate::ml::vectorizer::TfidfVectorizer;

/// Exported linear layer. `coef` is row-major [num_features][num_classes].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearWeights {
    pub num_features: usize,
    pub num_classes:  usize,
    pub coef:         Vec<f32>,
    pub intercept:    Vec<f32>,
}

impl LinearWeights {
    /// scores = xᵀ·coef + intercept
    pub fn decision(&self, x: &SparseVector) -> Vec<f32> {
        let mut scores = self.intercept.clone();
        for (j, value) in x.iter() {
            let row = &self.coef[j * self.num_classes..(j + 1) * self.num_classes];
            for (score, w) in scores.iter_mut().zip(row) {
                *score += value * w;
            }
        }
        scores
    }

    pub fn is_consistent(&self) -> bool {
        self.coef.len() == self.num_features * self.num_classes
            && self.intercept.len() == self.num_classes
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationPipeline {
    variant:    ModelVariant,
    vectorizer: TfidfVectorizer,
    classes:    Vec<String>,
    weights:    LinearWeights,
}

impl ClassificationPipeline {
    pub fn new(
        variant:    ModelVariant,
        vectorizer: TfidfVectorizer,
        classes:    Vec<String>,
        weights:    LinearWeights,
    ) -> Self {
        Self { variant, vectorizer, classes, weights }
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn supports_probabilities(&self) -> bool {
        self.variant.supports_probabilities()
    }

    /// Raw per-class scores, in `classes()` order.
    pub fn decision_function(&self, text: &str) -> Vec<f32> {
        self.weights.decision(&self.vectorizer.transform(text))
    }

    /// Predicted label. Ties go to the lowest class index.
    pub fn predict(&self, text: &str) -> &str {
        let scores = self.decision_function(text);
        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = i;
            }
        }
        &self.classes[best]
    }

    /// Posterior class distribution (softmax of the scores).
    ///
    /// Fails with `CapabilityUnavailable` for variants without
    /// probability support, and with `Inference` if the numbers
    /// come out non-finite.
    pub fn predict_proba(&self, text: &str) -> Result<ClassProbabilities, ClassifierError> {
        if !self.supports_probabilities() {
            return Err(CapabilityUnavailable {
                capability: "class probabilities",
                variant:    self.variant.name(),
            }
            .into());
        }

        let scores = self.decision_function(text);
        let max    = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f32 = exps.iter().sum();

        if !total.is_finite() || total <= 0.0 {
            return Err(ClassifierError::Inference(format!(
                "softmax normaliser is {total} for {} scores",
                scores.len()
            )));
        }

        let pairs = self
            .classes
            .iter()
            .cloned()
            .zip(exps.into_iter().map(|e| e / total))
            .collect();
        Ok(ClassProbabilities::from_unsorted(pairs))
    }

    /// Structural check used when an artifact is loaded.
    pub fn consistency_error(&self) -> Option<String> {
        if !self.vectorizer.is_consistent() {
            return Some("vectorizer vocabulary and IDF table differ in size".into());
        }
        if !self.weights.is_consistent() {
            return Some("weight matrix does not match its declared shape".into());
        }
        if self.weights.num_features != self.vectorizer.vocabulary_size() {
            return Some(format!(
                "classifier expects {} features but vectorizer produces {}",
                self.weights.num_features,
                self.vectorizer.vocabulary_size()
            ));
        }
        if self.weights.num_classes != self.classes.len() || self.classes.len() < 2 {
            return Some(format!(
                "classifier has {} score columns for {} classes",
                self.weights.num_classes,
                self.classes.len()
            ));
        }
        None
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ml::vectorizer::VectorizerConfig;

    /// Hand-built pipeline: "good" → praise, "bad" → hate_abuse.
    pub(crate) fn toy_pipeline(variant: ModelVariant) -> ClassificationPipeline {
        let vectorizer = TfidfVectorizer::fit(
            VectorizerConfig { max_ngram: 1, ..Default::default() },
            &["good", "bad"],
        )
        .unwrap();
        let bad  = vectorizer.index_of("bad").unwrap() as usize;
        let good = vectorizer.index_of("good").unwrap() as usize;

        // classes: [hate_abuse, praise]
        let mut coef = vec![0.0; 4];
        coef[bad * 2]      = 2.0;
        coef[good * 2 + 1] = 2.0;

        ClassificationPipeline::new(
            variant,
            vectorizer,
            vec!["hate_abuse".into(), "praise".into()],
            LinearWeights { num_features: 2, num_classes: 2, coef, intercept: vec![0.0, 0.0] },
        )
    }

    #[test]
    fn test_predicts_by_highest_score() {
        let p = toy_pipeline(ModelVariant::Logistic);
        assert_eq!(p.predict("so good"), "praise");
        assert_eq!(p.predict("really bad"), "hate_abuse");
    }

    #[test]
    fn test_empty_text_uses_intercept_and_lowest_index_on_tie() {
        let p = toy_pipeline(ModelVariant::Svm);
        assert_eq!(p.predict(""), "hate_abuse");
    }

    #[test]
    fn test_probabilities_sum_to_one_and_are_sorted() {
        let p     = toy_pipeline(ModelVariant::Logistic);
        let probs = p.predict_proba("good").unwrap();
        let total: f32 = probs.entries().iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert_eq!(probs.entries()[0].0, "praise");
    }

    #[test]
    fn test_svm_has_no_probabilities() {
        let p   = toy_pipeline(ModelVariant::Svm);
        let err = p.predict_proba("good").unwrap_err();
        assert!(err.is_capability_unavailable());
    }

    #[test]
    fn test_non_finite_scores_surface_as_inference_error() {
        let mut p = toy_pipeline(ModelVariant::Logistic);
        p.weights.intercept = vec![f32::NAN, 0.0];
        let err = p.predict_proba("good").unwrap_err();
        assert!(matches!(err, ClassifierError::Inference(_)));
    }

    #[test]
    fn test_consistency() {
        let mut p = toy_pipeline(ModelVariant::Svm);
        assert!(p.consistency_error().is_none());
        p.weights.num_features = 3;
        assert!(p.consistency_error().is_some());
    }
}
