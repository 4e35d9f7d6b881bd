// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Seams between the layers:
//
//   CorpusSource      — anything that yields labelled examples
//   ReplySource       — anything that maps a label to a reply
//   CommentClassifier — anything that classifies one comment
//
// The application layer works against these, so a front end
// can be exercised with a stub classifier and the inference
// service can be handed a different reply table.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::comment::{ClassificationResult, TrainingExample};
use crate::domain::error::{ClassifierError, DataError};

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// A source of labelled training examples.
///
/// Implementations:
///   - CsvCorpusLoader → reads a CSV with `text` and `label` columns
pub trait CorpusSource {
    /// Load every usable example. Rows with missing text or
    /// label are dropped, not reported as errors.
    fn load_examples(&self) -> Result<Vec<TrainingExample>, DataError>;
}

// ─── ReplySource ──────────────────────────────────────────────────────────────
/// Maps a label to a human-readable reply. Must be total.
pub trait ReplySource {
    fn reply_for(&self, label: &str) -> String;
}

// ─── CommentClassifier ────────────────────────────────────────────────────────
/// Classifies a single comment into a label plus reply.
///
/// Implementations:
///   - ClassifyUseCase → a loaded pipeline and the reply templates
pub trait CommentClassifier {
    fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifierError>;
}
