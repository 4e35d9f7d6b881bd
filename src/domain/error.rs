// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Typed errors for the library layers (domain, data, ml, infra).
// The application and CLI layers wrap these in anyhow with
// extra context before they reach the user.
//
//   DataError             — bad or insufficient input data
//   ArtifactLoadError     — persisted pipeline cannot be used
//   CapabilityUnavailable — optional diagnostic not supported
//                           (absorbed by the inference service)
//
// Nothing here is retried: every operation is deterministic
// given its inputs.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed or insufficient input data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("input table is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("cannot read table '{path}': {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("no usable rows remain after dropping rows with missing text or label")]
    EmptyCorpus,

    #[error("need at least 2 distinct labels for a stratified split, found {found}")]
    TooFewLabels { found: usize },

    #[error("label '{label}' has {count} example(s); at least 2 are needed to stratify")]
    TooFewExamples { label: String, count: usize },

    #[error("no terms remain after pruning the vocabulary (min_df={min_df})")]
    EmptyVocabulary { min_df: usize },
}

/// A persisted pipeline that cannot be loaded.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact '{0}' does not exist; run `train` first")]
    Missing(PathBuf),

    #[error("artifact '{path}' is unreadable: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("artifact '{path}' is incompatible: {reason}")]
    Incompatible { path: PathBuf, reason: String },
}

/// The loaded variant cannot provide the requested diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{capability} not supported by the {variant} variant")]
pub struct CapabilityUnavailable {
    pub capability: &'static str,
    pub variant:    &'static str,
}

/// Top-level error for classifier operations.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    CapabilityUnavailable(#[from] CapabilityUnavailable),

    #[error("training failed: {0}")]
    Training(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl ClassifierError {
    /// True for conditions a caller may degrade around instead of aborting.
    pub fn is_capability_unavailable(&self) -> bool {
        matches!(self, ClassifierError::CapabilityUnavailable(_))
    }
}
