// ============================================================
// Layer 5 — ML Layer
// ============================================================
// Feature extraction, the linear classifier, training, the
// fitted pipeline artifact and inference.
//
// burn is only used while fitting (model.rs, trainer.rs). The
// trained weights are exported into ClassificationPipeline,
// so inference is plain arithmetic on sparse vectors.
//
//   vectorizer.rs — TF-IDF over unigrams + bigrams
//   model.rs      — burn linear layer + the two loss functions
//   trainer.rs    — split, fit, evaluate, bundle
//   pipeline.rs   — the immutable fitted artifact
//   inferencer.rs — classify(text, pipeline) → label + reply
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Label prediction with reply attachment
pub mod inferencer;

/// Linear classifier module
pub mod model;

/// Fitted vectorizer + classifier bundle
pub mod pipeline;

/// Training routine for both variants
pub mod trainer;

/// TF-IDF feature extraction
pub mod vectorizer;
