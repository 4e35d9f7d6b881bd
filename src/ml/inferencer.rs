// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Classifies one comment against a pipeline handed in by the
// caller, then attaches the reply for the predicted label.
//
//   classify()                 label + reply, never fails
//   classify_with_confidence() label + reply + probabilities
//                              when the variant supports them
//
// A variant without probability support is not an error: the
// result simply carries `probabilities: None`. Any other
// failure while computing probabilities is returned.

use crate::domain::comment::ClassificationResult;
use crate::domain::error::ClassifierError;
use crate::domain::traits::ReplySource;
use crate::ml::pipeline::ClassificationPipeline;

/// Predict a label for `text` and attach its reply.
pub fn classify<R: ReplySource + ?Sized>(
    text:     &str,
    pipeline: &ClassificationPipeline,
    replies:  &R,
) -> ClassificationResult {
    let label = pipeline.predict(text).to_string();
    let reply = replies.reply_for(&label);
    ClassificationResult {
        text: text.to_string(),
        label,
        reply,
        probabilities: None,
    }
}

/// Like [`classify`], also requesting per-class probabilities.
pub fn classify_with_confidence<R: ReplySource + ?Sized>(
    text:     &str,
    pipeline: &ClassificationPipeline,
    replies:  &R,
) -> Result<ClassificationResult, ClassifierError> {
    let mut result = classify(text, pipeline, replies);

    result.probabilities = match pipeline.predict_proba(text) {
        Ok(probs) => Some(probs),
        Err(e) if e.is_capability_unavailable() => {
            tracing::debug!("{e}; returning label only");
            None
        }
        Err(e) => return Err(e),
    };

    Ok(result)
}
