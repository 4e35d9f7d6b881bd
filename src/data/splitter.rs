// ============================================================
// Layer 4 — Stratified Train/Validation Splitter
// ============================================================
// Splits labelled examples into a training set and a held-out
// validation set while preserving each label's proportion in
// both sets.
//
// Per label (visited in ascending label order):
//   1. shuffle that label's examples
//   2. send round(count * val_fraction) of them to validation,
//      clamped so each side receives at least one example
//
// Both sides are shuffled afterwards so labels are interleaved.
// All shuffles draw from one StdRng seeded with a fixed value,
// so identical input + seed gives identical splits.
//
// A label with a single example cannot appear on both sides,
// and fewer than two labels leaves nothing to stratify; both
// are DataErrors.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use std::collections::BTreeMap;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::comment::TrainingExample;
use crate::domain::error::DataError;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of each label sent to validation by default.
pub const DEFAULT_VAL_FRACTION: f64 = 0.2;

/// Stratified split of `examples` into (train, validation).
pub fn stratified_split(
    examples:     Vec<TrainingExample>,
    val_fraction: f64,
    seed:         u64,
) -> Result<(Vec<TrainingExample>, Vec<TrainingExample>), DataError> {
    let mut by_label: BTreeMap<String, Vec<TrainingExample>> = BTreeMap::new();
    for example in examples {
        by_label.entry(example.label.clone()).or_default().push(example);
    }

    if by_label.len() < 2 {
        return Err(DataError::TooFewLabels { found: by_label.len() });
    }
    if let Some((label, group)) = by_label.iter().find(|(_, g)| g.len() < 2) {
        return Err(DataError::TooFewExamples {
            label: label.clone(),
            count: group.len(),
        });
    }

    let mut rng   = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut val   = Vec::new();

    for (label, mut group) in by_label {
        let count  = group.len();
        let n_val  = ((count as f64) * val_fraction).round() as usize;
        let n_val  = n_val.clamp(1, count - 1);

        group.shuffle(&mut rng);
        let held_out = group.split_off(count - n_val);

        tracing::debug!(
            "Label '{}': {} train, {} validation",
            label,
            group.len(),
            held_out.len()
        );

        train.extend(group);
        val.extend(held_out);
    }

    train.shuffle(&mut rng);
    val.shuffle(&mut rng);

    tracing::debug!("Dataset split: {} training, {} validation", train.len(), val.len());
    Ok((train, val))
}

/// Count examples per label, in ascending label order.
pub fn label_counts<'a, I>(labels: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for label in labels {
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}
