// ============================================================
// Layer 4 — Feature Dataset
// ============================================================
// Training rows after vectorisation: a sparse TF-IDF vector,
// the class index and the class-balanced sample weight.
//
// FeatureDataset implements burn's Dataset trait so the
// DataLoader can shuffle and batch it.

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// Sparse vector: parallel index/value arrays, indices ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values:  Vec<f32>,
}

impl SparseVector {
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices.iter().map(|&i| i as usize).zip(self.values.iter().copied())
    }

    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }
}

/// One vectorised training example.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub features: SparseVector,
    pub class:    usize,
    pub weight:   f32,
}

/// Training rows plus the problem dimensions.
pub struct FeatureDataset {
    rows:         Vec<FeatureRow>,
    num_features: usize,
    num_classes:  usize,
}

impl FeatureDataset {
    pub fn new(rows: Vec<FeatureRow>, num_features: usize, num_classes: usize) -> Self {
        Self { rows, num_features, num_classes }
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

impl Dataset<FeatureRow> for FeatureDataset {
    fn get(&self, index: usize) -> Option<FeatureRow> {
        self.rows.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Balanced weights: n_samples / (n_classes * count_c).
pub fn balanced_class_weights(classes: &[usize], num_classes: usize) -> Vec<f32> {
    let mut counts = vec![0usize; num_classes];
    for &c in classes {
        counts[c] += 1;
    }
    let n = classes.len() as f32;
    counts
        .iter()
        .map(|&count| if count == 0 { 0.0 } else { n / (num_classes as f32 * count as f32) })
        .collect()
}
