// ============================================================
// Layer 4 — Feature Batcher
// ============================================================
// Densifies a mini-batch of sparse feature rows into the tensors
// one optimiser step consumes:
//
//   features [batch, num_features]  TF-IDF values
//   targets  [batch, num_classes]   one-hot class indicator
//   weights  [batch, 1]             balanced sample weight
//
// Only the rows of one batch are ever dense at a time, so
// memory stays bounded by batch_size * num_features.
//
// FeatureBatcher implements burn's Batcher trait; the
// DataLoader hands it each shuffled mini-batch.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::FeatureRow;

#[derive(Debug, Clone)]
pub struct FeatureBatch<B: Backend> {
    pub features: Tensor<B, 2>,
    pub targets:  Tensor<B, 2>,
    pub weights:  Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct FeatureBatcher<B: Backend> {
    device:       B::Device,
    num_features: usize,
    num_classes:  usize,
}

impl<B: Backend> FeatureBatcher<B> {
    pub fn new(device: B::Device, num_features: usize, num_classes: usize) -> Self {
        Self { device, num_features, num_classes }
    }
}

impl<B: Backend> Batcher<FeatureRow, FeatureBatch<B>> for FeatureBatcher<B> {
    fn batch(&self, items: Vec<FeatureRow>) -> FeatureBatch<B> {
        let batch_size = items.len();

        let mut features = vec![0.0f32; batch_size * self.num_features];
        let mut targets  = vec![0.0f32; batch_size * self.num_classes];
        let mut weights  = Vec::with_capacity(batch_size);

        for (r, row) in items.iter().enumerate() {
            for (idx, value) in row.features.iter() {
                features[r * self.num_features + idx] = value;
            }
            targets[r * self.num_classes + row.class] = 1.0;
            weights.push(row.weight);
        }

        let features = Tensor::<B, 2>::from_data(
            TensorData::new(features, [batch_size, self.num_features]),
            &self.device,
        );
        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(targets, [batch_size, self.num_classes]),
            &self.device,
        );
        let weights = Tensor::<B, 2>::from_data(
            TensorData::new(weights, [batch_size, 1]),
            &self.device,
        );

        FeatureBatch { features, targets, weights }
    }
}
