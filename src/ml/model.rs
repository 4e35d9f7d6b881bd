// ============================================================
// Layer 5 — Linear Classifier Model (Burn)
// ============================================================
// A single linear layer mapping TF-IDF features to one score
// per class. The two variants differ only in the loss:
//
//   Logistic — softmax cross-entropy (multinomial)
//   Svm      — one-vs-rest squared hinge
//
// Both add an L2 penalty on the weight matrix (not the bias)
// and weight each sample by its class-balanced weight.
//
// Weights start at zero: both objectives are convex, so the
// result does not depend on a random initialisation.
//
// Reference: Burn Book §3 (Building Blocks)

use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::activation::log_softmax,
};

use crate::data::batcher::FeatureBatch;
use crate::domain::variant::ModelVariant;

#[derive(Config, Debug)]
pub struct LinearClassifierConfig {
    pub num_features: usize,
    pub num_classes:  usize,
}

impl LinearClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LinearClassifier<B> {
        let head = LinearConfig::new(self.num_features, self.num_classes)
            .with_bias(true)
            .with_initializer(Initializer::Zeros)
            .init(device);
        LinearClassifier { head }
    }
}

#[derive(Module, Debug)]
pub struct LinearClassifier<B: Backend> {
    pub head: Linear<B>,
}

impl<B: Backend> LinearClassifier<B> {
    /// Class scores, shape [batch, num_classes].
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.head.forward(features)
    }

    /// Weighted mean loss of `batch` plus the L2 penalty.
    pub fn forward_loss(&self, batch: FeatureBatch<B>, variant: ModelVariant, l2: f64) -> Tensor<B, 1> {
        let scores = self.forward(batch.features);

        let per_sample = match variant {
            ModelVariant::Logistic => {
                // -Σ_c y_c · log p_c
                (log_softmax(scores, 1) * batch.targets).sum_dim(1).neg()
            }
            ModelVariant::Svm => {
                // Σ_c max(0, 1 - s_c · score_c)², s_c = ±1
                let signs   = batch.targets.mul_scalar(2.0).sub_scalar(1.0);
                let margins = (signs * scores).neg().add_scalar(1.0).clamp_min(0.0);
                margins.powf_scalar(2.0).sum_dim(1)
            }
        };

        let data_loss = (per_sample * batch.weights).mean();
        let penalty   = self.head.weight.val().powf_scalar(2.0).sum().mul_scalar(0.5 * l2);

        data_loss + penalty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batcher::FeatureBatcher;
    use crate::data::dataset::{FeatureRow, SparseVector};
    use burn::{backend::NdArray, data::dataloader::batcher::Batcher};

    fn batch() -> FeatureBatch<NdArray> {
        let rows = vec![
            FeatureRow {
                features: SparseVector { indices: vec![0], values: vec![1.0] },
                class:    0,
                weight:   1.0,
            },
            FeatureRow {
                features: SparseVector { indices: vec![1], values: vec![1.0] },
                class:    1,
                weight:   1.0,
            },
        ];
        FeatureBatcher::<NdArray>::new(Default::default(), 2, 2).batch(rows)
    }

    #[test]
    fn test_zero_model_scores_are_zero() {
        let model: LinearClassifier<NdArray> =
            LinearClassifierConfig::new(2, 2).init(&Default::default());
        let scores = model.forward(batch().features).into_data().to_vec::<f32>().unwrap();
        assert!(scores.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_initial_losses() {
        let model: LinearClassifier<NdArray> =
            LinearClassifierConfig::new(2, 2).init(&Default::default());

        // uniform softmax over 2 classes → ln 2
        let ce: f32 = model
            .forward_loss(batch(), ModelVariant::Logistic, 0.0)
            .into_scalar()
            .elem();
        assert!((ce - std::f32::consts::LN_2).abs() < 1e-5);

        // zero scores → each of 2 margins is 1 → loss 2
        let hinge: f32 = model
            .forward_loss(batch(), ModelVariant::Svm, 0.0)
            .into_scalar()
            .elem();
        assert!((hinge - 2.0).abs() < 1e-5);
    }
}
