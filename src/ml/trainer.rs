// ============================================================
// Layer 5 — Pipeline Training
// ============================================================
// fit_pipeline() turns labelled examples into a pipeline:
//
//   1. drop unusable examples
//   2. stratified, seeded 80/20 split
//   3. fit the TF-IDF vectorizer on the training split only
//   4. fit the linear classifier with balanced class weights
//   5. score the validation split → ClassificationReport
//   6. bundle vectorizer + classes + weights into one artifact
//
// The optimiser is Adam over mini-batches from burn's
// DataLoader on the ndarray backend. The split and the loader
// shuffle are both seeded with the configured seed, the loader
// runs a single worker, and the weights start at zero, so
// identical inputs train identical pipelines.
//
// Reference: Burn Book §5 (Training), Kingma & Ba (2015) Adam

use std::collections::BTreeSet;

use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::data::batcher::FeatureBatcher;
use crate::data::dataset::{balanced_class_weights, FeatureDataset, FeatureRow};
use crate::data::splitter::stratified_split;
use crate::domain::comment::TrainingExample;
use crate::domain::error::{ClassifierError, DataError};
use crate::domain::variant::ModelVariant;
use crate::infra::metrics::ClassificationReport;
use crate::ml::model::{LinearClassifier, LinearClassifierConfig};
use crate::ml::pipeline::{ClassificationPipeline, LinearWeights};
use crate::ml::vectorizer::{TfidfVectorizer, VectorizerConfig};

type TrainBackend = Autodiff<NdArray>;

/// Hyperparameters for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantParams {
    pub max_features:  usize,
    pub min_df:        usize,
    /// Inverse regularisation strength
    pub c:             f64,
    pub epochs:        usize,
    pub learning_rate: f64,
    pub batch_size:    usize,
    /// Stop once the mean epoch loss moves less than this
    pub tolerance:     f64,
}

impl VariantParams {
    pub fn for_variant(variant: ModelVariant) -> Self {
        match variant {
            ModelVariant::Logistic => Self {
                max_features:  8000,
                min_df:        1,
                c:             1.0,
                epochs:        200,
                learning_rate: 0.05,
                batch_size:    64,
                tolerance:     1e-6,
            },
            ModelVariant::Svm => Self {
                max_features:  5000,
                min_df:        2,
                c:             0.1,
                epochs:        200,
                learning_rate: 0.05,
                batch_size:    64,
                tolerance:     1e-6,
            },
        }
    }

    pub fn vectorizer_config(&self) -> VectorizerConfig {
        VectorizerConfig {
            max_features: self.max_features,
            min_df:       self.min_df,
            ..VectorizerConfig::default()
        }
    }
}

/// Everything a fit produces.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub pipeline:   ClassificationPipeline,
    pub report:     ClassificationReport,
    pub train_size: usize,
    pub val_size:   usize,
}

/// Fit one pipeline variant on `examples`.
pub fn fit_pipeline(
    examples:     Vec<TrainingExample>,
    variant:      ModelVariant,
    params:       &VariantParams,
    seed:         u64,
    val_fraction: f64,
) -> Result<FitOutcome, ClassifierError> {
    // ── Step 1: Filter ────────────────────────────────────────────────────────
    let examples: Vec<TrainingExample> = examples.into_iter().filter(|e| e.is_usable()).collect();
    if examples.is_empty() {
        return Err(DataError::EmptyCorpus.into());
    }

    // ── Step 2: Stratified split ──────────────────────────────────────────────
    let (train, val) = stratified_split(examples, val_fraction, seed)?;
    tracing::info!("[{}] split: {} train, {} validation", variant, train.len(), val.len());

    // ── Step 3: Vectorizer on the training split ──────────────────────────────
    let train_texts: Vec<&str> = train.iter().map(|e| e.text.as_str()).collect();
    let vectorizer = TfidfVectorizer::fit(params.vectorizer_config(), &train_texts)?;
    tracing::info!("[{}] vocabulary: {} features", variant, vectorizer.vocabulary_size());

    // ── Step 4: Classifier ────────────────────────────────────────────────────
    let classes: Vec<String> = train
        .iter()
        .map(|e| e.label.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let class_ids: Vec<usize> = train
        .iter()
        .map(|e| class_index(&classes, &e.label))
        .collect();
    let class_weights = balanced_class_weights(&class_ids, classes.len());

    let rows: Vec<FeatureRow> = train
        .iter()
        .zip(&class_ids)
        .map(|(e, &class)| FeatureRow {
            features: vectorizer.transform(&e.text),
            class,
            weight: class_weights[class],
        })
        .collect();
    let dataset = FeatureDataset::new(rows, vectorizer.vocabulary_size(), classes.len());

    let weights  = train_weights(dataset, variant, params, seed)?;
    let pipeline = ClassificationPipeline::new(variant, vectorizer, classes, weights);

    // ── Step 5: Validation report ─────────────────────────────────────────────
    let truth: Vec<&str>     = val.iter().map(|e| e.label.as_str()).collect();
    let predicted: Vec<&str> = val.iter().map(|e| pipeline.predict(&e.text)).collect();
    let report = ClassificationReport::from_predictions(pipeline.classes(), &truth, &predicted);
    tracing::info!("[{}] validation results:\n{}", variant, report);

    Ok(FitOutcome {
        pipeline,
        report,
        train_size: train.len(),
        val_size:   val.len(),
    })
}

fn class_index(classes: &[String], label: &str) -> usize {
    classes.binary_search_by(|c| c.as_str().cmp(label)).unwrap_or(0)
}

/// Optimise a linear classifier over `dataset` and export its weights.
fn train_weights(
    dataset: FeatureDataset,
    variant: ModelVariant,
    params:  &VariantParams,
    seed:    u64,
) -> Result<LinearWeights, ClassifierError> {
    let device       = NdArrayDevice::default();
    let num_features = dataset.num_features();
    let num_classes  = dataset.num_classes();
    let l2           = 1.0 / (params.c * dataset.len().max(1) as f64);

    let mut model: LinearClassifier<TrainBackend> =
        LinearClassifierConfig::new(num_features, num_classes).init(&device);
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    // ── Training data loader ──────────────────────────────────────────────────
    // Reshuffled on every iter() from one rng seeded here.
    let batcher = FeatureBatcher::<TrainBackend>::new(device, num_features, num_classes);
    let loader  = DataLoaderBuilder::new(batcher)
        .batch_size(params.batch_size.max(1))
        .shuffle(seed)
        .num_workers(1)
        .build(dataset);

    let mut previous_loss = f64::INFINITY;

    for epoch in 1..=params.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let loss = model.forward_loss(batch, variant, l2);
            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            if !loss_val.is_finite() {
                return Err(ClassifierError::Training(format!(
                    "{variant} loss became {loss_val} at epoch {epoch}"
                )));
            }
            loss_sum += loss_val;
            batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(params.learning_rate, model, grads);
        }

        let avg_loss = loss_sum / batches.max(1) as f64;
        tracing::debug!("[{}] epoch {:>4}/{} loss={:.6}", variant, epoch, params.epochs, avg_loss);

        if (previous_loss - avg_loss).abs() < params.tolerance {
            tracing::debug!("[{}] converged after {} epochs", variant, epoch);
            break;
        }
        previous_loss = avg_loss;
    }

    export_weights(model.valid(), num_features, num_classes)
}

/// Copy the trained linear layer out of burn into plain vectors.
fn export_weights(
    model:        LinearClassifier<NdArray>,
    num_features: usize,
    num_classes:  usize,
) -> Result<LinearWeights, ClassifierError> {
    let export_err = |e| ClassifierError::Training(format!("cannot export weights: {e:?}"));

    let coef = model
        .head
        .weight
        .val()
        .into_data()
        .to_vec::<f32>()
        .map_err(export_err)?;

    let intercept = match &model.head.bias {
        Some(bias) => bias.val().into_data().to_vec::<f32>().map_err(export_err)?,
        None       => vec![0.0; num_classes],
    };

    let weights = LinearWeights { num_features, num_classes, coef, intercept };
    if !weights.is_consistent() {
        return Err(ClassifierError::Training("exported weights have the wrong shape".into()));
    }
    if weights.coef.iter().chain(&weights.intercept).any(|w| !w.is_finite()) {
        return Err(ClassifierError::Training("exported weights are not finite".into()));
    }
    Ok(weights)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::replies::generate_reply;
    use crate::ml::inferencer::{classify, classify_with_confidence};
    use crate::domain::replies::ReplyTemplates;

    /// 10 praise + 10 hate_abuse comments.
    pub(crate) fn praise_and_abuse() -> Vec<TrainingExample> {
        let praise = [
            "Thanks, great video!",
            "Great work, thanks so much",
            "Amazing and great content, thanks",
            "Loved it, great job",
            "Thanks for this great tutorial",
            "Great explanation, loved it",
            "Wonderful video thanks",
            "Great editing, amazing work",
            "Thanks, loved every minute",
            "Amazing, great and wonderful",
        ];
        let abuse = [
            "You are an idiot",
            "Stupid idiot video, trash",
            "Worst trash ever, stupid",
            "Idiot creator, pathetic",
            "Pathetic stupid garbage",
            "Trash content by an idiot",
            "Garbage, pathetic and stupid",
            "Stupid trash, hate it",
            "Hate this idiot garbage",
            "Pathetic trash, hate it",
        ];
        praise
            .iter()
            .map(|t| TrainingExample::new(*t, "praise"))
            .chain(abuse.iter().map(|t| TrainingExample::new(*t, "hate_abuse")))
            .collect()
    }

    fn fit(variant: ModelVariant) -> FitOutcome {
        fit_pipeline(praise_and_abuse(), variant, &VariantParams::for_variant(variant), 42, 0.2)
            .unwrap()
    }

    #[test]
    fn test_validation_split_is_stratified() {
        let outcome = fit(ModelVariant::Logistic);
        assert_eq!(outcome.val_size, 4);
        assert_eq!(outcome.train_size, 16);
        assert_eq!(outcome.report.metrics_for("praise").unwrap().support, 2);
        assert_eq!(outcome.report.metrics_for("hate_abuse").unwrap().support, 2);
    }

    #[test]
    fn test_praise_scenario_both_variants() {
        for variant in ModelVariant::ALL {
            let pipeline = fit(variant).pipeline;
            let result   = classify("Thanks, this was great!", &pipeline, &ReplyTemplates);
            assert_eq!(result.label, "praise", "{variant}");
            assert_eq!(
                result.reply,
                "Thank you so much for your kind words and appreciation!"
            );
            assert_eq!(result.reply, generate_reply("praise"));
        }
    }

    #[test]
    fn test_abuse_is_recognised() {
        let pipeline = fit(ModelVariant::Svm).pipeline;
        assert_eq!(pipeline.predict("stupid idiot trash"), "hate_abuse");
    }

    #[test]
    fn test_training_is_deterministic() {
        for variant in ModelVariant::ALL {
            let a = fit(variant).pipeline;
            let b = fit(variant).pipeline;
            assert_eq!(a, b);
            for text in ["great stuff", "idiot", "", "neutral words here"] {
                assert_eq!(a.predict(text), b.predict(text));
                assert_eq!(a.decision_function(text), b.decision_function(text));
            }
        }
    }

    #[test]
    fn test_variants_use_separate_vocabularies() {
        let logistic = fit(ModelVariant::Logistic).pipeline;
        let svm      = fit(ModelVariant::Svm).pipeline;
        // min_df=2 prunes terms the logistic vocabulary keeps
        assert!(svm.vectorizer().vocabulary_size() < logistic.vectorizer().vocabulary_size());
    }

    #[test]
    fn test_svm_confidence_is_absent() {
        let pipeline = fit(ModelVariant::Svm).pipeline;
        let result   = classify_with_confidence("Thanks, this was great!", &pipeline, &ReplyTemplates)
            .unwrap();
        assert_eq!(result.label, "praise");
        assert!(result.probabilities.is_none());
    }

    #[test]
    fn test_single_label_corpus_is_rejected() {
        let examples: Vec<TrainingExample> =
            (0..5).map(|i| TrainingExample::new(format!("great {i}"), "praise")).collect();
        let err = fit_pipeline(examples, ModelVariant::Logistic, &VariantParams::for_variant(ModelVariant::Logistic), 42, 0.2)
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Data(DataError::TooFewLabels { found: 1 })));
    }

    #[test]
    fn test_blank_labels_are_dropped_before_split() {
        let mut examples = praise_and_abuse();
        examples.push(TrainingExample::new("orphan comment", "   "));
        let outcome = fit_pipeline(
            examples,
            ModelVariant::Logistic,
            &VariantParams::for_variant(ModelVariant::Logistic),
            42,
            0.2,
        )
        .unwrap();
        assert_eq!(outcome.train_size + outcome.val_size, 20);
        assert_eq!(outcome.pipeline.classes(), &["hate_abuse".to_string(), "praise".to_string()]);
    }

    /// 12 praise, 8 hate_abuse and 5 question_suggestion comments.
    fn three_unbalanced_labels() -> Vec<TrainingExample> {
        let mut examples: Vec<TrainingExample> = praise_and_abuse()
            .into_iter()
            .filter(|e| e.label == "praise")
            .collect();
        examples.push(TrainingExample::new("Great stuff, thanks again", "praise"));
        examples.push(TrainingExample::new("Loved this, amazing work", "praise"));
        examples.extend(
            praise_and_abuse().into_iter().filter(|e| e.label == "hate_abuse").take(8),
        );
        let questions = [
            "Question: how to install, need help",
            "Add subtitles please, question",
            "Install help needed, add steps",
            "Question about install steps",
            "Please add subtitles and install help",
        ];
        examples.extend(questions.iter().map(|t| TrainingExample::new(*t, "question_suggestion")));
        examples
    }

    #[test]
    fn test_three_unbalanced_labels_both_variants() {
        for variant in ModelVariant::ALL {
            let outcome = fit_pipeline(
                three_unbalanced_labels(),
                variant,
                &VariantParams::for_variant(variant),
                42,
                0.2,
            )
            .unwrap();
            assert_eq!(outcome.train_size, 20, "{variant}");
            assert_eq!(outcome.val_size, 5, "{variant}");
            assert_eq!(outcome.report.classes.len(), 3);
            assert_eq!(outcome.report.metrics_for("question_suggestion").unwrap().support, 1);

            let pipeline = outcome.pipeline;
            assert_eq!(pipeline.classes().len(), 3);
            assert_eq!(pipeline.decision_function("anything").len(), 3);
            assert_eq!(pipeline.predict("Thanks, great and amazing work"), "praise", "{variant}");
            assert_eq!(pipeline.predict("stupid idiot trash"), "hate_abuse", "{variant}");
            assert_eq!(pipeline.predict("question about install help"), "question_suggestion", "{variant}");
        }
    }

    #[test]
    fn test_three_label_logistic_probabilities_cover_every_class() {
        let variant  = ModelVariant::Logistic;
        let pipeline = fit_pipeline(three_unbalanced_labels(), variant, &VariantParams::for_variant(variant), 42, 0.2)
            .unwrap()
            .pipeline;
        let probs = pipeline.predict_proba("question about install help").unwrap();
        assert_eq!(probs.entries().len(), 3);
        assert_eq!(probs.entries()[0].0, "question_suggestion");
        let total: f32 = probs.entries().iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-4);
    }
}
