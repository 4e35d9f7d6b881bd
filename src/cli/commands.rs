// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `classify`
// and all their configurable flags.
//
// `classify` picks its mode from the flags:
//   --text "..."   one comment
//   --input FILE   batch CSV
//   (neither)      interactive prompt on stdin
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{
    classify_use_case::{BatchJob, ClassifyConfig},
    train_use_case::TrainConfig,
};
use crate::data::splitter::{DEFAULT_SEED, DEFAULT_VAL_FRACTION};
use crate::domain::variant::ModelVariant;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit both classifiers on a labelled CSV corpus
    Train(TrainArgs),

    /// Classify comments with a trained model
    Classify(ClassifyArgs),
}

/// Arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV with `text` and `label` columns
    #[arg(long, default_value = "data/comments_labeled.csv")]
    pub corpus: String,

    /// Directory the artifacts, reports and config are written to
    #[arg(long, default_value = "models")]
    pub model_dir: String,

    /// Seed for the split and the batch order
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Share of each label held out for validation
    #[arg(long, default_value_t = DEFAULT_VAL_FRACTION)]
    pub val_fraction: f64,

    /// Override the number of epochs for both variants
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Override the Adam learning rate for both variants
    #[arg(long)]
    pub lr: Option<f64>,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        let mut cfg = TrainConfig {
            corpus_path:  a.corpus,
            model_dir:    a.model_dir,
            seed:         a.seed,
            val_fraction: a.val_fraction,
            ..TrainConfig::default()
        };
        for params in [&mut cfg.logistic, &mut cfg.svm] {
            if let Some(epochs) = a.epochs {
                params.epochs = epochs;
            }
            if let Some(lr) = a.lr {
                params.learning_rate = lr;
            }
        }
        cfg
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantArg {
    /// Linear SVM (recommended)
    Svm,
    /// Logistic regression, supports confidence scores
    Logistic,
}

impl From<VariantArg> for ModelVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Svm      => ModelVariant::Svm,
            VariantArg::Logistic => ModelVariant::Logistic,
        }
    }
}

/// Arguments for the `classify` command.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Directory holding the trained artifacts
    #[arg(long, default_value = "models")]
    pub model_dir: String,

    /// Which trained model to use
    #[arg(long, value_enum, default_value_t = VariantArg::Svm)]
    pub variant: VariantArg,

    /// Classify a single comment and exit
    #[arg(long, conflicts_with = "input")]
    pub text: Option<String>,

    /// CSV with a `text` column to classify in batch
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Where the batch results are written
    #[arg(long, default_value = "data/output_categorized.csv")]
    pub output: PathBuf,

    /// Only write batch rows predicted as this label (repeatable)
    #[arg(long = "category", requires = "input")]
    pub categories: Vec<String>,

    /// Show the top class probabilities when the model has them
    #[arg(long)]
    pub confidence: bool,

    /// Print the single-comment result as JSON
    #[arg(long, requires = "text")]
    pub json: bool,
}

impl From<&ClassifyArgs> for ClassifyConfig {
    fn from(a: &ClassifyArgs) -> Self {
        ClassifyConfig {
            model_dir:  a.model_dir.clone(),
            variant:    a.variant.into(),
            confidence: a.confidence,
        }
    }
}

impl ClassifyArgs {
    /// The batch job described by these flags, if `--input` was given.
    pub fn batch_job(&self) -> Option<BatchJob> {
        self.input.as_ref().map(|input| BatchJob {
            input:      input.clone(),
            output:     self.output.clone(),
            categories: self.categories.clone(),
        })
    }
}
