// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a full training run in order:
//
//   Step 1: Load the labelled corpus      (Layer 4 - data)
//   Step 2: Report the label distribution (Layer 4 - data)
//   Step 3: Fit each variant              (Layer 5 - ml)
//   Step 4: Persist artifacts + reports   (Layer 6 - infra)
//   Step 5: Save config                   (Layer 6 - infra)
//
// Each variant gets its own vectorizer and its own split drawn
// from the same seed, so the two artifacts are independent.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    loader::CsvCorpusLoader,
    splitter::{label_counts, DEFAULT_SEED, DEFAULT_VAL_FRACTION},
};
use crate::domain::{
    error::DataError,
    replies::is_known_label,
    traits::CorpusSource,
    variant::ModelVariant,
};
use crate::infra::{artifact_store::ArtifactStore, metrics::ReportWriter};
use crate::ml::trainer::{fit_pipeline, VariantParams};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a training run depends on. Saved next to the
// artifacts as train_config.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_path:  String,
    pub model_dir:    String,
    pub seed:         u64,
    pub val_fraction: f64,
    pub logistic:     VariantParams,
    pub svm:          VariantParams,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_path:  "data/comments_labeled.csv".to_string(),
            model_dir:    "models".to_string(),
            seed:         DEFAULT_SEED,
            val_fraction: DEFAULT_VAL_FRACTION,
            logistic:     VariantParams::for_variant(ModelVariant::Logistic),
            svm:          VariantParams::for_variant(ModelVariant::Svm),
        }
    }
}

impl TrainConfig {
    pub fn params(&self, variant: ModelVariant) -> &VariantParams {
        match variant {
            ModelVariant::Logistic => &self.logistic,
            ModelVariant::Svm      => &self.svm,
        }
    }
}

/// What one fitted variant left behind.
#[derive(Debug, Clone)]
pub struct TrainedVariant {
    pub variant:       ModelVariant,
    pub artifact_path: PathBuf,
    pub report_path:   PathBuf,
    pub accuracy:      f64,
    pub train_size:    usize,
    pub val_size:      usize,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Train on the CSV corpus named in the config.
    pub fn execute(&self) -> Result<Vec<TrainedVariant>> {
        tracing::info!("Loading corpus from '{}'", self.config.corpus_path);
        let loader = CsvCorpusLoader::new(&self.config.corpus_path);
        self.execute_with(&loader)
    }

    /// Train on examples from any corpus source.
    pub fn execute_with<C: CorpusSource + ?Sized>(&self, source: &C) -> Result<Vec<TrainedVariant>> {
        let cfg = &self.config;

        // ── Step 1: Load ──────────────────────────────────────────────────────
        let examples = source.load_examples().context("Cannot load training corpus")?;
        if examples.is_empty() {
            return Err(DataError::EmptyCorpus.into());
        }

        // ── Step 2: Label distribution ────────────────────────────────────────
        let counts = label_counts(examples.iter().map(|e| e.label.as_str()));
        tracing::info!("Label distribution over {} comments:", examples.len());
        for (label, count) in &counts {
            tracing::info!("  {:<24} {}", label, count);
            if !is_known_label(label) {
                tracing::warn!("Label '{}' has no reply template; the default reply will be used", label);
            }
        }

        // ── Step 3 + 4: Fit and persist each variant ──────────────────────────
        let store   = ArtifactStore::new(&cfg.model_dir);
        let reports = ReportWriter::new(&cfg.model_dir)?;

        let mut trained = Vec::with_capacity(ModelVariant::ALL.len());
        for variant in ModelVariant::ALL {
            tracing::info!("Training {} pipeline", variant);

            let outcome = fit_pipeline(
                examples.clone(),
                variant,
                cfg.params(variant),
                cfg.seed,
                cfg.val_fraction,
            )
            .with_context(|| format!("Training the {variant} pipeline failed"))?;

            let artifact_path = store.save(&outcome.pipeline)?;
            let report_path   = reports.write(variant.name(), &outcome.report)?;

            trained.push(TrainedVariant {
                variant,
                artifact_path,
                report_path,
                accuracy:   outcome.report.accuracy,
                train_size: outcome.train_size,
                val_size:   outcome.val_size,
            });
        }

        // ── Step 5: Config ────────────────────────────────────────────────────
        store.save_config(cfg)?;

        Ok(trained)
    }
}
