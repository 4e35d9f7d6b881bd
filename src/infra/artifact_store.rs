// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Persists fitted pipelines, one file per variant, plus the
// training configuration used to produce them.
//
// Layout of the model directory:
//
//   models/
//     logistic_classifier.bin   ← logistic pipeline
//     svm_classifier.bin        ← svm pipeline
//     train_config.json         ← TrainConfig of the last run
//     logistic_report.csv       ← written by ReportWriter
//     svm_report.csv
//
// Artifact format (bincode):
//
//   magic          8 bytes  "CTRIAGE\0"
//   format_version u32
//   pipeline       ClassificationPipeline
//
// Loading checks the magic, the version, the variant and the
// internal dimensions; any mismatch is an ArtifactLoadError and
// no pipeline is returned.
//
// Reference: bincode crate documentation
//            Rust Book §9 (Error Handling)

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::ArtifactLoadError;
use crate::domain::variant::ModelVariant;
use crate::ml::pipeline::ClassificationPipeline;

const MAGIC: [u8; 8] = *b"CTRIAGE\0";

/// Bumped whenever the serialised layout of the pipeline changes.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct StoredArtifactRef<'a> {
    magic:          [u8; 8],
    format_version: u32,
    pipeline:       &'a ClassificationPipeline,
}

#[derive(Deserialize)]
struct StoredHeader {
    magic:          [u8; 8],
    format_version: u32,
}

#[derive(Deserialize)]
struct StoredArtifact {
    #[allow(dead_code)]
    magic:          [u8; 8],
    #[allow(dead_code)]
    format_version: u32,
    pipeline:       ClassificationPipeline,
}

/// Serialise a pipeline into an artifact blob.
pub fn persist(pipeline: &ClassificationPipeline) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(&StoredArtifactRef {
        magic: MAGIC,
        format_version: FORMAT_VERSION,
        pipeline,
    })
}

/// Rebuild a pipeline from an artifact blob. `origin` names the
/// blob in error messages.
pub fn restore(bytes: &[u8], origin: &Path) -> Result<ClassificationPipeline, ArtifactLoadError> {
    let unreadable = |reason: String| ArtifactLoadError::Unreadable {
        path: origin.to_path_buf(),
        reason,
    };
    let incompatible = |reason: String| ArtifactLoadError::Incompatible {
        path: origin.to_path_buf(),
        reason,
    };

    let header: StoredHeader =
        bincode::deserialize(bytes).map_err(|e| unreadable(e.to_string()))?;
    if header.magic != MAGIC {
        return Err(unreadable("not a comment classifier artifact".into()));
    }
    if header.format_version != FORMAT_VERSION {
        return Err(incompatible(format!(
            "format version {} (expected {FORMAT_VERSION})",
            header.format_version
        )));
    }

    let stored: StoredArtifact =
        bincode::deserialize(bytes).map_err(|e| unreadable(e.to_string()))?;

    if let Some(reason) = stored.pipeline.consistency_error() {
        return Err(incompatible(reason));
    }
    Ok(stored.pipeline)
}

/// Reads and writes artifacts inside one model directory.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn artifact_path(&self, variant: ModelVariant) -> PathBuf {
        self.dir.join(variant.artifact_file_name())
    }

    /// Persist `pipeline` under its variant's file name.
    pub fn save(&self, pipeline: &ClassificationPipeline) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))?;

        let path  = self.artifact_path(pipeline.variant());
        let bytes = persist(pipeline).context("Cannot serialise pipeline")?;

        fs::write(&path, bytes)
            .with_context(|| format!("Failed to save artifact to '{}'", path.display()))?;

        tracing::info!("{} model saved to '{}'", pipeline.variant(), path.display());
        Ok(path)
    }

    /// Load the pipeline for `variant`. Fails rather than falling
    /// back when the file is missing or was written by something else.
    pub fn load(&self, variant: ModelVariant) -> Result<ClassificationPipeline, ArtifactLoadError> {
        let path = self.artifact_path(variant);
        if !path.exists() {
            return Err(ArtifactLoadError::Missing(path));
        }

        let bytes = fs::read(&path).map_err(|e| ArtifactLoadError::Unreadable {
            path:   path.clone(),
            reason: e.to_string(),
        })?;
        let pipeline = restore(&bytes, &path)?;

        if pipeline.variant() != variant {
            return Err(ArtifactLoadError::Incompatible {
                path,
                reason: format!("holds a {} pipeline, expected {}", pipeline.variant(), variant),
            });
        }

        tracing::info!(
            "Loaded {} pipeline ({} classes, {} features)",
            variant,
            pipeline.classes().len(),
            pipeline.vectorizer().vocabulary_size()
        );
        Ok(pipeline)
    }

    /// Save the training configuration as pretty JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))?;
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the configuration of the last training run.
    #[cfg(test)]
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Make sure you have run 'train' first.",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
