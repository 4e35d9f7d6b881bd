// ============================================================
// Layer 2 — Classify Use Case
// ============================================================
// Loads one trained pipeline and serves every front end from it:
//
//   classify()          one comment       → ClassificationResult
//   classify_table()    a CommentTable    → rows sorted by label
//   classify_batch()    input CSV path    → output CSV + summary
//   run_interactive()   stdin-like reader → prompt loop
//
// The pipeline is shared behind an Arc and never mutated, so a
// use case can be cloned across threads freely.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};

use crate::application::analytics::BatchSummary;
use crate::data::table::{write_classified_path, ClassifiedRow, CommentTable};
use crate::domain::{
    comment::ClassificationResult,
    error::ClassifierError,
    replies::ReplyTemplates,
    traits::CommentClassifier,
    variant::ModelVariant,
};
use crate::infra::artifact_store::ArtifactStore;
use crate::ml::{
    inferencer::{classify, classify_with_confidence},
    pipeline::ClassificationPipeline,
};

/// How many class probabilities the front ends show.
pub const TOP_PROBABILITIES: usize = 5;

pub const NO_CONFIDENCE_MESSAGE: &str = "Confidence scores not available for this model";

/// Settings shared by every `classify` mode.
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    pub model_dir:  String,
    pub variant:    ModelVariant,
    /// Ask the pipeline for per-class probabilities as well.
    pub confidence: bool,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            model_dir:  "models".to_string(),
            variant:    ModelVariant::Svm,
            confidence: false,
        }
    }
}

/// Where a batch run reads and writes.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub input:      PathBuf,
    pub output:     PathBuf,
    /// When non-empty, only rows predicted as one of these are written.
    pub categories: Vec<String>,
}

#[derive(Clone)]
pub struct ClassifyUseCase {
    pipeline:   Arc<ClassificationPipeline>,
    replies:    ReplyTemplates,
    confidence: bool,
}

impl ClassifyUseCase {
    /// Load the configured variant from the model directory.
    pub fn new(config: &ClassifyConfig) -> Result<Self> {
        let store    = ArtifactStore::new(&config.model_dir);
        let pipeline = store.load(config.variant).with_context(|| {
            format!(
                "Cannot load the {} model. Make sure you have run 'train' first.",
                config.variant
            )
        })?;
        Ok(Self::from_pipeline(Arc::new(pipeline), config.confidence))
    }

    pub fn from_pipeline(pipeline: Arc<ClassificationPipeline>, confidence: bool) -> Self {
        if confidence && !pipeline.supports_probabilities() {
            tracing::info!("The {} model does not produce confidence scores", pipeline.variant());
        }
        Self { pipeline, replies: ReplyTemplates, confidence }
    }

    pub fn variant(&self) -> ModelVariant {
        self.pipeline.variant()
    }

    pub fn shows_confidence(&self) -> bool {
        self.confidence
    }

    /// Classify every row of `table`. Output rows are stably sorted by
    /// predicted label, then restricted to `categories` if any are given.
    pub fn classify_table(&self, table: CommentTable, categories: &[String]) -> (Vec<ClassifiedRow>, BatchSummary) {
        let mut predictions = Vec::with_capacity(table.len());
        for i in 0..table.len() {
            predictions.push(classify(table.text(i), &self.pipeline, &self.replies));
        }

        let summary = BatchSummary::from_labels(predictions.iter().map(|r| r.label.as_str()));

        let mut rows: Vec<ClassifiedRow> = table
            .into_rows()
            .into_iter()
            .zip(predictions)
            .map(|(fields, result)| ClassifiedRow {
                fields,
                predicted_label: result.label,
                suggested_reply: result.reply,
            })
            .collect();
        rows.sort_by(|a, b| a.predicted_label.cmp(&b.predicted_label));

        if !categories.is_empty() {
            rows.retain(|r| categories.contains(&r.predicted_label));
        }
        (rows, summary)
    }

    /// Read `job.input`, classify it and write `job.output`.
    pub fn classify_batch(&self, job: &BatchJob) -> Result<BatchSummary> {
        let table = CommentTable::read_path(&job.input)
            .with_context(|| format!("Cannot read comments from '{}'", job.input.display()))?;
        tracing::info!("Classifying {} comments with the {} model", table.len(), self.variant());

        let headers = table.headers().to_vec();
        let (rows, summary) = self.classify_table(table, &job.categories);

        write_classified_path(&job.output, &headers, &rows)?;
        tracing::info!("Wrote {} rows to '{}'", rows.len(), job.output.display());
        Ok(summary)
    }

    /// Prompt for comments on `output`, reading lines from `input`,
    /// until "quit" or end of input. Returns how many were classified.
    pub fn run_interactive<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<usize> {
        run_interactive(self, self.confidence, input, output)
    }
}

impl CommentClassifier for ClassifyUseCase {
    fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        if self.confidence {
            classify_with_confidence(text, &self.pipeline, &self.replies)
        } else {
            Ok(classify(text, &self.pipeline, &self.replies))
        }
    }
}

fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("quit")
}

/// Interactive loop over any classifier. With `show_confidence`, a
/// result without probabilities prints the not-available notice.
pub fn run_interactive<C, R, W>(
    classifier:      &C,
    show_confidence: bool,
    mut input:       R,
    mut output:      W,
) -> Result<usize>
where
    C: CommentClassifier + ?Sized,
    R: BufRead,
    W: Write,
{
    writeln!(output, "Interactive Comment Categorization. Type 'quit' to exit.\n")?;

    let mut handled = 0usize;
    let mut line    = String::new();
    loop {
        write!(output, "Enter a comment: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 || is_quit(&line) {
            break;
        }
        let text = line.trim_end_matches(['\n', '\r']);

        let result = classifier.classify(text)?;
        write_result(&mut output, &result, show_confidence)?;
        writeln!(output)?;
        handled += 1;
    }
    Ok(handled)
}

/// Print a result as `Label:` / `Reply:` lines, followed by the top
/// probabilities or, when they were asked for but are absent, a notice.
pub fn write_result<W: Write>(
    mut output:      W,
    result:          &ClassificationResult,
    show_confidence: bool,
) -> std::io::Result<()> {
    writeln!(output, "Label: {}", result.label)?;
    writeln!(output, "Reply: {}", result.reply)?;
    match &result.probabilities {
        Some(probs) => {
            for (label, p) in probs.top(TOP_PROBABILITIES) {
                writeln!(output, "  {label:<24} {:>6.1}%", p * 100.0)?;
            }
        }
        None if show_confidence => writeln!(output, "{NO_CONFIDENCE_MESSAGE}")?,
        None => {}
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::{io::Cursor, path::Path};

    use crate::ml::pipeline::tests::toy_pipeline;

    fn use_case(variant: ModelVariant, confidence: bool) -> ClassifyUseCase {
        ClassifyUseCase::from_pipeline(Arc::new(toy_pipeline(variant)), confidence)
    }

    fn table(csv: &str) -> CommentTable {
        CommentTable::read_from(csv.as_bytes(), Path::new("mem")).unwrap()
    }

    fn interact(uc: &ClassifyUseCase, input: &str) -> (usize, String) {
        let mut out = Vec::new();
        let n = uc.run_interactive(Cursor::new(input), &mut out).unwrap();
        (n, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_table_rows_sorted_stably_by_label() {
        let uc = use_case(ModelVariant::Svm, false);
        let (rows, summary) = uc.classify_table(table("id,text\n1,good\n2,bad\n3,good\n4,bad\n"), &[]);

        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.fields[0].as_str(), r.predicted_label.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("2", "hate_abuse"), ("4", "hate_abuse"), ("1", "praise"), ("3", "praise")]
        );
        assert_eq!(summary.total, 4);
        assert_eq!(summary.categories_found, 2);
    }

    #[test]
    fn test_category_filter_keeps_summary_of_all_rows() {
        let uc = use_case(ModelVariant::Svm, false);
        let (rows, summary) = uc.classify_table(table("text\ngood\nbad\ngood\n"), &["praise".to_string()]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.predicted_label == "praise"));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.top_label.as_deref(), Some("praise"));
    }

    #[test]
    fn test_batch_writes_output_columns() {
        let dir   = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "author,text\nann,bad\nbob,good\n").unwrap();
        let job = BatchJob {
            input,
            output:     dir.path().join("out/categorized.csv"),
            categories: Vec::new(),
        };

        let summary = use_case(ModelVariant::Svm, false).classify_batch(&job).unwrap();
        assert_eq!(summary.total, 2);

        let written = std::fs::read_to_string(&job.output).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("author,text,predicted_label,suggested_reply"));
        assert!(lines.next().unwrap().starts_with("ann,bad,hate_abuse,"));
        assert!(lines.next().unwrap().starts_with("bob,good,praise,"));
    }

    #[test]
    fn test_batch_without_text_column_fails() {
        let dir   = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "comment\ngood\n").unwrap();
        let job = BatchJob { input, output: dir.path().join("out.csv"), categories: Vec::new() };
        assert!(use_case(ModelVariant::Svm, false).classify_batch(&job).is_err());
        assert!(!job.output.exists());
    }

    #[test]
    fn test_interactive_stops_on_quit() {
        let uc = use_case(ModelVariant::Svm, false);
        let (n, out) = interact(&uc, "good\n  QUIT  \nbad\n");
        assert_eq!(n, 1);
        assert!(out.contains("Label: praise"));
        assert!(out.contains("Reply: Thank you so much for your kind words and appreciation!"));
        assert!(!out.contains("hate_abuse"));
    }

    #[test]
    fn test_interactive_stops_on_eof() {
        let uc = use_case(ModelVariant::Svm, false);
        let (n, out) = interact(&uc, "bad\ngood");
        assert_eq!(n, 2);
        assert!(out.contains("Label: hate_abuse"));
        assert!(!out.contains(NO_CONFIDENCE_MESSAGE));
    }

    #[test]
    fn test_interactive_confidence_notice_for_svm() {
        let uc = use_case(ModelVariant::Svm, true);
        let (_, out) = interact(&uc, "good\nquit\n");
        assert!(out.contains(NO_CONFIDENCE_MESSAGE));
    }

    #[test]
    fn test_interactive_confidence_for_logistic() {
        let uc = use_case(ModelVariant::Logistic, true);
        let (_, out) = interact(&uc, "good\nquit\n");
        assert!(out.contains("%"));
        assert!(!out.contains(NO_CONFIDENCE_MESSAGE));
    }

    #[test]
    fn test_classifier_trait_honours_confidence_flag() {
        let plain = use_case(ModelVariant::Logistic, false).classify("good").unwrap();
        assert!(plain.probabilities.is_none());

        let rich = use_case(ModelVariant::Logistic, true).classify("good").unwrap();
        assert_eq!(rich.probabilities.unwrap().entries().len(), 2);
    }

    #[test]
    fn test_missing_model_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ClassifyConfig {
            model_dir: dir.path().to_string_lossy().into_owned(),
            ..ClassifyConfig::default()
        };
        let err = ClassifyUseCase::new(&cfg).err().unwrap();
        assert!(err.to_string().contains("run 'train' first"));
    }
}
