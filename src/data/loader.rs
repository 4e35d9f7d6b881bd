// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads the labelled training corpus from a CSV file.
//
// Expected layout (header row required, extra columns ignored):
//
//   text,label
//   "Loved every second of this!",praise
//   "Buy cheap followers at ...",spam_irrelevant
//
// Rows are dropped (with a warning count) when:
//   - the text field is missing or empty
//   - the label field is missing or blank
//
// A missing `text` or `label` column is a DataError: the
// whole file is rejected before any row is read.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use csv::ReaderBuilder;

use crate::domain::comment::TrainingExample;
use crate::domain::error::DataError;
use crate::domain::traits::CorpusSource;

pub const TEXT_COLUMN:  &str = "text";
pub const LABEL_COLUMN: &str = "label";

/// Reads training examples from a CSV file on disk.
/// Implements the CorpusSource trait from Layer 3.
pub struct CsvCorpusLoader {
    path: PathBuf,
}

impl CsvCorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for CsvCorpusLoader {
    fn load_examples(&self) -> Result<Vec<TrainingExample>, DataError> {
        let file = File::open(&self.path).map_err(|e| DataError::Unreadable {
            path:   self.path.clone(),
            reason: e.to_string(),
        })?;

        let examples = read_examples(file, &self.path)?;
        tracing::info!(
            "Loaded {} labelled comments from '{}'",
            examples.len(),
            self.path.display()
        );
        Ok(examples)
    }
}

/// Parse labelled examples from any CSV reader.
/// `origin` is only used in error messages.
pub fn read_examples<R: Read>(reader: R, origin: &Path) -> Result<Vec<TrainingExample>, DataError> {
    let unreadable = |e: csv::Error| DataError::Unreadable {
        path:   origin.to_path_buf(),
        reason: e.to_string(),
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers   = rdr.headers().map_err(unreadable)?.clone();
    let text_idx  = column_index(&headers, TEXT_COLUMN)?;
    let label_idx = column_index(&headers, LABEL_COLUMN)?;

    let mut examples = Vec::new();
    let mut dropped  = 0usize;

    for record in rdr.records() {
        let record = record.map_err(unreadable)?;

        let text  = record.get(text_idx).unwrap_or_default();
        let label = record.get(label_idx).unwrap_or_default().trim();

        // Empty CSV fields are the nulls of this format
        if text.is_empty() || label.is_empty() {
            dropped += 1;
            continue;
        }

        examples.push(TrainingExample::new(text, label));
    }

    if dropped > 0 {
        tracing::warn!("Dropped {} row(s) with missing text or label", dropped);
    }

    Ok(examples)
}

/// Position of `name` in the header row (surrounding whitespace ignored).
pub fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or(DataError::MissingColumn { column: name })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> Result<Vec<TrainingExample>, DataError> {
        read_examples(csv.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn test_reads_text_and_label() {
        let rows = parse("text,label\nGreat video,praise\nGo away,hate_abuse\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], TrainingExample::new("Great video", "praise"));
    }

    #[test]
    fn test_drops_rows_with_missing_fields() {
        let csv  = "text,label\n,praise\nHello,\nFine,support\nOnly text\n";
        let rows = parse(csv).unwrap();
        assert_eq!(rows, vec![TrainingExample::new("Fine", "support")]);
    }

    #[test]
    fn test_extra_columns_and_order_are_ignored() {
        let csv  = "id,label,text\n1,praise,\"Nice, really nice\"\n";
        let rows = parse(csv).unwrap();
        assert_eq!(rows[0].text, "Nice, really nice");
        assert_eq!(rows[0].label, "praise");
    }

    #[test]
    fn test_missing_label_column_is_rejected() {
        let err = parse("text,category\nhi,praise\n").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { column: "label" }));
    }

    #[test]
    fn test_missing_text_column_is_rejected() {
        let err = parse("comment,label\nhi,praise\n").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { column: "text" }));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let loader = CsvCorpusLoader::new("definitely/not/here.csv");
        assert!(matches!(
            loader.load_examples(),
            Err(DataError::Unreadable { .. })
        ));
    }
}
