// ============================================================
// Layer 4 — Comment Tables (batch input / output)
// ============================================================
// Batch classification reads a CSV with a `text` column and
// writes the same table back with two extra columns:
//
//   ...original columns..., predicted_label, suggested_reply
//
// Every original column is carried through untouched, so the
// output can be joined back to whatever produced the input.

use std::{
    fs::{self, File},
    io::{Read, Write},
    path::Path,
};

use csv::{ReaderBuilder, WriterBuilder};

use crate::data::loader::{column_index, TEXT_COLUMN};
use crate::domain::error::DataError;

pub const PREDICTED_LABEL_COLUMN: &str = "predicted_label";
pub const SUGGESTED_REPLY_COLUMN: &str = "suggested_reply";

/// An input table of comments awaiting classification.
#[derive(Debug, Clone)]
pub struct CommentTable {
    headers:  Vec<String>,
    rows:     Vec<Vec<String>>,
    text_idx: usize,
}

impl CommentTable {
    pub fn read_path(path: &Path) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|e| DataError::Unreadable {
            path:   path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::read_from(file, path)
    }

    pub fn read_from<R: Read>(reader: R, origin: &Path) -> Result<Self, DataError> {
        let unreadable = |e: csv::Error| DataError::Unreadable {
            path:   origin.to_path_buf(),
            reason: e.to_string(),
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header_record = rdr.headers().map_err(unreadable)?.clone();
        let text_idx      = column_index(&header_record, TEXT_COLUMN)?;
        let headers: Vec<String> = header_record.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(unreadable)?;
            // Pad short rows so every row has one field per header
            let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
            fields.resize(headers.len().max(fields.len()), String::new());
            rows.push(fields);
        }

        Ok(Self { headers, rows, text_idx })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text of row `i`. Missing values come back as "".
    pub fn text(&self, i: usize) -> &str {
        self.rows[i].get(self.text_idx).map(String::as_str).unwrap_or_default()
    }

    /// Consume the table, yielding each row's fields.
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

/// One output row: the original fields plus the prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    pub fields:          Vec<String>,
    pub predicted_label: String,
    pub suggested_reply: String,
}

/// Write classified rows as CSV, appending the two prediction columns.
pub fn write_classified<W: Write>(
    writer:  W,
    headers: &[String],
    rows:    &[ClassifiedRow],
) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);

    let mut header_row: Vec<&str> = headers.iter().map(String::as_str).collect();
    header_row.push(PREDICTED_LABEL_COLUMN);
    header_row.push(SUGGESTED_REPLY_COLUMN);
    wtr.write_record(&header_row)?;

    for row in rows {
        let mut out: Vec<&str> = row.fields.iter().map(String::as_str).collect();
        out.push(&row.predicted_label);
        out.push(&row.suggested_reply);
        wtr.write_record(&out)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write classified rows to `path`, creating parent directories.
pub fn write_classified_path(
    path:    &Path,
    headers: &[String],
    rows:    &[ClassifiedRow],
) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    write_classified(file, headers, rows)
        .with_context(|| format!("Cannot write '{}'", path.display()))?;
    Ok(())
}
