// ============================================================
// Layer 6 — Validation Metrics
// ============================================================
// Per-class precision / recall / F1 / support over the held
// out validation split, plus accuracy and the macro and
// support-weighted averages.
//
// The report is logged after each fit and written as CSV next
// to the artifact:
//
//   label,precision,recall,f1,support
//   hate_abuse,0.910000,0.870000,0.889500,23
//   praise,0.850000,0.900000,0.874300,20
//   ...
//   accuracy,,,0.883700,43
//   macro avg,0.880000,0.885000,0.881900,43
//   weighted avg,0.881000,0.883700,0.882000,43
//
// Undefined ratios (no predictions or no support) are 0.

use std::{
    fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label:     String,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes:      Vec<ClassMetrics>,
    pub accuracy:     f64,
    pub macro_avg:    (f64, f64, f64),
    pub weighted_avg: (f64, f64, f64),
    pub total:        usize,
}

impl ClassificationReport {
    /// Build a report for `classes` from parallel truth / prediction slices.
    pub fn from_predictions<S: AsRef<str>>(classes: &[String], truth: &[S], predicted: &[S]) -> Self {
        let total   = truth.len();
        let correct = truth
            .iter()
            .zip(predicted)
            .filter(|(t, p)| t.as_ref() == p.as_ref())
            .count();

        let per_class: Vec<ClassMetrics> = classes
            .iter()
            .map(|label| {
                let label = label.as_str();
                let mut tp = 0usize;
                let mut fp = 0usize;
                let mut fn_ = 0usize;
                for (t, p) in truth.iter().zip(predicted) {
                    match (t.as_ref() == label, p.as_ref() == label) {
                        (true, true)   => tp += 1,
                        (false, true)  => fp += 1,
                        (true, false)  => fn_ += 1,
                        (false, false) => {}
                    }
                }
                let precision = ratio(tp, tp + fp);
                let recall    = ratio(tp, tp + fn_);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics { label: label.to_string(), precision, recall, f1, support: tp + fn_ }
            })
            .collect();

        let n_classes = per_class.len().max(1) as f64;
        let macro_avg = (
            per_class.iter().map(|m| m.precision).sum::<f64>() / n_classes,
            per_class.iter().map(|m| m.recall).sum::<f64>() / n_classes,
            per_class.iter().map(|m| m.f1).sum::<f64>() / n_classes,
        );

        let support_total = per_class.iter().map(|m| m.support).sum::<usize>().max(1) as f64;
        let weighted = |f: fn(&ClassMetrics) -> f64| {
            per_class.iter().map(|m| f(m) * m.support as f64).sum::<f64>() / support_total
        };
        let weighted_avg = (weighted(|m| m.precision), weighted(|m| m.recall), weighted(|m| m.f1));

        Self {
            classes: per_class,
            accuracy: ratio(correct, total),
            macro_avg,
            weighted_avg,
            total,
        }
    }

    #[cfg(test)]
    pub fn metrics_for(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|m| m.label == label)
    }

    /// Write the report as CSV: one row per class, then the summary rows.
    /// Labels go through the csv writer, so commas and quotes are escaped.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["label", "precision", "recall", "f1", "support"])?;

        for m in &self.classes {
            wtr.write_record([
                m.label.clone(),
                format!("{:.6}", m.precision),
                format!("{:.6}", m.recall),
                format!("{:.6}", m.f1),
                m.support.to_string(),
            ])?;
        }

        let total = self.total.to_string();
        wtr.write_record(["accuracy", "", "", format!("{:.6}", self.accuracy).as_str(), total.as_str()])?;
        for (name, (p, r, f)) in [("macro avg", self.macro_avg), ("weighted avg", self.weighted_avg)] {
            wtr.write_record([
                name.to_string(),
                format!("{p:.6}"),
                format!("{r:.6}"),
                format!("{f:.6}"),
                total.clone(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|m| m.label.len())
            .max()
            .unwrap_or(0)
            .max("weighted avg".len());

        writeln!(f, "{:>width$} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for m in &self.classes {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>width$} {:>9} {:>9} {:>9.2} {:>9}", "accuracy", "", "", self.accuracy, self.total)?;
        let (p, r, s) = self.macro_avg;
        writeln!(f, "{:>width$} {p:>9.2} {r:>9.2} {s:>9.2} {:>9}", "macro avg", self.total)?;
        let (p, r, s) = self.weighted_avg;
        write!(f, "{:>width$} {p:>9.2} {r:>9.2} {s:>9.2} {:>9}", "weighted avg", self.total)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Writes per-variant validation reports into the model directory.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create report directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Write `{dir}/{name}_report.csv`, replacing any previous run.
    pub fn write(&self, name: &str, report: &ClassificationReport) -> Result<PathBuf> {
        let path = self.dir.join(format!("{name}_report.csv"));
        let file = File::create(&path)
            .with_context(|| format!("Cannot create report '{}'", path.display()))?;
        report
            .write_csv(file)
            .with_context(|| format!("Cannot write report '{}'", path.display()))?;
        tracing::debug!("Wrote validation report to '{}'", path.display());
        Ok(path)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> Vec<String> {
        vec!["hate_abuse".into(), "praise".into()]
    }

    fn to_csv(report: &ClassificationReport) -> String {
        let mut buf = Vec::new();
        report.write_csv(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_perfect_predictions() {
        let truth = ["praise", "hate_abuse", "praise"];
        let r     = ClassificationReport::from_predictions(&classes(), &truth, &truth);
        assert_eq!(r.accuracy, 1.0);
        assert_eq!(r.metrics_for("praise").unwrap().support, 2);
        assert_eq!(r.metrics_for("praise").unwrap().f1, 1.0);
    }

    #[test]
    fn test_mixed_predictions() {
        let truth = ["praise", "praise", "hate_abuse", "hate_abuse"];
        let pred  = ["praise", "hate_abuse", "hate_abuse", "hate_abuse"];
        let r     = ClassificationReport::from_predictions(&classes(), &truth, &pred);

        let praise = r.metrics_for("praise").unwrap();
        assert_eq!(praise.precision, 1.0);
        assert_eq!(praise.recall, 0.5);

        let hate = r.metrics_for("hate_abuse").unwrap();
        assert!((hate.precision - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(hate.recall, 1.0);
        assert_eq!(r.accuracy, 0.75);
    }

    #[test]
    fn test_class_never_predicted_scores_zero() {
        let truth = ["praise", "hate_abuse"];
        let pred  = ["hate_abuse", "hate_abuse"];
        let r     = ClassificationReport::from_predictions(&classes(), &truth, &pred);
        let praise = r.metrics_for("praise").unwrap();
        assert_eq!(praise.precision, 0.0);
        assert_eq!(praise.f1, 0.0);
    }

    #[test]
    fn test_csv_and_display() {
        let truth = ["praise", "hate_abuse"];
        let r     = ClassificationReport::from_predictions(&classes(), &truth, &truth);
        let csv   = to_csv(&r);
        assert!(csv.starts_with("label,precision,recall,f1,support\n"));
        assert!(csv.contains("praise,1.000000,1.000000,1.000000,1\n"));
        assert!(r.to_string().contains("weighted avg"));
    }

    #[test]
    fn test_writer_creates_file() {
        let dir    = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        let truth  = ["praise"];
        let r      = ClassificationReport::from_predictions(&classes(), &truth, &truth);
        let path   = writer.write("svm", &r).unwrap();
        assert!(path.ends_with("svm_report.csv"));
        assert!(fs::read_to_string(path).unwrap().contains("praise"));
    }

    #[test]
    fn test_csv_escapes_commas_and_quotes_in_labels() {
        let classes = vec!["a,b".to_string(), "say \"hi\"".to_string()];
        let truth   = ["a,b", "say \"hi\"", "a,b"];
        let pred    = ["a,b", "a,b", "a,b"];
        let r       = ClassificationReport::from_predictions(&classes, &truth, &pred);

        let dir    = tempfile::tempdir().unwrap();
        let path   = ReportWriter::new(dir.path()).unwrap().write("logistic", &r).unwrap();
        let mut rd = csv::Reader::from_path(&path).unwrap();

        let records: Vec<csv::StringRecord> = rd.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| r.len() == 5));
        assert_eq!(&records[0][0], "a,b");
        assert_eq!(&records[0][4], "2");
        assert_eq!(&records[1][0], "say \"hi\"");
        assert_eq!(&records[2][0], "accuracy");
        assert_eq!(&records[2][1], "");
    }
}
