// ============================================================
// Layer 2 — Batch Analytics
// ============================================================
// Aggregates over the predicted labels of one batch run:
// total rows, count per label, distinct labels and the most
// frequent label. Computed over every classified row, before
// any category filter is applied to the written output.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total:            usize,
    pub counts:           BTreeMap<String, usize>,
    pub categories_found: usize,
    /// Most frequent label; ties go to the label that sorts first.
    pub top_label:        Option<String>,
}

impl BatchSummary {
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut total = 0usize;
        for label in labels {
            *counts.entry(label.to_string()).or_default() += 1;
            total += 1;
        }

        let top_label = counts
            .iter()
            .max_by(|(la, ca), (lb, cb)| ca.cmp(cb).then_with(|| lb.cmp(la)))
            .map(|(label, _)| label.clone());

        Self {
            total,
            categories_found: counts.len(),
            counts,
            top_label,
        }
    }

    /// The `n` most frequent labels, count descending then label ascending.
    pub fn top_labels(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> =
            self.counts.iter().map(|(l, &c)| (l.as_str(), c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total comments:   {}", self.total)?;
        writeln!(f, "Categories found: {}", self.categories_found)?;
        writeln!(f, "Top category:     {}", self.top_label.as_deref().unwrap_or("-"))?;
        for (label, count) in self.top_labels(self.counts.len()) {
            writeln!(f, "  {label:<24} {count}")?;
        }
        Ok(())
    }
}
