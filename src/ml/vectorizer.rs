// ============================================================
// Layer 5 — TF-IDF Vectorizer
// ============================================================
// Learns a bounded vocabulary of unigrams and bigrams from the
// training texts and maps any text to a sparse TF-IDF vector.
//
// fit():
//   1. count document frequency and total count of every term
//   2. drop terms seen in fewer than `min_df` documents
//   3. keep the `max_features` most frequent terms
//      (ties broken by term, ascending)
//   4. index the survivors in term order
//   5. idf(t) = ln((1 + n) / (1 + df(t))) + 1
//
// transform():
//   raw count × idf for every in-vocabulary term, then the
//   vector is scaled to unit L2 norm. Unknown terms are ignored;
//   the vocabulary never changes after fit.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::data::dataset::SparseVector;
use crate::data::preprocessor::Preprocessor;
use crate::domain::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub max_features:      usize,
    pub min_df:            usize,
    pub max_ngram:         usize,
    pub remove_stop_words: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features:      8000,
            min_df:            1,
            max_ngram:         2,
            remove_stop_words: true,
        }
    }
}

/// A fitted TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config:     VectorizerConfig,
    vocabulary: BTreeMap<String, u32>,
    idf:        Vec<f32>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and IDF weights from `documents`.
    pub fn fit<S: AsRef<str>>(config: VectorizerConfig, documents: &[S]) -> Result<Self, DataError> {
        let preprocessor = preprocessor_for(&config);

        let mut doc_freq:   HashMap<String, usize> = HashMap::new();
        let mut term_count: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = preprocessor.terms(doc.as_ref());
            let mut seen = HashSet::new();
            for term in terms {
                *term_count.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.clone()) {
                    *doc_freq.entry(term).or_insert(0) += 1;
                }
            }
        }

        let mut candidates: Vec<(String, usize)> = term_count
            .into_iter()
            .filter(|(term, _)| doc_freq[term] >= config.min_df)
            .collect();

        if candidates.is_empty() {
            return Err(DataError::EmptyVocabulary { min_df: config.min_df });
        }

        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        candidates.truncate(config.max_features);

        // BTreeMap keeps the index assignment in term order
        let kept: BTreeMap<String, usize> = candidates
            .into_iter()
            .map(|(term, _)| {
                let df = doc_freq[&term];
                (term, df)
            })
            .collect();

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf        = Vec::with_capacity(kept.len());
        for (i, (term, df)) in kept.into_iter().enumerate() {
            idf.push((((1.0 + n) / (1.0 + df as f64)).ln() + 1.0) as f32);
            vocabulary.insert(term, i as u32);
        }

        tracing::debug!(
            "Vectorizer fitted on {} documents: {} features (cap {})",
            documents.len(),
            vocabulary.len(),
            config.max_features
        );

        Ok(Self { config, vocabulary, idf })
    }

    /// Sparse, L2-normalised TF-IDF vector for `text`.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<u32, f32> = BTreeMap::new();
        for term in preprocessor_for(&self.config).terms(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut vector = SparseVector {
            indices: Vec::with_capacity(counts.len()),
            values:  Vec::with_capacity(counts.len()),
        };
        for (idx, count) in counts {
            vector.indices.push(idx);
            vector.values.push(count * self.idf[idx as usize]);
        }

        let norm = vector.norm();
        if norm > 0.0 {
            vector.values.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[cfg(test)]
    pub fn index_of(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    /// Internal consistency: one IDF weight per vocabulary entry.
    pub fn is_consistent(&self) -> bool {
        self.idf.len() == self.vocabulary.len()
            && self.vocabulary.values().all(|&i| (i as usize) < self.idf.len())
    }
}

fn preprocessor_for(config: &VectorizerConfig) -> Preprocessor {
    Preprocessor::new()
        .with_stop_words(config.remove_stop_words)
        .with_max_ngram(config.max_ngram)
}
