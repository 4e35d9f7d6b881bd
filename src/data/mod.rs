// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between CSV files on disk and tensors fed to the
// optimiser:
//
//   corpus .csv
//       │
//       ▼
//   CsvCorpusLoader   → labelled examples, null rows dropped
//       │
//       ▼
//   stratified_split  → seeded 80/20 train / validation
//       │
//       ▼
//   Preprocessor      → lowercase, tokens, stop words, n-grams
//       │
//       ▼
//   FeatureDataset    → sparse TF-IDF rows + balanced weights
//       │
//       ▼
//   FeatureBatcher    → dense tensor batches
//
// Batch classification reads and writes through CommentTable.
//
// Reference: Burn Book §4 (Datasets)
//            Rust Book §13 (Iterators and Closures)

/// Dense tensor batches from sparse rows
pub mod batcher;

/// Vectorised training rows
pub mod dataset;

/// Labelled corpus loading
pub mod loader;

/// Tokenisation into unigram / bigram terms
pub mod preprocessor;

/// Stratified train/validation split
pub mod splitter;

/// Batch classification input/output tables
pub mod table;
