// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence that no single business layer owns:
//
//   artifact_store.rs — Saving and loading fitted pipelines
//                       One bincode file per variant plus the
//                       TrainConfig as JSON, all inside the
//                       model directory.
//
//   metrics.rs        — Validation metrics
//                       Per-class precision / recall / F1 on
//                       the held out split, logged and written
//                       to CSV after each fit.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Pipeline artifact persistence
pub mod artifact_store;

/// Classification report and CSV writer
pub mod metrics;
