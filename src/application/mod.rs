// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal (training the pipelines or classifying comments).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No argument parsing here (that's Layer 1)
//   - No direct file formats (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Aggregates over a classified batch
pub mod analytics;

// Single comment, batch and interactive classification
pub mod classify_use_case;

// The training workflow
pub mod train_use_case;
