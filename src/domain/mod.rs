// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define the core
// concepts of the system: comments, labels, replies, variants
// and the error taxonomy.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//   - Only plain data, traits and pure functions
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Training examples and classification results
pub mod comment;

// Typed errors shared by the library layers
pub mod error;

// Label → reply lookup
pub mod replies;

// Core abstractions (traits) that other layers implement
pub mod traits;

// The two classifier variants
pub mod variant;
