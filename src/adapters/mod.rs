//! Adapters layer: Concrete implementations of ports.
//!
//! - `sklearn`: native evaluation of the exported scikit-learn models
//! - `sanitize`: symptom-data filtering for logs

pub mod sanitize;
pub mod sklearn;

// Re-export artifact error for lib.rs
pub use sklearn::ArtifactError;
