//! Application layer: Use cases and services.
//!
//! Orchestrates the model ports into the screening pipeline served by the
//! web layer.

mod prediction;

pub use prediction::{PredictError, PredictionService, SklearnPredictionService};

#[cfg(test)]
pub(crate) use prediction::test_support;
