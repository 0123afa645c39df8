//! Ports layer: Trait definitions for model stages.
//!
//! The application only sees these narrow interfaces; concrete model
//! families live in `adapters`.

mod predictor;

pub use predictor::{FeatureScaler, Predictor};
