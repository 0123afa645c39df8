//! # Endoscreen
//!
//! Endometriosis symptom screening served as a small web application.
//!
//! This crate provides:
//! - Native evaluation of exported scikit-learn models (scaler, stacking
//!   classifier, k-means)
//! - The screening pipeline mapping model codes to disease and severity labels
//! - An HTML front end with a form-encoded inference endpoint
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (features, predictions, label tables)
//! - `ports`: Trait definitions for the model stages
//! - `adapters`: Concrete implementations (sklearn exports, log sanitizer)
//! - `application`: The prediction use case
//! - `web`: HTTP routes and pages

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod web;

pub use domain::{FeatureVector, Prediction, SeverityLevel};

/// Result type for Endoscreen operations
pub type Result<T> = std::result::Result<T, EndoscreenError>;

/// Main error type for Endoscreen
#[derive(Debug, thiserror::Error)]
pub enum EndoscreenError {
    #[error("Model artifacts unavailable: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
