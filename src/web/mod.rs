//! Web module: HTML front end served with axum.
//!
//! Provides:
//! - Landing page and symptom form
//! - Inference endpoint rendering the screening result
//! - Inline-styled pages with no external assets

mod app;
mod pages;
mod styles;

pub use app::{router, serve, AppState};
pub use styles::MedicalTheme;
