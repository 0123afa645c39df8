//! Domain layer: Core screening types.
//!
//! Pure Rust types with no I/O. The feature order and the code-to-label
//! tables are fixed at compile time.

mod features;
mod model;
mod prediction;

pub use features::{FeatureError, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use model::ModelError;
pub use prediction::{
    AssociatedDisease, Prediction, SeverityLevel, PRESENT_CODE, UNKNOWN_DISEASE,
};
