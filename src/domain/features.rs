//! Symptom feature vector.
//!
//! The screening models were trained on 22 questionnaire items. The order of
//! `FEATURE_NAMES` is the column order used at training time and must never
//! be changed without re-exporting every model artifact.

/// Number of symptom features expected by every model stage.
pub const FEATURE_COUNT: usize = 22;

/// Questionnaire items, in model column order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Ovarian cysts",
    "Bloating",
    "Infertility",
    "Abnormal uterine bleeding",
    "Vaginal Pain/Pressure",
    "Sharp / Stabbing pain",
    "Pain after Intercourse",
    "Prolonged/Excessive bleeding",
    "Frequent Menstrual clots",
    "Painful ovulation",
    "Fatigue / Chronic fatigue",
    "Irritable Bowel Syndrome (IBS)",
    "Long menstruation",
    "Painful urination",
    "Pain / Chronic pain",
    "Painful bowel movements",
    "Irregular / Missed periods",
    "Pelvic pain",
    "Abdominal Cramps during Intercourse",
    "Stomach cramping",
    "Painful / Burning pain during sex (Dyspareunia)",
    "Menstrual pain (Dysmenorrhea)",
];

/// Errors raised while assembling a feature vector from submitted values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    /// A declared feature was not submitted at all.
    #[error("Missing input for feature: {0}")]
    Missing(&'static str),

    /// A submitted value is not a floating-point number.
    #[error("could not convert string to float for '{feature}': '{value}'")]
    Parse {
        feature: &'static str,
        value: String,
    },
}

/// Ordered symptom scores, exactly one per entry of [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build a vector from already-parsed values in model column order.
    #[must_use]
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Assemble the vector by looking up every declared feature by name.
    ///
    /// Features are visited in column order, so the first absent or
    /// unparsable feature is the one reported.
    ///
    /// # Errors
    /// Returns `FeatureError::Missing` if `lookup` yields nothing for a
    /// feature, `FeatureError::Parse` if its value is not a float.
    pub fn from_lookup<'a, F>(mut lookup: F) -> Result<Self, FeatureError>
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, &feature) in values.iter_mut().zip(FEATURE_NAMES.iter()) {
            let raw = lookup(feature).ok_or(FeatureError::Missing(feature))?;
            *slot = parse_score(raw).ok_or_else(|| FeatureError::Parse {
                feature,
                value: raw.to_string(),
            })?;
        }
        Ok(Self(values))
    }

    /// Assemble the vector from decoded form pairs.
    ///
    /// When a key is submitted more than once the first occurrence wins.
    ///
    /// # Errors
    /// See [`FeatureVector::from_lookup`].
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, FeatureError> {
        Self::from_lookup(|name| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        })
    }

    /// Values in model column order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Parse one submitted score.
///
/// Surrounding whitespace is ignored. `nan` and `inf` spellings are accepted
/// here and rejected later by the models as non-finite input.
fn parse_score(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}
