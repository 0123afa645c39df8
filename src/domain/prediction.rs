//! Screening result types.
//!
//! Maps the integer codes produced by the model stages to the labels shown
//! to the user.

/// Classifier code meaning "endometriosis present".
pub const PRESENT_CODE: i64 = 1;

/// Recommendation shown when the classifier does not indicate presence.
pub const UNKNOWN_DISEASE: &str = "Unknown Disease";

/// Severity assigned by the severity clustering stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityLevel {
    NoEndometriosis,
    Minimal,
    Mild,
    Moderate,
    Severe,
}

impl SeverityLevel {
    /// All levels in code order.
    pub const ALL: [Self; 5] = [
        Self::NoEndometriosis,
        Self::Minimal,
        Self::Mild,
        Self::Moderate,
        Self::Severe,
    ];

    /// Look up the level for a severity code (0-4).
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx))
            .copied()
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoEndometriosis => "No Endometriosis",
            Self::Minimal => "Minimal",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }

    /// Accent color for the result page (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::NoEndometriosis => (16, 185, 129), // Emerald (#10B981)
            Self::Minimal => (56, 189, 248),         // Sky (#38BDF8)
            Self::Mild => (251, 191, 36),            // Amber (#FBBF24)
            Self::Moderate => (249, 115, 22),        // Orange (#F97316)
            Self::Severe => (244, 63, 94),           // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Condition associated with a disease cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociatedDisease {
    PolycysticOvarySyndrome,
    UterineFibroids,
    PelvicInflammatoryDisease,
    ChronicFatigueSyndrome,
    InterstitialCystitis,
    Adenomyosis,
}

impl AssociatedDisease {
    /// All conditions in cluster-id order.
    pub const ALL: [Self; 6] = [
        Self::PolycysticOvarySyndrome,
        Self::UterineFibroids,
        Self::PelvicInflammatoryDisease,
        Self::ChronicFatigueSyndrome,
        Self::InterstitialCystitis,
        Self::Adenomyosis,
    ];

    /// Look up the condition for a disease cluster id (0-5).
    #[must_use]
    pub fn from_cluster(cluster: i64) -> Option<Self> {
        usize::try_from(cluster)
            .ok()
            .and_then(|idx| Self::ALL.get(idx))
            .copied()
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::PolycysticOvarySyndrome => "Polycystic Ovary Syndrome (PCOS)",
            Self::UterineFibroids => "Uterine Fibroids",
            Self::PelvicInflammatoryDisease => "Pelvic Inflammatory Disease (PID)",
            Self::ChronicFatigueSyndrome => "Chronic Fatigue Syndrome (CFS)",
            Self::InterstitialCystitis => "Interstitial Cystitis",
            Self::Adenomyosis => "Adenomyosis",
        }
    }
}

impl std::fmt::Display for AssociatedDisease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one screening request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    /// Raw classifier output.
    pub classifier_code: i64,

    /// Recommended conditions. Empty when the disease cluster id has no
    /// mapped condition.
    pub recommended_diseases: Vec<&'static str>,

    /// Severity shown to the user.
    pub severity: SeverityLevel,
}

impl Prediction {
    /// Result for a classifier code other than [`PRESENT_CODE`].
    #[must_use]
    pub fn absent(classifier_code: i64) -> Self {
        Self {
            classifier_code,
            recommended_diseases: vec![UNKNOWN_DISEASE],
            severity: SeverityLevel::NoEndometriosis,
        }
    }

    /// Result when presence is indicated and both clusters are resolved.
    #[must_use]
    pub fn present(disease: Option<AssociatedDisease>, severity: SeverityLevel) -> Self {
        Self {
            classifier_code: PRESENT_CODE,
            recommended_diseases: disease.iter().map(AssociatedDisease::label).collect(),
            severity,
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.classifier_code == PRESENT_CODE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_codes() {
        assert_eq!(SeverityLevel::from_code(0), Some(SeverityLevel::NoEndometriosis));
        assert_eq!(SeverityLevel::from_code(4), Some(SeverityLevel::Severe));
        assert_eq!(SeverityLevel::from_code(5), None);
        assert_eq!(SeverityLevel::from_code(-1), None);

        for (code, level) in SeverityLevel::ALL.into_iter().enumerate() {
            assert_eq!(SeverityLevel::from_code(code as i64), Some(level));
        }
    }

    #[test]
    fn test_disease_clusters() {
        assert_eq!(
            AssociatedDisease::from_cluster(0).map(|d| d.label()),
            Some("Polycystic Ovary Syndrome (PCOS)")
        );
        assert_eq!(
            AssociatedDisease::from_cluster(5).map(|d| d.label()),
            Some("Adenomyosis")
        );
        assert_eq!(AssociatedDisease::from_cluster(6), None);
        assert_eq!(AssociatedDisease::from_cluster(i64::MIN), None);
    }

    #[test]
    fn test_absent_prediction_ignores_code() {
        for code in [0, 2, 3, -7] {
            let prediction = Prediction::absent(code);
            assert_eq!(prediction.recommended_diseases, vec!["Unknown Disease"]);
            assert_eq!(prediction.severity.label(), "No Endometriosis");
            assert_eq!(prediction.classifier_code, code);
            assert!(!prediction.is_present());
        }
    }

    #[test]
    fn test_present_prediction_with_unmapped_cluster() {
        let prediction = Prediction::present(None, SeverityLevel::Mild);
        assert!(prediction.recommended_diseases.is_empty());
        assert!(prediction.is_present());
        assert_eq!(prediction.severity.to_string(), "Mild");
    }
}
