//! Medical-themed palette and the inline stylesheet served with every page.

use crate::domain::SeverityLevel;

/// Medical theme color palette (CSS hex).
pub struct MedicalTheme;

impl MedicalTheme {
    /// Deep teal - Primary color
    pub const PRIMARY: &'static str = "#0D9488";

    pub const PRIMARY_DARK: &'static str = "#0F766E";

    /// Slate - borders and secondary text
    pub const SECONDARY_LIGHT: &'static str = "#94A3B8";

    pub const BG_DARK: &'static str = "#0F172A";
    pub const BG_SURFACE: &'static str = "#1E293B";
    pub const BG_CARD: &'static str = "#334155";

    pub const TEXT_PRIMARY: &'static str = "#F8FAFC";
    pub const TEXT_MUTED: &'static str = "#64748B";

    /// Accent color for a severity level.
    #[must_use]
    pub fn severity(level: SeverityLevel) -> String {
        let (r, g, b) = level.color();
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    /// Full stylesheet for the page layout.
    #[must_use]
    pub fn stylesheet() -> String {
        format!(
            r#"* {{ box-sizing: border-box; }}
body {{ margin: 0; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: {bg}; color: {text}; line-height: 1.5; }}
header {{ background: {primary_dark}; padding: 14px 24px; }}
header a {{ color: {text}; text-decoration: none; font-weight: 700; }}
main {{ max-width: 880px; margin: 0 auto; padding: 24px; }}
h1 {{ margin-top: 0; }}
.card {{ background: {surface}; border: 1px solid {card}; border-radius: 8px; padding: 20px; margin-bottom: 20px; }}
.fields {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 12px 20px; }}
.field label {{ display: block; font-size: 0.9em; margin-bottom: 4px; }}
.field input {{ width: 100%; padding: 6px 8px; border-radius: 4px; border: 1px solid {border}; background: {bg}; color: {text}; }}
.button {{ display: inline-block; margin-top: 16px; padding: 8px 18px; border: 0; border-radius: 4px; background: {primary}; color: {text}; font-weight: 700; text-decoration: none; cursor: pointer; }}
.severity {{ font-size: 1.6em; font-weight: 700; }}
.muted {{ color: {muted}; }}
.disclaimer {{ border-top: 1px solid {border}; margin-top: 32px; padding-top: 12px; font-size: 0.85em; color: {muted}; }}
"#,
            bg = Self::BG_DARK,
            surface = Self::BG_SURFACE,
            card = Self::BG_CARD,
            text = Self::TEXT_PRIMARY,
            muted = Self::TEXT_MUTED,
            border = Self::SECONDARY_LIGHT,
            primary = Self::PRIMARY,
            primary_dark = Self::PRIMARY_DARK,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_color_hex() {
        assert_eq!(MedicalTheme::severity(SeverityLevel::NoEndometriosis), "#10B981");
        assert_eq!(MedicalTheme::severity(SeverityLevel::Severe), "#F43F5E");
    }
}
