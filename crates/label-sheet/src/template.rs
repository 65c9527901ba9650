//! Label templates and field resolution
//!
//! A template carries per-cell field values; the job carries defaults
//! that fill in whatever a template leaves empty. Numeric-looking
//! fields (price, quantity) are sanitized and checked for digits;
//! an empty string is a valid "absent" value, not a parse error.

/// One template's field values. Every field is optional; missing or
/// empty fields fall back to the job-level defaults.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LabelTemplate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub extra: Option<String>,
}

/// Job-level default field values, applied where a template is silent
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldDefaults {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub extra: Option<String>,
}

/// Effective field values for one cell, after default fallback
#[derive(Debug, Clone, PartialEq)]
pub struct LabelContent {
    pub title: String,
    pub subtitle: String,
    pub price: String,
    pub quantity: String,
    pub extra: String,
}

impl LabelContent {
    /// Resolve a template against the job defaults. A field falls back
    /// only when the template value is missing or empty.
    pub fn resolve(template: &LabelTemplate, defaults: &FieldDefaults) -> Self {
        Self {
            title: effective(&template.title, &defaults.title),
            subtitle: effective(&template.subtitle, &defaults.subtitle),
            price: effective(&template.price, &defaults.price),
            quantity: effective(&template.quantity, &defaults.quantity),
            extra: effective(&template.extra, &defaults.extra),
        }
    }
}

fn effective(field: &Option<String>, fallback: &Option<String>) -> String {
    match field {
        Some(v) if !v.is_empty() => v.clone(),
        _ => fallback.clone().unwrap_or_default(),
    }
}

/// Strip whitespace and thousands separators from a price value
pub fn sanitize_price(raw: &str) -> String {
    raw.chars().filter(|c| *c != ' ' && *c != ',').collect()
}

/// Strip whitespace and multiplier glyphs from a quantity value
pub fn sanitize_quantity(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != ' ' && *c != '×' && *c != 'x')
        .collect()
}

/// True when the string is non-empty and all ASCII digits
pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_price() {
        assert_eq!(sanitize_price("1,000"), "1000");
        assert_eq!(sanitize_price("1 500"), "1500");
        assert_eq!(sanitize_price(""), "");
    }

    #[test]
    fn test_sanitize_quantity() {
        assert_eq!(sanitize_quantity("×3"), "3");
        assert_eq!(sanitize_quantity("x 12"), "12");
        assert_eq!(sanitize_quantity("3"), "3");
    }

    #[test]
    fn test_is_digits() {
        assert!(is_digits("1500"));
        assert!(!is_digits(""));
        assert!(!is_digits("15a0"));
    }

    #[test]
    fn test_resolve_prefers_template_fields() {
        let template = LabelTemplate {
            title: Some("Oud Royal".into()),
            price: Some("1500".into()),
            ..Default::default()
        };
        let defaults = FieldDefaults {
            title: Some("House Blend".into()),
            subtitle: Some("Shop A".into()),
            ..Default::default()
        };

        let content = LabelContent::resolve(&template, &defaults);
        assert_eq!(content.title, "Oud Royal");
        assert_eq!(content.subtitle, "Shop A");
        assert_eq!(content.price, "1500");
        assert_eq!(content.quantity, "");
    }

    #[test]
    fn test_resolve_empty_string_falls_back() {
        let template = LabelTemplate {
            title: Some(String::new()),
            ..Default::default()
        };
        let defaults = FieldDefaults {
            title: Some("House Blend".into()),
            ..Default::default()
        };

        let content = LabelContent::resolve(&template, &defaults);
        assert_eq!(content.title, "House Blend");
    }
}
