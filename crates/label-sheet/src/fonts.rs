//! Font resolution
//!
//! The catalog is an explicit capability table passed into each render:
//! builtin base-14 families are always registered, TTF families can be
//! added at startup, and one family may be designated Arabic-capable.
//! The catalog stores raw TTF bytes so it stays cheap to clone and safe
//! to move into a blocking render task; parsing happens once per render
//! pass. Resolution is a pure decision per text field: Arabic-range
//! text prefers the Arabic face, then the requested family, then the
//! role's builtin default.

use crate::constants::BUILTIN_CHAR_WIDTH_RATIO;
use crate::types::{LabelError, Result};
use printpdf::{BuiltinFont, FontId, ParsedFont};
use std::collections::HashMap;
use std::sync::Arc;

/// The text fields a label can carry, each with its own default font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Title,
    Subtitle,
    Price,
    Quantity,
    Extra,
}

impl FontRole {
    /// Default family (base-14 PostScript name) for this role
    pub fn default_family(self) -> &'static str {
        match self {
            FontRole::Title => "Helvetica-Bold",
            FontRole::Subtitle => "Times-Italic",
            FontRole::Price => "Helvetica-Bold",
            FontRole::Quantity => "Helvetica",
            FontRole::Extra => "Helvetica",
        }
    }

    /// Default size in points for this role
    pub fn default_size(self) -> f32 {
        match self {
            FontRole::Title => 12.0,
            FontRole::Subtitle => 10.0,
            FontRole::Price => 9.0,
            FontRole::Quantity => 9.0,
            FontRole::Extra => 9.0,
        }
    }
}

/// Per-role font override. Unset values resolve to the role defaults,
/// so overriding only the family never changes the size.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoleFont {
    pub family: Option<String>,
    pub size: Option<f32>,
}

/// Font configuration for all roles
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FontSettings {
    pub title: RoleFont,
    pub subtitle: RoleFont,
    pub price: RoleFont,
    pub quantity: RoleFont,
    pub extra: RoleFont,
}

impl FontSettings {
    pub fn role(&self, role: FontRole) -> &RoleFont {
        match role {
            FontRole::Title => &self.title,
            FontRole::Subtitle => &self.subtitle,
            FontRole::Price => &self.price,
            FontRole::Quantity => &self.quantity,
            FontRole::Extra => &self.extra,
        }
    }

    /// Requested family for a role, if any
    pub fn family(&self, role: FontRole) -> Option<&str> {
        self.role(role).family.as_deref()
    }

    /// Effective size for a role
    pub fn size(&self, role: FontRole) -> f32 {
        self.role(role).size.unwrap_or(role.default_size())
    }
}

/// A registered font source: a base-14 builtin, or TTF bytes parsed
/// per render pass
#[derive(Debug, Clone)]
pub enum FontSource {
    Builtin(BuiltinFont),
    Ttf(Arc<Vec<u8>>),
}

/// A resolved font choice for one text field
#[derive(Debug, Clone)]
pub struct ResolvedFont<'a> {
    pub family: &'a str,
    pub source: &'a FontSource,
}

/// A TTF parsed and registered into one document
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    pub font: ParsedFont,
    pub id: FontId,
}

/// Capability table of registered font families
#[derive(Debug, Clone)]
pub struct FontCatalog {
    families: HashMap<String, FontSource>,
    arabic_family: Option<String>,
}

const BUILTIN_FAMILIES: &[(&str, BuiltinFont)] = &[
    ("Helvetica", BuiltinFont::Helvetica),
    ("Helvetica-Bold", BuiltinFont::HelveticaBold),
    ("Helvetica-Oblique", BuiltinFont::HelveticaOblique),
    ("Helvetica-BoldOblique", BuiltinFont::HelveticaBoldOblique),
    ("Times-Roman", BuiltinFont::TimesRoman),
    ("Times-Bold", BuiltinFont::TimesBold),
    ("Times-Italic", BuiltinFont::TimesItalic),
    ("Times-BoldItalic", BuiltinFont::TimesBoldItalic),
    ("Courier", BuiltinFont::Courier),
    ("Courier-Bold", BuiltinFont::CourierBold),
    ("Courier-Oblique", BuiltinFont::CourierOblique),
    ("Courier-BoldOblique", BuiltinFont::CourierBoldOblique),
    ("Symbol", BuiltinFont::Symbol),
    ("ZapfDingbats", BuiltinFont::ZapfDingbats),
];

impl FontCatalog {
    /// A catalog pre-seeded with the base-14 builtin families, so
    /// "registered" is one uniform lookup for builtins and TTFs alike.
    pub fn with_builtins() -> Self {
        let families = BUILTIN_FAMILIES
            .iter()
            .map(|(name, font)| (name.to_string(), FontSource::Builtin(*font)))
            .collect();
        Self {
            families,
            arabic_family: None,
        }
    }

    /// Register a TTF under `family`. The bytes are parse-checked here
    /// and kept raw; an unparseable file is a ResourceError, the
    /// caller logs it and keeps the builtins.
    pub fn register_ttf(&mut self, family: &str, bytes: &[u8]) -> Result<()> {
        let mut warnings = Vec::new();
        if ParsedFont::from_bytes(bytes, 0, &mut warnings).is_none() {
            return Err(LabelError::Resource(format!(
                "failed to parse font '{}'",
                family
            )));
        }
        self.families
            .insert(family.to_string(), FontSource::Ttf(Arc::new(bytes.to_vec())));
        Ok(())
    }

    /// Register a TTF and mark it as the Arabic-capable family
    pub fn register_arabic_ttf(&mut self, family: &str, bytes: &[u8]) -> Result<()> {
        self.register_ttf(family, bytes)?;
        self.arabic_family = Some(family.to_string());
        Ok(())
    }

    /// Mark an already-registered family as the Arabic-capable one
    pub fn set_arabic_family(&mut self, family: &str) -> Result<()> {
        if !self.families.contains_key(family) {
            return Err(LabelError::Resource(format!(
                "font family '{}' is not registered",
                family
            )));
        }
        self.arabic_family = Some(family.to_string());
        Ok(())
    }

    pub fn contains(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    /// The TTF families, sorted by name so per-render registration
    /// order never depends on hash order.
    pub fn ttf_families(&self) -> Vec<(&str, &[u8])> {
        let mut families: Vec<(&str, &[u8])> = self
            .families
            .iter()
            .filter_map(|(name, source)| match source {
                FontSource::Ttf(bytes) => Some((name.as_str(), bytes.as_slice())),
                FontSource::Builtin(_) => None,
            })
            .collect();
        families.sort_by_key(|(name, _)| *name);
        families
    }

    /// Decide the font for one text field.
    ///
    /// 1. Arabic-range text with an Arabic family registered wins over
    ///    the requested family (mismatched scripts render as tofu).
    /// 2. Otherwise the requested family, if registered.
    /// 3. Otherwise the role's builtin default, always present.
    pub fn resolve(&self, text: &str, requested: Option<&str>, role: FontRole) -> ResolvedFont<'_> {
        if contains_arabic(text) {
            if let Some(family) = self.arabic_family.as_deref() {
                if let Some((name, source)) = self.families.get_key_value(family) {
                    return ResolvedFont {
                        family: name.as_str(),
                        source,
                    };
                }
            }
        }

        if let Some(family) = requested {
            if let Some((name, source)) = self.families.get_key_value(family) {
                return ResolvedFont {
                    family: name.as_str(),
                    source,
                };
            }
        }

        let fallback = role.default_family();
        let source = &self.families[fallback];
        ResolvedFont {
            family: fallback,
            source,
        }
    }
}

/// True when the string contains any code point in the Arabic blocks
/// U+0600–U+06FF or U+0750–U+077F.
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|c| {
        ('\u{0600}'..='\u{06FF}').contains(&c) || ('\u{0750}'..='\u{077F}').contains(&c)
    })
}

/// Approximate width of builtin-font text: a flat character-width
/// ratio, good enough for centering short label text.
pub fn builtin_text_width_pt(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * BUILTIN_CHAR_WIDTH_RATIO
}

/// Width of embedded-font text from real glyph advances
pub fn glyph_text_width_pt(font: &ParsedFont, text: &str, size_pt: f32) -> f32 {
    let mut width = 0.0;
    for ch in text.chars() {
        if let Some(glyph_id) = font.lookup_glyph_index(ch as u32) {
            let advance = font.get_horizontal_advance(glyph_id);
            width += (advance as f32 / 1000.0) * size_pt;
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_arabic() {
        assert!(contains_arabic("عود ملكي"));
        assert!(contains_arabic("Oud عود"));
        assert!(!contains_arabic("Oud Royal"));
        assert!(!contains_arabic(""));
    }

    #[test]
    fn test_catalog_moves_across_threads() {
        fn assert_blocking_task_safe<T: Send + Sync + Clone + 'static>() {}
        assert_blocking_task_safe::<FontCatalog>();
        assert_blocking_task_safe::<FontSource>();
    }

    #[test]
    fn test_resolve_requested_builtin() {
        let catalog = FontCatalog::with_builtins();
        let resolved = catalog.resolve("Oud Royal", Some("Times-Italic"), FontRole::Title);
        assert_eq!(resolved.family, "Times-Italic");
    }

    #[test]
    fn test_resolve_unknown_family_falls_back_to_role_default() {
        let catalog = FontCatalog::with_builtins();
        let resolved = catalog.resolve("Oud Royal", Some("Comic Sans"), FontRole::Subtitle);
        assert_eq!(resolved.family, "Times-Italic");

        let resolved = catalog.resolve("Oud Royal", None, FontRole::Quantity);
        assert_eq!(resolved.family, "Helvetica");
    }

    #[test]
    fn test_arabic_text_prefers_arabic_family() {
        let mut catalog = FontCatalog::with_builtins();
        catalog.set_arabic_family("Courier").unwrap();

        let resolved = catalog.resolve("عود ملكي", Some("Helvetica-Bold"), FontRole::Title);
        assert_eq!(resolved.family, "Courier");

        // Latin text never selects the Arabic family.
        let resolved = catalog.resolve("Oud Royal", Some("Helvetica-Bold"), FontRole::Title);
        assert_eq!(resolved.family, "Helvetica-Bold");
    }

    #[test]
    fn test_arabic_text_without_arabic_font_uses_requested() {
        let catalog = FontCatalog::with_builtins();
        let resolved = catalog.resolve("عود", Some("Helvetica-Bold"), FontRole::Title);
        assert_eq!(resolved.family, "Helvetica-Bold");
    }

    #[test]
    fn test_builtin_width_approximation() {
        let width = builtin_text_width_pt("abcd", 10.0);
        assert!((width - 4.0 * 10.0 * BUILTIN_CHAR_WIDTH_RATIO).abs() < 1e-4);
    }

    #[test]
    fn test_role_defaults() {
        assert_eq!(FontRole::Title.default_family(), "Helvetica-Bold");
        assert_eq!(FontRole::Title.default_size(), 12.0);
        assert_eq!(FontRole::Subtitle.default_family(), "Times-Italic");
        assert_eq!(FontRole::Subtitle.default_size(), 10.0);
    }

    #[test]
    fn test_unset_role_size_resolves_to_role_default() {
        let mut settings = FontSettings::default();
        settings.title.family = Some("Amiri".into());

        assert_eq!(settings.size(FontRole::Title), 12.0);
        assert_eq!(settings.size(FontRole::Subtitle), 10.0);

        settings.title.size = Some(14.0);
        assert_eq!(settings.size(FontRole::Title), 14.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_role_override_keeps_role_size() {
        let settings: FontSettings =
            serde_json::from_str(r#"{ "title": { "family": "Amiri" } }"#).unwrap();

        assert_eq!(settings.family(FontRole::Title), Some("Amiri"));
        assert_eq!(settings.size(FontRole::Title), 12.0);
        assert_eq!(settings.size(FontRole::Price), 9.0);
    }
}
