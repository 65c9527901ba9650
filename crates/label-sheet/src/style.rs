//! Style parsing
//!
//! Hex color strings from the request become normalized RGB tones for
//! the renderer. The border color falls back to the primary color, the
//! extra-text color to the muted subtitle tone.

use crate::constants::MUTED_TONE;
use crate::types::{LabelError, Result};

/// Requested colors, as hex strings (`#` optional)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleSpec {
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub border_color: Option<String>,
    pub extra_color: Option<String>,
}

/// Normalized RGB color, channels in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Tone {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Tone = Tone::new(0.0, 0.0, 0.0);
    pub const WHITE: Tone = Tone::new(1.0, 1.0, 1.0);
}

/// Resolved colors for one render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Title and price text
    pub primary: Tone,
    /// Cell background fill
    pub accent: Tone,
    /// Cell border stroke
    pub border: Tone,
    /// Subtitle text
    pub subtitle: Tone,
    /// Extra free-text line
    pub extra: Tone,
}

impl Default for Palette {
    fn default() -> Self {
        let muted = Tone::new(MUTED_TONE.0, MUTED_TONE.1, MUTED_TONE.2);
        Self {
            primary: Tone::BLACK,
            accent: Tone::WHITE,
            border: Tone::BLACK,
            subtitle: muted,
            extra: muted,
        }
    }
}

impl Palette {
    /// Build the palette from a style spec. An unparseable hex string
    /// is a validation failure attributed to its field.
    pub fn from_spec(spec: &StyleSpec) -> Result<Self> {
        let base = Palette::default();

        let primary = parse_field(&spec.primary_color, "style.primary_color")?.unwrap_or(base.primary);
        let accent = parse_field(&spec.accent_color, "style.accent_color")?.unwrap_or(base.accent);
        let border = parse_field(&spec.border_color, "style.border_color")?.unwrap_or(primary);
        let extra = parse_field(&spec.extra_color, "style.extra_color")?.unwrap_or(base.extra);

        Ok(Self {
            primary,
            accent,
            border,
            subtitle: base.subtitle,
            extra,
        })
    }
}

fn parse_field(value: &Option<String>, field: &str) -> Result<Option<Tone>> {
    match value {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => parse_hex_rgb(s)
            .map(|(r, g, b)| Some(Tone::new(r, g, b)))
            .ok_or_else(|| {
                LabelError::validation(field, format!("'{}' is not a valid hex color", s))
            }),
    }
}

fn parse_hex_rgb(s: &str) -> Option<(f32, f32, f32)> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    // Length is in bytes; non-ASCII input must be rejected before
    // slicing so multi-byte characters can't split a char boundary.
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;
    Some((r, g, b))
}
