use crate::constants::{DEFAULT_MARGIN_MM, MAX_COPIES, MIN_COPIES};
use crate::fonts::FontSettings;
use crate::style::{Palette, StyleSpec};
use crate::template::{is_digits, sanitize_price, sanitize_quantity, FieldDefaults, LabelTemplate};
use crate::types::{LabelError, PaperSize, Result};
use crate::units::mm_to_pt;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Label cell geometry in points, derived once per render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub corner_radius_pt: f32,
}

/// One render job: everything needed to produce a single label sheet.
/// Created fresh per request; dimensions are millimeters at this level
/// and converted to points exactly once, at compose time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LabelJob {
    pub paper_size: PaperSize,

    // Cell geometry (mm)
    pub label_width_mm: f32,
    pub label_height_mm: f32,
    pub corner_radius_mm: f32,
    pub margin_mm: f32,

    pub copies: usize,

    /// Prefix for the price line, e.g. "DA: 1500"
    pub currency_label: String,

    /// Ordered template list, cycled to fill `copies` cells
    pub templates: Vec<LabelTemplate>,
    /// Job-level fallback values for fields a template leaves empty
    pub defaults: FieldDefaults,

    pub style: StyleSpec,
    pub fonts: FontSettings,

    /// Logo image snapshotted at the start of the render; missing or
    /// unreadable files degrade to a logo-less label
    pub logo_path: Option<PathBuf>,
}

impl Default for LabelJob {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            label_width_mm: 40.0,
            label_height_mm: 40.0,
            corner_radius_mm: 2.0,
            margin_mm: DEFAULT_MARGIN_MM,
            copies: 1,
            currency_label: "DA".to_string(),
            templates: Vec::new(),
            defaults: FieldDefaults::default(),
            style: StyleSpec::default(),
            fonts: FontSettings::default(),
            logo_path: None,
        }
    }
}

impl LabelJob {
    /// Load a job from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let job = serde_json::from_slice(&bytes)
            .map_err(|e| LabelError::Config(format!("Failed to parse job: {}", e)))?;
        Ok(job)
    }

    /// Save a job to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LabelError::Config(format!("Failed to serialize job: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Page dimensions in points
    pub fn page_size_pt(&self) -> (f32, f32) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (mm_to_pt(w_mm), mm_to_pt(h_mm))
    }

    /// Cell geometry in points
    pub fn geometry(&self) -> LabelGeometry {
        LabelGeometry {
            width_pt: mm_to_pt(self.label_width_mm),
            height_pt: mm_to_pt(self.label_height_mm),
            corner_radius_pt: mm_to_pt(self.corner_radius_mm),
        }
    }

    pub fn margin_pt(&self) -> f32 {
        mm_to_pt(self.margin_mm)
    }

    /// Check every client-fixable error before any drawing happens, so
    /// a rejected job has no side effects at all.
    pub fn validate(&self) -> Result<()> {
        if self.templates.is_empty() {
            return Err(LabelError::validation(
                "templates",
                "at least one template is required",
            ));
        }

        if self.copies < MIN_COPIES || self.copies > MAX_COPIES {
            return Err(LabelError::validation(
                "copies",
                format!("must be between {} and {}", MIN_COPIES, MAX_COPIES),
            ));
        }

        let (page_w_mm, page_h_mm) = self.paper_size.dimensions_mm();
        if self.label_width_mm <= 0.0 {
            return Err(LabelError::validation("label_width_mm", "must be positive"));
        }
        if self.label_height_mm <= 0.0 {
            return Err(LabelError::validation("label_height_mm", "must be positive"));
        }
        if self.label_width_mm > page_w_mm {
            return Err(LabelError::validation(
                "label_width_mm",
                format!("must be <= page width ({:.1} mm)", page_w_mm),
            ));
        }
        if self.label_height_mm > page_h_mm {
            return Err(LabelError::validation(
                "label_height_mm",
                format!("must be <= page height ({:.1} mm)", page_h_mm),
            ));
        }
        if self.corner_radius_mm < 0.0 {
            return Err(LabelError::validation(
                "corner_radius_mm",
                "must not be negative",
            ));
        }
        if self.margin_mm < 0.0 {
            return Err(LabelError::validation("margin_mm", "must not be negative"));
        }

        // The first rendered cell must have a title to print.
        let first_title = self.templates[0]
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.defaults.title.as_deref().filter(|t| !t.is_empty()));
        if first_title.is_none() {
            return Err(LabelError::validation(
                "templates[0].title",
                "a non-empty title is required",
            ));
        }

        for (i, template) in self.templates.iter().enumerate() {
            validate_numeric(
                template.price.as_deref(),
                sanitize_price,
                &format!("templates[{}].price", i),
            )?;
            validate_numeric(
                template.quantity.as_deref(),
                sanitize_quantity,
                &format!("templates[{}].quantity", i),
            )?;
        }
        validate_numeric(self.defaults.price.as_deref(), sanitize_price, "defaults.price")?;
        validate_numeric(
            self.defaults.quantity.as_deref(),
            sanitize_quantity,
            "defaults.quantity",
        )?;

        // Surface bad hex strings here, not at draw time.
        Palette::from_spec(&self.style)?;

        Ok(())
    }
}

fn validate_numeric(
    value: Option<&str>,
    sanitize: fn(&str) -> String,
    field: &str,
) -> Result<()> {
    match value {
        None => Ok(()),
        Some("") => Ok(()), // empty means absent, not invalid
        Some(raw) => {
            let cleaned = sanitize(raw);
            if is_digits(&cleaned) {
                Ok(())
            } else {
                Err(LabelError::validation(
                    field,
                    "must contain digits only",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_job() -> LabelJob {
        LabelJob {
            copies: 6,
            templates: vec![LabelTemplate {
                title: Some("Oud Royal".into()),
                price: Some("1500".into()),
                quantity: Some("2".into()),
                subtitle: Some("Shop A".into()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_job_passes() {
        assert!(valid_job().validate().is_ok());
    }

    #[test]
    fn test_copies_out_of_bounds() {
        let mut job = valid_job();
        job.copies = 0;
        assert!(job.validate().is_err());
        job.copies = 36;
        match job.validate() {
            Err(LabelError::Validation { field, .. }) => assert_eq!(field, "copies"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_label_exceeding_page_is_rejected() {
        let mut job = valid_job();
        job.label_width_mm = 250.0; // A4 is 210mm wide
        match job.validate() {
            Err(LabelError::Validation { field, .. }) => assert_eq!(field, "label_width_mm"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_separators_and_glyphs_are_tolerated() {
        let mut job = valid_job();
        job.templates[0].price = Some("1,500".into());
        job.templates[0].quantity = Some("×3".into());
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_non_digit_price_is_rejected() {
        let mut job = valid_job();
        job.templates[0].price = Some("15.00".into());
        match job.validate() {
            Err(LabelError::Validation { field, .. }) => {
                assert_eq!(field, "templates[0].price");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_missing_first_title_is_rejected() {
        let mut job = valid_job();
        job.templates[0].title = None;
        match job.validate() {
            Err(LabelError::Validation { field, .. }) => {
                assert_eq!(field, "templates[0].title");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_default_title_satisfies_first_title_rule() {
        let mut job = valid_job();
        job.templates[0].title = None;
        job.defaults.title = Some("House Blend".into());
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_geometry_converts_once() {
        let job = valid_job();
        let geom = job.geometry();
        assert!((geom.width_pt - 113.386).abs() < 0.01);
        assert!((geom.corner_radius_pt - 5.669).abs() < 0.01);
    }
}
