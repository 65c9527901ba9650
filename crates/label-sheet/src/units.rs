//! Millimeter ↔ point conversion
//!
//! User-facing dimensions are millimeters; the drawing layer works in
//! PostScript points. The conversion happens exactly once, when a job's
//! geometry is derived at compose time.

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_pt_scale() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-4);
        assert!((mm_to_pt(210.0) - 595.276).abs() < 0.01);
    }

    #[test]
    fn test_round_trip() {
        let mm = 40.0;
        assert!((pt_to_mm(mm_to_pt(mm)) - mm).abs() < 1e-4);
    }

    #[test]
    fn test_negative_passes_through() {
        // Positivity is validated at job construction, not here.
        assert!(mm_to_pt(-10.0) < 0.0);
    }
}
