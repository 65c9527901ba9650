//! Shared constants for label sheet generation
//!
//! This module centralizes magic numbers and constants used throughout
//! the layout and rendering process.

// =============================================================================
// Copies
// =============================================================================

/// Minimum number of copies per render
pub const MIN_COPIES: usize = 1;

/// Maximum number of copies per render (one A4 page of small labels)
pub const MAX_COPIES: usize = 35;

// =============================================================================
// Cell Geometry
// =============================================================================

/// Inset of the filled background from the cell edge (points)
pub const BACKGROUND_INSET_PT: f32 = 3.0;

/// Inset of the stroked border from the cell edge (points)
pub const BORDER_INSET_PT: f32 = 4.5;

/// Line width of the label border (points)
pub const BORDER_LINE_WIDTH_PT: f32 = 0.9;

/// Default sheet margin in millimeters (≈ 10 points)
pub const DEFAULT_MARGIN_MM: f32 = 3.5;

// =============================================================================
// Logo
// =============================================================================

/// Maximum logo width as a fraction of the inner cell width
pub const LOGO_MAX_FRACTION: f32 = 0.45;

/// Hard cap on logo width/height (points)
pub const LOGO_MAX_PT: f32 = 60.0;

/// Gap between the inner cell top and the logo (points)
pub const LOGO_TOP_OFFSET_PT: f32 = 8.0;

// =============================================================================
// Text Layout
// =============================================================================

/// Separator line length as a fraction of the inner cell width
pub const SEPARATOR_FRACTION: f32 = 0.4;

/// Line width of the separator (points)
pub const SEPARATOR_LINE_WIDTH_PT: f32 = 0.5;

/// Baseline height of the price/quantity line above the cell bottom (points)
pub const PRICE_BASELINE_PT: f32 = 18.0;

/// Horizontal gap between the price text and the quantity text (points)
pub const QUANTITY_GAP_PT: f32 = 4.0;

/// Approximate character width ratio for builtin (base-14) fonts
pub const BUILTIN_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Segments used to approximate each quarter-circle corner arc
pub const CORNER_ARC_SEGMENTS: usize = 8;

// =============================================================================
// Colors
// =============================================================================

/// Muted tone used for the subtitle (and extra text unless overridden)
pub const MUTED_TONE: (f32, f32, f32) = (0.35, 0.35, 0.35);
