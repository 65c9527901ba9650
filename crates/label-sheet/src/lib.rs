//! Label sheet generation engine
//!
//! Renders one printable page of repeated product labels from a job
//! description: cell geometry in millimeters, an ordered template
//! list cycled to the requested copy count, per-role fonts with
//! script-aware fallback, and an optional logo image.

pub mod compose;
pub mod constants;
pub mod csv;
pub mod fonts;
pub mod grid;
pub mod logo;
mod options;
pub mod render;
pub mod sequence;
mod style;
mod template;
mod types;
pub mod units;

pub use compose::{render_sheet, render_sheet_bytes};
pub use csv::load_templates_from_csv;
pub use fonts::{contains_arabic, FontCatalog, FontRole, FontSettings, RoleFont};
pub use grid::{plan_grid, GridPlan};
pub use options::{LabelGeometry, LabelJob};
pub use sequence::expand_sequence;
pub use style::{Palette, StyleSpec, Tone};
pub use template::{FieldDefaults, LabelContent, LabelTemplate};
pub use types::{LabelError, PaperSize, Rect, Result};
