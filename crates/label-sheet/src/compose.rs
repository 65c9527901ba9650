//! Sheet composition
//!
//! Orchestrates the whole render: validate the job, derive point-space
//! geometry once, plan the grid, expand the template sequence, then
//! paint cells row-major until the sequence runs out. The output is a
//! single finished page; equal jobs produce identical page content.

use crate::fonts::{EmbeddedFont, FontCatalog};
use crate::grid::{cell_bounds, plan_grid};
use crate::logo::{prepare_logo, snapshot_logo};
use crate::options::LabelJob;
use crate::render::{CellPainter, PlacedLogo};
use crate::sequence::expand_sequence;
use crate::style::Palette;
use crate::template::LabelContent;
use crate::types::Result;
use printpdf::{Mm, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions};
use std::collections::HashMap;
use std::path::Path;

/// Render a job to a PDF file
pub async fn render_sheet(
    job: &LabelJob,
    catalog: &FontCatalog,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    let job = job.clone();
    let catalog = catalog.clone();
    let output_path = output_path.as_ref().to_owned();

    let bytes = tokio::task::spawn_blocking(move || render_sheet_bytes(&job, &catalog)).await??;

    tokio::fs::write(&output_path, bytes).await?;

    Ok(())
}

/// Render a job to PDF bytes. This is the synchronous core; it either
/// returns the complete page or an error, never a partial artifact.
pub fn render_sheet_bytes(job: &LabelJob, catalog: &FontCatalog) -> Result<Vec<u8>> {
    job.validate()?;

    let (page_w_pt, page_h_pt) = job.page_size_pt();
    let geometry = job.geometry();
    let margin_pt = job.margin_pt();

    let plan = plan_grid(
        page_w_pt,
        page_h_pt,
        geometry.width_pt,
        geometry.height_pt,
        margin_pt,
    );
    let cells = expand_sequence(&job.templates, job.copies, plan.max_cells())?;
    let palette = Palette::from_spec(&job.style)?;

    let mut doc = PdfDocument::new("Labels");

    let embedded = prepare_fonts(&mut doc, catalog);

    // Snapshot the logo once; a concurrent replacement of the file is
    // never observed mid-render.
    let logo = job
        .logo_path
        .as_deref()
        .and_then(snapshot_logo)
        .and_then(|bytes| prepare_logo(&bytes))
        .map(|image| PlacedLogo {
            width_px: image.width,
            height_px: image.height,
            id: doc.add_image(&image),
        });

    let painter = CellPainter {
        palette: &palette,
        fonts: &job.fonts,
        catalog,
        embedded: &embedded,
        logo: logo.as_ref(),
        currency_label: &job.currency_label,
        corner_radius_pt: geometry.corner_radius_pt,
    };

    let mut ops = Vec::new();
    'cells: for row in 0..plan.rows {
        for col in 0..plan.columns {
            let index = row * plan.columns + col;
            if index >= cells.len() {
                break 'cells;
            }
            let cell = cell_bounds(
                page_h_pt,
                margin_pt,
                geometry.width_pt,
                geometry.height_pt,
                row,
                col,
            );
            let content = LabelContent::resolve(cells[index], &job.defaults);
            painter.paint(&mut ops, cell, &content);
        }
    }

    let (page_w_mm, page_h_mm) = job.paper_size.dimensions_mm();
    doc.pages.push(PdfPage::new(Mm(page_w_mm), Mm(page_h_mm), ops));

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

    Ok(bytes)
}

/// Parse and add every TTF catalog family to the document, keyed by
/// family name for the painter. Families are processed in name order so
/// equal catalogs register identically. Builtins need no registration.
fn prepare_fonts(doc: &mut PdfDocument, catalog: &FontCatalog) -> HashMap<String, EmbeddedFont> {
    let mut embedded = HashMap::new();
    for (family, bytes) in catalog.ttf_families() {
        let mut warnings = Vec::new();
        match ParsedFont::from_bytes(bytes, 0, &mut warnings) {
            Some(font) => {
                let id = doc.add_font(&font);
                embedded.insert(family.to_string(), EmbeddedFont { font, id });
            }
            None => log::warn!("font family '{}' failed to parse, skipping", family),
        }
    }
    embedded
}
