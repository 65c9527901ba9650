//! Single-cell rendering
//!
//! Emits the drawing ops for one label cell in a fixed z-order:
//! background, border, logo, title, separator, subtitle,
//! price/quantity, extra text. Later elements must never be covered by
//! earlier ones, which is why the filled background comes first.

use crate::constants::*;
use crate::fonts::{
    builtin_text_width_pt, glyph_text_width_pt, EmbeddedFont, FontCatalog, FontRole, FontSettings,
    FontSource,
};
use crate::style::{Palette, Tone};
use crate::template::{sanitize_price, sanitize_quantity, LabelContent};
use crate::types::Rect;
use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Op, PaintMode, Point, Polygon, PolygonRing, Pt, Rgb,
    TextItem, TextMatrix, WindingOrder, XObjectId, XObjectTransform,
};
use std::collections::HashMap;

/// A logo already embedded in the document
#[derive(Debug, Clone)]
pub struct PlacedLogo {
    pub id: XObjectId,
    pub width_px: usize,
    pub height_px: usize,
}

/// The concrete face chosen for one text field
enum PaintFace<'a> {
    Builtin(BuiltinFont),
    Embedded(&'a EmbeddedFont),
}

impl PaintFace<'_> {
    fn text_width_pt(&self, text: &str, size_pt: f32) -> f32 {
        match self {
            PaintFace::Builtin(_) => builtin_text_width_pt(text, size_pt),
            PaintFace::Embedded(embedded) => glyph_text_width_pt(&embedded.font, text, size_pt),
        }
    }
}

/// Per-job drawing context, fixed across all cells of a sheet
pub struct CellPainter<'a> {
    pub palette: &'a Palette,
    pub fonts: &'a FontSettings,
    pub catalog: &'a FontCatalog,
    pub embedded: &'a HashMap<String, EmbeddedFont>,
    pub logo: Option<&'a PlacedLogo>,
    pub currency_label: &'a str,
    pub corner_radius_pt: f32,
}

impl CellPainter<'_> {
    /// Draw one cell's content at the given bounds
    pub fn paint(&self, ops: &mut Vec<Op>, cell: Rect, content: &LabelContent) {
        let background = cell.inset(BACKGROUND_INSET_PT);
        let border = cell.inset(BORDER_INSET_PT);

        // 1. Filled background
        ops.push(Op::SetFillColor {
            col: color(self.palette.accent),
        });
        ops.push(Op::DrawPolygon {
            polygon: rounded_rect(background, self.corner_radius_pt, PaintMode::Fill),
        });

        // 2. Stroked border, inset slightly further
        ops.push(Op::SetOutlineColor {
            col: color(self.palette.border),
        });
        ops.push(Op::SetOutlineThickness {
            pt: Pt(BORDER_LINE_WIDTH_PT),
        });
        ops.push(Op::DrawPolygon {
            polygon: rounded_rect(border, self.corner_radius_pt, PaintMode::Stroke),
        });

        // 3. Logo, centered near the top of the inner area
        if let Some(logo) = self.logo {
            self.paint_logo(ops, background, logo);
        }

        let title_size = self.fonts.size(FontRole::Title);
        let title_baseline = cell.center_y() + title_size / 1.5 + 6.0;

        // 4. Title
        if !content.title.is_empty() {
            let face = self.face(&content.title, FontRole::Title);
            let width = face.text_width_pt(&content.title, title_size);
            self.draw_text(
                ops,
                &content.title,
                &face,
                title_size,
                self.palette.primary,
                cell.center_x() - width / 2.0,
                title_baseline,
            );
        }

        // 5. Decorative separator just below the title
        let separator_y = title_baseline - title_size * 0.5;
        let half = background.width * SEPARATOR_FRACTION / 2.0;
        ops.push(Op::SetOutlineColor {
            col: color(self.palette.primary),
        });
        ops.push(Op::SetOutlineThickness {
            pt: Pt(SEPARATOR_LINE_WIDTH_PT),
        });
        ops.push(Op::DrawLine {
            line: Line {
                points: vec![
                    line_point(cell.center_x() - half, separator_y),
                    line_point(cell.center_x() + half, separator_y),
                ],
                is_closed: false,
            },
        });

        // 6. Subtitle, muted tone
        let subtitle_size = self.fonts.size(FontRole::Subtitle);
        let subtitle_baseline = cell.center_y() - subtitle_size / 1.5 - 2.0;
        if !content.subtitle.is_empty() {
            let face = self.face(&content.subtitle, FontRole::Subtitle);
            let width = face.text_width_pt(&content.subtitle, subtitle_size);
            self.draw_text(
                ops,
                &content.subtitle,
                &face,
                subtitle_size,
                self.palette.subtitle,
                cell.center_x() - width / 2.0,
                subtitle_baseline,
            );
        }

        // 7. Price + quantity near the bottom. Re-sanitized here in
        // case upstream validation was bypassed.
        self.paint_price_line(ops, cell, content);

        // 8. Extra free-text line below the subtitle block
        if !content.extra.is_empty() {
            let extra_size = self.fonts.size(FontRole::Extra);
            let face = self.face(&content.extra, FontRole::Extra);
            let width = face.text_width_pt(&content.extra, extra_size);
            self.draw_text(
                ops,
                &content.extra,
                &face,
                extra_size,
                self.palette.extra,
                cell.center_x() - width / 2.0,
                subtitle_baseline - extra_size - 3.0,
            );
        }
    }

    fn paint_logo(&self, ops: &mut Vec<Op>, inner: Rect, logo: &PlacedLogo) {
        if logo.width_px == 0 || logo.height_px == 0 {
            return;
        }

        let max_w = (inner.width * LOGO_MAX_FRACTION).min(LOGO_MAX_PT);
        let max_h = (inner.height * LOGO_MAX_FRACTION).min(LOGO_MAX_PT);
        let scale = (max_w / logo.width_px as f32).min(max_h / logo.height_px as f32);
        let logo_w = logo.width_px as f32 * scale;
        let logo_h = logo.height_px as f32 * scale;

        let x = inner.x + (inner.width - logo_w) / 2.0;
        let y = inner.top() - logo_h - LOGO_TOP_OFFSET_PT;

        // dpi 72 makes one pixel one point, so scale maps px to pt.
        ops.push(Op::UseXobject {
            id: logo.id.clone(),
            transform: XObjectTransform {
                translate_x: Some(Pt(x)),
                translate_y: Some(Pt(y)),
                rotate: None,
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(72.0),
            },
        });
    }

    fn paint_price_line(&self, ops: &mut Vec<Op>, cell: Rect, content: &LabelContent) {
        let digits = sanitize_price(&content.price);
        let quantity = sanitize_quantity(&content.quantity);

        let price_text = if digits.is_empty() {
            None
        } else {
            Some(format!("{}: {}", self.currency_label, digits))
        };
        let quantity_text = if quantity.is_empty() {
            None
        } else {
            Some(format!("(×{})", quantity))
        };

        let baseline = cell.y + PRICE_BASELINE_PT;
        let price_size = self.fonts.size(FontRole::Price);
        let quantity_size = self.fonts.size(FontRole::Quantity);

        match (price_text, quantity_text) {
            (Some(price), Some(qty)) => {
                let face = self.face(&price, FontRole::Price);
                let price_width = face.text_width_pt(&price, price_size);
                self.draw_text(
                    ops,
                    &price,
                    &face,
                    price_size,
                    self.palette.primary,
                    cell.center_x() - price_width / 2.0,
                    baseline,
                );

                let face = self.face(&qty, FontRole::Quantity);
                self.draw_text(
                    ops,
                    &qty,
                    &face,
                    quantity_size,
                    self.palette.primary,
                    cell.center_x() + price_width / 2.0 + QUANTITY_GAP_PT,
                    baseline,
                );
            }
            (Some(price), None) => {
                let face = self.face(&price, FontRole::Price);
                let width = face.text_width_pt(&price, price_size);
                self.draw_text(
                    ops,
                    &price,
                    &face,
                    price_size,
                    self.palette.primary,
                    cell.center_x() - width / 2.0,
                    baseline,
                );
            }
            (None, Some(qty)) => {
                let face = self.face(&qty, FontRole::Quantity);
                let width = face.text_width_pt(&qty, quantity_size);
                self.draw_text(
                    ops,
                    &qty,
                    &face,
                    quantity_size,
                    self.palette.primary,
                    cell.center_x() - width / 2.0,
                    baseline,
                );
            }
            (None, None) => {}
        }
    }

    /// Resolve a field's font and bind it to this document's fonts
    fn face(&self, text: &str, role: FontRole) -> PaintFace<'_> {
        let resolved = self.catalog.resolve(text, self.fonts.family(role), role);
        match resolved.source {
            FontSource::Builtin(font) => PaintFace::Builtin(*font),
            FontSource::Ttf(_) => match self.embedded.get(resolved.family) {
                Some(embedded) => PaintFace::Embedded(embedded),
                // Catalog and document font table out of sync; keep
                // drawing with the baseline family.
                None => PaintFace::Builtin(BuiltinFont::Helvetica),
            },
        }
    }

    fn draw_text(
        &self,
        ops: &mut Vec<Op>,
        text: &str,
        face: &PaintFace<'_>,
        size: f32,
        tone: Tone,
        x: f32,
        baseline_y: f32,
    ) {
        ops.push(Op::SetFillColor { col: color(tone) });
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::Translate(Pt(x), Pt(baseline_y)),
        });

        match face {
            PaintFace::Builtin(font) => {
                ops.push(Op::SetFontSizeBuiltinFont {
                    font: *font,
                    size: Pt(size),
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(text.to_string())],
                    font: *font,
                });
            }
            PaintFace::Embedded(embedded) => {
                ops.push(Op::SetFontSize {
                    font: embedded.id.clone(),
                    size: Pt(size),
                });
                ops.push(Op::WriteText {
                    items: vec![TextItem::Text(text.to_string())],
                    font: embedded.id.clone(),
                });
            }
        }

        ops.push(Op::EndTextSection);
    }
}

fn color(tone: Tone) -> Color {
    Color::Rgb(Rgb {
        r: tone.r,
        g: tone.g,
        b: tone.b,
        icc_profile: None,
    })
}

fn line_point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Build a rounded-rectangle outline, corners approximated with short
/// line segments per quarter circle.
fn rounded_rect(rect: Rect, radius: f32, mode: PaintMode) -> Polygon {
    let Rect {
        x,
        y,
        width: w,
        height: h,
    } = rect;
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let pi = std::f32::consts::PI;

    let mut points = Vec::new();

    let add_arc = |points: &mut Vec<LinePoint>, cx: f32, cy: f32, start: f32, end: f32| {
        for i in 0..=CORNER_ARC_SEGMENTS {
            let t = i as f32 / CORNER_ARC_SEGMENTS as f32;
            let angle = start + t * (end - start);
            points.push(line_point(cx + r * angle.cos(), cy + r * angle.sin()));
        }
    };

    if r > 0.0 {
        // Bottom edge, then counter-clockwise around the corners.
        points.push(line_point(x + r, y));
        points.push(line_point(x + w - r, y));
        add_arc(&mut points, x + w - r, y + r, -pi / 2.0, 0.0);
        points.push(line_point(x + w, y + h - r));
        add_arc(&mut points, x + w - r, y + h - r, 0.0, pi / 2.0);
        points.push(line_point(x + r, y + h));
        add_arc(&mut points, x + r, y + h - r, pi / 2.0, pi);
        points.push(line_point(x, y + r));
        add_arc(&mut points, x + r, y + r, pi, 3.0 * pi / 2.0);
    } else {
        points.push(line_point(x, y));
        points.push(line_point(x + w, y));
        points.push(line_point(x + w, y + h));
        points.push(line_point(x, y + h));
    }

    Polygon {
        rings: vec![PolygonRing { points }],
        mode,
        winding_order: WindingOrder::NonZero,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint_content(content: &LabelContent) -> Vec<Op> {
        let palette = Palette::default();
        let fonts = FontSettings::default();
        let catalog = FontCatalog::with_builtins();
        let embedded = HashMap::new();
        let painter = CellPainter {
            palette: &palette,
            fonts: &fonts,
            catalog: &catalog,
            embedded: &embedded,
            logo: None,
            currency_label: "DA",
            corner_radius_pt: 5.67,
        };
        let mut ops = Vec::new();
        painter.paint(&mut ops, Rect::new(100.0, 500.0, 113.39, 113.39), content);
        ops
    }

    fn written_texts(ops: &[Op]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                Op::WriteTextBuiltinFont { items, .. } | Op::WriteText { items, .. } => {
                    items.iter().find_map(|item| match item {
                        TextItem::Text(s) => Some(s.clone()),
                        _ => None,
                    })
                }
                _ => None,
            })
            .collect()
    }

    fn full_content() -> LabelContent {
        LabelContent {
            title: "Oud Royal".into(),
            subtitle: "Shop A".into(),
            price: "1500".into(),
            quantity: "2".into(),
            extra: "50ml".into(),
        }
    }

    #[test]
    fn test_all_fields_drawn() {
        let texts = written_texts(&paint_content(&full_content()));
        assert_eq!(texts, vec!["Oud Royal", "Shop A", "DA: 1500", "(×2)", "50ml"]);
    }

    #[test]
    fn test_background_precedes_border_precedes_text() {
        let ops = paint_content(&full_content());
        let fill_idx = ops
            .iter()
            .position(|op| matches!(op, Op::DrawPolygon { polygon } if polygon.mode == PaintMode::Fill))
            .unwrap();
        let stroke_idx = ops
            .iter()
            .position(|op| matches!(op, Op::DrawPolygon { polygon } if polygon.mode == PaintMode::Stroke))
            .unwrap();
        let text_idx = ops
            .iter()
            .position(|op| matches!(op, Op::WriteTextBuiltinFont { .. }))
            .unwrap();
        assert!(fill_idx < stroke_idx);
        assert!(stroke_idx < text_idx);
    }

    #[test]
    fn test_price_sanitization_equivalence() {
        let mut with_comma = full_content();
        with_comma.price = "1,500".into();
        with_comma.quantity = "×2".into();
        assert_eq!(paint_content(&with_comma), paint_content(&full_content()));
    }

    #[test]
    fn test_empty_price_and_quantity_omitted() {
        let mut content = full_content();
        content.price = String::new();
        content.quantity = String::new();
        let texts = written_texts(&paint_content(&content));
        assert_eq!(texts, vec!["Oud Royal", "Shop A", "50ml"]);
    }

    #[test]
    fn test_lone_quantity_still_drawn() {
        let mut content = full_content();
        content.price = String::new();
        let texts = written_texts(&paint_content(&content));
        assert!(texts.contains(&"(×2)".to_string()));
        assert!(!texts.iter().any(|t| t.starts_with("DA:")));
    }

    #[test]
    fn test_title_uses_role_default_size() {
        let ops = paint_content(&full_content());
        let title_size = ops.iter().find_map(|op| match op {
            Op::SetFontSizeBuiltinFont { size, .. } => Some(size.0),
            _ => None,
        });
        assert_eq!(title_size, Some(12.0));
    }

    #[test]
    fn test_rounded_rect_ring_is_closed_shape() {
        let polygon = rounded_rect(Rect::new(0.0, 0.0, 100.0, 50.0), 5.0, PaintMode::Fill);
        assert_eq!(polygon.rings.len(), 1);
        // Four edges plus four corner arcs worth of points.
        assert!(polygon.rings[0].points.len() > 4 * CORNER_ARC_SEGMENTS);

        let square = rounded_rect(Rect::new(0.0, 0.0, 100.0, 50.0), 0.0, PaintMode::Stroke);
        assert_eq!(square.rings[0].points.len(), 4);
    }

    #[test]
    fn test_no_logo_emits_no_xobject() {
        let ops = paint_content(&full_content());
        assert!(!ops.iter().any(|op| matches!(op, Op::UseXobject { .. })));
    }
}
