//! Grid planning
//!
//! Computes how many identical label cells fit on one page, and where
//! each cell's origin lands. Pure arithmetic; upstream validation has
//! already guaranteed the cell fits the page, so there is no failure
//! mode here.

use crate::types::Rect;

/// Cell grid that fits one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlan {
    /// Number of columns in the grid
    pub columns: usize,
    /// Number of rows in the grid
    pub rows: usize,
}

impl GridPlan {
    /// Total number of cells on the page
    pub fn max_cells(&self) -> usize {
        self.columns * self.rows
    }
}

/// Plan the label grid for a page.
///
/// Both counts are at least 1 by policy: an oversized cell is drawn
/// clipped rather than producing a zero-cell layout.
pub fn plan_grid(
    page_width_pt: f32,
    page_height_pt: f32,
    cell_width_pt: f32,
    cell_height_pt: f32,
    margin_pt: f32,
) -> GridPlan {
    let columns = (((page_width_pt - margin_pt) / cell_width_pt).floor() as usize).max(1);
    let rows = (((page_height_pt - margin_pt) / cell_height_pt).floor() as usize).max(1);
    GridPlan { columns, rows }
}

/// Bounds of the cell at (row, col), row-major from the top-left of the
/// page. The page origin is bottom-left, so rows count downward.
pub fn cell_bounds(
    page_height_pt: f32,
    margin_pt: f32,
    cell_width_pt: f32,
    cell_height_pt: f32,
    row: usize,
    col: usize,
) -> Rect {
    let x = margin_pt + col as f32 * cell_width_pt;
    let y = page_height_pt - margin_pt - cell_height_pt - row as f32 * cell_height_pt;
    Rect::new(x, y, cell_width_pt, cell_height_pt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_grid_for_40mm_cells() {
        // A4 at 595.28 x 841.89 pt, 40mm cells (113.39 pt), 6mm margin (17.01 pt)
        let plan = plan_grid(595.28, 841.89, 113.39, 113.39, 17.01);
        assert_eq!(plan.columns, 5);
        assert_eq!(plan.rows, 7);
        assert_eq!(plan.max_cells(), 35);
    }

    #[test]
    fn test_oversized_cell_still_reports_one() {
        let plan = plan_grid(595.28, 841.89, 700.0, 900.0, 10.0);
        assert_eq!(plan.columns, 1);
        assert_eq!(plan.rows, 1);
    }

    #[test]
    fn test_grid_bound_sanity() {
        let (page_w, margin) = (595.28, 17.01);
        for cell_w in [50.0, 113.39, 200.0, 595.0] {
            let plan = plan_grid(page_w, 841.89, cell_w, cell_w, margin);
            assert!(plan.columns >= 1);
            assert!(plan.columns as f32 * cell_w + margin <= page_w + cell_w);
        }
    }

    #[test]
    fn test_cell_bounds_row_major_top_down() {
        let first = cell_bounds(841.89, 17.01, 113.39, 113.39, 0, 0);
        assert!((first.x - 17.01).abs() < 1e-3);
        assert!((first.y - (841.89 - 17.01 - 113.39)).abs() < 1e-3);

        let second_col = cell_bounds(841.89, 17.01, 113.39, 113.39, 0, 1);
        assert!((second_col.x - (17.01 + 113.39)).abs() < 1e-3);
        assert!((second_col.y - first.y).abs() < 1e-3);

        let second_row = cell_bounds(841.89, 17.01, 113.39, 113.39, 1, 0);
        assert!((second_row.x - first.x).abs() < 1e-3);
        assert!((second_row.y - (first.y - 113.39)).abs() < 1e-3);
    }
}
