//! Viewport virtualization math.
//!
//! The logical grid can be a million rows; only the sub-rectangle under
//! the viewport is ever materialized. Callers recompute the visible
//! window on every scroll or resize event.

/// Current scroll position and viewport extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f32,
    pub scroll_left: f32,
    pub width: f32,
    pub height: f32,
}

/// Uniform cell geometry and logical grid bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub row_height: f32,
    pub col_width: f32,
    pub total_rows: usize,
    pub total_cols: usize,
}

/// The window of rows/columns that must be rendered.
/// `end_row`/`end_col` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub start_row: usize,
    pub end_row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl VisibleRange {
    pub fn rows(&self) -> impl Iterator<Item = usize> {
        self.start_row..self.end_row
    }

    pub fn cols(&self) -> impl Iterator<Item = usize> {
        self.start_col..self.end_col
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row < self.end_row &&
        col >= self.start_col && col < self.end_col
    }
}

/// Compute the visible row/column window for a scroll position.
///
/// start = floor(scroll / size), end = min(ceil((scroll + extent) / size), total).
pub fn visible_range(viewport: &Viewport, metrics: &GridMetrics) -> VisibleRange {
    let start_row = axis_start(viewport.scroll_top, metrics.row_height);
    let end_row = axis_end(
        viewport.scroll_top,
        viewport.height,
        metrics.row_height,
        metrics.total_rows,
    );
    let start_col = axis_start(viewport.scroll_left, metrics.col_width);
    let end_col = axis_end(
        viewport.scroll_left,
        viewport.width,
        metrics.col_width,
        metrics.total_cols,
    );

    VisibleRange {
        start_row,
        end_row,
        start_col,
        end_col,
    }
}

fn axis_start(scroll: f32, size: f32) -> usize {
    if size <= 0.0 {
        return 0;
    }
    (scroll.max(0.0) / size).floor() as usize
}

fn axis_end(scroll: f32, extent: f32, size: f32, total: usize) -> usize {
    if size <= 0.0 {
        return total;
    }
    let end = ((scroll.max(0.0) + extent.max(0.0)) / size).ceil() as usize;
    end.min(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(total_rows: usize, total_cols: usize) -> GridMetrics {
        GridMetrics {
            row_height: 25.0,
            col_width: 100.0,
            total_rows,
            total_cols,
        }
    }

    #[test]
    fn test_visible_rows_at_scroll() {
        let vp = Viewport {
            scroll_top: 250.0,
            scroll_left: 0.0,
            width: 800.0,
            height: 500.0,
        };
        let vr = visible_range(&vp, &metrics(1000, 100));
        assert_eq!(vr.start_row, 10);
        assert_eq!(vr.end_row, 30);
    }

    #[test]
    fn test_visible_range_at_origin() {
        let vp = Viewport {
            scroll_top: 0.0,
            scroll_left: 0.0,
            width: 1000.0,
            height: 500.0,
        };
        let vr = visible_range(&vp, &metrics(1000, 100));
        assert_eq!(vr.start_row, 0);
        assert_eq!(vr.end_row, 20);
        assert_eq!(vr.start_col, 0);
        assert_eq!(vr.end_col, 10);
    }

    #[test]
    fn test_end_clamped_to_total() {
        let vp = Viewport {
            scroll_top: 0.0,
            scroll_left: 0.0,
            width: 10_000.0,
            height: 10_000.0,
        };
        let vr = visible_range(&vp, &metrics(8, 4));
        assert_eq!(vr.end_row, 8);
        assert_eq!(vr.end_col, 4);
    }

    #[test]
    fn test_partial_row_at_bottom_is_included() {
        // Scrolled so the last visible row is cut off: ceil must include it
        let vp = Viewport {
            scroll_top: 10.0,
            scroll_left: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let vr = visible_range(&vp, &metrics(1000, 100));
        assert_eq!(vr.start_row, 0);
        // (10 + 100) / 25 = 4.4 -> 5
        assert_eq!(vr.end_row, 5);
    }

    #[test]
    fn test_window_is_bounded_for_huge_grid() {
        let vp = Viewport {
            scroll_top: 12_500_000.0,
            scroll_left: 0.0,
            width: 800.0,
            height: 600.0,
        };
        let vr = visible_range(&vp, &metrics(1_000_000, 16_384));
        assert_eq!(vr.start_row, 500_000);
        assert_eq!(vr.end_row - vr.start_row, 24);
        assert!(vr.end_col - vr.start_col <= 8);
    }

    #[test]
    fn test_contains() {
        let vr = VisibleRange {
            start_row: 10,
            end_row: 30,
            start_col: 0,
            end_col: 8,
        };
        assert!(vr.contains(10, 0));
        assert!(vr.contains(29, 7));
        assert!(!vr.contains(30, 0));
        assert!(!vr.contains(10, 8));
    }
}
