use serde::{Deserialize, Serialize};

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Create a single-cell range.
    pub fn single(row: usize, col: usize) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row &&
        col >= self.start_col && col <= self.end_col
    }

    /// Check if this range intersects another.
    pub fn intersects(&self, other: &Range) -> bool {
        self.start_row <= other.end_row && other.start_row <= self.end_row &&
        self.start_col <= other.end_col && other.start_col <= self.end_col
    }

    /// Number of rows spanned.
    pub fn row_span(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    /// Number of columns spanned.
    pub fn col_span(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        self.row_span() * self.col_span()
    }

    /// Iterate over all cells in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (start_row, end_row) = (self.start_row, self.end_row);
        let (start_col, end_col) = (self.start_col, self.end_col);

        (start_row..=end_row).flat_map(move |r| {
            (start_col..=end_col).map(move |c| (r, c))
        })
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

/// The selection model: one rectangular range with an anchor cell.
///
/// The anchor stays fixed while extending (shift+click / shift+arrow);
/// callers read the normalized rectangle via `range()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    anchor: (usize, usize),
    cursor: (usize, usize),
}

impl Selection {
    /// Create a new selection with a single cell.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            anchor: (row, col),
            cursor: (row, col),
        }
    }

    /// The active cell (where keyboard editing lands).
    pub fn active_cell(&self) -> (usize, usize) {
        self.cursor
    }

    /// The anchor cell (fixed corner for extending selections).
    pub fn anchor(&self) -> (usize, usize) {
        self.anchor
    }

    /// The normalized rectangle covered by this selection.
    pub fn range(&self) -> Range {
        Range::new(self.anchor.0, self.anchor.1, self.cursor.0, self.cursor.1)
    }

    /// Check if a cell is selected.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.range().contains(row, col)
    }

    /// Check if selection is a single cell.
    pub fn is_single_cell(&self) -> bool {
        self.anchor == self.cursor
    }

    /// Set selection to a single cell (click / plain arrow).
    pub fn select_cell(&mut self, row: usize, col: usize) {
        self.anchor = (row, col);
        self.cursor = (row, col);
    }

    /// Extend from the anchor to the given cell (shift+click/arrow).
    pub fn extend_to(&mut self, row: usize, col: usize) {
        self.cursor = (row, col);
    }

    /// Select a cell, extending from the anchor when `extend` is set.
    pub fn select(&mut self, row: usize, col: usize, extend: bool) {
        if extend {
            self.extend_to(row, col);
        } else {
            self.select_cell(row, col);
        }
    }

    /// Move the active cell by delta, collapsing to a single cell.
    /// `max_row`/`max_col` are the last valid indices, inclusive.
    pub fn move_by(&mut self, d_row: isize, d_col: isize, max_row: usize, max_col: usize) {
        let (row, col) = self.cursor;
        let new_row = (row as isize + d_row).clamp(0, max_row as isize) as usize;
        let new_col = (col as isize + d_col).clamp(0, max_col as isize) as usize;
        self.select_cell(new_row, new_col);
    }

    /// Extend the selection by delta from the current cursor.
    /// `max_row`/`max_col` are the last valid indices, inclusive.
    pub fn extend_by(&mut self, d_row: isize, d_col: isize, max_row: usize, max_col: usize) {
        let (row, col) = self.cursor;
        let new_row = (row as isize + d_row).clamp(0, max_row as isize) as usize;
        let new_col = (col as isize + d_col).clamp(0, max_col as isize) as usize;
        self.extend_to(new_row, new_col);
    }

    /// Get the row range of the selection.
    pub fn row_range(&self) -> (usize, usize) {
        let r = self.range();
        (r.start_row, r.end_row)
    }

    /// Get the column range of the selection.
    pub fn col_range(&self) -> (usize, usize) {
        let r = self.range();
        (r.start_col, r.end_col)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_single() {
        let r = Range::single(5, 3);
        assert!(r.contains(5, 3));
        assert!(!r.contains(5, 4));
        assert!(r.is_single());
        assert_eq!(r.cell_count(), 1);
    }

    #[test]
    fn test_range_normalizes() {
        let r = Range::new(5, 5, 1, 1);
        assert_eq!(r.start_row, 1);
        assert_eq!(r.start_col, 1);
        assert_eq!(r.end_row, 5);
        assert_eq!(r.end_col, 5);
    }

    #[test]
    fn test_range_intersects() {
        let a = Range::new(0, 0, 2, 2);
        let b = Range::new(2, 2, 4, 4);
        let c = Range::new(3, 3, 4, 4);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_selection_extend_keeps_anchor() {
        let mut sel = Selection::new(2, 2);
        sel.select(4, 4, true);

        assert_eq!(sel.anchor(), (2, 2));
        assert_eq!(sel.active_cell(), (4, 4));
        let r = sel.range();
        assert_eq!((r.start_row, r.start_col), (2, 2));
        assert_eq!((r.end_row, r.end_col), (4, 4));
    }

    #[test]
    fn test_selection_collapse() {
        let mut sel = Selection::new(2, 2);
        sel.select(4, 4, true);
        sel.select(1, 1, false);

        assert!(sel.is_single_cell());
        assert_eq!(sel.range(), Range::single(1, 1));
    }

    #[test]
    fn test_extend_backwards_normalizes() {
        // Anchor below-right of cursor: consumers still see min/max corners
        let mut sel = Selection::new(4, 4);
        sel.extend_to(1, 2);

        let r = sel.range();
        assert_eq!((r.start_row, r.start_col), (1, 2));
        assert_eq!((r.end_row, r.end_col), (4, 4));
        assert_eq!(sel.anchor(), (4, 4));
    }

    #[test]
    fn test_move_by_clamps() {
        let mut sel = Selection::new(0, 0);
        sel.move_by(-1, -1, 9, 9);
        assert_eq!(sel.active_cell(), (0, 0));

        sel.move_by(100, 100, 9, 9);
        assert_eq!(sel.active_cell(), (9, 9));
    }

    #[test]
    fn test_move_by_reaches_last_index() {
        let mut sel = Selection::new(8, 0);
        sel.move_by(1, 0, 9, 9);
        assert_eq!(sel.active_cell(), (9, 0));

        sel.extend_by(0, 9, 9, 9);
        assert_eq!(sel.active_cell(), (9, 9));
        assert_eq!(sel.anchor(), (9, 0));
    }
}
