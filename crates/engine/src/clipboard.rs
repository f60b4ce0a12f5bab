//! Internal clipboard. Copy captures a rectangle of cells; paste writes
//! it back anchored at the selection, clipping at the sheet edge.

use crate::cell::Cell;
use crate::workbook::Workbook;

#[derive(Debug, Clone)]
pub struct ClipBuffer {
    pub cells: Vec<Vec<Cell>>,
}

impl ClipBuffer {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map(|r| r.len()).unwrap_or(0)
    }
}

impl Workbook {
    /// Capture the selected rectangle into the clipboard: a deep copy of
    /// each cell, content, style, and lock flag alike.
    pub fn copy_selection(&mut self) {
        let range = self.selection.range();
        let Some(sheet) = self.active_sheet() else {
            return;
        };
        let mut cells = Vec::with_capacity(range.row_span());
        for row in range.start_row..=range.end_row {
            let mut line = Vec::with_capacity(range.col_span());
            for col in range.start_col..=range.end_col {
                line.push(sheet.get_cell(row, col).cloned().unwrap_or_default());
            }
            cells.push(line);
        }
        self.clipboard = Some(ClipBuffer { cells });
    }

    /// Copy, then clear the unlocked source cells.
    pub fn cut_selection(&mut self) {
        self.copy_selection();
        let range = self.selection.range();
        self.clear_range(range);
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Paste the clipboard anchored at the selection's top-left corner.
    /// Cells that would land outside the sheet are clipped, not wrapped.
    /// Each written destination is replaced wholesale: content, style,
    /// and lock flag. Locked destinations are skipped when the settings
    /// say so. Returns the number of cells written.
    pub fn paste(&mut self) -> usize {
        let Some(buffer) = self.clipboard.clone() else {
            return 0;
        };
        let range = self.selection.range();
        let (anchor_row, anchor_col) = (range.start_row, range.start_col);
        let respect_locks = self.settings.paste_respects_locks;
        let Some(sheet) = self.active_sheet_mut() else {
            return 0;
        };

        let mut written = 0;
        for (dr, line) in buffer.cells.iter().enumerate() {
            for (dc, cell) in line.iter().enumerate() {
                let row = anchor_row + dr;
                let col = anchor_col + dc;
                if row >= sheet.rows || col >= sheet.cols {
                    continue;
                }
                if respect_locks && sheet.is_locked(row, col) {
                    continue;
                }
                sheet.put_cell(row, col, cell.clone());
                written += 1;
            }
        }
        self.notify_change();
        written
    }
}
