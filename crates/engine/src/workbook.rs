//! The workbook: an ordered collection of sheets, the active-sheet
//! pointer, the current selection, and change notification.

use formgrid_config::Settings;
use formgrid_core::{Range, Selection};

use crate::cell::{CellStyle, StylePatch};
use crate::clipboard::ClipBuffer;
use crate::events::{ChangeListener, GridEvent};
use crate::sheet::{Sheet, SheetId};

/// Measures rendered text width, supplied by the host UI. Autofit needs
/// it; the engine has no font machinery of its own.
pub trait TextMeasure {
    fn width(&self, text: &str, style: &CellStyle) -> f32;
}

pub struct Workbook {
    sheets: Vec<Sheet>,
    active: usize,
    next_sheet_id: u64,
    pub settings: Settings,
    pub selection: Selection,
    pub(crate) clipboard: Option<ClipBuffer>,
    listener: Option<ChangeListener>,
}

impl Workbook {
    pub fn new(settings: Settings) -> Self {
        let rows = settings.initial_rows.min(settings.max_rows).max(1);
        let cols = settings.initial_cols.min(settings.max_cols).max(1);
        let mut sheet = Sheet::new(SheetId(0), "Sheet1", rows, cols);
        sheet.default_row_height = settings.default_row_height;
        sheet.default_col_width = settings.default_col_width;
        Workbook {
            sheets: vec![sheet],
            active: 0,
            next_sheet_id: 1,
            settings,
            selection: Selection::default(),
            clipboard: None,
            listener: None,
        }
    }

    // ---- sheet management ----

    pub fn active_sheet(&self) -> Option<&Sheet> {
        self.sheets.get(self.active)
    }

    pub fn active_sheet_mut(&mut self) -> Option<&mut Sheet> {
        self.sheets.get_mut(self.active)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    fn fresh_sheet_name(&self) -> String {
        let mut n = self.sheets.len() + 1;
        loop {
            let name = format!("Sheet{n}");
            if !self
                .sheets
                .iter()
                .any(|s| s.name.eq_ignore_ascii_case(&name))
            {
                return name;
            }
            n += 1;
        }
    }

    /// Create a sheet and make it active. Ids are monotonic and never
    /// reused, so a listener can hold one across deletions safely.
    pub fn add_sheet(&mut self) -> SheetId {
        let id = SheetId(self.next_sheet_id);
        self.next_sheet_id += 1;
        let rows = self.settings.initial_rows.min(self.settings.max_rows).max(1);
        let cols = self.settings.initial_cols.min(self.settings.max_cols).max(1);
        let mut sheet = Sheet::new(id, self.fresh_sheet_name(), rows, cols);
        sheet.default_row_height = self.settings.default_row_height;
        sheet.default_col_width = self.settings.default_col_width;
        self.sheets.push(sheet);
        self.active = self.sheets.len() - 1;
        self.selection = Selection::default();
        self.emit(GridEvent::SheetAdded { sheet: id });
        self.emit(GridEvent::ActiveSheetChanged { sheet: id });
        id
    }

    /// Switch the active sheet. Unknown ids are a no-op.
    pub fn select_sheet(&mut self, id: SheetId) {
        let Some(index) = self.sheets.iter().position(|s| s.id == id) else {
            return;
        };
        if index == self.active {
            return;
        }
        self.active = index;
        self.selection = Selection::default();
        self.emit(GridEvent::ActiveSheetChanged { sheet: id });
    }

    /// Delete a sheet. The last remaining sheet cannot be deleted.
    pub fn delete_sheet(&mut self, id: SheetId) -> Result<(), String> {
        if self.sheets.len() == 1 {
            return Err("cannot delete the last sheet".to_string());
        }
        let index = self
            .sheets
            .iter()
            .position(|s| s.id == id)
            .ok_or("no such sheet")?;
        self.sheets.remove(index);
        if self.active >= self.sheets.len() {
            self.active = self.sheets.len() - 1;
        } else if index < self.active {
            self.active -= 1;
        }
        self.selection = Selection::default();
        self.emit(GridEvent::SheetRemoved { sheet: id });
        let active_id = self.active_sheet().map(|s| s.id);
        if let Some(active_id) = active_id {
            self.emit(GridEvent::ActiveSheetChanged { sheet: active_id });
        }
        Ok(())
    }

    /// Rename a sheet. Names are unique case-insensitively.
    pub fn rename_sheet(&mut self, id: SheetId, name: &str) -> Result<(), String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("sheet name cannot be empty".to_string());
        }
        if self
            .sheets
            .iter()
            .any(|s| s.id != id && s.name.eq_ignore_ascii_case(name))
        {
            return Err(format!("a sheet named '{name}' already exists"));
        }
        let sheet = self
            .sheets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or("no such sheet")?;
        sheet.name = name.to_string();
        Ok(())
    }

    // ---- editing ----

    /// Commit user input to a cell. Locked cells and merge-hidden cells
    /// refuse the edit; everything else goes through `Sheet::set_value`.
    pub fn edit_cell(&mut self, row: usize, col: usize, input: &str) -> Result<(), String> {
        let sheet = self.active_sheet_mut().ok_or("no active sheet")?;
        if sheet.is_locked(row, col) {
            return Err("cell is locked".to_string());
        }
        if sheet.is_merge_hidden(row, col) {
            return Err("cell is hidden by a merge".to_string());
        }
        sheet.set_value(row, col, input);
        self.notify_change();
        Ok(())
    }

    /// Programmatic write that bypasses the lock check. Import paths and
    /// tests use this.
    pub fn set_cell(&mut self, row: usize, col: usize, input: &str) {
        if let Some(sheet) = self.active_sheet_mut() {
            sheet.set_value(row, col, input);
        }
        self.notify_change();
    }

    pub fn clear_range(&mut self, range: Range) {
        if let Some(sheet) = self.active_sheet_mut() {
            for (row, col) in range.cells() {
                if !sheet.is_locked(row, col) {
                    sheet.clear_cell(row, col);
                }
            }
        }
        self.notify_change();
    }

    // ---- style and locks ----

    /// Shallow-merge a style patch into every cell in the range.
    pub fn update_style(&mut self, range: Range, patch: &StylePatch) {
        if let Some(sheet) = self.active_sheet_mut() {
            for (row, col) in range.cells() {
                sheet.apply_style_patch(row, col, patch);
            }
        }
        self.notify_change();
    }

    /// Flip the lock on every cell in the range, each independently of
    /// the others. Two toggles restore the original state exactly, even
    /// for a mixed range.
    pub fn toggle_locks(&mut self, range: Range) {
        if let Some(sheet) = self.active_sheet_mut() {
            for (row, col) in range.cells() {
                let locked = sheet.is_locked(row, col);
                sheet.set_locked(row, col, !locked);
            }
        }
        self.notify_change();
    }

    // ---- merging ----

    pub fn merge_selection(&mut self) {
        let range = self.selection.range();
        if let Some(sheet) = self.active_sheet_mut() {
            sheet.merge(
                (range.start_row, range.start_col),
                (range.end_row, range.end_col),
            );
        }
        self.notify_change();
    }

    pub fn unmerge_at_selection(&mut self) {
        let (row, col) = self.selection.active_cell();
        if let Some(sheet) = self.active_sheet_mut() {
            sheet.unmerge(row, col);
        }
        self.notify_change();
    }

    // ---- structural edits ----

    pub fn insert_rows(&mut self, at: usize, count: usize) {
        let max_rows = self.settings.max_rows;
        if let Some(sheet) = self.active_sheet_mut() {
            let count = count.min(max_rows.saturating_sub(sheet.rows));
            sheet.insert_rows(at, count);
        }
        self.notify_change();
    }

    /// Delete rows, keeping at least one. The sheet itself allows
    /// emptying; this is the guard the workbook puts in front of it.
    pub fn delete_rows(&mut self, at: usize, count: usize) {
        if let Some(sheet) = self.active_sheet_mut() {
            let count = count.min(sheet.rows.saturating_sub(1));
            sheet.delete_rows(at, count);
            let (last_row, last_col) = (sheet.rows - 1, sheet.cols - 1);
            self.selection.move_by(0, 0, last_row, last_col);
        }
        self.notify_change();
    }

    pub fn insert_cols(&mut self, at: usize, count: usize) {
        let max_cols = self.settings.max_cols;
        if let Some(sheet) = self.active_sheet_mut() {
            let count = count.min(max_cols.saturating_sub(sheet.cols));
            sheet.insert_cols(at, count);
        }
        self.notify_change();
    }

    pub fn delete_cols(&mut self, at: usize, count: usize) {
        if let Some(sheet) = self.active_sheet_mut() {
            let count = count.min(sheet.cols.saturating_sub(1));
            sheet.delete_cols(at, count);
            let (last_row, last_col) = (sheet.rows - 1, sheet.cols - 1);
            self.selection.move_by(0, 0, last_row, last_col);
        }
        self.notify_change();
    }

    /// Insert a row above the selection start.
    pub fn insert_row_at_selection(&mut self) {
        let at = self.selection.range().start_row;
        self.insert_rows(at, 1);
    }

    pub fn delete_selected_rows(&mut self) {
        let range = self.selection.range();
        self.delete_rows(range.start_row, range.row_span());
    }

    pub fn insert_col_at_selection(&mut self) {
        let at = self.selection.range().start_col;
        self.insert_cols(at, 1);
    }

    pub fn delete_selected_cols(&mut self) {
        let range = self.selection.range();
        self.delete_cols(range.start_col, range.col_span());
    }

    // ---- sizing ----

    /// Set a row's height, clamped to the configured minimum.
    pub fn set_row_height(&mut self, row: usize, height: f32) {
        let height = height.max(self.settings.min_row_height);
        if let Some(sheet) = self.active_sheet_mut() {
            sheet.set_row_height(row, height);
        }
        self.notify_change();
    }

    pub fn set_col_width(&mut self, col: usize, width: f32) {
        let width = width.max(self.settings.min_col_width);
        if let Some(sheet) = self.active_sheet_mut() {
            sheet.set_col_width(col, width);
        }
        self.notify_change();
    }

    /// Size a column to its widest rendered cell plus padding.
    pub fn autofit_col(&mut self, col: usize, measure: &dyn TextMeasure) {
        let padding = self.settings.autofit_padding;
        let min_width = self.settings.min_col_width;
        if let Some(sheet) = self.active_sheet_mut() {
            let mut widest: f32 = 0.0;
            for (_, cell) in sheet.cells_in_col(col) {
                let text = cell.content.display();
                if !text.is_empty() {
                    widest = widest.max(measure.width(&text, &cell.style));
                }
            }
            let width = (widest + padding).max(min_width);
            sheet.set_col_width(col, width);
        }
        self.notify_change();
    }

    // ---- selection ----

    /// Move or extend the selection to a cell, clamped to sheet bounds.
    pub fn select_cell(&mut self, row: usize, col: usize, extend: bool) {
        let Some(sheet) = self.active_sheet() else {
            return;
        };
        let row = row.min(sheet.rows - 1);
        let col = col.min(sheet.cols - 1);
        self.selection.select(row, col, extend);
    }

    /// Arrow-key style movement. `extend` keeps the anchor in place.
    pub fn move_selection(&mut self, d_row: isize, d_col: isize, extend: bool) {
        let Some(sheet) = self.active_sheet() else {
            return;
        };
        let (max_row, max_col) = (sheet.rows - 1, sheet.cols - 1);
        if extend {
            self.selection.extend_by(d_row, d_col, max_row, max_col);
        } else {
            self.selection.move_by(d_row, d_col, max_row, max_col);
        }
    }

    // ---- notification ----

    pub fn set_change_listener(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    fn emit(&mut self, event: GridEvent) {
        if let Some(listener) = &mut self.listener {
            listener(event);
        }
    }

    pub(crate) fn notify_change(&mut self) {
        if self.listener.is_none() {
            return;
        }
        let Some(sheet) = self.sheets.get(self.active) else {
            return;
        };
        let event = GridEvent::SheetChanged {
            sheet: sheet.id,
            cells: sheet.snapshot(),
        };
        self.emit(event);
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Workbook::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::events::EventCollector;

    #[test]
    fn test_new_workbook_has_one_sheet() {
        let wb = Workbook::default();
        let sheet = wb.active_sheet().unwrap();
        assert_eq!(sheet.name, "Sheet1");
        assert_eq!(sheet.rows, 100);
        assert_eq!(sheet.cols, 26);
    }

    #[test]
    fn test_add_sheet_activates_and_names_uniquely() {
        let mut wb = Workbook::default();
        let id = wb.add_sheet();
        assert_eq!(wb.active_sheet().unwrap().id, id);
        assert_eq!(wb.active_sheet().unwrap().name, "Sheet2");
        wb.add_sheet();
        assert_eq!(wb.active_sheet().unwrap().name, "Sheet3");
    }

    #[test]
    fn test_sheet_ids_never_reused() {
        let mut wb = Workbook::default();
        let id2 = wb.add_sheet();
        wb.delete_sheet(id2).unwrap();
        let id3 = wb.add_sheet();
        assert_ne!(id2, id3);
        assert!(id3.0 > id2.0);
    }

    #[test]
    fn test_cannot_delete_last_sheet() {
        let mut wb = Workbook::default();
        let id = wb.active_sheet().unwrap().id;
        assert!(wb.delete_sheet(id).is_err());
    }

    #[test]
    fn test_delete_active_sheet_falls_back() {
        let mut wb = Workbook::default();
        let first = wb.active_sheet().unwrap().id;
        let second = wb.add_sheet();
        assert_eq!(wb.active_sheet().unwrap().id, second);
        wb.delete_sheet(second).unwrap();
        assert_eq!(wb.active_sheet().unwrap().id, first);
    }

    #[test]
    fn test_rename_rejects_duplicates() {
        let mut wb = Workbook::default();
        let id = wb.add_sheet();
        assert!(wb.rename_sheet(id, "Budget").is_ok());
        assert!(wb.rename_sheet(id, "  ").is_err());
        let first = wb.sheets()[0].id;
        assert!(wb.rename_sheet(first, "budget").is_err());
    }

    #[test]
    fn test_select_sheet_unknown_id_is_noop() {
        let mut wb = Workbook::default();
        let active = wb.active_sheet().unwrap().id;
        wb.select_sheet(SheetId(999));
        assert_eq!(wb.active_sheet().unwrap().id, active);
    }

    #[test]
    fn test_sheets_are_isolated() {
        let mut wb = Workbook::default();
        wb.set_cell(0, 0, "first");
        let first = wb.active_sheet().unwrap().id;
        wb.add_sheet();
        assert_eq!(wb.active_sheet().unwrap().get_display(0, 0), "");
        wb.set_cell(0, 0, "second");
        wb.select_sheet(first);
        assert_eq!(wb.active_sheet().unwrap().get_display(0, 0), "first");
    }

    #[test]
    fn test_edit_refuses_locked_and_hidden_cells() {
        let mut wb = Workbook::default();
        wb.selection.select(0, 0, false);
        wb.toggle_locks(wb.selection.range());
        assert!(wb.edit_cell(0, 0, "nope").is_err());

        wb.active_sheet_mut().unwrap().merge((2, 2), (3, 3));
        assert!(wb.edit_cell(3, 3, "nope").is_err());
        assert!(wb.edit_cell(2, 2, "anchor ok").is_ok());
    }

    #[test]
    fn test_lock_toggle_flips_each_cell_and_double_toggle_restores() {
        let mut wb = Workbook::default();
        wb.set_cell(0, 0, "a");
        let range = Range::new(0, 0, 1, 1);
        // Mixed starting state: only (0,0) locked.
        wb.active_sheet_mut().unwrap().set_locked(0, 0, true);

        wb.toggle_locks(range);
        let sheet = wb.active_sheet().unwrap();
        assert!(!sheet.is_locked(0, 0));
        assert!(sheet.is_locked(0, 1));
        assert!(sheet.is_locked(1, 0));
        assert!(sheet.is_locked(1, 1));

        wb.toggle_locks(range);
        let sheet = wb.active_sheet().unwrap();
        assert!(sheet.is_locked(0, 0));
        assert!(!sheet.is_locked(0, 1));
        assert!(!sheet.is_locked(1, 0));
        assert!(!sheet.is_locked(1, 1));
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut wb = Workbook::default();
        wb.set_row_height(0, 3.0);
        wb.set_col_width(0, 3.0);
        let sheet = wb.active_sheet().unwrap();
        assert_eq!(sheet.row_height(0), wb.settings.min_row_height);
        assert_eq!(sheet.col_width(0), wb.settings.min_col_width);
    }

    struct FixedMeasure(f32);

    impl TextMeasure for FixedMeasure {
        fn width(&self, text: &str, _style: &CellStyle) -> f32 {
            text.len() as f32 * self.0
        }
    }

    #[test]
    fn test_autofit_col() {
        let mut wb = Workbook::default();
        wb.set_cell(0, 0, "short");
        wb.set_cell(1, 0, "much longer text");
        wb.autofit_col(0, &FixedMeasure(10.0));
        let expected = 16.0 * 10.0 + wb.settings.autofit_padding;
        assert_eq!(wb.active_sheet().unwrap().col_width(0), expected);
    }

    #[test]
    fn test_autofit_empty_col_falls_to_minimum() {
        let mut wb = Workbook::default();
        wb.autofit_col(3, &FixedMeasure(10.0));
        assert_eq!(
            wb.active_sheet().unwrap().col_width(3),
            wb.settings.min_col_width.max(wb.settings.autofit_padding)
        );
    }

    #[test]
    fn test_selection_clamped_to_sheet() {
        let mut wb = Workbook::default();
        wb.select_cell(10_000, 10_000, false);
        assert_eq!(wb.selection.active_cell(), (99, 25));
        wb.move_selection(5, -100, false);
        assert_eq!(wb.selection.active_cell(), (99, 0));
    }

    #[test]
    fn test_arrow_navigation_reaches_last_row_and_col() {
        let mut wb = Workbook::default();
        wb.select_cell(98, 24, false);
        wb.move_selection(1, 1, false);
        assert_eq!(wb.selection.active_cell(), (99, 25));
        // Already at the edge: further movement stays put.
        wb.move_selection(1, 1, false);
        assert_eq!(wb.selection.active_cell(), (99, 25));
    }

    #[test]
    fn test_delete_rows_clamps_selection_without_panic() {
        let mut wb = Workbook::default();
        wb.delete_rows(0, 1);
        assert_eq!(wb.active_sheet().unwrap().rows, 99);
        assert_eq!(wb.selection.active_cell(), (0, 0));

        wb.select_cell(98, 25, false);
        wb.delete_rows(90, 9);
        assert_eq!(wb.active_sheet().unwrap().rows, 90);
        assert_eq!(wb.selection.active_cell(), (89, 25));
    }

    #[test]
    fn test_delete_cols_clamps_selection_without_panic() {
        let mut wb = Workbook::default();
        wb.select_cell(0, 25, false);
        wb.delete_selected_cols();
        assert_eq!(wb.active_sheet().unwrap().cols, 25);
        assert_eq!(wb.selection.active_cell(), (0, 24));
    }

    #[test]
    fn test_change_listener_gets_snapshots() {
        let mut wb = Workbook::default();
        let collector = Rc::new(RefCell::new(EventCollector::default()));
        let sink = collector.clone();
        wb.set_change_listener(Box::new(move |event| sink.borrow_mut().push(event)));

        wb.set_cell(1, 1, "hello");
        wb.insert_rows(0, 1);

        let collector = collector.borrow();
        let snapshots = collector.snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0][1][1].content.display(), "hello");
        assert_eq!(snapshots[1][2][1].content.display(), "hello");
    }

    #[test]
    fn test_insert_rows_capped_at_max() {
        let mut wb = Workbook::default();
        let max = wb.settings.max_rows;
        wb.insert_rows(0, usize::MAX);
        assert_eq!(wb.active_sheet().unwrap().rows, max);
    }
}
