//! A single sheet: sparse cell storage, merged regions, and per-axis
//! size overrides, bounded by a logical row/column count.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellContent, CellStyle, StylePatch};
use crate::formula::{self, CellLookup, EvalResult};

/// Monotonic sheet identifier. Ids are never reused, even after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetId(pub u64);

/// A rectangular merged region. Regions in a sheet never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRegion {
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl MergedRegion {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        MergedRegion {
            start: (start.0.min(end.0), start.1.min(end.1)),
            end: (start.0.max(end.0), start.1.max(end.1)),
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start.0 && row <= self.end.0 && col >= self.start.1 && col <= self.end.1
    }

    pub fn intersects(&self, other: &MergedRegion) -> bool {
        self.start.0 <= other.end.0
            && other.start.0 <= self.end.0
            && self.start.1 <= other.end.1
            && other.start.1 <= self.end.1
    }

    /// Top-left cell. It carries the region's content and is the only
    /// cell in the region that renders.
    pub fn anchor(&self) -> (usize, usize) {
        self.start
    }

    pub fn row_span(&self) -> usize {
        self.end.0 - self.start.0 + 1
    }

    pub fn col_span(&self) -> usize {
        self.end.1 - self.start.1 + 1
    }
}

/// Per-cell view of merge state, resolved from the region list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeInfo {
    pub anchor: (usize, usize),
    pub row_span: usize,
    pub col_span: usize,
    /// True for every covered cell except the anchor.
    pub hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub id: SheetId,
    pub name: String,
    cells: FxHashMap<(usize, usize), Cell>,
    pub rows: usize,
    pub cols: usize,
    pub merged_regions: Vec<MergedRegion>,
    row_heights: FxHashMap<usize, f32>,
    col_widths: FxHashMap<usize, f32>,
    pub default_row_height: f32,
    pub default_col_width: f32,
}

impl Sheet {
    pub fn new(id: SheetId, name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Sheet {
            id,
            name: name.into(),
            cells: FxHashMap::default(),
            rows,
            cols,
            merged_regions: Vec::new(),
            row_heights: FxHashMap::default(),
            col_widths: FxHashMap::default(),
            default_row_height: 25.0,
            default_col_width: 100.0,
        }
    }

    /// Out-of-bounds cell writes are silently dropped, never a crash.
    fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Set a cell from raw input. Formulas are parsed and evaluated here,
    /// once, against the grid as it stands; the display string is cached
    /// on the cell. Out-of-bounds writes are dropped.
    pub fn set_value(&mut self, row: usize, col: usize, input: &str) {
        if !self.in_bounds(row, col) {
            return;
        }
        let mut content = CellContent::from_input(input);
        if let CellContent::Formula { source, cached } = &mut content {
            *cached = match formula::parse(source) {
                Ok(expr) => formula::evaluate(&expr, self).to_display(),
                Err(e) => EvalResult::Error(e).to_display(),
            };
        }
        match self.cells.get_mut(&(row, col)) {
            Some(cell) => {
                cell.content = content;
                if cell.is_default() {
                    self.cells.remove(&(row, col));
                }
            }
            None => {
                if !content.is_empty() {
                    self.cells.insert((row, col), Cell::new(content));
                }
            }
        }
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Rendered string for a cell. Empty cells render as "".
    pub fn get_display(&self, row: usize, col: usize) -> String {
        self.cells
            .get(&(row, col))
            .map(|c| c.content.display())
            .unwrap_or_default()
    }

    /// Editor seed for a cell: formula source, else display value.
    pub fn get_raw(&self, row: usize, col: usize) -> String {
        self.cells
            .get(&(row, col))
            .map(|c| c.content.raw())
            .unwrap_or_default()
    }

    pub fn get_style(&self, row: usize, col: usize) -> CellStyle {
        self.cells
            .get(&(row, col))
            .map(|c| c.style.clone())
            .unwrap_or_default()
    }

    pub fn apply_style_patch(&mut self, row: usize, col: usize, patch: &StylePatch) {
        if !self.in_bounds(row, col) {
            return;
        }
        self.cells
            .entry((row, col))
            .or_default()
            .style
            .apply(patch);
    }

    pub fn is_locked(&self, row: usize, col: usize) -> bool {
        self.cells.get(&(row, col)).is_some_and(|c| c.locked)
    }

    pub fn set_locked(&mut self, row: usize, col: usize, locked: bool) {
        if !self.in_bounds(row, col) {
            return;
        }
        match self.cells.get_mut(&(row, col)) {
            Some(cell) => {
                cell.locked = locked;
                if cell.is_default() {
                    self.cells.remove(&(row, col));
                }
            }
            None => {
                if locked {
                    let mut cell = Cell::default();
                    cell.locked = true;
                    self.cells.insert((row, col), cell);
                }
            }
        }
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.cells.get_mut(&(row, col)) {
            cell.content = CellContent::Empty;
            if cell.is_default() {
                self.cells.remove(&(row, col));
            }
        }
    }

    /// Replace a cell wholesale (content, style, and lock). Used by paste.
    pub fn put_cell(&mut self, row: usize, col: usize, cell: Cell) {
        if !self.in_bounds(row, col) {
            return;
        }
        if cell.is_default() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), cell);
        }
    }

    pub fn cells_in_col(&self, col: usize) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells
            .iter()
            .filter(move |((_, c), _)| *c == col)
            .map(|((r, _), cell)| (*r, cell))
    }

    // ---- merged regions ----

    /// Merge a rectangle. Single cells are a no-op; any existing region
    /// intersecting the new one is removed first, so regions never overlap.
    pub fn merge(&mut self, start: (usize, usize), end: (usize, usize)) {
        let region = MergedRegion::new(start, end);
        if region.row_span() == 1 && region.col_span() == 1 {
            return;
        }
        if !self.in_bounds(region.end.0, region.end.1) {
            return;
        }
        self.merged_regions.retain(|m| !m.intersects(&region));
        self.merged_regions.push(region);
    }

    pub fn unmerge(&mut self, row: usize, col: usize) {
        self.merged_regions.retain(|m| !m.contains(row, col));
    }

    pub fn merge_info(&self, row: usize, col: usize) -> Option<MergeInfo> {
        self.merged_regions
            .iter()
            .find(|m| m.contains(row, col))
            .map(|m| MergeInfo {
                anchor: m.anchor(),
                row_span: m.row_span(),
                col_span: m.col_span(),
                hidden: m.anchor() != (row, col),
            })
    }

    /// A covered, non-anchor cell. Hidden cells keep their data but do
    /// not render and refuse direct edits.
    pub fn is_merge_hidden(&self, row: usize, col: usize) -> bool {
        self.merge_info(row, col).is_some_and(|m| m.hidden)
    }

    // ---- row heights / column widths ----

    pub fn row_height(&self, row: usize) -> f32 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(self.default_row_height)
    }

    pub fn col_width(&self, col: usize) -> f32 {
        self.col_widths
            .get(&col)
            .copied()
            .unwrap_or(self.default_col_width)
    }

    pub fn set_row_height(&mut self, row: usize, height: f32) {
        if row < self.rows {
            self.row_heights.insert(row, height);
        }
    }

    pub fn set_col_width(&mut self, col: usize, width: f32) {
        if col < self.cols {
            self.col_widths.insert(col, width);
        }
    }

    // ---- structural edits ----

    /// Insert blank rows before `at`. Cells, merges, and height overrides
    /// at or below `at` shift down together. New rows pick up the styles
    /// of the sheet's first row, where that row has any.
    pub fn insert_rows(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        let at = at.min(self.rows);
        let template: Vec<(usize, CellStyle)> = self
            .cells
            .iter()
            .filter(|((r, _), cell)| *r == 0 && cell.style != CellStyle::default())
            .map(|((_, c), cell)| (*c, cell.style.clone()))
            .collect();

        let shifted: Vec<((usize, usize), Cell)> = self
            .cells
            .iter()
            .filter(|((r, _), _)| *r >= at)
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        for (k, _) in &shifted {
            self.cells.remove(k);
        }
        for ((r, c), cell) in shifted {
            self.cells.insert((r + count, c), cell);
        }

        for row in at..at + count {
            for (col, style) in &template {
                self.cells.insert(
                    (row, *col),
                    Cell {
                        content: CellContent::Empty,
                        style: style.clone(),
                        locked: false,
                    },
                );
            }
        }

        for m in &mut self.merged_regions {
            if m.start.0 >= at {
                m.start.0 += count;
                m.end.0 += count;
            } else if m.end.0 >= at {
                m.end.0 += count;
            }
        }

        let heights: Vec<(usize, f32)> = self
            .row_heights
            .iter()
            .filter(|(r, _)| **r >= at)
            .map(|(r, h)| (*r, *h))
            .collect();
        for (r, _) in &heights {
            self.row_heights.remove(r);
        }
        for (r, h) in heights {
            self.row_heights.insert(r + count, h);
        }

        self.rows += count;
    }

    /// Delete `count` rows starting at `at`. Merges entirely inside the
    /// band disappear; merges straddling it shrink. Deleting every row
    /// is allowed and leaves an empty dimension; callers that want a
    /// floor guard it themselves.
    pub fn delete_rows(&mut self, at: usize, count: usize) {
        if count == 0 || at >= self.rows {
            return;
        }
        let count = count.min(self.rows - at);

        self.cells
            .retain(|(r, _), _| *r < at || *r >= at + count);
        let shifted: Vec<((usize, usize), Cell)> = self
            .cells
            .iter()
            .filter(|((r, _), _)| *r >= at + count)
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        for (k, _) in &shifted {
            self.cells.remove(k);
        }
        for ((r, c), cell) in shifted {
            self.cells.insert((r - count, c), cell);
        }

        self.merged_regions = self
            .merged_regions
            .iter()
            .filter_map(|m| shrink_region_rows(*m, at, count))
            .collect();

        self.row_heights.retain(|r, _| *r < at || *r >= at + count);
        let heights: Vec<(usize, f32)> = self
            .row_heights
            .iter()
            .filter(|(r, _)| **r >= at + count)
            .map(|(r, h)| (*r, *h))
            .collect();
        for (r, _) in &heights {
            self.row_heights.remove(r);
        }
        for (r, h) in heights {
            self.row_heights.insert(r - count, h);
        }

        self.rows -= count;
    }

    /// Insert blank columns before `at`. Mirrors `insert_rows`, including
    /// the first-column style template.
    pub fn insert_cols(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        let at = at.min(self.cols);
        let template: Vec<(usize, CellStyle)> = self
            .cells
            .iter()
            .filter(|((_, c), cell)| *c == 0 && cell.style != CellStyle::default())
            .map(|((r, _), cell)| (*r, cell.style.clone()))
            .collect();

        let shifted: Vec<((usize, usize), Cell)> = self
            .cells
            .iter()
            .filter(|((_, c), _)| *c >= at)
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        for (k, _) in &shifted {
            self.cells.remove(k);
        }
        for ((r, c), cell) in shifted {
            self.cells.insert((r, c + count), cell);
        }

        for col in at..at + count {
            for (row, style) in &template {
                self.cells.insert(
                    (*row, col),
                    Cell {
                        content: CellContent::Empty,
                        style: style.clone(),
                        locked: false,
                    },
                );
            }
        }

        for m in &mut self.merged_regions {
            if m.start.1 >= at {
                m.start.1 += count;
                m.end.1 += count;
            } else if m.end.1 >= at {
                m.end.1 += count;
            }
        }

        let widths: Vec<(usize, f32)> = self
            .col_widths
            .iter()
            .filter(|(c, _)| **c >= at)
            .map(|(c, w)| (*c, *w))
            .collect();
        for (c, _) in &widths {
            self.col_widths.remove(c);
        }
        for (c, w) in widths {
            self.col_widths.insert(c + count, w);
        }

        self.cols += count;
    }

    pub fn delete_cols(&mut self, at: usize, count: usize) {
        if count == 0 || at >= self.cols {
            return;
        }
        let count = count.min(self.cols - at);

        self.cells
            .retain(|(_, c), _| *c < at || *c >= at + count);
        let shifted: Vec<((usize, usize), Cell)> = self
            .cells
            .iter()
            .filter(|((_, c), _)| *c >= at + count)
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        for (k, _) in &shifted {
            self.cells.remove(k);
        }
        for ((r, c), cell) in shifted {
            self.cells.insert((r, c - count), cell);
        }

        self.merged_regions = self
            .merged_regions
            .iter()
            .filter_map(|m| shrink_region_cols(*m, at, count))
            .collect();

        self.col_widths.retain(|c, _| *c < at || *c >= at + count);
        let widths: Vec<(usize, f32)> = self
            .col_widths
            .iter()
            .filter(|(c, _)| **c >= at + count)
            .map(|(c, w)| (*c, *w))
            .collect();
        for (c, _) in &widths {
            self.col_widths.remove(c);
        }
        for (c, w) in widths {
            self.col_widths.insert(c - count, w);
        }

        self.cols -= count;
    }

    // ---- snapshots ----

    /// Smallest (rows, cols) rectangle covering every stored cell and
    /// merged region.
    pub fn used_extent(&self) -> (usize, usize) {
        let mut rows = 0;
        let mut cols = 0;
        for (r, c) in self.cells.keys() {
            rows = rows.max(r + 1);
            cols = cols.max(c + 1);
        }
        for m in &self.merged_regions {
            rows = rows.max(m.end.0 + 1);
            cols = cols.max(m.end.1 + 1);
        }
        (rows, cols)
    }

    /// Dense copy of the used portion of the grid, row-major. This is
    /// what change listeners receive.
    pub fn snapshot(&self) -> Vec<Vec<Cell>> {
        let (rows, cols) = self.used_extent();
        let mut out = vec![vec![Cell::default(); cols]; rows];
        for ((r, c), cell) in &self.cells {
            out[*r][*c] = cell.clone();
        }
        out
    }
}

impl CellLookup for Sheet {
    fn get_value(&self, row: usize, col: usize) -> f64 {
        self.cells
            .get(&(row, col))
            .map(|c| c.content.as_number())
            .unwrap_or(0.0)
    }
}

fn shrink_region_rows(mut m: MergedRegion, at: usize, count: usize) -> Option<MergedRegion> {
    m.start.0 = shift_after_delete(m.start.0, at, count);
    m.end.0 = if m.end.0 >= at + count {
        m.end.0 - count
    } else if m.end.0 >= at {
        // End fell inside the band; clamp to the row above it.
        at.checked_sub(1)?
    } else {
        m.end.0
    };
    (m.start.0 <= m.end.0 && (m.row_span() > 1 || m.col_span() > 1)).then_some(m)
}

fn shrink_region_cols(mut m: MergedRegion, at: usize, count: usize) -> Option<MergedRegion> {
    m.start.1 = shift_after_delete(m.start.1, at, count);
    m.end.1 = if m.end.1 >= at + count {
        m.end.1 - count
    } else if m.end.1 >= at {
        at.checked_sub(1)?
    } else {
        m.end.1
    };
    (m.start.1 <= m.end.1 && (m.row_span() > 1 || m.col_span() > 1)).then_some(m)
}

/// Where an index lands after deleting `count` slots at `at`. An index
/// inside the deleted band clamps to `at`.
fn shift_after_delete(i: usize, at: usize, count: usize) -> usize {
    if i >= at + count {
        i - count
    } else if i >= at {
        at
    } else {
        i
    }
}
