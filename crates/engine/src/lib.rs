//! formgrid-engine: the grid itself. Sheets hold sparse cells, formulas
//! evaluate once at entry, and the workbook ties sheets, selection,
//! clipboard, and change notification together.

pub mod cell;
pub mod clipboard;
pub mod events;
pub mod formula;
pub mod sheet;
pub mod workbook;

pub use cell::{Alignment, Cell, CellContent, CellStyle, StylePatch, VerticalAlignment};
pub use clipboard::ClipBuffer;
pub use events::{ChangeListener, EventCollector, GridEvent};
pub use formula::{CellLookup, EvalResult};
pub use sheet::{MergeInfo, MergedRegion, Sheet, SheetId};
pub use workbook::{TextMeasure, Workbook};
