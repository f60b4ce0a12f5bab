//! Change notification. Listeners get a full snapshot of the active
//! sheet after every mutation; there is no diffing.

use crate::cell::Cell;
use crate::sheet::SheetId;

#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Any data, style, lock, merge, or structural change on a sheet.
    /// Carries a dense snapshot of the sheet's used extent.
    SheetChanged {
        sheet: SheetId,
        cells: Vec<Vec<Cell>>,
    },
    SheetAdded { sheet: SheetId },
    SheetRemoved { sheet: SheetId },
    ActiveSheetChanged { sheet: SheetId },
}

pub type ChangeListener = Box<dyn FnMut(GridEvent)>;

/// Test helper that records events.
#[derive(Debug, Default)]
pub struct EventCollector {
    pub events: Vec<GridEvent>,
}

impl EventCollector {
    pub fn push(&mut self, event: GridEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Snapshots carried by SheetChanged events, in order.
    pub fn snapshots(&self) -> Vec<&Vec<Vec<Cell>>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::SheetChanged { cells, .. } => Some(cells),
                _ => None,
            })
            .collect()
    }
}
