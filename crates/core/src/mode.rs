//! Interaction modes.
//!
//! All transient pointer/keyboard interaction state lives here so it has
//! exactly one owner and one exit path: edits end by commit or cancel,
//! drags end on release, never leaving a cell stuck mid-interaction.

/// What keyboard/pointer input is currently driving.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    /// Grid focus: keystrokes move the selection.
    #[default]
    Navigating,
    /// Cell editor open over one cell; `buffer` holds the in-progress text.
    Editing {
        row: usize,
        col: usize,
        buffer: String,
    },
    /// Pointer held on a row divider.
    ResizingRow { index: usize, start_size: f32 },
    /// Pointer held on a column divider.
    ResizingCol { index: usize, start_size: f32 },
    /// Pointer held while sweeping out a range selection.
    DraggingSelection,
}

impl Mode {
    /// Enter edit mode on a cell, seeding the buffer with the cell's
    /// formula source if it has one, else its display value.
    pub fn begin_edit(&mut self, row: usize, col: usize, seed: String) {
        *self = Mode::Editing { row, col, buffer: seed };
    }

    /// Commit the edit (Enter / blur): returns the target cell and the
    /// buffer to hand to the cell store, and returns to navigation.
    pub fn commit_edit(&mut self) -> Option<(usize, usize, String)> {
        match std::mem::take(self) {
            Mode::Editing { row, col, buffer } => Some((row, col, buffer)),
            other => {
                *self = other;
                None
            }
        }
    }

    /// Discard the edit (Escape) and return to navigation.
    pub fn cancel_edit(&mut self) {
        if matches!(self, Mode::Editing { .. }) {
            *self = Mode::Navigating;
        }
    }

    /// Unconditionally clear any drag/resize state (global mouse-up).
    /// An open editor is left alone; release elsewhere is a blur, which
    /// the caller turns into a commit.
    pub fn end_drag(&mut self) {
        if matches!(
            self,
            Mode::ResizingRow { .. } | Mode::ResizingCol { .. } | Mode::DraggingSelection
        ) {
            *self = Mode::Navigating;
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Mode::Editing { .. })
    }

    /// Mutable access to the edit buffer, if editing.
    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            Mode::Editing { buffer, .. } => Some(buffer),
            _ => None,
        }
    }
}
