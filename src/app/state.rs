//! Pagination / selection state.
//!
//! [`ScreenState`] is a plain value: every transition consumes the old state
//! and returns the next one, so the rules can be exercised without a
//! terminal.  The cursor position is derived from page/row and never stored.

use crate::core::layout::{LayoutMetrics, CURSOR_COL, FIRST_ROW, ROW_PITCH};

/// Which interaction context is active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Key-binding reference; the next key press closes it.
    Help,
    /// Waiting for `y` before deleting the item the user picked.
    ConfirmDelete { item_id: String, title: String },
}

/// One-line message shown on the bottom border until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Terminal cell the cursor is parked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: u16,
    pub col: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenState {
    /// Zero-based page index.
    pub page: usize,
    /// Selection within the current page.
    pub row: usize,
    pub mode: Mode,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Global index of the selected item, or `None` when the selection does
    /// not denote an item (empty list, no room on screen).
    pub fn selected_index(&self, metrics: &LayoutMetrics, item_count: usize) -> Option<usize> {
        (self.row < metrics.items_on_page(self.page, item_count))
            .then(|| self.page * metrics.max_per_page + self.row)
    }

    pub fn cursor(&self) -> Cursor {
        let offset = u16::try_from(self.row).unwrap_or(u16::MAX).saturating_mul(ROW_PITCH);
        Cursor {
            row: FIRST_ROW.saturating_add(offset),
            col: CURSOR_COL,
        }
    }

    pub fn move_down(mut self, metrics: &LayoutMetrics, item_count: usize) -> Self {
        if self.row + 1 < metrics.items_on_page(self.page, item_count) {
            self.row += 1;
        }
        self
    }

    pub fn move_up(mut self) -> Self {
        self.row = self.row.saturating_sub(1);
        self
    }

    pub fn prev_page(mut self) -> Self {
        if self.page > 0 {
            self.page -= 1;
            self.row = 0;
        }
        self
    }

    pub fn next_page(mut self, metrics: &LayoutMetrics) -> Self {
        if self.page + 1 < metrics.page_count {
            self.page += 1;
            self.row = 0;
        }
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Re-establish the selection invariant after the snapshot changed:
    /// an index that no longer denotes an item falls back to the origin.
    pub fn reclamp(self, metrics: &LayoutMetrics, item_count: usize) -> Self {
        if self.selected_index(metrics, item_count).is_some() {
            self
        } else {
            self.to_origin()
        }
    }

    /// Apply a viewport change.  The selection is kept only if the cursor
    /// still lands inside the window and still denotes an item.
    pub fn resized(self, metrics: &LayoutMetrics, item_count: usize) -> Self {
        let cursor = self.cursor();
        let viewport = metrics.viewport;
        if cursor.row >= viewport.height || cursor.col >= viewport.width {
            return self.to_origin();
        }
        self.reclamp(metrics, item_count)
    }

    fn to_origin(mut self) -> Self {
        self.page = 0;
        self.row = 0;
        self
    }
}
