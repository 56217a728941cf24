//! Page geometry: how many items fit on screen and how many pages that makes.
//!
//! Pure arithmetic over the viewport size and the snapshot length; nothing
//! here knows about widgets or terminals.

/// Rows reserved for the border, header and preview panel.
pub const RESERVED_ROWS: u16 = 12;

/// Screen lines used by one list entry (marker + title, URL, spacer).
pub const ROW_PITCH: u16 = 3;

/// Screen row of the first list entry.
pub const FIRST_ROW: u16 = 2;

/// Screen column the cursor sits on (inside the `[ ]` marker).
pub const CURSOR_COL: u16 = 3;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Derived page layout for one viewport / item-count combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutMetrics {
    pub viewport: Viewport,
    /// Items that fit on one page; `0` when the window is too short.
    pub max_per_page: usize,
    /// `0` when nothing can be shown (no room or no items).
    pub page_count: usize,
}

impl LayoutMetrics {
    pub fn compute(viewport: Viewport, item_count: usize) -> Self {
        let max_per_page = usize::from(viewport.height.saturating_sub(RESERVED_ROWS) / ROW_PITCH);
        let page_count = if max_per_page == 0 || item_count == 0 {
            0
        } else {
            item_count.div_ceil(max_per_page)
        };
        Self {
            viewport,
            max_per_page,
            page_count,
        }
    }

    /// Number of entries on `page`; the last page may be short.
    pub fn items_on_page(&self, page: usize, item_count: usize) -> usize {
        if page >= self.page_count {
            return 0;
        }
        let start = page * self.max_per_page;
        item_count.saturating_sub(start).min(self.max_per_page)
    }

    /// Index range of the snapshot shown on `page`.
    pub fn page_range(&self, page: usize, item_count: usize) -> std::ops::Range<usize> {
        match self.items_on_page(page, item_count) {
            0 => 0..0,
            len => {
                let start = page * self.max_per_page;
                start..start + len
            }
        }
    }
}
