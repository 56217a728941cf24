//! Fixed screen regions derived from the terminal area.

use ratatui::layout::Rect;

use crate::core::layout::{FIRST_ROW, ROW_PITCH};

/// Narrowest window the list and preview can be drawn in.
pub const MIN_WIDTH: u16 = 20;

/// Column of the `[ ]` marker.
const MARKER_COL: u16 = 2;
/// Column where titles and URLs start.
const TEXT_COL: u16 = 7;
/// Preview box: height, distance of its top edge from the screen bottom,
/// and inset from the left / right screen edges.
const PREVIEW_HEIGHT: u16 = 8;
const PREVIEW_TOP_FROM_BOTTOM: u16 = 10;
const PREVIEW_INSET: u16 = 3;
/// Visible excerpt lines inside the preview box.
pub const PREVIEW_LINES: usize = 4;

/// Screen regions for the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub area: Rect,
    /// The bordered preview box.
    pub preview: Rect,
}

impl ScreenLayout {
    pub fn from_area(area: Rect) -> Self {
        let preview = Rect::new(
            area.x + PREVIEW_INSET,
            area.y + area.height.saturating_sub(PREVIEW_TOP_FROM_BOTTOM),
            area.width.saturating_sub(2 * PREVIEW_INSET),
            PREVIEW_HEIGHT.min(area.height),
        );
        Self { area, preview }
    }

    /// Whether the window is wide enough for the list view.
    pub fn wide_enough(&self) -> bool {
        self.area.width >= MIN_WIDTH
    }

    pub fn marker_x(&self) -> u16 {
        self.area.x + MARKER_COL
    }

    pub fn text_x(&self) -> u16 {
        self.area.x + TEXT_COL
    }

    /// Room for text between its start column and the right border.
    pub fn text_room(&self) -> usize {
        usize::from(self.area.width.saturating_sub(TEXT_COL + 1))
    }

    /// Column of the `[...]` truncation marker.
    pub fn ellipsis_x(&self) -> u16 {
        self.area.x + self.area.width.saturating_sub(7)
    }

    /// Screen row of the title line of the `index`-th entry on the page.
    pub fn entry_y(&self, index: usize) -> u16 {
        let offset = u16::try_from(index).unwrap_or(u16::MAX).saturating_mul(ROW_PITCH);
        self.area.y + FIRST_ROW.saturating_add(offset)
    }

    /// Top-left cell of the excerpt text inside the preview box.
    pub fn excerpt_origin(&self) -> (u16, u16) {
        (self.preview.x + 2, self.preview.y + 2)
    }

    pub fn excerpt_width(&self) -> usize {
        usize::from(self.area.width.saturating_sub(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_sits_above_the_bottom_border() {
        let layout = ScreenLayout::from_area(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.preview, Rect::new(3, 30, 94, 8));
        assert_eq!(layout.excerpt_origin(), (5, 32));
        assert_eq!(layout.excerpt_width(), 90);
        assert_eq!(layout.ellipsis_x(), 93);
        assert_eq!(layout.entry_y(0), 2);
        assert_eq!(layout.entry_y(8), 26);
    }
}
