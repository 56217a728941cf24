//! The full-screen view, drawn straight onto the cell grid.
//!
//! [`ScreenView`] borrows everything it shows and renders into a ratatui
//! [`Buffer`]; it never mutates state, so the same inputs always produce the
//! same cells.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::layout::{ScreenLayout, PREVIEW_LINES};
use super::theme::Theme;
use crate::app::state::{Cursor, Mode, Notice, ScreenState};
use crate::core::item::Item;
use crate::core::layout::LayoutMetrics;

pub const ENLARGE_MSG: &str = "Enlarge the terminal window.";
pub const EMPTY_MSG: &str = "Your reading list is empty. Press 'r' to refresh.";
pub const CONFIRM_MSG: &str = "Deleted items cannot be recovered. Press 'y' to confirm.";
pub const ELLIPSIS: &str = "[...]";

/// Everything one frame shows.
pub struct ScreenView<'a> {
    pub state: &'a ScreenState,
    pub metrics: &'a LayoutMetrics,
    pub items: &'a [Item],
    /// Key-binding reference for the help screen.
    pub help: &'a [String],
    pub notice: Option<&'a Notice>,
}

impl ScreenView<'_> {
    /// Where the terminal cursor should be parked, if anywhere.
    pub fn cursor(&self) -> Option<Cursor> {
        let area = Rect::new(0, 0, self.metrics.viewport.width, self.metrics.viewport.height);
        let showing_list = self.state.mode == Mode::Normal
            && self.fits_list(&ScreenLayout::from_area(area))
            && self.state.selected_index(self.metrics, self.items.len()).is_some();
        showing_list.then(|| self.state.cursor())
    }

    fn fits_list(&self, layout: &ScreenLayout) -> bool {
        self.metrics.max_per_page > 0 && layout.wide_enough()
    }

    fn header(&self) -> String {
        format!(
            " Pocket [{}] ({}/{}) ('q' or Ctrl+C to exit, '?' to get help) ",
            self.items.len(),
            self.state.page + 1,
            self.metrics.page_count,
        )
    }

    fn render_entries(&self, layout: &ScreenLayout, buf: &mut Buffer) {
        let range = self.metrics.page_range(self.state.page, self.items.len());
        let width = layout.area.width;
        let room = layout.text_room();

        for (i, item) in self.items[range].iter().enumerate() {
            let y = layout.entry_y(i);
            buf.set_string(layout.marker_x(), y, "[ ]", Style::default());

            let (title, cut) = truncate(&item.title, width);
            buf.set_stringn(layout.text_x(), y, &title, room, Theme::title_style());
            if cut {
                buf.set_string(layout.ellipsis_x(), y, ELLIPSIS, Theme::ellipsis_style());
            }

            let (url, cut) = truncate(&item.url, width);
            buf.set_stringn(layout.text_x(), y + 1, &url, room, Theme::link_style());
            if cut {
                buf.set_string(layout.ellipsis_x(), y + 1, ELLIPSIS, Theme::link_ellipsis_style());
            }
        }
    }

    fn render_preview(&self, layout: &ScreenLayout, buf: &mut Buffer) {
        Block::bordered()
            .border_style(Theme::border_style())
            .render(layout.preview, buf);

        let Some(item) = self
            .state
            .selected_index(self.metrics, self.items.len())
            .and_then(|i| self.items.get(i))
        else {
            return;
        };

        let (x, y) = layout.excerpt_origin();
        for (j, line) in preview_lines(&item.excerpt, layout.excerpt_width()).iter().enumerate() {
            buf.set_stringn(x, y + j as u16, line, layout.excerpt_width(), Style::default());
        }
    }
}

impl Widget for &ScreenView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = ScreenLayout::from_area(area);
        // Leave the corners of the border intact.
        let border_room = usize::from(area.width.saturating_sub(3));

        Block::bordered()
            .border_style(Theme::border_style())
            .render(area, buf);
        buf.set_stringn(area.x + 2, area.y, self.header(), border_room, Theme::header_style());

        if let Some(notice) = self.notice {
            let (text, style) = match notice {
                Notice::Info(text) => (text, Theme::info_style()),
                Notice::Error(text) => (text, Theme::error_style()),
            };
            let bottom = area.y + area.height.saturating_sub(1);
            buf.set_stringn(area.x + 2, bottom, format!(" {text} "), border_room, style);
        }

        let text_room = usize::from(area.width.saturating_sub(3));
        let message = |buf: &mut Buffer, y: u16, text: &str, style: Style| {
            if y + 1 < area.y + area.height {
                buf.set_stringn(area.x + 2, y, text, text_room, style);
            }
        };

        if !self.fits_list(&layout) {
            message(buf, area.y + 2, ENLARGE_MSG, Theme::warning_style());
            return;
        }

        match &self.state.mode {
            Mode::Help => {
                // The reference must fit between the top and bottom border.
                if usize::from(area.height) < self.help.len() + 2 {
                    message(buf, area.y + 2, ENLARGE_MSG, Theme::warning_style());
                    return;
                }
                for (i, line) in self.help.iter().enumerate() {
                    message(buf, area.y + 1 + i as u16, line, Style::default());
                }
                return;
            }
            Mode::ConfirmDelete { title, .. } => {
                message(buf, area.y + 2, CONFIRM_MSG, Theme::warning_style());
                message(buf, area.y + 4, title, Theme::title_style());
                return;
            }
            Mode::Normal => {}
        }

        if self.items.is_empty() {
            message(buf, area.y + 2, EMPTY_MSG, Style::default());
            return;
        }

        self.render_entries(&layout, buf);
        self.render_preview(&layout, buf);
    }
}

/// Draw one frame and park the cursor on the selection.
pub fn draw(frame: &mut Frame, view: &ScreenView) {
    frame.render_widget(view, frame.area());
    if let Some(cursor) = view.cursor() {
        frame.set_cursor_position((cursor.col, cursor.row));
    }
}

/// Fit `text` to a window `width` columns wide.
///
/// Texts wider than `width - 10` columns are cut to at most `width - 14`
/// columns and flagged so the caller draws the ellipsis marker.
pub fn truncate(text: &str, width: u16) -> (String, bool) {
    let limit = usize::from(width.saturating_sub(10));
    if text.width() <= limit {
        return (text.to_string(), false);
    }
    let keep = usize::from(width.saturating_sub(14));
    let mut used = 0;
    let cut = text
        .chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= keep
        })
        .collect();
    (cut, true)
}

/// Word-wrap an excerpt and keep the lines that fit in the preview box.
pub fn preview_lines(excerpt: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let options = textwrap::Options::new(width).wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);
    textwrap::wrap(excerpt, options)
        .into_iter()
        .take(PREVIEW_LINES)
        .map(|line| line.into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bindings;
    use crate::core::layout::Viewport;

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| {
                Item::new(
                    format!("{i}"),
                    format!("Title {i}"),
                    format!("https://example.com/{i}"),
                    format!("Excerpt of item {i}."),
                )
            })
            .collect()
    }

    fn render(state: &ScreenState, items: &[Item], width: u16, height: u16, notice: Option<&Notice>) -> Buffer {
        let metrics = LayoutMetrics::compute(Viewport::new(width, height), items.len());
        let help = Bindings::default().help_lines();
        let view = ScreenView {
            state,
            metrics: &metrics,
            items,
            help: &help,
            notice,
        };
        let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
        (&view).render(buf.area, &mut buf);
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn span(buf: &Buffer, y: u16, xs: std::ops::Range<u16>) -> String {
        xs.map(|x| buf[(x, y)].symbol()).collect()
    }

    fn screen(buf: &Buffer) -> String {
        (0..buf.area.height).map(|y| row(buf, y)).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn header_shows_count_and_pages() {
        let list = items(25);
        let m = LayoutMetrics::compute(Viewport::new(100, 40), 25);
        let state = ScreenState::new().next_page(&m);
        let buf = render(&state, &list, 100, 40, None);
        assert!(row(&buf, 0).starts_with("┌─ Pocket [25] (2/3) ('q' or Ctrl+C to exit, '?' to get help) ─"));
    }

    #[test]
    fn entries_show_marker_title_and_url() {
        let list = items(3);
        let buf = render(&ScreenState::new(), &list, 100, 40, None);
        assert!(row(&buf, 2).starts_with("│ [ ]  Title 0 "));
        assert!(row(&buf, 3).starts_with("│      https://example.com/0 "));
        assert!(row(&buf, 5).starts_with("│ [ ]  Title 1 "));
        assert!(row(&buf, 8).starts_with("│ [ ]  Title 2 "));
        assert_eq!(buf[(7, 3)].style().fg, Some(ratatui::style::Color::Cyan));
    }

    #[test]
    fn second_page_starts_at_its_first_item() {
        let list = items(25);
        let m = LayoutMetrics::compute(Viewport::new(100, 40), 25);
        let state = ScreenState::new().next_page(&m).next_page(&m);
        let buf = render(&state, &list, 100, 40, None);
        assert!(row(&buf, 2).starts_with("│ [ ]  Title 18 "));
        assert!(row(&buf, 20).starts_with("│ [ ]  Title 24 "));
        assert!(row(&buf, 23).starts_with("│    "));
    }

    #[test]
    fn short_text_is_untouched() {
        let limit = "x".repeat(90);
        assert_eq!(truncate(&limit, 100), (limit.clone(), false));
        assert_eq!(truncate("short", 100), ("short".to_string(), false));
    }

    #[test]
    fn long_text_is_cut_and_marked() {
        let long = "y".repeat(91);
        let (shown, cut) = truncate(&long, 100);
        assert!(cut);
        assert_eq!(shown.chars().count(), 86);

        let mut list = items(1);
        list[0].title = "t".repeat(120);
        let buf = render(&ScreenState::new(), &list, 100, 40, None);
        assert_eq!(span(&buf, 2, 7..93), "t".repeat(86));
        assert_eq!(span(&buf, 2, 93..98), ELLIPSIS);
        assert!(buf[(93, 2)].style().add_modifier.contains(ratatui::style::Modifier::DIM));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(11);
        assert_eq!(truncate(&text, 20), ("é".repeat(6), true));
        assert_eq!(truncate(&"é".repeat(10), 20), ("é".repeat(10), false));
    }

    #[test]
    fn wide_glyphs_are_measured_in_columns() {
        assert_eq!(truncate(&"漢".repeat(15), 40), ("漢".repeat(15), false));
        assert_eq!(truncate(&"漢".repeat(25), 40), ("漢".repeat(13), true));

        let mut list = items(1);
        list[0].title = "漢".repeat(25);
        let buf = render(&ScreenState::new(), &list, 40, 40, None);
        assert_eq!(buf[(7, 2)].symbol(), "漢");
        assert_eq!(buf[(31, 2)].symbol(), "漢");
        assert_eq!(span(&buf, 2, 33..38), ELLIPSIS);
    }

    #[test]
    fn long_url_is_cut_and_marked_in_link_style() {
        let mut list = items(1);
        list[0].url = format!("https://example.com/{}", "p".repeat(100));
        let buf = render(&ScreenState::new(), &list, 100, 40, None);
        let shown: String = list[0].url.chars().take(86).collect();
        assert_eq!(span(&buf, 3, 7..93), shown);
        assert_eq!(span(&buf, 3, 93..98), ELLIPSIS);
        let style = buf[(93, 3)].style();
        assert_eq!(style.fg, Some(ratatui::style::Color::Cyan));
        assert!(style.add_modifier.contains(ratatui::style::Modifier::DIM));
        assert_eq!(span(&buf, 2, 93..98), "     ");
    }

    #[test]
    fn preview_wraps_and_caps_at_four_lines() {
        let lines = preview_lines("one two three four five six seven eight nine ten", 9);
        assert_eq!(lines, ["one two", "three", "four five", "six seven"]);
        assert!(preview_lines("anything", 0).is_empty());
    }

    #[test]
    fn preview_shows_selected_excerpt() {
        let list = items(3);
        let m = LayoutMetrics::compute(Viewport::new(100, 40), 3);
        let state = ScreenState::new().move_down(&m, 3);
        let buf = render(&state, &list, 100, 40, None);
        assert!(row(&buf, 30).starts_with("│  ┌"));
        assert!(row(&buf, 32).starts_with("│  │ Excerpt of item 1."));
        assert!(row(&buf, 37).starts_with("│  └"));
    }

    #[test]
    fn short_window_only_warns() {
        let list = items(3);
        let buf = render(&ScreenState::new(), &list, 100, 14, None);
        assert!(row(&buf, 2).starts_with(&format!("│ {ENLARGE_MSG}")));
        assert!(!screen(&buf).contains("Title 0"));
    }

    #[test]
    fn narrow_window_only_warns() {
        let list = items(3);
        let buf = render(&ScreenState::new(), &list, 19, 40, None);
        assert!(!screen(&buf).contains("Title"));
        assert!(row(&buf, 2).starts_with("│ Enlarge"));
    }

    #[test]
    fn empty_list_shows_empty_state() {
        let buf = render(&ScreenState::new(), &[], 100, 40, None);
        assert!(row(&buf, 0).contains("Pocket [0] (1/0)"));
        assert!(row(&buf, 2).starts_with(&format!("│ {EMPTY_MSG}")));
        assert!(!screen(&buf).contains("[ ]"));
    }

    #[test]
    fn help_replaces_the_list() {
        let list = items(3);
        let state = ScreenState::new().with_mode(Mode::Help);
        let buf = render(&state, &list, 100, 40, None);
        let text = screen(&buf);
        assert!(text.contains("display this help"));
        assert!(text.contains("open link in new mail"));
        assert!(!text.contains("Title 0"));
        assert!(row(&buf, 2).starts_with("│ '?'"));
    }

    #[test]
    fn help_too_tall_for_window_warns() {
        let list = items(3);
        let state = ScreenState::new().with_mode(Mode::Help);
        let buf = render(&state, &list, 100, 18, None);
        assert!(row(&buf, 2).starts_with(&format!("│ {ENLARGE_MSG}")));
        assert!(!screen(&buf).contains("display this help"));
    }

    #[test]
    fn confirm_prompt_names_the_item() {
        let list = items(3);
        let state = ScreenState::new().with_mode(Mode::ConfirmDelete {
            item_id: "1".into(),
            title: "Title 1".into(),
        });
        let buf = render(&state, &list, 100, 40, None);
        assert!(row(&buf, 2).starts_with(&format!("│ {CONFIRM_MSG}")));
        assert!(row(&buf, 4).starts_with("│ Title 1"));
        assert!(!screen(&buf).contains("Title 0"));
    }

    #[test]
    fn notice_sits_on_the_bottom_border() {
        let list = items(1);
        let notice = Notice::Error("archive failed: timeout".into());
        let buf = render(&ScreenState::new(), &list, 100, 40, Some(&notice));
        assert!(row(&buf, 39).starts_with("└─ archive failed: timeout ─"));
        assert_eq!(buf[(3, 39)].style().fg, Some(ratatui::style::Color::Red));
    }

    #[test]
    fn cursor_follows_selection_only_in_list_view() {
        let list = items(3);
        let metrics = LayoutMetrics::compute(Viewport::new(100, 40), 3);
        let help: Vec<String> = Vec::new();
        let state = ScreenState::new().move_down(&metrics, 3);
        let view = ScreenView {
            state: &state,
            metrics: &metrics,
            items: &list,
            help: &help,
            notice: None,
        };
        assert_eq!(view.cursor(), Some(Cursor { row: 5, col: 3 }));

        let help_state = state.clone().with_mode(Mode::Help);
        let view = ScreenView { state: &help_state, ..view };
        assert_eq!(view.cursor(), None);

        let empty = LayoutMetrics::compute(Viewport::new(100, 40), 0);
        let view = ScreenView {
            state: &state,
            metrics: &empty,
            items: &[],
            help: &help,
            notice: None,
        };
        assert_eq!(view.cursor(), None);
    }
}
