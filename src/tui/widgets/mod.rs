pub mod color;
pub mod confirm_delete;
pub mod editor;
pub mod form;
pub mod help;
pub mod item_list;
pub mod status_bar;
pub mod task_list;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

/// Centered rect taking a percentage of `area`, after the ratatui popup example
pub(crate) fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Split `area` into the list and a one-column strip for its scrollbar
pub(crate) fn split_for_scrollbar(area: Rect) -> (Rect, Rect) {
    let [list_area, scrollbar_area] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(1)]).areas(area);
    (list_area, scrollbar_area)
}

/// Draw a vertical scrollbar beside a bordered list when its rows overflow
pub(crate) fn render_list_scrollbar(
    f: &mut Frame,
    list_area: Rect,
    scrollbar_area: Rect,
    total_rows: usize,
    selected: Option<usize>,
) {
    let visible_rows = list_area.height.saturating_sub(2) as usize; // Account for borders
    if total_rows <= visible_rows || visible_rows == 0 || scrollbar_area.width == 0 {
        return;
    }

    let scrollbar_inner_area = Rect::new(
        scrollbar_area.x,
        list_area.y + 1,
        scrollbar_area.width,
        list_area.height.saturating_sub(2),
    );

    let selected_index = selected.unwrap_or(0);
    let scroll_position = selected_index.saturating_sub(visible_rows - 1);

    let mut scrollbar_state = ScrollbarState::new(total_rows)
        .viewport_content_length(visible_rows)
        .position(scroll_position);

    let scrollbar = Scrollbar::default()
        .orientation(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .track_symbol(Some("│"))
        .thumb_symbol("█");

    f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
}
