use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::Rect;
use chrono::{DateTime, Utc};
use crate::config::Theme;
use crate::models::TaskList;
use crate::tui::widgets::color::{parse_color, highlight_text_color};
use crate::tui::widgets::{render_list_scrollbar, split_for_scrollbar};
use crate::utils::format_relative;

/// Master view: every list, oldest first
pub fn render_task_lists(
    f: &mut Frame,
    area: Rect,
    lists: &[TaskList],
    list_state: &mut ListState,
    theme: &Theme,
    now: DateTime<Utc>,
) {
    let (list_area, scrollbar_area) = split_for_scrollbar(area);
    let max_width = list_area.width.saturating_sub(4) as usize; // 2 for borders, 2 for padding

    let rows: Vec<ListItem> = if lists.is_empty() {
        vec![ListItem::new("No lists yet. Press the new key to add one.")]
    } else {
        lists
            .iter()
            .map(|list| {
                let age = format!("  created {}", format_relative(list.created_at, now));
                ListItem::new(fit_row(&list.title, &age, max_width))
            })
            .collect()
    };

    let list = List::new(rows)
        .block(Block::default().borders(Borders::ALL).title(format!("Lists ({})", lists.len())))
        .style(Style::default().fg(parse_color(&theme.fg)))
        .highlight_style(
            Style::default()
                .fg(highlight_text_color(theme))
                .bg(parse_color(&theme.highlight_bg)),
        );

    f.render_stateful_widget(list, list_area, list_state);
    render_list_scrollbar(f, list_area, scrollbar_area, lists.len(), list_state.selected());
}

/// Title followed by `suffix`, dropping the suffix and then shortening the
/// title when the row is too narrow
pub(crate) fn fit_row(title: &str, suffix: &str, max_width: usize) -> String {
    let title_len = title.chars().count();
    if title_len + suffix.chars().count() <= max_width {
        return format!("{}{}", title, suffix);
    }
    if title_len <= max_width {
        return title.to_string();
    }
    title.chars().take(max_width.saturating_sub(3)).collect::<String>() + "..."
}
