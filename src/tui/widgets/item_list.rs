use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;
use ratatui::layout::Rect;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use crate::config::Theme;
use crate::models::{ActivityKind, TaskActivity, TaskItem, TaskList};
use crate::tui::widgets::color::{parse_color, highlight_text_color};
use crate::tui::widgets::task_list::fit_row;
use crate::tui::widgets::{render_list_scrollbar, split_for_scrollbar};
use crate::utils::format_relative;

/// Newest activities shown in an item's history strip
pub const HISTORY_DOTS: usize = 10;

const DOT: &str = "●";

/// Detail view: the items of one list with their due dates and recent history
#[allow(clippy::too_many_arguments)]
pub fn render_task_items(
    f: &mut Frame,
    area: Rect,
    list: &TaskList,
    items: &[TaskItem],
    histories: &HashMap<i64, Vec<TaskActivity>>,
    list_state: &mut ListState,
    theme: &Theme,
    now: DateTime<Utc>,
) {
    let (list_area, scrollbar_area) = split_for_scrollbar(area);
    let max_width = list_area.width.saturating_sub(4) as usize;

    let overdue = parse_color(&theme.overdue);
    let upcoming = parse_color(&theme.upcoming);
    let done = parse_color(&theme.done);
    let skipped = parse_color(&theme.skipped);

    let rows: Vec<ListItem> = if items.is_empty() {
        vec![ListItem::new("No items yet. Press the new key to add one.")]
    } else {
        items
            .iter()
            .map(|item| {
                let history = item
                    .id
                    .and_then(|id| histories.get(&id))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let due_color = if item.is_overdue(now) { overdue } else { upcoming };

                let every = match item.period.days() {
                    1 => "  every day".to_string(),
                    n => format!("  every {} days", n),
                };
                let first_line = Line::from(fit_row(&item.title, &every, max_width));

                let mut second_line = vec![Span::styled(
                    format!("  due {}", format_relative(item.due, now)),
                    Style::default().fg(due_color),
                )];
                let dots = history_dots(history, done, skipped);
                if !dots.is_empty() {
                    second_line.push(Span::raw("  "));
                    second_line.extend(dots);
                }

                ListItem::new(vec![first_line, Line::from(second_line)])
            })
            .collect()
    };

    let list_widget = List::new(rows)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ({})", list.title, items.len())),
        )
        .style(Style::default().fg(parse_color(&theme.fg)))
        .highlight_style(
            Style::default()
                .fg(highlight_text_color(theme))
                .bg(parse_color(&theme.highlight_bg)),
        );

    f.render_stateful_widget(list_widget, list_area, list_state);

    // Two lines per item
    let selected_line = list_state.selected().map(|index| index * 2 + 1);
    render_list_scrollbar(f, list_area, scrollbar_area, items.len() * 2, selected_line);
}

/// One dot per activity, oldest first, limited to the newest `HISTORY_DOTS`
pub(crate) fn history_dots(history: &[TaskActivity], done: Color, skipped: Color) -> Vec<Span<'static>> {
    let start = history.len().saturating_sub(HISTORY_DOTS);
    history[start..]
        .iter()
        .map(|activity| {
            let color = match activity.kind {
                ActivityKind::Done => done,
                ActivityKind::Skip => skipped,
            };
            Span::styled(DOT, Style::default().fg(color))
        })
        .collect()
}
