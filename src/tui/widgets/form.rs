use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::{Rect, Alignment, Constraint, Layout, Direction};
use crate::config::Theme;
use crate::tui::app::{CreateForm, ItemField};
use crate::tui::widgets::color::{parse_color, highlight_text_color};
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::popup_area;

struct Field<'a> {
    label: &'static str,
    editor: &'a Editor,
    active: bool,
}

/// Popup for a new list (title) or a new item (title and period in days)
pub fn render_create_form(f: &mut Frame, area: Rect, form: &CreateForm, theme: &Theme) {
    let (title, fields) = match form {
        CreateForm::List { title } => (
            "New List",
            vec![Field { label: "Title", editor: title, active: true }],
        ),
        CreateForm::Item(item_form) => (
            "New Item",
            vec![
                Field {
                    label: "Title",
                    editor: &item_form.title,
                    active: item_form.current_field == ItemField::Title,
                },
                Field {
                    label: "Repeat every (days)",
                    editor: &item_form.period,
                    active: item_form.current_field == ItemField::Period,
                },
            ],
        ),
    };

    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let active_style = Style::default()
        .bg(parse_color(&theme.highlight_bg))
        .fg(highlight_text_color(theme));
    let inactive_style = Style::default().fg(fg_color).add_modifier(Modifier::DIM);

    // Each single-line field takes 3 rows (border, content, border)
    let height = fields.len() as u16 * 3 + 2;
    let popup = popup_area(area, 60, 100);
    let popup = Rect::new(popup.x, area.y + area.height.saturating_sub(height) / 2, popup.width, height.min(area.height));
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); fields.len()])
        .split(inner);

    for (field, field_area) in fields.iter().zip(field_areas.iter()) {
        let content_width = field_area.width.saturating_sub(2) as usize;
        let (visible, cursor) = field.editor.visible_window(content_width);
        let style = if field.active { active_style } else { inactive_style };

        let paragraph = Paragraph::new(visible)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(field.label));
        f.render_widget(paragraph, *field_area);

        if field.active && content_width > 0 {
            let x = field_area.x + 1 + cursor as u16;
            let y = field_area.y + 1;
            if x < field_area.x + field_area.width && y < field_area.y + field_area.height {
                f.set_cursor_position((x, y));
            }
        }
    }
}
