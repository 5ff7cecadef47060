use ratatui::Frame;
use ratatui::widgets::{Block, Borders};
use ratatui::style::Style;
use mockable::Clock;
use crate::config::KeyBindings;
use crate::tui::{App, Layout};
use crate::tui::app::{Mode, Screen};
use crate::tui::widgets::{
    color::parse_color,
    confirm_delete::render_confirm_delete,
    form::render_create_form,
    help::render_help,
    item_list::render_task_items,
    status_bar::render_status_bar,
    task_list::render_task_lists,
};
use crate::utils::format_key_binding_for_display as key;

pub fn render<C: Clock>(f: &mut Frame, app: &mut App<C>, layout: &Layout) {
    let theme = app.config.get_active_theme();
    let now = app.clock.utc();

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Boring Tasks")
        .title_alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)));
    f.render_widget(outer_block, f.area());

    match &app.ui.screen {
        Screen::Lists => {
            render_task_lists(f, layout.main_area, &app.lists, &mut app.ui.list_state, &theme, now);
        }
        Screen::Items(list) => {
            render_task_items(
                f,
                layout.main_area,
                list,
                &app.items,
                &app.histories,
                &mut app.ui.list_state,
                &theme,
                now,
            );
        }
    }

    // Overlays go on top of the normal content
    match app.ui.mode {
        Mode::Help => render_help(f, f.area(), &app.config),
        Mode::Create => {
            if let Some(form) = &app.form.create_form {
                render_create_form(f, layout.main_area, form, &theme);
            }
        }
        Mode::Browse => {}
    }

    if let Some(pending) = &app.modals.delete_confirmation {
        render_confirm_delete(f, f.area(), pending, app.modals.delete_modal_selection, &theme);
    }

    let key_hints = get_key_hints(app.ui.mode, &app.ui.screen, &app.config.key_bindings);
    render_status_bar(f, layout.status_area, app.status.message.as_deref(), &key_hints, &theme);
}

fn get_key_hints(mode: Mode, screen: &Screen, keys: &KeyBindings) -> Vec<String> {
    match mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", key(&keys.help))],
        Mode::Create => vec![
            "Tab: Next field".to_string(),
            "Enter: Next/Save".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::Browse => {
            let mut hints = vec![
                format!("{}: Quit", key(&keys.quit)),
                format!("{}: New", key(&keys.new)),
                format!("{}: Delete", key(&keys.delete)),
            ];
            match screen {
                Screen::Lists => hints.push(format!("{}: Open", key(&keys.select))),
                Screen::Items(_) => {
                    hints.push(format!("{}: Done", key(&keys.done)));
                    hints.push(format!("{}: Skip", key(&keys.skip)));
                    hints.push(format!("{}: Back", key(&keys.back)));
                }
            }
            hints.push(format!("{}: Help", key(&keys.help)));
            hints
        }
    }
}
