use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, size as terminal_size};
use mockable::Clock;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use crate::models::ActivityKind;
use crate::tui::App;
use crate::tui::app::{Mode, Screen};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::{parse_key_binding, ParsedKeyBinding};

/// Guard that ensures terminal state is restored even on panic.
/// If the terminal is left in raw mode or the alternate screen, the user's
/// shell is unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore terminal state on normal exit; the guard does nothing on drop afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already on a cleanup path, nothing useful to do with errors
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop<C: Clock>(mut app: App<C>) -> Result<(), TuiError> {
    // Check size before entering the alternate screen so the error is readable
    let (width, height) = terminal_size()?;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;

    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::debug!("event loop started");

    loop {
        app.check_status_message_timeout();

        // Pick up writes made by this app or by another process sharing the store
        if let Err(e) = app.process_changes() {
            app.report_error("reload", &e);
        }

        let terminal_size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, terminal_size.width, terminal_size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Only Press events, Windows also reports Release
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    tracing::debug!("event loop finished");

    Ok(())
}

/// Returns true when the app should quit
pub(crate) fn handle_key_event<C: Clock>(app: &mut App<C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    if app.modals.delete_confirmation.is_some() {
        return handle_delete_confirmation_modal(app, key_event);
    }

    match app.ui.mode {
        Mode::Create => handle_create_mode(app, key_event),
        Mode::Help => handle_help_mode(app, key_event),
        Mode::Browse => handle_global_key_bindings(app, key_event),
    }
}

fn handle_delete_confirmation_modal<C: Clock>(app: &mut App<C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => {
            // Two options, so any direction flips between them
            app.modals.delete_modal_selection = 1 - app.modals.delete_modal_selection.min(1);
        }
        KeyCode::Enter => {
            if app.modals.delete_modal_selection == 0 {
                if let Err(e) = app.confirm_delete() {
                    app.report_error("delete", &e);
                }
            } else {
                app.cancel_delete();
            }
        }
        KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

fn handle_create_mode<C: Clock>(app: &mut App<C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc => app.exit_create_mode(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_form_field(),
        KeyCode::Enter => {
            if app.is_last_form_field() {
                if let Err(e) = app.save_create_form() {
                    app.report_error("save", &e);
                }
            } else {
                app.toggle_form_field();
            }
        }
        KeyCode::Char(ch) => {
            // Periods are whole days
            let accept = !app.is_period_field_active() || ch.is_ascii_digit();
            if accept && !key_event.modifiers.contains(KeyModifiers::CONTROL) {
                if let Some(editor) = app.get_current_form_editor() {
                    editor.insert_char(ch);
                }
            }
        }
        KeyCode::Backspace => {
            if let Some(editor) = app.get_current_form_editor() {
                editor.delete_char();
            }
        }
        KeyCode::Delete => {
            if let Some(editor) = app.get_current_form_editor() {
                editor.delete_forward();
            }
        }
        KeyCode::Left => {
            if let Some(editor) = app.get_current_form_editor() {
                editor.move_cursor_left();
            }
        }
        KeyCode::Right => {
            if let Some(editor) = app.get_current_form_editor() {
                editor.move_cursor_right();
            }
        }
        KeyCode::Home => {
            if let Some(editor) = app.get_current_form_editor() {
                editor.move_cursor_home();
            }
        }
        KeyCode::End => {
            if let Some(editor) = app.get_current_form_editor() {
                editor.move_cursor_end();
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_help_mode<C: Clock>(app: &mut App<C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    let help_binding = binding(&app.config.key_bindings.help)?;
    if key_event.code == KeyCode::Esc || matches_key_event(key_event, &help_binding) {
        app.exit_help_mode();
    }
    Ok(false)
}

fn handle_global_key_bindings<C: Clock>(app: &mut App<C>, key_event: KeyEvent) -> Result<bool, TuiError> {
    let keys = app.config.key_bindings.clone();

    if matches_key_event(key_event, &binding(&keys.quit)?) {
        return Ok(true);
    }

    if matches_key_event(key_event, &binding(&keys.help)?) {
        app.enter_help_mode();
        return Ok(false);
    }

    if key_event.code == KeyCode::Up || matches_key_event(key_event, &binding(&keys.list_up)?) {
        app.move_selection_up();
        return Ok(false);
    }

    if key_event.code == KeyCode::Down || matches_key_event(key_event, &binding(&keys.list_down)?) {
        app.move_selection_down();
        return Ok(false);
    }

    if matches_key_event(key_event, &binding(&keys.new)?) {
        app.enter_create_mode();
        return Ok(false);
    }

    if matches_key_event(key_event, &binding(&keys.delete)?) {
        app.request_delete();
        return Ok(false);
    }

    let on_items = matches!(app.ui.screen, Screen::Items(_));

    if matches_key_event(key_event, &binding(&keys.select)?) {
        if !on_items {
            if let Err(e) = app.open_selected_list() {
                app.report_error("open list", &e);
            }
        }
        return Ok(false);
    }

    if matches_key_event(key_event, &binding(&keys.back)?) {
        if on_items {
            app.back_to_lists();
        }
        return Ok(false);
    }

    if on_items {
        let kind = if matches_key_event(key_event, &binding(&keys.done)?) {
            Some(ActivityKind::Done)
        } else if matches_key_event(key_event, &binding(&keys.skip)?) {
            Some(ActivityKind::Skip)
        } else {
            None
        };
        if let Some(kind) = kind {
            if let Err(e) = app.complete_selected(kind) {
                app.report_error("update item", &e);
            }
        }
    }

    Ok(false)
}

fn binding(key_str: &str) -> Result<ParsedKeyBinding, TuiError> {
    parse_key_binding(key_str).map_err(TuiError::KeyBindingError)
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    // Ctrl on Windows/Linux, Option/Alt on macOS
    let has_primary_mod = crate::utils::has_primary_modifier(key_event.modifiers);
    if binding.requires_ctrl != has_primary_mod {
        return false;
    }

    binding.key_code == key_event.code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedClock;
    use crate::{Config, Database};

    fn press(app: &mut App<FixedClock>, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_str(app: &mut App<FixedClock>, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn app() -> App<FixedClock> {
        let db = Database::open_in_memory().unwrap();
        App::new(Config::default(), db, FixedClock::ymd(2024, 1, 1)).unwrap()
    }

    #[test]
    fn keyboard_walkthrough() {
        let mut app = app();

        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Chores");
        press(&mut app, KeyCode::Enter);
        app.process_changes().unwrap();
        assert_eq!(app.lists.len(), 1);

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.ui.screen, Screen::Items(_)));

        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Trash");
        press(&mut app, KeyCode::Enter);
        // Period field rejects letters and starts at "1"
        type_str(&mut app, "x4");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        app.process_changes().unwrap();
        assert_eq!(app.items.len(), 1);
        assert_eq!(app.items[0].period.days(), 1);

        press(&mut app, KeyCode::Char('x'));
        app.process_changes().unwrap();
        assert_eq!(app.items[0].due, app.clock.now + chrono::Duration::days(2));
        assert_eq!(app.history_for(&app.items[0]).len(), 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui.screen, Screen::Lists);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Chores");
        press(&mut app, KeyCode::Enter);
        app.process_changes().unwrap();

        press(&mut app, KeyCode::Char('d'));
        assert!(app.modals.delete_confirmation.is_some());
        // Keys other than the modal's are swallowed
        assert!(!press(&mut app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        app.process_changes().unwrap();
        assert_eq!(app.lists.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        app.process_changes().unwrap();
        assert!(app.lists.is_empty());
    }

    #[test]
    fn done_and_skip_do_nothing_on_list_view() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Chores");
        press(&mut app, KeyCode::Enter);
        app.process_changes().unwrap();

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('s'));
        assert!(!app.process_changes().unwrap());
        assert!(app.status.message.as_deref().unwrap_or_default().starts_with("List created"));
    }

    #[test]
    fn bad_binding_is_reported() {
        let mut app = app();
        app.config.key_bindings.quit = "Hyper".to_string();
        assert!(matches!(
            handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            Err(TuiError::KeyBindingError(_))
        ));
    }
}
