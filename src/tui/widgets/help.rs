use ratatui::widgets::{Block, Borders, Paragraph, Clear};
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::{Rect, Alignment};
use crate::Config;
use crate::config::KeyBindings;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(&config.key_bindings))
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Help - Key Bindings")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color)))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

fn build_help_text(keys: &KeyBindings) -> String {
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!("  {} / {} (or ↑ / ↓): Move up/down\n", key(&keys.list_up), key(&keys.list_down)));
    text.push_str(&format!("  {}: Open list\n", key(&keys.select)));
    text.push_str(&format!("  {}: Back to lists\n", key(&keys.back)));
    text.push('\n');

    text.push_str("Lists and items:\n");
    text.push_str(&format!("  {}: New list (or item, inside a list)\n", key(&keys.new)));
    text.push_str(&format!("  {}: Delete selected\n", key(&keys.delete)));
    text.push('\n');

    text.push_str("Inside a list:\n");
    text.push_str(&format!("  {}: Done, due date moves on one period\n", key(&keys.done)));
    text.push_str(&format!("  {}: Skip, due date moves on with no score\n", key(&keys.skip)));
    text.push_str("  History dots: oldest left, newest right\n");
    text.push('\n');

    text.push_str("Forms:\n");
    text.push_str("  Tab: Next field\n");
    text.push_str("  Enter: Next field, or save on the last one\n");
    text.push_str("  Esc: Cancel\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n", key(&keys.quit)));
    text.push_str(&format!("  {}: Show/hide help\n", key(&keys.help)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_uses_configured_keys() {
        let keys = KeyBindings { done: "Ctrl+d".to_string(), ..KeyBindings::default() };
        let text = build_help_text(&keys);
        assert!(text.contains(&format!("  {}: Done", key("Ctrl+d"))));
        assert!(text.contains("  s: Skip"));
        assert!(text.contains("  F1: Show/hide help"));
    }
}
