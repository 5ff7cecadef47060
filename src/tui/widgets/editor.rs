/// Single-line text input used by the create forms.
///
/// `cursor_col` counts characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Editor {
    pub text: String,
    pub cursor_col: usize,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_string(content: String) -> Self {
        let cursor_col = content.chars().count();
        Self {
            text: content,
            cursor_col,
        }
    }

    fn byte_index(&self, col: usize) -> usize {
        self.text
            .char_indices()
            .nth(col)
            .map(|(index, _)| index)
            .unwrap_or(self.text.len())
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert_char(&mut self, ch: char) {
        let index = self.byte_index(self.cursor_col);
        self.text.insert(index, ch);
        self.cursor_col += 1;
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        if self.cursor_col == 0 {
            return;
        }
        self.cursor_col -= 1;
        let index = self.byte_index(self.cursor_col);
        self.text.remove(index);
    }

    /// Delete the character under the cursor
    pub fn delete_forward(&mut self) {
        if self.cursor_col < self.char_count() {
            let index = self.byte_index(self.cursor_col);
            self.text.remove(index);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor_col = (self.cursor_col + 1).min(self.char_count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.char_count();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The slice of text that fits in `width` columns with the cursor kept visible,
    /// and the cursor's column within that slice
    pub fn visible_window(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let start = self.cursor_col.saturating_sub(width - 1);
        let visible = self.text.chars().skip(start).take(width).collect();
        (visible, self.cursor_col - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_the_cursor() {
        let mut editor = Editor::from_string("Trsh".to_string());
        editor.move_cursor_left();
        editor.move_cursor_left();
        editor.insert_char('a');
        assert_eq!(editor.as_str(), "Trash");

        editor.move_cursor_end();
        editor.delete_char();
        assert_eq!(editor.as_str(), "Tras");

        editor.move_cursor_home();
        editor.delete_forward();
        assert_eq!(editor.as_str(), "ras");
        assert_eq!(editor.cursor_col, 0);
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut editor = Editor::new();
        for ch in "Café".chars() {
            editor.insert_char(ch);
        }
        editor.delete_char();
        editor.insert_char('é');
        editor.insert_char('s');
        assert_eq!(editor.as_str(), "Cafés");
        assert_eq!(editor.cursor_col, 5);
    }

    #[test]
    fn window_follows_cursor() {
        let editor = Editor::from_string("abcdefghij".to_string());
        assert_eq!(editor.visible_window(4), ("hij".to_string(), 3));

        let mut editor = editor;
        editor.move_cursor_home();
        assert_eq!(editor.visible_window(4), ("abcd".to_string(), 0));
    }
}
