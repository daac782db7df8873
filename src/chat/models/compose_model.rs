//! Text of the input line where a new message is composed.

use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeModel {
    chars: Vec<char>,
    /// Cursor position as a char index, `0..=chars.len()`
    cursor: usize,
}

impl ComposeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, ch: char) {
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor; false at the start of the line
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Display column of the cursor, counting wide characters as two
    pub fn cursor_display_column(&self) -> usize {
        self.chars[..self.cursor]
            .iter()
            .map(|ch| ch.width().unwrap_or(0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose(text: &str) -> ComposeModel {
        let mut model = ComposeModel::new();
        text.chars().for_each(|ch| model.insert_char(ch));
        model
    }

    #[test]
    fn insert_should_append_at_cursor() {
        let mut model = compose("hllo");
        model.move_home();
        model.move_right();
        model.insert_char('e');
        assert_eq!(model.text(), "hello");
        assert_eq!(model.cursor(), 2);
    }

    #[test]
    fn backspace_should_stop_at_line_start() {
        let mut model = compose("ab");
        assert!(model.backspace());
        assert!(model.backspace());
        assert!(!model.backspace());
        assert!(model.is_empty());
    }

    #[test]
    fn delete_should_remove_char_under_cursor() {
        let mut model = compose("abc");
        model.move_home();
        assert!(model.delete());
        assert_eq!(model.text(), "bc");
        model.move_end();
        assert!(!model.delete());
    }

    #[test]
    fn cursor_column_should_count_wide_chars() {
        let model = compose("aあ");
        assert_eq!(model.cursor_display_column(), 3);
    }
}
