//! Single-line text input state for the edit form.

/// A text input with a byte-offset cursor and an active flag.
#[derive(Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
}

impl TextInput {
    /// An input pre-filled with `value`, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.len(),
            active: false,
        }
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the character before the cursor.
    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .chars()
                .next_back()
                .map(char::len_utf8)
                .unwrap_or(1);
            self.cursor -= prev;
            self.value.remove(self.cursor);
        }
    }

    /// Remove the character at the cursor.
    pub fn delete_forward(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .chars()
                .next_back()
                .map(char::len_utf8)
                .unwrap_or(1);
            self.cursor -= prev;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            let next = self.value[self.cursor..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
            self.cursor += next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut input = TextInput::with_value("AC");
        input.insert_char('1');
        assert_eq!(input.value, "AC1");
        input.delete_back();
        input.delete_back();
        assert_eq!(input.value, "A");
        input.move_home();
        input.delete_forward();
        assert_eq!(input.value, "");
        // No-ops at the boundaries.
        input.delete_back();
        input.delete_forward();
        assert_eq!(input.value, "");
    }

    #[test]
    fn test_cursor_handles_multibyte() {
        let mut input = TextInput::with_value("méja");
        input.move_home();
        input.move_right();
        input.move_right();
        input.delete_back();
        assert_eq!(input.value, "mja");
    }
}
