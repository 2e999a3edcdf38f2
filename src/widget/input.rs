use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditResult {
    /// Not an editing key.
    Ignored,
    /// Cursor moved or the key was a no-op at a boundary.
    Unchanged,
    /// The text changed.
    Changed,
}

/// Single-line text buffer with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the text and parks the cursor at the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = char_count(&self.value);
    }

    pub fn apply_key(&mut self, key: KeyEvent) -> EditResult {
        let changed = |did: bool| {
            if did {
                EditResult::Changed
            } else {
                EditResult::Unchanged
            }
        };

        // Alt chords arrive as plain chars on many terminals; they are not text.
        if key.modifiers.contains(KeyModifiers::ALT) {
            return EditResult::Ignored;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('w') => changed(delete_word_left(&mut self.value, &mut self.cursor)),
                KeyCode::Char('u') => {
                    let had_text = !self.value.is_empty();
                    self.value.clear();
                    self.cursor = 0;
                    changed(had_text)
                }
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    EditResult::Unchanged
                }
                KeyCode::Char('e') => {
                    self.cursor = char_count(&self.value);
                    EditResult::Unchanged
                }
                _ => EditResult::Ignored,
            };
        }

        match key.code {
            KeyCode::Char(ch) => {
                insert_char(&mut self.value, &mut self.cursor, ch);
                EditResult::Changed
            }
            KeyCode::Backspace => changed(backspace_char(&mut self.value, &mut self.cursor)),
            KeyCode::Delete => changed(delete_char(&mut self.value, &mut self.cursor)),
            KeyCode::Left => {
                move_left(&mut self.cursor, &self.value);
                EditResult::Unchanged
            }
            KeyCode::Right => {
                move_right(&mut self.cursor, &self.value);
                EditResult::Unchanged
            }
            KeyCode::Home => {
                self.cursor = 0;
                EditResult::Unchanged
            }
            KeyCode::End => {
                self.cursor = char_count(&self.value);
                EditResult::Unchanged
            }
            _ => EditResult::Ignored,
        }
    }
}

pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

fn clamp_cursor(cursor: usize, value: &str) -> usize {
    cursor.min(char_count(value))
}

fn insert_char(value: &mut String, cursor: &mut usize, ch: char) {
    let pos = clamp_cursor(*cursor, value);
    let byte_pos = byte_index_at_char(value, pos);
    value.insert(byte_pos, ch);
    *cursor = pos + 1;
}

fn backspace_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos - 1);
    value.remove(byte_pos);
    *cursor = pos - 1;
    true
}

fn delete_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos >= char_count(value) {
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos);
    value.remove(byte_pos);
    *cursor = pos;
    true
}

fn move_left(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    *cursor = pos - 1;
    true
}

fn move_right(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos >= char_count(value) {
        return false;
    }
    *cursor = pos + 1;
    true
}

fn delete_word_left(value: &mut String, cursor: &mut usize) -> bool {
    let mut chars: Vec<char> = value.chars().collect();
    let pos = (*cursor).min(chars.len());
    if pos == 0 {
        *cursor = 0;
        return false;
    }

    let mut start = pos;
    while start > 0 && chars[start - 1].is_whitespace() {
        start -= 1;
    }
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }

    chars.drain(start..pos);
    *value = chars.into_iter().collect();
    *cursor = start;
    true
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}
