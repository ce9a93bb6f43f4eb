//! Keystroke-level editing of plain text fields.
//!
//! Offsets are char indices, never byte indices. Every operation returns
//! the new cursor and, when the text changed, the new text; the caller hands
//! that text to the store as one field replacement.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditCommand {
    Insert(char),
    Newline,
    Backspace,
    Delete,
    DeleteWordBackward,
    Left,
    Right,
    WordLeft,
    WordRight,
    Up,
    Down,
    Home,
    End,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    /// `Some` only if the text changed.
    pub text: Option<String>,
    pub cursor: usize,
}

impl EditOutcome {
    fn moved(cursor: usize) -> Self {
        Self { text: None, cursor }
    }

    fn changed(text: String, cursor: usize) -> Self {
        Self {
            text: Some(text),
            cursor,
        }
    }
}

pub fn apply_edit(text: &str, cursor: usize, command: EditCommand, multiline: bool) -> EditOutcome {
    let len = char_len(text);
    let cursor = cursor.min(len);

    match command {
        EditCommand::Insert(ch) if ch == '\n' || ch == '\r' => {
            apply_edit(text, cursor, EditCommand::Newline, multiline)
        }
        EditCommand::Insert(ch) => {
            EditOutcome::changed(insert_char_at(text, cursor, ch), cursor + 1)
        }
        EditCommand::Newline => {
            if multiline {
                EditOutcome::changed(insert_char_at(text, cursor, '\n'), cursor + 1)
            } else {
                EditOutcome::moved(cursor)
            }
        }
        EditCommand::Backspace => {
            if cursor == 0 {
                EditOutcome::moved(cursor)
            } else {
                EditOutcome::changed(remove_chars(text, cursor - 1, cursor), cursor - 1)
            }
        }
        EditCommand::Delete => {
            if cursor >= len {
                EditOutcome::moved(cursor)
            } else {
                EditOutcome::changed(remove_chars(text, cursor, cursor + 1), cursor)
            }
        }
        EditCommand::DeleteWordBackward => {
            let start = previous_word_boundary(text, cursor);
            if start == cursor {
                EditOutcome::moved(cursor)
            } else {
                EditOutcome::changed(remove_chars(text, start, cursor), start)
            }
        }
        EditCommand::Left => EditOutcome::moved(cursor.saturating_sub(1)),
        EditCommand::Right => EditOutcome::moved((cursor + 1).min(len)),
        EditCommand::WordLeft => EditOutcome::moved(previous_word_boundary(text, cursor)),
        EditCommand::WordRight => EditOutcome::moved(next_word_boundary(text, cursor)),
        EditCommand::Home => EditOutcome::moved(line_start(text, cursor)),
        EditCommand::End => EditOutcome::moved(line_end(text, cursor)),
        EditCommand::Up => EditOutcome::moved(vertical_move(text, cursor, false)),
        EditCommand::Down => EditOutcome::moved(vertical_move(text, cursor, true)),
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}

fn insert_char_at(text: &str, offset: usize, ch: char) -> String {
    let mut result = text.to_string();
    let byte_idx = char_to_byte_idx(&result, offset);
    result.insert(byte_idx, ch);
    result
}

fn remove_chars(text: &str, start: usize, end: usize) -> String {
    let mut result = text.to_string();
    let start = char_to_byte_idx(&result, start);
    let end = char_to_byte_idx(&result, end);
    if start < end {
        result.drain(start..end);
    }
    result
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

pub fn previous_word_boundary(text: &str, offset: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut idx = offset.min(chars.len());

    while idx > 0 && chars[idx - 1].is_whitespace() {
        idx -= 1;
    }
    if idx == 0 {
        return 0;
    }

    if is_word_char(chars[idx - 1]) {
        while idx > 0 && is_word_char(chars[idx - 1]) {
            idx -= 1;
        }
    } else {
        while idx > 0 && !is_word_char(chars[idx - 1]) && !chars[idx - 1].is_whitespace() {
            idx -= 1;
        }
    }
    idx
}

pub fn next_word_boundary(text: &str, offset: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut idx = offset.min(len);
    if idx >= len {
        return len;
    }

    if is_word_char(chars[idx]) {
        while idx < len && is_word_char(chars[idx]) {
            idx += 1;
        }
    } else {
        while idx < len && !chars[idx].is_whitespace() && !is_word_char(chars[idx]) {
            idx += 1;
        }
    }
    while idx < len && chars[idx].is_whitespace() {
        idx += 1;
    }
    idx
}

fn line_start(text: &str, cursor: usize) -> usize {
    text.chars()
        .take(cursor)
        .enumerate()
        .filter(|(_, ch)| *ch == '\n')
        .map(|(idx, _)| idx + 1)
        .last()
        .unwrap_or(0)
}

fn line_end(text: &str, cursor: usize) -> usize {
    text.chars()
        .enumerate()
        .skip(cursor)
        .find(|(_, ch)| *ch == '\n')
        .map(|(idx, _)| idx)
        .unwrap_or_else(|| char_len(text))
}

/// Moves to the same column on the neighbouring logical line, clamped to
/// that line's length. Stays put on the first/last line.
fn vertical_move(text: &str, cursor: usize, down: bool) -> usize {
    let start = line_start(text, cursor);
    let column = cursor - start;

    if down {
        let end = line_end(text, cursor);
        if end >= char_len(text) {
            return cursor;
        }
        let next_start = end + 1;
        let next_end = line_end(text, next_start);
        (next_start + column).min(next_end)
    } else {
        if start == 0 {
            return cursor;
        }
        let prev_end = start - 1;
        let prev_start = line_start(text, prev_end);
        (prev_start + column).min(prev_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, cursor: usize, command: EditCommand) -> (String, usize) {
        let outcome = apply_edit(text, cursor, command, true);
        (outcome.text.unwrap_or_else(|| text.to_string()), outcome.cursor)
    }

    #[test]
    fn insert_handles_multibyte_text() {
        assert_eq!(run("héllo", 2, EditCommand::Insert('x')), ("héxllo".to_string(), 3));
        assert_eq!(run("", 0, EditCommand::Insert('ä')), ("ä".to_string(), 1));
    }

    #[test]
    fn cursor_past_end_is_clamped() {
        assert_eq!(run("ab", 10, EditCommand::Insert('c')), ("abc".to_string(), 3));
    }

    #[test]
    fn newline_is_ignored_in_single_line_fields() {
        let outcome = apply_edit("title", 5, EditCommand::Newline, false);
        assert_eq!(outcome, EditOutcome { text: None, cursor: 5 });
        let outcome = apply_edit("title", 5, EditCommand::Insert('\n'), false);
        assert_eq!(outcome.text, None);
    }

    #[test]
    fn backspace_and_delete_respect_the_ends() {
        assert_eq!(apply_edit("ab", 0, EditCommand::Backspace, true).text, None);
        assert_eq!(apply_edit("ab", 2, EditCommand::Delete, true).text, None);
        assert_eq!(run("aöb", 2, EditCommand::Backspace), ("ab".to_string(), 1));
        assert_eq!(run("aöb", 1, EditCommand::Delete), ("ab".to_string(), 1));
    }

    #[test]
    fn delete_word_backward_removes_previous_word() {
        assert_eq!(
            run("foo bar baz", 11, EditCommand::DeleteWordBackward),
            ("foo bar ".to_string(), 8)
        );
        assert_eq!(
            run("foo bar ", 8, EditCommand::DeleteWordBackward),
            ("foo ".to_string(), 4)
        );
    }

    #[test]
    fn word_motion_skips_punctuation_groups() {
        assert_eq!(previous_word_boundary("hello, world", 12), 7);
        assert_eq!(previous_word_boundary("hello, world", 7), 5);
        assert_eq!(next_word_boundary("hello, world", 0), 5);
        assert_eq!(next_word_boundary("hello, world", 5), 7);
        assert_eq!(next_word_boundary("hello", 5), 5);
    }

    #[test]
    fn home_and_end_stay_on_the_logical_line() {
        let text = "first\nsecond line\nthird";
        assert_eq!(run(text, 9, EditCommand::Home).1, 6);
        assert_eq!(run(text, 9, EditCommand::End).1, 17);
        assert_eq!(run(text, 2, EditCommand::Home).1, 0);
        assert_eq!(run(text, 20, EditCommand::End).1, 23);
    }

    #[test]
    fn vertical_motion_keeps_column_when_possible() {
        let text = "first\nsecond line\nthird";
        assert_eq!(run(text, 3, EditCommand::Down).1, 9);
        assert_eq!(run(text, 16, EditCommand::Down).1, 23);
        assert_eq!(run(text, 20, EditCommand::Up).1, 8);
        assert_eq!(run(text, 16, EditCommand::Up).1, 5);
        assert_eq!(run(text, 3, EditCommand::Up).1, 3);
        assert_eq!(run(text, 20, EditCommand::Down).1, 20);
    }
}
