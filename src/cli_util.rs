use std::fs;
use std::io::{self, IsTerminal, Write};

use crate::store::StoreError;
use crate::theme::{self, MessageStyles};

fn stderr_styles() -> MessageStyles {
    if io::stderr().is_terminal() { theme::mocha() } else { theme::plain() }
}

/// `program: message` on stderr, styled as an error.
pub fn report_error(program: &str, msg: &str) {
    let styles = stderr_styles();
    eprintln!("{program}: {}", styles.error.paint(msg));
    let _ = io::stderr().flush();
}

pub fn report_notice(program: &str, msg: &str) {
    let styles = stderr_styles();
    eprintln!("{program}: {}", styles.notice.paint(msg));
    let _ = io::stderr().flush();
}

pub fn report_success(program: &str, msg: &str) {
    let styles = stderr_styles();
    eprintln!("{program}: {}", styles.success.paint(msg));
    let _ = io::stderr().flush();
}

/// Report a store error. Syntax errors in the store file also get the
/// offending line with a caret under the column.
pub fn report_store_error(program: &str, err: &StoreError) {
    report_error(program, &err.to_string());
    if let StoreError::Malformed { path, at: Some((line, column)), .. } = err {
        if let Ok(content) = fs::read_to_string(path) {
            print_error_with_context(&content, *line, *column);
        }
    }
}

/// Print a short window of `line` (1-based) with a caret under `column`,
/// slicing by chars so multi-byte text is never split.
pub fn print_error_with_context(content: &str, line: usize, column: usize) {
    let Some(text) = content.lines().nth(line.saturating_sub(1)) else {
        return;
    };
    let (slice, caret) = context_window(text, column.saturating_sub(1));
    let styles = stderr_styles();
    eprintln!("  {line:>4} | {slice}");
    eprintln!("       | {}{}", " ".repeat(caret), styles.hint.paint("^"));
    let _ = io::stderr().flush();
}

// Show a short window around the position for context
fn context_window(text: &str, pos: usize) -> (&str, usize) {
    const WINDOW_CHARS: usize = 32;

    let total_chars = text.chars().count();
    let pos = pos.min(total_chars);
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(text, start_char);
    let end_byte = char_to_byte_index(text, end_char);
    (&text[start_byte..end_byte], pos - start_char)
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_keeps_short_lines_whole() {
        assert_eq!(context_window("{\"a\": [1, }", 10), ("{\"a\": [1, }", 10));
    }

    #[test]
    fn window_is_cut_around_long_lines() {
        let text = "x".repeat(100);
        let (slice, caret) = context_window(&text, 60);
        assert_eq!(slice.len(), 65);
        assert_eq!(caret, 32);
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        let text = "é".repeat(50);
        let (slice, caret) = context_window(&text, 40);
        assert_eq!(slice.chars().count(), 42);
        assert_eq!(caret, 32);
        assert_eq!(char_to_byte_index("aé b", 2), 3);
        assert_eq!(char_to_byte_index("ab", 9), 2);
    }
}
