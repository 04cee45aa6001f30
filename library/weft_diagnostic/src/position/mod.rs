//! Line/column positions and formatted error messages.
//!
//! Lines end at any Unicode hard line break (`U+000A..=U+000D`, `U+0085`,
//! `U+2028`, `U+2029`); `\r\n` counts as a single break. Line numbers are
//! 0-based in [`LinePosition`] and printed 1-based. Columns count code
//! points from the start of the line.

use std::fmt::Write;

use weft_text::class::is_eol;

use crate::ParseError;

/// Where a byte offset sits in its line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LinePosition {
    /// Byte offset of the first character of the line.
    pub line_start: usize,
    /// 0-based line number.
    pub line_number: usize,
    /// Code points between `line_start` and the offset.
    pub column_number: usize,
}

/// Compute the line position of byte offset `position` in `input`.
pub fn find_line_position(input: &str, position: usize) -> LinePosition {
    let mut result = LinePosition::default();
    let mut prev_cr = false;
    for (offset, c) in input.char_indices() {
        if offset >= position {
            break;
        }
        let found = is_eol(c);
        if found {
            result.line_start = offset + c.len_utf8();
            result.column_number = 0;
            if !(prev_cr && c == '\n') {
                result.line_number += 1;
            }
        } else {
            result.column_number += 1;
        }
        prev_cr = c == '\r';
    }
    result
}

/// Byte offset of the first line break at or after `from`, or the input
/// length if the line runs to the end.
pub fn find_line_end(input: &str, from: usize) -> usize {
    input
        .get(from..)
        .and_then(|rest| rest.find(is_eol))
        .map_or(input.len(), |offset| from + offset)
}

/// Layout limits for formatted messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MessageFormat {
    /// Lines are shown in full up to this many code points.
    pub preferred_max_line_length: usize,
    /// Code points always shown after the caret, even past the preferred
    /// maximum.
    pub max_after_caret: usize,
}

impl Default for MessageFormat {
    fn default() -> Self {
        MessageFormat {
            preferred_max_line_length: 80,
            max_after_caret: 40,
        }
    }
}

impl MessageFormat {
    /// Render `message` at byte offset `position` of `input`.
    ///
    /// ```text
    /// file.txt:2:4: error: Expected ']' here:
    /// [1, 2
    ///     ^
    /// ```
    ///
    /// An empty `filename` leaves out the file prefix. At the end of the
    /// input the header says `(end of input)` and no text follows the caret.
    pub fn format(&self, filename: &str, input: &str, position: usize, message: &str) -> String {
        let position = position.min(input.len());
        let line = find_line_position(input, position);
        let at_end = position == input.len();

        let mut out = String::new();
        if !filename.is_empty() {
            out.push_str(filename);
            out.push(':');
        }
        let _ = write!(
            out,
            "{}:{}: {} here",
            line.line_number + 1,
            line.column_number,
            message
        );
        if at_end {
            out.push_str(" (end of input)");
        }
        out.push_str(":\n");

        let before = input.get(line.line_start..position).unwrap_or("");
        let mut underline = " ".repeat(before.chars().count());
        out.push_str(before);

        if at_end {
            out.push('\n');
            out.push_str(&underline);
            out.push_str("^\n");
            return out;
        }

        underline.push('^');
        let shown = underline.len();
        let limit = self
            .preferred_max_line_length
            .max(shown + self.max_after_caret);
        let next = input[position..]
            .chars()
            .next()
            .map_or(position, |c| position + c.len_utf8());
        let line_end = find_line_end(input, next);
        let after = input.get(position..line_end).unwrap_or("");
        out.extend(after.chars().take(limit.saturating_sub(shown)));
        out.push('\n');
        out.push_str(&underline);
        out.push('\n');
        out
    }
}

/// Render `message` at `position` with the default layout.
pub fn format_message(filename: &str, input: &str, position: usize, message: &str) -> String {
    MessageFormat::default().format(filename, input, position, message)
}

/// Render a hard parse error with the default layout.
pub fn format_expectation_failure(filename: &str, input: &str, error: &ParseError) -> String {
    let message = format!("error: Expected {}", error.expected);
    format_message(filename, input, error.position, &message)
}
