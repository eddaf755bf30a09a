//! Line index for UTF-16-aware byte offset → line:column conversion.
//!
//! This is a diagnostics-only utility. The lexer and parser never consult it while parsing;
//! only a human-facing error formatter (the CLI) does, after a parse has already failed.

/// Maps byte offsets in a source text to 0-based line and UTF-16 column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    text: String,
}

impl LineIndex {
    /// Builds a line index over `text`, recording the byte offset of each line start.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        for (i, ch) in text.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts, text }
    }

    /// Converts a byte offset to a 0-based `(line, utf16_column)` pair.
    ///
    /// Offsets past the end of the text clamp to the last position.
    pub fn offset_to_position(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.binary_search(&offset).unwrap_or_else(|i| i.saturating_sub(1));
        let line_start = self.line_starts[line];
        let column = self.text[line_start..offset].chars().map(char::len_utf16).sum::<usize>();
        (line as u32, column as u32)
    }

    /// Returns the source text of the line containing `offset`, without its trailing newline.
    pub fn line_text(&self, offset: usize) -> &str {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.binary_search(&offset).unwrap_or_else(|i| i.saturating_sub(1));
        let start = self.line_starts[line];
        let end = self.line_starts.get(line + 1).map_or(self.text.len(), |&next| next);
        self.text[start..end].trim_end_matches(['\n', '\r'])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line() {
        let idx = LineIndex::new("hello world");
        assert_eq!(idx.offset_to_position(0), (0, 0));
        assert_eq!(idx.offset_to_position(6), (0, 6));
    }

    #[test]
    fn multi_line() {
        let idx = LineIndex::new("line1\nline2\nline3");
        assert_eq!(idx.offset_to_position(0), (0, 0));
        assert_eq!(idx.offset_to_position(6), (1, 0));
        assert_eq!(idx.offset_to_position(12), (2, 0));
        assert_eq!(idx.line_text(7), "line2");
    }

    #[test]
    fn clamps_past_end() {
        let idx = LineIndex::new("abc");
        assert_eq!(idx.offset_to_position(100), (0, 3));
    }

    #[test]
    fn utf16_column_counts_surrogate_pairs() {
        // U+1F600 (grinning face) is one UTF-8 char of 4 bytes but 2 UTF-16 units.
        let idx = LineIndex::new("a\u{1F600}b");
        let (line, col) = idx.offset_to_position(5); // byte offset right before 'b'
        assert_eq!(line, 0);
        assert_eq!(col, 3); // 'a' (1) + emoji (2 utf-16 units)
    }
}
