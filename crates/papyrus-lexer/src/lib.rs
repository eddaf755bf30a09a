//! Tokenizer for Papyrus source: a single-token-advance [`Lexer`] built on top of [`Cursor`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cursor;

pub use cursor::Cursor;

use papyrus_error::{ErrorKind, ParseError, ParseResult};
use papyrus_token::{keyword_from_str, NumberLiteral, Token, TokenKind};

/// Drives a [`Cursor`] one token at a time, folding identifiers to keywords case-insensitively
/// and remembering enough of the previous token to answer "was there a newline here" — Papyrus
/// has no statement terminator, so the parser leans on that question constantly.
///
/// Cheap to fork (`Clone`): the parser's statement dispatch needs a token or two of lookahead
/// past `current`, and cloning the whole lexer to scan ahead without disturbing it is simpler
/// than threading a peek buffer through every call site.
#[derive(Clone)]
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    current: Token,
    previous_end: usize,
    newline_before_current: bool,
}

impl<'a> Lexer<'a> {
    /// Builds a lexer over `source` and lexes its first token.
    pub fn new(source: &'a str) -> ParseResult<Self> {
        let mut lexer = Lexer {
            cursor: Cursor::new(source),
            current: Token::new(TokenKind::Eof, "", 0, 0),
            previous_end: 0,
            newline_before_current: false,
        };
        let first = lexer.lex_one()?;
        lexer.newline_before_current = lexer.cursor.has_newline_between(0, first.start);
        lexer.current = first;
        Ok(lexer)
    }

    /// The current token.
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// The byte offset just past the previous token (0 before any token has been consumed).
    pub fn previous_end(&self) -> usize {
        self.previous_end
    }

    /// `true` if a newline appears between the previous token's end and the current token's
    /// start — Papyrus's substitute for an explicit statement terminator.
    pub fn newline_before_current(&self) -> bool {
        self.newline_before_current
    }

    /// The full source text being lexed.
    pub fn source(&self) -> &'a str {
        self.cursor.source()
    }

    /// `true` if `source[a..b]` spans a newline.
    pub fn has_newline_between(&self, a: usize, b: usize) -> bool {
        self.cursor.has_newline_between(a, b)
    }

    /// Replaces the current token with the next one in the source.
    pub fn advance(&mut self) -> ParseResult<()> {
        self.previous_end = self.current.end;
        let next = self.lex_one()?;
        self.newline_before_current = self.cursor.has_newline_between(self.previous_end, next.start);
        self.current = next;
        Ok(())
    }

    /// Scans ahead in the remaining, unconsumed source for a case-insensitive `EndProperty`
    /// keyword, without disturbing lexer state. Used only by the full-property parser, which
    /// must know before committing whether a terminator exists at all.
    pub fn remaining_source_has_end_property(&self) -> bool {
        let remaining = &self.cursor.source()[self.cursor.pos()..];
        remaining.to_ascii_lowercase().contains("endproperty")
    }

    fn lex_one(&mut self) -> ParseResult<Token> {
        let mut backslash_count = 0usize;
        loop {
            self.cursor.skip_trivia()?;
            match self.cursor.peek() {
                Some('\\') => {
                    backslash_count += 1;
                    if backslash_count > 1 {
                        return Err(ParseError::at(
                            ErrorKind::UnexpectedToken,
                            "at most one line continuation is allowed between tokens",
                            self.cursor.pos(),
                        ));
                    }
                    self.cursor.bump();
                }
                _ => break,
            }
        }

        let start = self.cursor.pos();
        let Some(ch) = self.cursor.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", start, start));
        };

        if Cursor::is_identifier_start(ch) {
            return Ok(self.lex_identifier(start));
        }
        if ch.is_ascii_digit() || (ch == '.' && matches!(self.cursor.peek_second(), Some(d) if d.is_ascii_digit()))
        {
            return self.lex_number(start);
        }
        match ch {
            '"' => self.lex_string(start),
            '\'' => self.lex_char(start),
            _ => self.lex_operator(start, ch),
        }
    }

    fn lex_identifier(&mut self, start: usize) -> Token {
        while let Some(ch) = self.cursor.peek() {
            if Cursor::is_identifier_continue(ch) {
                self.cursor.bump();
            } else {
                break;
            }
        }
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);
        let lower = text.to_ascii_lowercase();
        match keyword_from_str(&lower) {
            Some(kind) => Token::new(kind, text, start, end),
            None => Token::new(TokenKind::Name, text, start, end),
        }
    }

    fn lex_number(&mut self, start: usize) -> ParseResult<Token> {
        let is_hex = self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_second(), Some('x') | Some('X'));
        if is_hex {
            self.cursor.bump();
            self.cursor.bump();
            while matches!(self.cursor.peek(), Some(c) if c.is_ascii_hexdigit()) {
                self.cursor.bump();
            }
        } else {
            while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
                self.cursor.bump();
            }
            if self.cursor.peek() == Some('.') {
                self.cursor.bump();
                while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
                    self.cursor.bump();
                }
            }
            if matches!(self.cursor.peek(), Some('e') | Some('E')) {
                self.cursor.bump();
                if matches!(self.cursor.peek(), Some('+') | Some('-')) {
                    self.cursor.bump();
                }
                while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
                    self.cursor.bump();
                }
            }
        }
        let end = self.cursor.pos();
        if let Some(ch) = self.cursor.peek() {
            if Cursor::is_identifier_start(ch) {
                return Err(ParseError::new(
                    ErrorKind::UnexpectedToken,
                    "identifier cannot immediately follow a number literal",
                    start,
                    end,
                ));
            }
        }
        let text = self.cursor.slice(start, end);
        let number = if is_hex {
            let digits = &text[2..];
            let value = i64::from_str_radix(digits, 16).unwrap_or(0);
            NumberLiteral::Int(value)
        } else if text.contains('.') {
            NumberLiteral::Float(text.parse().unwrap_or(0.0))
        } else {
            NumberLiteral::Int(text.parse().unwrap_or(0))
        };
        Ok(Token::number(text, number, start, end))
    }

    fn lex_string(&mut self, start: usize) -> ParseResult<Token> {
        self.cursor.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(ParseError::new(
                        ErrorKind::UnexpectedToken,
                        "unterminated string literal",
                        start,
                        self.cursor.pos(),
                    ));
                }
                Some('"') => {
                    self.cursor.bump();
                    break;
                }
                Some(c) if Cursor::is_newline(c) => {
                    return Err(ParseError::new(
                        ErrorKind::UnexpectedToken,
                        "unterminated string literal",
                        start,
                        self.cursor.pos(),
                    ));
                }
                Some('\\') => {
                    self.cursor.bump();
                    match self.cursor.peek() {
                        Some('n') => {
                            value.push('\n');
                            self.cursor.bump();
                        }
                        Some('r') => {
                            value.push('\r');
                            self.cursor.bump();
                        }
                        Some('t') => {
                            value.push('\t');
                            self.cursor.bump();
                        }
                        Some('b') => {
                            value.push('\u{8}');
                            self.cursor.bump();
                        }
                        Some('v') => {
                            value.push('\u{B}');
                            self.cursor.bump();
                        }
                        Some('f') => {
                            value.push('\u{C}');
                            self.cursor.bump();
                        }
                        Some('\\') => {
                            value.push('\\');
                            self.cursor.bump();
                        }
                        Some('"') => {
                            value.push('"');
                            self.cursor.bump();
                        }
                        Some('x') => {
                            self.cursor.bump();
                            let hex_start = self.cursor.pos();
                            for _ in 0..2 {
                                if matches!(self.cursor.peek(), Some(c) if c.is_ascii_hexdigit()) {
                                    self.cursor.bump();
                                }
                            }
                            let hex_end = self.cursor.pos();
                            let digits = self.cursor.slice(hex_start, hex_end);
                            if let Ok(code) = u8::from_str_radix(digits, 16) {
                                value.push(code as char);
                            }
                        }
                        Some(c) if Cursor::is_newline(c) => {
                            self.cursor.bump();
                        }
                        _ => {
                            return Err(ParseError::new(
                                ErrorKind::UnexpectedToken,
                                "invalid escape sequence in string literal",
                                start,
                                self.cursor.pos(),
                            ));
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.cursor.bump();
                }
            }
        }
        let end = self.cursor.pos();
        Ok(Token::new(TokenKind::String, value, start, end))
    }

    fn lex_char(&mut self, start: usize) -> ParseResult<Token> {
        self.cursor.bump(); // opening quote
        let Some(ch) = self.cursor.peek() else {
            return Err(ParseError::new(
                ErrorKind::UnexpectedToken,
                "unterminated char literal",
                start,
                self.cursor.pos(),
            ));
        };
        self.cursor.bump();
        if self.cursor.peek() != Some('\'') {
            return Err(ParseError::new(
                ErrorKind::UnexpectedToken,
                "char literal must be exactly one code unit",
                start,
                self.cursor.pos(),
            ));
        }
        self.cursor.bump();
        let end = self.cursor.pos();
        Ok(Token::new(TokenKind::Char, ch.to_string(), start, end))
    }

    fn lex_operator(&mut self, start: usize, ch: char) -> ParseResult<Token> {
        self.cursor.bump();
        let kind = match ch {
            '(' => TokenKind::ParenL,
            ')' => TokenKind::ParenR,
            '[' => TokenKind::BracketL,
            ']' => TokenKind::BracketR,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '+' | '-' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                    TokenKind::Assign
                } else if self.cursor.peek() == Some(ch) {
                    return Err(ParseError::new(
                        ErrorKind::UnexpectedToken,
                        "++/-- not supported",
                        start,
                        self.cursor.pos() + ch.len_utf8(),
                    ));
                } else {
                    TokenKind::PlusMinus
                }
            }
            '*' => {
                if self.cursor.peek() == Some('*') {
                    self.cursor.bump();
                    if self.cursor.peek() == Some('=') {
                        self.cursor.bump();
                        TokenKind::Assign
                    } else {
                        TokenKind::StarStar
                    }
                } else if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                    TokenKind::Assign
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                    TokenKind::Assign
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                    TokenKind::Assign
                } else {
                    TokenKind::Modulo
                }
            }
            '=' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                    TokenKind::Equality
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                    TokenKind::Equality
                } else {
                    TokenKind::Prefix
                }
            }
            '<' | '>' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                }
                TokenKind::Relational
            }
            '|' if self.cursor.peek() == Some('|') => {
                self.cursor.bump();
                TokenKind::LogicalOr
            }
            '&' if self.cursor.peek() == Some('&') => {
                self.cursor.bump();
                TokenKind::LogicalAnd
            }
            '~' => TokenKind::Prefix,
            _ => {
                return Err(ParseError::new(
                    ErrorKind::UnexpectedToken,
                    format!("unexpected character '{ch}'"),
                    start,
                    self.cursor.pos(),
                ));
            }
        };
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);
        Ok(Token::new(kind, text, start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source).unwrap();
        let mut out = vec![lexer.current().kind];
        while lexer.current().kind != TokenKind::Eof {
            lexer.advance().unwrap();
            out.push(lexer.current().kind);
        }
        out
    }

    #[test]
    fn lexes_scriptname_statement() {
        let kinds = kinds("ScriptName Foo extends Bar Hidden");
        assert_eq!(
            kinds,
            vec![
                TokenKind::ScriptName,
                TokenKind::Name,
                TokenKind::Extends,
                TokenKind::Name,
                TokenKind::Hidden,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_folding_is_case_insensitive() {
        let kinds = kinds("SCRIPTNAME scriptname ScRiPtNaMe");
        assert_eq!(
            kinds,
            vec![
                TokenKind::ScriptName,
                TokenKind::ScriptName,
                TokenKind::ScriptName,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_hex_and_decimal_numbers() {
        let mut lexer = Lexer::new("0x1F 3.5 42").unwrap();
        assert_eq!(lexer.current().number, Some(NumberLiteral::Int(31)));
        lexer.advance().unwrap();
        assert_eq!(lexer.current().number, Some(NumberLiteral::Float(3.5)));
        lexer.advance().unwrap();
        assert_eq!(lexer.current().number, Some(NumberLiteral::Int(42)));
    }

    #[test]
    fn lexes_string_with_escapes() {
        let mut lexer = Lexer::new(r#""a\nb\"c""#).unwrap();
        assert_eq!(lexer.current().kind, TokenKind::String);
        assert_eq!(&*lexer.current().text, "a\nb\"c");
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = Lexer::new("\"abc").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn newline_before_current_tracks_statement_boundaries() {
        let mut lexer = Lexer::new("Foo\nBar").unwrap();
        assert!(!lexer.newline_before_current());
        lexer.advance().unwrap();
        assert!(lexer.newline_before_current());
    }

    #[test]
    fn double_plus_is_rejected() {
        // First token lexes fine (`a`); advancing into `++` is where the error surfaces.
        let mut lexer = Lexer::new("a++").unwrap();
        lexer.advance().unwrap_err();
    }

    #[test]
    fn operator_table_matches_grammar() {
        let kinds = kinds("+= -= ** **= = == != <= >= || && ~ !");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Assign,
                TokenKind::Assign,
                TokenKind::StarStar,
                TokenKind::Assign,
                TokenKind::Assign,
                TokenKind::Equality,
                TokenKind::Equality,
                TokenKind::Relational,
                TokenKind::Relational,
                TokenKind::LogicalOr,
                TokenKind::LogicalAnd,
                TokenKind::Prefix,
                TokenKind::Prefix,
                TokenKind::Eof,
            ]
        );
    }
}
