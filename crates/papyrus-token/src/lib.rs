//! Token definitions for the Papyrus lexer.
//!
//! Token kinds mirror the set the parser dispatches on (keywords are folded to their own kind
//! during lexing so the parser never re-inspects the spelling); `keyword_from_str` is the single
//! place that performs the case-insensitive keyword lookup.

use papyrus_position::ByteSpan;
use std::sync::Arc;

/// Token produced by the lexer and consumed by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Associated text: the original-case identifier spelling, the decoded string/char payload,
    /// the raw numeric literal text, or the operator's spelling. Empty for `Eof` and single-char
    /// punctuation where the kind alone is sufficient.
    pub text: Arc<str>,
    /// Parsed numeric value, present only for `TokenKind::Num`.
    pub number: Option<NumberLiteral>,
    /// Starting byte offset (inclusive).
    pub start: usize,
    /// Ending byte offset (exclusive).
    pub end: usize,
}

impl Token {
    /// Creates a new token with no parsed numeric value.
    pub fn new(kind: TokenKind, text: impl Into<Arc<str>>, start: usize, end: usize) -> Self {
        Token { kind, text: text.into(), number: None, start, end }
    }

    /// Creates a new numeric token.
    pub fn number(
        text: impl Into<Arc<str>>,
        number: NumberLiteral,
        start: usize,
        end: usize,
    ) -> Self {
        Token { kind: TokenKind::Num, text: text.into(), number: Some(number), start, end }
    }

    /// The token's span.
    pub fn span(&self) -> ByteSpan {
        ByteSpan::new(self.start, self.end)
    }
}

/// A parsed numeric literal value: integer or floating point, per §4.2 of the parser design
/// ("a value containing `.` parses to floating, otherwise to integer").
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLiteral {
    /// Decimal or `0x`-prefixed hexadecimal integer.
    Int(i64),
    /// Decimal literal with a fraction and/or exponent.
    Float(f64),
}

/// Token classification for parser dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // ===== Keywords =====
    As,
    Auto,
    AutoReadOnly,
    Bool,
    Conditional,
    Else,
    ElseIf,
    EndEvent,
    EndFunction,
    EndIf,
    EndProperty,
    EndState,
    EndWhile,
    Event,
    Extends,
    False,
    Float,
    Function,
    Global,
    Hidden,
    If,
    Import,
    Int,
    Native,
    New,
    None,
    Parent,
    Property,
    Return,
    ScriptName,
    Self_,
    State,
    StringType,
    True,
    While,

    // ===== Identifiers and literals =====
    /// Bareword identifier (not a recognized keyword).
    Name,
    /// Numeric literal; see [`Token::number`].
    Num,
    /// Double-quoted string literal (escapes already decoded into `Token::text`).
    String,
    /// Single-quoted, exactly-one-code-unit character literal.
    Char,

    // ===== Punctuation =====
    ParenL,
    ParenR,
    BracketL,
    BracketR,
    Comma,
    Dot,
    Colon,

    // ===== Operators =====
    /// `=`, `+=`, `-=`, `*=`, `/=`, `%=`, `**=`
    Assign,
    /// `==`, `!=`
    Equality,
    /// `<`, `>`, `<=`, `>=`
    Relational,
    /// `+`, `-`
    PlusMinus,
    Star,
    StarStar,
    Slash,
    Modulo,
    /// Reserved precedence-tier tag alongside `Star`/`Slash`/`Modulo`; no lexer rule in §4.2
    /// produces it directly, but the kind is part of the token-kind set the parser's grammar
    /// table names and is kept for fidelity to that table.
    Binary,
    LogicalAnd,
    LogicalOr,
    /// `!`, `~`
    Prefix,

    // ===== Special =====
    Eof,
    /// Reserved block-delimiter kind named in the token-kind set; blocks are recognized
    /// structurally by the parser rather than lexed as a single token.
    Block,
}

impl TokenKind {
    /// Returns `true` if this kind always carries operator/identifier-like text worth printing.
    pub fn is_keyword(self) -> bool {
        !matches!(
            self,
            TokenKind::Name
                | TokenKind::Num
                | TokenKind::String
                | TokenKind::Char
                | TokenKind::ParenL
                | TokenKind::ParenR
                | TokenKind::BracketL
                | TokenKind::BracketR
                | TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::Colon
                | TokenKind::Assign
                | TokenKind::Equality
                | TokenKind::Relational
                | TokenKind::PlusMinus
                | TokenKind::Star
                | TokenKind::StarStar
                | TokenKind::Slash
                | TokenKind::Modulo
                | TokenKind::Binary
                | TokenKind::LogicalAnd
                | TokenKind::LogicalOr
                | TokenKind::Prefix
                | TokenKind::Eof
                | TokenKind::Block
        )
    }
}

/// Case-insensitively resolves `word` to a keyword kind, or `None` if it is a plain identifier.
///
/// `word` must already be lowercased by the caller (the lexer lowercases once for this lookup
/// while keeping the original-case spelling for the `Name` token's text).
pub fn keyword_from_str(word: &str) -> Option<TokenKind> {
    Some(match word {
        "as" => TokenKind::As,
        "auto" => TokenKind::Auto,
        "autoreadonly" => TokenKind::AutoReadOnly,
        "bool" => TokenKind::Bool,
        "conditional" => TokenKind::Conditional,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::ElseIf,
        "endevent" => TokenKind::EndEvent,
        "endfunction" => TokenKind::EndFunction,
        "endif" => TokenKind::EndIf,
        "endproperty" => TokenKind::EndProperty,
        "endstate" => TokenKind::EndState,
        "endwhile" => TokenKind::EndWhile,
        "event" => TokenKind::Event,
        "extends" => TokenKind::Extends,
        "false" => TokenKind::False,
        "float" => TokenKind::Float,
        "function" => TokenKind::Function,
        "global" => TokenKind::Global,
        "hidden" => TokenKind::Hidden,
        "if" => TokenKind::If,
        "import" => TokenKind::Import,
        "int" => TokenKind::Int,
        "native" => TokenKind::Native,
        "new" => TokenKind::New,
        "none" => TokenKind::None,
        "parent" => TokenKind::Parent,
        "property" => TokenKind::Property,
        "return" => TokenKind::Return,
        "scriptname" => TokenKind::ScriptName,
        "self" => TokenKind::Self_,
        "state" => TokenKind::State,
        "string" => TokenKind::StringType,
        "true" => TokenKind::True,
        "while" => TokenKind::While,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_covers_every_reserved_word() {
        let keywords = "as auto autoreadonly bool conditional else elseif endevent endfunction \
                         endif endproperty endstate endwhile event extends false float function \
                         global hidden if import int native new none parent property return \
                         scriptname self state string true while";
        for word in keywords.split_whitespace() {
            assert!(keyword_from_str(word).is_some(), "expected {word} to be a keyword");
        }
    }

    #[test]
    fn non_keyword_is_none() {
        assert_eq!(keyword_from_str("myvariable"), None);
        assert_eq!(keyword_from_str("foo"), None);
    }

    #[test]
    fn token_number_sets_kind() {
        let tok = Token::number("42", NumberLiteral::Int(42), 0, 2);
        assert_eq!(tok.kind, TokenKind::Num);
        assert_eq!(tok.number, Some(NumberLiteral::Int(42)));
    }
}
