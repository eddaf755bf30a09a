//! The parser's own state and the low-level token helpers every grammar rule is built from.

use crate::options::Options;
use papyrus_ast::Node;
use papyrus_error::{ErrorKind, ParseError, ParseResult};
use papyrus_lexer::Lexer;
use papyrus_token::{Token, TokenKind};
use std::sync::Arc;

/// What the parser remembers about the `ScriptNameStatement` it has already parsed, so later
/// constructs (properties, `Parent` usage) can cross-check against it without holding a borrow
/// into the AST being built.
#[derive(Debug, Clone)]
pub(crate) struct ScriptNameInfo {
    pub(crate) name: Arc<str>,
    pub(crate) is_conditional: bool,
    pub(crate) has_extends: bool,
}

/// Recursive-descent parser over a `papyrus_lexer::Lexer`.
///
/// Holds the three boolean context flags the grammar needs (`in_function`, `in_event`,
/// `in_state`) as plain fields — there is no global state and no shared mutability beyond this
/// struct itself.
pub struct Parser<'a> {
    pub(crate) lexer: Lexer<'a>,
    pub(crate) options: Options,
    pub(crate) filename: Option<String>,
    pub(crate) in_function: bool,
    pub(crate) in_event: bool,
    pub(crate) in_state: bool,
    pub(crate) script_name: Option<ScriptNameInfo>,
    pub(crate) depth: usize,
}

impl<'a> Parser<'a> {
    /// Builds a parser over `content` and lexes its first token.
    pub fn new(content: &'a str, options: Options, filename: Option<String>) -> ParseResult<Self> {
        let lexer = Lexer::new(content)?;
        Ok(Parser {
            lexer,
            options,
            filename,
            in_function: false,
            in_event: false,
            in_state: false,
            script_name: None,
            depth: 0,
        })
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.lexer.current().kind
    }

    pub(crate) fn current_start(&self) -> usize {
        self.lexer.current().start
    }

    pub(crate) fn current_end(&self) -> usize {
        self.lexer.current().end
    }

    pub(crate) fn current_text(&self) -> Arc<str> {
        self.lexer.current().text.clone()
    }

    pub(crate) fn newline_before_current(&self) -> bool {
        self.lexer.newline_before_current()
    }

    /// Returns the current token and advances past it.
    pub(crate) fn bump(&mut self) -> ParseResult<Token> {
        let token = self.lexer.current().clone();
        self.lexer.advance()?;
        Ok(token)
    }

    /// Consumes the current token if it is `kind`, else reports an `UnexpectedToken` error
    /// naming `what` as what was expected.
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> ParseResult<Token> {
        if self.current_kind() == kind {
            self.bump()
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Builds an `UnexpectedToken` error positioned at the current token, naming `expected`.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::new(
            ErrorKind::UnexpectedToken,
            format!("expected {expected}, found {:?} '{}'", self.current_kind(), self.current_text()),
            self.current_start(),
            self.current_end(),
        )
    }

    /// Builds an identifier node from the current `Name` token, then advances.
    pub(crate) fn parse_identifier(&mut self) -> ParseResult<Node> {
        let token = self.expect(TokenKind::Name, "an identifier")?;
        Ok(Node::new(
            papyrus_ast::NodeKind::Identifier { name: token.text.to_string() },
            token.start,
            token.end,
        ))
    }

    /// Enters one more level of statement/expression nesting, failing if `max_depth` would be
    /// exceeded.
    pub(crate) fn enter_depth(&mut self, at: usize) -> ParseResult<()> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::at(
                ErrorKind::UnexpectedToken,
                "maximum recursion depth exceeded",
                at,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn exit_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// `true` if the parser is inside a function or event body (the context most constructs
    /// require).
    pub(crate) fn in_function_or_event(&self) -> bool {
        self.in_function || self.in_event
    }

    /// Builds an `UnexpectedToken` error for a construct used outside the function/event context
    /// it requires. The grammar's `Options` table names these "throwXOutside" toggles but gives
    /// them no dedicated error kind, so they fall under the same generic bucket as any other
    /// syntax violation.
    pub(crate) fn context_error(&self, at: usize) -> ParseError {
        ParseError::at(ErrorKind::UnexpectedToken, "not allowed outside a function or event", at)
    }

    /// The byte offset just past the most recently consumed token. Used as a node's `end` once
    /// its last token has been consumed.
    pub(crate) fn prev_end(&self) -> usize {
        self.lexer.previous_end()
    }

    /// Forks the lexer and advances once, returning the kind of the token after `current` without
    /// disturbing real parser state.
    pub(crate) fn peek_next_kind(&self) -> ParseResult<TokenKind> {
        let mut fork = self.lexer.clone();
        fork.advance()?;
        Ok(fork.current().kind)
    }

    /// Forks the lexer and advances twice, returning the kind of the token two past `current`.
    pub(crate) fn peek_kind_two_ahead(&self) -> ParseResult<TokenKind> {
        let mut fork = self.lexer.clone();
        fork.advance()?;
        fork.advance()?;
        Ok(fork.current().kind)
    }

    /// Builds an identifier node from the current token if it is a `Name` or one of the
    /// primitive type keywords (`Int`, `Float`, `Bool`, `String`) — anywhere the grammar expects
    /// a type name rather than strictly a user-defined one (cast targets, parameter types,
    /// `New`'s element type).
    pub(crate) fn parse_type_identifier(&mut self) -> ParseResult<Node> {
        match self.current_kind() {
            TokenKind::Name
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Bool
            | TokenKind::StringType => {
                let token = self.bump()?;
                Ok(Node::new(
                    papyrus_ast::NodeKind::Identifier { name: token.text.to_string() },
                    token.start,
                    token.end,
                ))
            }
            _ => Err(self.unexpected("a type name")),
        }
    }
}
