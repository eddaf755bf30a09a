//! Expression grammar: precedence climbing from assignment down through binary/logical operators,
//! unary prefixes, the postfix subscript chain (member access, calls, casts), down to atoms.

use crate::parser::Parser;
use papyrus_ast::{LiteralValue, Node, NodeKind};
use papyrus_error::{ErrorKind, ParseError, ParseResult};
use papyrus_token::{NumberLiteral, TokenKind};

fn binary_precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::LogicalOr => Some(1),
        TokenKind::LogicalAnd => Some(2),
        TokenKind::Equality => Some(3),
        TokenKind::Relational => Some(4),
        TokenKind::PlusMinus => Some(5),
        TokenKind::Star | TokenKind::StarStar | TokenKind::Slash | TokenKind::Modulo | TokenKind::Binary => {
            Some(6)
        }
        _ => None,
    }
}

fn is_logical(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::LogicalOr | TokenKind::LogicalAnd)
}

impl<'a> Parser<'a> {
    /// Entry point for any expression position (call arguments, `If`/`While` tests, initializers).
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Node> {
        self.parse_assignment()
    }

    /// Resumes expression parsing from an already-built `base` node, skipping straight to the
    /// postfix/binary/assignment tiers. Used by the `Name`-led statement dispatch once it has
    /// committed a bareword to being the start of an expression rather than a declaration.
    pub(crate) fn finish_expression_from(&mut self, base: Node) -> ParseResult<Node> {
        let base = self.parse_postfix(base)?;
        let base = self.parse_binary_from(base, 0)?;
        self.parse_assignment_from(base)
    }

    fn parse_assignment(&mut self) -> ParseResult<Node> {
        let left = self.parse_binary(0)?;
        self.parse_assignment_from(left)
    }

    fn parse_assignment_from(&mut self, left: Node) -> ParseResult<Node> {
        if self.current_kind() == TokenKind::Assign {
            let op_token = self.bump()?;
            let right = self.parse_assignment()?;
            let start = left.start;
            let end = right.end;
            return Ok(Node::new(
                NodeKind::AssignExpression {
                    left: Box::new(left),
                    operator: op_token.text.to_string(),
                    right: Box::new(right),
                },
                start,
                end,
            ));
        }
        Ok(left)
    }

    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Node> {
        let left = self.parse_unary()?;
        self.parse_binary_from(left, min_prec)
    }

    fn parse_binary_from(&mut self, mut left: Node, min_prec: u8) -> ParseResult<Node> {
        while let Some(prec) = binary_precedence(self.current_kind()) {
            if prec < min_prec {
                break;
            }
            if !self.in_function_or_event() && self.options.throw_binary_outside {
                return Err(self.context_error(self.current_start()));
            }
            let logical = is_logical(self.current_kind());
            let op_token = self.bump()?;
            let right = self.parse_binary(prec + 1)?;
            let start = left.start;
            let end = right.end;
            let kind = if logical {
                NodeKind::LogicalExpression {
                    left: Box::new(left),
                    operator: op_token.text.to_string(),
                    right: Box::new(right),
                }
            } else {
                NodeKind::BinaryExpression {
                    left: Box::new(left),
                    operator: op_token.text.to_string(),
                    right: Box::new(right),
                }
            };
            left = Node::new(kind, start, end);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        match self.current_kind() {
            TokenKind::PlusMinus | TokenKind::Prefix => {
                let start = self.current_start();
                let op_token = self.bump()?;
                let argument = self.parse_unary()?;
                let end = argument.end;
                Ok(Node::new(
                    NodeKind::UnaryExpression {
                        operator: op_token.text.to_string(),
                        argument: Box::new(argument),
                        is_prefix: true,
                    },
                    start,
                    end,
                ))
            }
            _ => {
                let atom = self.parse_atom()?;
                self.parse_postfix(atom)
            }
        }
    }

    /// The subscript loop: `[expr]` (computed member), `.Identifier` (member), `(args)` (call),
    /// `As Identifier` (cast) — any number of these chained in sequence.
    pub(crate) fn parse_postfix(&mut self, mut base: Node) -> ParseResult<Node> {
        loop {
            match self.current_kind() {
                TokenKind::BracketL => {
                    let start = base.start;
                    self.bump()?;
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::BracketR, "']'")?;
                    let end = self.prev_end();
                    base = Node::new(
                        NodeKind::MemberExpression {
                            object: Box::new(base),
                            property: Box::new(index),
                            computed: true,
                        },
                        start,
                        end,
                    );
                }
                TokenKind::Dot => {
                    self.check_parent_member_chain(&base)?;
                    let start = base.start;
                    self.bump()?;
                    let property = self.parse_identifier()?;
                    let end = property.end;
                    base = Node::new(
                        NodeKind::MemberExpression {
                            object: Box::new(base),
                            property: Box::new(property),
                            computed: false,
                        },
                        start,
                        end,
                    );
                }
                TokenKind::ParenL => {
                    if !self.in_function_or_event() && self.options.throw_call_outside {
                        return Err(self.context_error(self.current_start()));
                    }
                    if matches!(base.kind, NodeKind::ParentExpression) {
                        return Err(ParseError::new(
                            ErrorKind::ParentMember,
                            "'Parent' cannot be called",
                            base.start,
                            base.end,
                        ));
                    }
                    let start = base.start;
                    self.bump()?;
                    let arguments = self.parse_call_arguments()?;
                    self.expect(TokenKind::ParenR, "')'")?;
                    let end = self.prev_end();
                    base = Node::new(
                        NodeKind::CallExpression { callee: Box::new(base), arguments },
                        start,
                        end,
                    );
                }
                TokenKind::As => {
                    if !self.in_function_or_event() && self.options.throw_cast_outside {
                        return Err(self.context_error(self.current_start()));
                    }
                    let start = base.start;
                    self.bump()?;
                    let target = self.parse_type_identifier()?;
                    let end = target.end;
                    base = Node::new(
                        NodeKind::CastExpression { id: Box::new(base), kind: Box::new(target) },
                        start,
                        end,
                    );
                }
                _ => break,
            }
        }
        Ok(base)
    }

    fn check_parent_member_chain(&self, base: &Node) -> ParseResult<()> {
        if let NodeKind::MemberExpression { object, .. } = &base.kind {
            if matches!(object.kind, NodeKind::ParentExpression) {
                return Err(ParseError::new(
                    ErrorKind::ParentMember,
                    "cannot chain a further member access off 'Parent'",
                    base.start,
                    base.end,
                ));
            }
        }
        Ok(())
    }

    fn parse_call_arguments(&mut self) -> ParseResult<Vec<Node>> {
        let mut args = Vec::new();
        if self.current_kind() == TokenKind::ParenR {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if self.current_kind() == TokenKind::Comma {
                self.bump()?;
                continue;
            }
            break;
        }
        Ok(args)
    }

    pub(crate) fn parse_atom(&mut self) -> ParseResult<Node> {
        let start = self.current_start();
        match self.current_kind() {
            TokenKind::Self_ => {
                let token = self.bump()?;
                Ok(Node::new(NodeKind::SelfExpression, start, token.end))
            }
            TokenKind::Parent => {
                let token = self.bump()?;
                let has_extends = self.script_name.as_ref().map(|info| info.has_extends).unwrap_or(false);
                if !has_extends {
                    return Err(ParseError::new(
                        ErrorKind::ParentMember,
                        "'Parent' may only be used in a script that has an 'Extends' clause",
                        start,
                        token.end,
                    ));
                }
                Ok(Node::new(NodeKind::ParentExpression, start, token.end))
            }
            TokenKind::Name => {
                let token = self.bump()?;
                Ok(Node::new(NodeKind::Identifier { name: token.text.to_string() }, start, token.end))
            }
            TokenKind::Num => {
                let token = self.bump()?;
                let value = match token.number {
                    Some(number) => LiteralValue::Number(number),
                    None => LiteralValue::Number(NumberLiteral::Int(0)),
                };
                Ok(Node::new(NodeKind::Literal { value, raw: token.text.to_string() }, start, token.end))
            }
            TokenKind::String => {
                let token = self.bump()?;
                Ok(Node::new(
                    NodeKind::Literal { value: LiteralValue::Str(token.text.to_string()), raw: token.text.to_string() },
                    start,
                    token.end,
                ))
            }
            TokenKind::Char => {
                let token = self.bump()?;
                Ok(Node::new(
                    NodeKind::Literal { value: LiteralValue::Str(token.text.to_string()), raw: token.text.to_string() },
                    start,
                    token.end,
                ))
            }
            TokenKind::True => {
                let token = self.bump()?;
                Ok(Node::new(
                    NodeKind::Literal { value: LiteralValue::Bool(true), raw: token.text.to_string() },
                    start,
                    token.end,
                ))
            }
            TokenKind::False => {
                let token = self.bump()?;
                Ok(Node::new(
                    NodeKind::Literal { value: LiteralValue::Bool(false), raw: token.text.to_string() },
                    start,
                    token.end,
                ))
            }
            TokenKind::None => {
                let token = self.bump()?;
                Ok(Node::new(
                    NodeKind::Literal { value: LiteralValue::Null, raw: token.text.to_string() },
                    start,
                    token.end,
                ))
            }
            TokenKind::ParenL => {
                self.bump()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::ParenR, "')'")?;
                Ok(inner)
            }
            TokenKind::New => self.parse_new_expression(start),
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// `New <Type>[<size>]`. The argument is modeled as a `MemberExpression` whose object repeats
    /// the element type and whose property must be an integer literal (the array size).
    fn parse_new_expression(&mut self, start: usize) -> ParseResult<Node> {
        self.expect(TokenKind::New, "'New'")?;
        if !self.in_function_or_event() && self.options.throw_new_outside {
            return Err(self.context_error(start));
        }
        let meta_token = match self.current_kind() {
            TokenKind::Name | TokenKind::Int | TokenKind::Float | TokenKind::Bool | TokenKind::StringType => {
                self.bump()?
            }
            _ => return Err(self.unexpected("a type name")),
        };
        let meta = Node::new(
            NodeKind::Identifier { name: meta_token.text.to_string() },
            meta_token.start,
            meta_token.end,
        );
        self.expect(TokenKind::BracketL, "'['")?;
        let size_start = self.current_start();
        let size = self.parse_expression()?;
        self.expect(TokenKind::BracketR, "']'")?;
        if !matches!(size.kind, NodeKind::Literal { value: LiteralValue::Number(NumberLiteral::Int(_)), .. }) {
            return Err(ParseError::new(
                ErrorKind::UnexpectedToken,
                "the size in a 'New' expression must be an integer literal",
                size_start,
                size.end,
            ));
        }
        let object = Node::new(
            NodeKind::Identifier { name: meta_token.text.to_string() },
            meta_token.start,
            meta_token.end,
        );
        let argument_end = self.prev_end();
        let argument = Node::new(
            NodeKind::MemberExpression { object: Box::new(object), property: Box::new(size), computed: true },
            meta_token.start,
            argument_end,
        );
        let end = self.prev_end();
        Ok(Node::new(NodeKind::NewExpression { meta: Box::new(meta), argument: Box::new(argument) }, start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn parse_expr(source: &str) -> ParseResult<Node> {
        let body = format!("ScriptName Foo\nFunction F()\n  {source}\nEndFunction");
        let mut parser = Parser::new(&body, Options::default(), None)?;
        let program = parser.parse_program()?;
        let NodeKind::Program { body } = program.kind else { panic!("expected Program") };
        let NodeKind::FunctionStatement { body: Some(fn_body), .. } = &body[1].kind else {
            panic!("expected function body")
        };
        let NodeKind::BlockStatement { body: stmts } = &fn_body.kind else { panic!("expected block") };
        let NodeKind::ExpressionStatement { expression } = &stmts[0].kind else {
            panic!("expected expression statement")
        };
        Ok((**expression).clone())
    }

    #[test]
    fn precedence_climbs_correctly() {
        let expr = parse_expr("a + b * c").unwrap();
        let NodeKind::BinaryExpression { operator, right, .. } = &expr.kind else {
            panic!("expected top-level '+' binary expression")
        };
        assert_eq!(operator, "+");
        assert!(matches!(right.kind, NodeKind::BinaryExpression { .. }));
    }

    #[test]
    fn logical_operators_tag_as_logical_not_binary() {
        let expr = parse_expr("a && b").unwrap();
        assert!(matches!(expr.kind, NodeKind::LogicalExpression { .. }));
    }

    #[test]
    fn assignment_is_right_associative() {
        let expr = parse_expr("x = y = 1").unwrap();
        let NodeKind::AssignExpression { right, .. } = &expr.kind else { panic!("expected assignment") };
        assert!(matches!(right.kind, NodeKind::AssignExpression { .. }));
    }

    #[test]
    fn member_and_call_chain() {
        let expr = parse_expr("a.b.c(1, 2)").unwrap();
        let NodeKind::CallExpression { callee, arguments } = &expr.kind else {
            panic!("expected call expression")
        };
        assert_eq!(arguments.len(), 2);
        assert!(matches!(callee.kind, NodeKind::MemberExpression { .. }));
    }

    #[test]
    fn computed_member_subscript() {
        let expr = parse_expr("arr[0]").unwrap();
        let NodeKind::MemberExpression { computed, .. } = &expr.kind else { panic!("expected member") };
        assert!(*computed);
    }

    #[test]
    fn cast_expression_builds_from_postfix() {
        let expr = parse_expr("a As Int").unwrap();
        assert!(matches!(expr.kind, NodeKind::CastExpression { .. }));
    }

    #[test]
    fn new_expression_requires_integer_literal_size() {
        let err = parse_expr("New Int[3.5]").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn new_expression_with_integer_size_parses() {
        let expr = parse_expr("New Int[3]").unwrap();
        let NodeKind::NewExpression { argument, .. } = &expr.kind else { panic!("expected NewExpression") };
        assert!(matches!(argument.kind, NodeKind::MemberExpression { computed: true, .. }));
    }

    #[test]
    fn parent_without_extends_is_an_error() {
        let err = parse_expr("Parent.Foo()").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParentMember);
    }

    #[test]
    fn unary_negation() {
        let expr = parse_expr("-x").unwrap();
        let NodeKind::UnaryExpression { operator, is_prefix, .. } = &expr.kind else {
            panic!("expected unary expression")
        };
        assert_eq!(operator, "-");
        assert!(*is_prefix);
    }
}
