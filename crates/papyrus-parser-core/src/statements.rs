//! Statement-level grammar rules: everything that can appear directly in a `Program` body or
//! inside a block, plus the `Name`/primitive-type lookahead dispatch that tells a declaration
//! apart from an expression at statement start.

use crate::parser::{Parser, ScriptNameInfo};
use papyrus_ast::{EventFlag, FunctionFlag, Node, NodeKind, PropertyFlag, ScriptNameFlag, Variable};
use papyrus_error::{ErrorKind, ParseError, ParseResult};
use papyrus_token::TokenKind;

/// Token kinds that end a statement's argument position without a fresh token there — reached at
/// `EndFunction`/`EndEvent`/etc., or `Eof`.
fn starts_nothing(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::EndFunction
            | TokenKind::EndEvent
            | TokenKind::EndIf
            | TokenKind::Else
            | TokenKind::ElseIf
            | TokenKind::EndWhile
            | TokenKind::EndState
            | TokenKind::EndProperty
            | TokenKind::Eof
    )
}

/// `true` if `identifier` (case-insensitively stripped of any extension) matches `filename`.
fn filename_matches(identifier: &str, filename: &str) -> bool {
    let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
    stem.eq_ignore_ascii_case(identifier)
}

impl<'a> Parser<'a> {
    /// Parses the whole file: an optional leading `ScriptName` followed by zero or more
    /// top-level statements, up to `Eof`.
    pub fn parse_program(&mut self) -> ParseResult<Node> {
        if self.options.throw_scriptname_missing && self.current_kind() != TokenKind::ScriptName {
            return Err(ParseError::new(
                ErrorKind::ScriptName,
                "a script must begin with a ScriptName declaration",
                self.current_start(),
                self.current_end(),
            ));
        }
        let mut body = Vec::new();
        while self.current_kind() != TokenKind::Eof {
            tracing::trace!(kind = ?self.current_kind(), "dispatching top-level statement");
            body.push(self.parse_statement()?);
        }
        let end = self.current_end();
        Ok(Node::new(NodeKind::Program { body }, 0, end))
    }

    /// Parses one statement, tracking recursion depth around the dispatch.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Node> {
        let start = self.current_start();
        self.enter_depth(start)?;
        let result = self.parse_statement_inner();
        self.exit_depth();
        result
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Node> {
        match self.current_kind() {
            TokenKind::ScriptName => self.parse_script_name(),
            TokenKind::Function => {
                let start = self.current_start();
                self.parse_function_statement(start, String::new())
            }
            TokenKind::If | TokenKind::ElseIf => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::State => {
                let start = self.current_start();
                self.parse_state_statement(false, start)
            }
            TokenKind::Auto => {
                let start = self.current_start();
                if self.peek_next_kind()? == TokenKind::State {
                    self.parse_state_statement(true, start)
                } else {
                    let token = self.bump()?;
                    let id = Node::new(
                        NodeKind::Identifier { name: token.text.to_string() },
                        token.start,
                        token.end,
                    );
                    let expr = self.finish_expression_from(id)?;
                    self.wrap_expression_statement(expr)
                }
            }
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Event => {
                let start = self.current_start();
                self.parse_event_statement(start)
            }
            TokenKind::Import => self.parse_import_statement(),
            TokenKind::Name => self.parse_name_led_statement(),
            TokenKind::Int | TokenKind::Float | TokenKind::Bool | TokenKind::StringType => {
                self.parse_primitive_type_led_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_script_name(&mut self) -> ParseResult<Node> {
        let start = self.current_start();
        self.bump()?; // ScriptName
        if self.script_name.is_some() {
            return Err(ParseError::new(
                ErrorKind::ScriptName,
                "duplicate ScriptName declaration",
                start,
                self.current_end(),
            ));
        }
        let id = self.parse_identifier()?;
        let id_name = if let NodeKind::Identifier { name } = &id.kind { name.clone() } else { String::new() };

        let mut extends = None;
        let mut has_extends = false;
        if self.current_kind() == TokenKind::Extends {
            let extends_start = self.current_start();
            self.bump()?;
            if self.newline_before_current() {
                return Err(ParseError::new(
                    ErrorKind::ScriptName,
                    "no newline allowed between 'Extends' and the extended script name",
                    extends_start,
                    self.current_start(),
                ));
            }
            let extended = self.parse_identifier()?;
            let end = extended.end;
            extends = Some(Box::new(Node::new(
                NodeKind::ExtendsDeclaration { extended: Box::new(extended) },
                extends_start,
                end,
            )));
            has_extends = true;
        }

        let mut flags = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Conditional => {
                    flags.push(ScriptNameFlag::Conditional);
                    self.bump()?;
                }
                TokenKind::Hidden => {
                    flags.push(ScriptNameFlag::Hidden);
                    self.bump()?;
                }
                _ => break,
            }
        }

        if self.options.throw_scriptname_mismatch {
            if let Some(filename) = self.filename.clone() {
                if !filename_matches(&id_name, &filename) {
                    return Err(ParseError::new(
                        ErrorKind::ScriptName,
                        format!("ScriptName '{id_name}' does not match filename '{filename}'"),
                        start,
                        self.prev_end(),
                    ));
                }
            }
        }

        let is_conditional = flags.contains(&ScriptNameFlag::Conditional);
        self.script_name = Some(ScriptNameInfo { name: id_name.into(), is_conditional, has_extends });

        let end = self.prev_end();
        Ok(Node::new(NodeKind::ScriptNameStatement { id: Box::new(id), extends, flags }, start, end))
    }

    fn parse_import_statement(&mut self) -> ParseResult<Node> {
        let start = self.current_start();
        self.bump()?; // Import
        let id = self.parse_identifier()?;
        let end = self.prev_end();
        Ok(Node::new(NodeKind::ImportStatement { id: Box::new(id) }, start, end))
    }

    fn parse_return_statement(&mut self) -> ParseResult<Node> {
        let start = self.current_start();
        self.bump()?; // Return
        if self.options.throw_return_outside && !self.in_function_or_event() {
            return Err(self.context_error(start));
        }
        let argument = if self.newline_before_current() || starts_nothing(self.current_kind()) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        let end = self.prev_end();
        Ok(Node::new(NodeKind::ReturnStatement { argument }, start, end))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Node> {
        let start = self.current_start();
        self.bump()?; // If or ElseIf
        if self.options.throw_if_outside && !self.in_function_or_event() {
            return Err(self.context_error(start));
        }
        self.expect(TokenKind::ParenL, "'('")?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::ParenR, "')'")?;
        let consequent = self.parse_block(
            &[TokenKind::ElseIf, TokenKind::Else, TokenKind::EndIf],
            "'ElseIf', 'Else', or 'EndIf'",
        )?;
        let alternate = match self.current_kind() {
            TokenKind::ElseIf => Some(Box::new(self.parse_if_statement()?)),
            TokenKind::Else => {
                self.bump()?;
                let else_block = self.parse_block(&[TokenKind::EndIf], "'EndIf'")?;
                self.expect(TokenKind::EndIf, "'EndIf'")?;
                Some(Box::new(else_block))
            }
            TokenKind::EndIf => {
                self.bump()?;
                None
            }
            _ => return Err(self.unexpected("'ElseIf', 'Else', or 'EndIf'")),
        };
        let end = self.prev_end();
        Ok(Node::new(
            NodeKind::IfStatement { test: Box::new(test), consequent: Box::new(consequent), alternate },
            start,
            end,
        ))
    }

    fn parse_while_statement(&mut self) -> ParseResult<Node> {
        let start = self.current_start();
        self.bump()?; // While
        if self.options.throw_while_outside && !self.in_function_or_event() {
            return Err(self.context_error(start));
        }
        self.expect(TokenKind::ParenL, "'('")?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::ParenR, "')'")?;
        let consequent = self.parse_block(&[TokenKind::EndWhile], "'EndWhile'")?;
        self.expect(TokenKind::EndWhile, "'EndWhile'")?;
        let end = self.prev_end();
        Ok(Node::new(
            NodeKind::WhileStatement { test: Box::new(test), consequent: Box::new(consequent) },
            start,
            end,
        ))
    }

    fn parse_state_statement(&mut self, is_auto: bool, start: usize) -> ParseResult<Node> {
        if is_auto {
            self.expect(TokenKind::Auto, "'Auto'")?;
        }
        self.expect(TokenKind::State, "'State'")?;
        let id = self.parse_identifier()?;
        let was_in_state = self.in_state;
        self.in_state = true;
        let block = self.parse_block(&[TokenKind::EndState], "'EndState'");
        self.in_state = was_in_state;
        let block = block?;
        self.expect(TokenKind::EndState, "'EndState'")?;

        let NodeKind::BlockStatement { ref body } = block.kind else {
            return Err(ParseError::at(ErrorKind::StateStatement, "malformed state body", start));
        };
        for child in body {
            if !matches!(child.kind, NodeKind::FunctionStatement { .. } | NodeKind::EventStatement { .. }) {
                return Err(ParseError::new(
                    ErrorKind::StateStatement,
                    "a state body may only contain function and event declarations",
                    child.start,
                    child.end,
                ));
            }
        }

        let end = self.prev_end();
        Ok(Node::new(NodeKind::StateStatement { id: Box::new(id), is_auto, body: Box::new(block) }, start, end))
    }

    fn parse_function_statement(&mut self, start: usize, kind: String) -> ParseResult<Node> {
        self.expect(TokenKind::Function, "'Function'")?;
        let id = self.parse_identifier()?;
        self.expect(TokenKind::ParenL, "'('")?;
        let params = self.parse_binding_list(TokenKind::ParenR)?;
        self.expect(TokenKind::ParenR, "')'")?;

        let mut flags = Vec::new();
        let mut seen_global = false;
        let mut seen_native = false;
        loop {
            match self.current_kind() {
                TokenKind::Global => {
                    if self.newline_before_current() {
                        return Err(self.unexpected_flag_newline());
                    }
                    if seen_global {
                        return Err(ParseError::new(
                            ErrorKind::FunctionFlag,
                            "'Global' repeated",
                            self.current_start(),
                            self.current_end(),
                        ));
                    }
                    seen_global = true;
                    flags.push(FunctionFlag::Global);
                    self.bump()?;
                }
                TokenKind::Native => {
                    if self.newline_before_current() {
                        return Err(self.unexpected_flag_newline());
                    }
                    if seen_native {
                        return Err(ParseError::new(
                            ErrorKind::FunctionFlag,
                            "'Native' repeated",
                            self.current_start(),
                            self.current_end(),
                        ));
                    }
                    seen_native = true;
                    flags.push(FunctionFlag::Native);
                    self.bump()?;
                }
                _ => break,
            }
        }

        let body = if seen_native {
            if self.current_kind() == TokenKind::EndFunction {
                self.bump()?;
            }
            None
        } else {
            let was_in_function = self.in_function;
            self.in_function = true;
            let block = self.parse_block(&[TokenKind::EndFunction], "'EndFunction'");
            self.in_function = was_in_function;
            let block = block?;
            self.expect(TokenKind::EndFunction, "'EndFunction'")?;
            Some(Box::new(block))
        };

        let end = self.prev_end();
        Ok(Node::new(NodeKind::FunctionStatement { id: Box::new(id), kind, params, flags, body }, start, end))
    }

    fn parse_event_statement(&mut self, start: usize) -> ParseResult<Node> {
        self.expect(TokenKind::Event, "'Event'")?;
        let id = self.parse_identifier()?;
        self.expect(TokenKind::ParenL, "'('")?;
        let params = self.parse_binding_list(TokenKind::ParenR)?;
        self.expect(TokenKind::ParenR, "')'")?;

        let mut flags = Vec::new();
        let mut seen_native = false;
        loop {
            match self.current_kind() {
                TokenKind::Native => {
                    if self.newline_before_current() {
                        return Err(ParseError::new(
                            ErrorKind::EventFlag,
                            "flags must appear on the same line as ')'",
                            self.current_start(),
                            self.current_end(),
                        ));
                    }
                    if seen_native {
                        return Err(ParseError::new(
                            ErrorKind::EventFlag,
                            "'Native' repeated",
                            self.current_start(),
                            self.current_end(),
                        ));
                    }
                    seen_native = true;
                    flags.push(EventFlag::Native);
                    self.bump()?;
                }
                TokenKind::Global => {
                    return Err(ParseError::new(
                        ErrorKind::EventFlag,
                        "'Global' is not a valid event flag",
                        self.current_start(),
                        self.current_end(),
                    ));
                }
                _ => break,
            }
        }

        let body = if seen_native {
            if self.current_kind() == TokenKind::EndEvent {
                self.bump()?;
            }
            None
        } else {
            let was_in_event = self.in_event;
            self.in_event = true;
            let block = self.parse_block(&[TokenKind::EndEvent], "'EndEvent'");
            self.in_event = was_in_event;
            let block = block?;
            self.expect(TokenKind::EndEvent, "'EndEvent'")?;
            Some(Box::new(block))
        };

        let end = self.prev_end();
        Ok(Node::new(NodeKind::EventStatement { id: Box::new(id), params, flags, body }, start, end))
    }

    fn unexpected_flag_newline(&self) -> ParseError {
        ParseError::new(
            ErrorKind::FunctionFlag,
            "flags must appear on the same line as ')'",
            self.current_start(),
            self.current_end(),
        )
    }

    fn parse_property(&mut self, start: usize, kind: String) -> ParseResult<Node> {
        self.expect(TokenKind::Property, "'Property'")?;
        if self.in_function_or_event() || self.in_state {
            return Err(ParseError::new(
                ErrorKind::Property,
                "a property may not be declared inside a function, event, or state",
                start,
                self.current_end(),
            ));
        }
        let id = self.parse_identifier()?;

        let init = if self.current_kind() == TokenKind::Assign {
            self.bump()?;
            let value_start = self.current_start();
            let value = self.parse_atom()?;
            if !matches!(value.kind, NodeKind::Literal { .. }) {
                return Err(ParseError::new(
                    ErrorKind::Property,
                    "a property initializer must be a constant literal",
                    value_start,
                    value.end,
                ));
            }
            Some(Box::new(value))
        } else {
            None
        };

        let mut flags = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Hidden => {
                    flags.push(PropertyFlag::Hidden);
                    self.bump()?;
                }
                TokenKind::Auto => {
                    flags.push(PropertyFlag::Auto);
                    self.bump()?;
                }
                TokenKind::Conditional => {
                    flags.push(PropertyFlag::Conditional);
                    self.bump()?;
                }
                TokenKind::AutoReadOnly => {
                    flags.push(PropertyFlag::AutoReadOnly);
                    self.bump()?;
                }
                _ => break,
            }
        }

        let has_auto = flags.contains(&PropertyFlag::Auto);
        let has_auto_ro = flags.contains(&PropertyFlag::AutoReadOnly);
        let has_conditional = flags.contains(&PropertyFlag::Conditional);
        let has_hidden = flags.contains(&PropertyFlag::Hidden);

        let script_conditional =
            self.script_name.as_ref().map(|info| info.is_conditional).unwrap_or(false);
        if script_conditional && !has_conditional {
            return Err(ParseError::new(
                ErrorKind::Property,
                "ScriptName is Conditional; every property must also be Conditional",
                start,
                self.prev_end(),
            ));
        }
        if has_auto_ro && init.is_none() {
            return Err(ParseError::new(
                ErrorKind::Property,
                "an AutoReadOnly property requires an initializer",
                start,
                self.prev_end(),
            ));
        }
        if has_conditional && !(has_auto || has_auto_ro) {
            return Err(ParseError::new(
                ErrorKind::Property,
                "a Conditional property must also be Auto or AutoReadOnly",
                start,
                self.prev_end(),
            ));
        }
        if has_conditional && init.is_none() {
            return Err(ParseError::new(
                ErrorKind::Property,
                "a Conditional property requires an initializer",
                start,
                self.prev_end(),
            ));
        }
        if flags.is_empty() {
            return Err(ParseError::new(
                ErrorKind::Property,
                "a property declared without Auto or AutoReadOnly must carry Hidden and define a full property body",
                start,
                self.prev_end(),
            ));
        }

        let is_hidden = has_hidden || !(has_auto || has_auto_ro || has_conditional);

        if !is_hidden {
            let end = self.prev_end();
            return Ok(Node::new(NodeKind::PropertyDeclaration { id: Box::new(id), kind, init, flags }, start, end));
        }

        if !self.lexer.remaining_source_has_end_property() {
            return Err(ParseError::new(
                ErrorKind::Property,
                "no matching 'EndProperty' found for full property",
                start,
                self.prev_end(),
            ));
        }
        let body_block = self.parse_block(&[TokenKind::EndProperty], "'EndProperty'")?;
        self.expect(TokenKind::EndProperty, "'EndProperty'")?;

        let NodeKind::BlockStatement { body: children } = &body_block.kind else {
            return Err(ParseError::at(ErrorKind::Property, "malformed full property body", start));
        };
        if children.is_empty() {
            return Err(ParseError::new(
                ErrorKind::Property,
                "a full property body must declare a Get and/or Set function",
                start,
                self.prev_end(),
            ));
        }

        let mut getter = None;
        let mut setter = None;
        for child in children {
            if let NodeKind::FunctionStatement { id: fn_id, params, kind: fn_kind, .. } = &child.kind {
                let name = if let NodeKind::Identifier { name } = &fn_id.kind { name.as_str() } else { "" };
                if name == "Get" && params.is_empty() {
                    if fn_kind != &kind {
                        return Err(ParseError::new(
                            ErrorKind::Property,
                            "a property's Get function must return the property's own type",
                            child.start,
                            child.end,
                        ));
                    }
                    getter = Some(Box::new(child.clone()));
                } else if name == "Set" && params.len() == 1 {
                    setter = Some(Box::new(child.clone()));
                }
            }
        }

        if getter.is_none() && setter.is_none() {
            return Err(ParseError::new(
                ErrorKind::Property,
                "a full property body must declare a valid Get and/or Set function",
                start,
                self.prev_end(),
            ));
        }

        let end = self.prev_end();
        Ok(Node::new(
            NodeKind::PropertyFullDeclaration { id: Box::new(id), kind, init, flags, getter, setter },
            start,
            end,
        ))
    }

    /// Consumes a block of statements until one of `closing` is reached (without consuming it),
    /// failing with a `BlockStatement` error if `Eof` is hit first.
    pub(crate) fn parse_block(&mut self, closing: &[TokenKind], expected: &str) -> ParseResult<Node> {
        let start = self.current_start();
        let mut body = Vec::new();
        while !closing.contains(&self.current_kind()) {
            if self.current_kind() == TokenKind::Eof {
                return Err(ParseError::new(
                    ErrorKind::BlockStatement,
                    format!("unexpected end of file, expected {expected}"),
                    self.current_start(),
                    self.current_end(),
                ));
            }
            body.push(self.parse_statement()?);
        }
        let end = self.prev_end();
        Ok(Node::new(NodeKind::BlockStatement { body }, start, end))
    }

    /// Parses a comma-separated parameter list up to (not including) `close`.
    fn parse_binding_list(&mut self, close: TokenKind) -> ParseResult<Vec<Node>> {
        let mut params = Vec::new();
        if self.current_kind() == close {
            return Ok(params);
        }
        loop {
            let param_start = self.current_start();
            let type_node = self.parse_type_identifier()?;
            let type_name = if let NodeKind::Identifier { name } = type_node.kind { name } else { String::new() };

            let mut is_array = false;
            if self.current_kind() == TokenKind::BracketL && self.peek_next_kind()? == TokenKind::BracketR {
                self.bump()?; // [
                self.bump()?; // ]
                is_array = true;
            }
            let kind_string = if is_array { format!("{type_name}[]") } else { type_name };

            let name_id = self.parse_identifier()?;
            let init = if self.current_kind() == TokenKind::Assign {
                self.bump()?;
                Some(Box::new(self.parse_expression()?))
            } else {
                None
            };
            let end = self.prev_end();
            let variable = Variable { id: Box::new(name_id), kind: kind_string, is_array, init };
            params.push(Node::new(NodeKind::VariableDeclaration { variable }, param_start, end));

            if self.current_kind() == TokenKind::Comma {
                self.bump()?;
                continue;
            }
            break;
        }
        Ok(params)
    }

    fn parse_variable_declaration_statement(
        &mut self,
        start: usize,
        kind: String,
        is_array: bool,
    ) -> ParseResult<Node> {
        let id = self.parse_identifier()?;
        let init = if self.current_kind() == TokenKind::Assign {
            self.bump()?;
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        let end = self.prev_end();
        let variable = Variable { id: Box::new(id), kind, is_array, init };
        Ok(Node::new(NodeKind::VariableDeclaration { variable }, start, end))
    }

    pub(crate) fn parse_expression_statement(&mut self) -> ParseResult<Node> {
        let start = self.current_start();
        let expr = self.parse_expression()?;
        let end = expr.end;
        Ok(Node::new(NodeKind::ExpressionStatement { expression: Box::new(expr) }, start, end))
    }

    pub(crate) fn wrap_expression_statement(&self, expr: Node) -> ParseResult<Node> {
        let start = expr.start;
        let end = expr.end;
        Ok(Node::new(NodeKind::ExpressionStatement { expression: Box::new(expr) }, start, end))
    }

    /// Primitive-type-led statement: `Int`/`Float`/`Bool`/`String` can only begin a declaration
    /// (a bareword of one of these types is never a usable expression value), so there is no
    /// expression-lead short-circuit here unlike [`Parser::parse_name_led_statement`].
    fn parse_primitive_type_led_statement(&mut self) -> ParseResult<Node> {
        let start = self.current_start();
        let mut is_array = false;
        if self.peek_next_kind()? == TokenKind::BracketL && self.peek_kind_two_ahead()? == TokenKind::BracketR {
            is_array = true;
        }
        let type_token = self.bump()?;
        let type_name = type_token.text.to_string();
        if is_array {
            self.expect(TokenKind::BracketL, "'['")?;
            self.expect(TokenKind::BracketR, "']'")?;
        }
        let kind_string = if is_array { format!("{type_name}[]") } else { type_name };

        match self.current_kind() {
            TokenKind::Function => self.parse_function_statement(start, kind_string),
            TokenKind::Property => self.parse_property(start, kind_string),
            TokenKind::Name => self.parse_variable_declaration_statement(start, kind_string, is_array),
            _ => Err(self.unexpected("'Function', 'Property', or a variable name")),
        }
    }

    /// The defining dispatch: a bareword at statement start may be a type name leading a
    /// declaration, or the first token of an expression statement. A short lookahead past the
    /// identifier decides which.
    fn parse_name_led_statement(&mut self) -> ParseResult<Node> {
        let start = self.current_start();
        let next_kind = self.peek_next_kind()?;
        let is_expression_lead = matches!(
            next_kind,
            TokenKind::Assign
                | TokenKind::PlusMinus
                | TokenKind::Star
                | TokenKind::StarStar
                | TokenKind::Slash
                | TokenKind::Modulo
                | TokenKind::Dot
                | TokenKind::ParenL
        );
        if is_expression_lead {
            return self.parse_expression_statement();
        }

        let mut is_array = false;
        if next_kind == TokenKind::BracketL {
            if self.peek_kind_two_ahead()? == TokenKind::BracketR {
                is_array = true;
            } else {
                return self.parse_expression_statement();
            }
        }

        let type_token = self.bump()?; // the identifier itself
        let type_name = type_token.text.to_string();
        if is_array {
            self.expect(TokenKind::BracketL, "'['")?;
            self.expect(TokenKind::BracketR, "']'")?;
        }
        let kind_string = if is_array { format!("{type_name}[]") } else { type_name.clone() };

        match self.current_kind() {
            TokenKind::Function => self.parse_function_statement(start, kind_string),
            TokenKind::Property => self.parse_property(start, kind_string),
            TokenKind::Name => self.parse_variable_declaration_statement(start, kind_string, is_array),
            _ => {
                let id_node =
                    Node::new(NodeKind::Identifier { name: type_name }, type_token.start, type_token.end);
                let expr = self.finish_expression_from(id_node)?;
                self.wrap_expression_statement(expr)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn parse(source: &str) -> ParseResult<Node> {
        let mut parser = Parser::new(source, Options::default(), None).unwrap();
        parser.parse_program()
    }

    #[test]
    fn missing_scriptname_is_an_error() {
        let err = parse("Function Foo()\nEndFunction").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ScriptName);
    }

    #[test]
    fn minimal_script_parses() {
        let program = parse("ScriptName Foo").unwrap();
        match program.kind {
            NodeKind::Program { body } => assert_eq!(body.len(), 1),
            other => panic!("expected Program, got {other:?}"),
        }
    }

    #[test]
    fn function_with_body_and_return() {
        let program = parse(
            "ScriptName Foo\n\
             Int Function Add(Int a, Int b)\n\
               return a + b\n\
             EndFunction",
        )
        .unwrap();
        let NodeKind::Program { body } = program.kind else { panic!("expected Program") };
        let NodeKind::FunctionStatement { kind, params, body, .. } = &body[1].kind else {
            panic!("expected FunctionStatement")
        };
        assert_eq!(kind, "Int");
        assert_eq!(params.len(), 2);
        assert!(body.is_some());
    }

    #[test]
    fn native_function_has_no_body_and_accepts_trailing_endfunction() {
        let program = parse("ScriptName Foo\nInt Function F() Global Native\nEndFunction").unwrap();
        let NodeKind::Program { body } = program.kind else { panic!("expected Program") };
        let NodeKind::FunctionStatement { flags, body: fn_body, .. } = &body[1].kind else {
            panic!("expected FunctionStatement")
        };
        assert_eq!(flags, &vec![FunctionFlag::Global, FunctionFlag::Native]);
        assert!(fn_body.is_none());
    }

    #[test]
    fn auto_property_has_no_body() {
        let program = parse("ScriptName Foo\nInt Property Bar = 1 Auto\n").unwrap();
        let NodeKind::Program { body } = program.kind else { panic!("expected Program") };
        assert!(matches!(body[1].kind, NodeKind::PropertyDeclaration { .. }));
    }

    #[test]
    fn full_property_requires_hidden_and_parses_getter_setter() {
        let program = parse(
            "ScriptName Foo\n\
             Int Property Bar Hidden\n\
               Int Function Get()\n\
                 return 1\n\
               EndFunction\n\
               Function Set(Int value)\n\
               EndFunction\n\
             EndProperty",
        )
        .unwrap();
        let NodeKind::Program { body } = program.kind else { panic!("expected Program") };
        let NodeKind::PropertyFullDeclaration { getter, setter, .. } = &body[1].kind else {
            panic!("expected PropertyFullDeclaration")
        };
        assert!(getter.is_some());
        assert!(setter.is_some());
    }

    #[test]
    fn full_property_with_no_valid_getter_or_setter_is_an_error() {
        let err = parse(
            "ScriptName Foo\n\
             Int Property Bar Hidden\n\
               Function Foo()\n\
               EndFunction\n\
             EndProperty",
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Property);
    }

    #[test]
    fn property_without_any_flag_is_an_error() {
        let err = parse("ScriptName Foo\nInt Property Bar\nEndProperty").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Property);
    }

    #[test]
    fn autoreadonly_without_initializer_is_an_error() {
        let err = parse("ScriptName Foo\nInt Property Bar AutoReadOnly\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Property);
    }

    #[test]
    fn if_elseif_else_chain_nests_as_alternates() {
        let program = parse(
            "ScriptName Foo\n\
             Function F()\n\
               If (a)\n\
                 return 1\n\
               ElseIf (b)\n\
                 return 2\n\
               Else\n\
                 return 3\n\
               EndIf\n\
             EndFunction",
        )
        .unwrap();
        let NodeKind::Program { body } = program.kind else { panic!("expected Program") };
        let NodeKind::FunctionStatement { body: Some(fn_body), .. } = &body[1].kind else {
            panic!("expected FunctionStatement with a body")
        };
        let NodeKind::BlockStatement { body: stmts } = &fn_body.kind else { panic!("expected block") };
        let NodeKind::IfStatement { alternate, .. } = &stmts[0].kind else { panic!("expected IfStatement") };
        let inner = alternate.as_ref().unwrap();
        assert!(matches!(inner.kind, NodeKind::IfStatement { .. }));
    }

    #[test]
    fn state_body_rejects_non_function_statements() {
        let err = parse("ScriptName Foo\nState Bar\n  Int x = 1\nEndState").unwrap_err();
        assert_eq!(err.kind, ErrorKind::StateStatement);
    }

    #[test]
    fn auto_state_is_recognized() {
        let program = parse("ScriptName Foo\nAuto State Bar\nEndState").unwrap();
        let NodeKind::Program { body } = program.kind else { panic!("expected Program") };
        assert!(matches!(body[1].kind, NodeKind::StateStatement { is_auto: true, .. }));
    }

    #[test]
    fn return_outside_function_is_an_error() {
        let err = parse("ScriptName Foo\nreturn 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn local_variable_declaration_with_initializer() {
        let program = parse("ScriptName Foo\nFunction F()\n  Int x = 5\nEndFunction").unwrap();
        let NodeKind::Program { body } = program.kind else { panic!("expected Program") };
        let NodeKind::FunctionStatement { body: Some(fn_body), .. } = &body[1].kind else {
            panic!("expected body")
        };
        let NodeKind::BlockStatement { body: stmts } = &fn_body.kind else { panic!("expected block") };
        assert!(matches!(stmts[0].kind, NodeKind::VariableDeclaration { .. }));
    }

    #[test]
    fn array_type_variable_declaration() {
        let program = parse("ScriptName Foo\nFunction F()\n  Int[] xs\nEndFunction").unwrap();
        let NodeKind::Program { body } = program.kind else { panic!("expected Program") };
        let NodeKind::FunctionStatement { body: Some(fn_body), .. } = &body[1].kind else {
            panic!("expected body")
        };
        let NodeKind::BlockStatement { body: stmts } = &fn_body.kind else { panic!("expected block") };
        let NodeKind::VariableDeclaration { variable } = &stmts[0].kind else { panic!("expected var decl") };
        assert!(variable.is_array);
        assert_eq!(variable.kind, "Int[]");
    }

    #[test]
    fn assignment_to_existing_variable_is_an_expression_statement() {
        let program = parse("ScriptName Foo\nFunction F()\n  x = 5\nEndFunction").unwrap();
        let NodeKind::Program { body } = program.kind else { panic!("expected Program") };
        let NodeKind::FunctionStatement { body: Some(fn_body), .. } = &body[1].kind else {
            panic!("expected body")
        };
        let NodeKind::BlockStatement { body: stmts } = &fn_body.kind else { panic!("expected block") };
        let NodeKind::ExpressionStatement { expression } = &stmts[0].kind else {
            panic!("expected expression statement")
        };
        assert!(matches!(expression.kind, NodeKind::AssignExpression { .. }));
    }
}
