//! JSON serialization of a parsed Papyrus AST, plus the error-context rendering the
//! `papyrus-parse` binary uses to report a parse failure against its source line.
//!
//! `papyrus-ast` itself carries no `serde` dependency; the wire shape lives here so the core
//! crate stays free to change its internal representation without touching an on-the-wire
//! contract owned by this layer.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use papyrus_ast::{EventFlag, FunctionFlag, LiteralValue, Node, NodeKind, PropertyFlag, ScriptNameFlag};
use papyrus_error::{ErrorContext, ParseError};
use papyrus_position::LineIndex;
use serde_json::{json, Map, Value};

/// Converts a parsed `Node` tree into its JSON wire representation.
///
/// Every object carries `type` (the node's [`Node::kind_name`]), `start`, and `end`; the
/// remaining fields are specific to the node kind. Fields holding `Option::None` are omitted
/// entirely rather than serialized as `null`.
pub fn node_to_json(node: &Node) -> Value {
    let mut object = Map::new();
    object.insert("type".to_string(), json!(node.kind_name()));
    object.insert("start".to_string(), json!(node.start));
    object.insert("end".to_string(), json!(node.end));

    match &node.kind {
        NodeKind::Program { body } => {
            object.insert("body".to_string(), nodes_to_json(body));
        }
        NodeKind::ScriptNameStatement { id, extends, flags } => {
            object.insert("id".to_string(), node_to_json(id));
            insert_option(&mut object, "extends", extends.as_deref());
            object.insert("flags".to_string(), script_name_flags_to_json(flags));
        }
        NodeKind::ExtendsDeclaration { extended } => {
            object.insert("extended".to_string(), node_to_json(extended));
        }
        NodeKind::ImportStatement { id } => {
            object.insert("id".to_string(), node_to_json(id));
        }
        NodeKind::PropertyDeclaration { id, kind, init, flags } => {
            object.insert("id".to_string(), node_to_json(id));
            object.insert("kind".to_string(), json!(kind));
            insert_option(&mut object, "init", init.as_deref());
            object.insert("flags".to_string(), property_flags_to_json(flags));
        }
        NodeKind::PropertyFullDeclaration { id, kind, init, flags, getter, setter } => {
            object.insert("id".to_string(), node_to_json(id));
            object.insert("kind".to_string(), json!(kind));
            insert_option(&mut object, "init", init.as_deref());
            object.insert("flags".to_string(), property_flags_to_json(flags));
            insert_option(&mut object, "getter", getter.as_deref());
            insert_option(&mut object, "setter", setter.as_deref());
        }
        NodeKind::FunctionStatement { id, kind, params, flags, body } => {
            object.insert("id".to_string(), node_to_json(id));
            object.insert("kind".to_string(), json!(kind));
            object.insert("params".to_string(), nodes_to_json(params));
            object.insert("flags".to_string(), function_flags_to_json(flags));
            insert_option(&mut object, "body", body.as_deref());
        }
        NodeKind::EventStatement { id, params, flags, body } => {
            object.insert("id".to_string(), node_to_json(id));
            object.insert("params".to_string(), nodes_to_json(params));
            object.insert("flags".to_string(), event_flags_to_json(flags));
            insert_option(&mut object, "body", body.as_deref());
        }
        NodeKind::StateStatement { id, is_auto, body } => {
            object.insert("id".to_string(), node_to_json(id));
            object.insert("is_auto".to_string(), json!(is_auto));
            object.insert("body".to_string(), node_to_json(body));
        }
        NodeKind::BlockStatement { body } => {
            object.insert("body".to_string(), nodes_to_json(body));
        }
        NodeKind::IfStatement { test, consequent, alternate } => {
            object.insert("test".to_string(), node_to_json(test));
            object.insert("consequent".to_string(), node_to_json(consequent));
            insert_option(&mut object, "alternate", alternate.as_deref());
        }
        NodeKind::WhileStatement { test, consequent } => {
            object.insert("test".to_string(), node_to_json(test));
            object.insert("consequent".to_string(), node_to_json(consequent));
        }
        NodeKind::ReturnStatement { argument } => {
            insert_option(&mut object, "argument", argument.as_deref());
        }
        NodeKind::VariableDeclaration { variable } => {
            object.insert("id".to_string(), node_to_json(&variable.id));
            object.insert("kind".to_string(), json!(variable.kind));
            object.insert("is_array".to_string(), json!(variable.is_array));
            insert_option(&mut object, "init", variable.init.as_deref());
        }
        NodeKind::ExpressionStatement { expression } => {
            object.insert("expression".to_string(), node_to_json(expression));
        }
        NodeKind::AssignExpression { left, operator, right } => {
            object.insert("left".to_string(), node_to_json(left));
            object.insert("operator".to_string(), json!(operator));
            object.insert("right".to_string(), node_to_json(right));
        }
        NodeKind::BinaryExpression { left, operator, right } => {
            object.insert("left".to_string(), node_to_json(left));
            object.insert("operator".to_string(), json!(operator));
            object.insert("right".to_string(), node_to_json(right));
        }
        NodeKind::LogicalExpression { left, operator, right } => {
            object.insert("left".to_string(), node_to_json(left));
            object.insert("operator".to_string(), json!(operator));
            object.insert("right".to_string(), node_to_json(right));
        }
        NodeKind::UnaryExpression { operator, argument, is_prefix } => {
            object.insert("operator".to_string(), json!(operator));
            object.insert("argument".to_string(), node_to_json(argument));
            object.insert("is_prefix".to_string(), json!(is_prefix));
        }
        NodeKind::CallExpression { callee, arguments } => {
            object.insert("callee".to_string(), node_to_json(callee));
            object.insert("arguments".to_string(), nodes_to_json(arguments));
        }
        NodeKind::MemberExpression { object: obj, property, computed } => {
            object.insert("object".to_string(), node_to_json(obj));
            object.insert("property".to_string(), node_to_json(property));
            object.insert("computed".to_string(), json!(computed));
        }
        NodeKind::CastExpression { id, kind } => {
            object.insert("id".to_string(), node_to_json(id));
            object.insert("kind".to_string(), node_to_json(kind));
        }
        NodeKind::NewExpression { meta, argument } => {
            object.insert("meta".to_string(), node_to_json(meta));
            object.insert("argument".to_string(), node_to_json(argument));
        }
        NodeKind::Literal { value, raw } => {
            object.insert("value".to_string(), literal_value_to_json(value));
            object.insert("raw".to_string(), json!(raw));
        }
        NodeKind::Identifier { name } => {
            object.insert("name".to_string(), json!(name));
        }
        NodeKind::SelfExpression | NodeKind::ParentExpression => {}
    }

    Value::Object(object)
}

fn nodes_to_json(nodes: &[Node]) -> Value {
    Value::Array(nodes.iter().map(node_to_json).collect())
}

fn insert_option(object: &mut Map<String, Value>, key: &str, node: Option<&Node>) {
    if let Some(node) = node {
        object.insert(key.to_string(), node_to_json(node));
    }
}

fn literal_value_to_json(value: &LiteralValue) -> Value {
    match value {
        LiteralValue::Bool(b) => json!(b),
        LiteralValue::Null => Value::Null,
        LiteralValue::Number(papyrus_ast::NumberLiteral::Int(i)) => json!(i),
        LiteralValue::Number(papyrus_ast::NumberLiteral::Float(f)) => json!(f),
        LiteralValue::Str(s) => json!(s),
    }
}

fn script_name_flag_name(flag: ScriptNameFlag) -> &'static str {
    match flag {
        ScriptNameFlag::Conditional => "Conditional",
        ScriptNameFlag::Hidden => "Hidden",
    }
}

fn script_name_flags_to_json(flags: &[ScriptNameFlag]) -> Value {
    json!(flags.iter().map(|f| script_name_flag_name(*f)).collect::<Vec<_>>())
}

fn property_flag_name(flag: PropertyFlag) -> &'static str {
    match flag {
        PropertyFlag::Auto => "Auto",
        PropertyFlag::AutoReadOnly => "AutoReadOnly",
        PropertyFlag::Conditional => "Conditional",
        PropertyFlag::Hidden => "Hidden",
    }
}

fn property_flags_to_json(flags: &[PropertyFlag]) -> Value {
    json!(flags.iter().map(|f| property_flag_name(*f)).collect::<Vec<_>>())
}

fn function_flags_to_json(flags: &[FunctionFlag]) -> Value {
    let names: Vec<&'static str> = flags
        .iter()
        .map(|f| match f {
            FunctionFlag::Global => "Global",
            FunctionFlag::Native => "Native",
        })
        .collect();
    json!(names)
}

fn event_flags_to_json(flags: &[EventFlag]) -> Value {
    let names: Vec<&'static str> = flags.iter().map(|_| "Native").collect();
    json!(names)
}

/// Renders a [`ParseError`] as a one-line, human-readable diagnostic (`line:column: message`)
/// plus the offending source line, the way a terminal-facing tool wants it.
pub fn render_error(error: &ParseError, source: &str) -> String {
    let index = LineIndex::new(source);
    let ctx = ErrorContext::new(error.clone(), source, &index);
    format!(
        "{}:{}: {}: {}\n  {}",
        ctx.line + 1,
        ctx.column + 1,
        ctx.error.kind,
        ctx.error.message,
        ctx.source_line
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use papyrus_parser_core::{parse, Options};
    use pretty_assertions::assert_eq;

    #[test]
    fn program_serializes_with_body_array() {
        let ast = parse("ScriptName Foo", Options::default(), None).unwrap();
        let json = node_to_json(&ast);
        assert_eq!(json["type"], "Program");
        assert!(json["body"].is_array());
        assert_eq!(json["body"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn script_name_statement_omits_absent_extends() {
        let ast = parse("ScriptName Foo", Options::default(), None).unwrap();
        let NodeKind::Program { body } = &ast.kind else { panic!("expected Program") };
        let script_name = node_to_json(&body[0]);
        assert_eq!(script_name["type"], "ScriptNameStatement");
        assert!(script_name.get("extends").is_none());
    }

    #[test]
    fn script_name_statement_includes_extends_when_present() {
        let ast = parse("ScriptName Foo extends Bar", Options::default(), None).unwrap();
        let NodeKind::Program { body } = &ast.kind else { panic!("expected Program") };
        let script_name = node_to_json(&body[0]);
        assert_eq!(script_name["extends"]["type"], "Identifier");
        assert_eq!(script_name["extends"]["name"], "Bar");
    }

    #[test]
    fn property_declaration_serializes_flags_as_names() {
        let source = "ScriptName Foo\nInt Property P Auto";
        let ast = parse(source, Options::default(), None).unwrap();
        let NodeKind::Program { body } = &ast.kind else { panic!("expected Program") };
        let prop = node_to_json(&body[1]);
        assert_eq!(prop["type"], "PropertyDeclaration");
        assert_eq!(prop["flags"], json!(["Auto"]));
    }

    #[test]
    fn render_error_points_at_the_offending_line() {
        let source = "ScriptName Foo\n1 + ";
        let err = parse(source, Options::default(), None).unwrap_err();
        let rendered = render_error(&err, source);
        assert!(rendered.starts_with("2:"));
        assert!(rendered.contains("1 + "));
    }

    #[test]
    fn literal_null_serializes_as_json_null() {
        let source = "ScriptName Foo\nFunction F()\n  Return None\nEndFunction";
        let ast = parse(source, Options::default(), None).unwrap();
        let NodeKind::Program { body } = &ast.kind else { panic!("expected Program") };
        let func = node_to_json(&body[1]);
        let block = &func["body"];
        let ret = &block["body"][0];
        assert_eq!(ret["argument"]["value"], Value::Null);
    }
}
