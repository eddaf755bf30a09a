//! Recursive-descent parser for the Papyrus scripting language.
//!
//! [`parse`] turns source text into a `papyrus_ast::Node` tree or a `papyrus_error::ParseError`.
//! There is no error recovery and no incremental reparsing: a malformed script abandons the parse
//! at its first violation, matching the scope this engine was built for.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod expressions;
mod options;
mod parser;
mod statements;

pub use options::Options;
pub use papyrus_ast::Node;
pub use papyrus_error::{ErrorKind, ParseError, ParseResult};
pub use parser::Parser;

/// Parses `content` into a `Program` node.
///
/// `filename` is used only for the `ScriptName`/filename cross-check
/// (`Options::throw_scriptname_mismatch`); pass `None` to skip it entirely.
pub fn parse(content: &str, options: Options, filename: Option<&str>) -> ParseResult<Node> {
    let span = tracing::debug_span!("papyrus_parse", filename = filename.unwrap_or("<anonymous>"));
    let _guard = span.enter();
    let mut parser = Parser::new(content, options, filename.map(str::to_string))?;
    parser.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_script() {
        let node = parse("ScriptName Foo", Options::default(), None).unwrap();
        match node.kind {
            papyrus_ast::NodeKind::Program { ref body } => assert_eq!(body.len(), 1),
            _ => panic!("expected Program"),
        }
        assert_eq!(node.start, 0);
        assert_eq!(node.end, "ScriptName Foo".len());
    }

    #[test]
    fn filename_mismatch_is_reported() {
        let err = parse("ScriptName Foo", Options::default(), Some("Bar.psc")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ScriptName);
    }

    #[test]
    fn filename_stem_matches_case_insensitively() {
        let node = parse("ScriptName Foo", Options::default(), Some("foo.psc")).unwrap();
        assert!(matches!(node.kind, papyrus_ast::NodeKind::Program { .. }));
    }

    #[test]
    fn malformed_script_reports_first_error_only() {
        let err = parse("ScriptName Foo\n1 + ", Options::default(), None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn recursion_depth_is_bounded() {
        let mut source = String::from("ScriptName Foo\nFunction F()\n");
        for _ in 0..1000 {
            source.push_str("If (true)\n");
        }
        let err = parse(&source, Options::default(), None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    }
}
