//! Abstract syntax tree types produced by parsing a Papyrus script.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod ast;

pub use ast::{
    ByteSpan, EventFlag, FunctionFlag, LiteralValue, Node, NodeKind, NumberLiteral, PropertyFlag,
    ScriptNameFlag, Variable,
};
