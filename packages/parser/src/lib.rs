//! JSX markup parsing and code generation
//!
//! `parse` turns markup into an arena [`Tree`], `tree_to_code` turns a
//! (possibly edited) tree back into source.

pub mod ast;
pub mod entities;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod serializer;

pub use ast::{LiteralValue, Node, NodeId, NodeKind, OpaquePart, PropertyKey, Span, Tree};
pub use error::{format_error, ParseError, ParseResult};
pub use lexer::{tokenize, Token};
pub use parser::{parse, Parser};
pub use serializer::{tree_to_code, Serializer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_then_generate() {
        let source = r#"<section id="hero"><h1>Hello</h1></section>"#;
        let tree = parse(source).unwrap();
        assert_eq!(tree.elements().count(), 2);
        assert_eq!(tree_to_code(&tree), source);
    }
}
