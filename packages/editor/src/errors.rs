//! Error types for the editor

use crate::mutations::MutationError;
use jsxed_parser::ParseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),
}
