//! Error types for the JSX parser

use crate::ast::Span;
use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with location and context
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {span}: expected {expected}, found {found}")]
    UnexpectedToken {
        span: Span,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of input at {pos}: expected {expected}")]
    UnexpectedEof { pos: usize, expected: String },

    #[error("Invalid syntax at {span}: {message}")]
    InvalidSyntax { span: Span, message: String },

    #[error("Lexer error at {span}: unexpected character")]
    LexError { span: Span },

    #[error("Mismatched closing tag at {span}: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        span: Span,
        expected: String,
        found: String,
    },
}

impl ParseError {
    pub fn unexpected_token(
        span: impl Into<Span>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            span: span.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(pos: usize, expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            pos,
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(span: impl Into<Span>, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            span: span.into(),
            message: message.into(),
        }
    }

    pub fn lex_error(span: impl Into<Span>) -> Self {
        Self::LexError { span: span.into() }
    }

    /// Byte range the error points at
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidSyntax { span, .. }
            | ParseError::LexError { span }
            | ParseError::MismatchedClosingTag { span, .. } => *span,
            ParseError::UnexpectedEof { pos, .. } => Span::new(*pos, *pos),
        }
    }

    /// 1-based line and column of the error start in `source`
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let offset = self.span().start.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map(|last| last.chars().count() + 1)
            .unwrap_or(1);
        (line, column)
    }

    fn label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. }
            | ParseError::UnexpectedEof { expected, .. } => format!("expected {}", expected),
            ParseError::InvalidSyntax { message, .. } => message.clone(),
            ParseError::LexError { .. } => "unexpected character".to_string(),
            ParseError::MismatchedClosingTag { expected, .. } => {
                format!("expected </{}>", expected)
            }
        }
    }
}

/// Pretty-print an error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = error.span();
    let start = span.start.min(source.len());
    let end = span.end.clamp(start, source.len());
    let end = if end == start {
        (start + 1).min(source.len())
    } else {
        end
    };

    let mut output = Vec::new();
    let written = Report::build(ReportKind::Error, filename, start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, start..end))
                .with_color(Color::Red)
                .with_message(error.label()),
        )
        .finish()
        .write((filename, Source::from(source)), &mut output);

    match written {
        Ok(()) => String::from_utf8(output).unwrap_or_else(|_| error.to_string()),
        Err(_) => error.to_string(),
    }
}

/// Plain one-line rendering when ariadne is not compiled in
#[cfg(not(feature = "pretty-errors"))]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    let (line, column) = error.line_col(source);
    format!("{}:{}:{}: {}", filename, line, column, error.label())
}
