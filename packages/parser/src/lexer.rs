//! Lexer for JSX markup using logos
//!
//! Only tag and expression context goes through logos. JSX text and
//! attribute strings are context dependent, so the parser scans those
//! directly from the source.

use logos::{FilterResult, Lexer, Logos};
use std::fmt;
use std::ops::Range;

/// Token types for tag and expression context
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token<'src> {
    // Block comments are skipped by the callback and never emitted
    #[token("/*", block_comment)]
    BlockComment,

    // Keywords
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("return")]
    Return,

    // Identifiers (dashes allowed for attribute names like aria-label)
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*(-[a-zA-Z0-9_$]+)*", |lex| lex.slice())]
    Ident(&'src str),

    // Literals (raw, quotes included)
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice())]
    #[regex(r"'([^'\\\n]|\\.)*'", |lex| lex.slice())]
    Str(&'src str),

    #[regex(r"`([^`\\]|\\.)*`", |lex| lex.slice())]
    Template(&'src str),

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| lex.slice())]
    Number(&'src str),

    // Symbols
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token("/")]
    Slash,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("=")]
    Equals,
    #[token("=>")]
    Arrow,
    #[token("?")]
    Question,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("-")]
    Minus,
}

impl Token<'_> {
    /// Whether a JSX element may start right after this token inside an
    /// otherwise unparsed expression (`items.map(i => <li/>)`, `a ? <b/> : c`).
    pub fn precedes_jsx(&self) -> bool {
        matches!(
            self,
            Token::LParen
                | Token::LBracket
                | Token::LBrace
                | Token::Comma
                | Token::Colon
                | Token::Question
                | Token::Arrow
                | Token::Equals
                | Token::AndAnd
                | Token::OrOr
                | Token::Return
        )
    }

    /// Opening bracket paired with this closing bracket
    pub fn opens(&self) -> Option<Token<'static>> {
        match self {
            Token::RBrace => Some(Token::LBrace),
            Token::RParen => Some(Token::LParen),
            Token::RBracket => Some(Token::LBracket),
            _ => None,
        }
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::True => write!(f, "'true'"),
            Token::False => write!(f, "'false'"),
            Token::Null => write!(f, "'null'"),
            Token::Return => write!(f, "keyword 'return'"),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::Str(s) => write!(f, "string {}", s),
            Token::Template(_) => write!(f, "template literal"),
            Token::Number(n) => write!(f, "number {}", n),
            Token::LAngle => write!(f, "'<'"),
            Token::RAngle => write!(f, "'>'"),
            Token::Slash => write!(f, "'/'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Colon => write!(f, "':'"),
            Token::Semicolon => write!(f, "';'"),
            Token::Comma => write!(f, "','"),
            Token::Dot => write!(f, "'.'"),
            Token::Ellipsis => write!(f, "'...'"),
            Token::Equals => write!(f, "'='"),
            Token::Arrow => write!(f, "'=>'"),
            Token::Question => write!(f, "'?'"),
            Token::AndAnd => write!(f, "'&&'"),
            Token::OrOr => write!(f, "'||'"),
            Token::Minus => write!(f, "'-'"),
            Token::BlockComment => write!(f, "comment"),
        }
    }
}

/// Skip to the end of a `/* */` comment; unterminated comments are errors
fn block_comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(())
        }
    }
}

/// A lexed token, or `Err(())` for a character no token matches
pub type Lexed<'src> = (Result<Token<'src>, ()>, Range<usize>);

/// Lex the first token at or after `offset`, with spans relative to the
/// whole source
pub fn next_token(source: &str, offset: usize) -> Option<Lexed<'_>> {
    let mut lexer = Token::lexer(&source[offset..]);
    let result = lexer.next()?;
    let span = lexer.span();
    Some((result, offset + span.start..offset + span.end))
}

/// Tokenize a whole source string, dropping unmatched characters
pub fn tokenize(source: &str) -> Vec<(Token<'_>, Range<usize>)> {
    Token::lexer(source)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}
