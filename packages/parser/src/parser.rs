use crate::ast::*;
use crate::entities::{decode_entities, unquote_js_string};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{next_token, Lexed, Token};
use std::collections::HashMap;
use std::ops::Range;

/// Position the parser can rewind to
#[derive(Clone, Copy)]
struct Checkpoint {
    pos: usize,
    nodes: usize,
}

/// Recursive descent parser for JSX markup
///
/// Tags and expressions are lexed on demand from the current byte offset,
/// JSX text and attribute strings are scanned straight from the source.
pub struct Parser<'src> {
    source: &'src str,
    pos: usize,
    tree: Tree,

    /// JSX already parsed, by start offset: node and end offset. A rewound
    /// structured attempt reuses these instead of parsing the markup again.
    jsx_parsed: HashMap<usize, (NodeId, usize)>,

    /// Nodes below this index are referenced by `jsx_parsed` and survive
    /// a rewind
    kept_nodes: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            tree: Tree::empty(),
            jsx_parsed: HashMap::new(),
            kept_nodes: 0,
        }
    }

    /// Parse the whole source as a program of expression statements
    pub fn parse_program(mut self) -> ParseResult<Tree> {
        let mut body = Vec::new();

        loop {
            while self.match_token(Token::Semicolon) {}
            let Some(start) = self.peek().map(|(_, span)| span.start) else {
                break;
            };

            let expression = self.parse_expression(&[Token::Semicolon])?;
            let span = Span::new(start, self.pos);
            body.push(
                self.tree
                    .alloc_spanned(NodeKind::ExpressionStatement { expression }, span),
            );
        }

        let root = self.tree.alloc_spanned(
            NodeKind::Program { body },
            Span::new(0, self.source.len()),
        );
        self.tree.set_root(root);
        Ok(self.tree)
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Parse an expression ending before one of `terminators` (or the end
    /// of input). Shapes outside the structured subset are kept opaque.
    fn parse_expression(&mut self, terminators: &[Token<'static>]) -> ParseResult<NodeId> {
        let checkpoint = self.checkpoint();

        if let Some(node) = self.parse_structured()? {
            if self.at_terminator(terminators) {
                return Ok(node);
            }
        }

        self.rewind(checkpoint);
        self.parse_opaque(terminators)
    }

    /// Expression nested in a structured shape; `None` when it is empty so
    /// the enclosing shape falls back to opaque text instead of failing
    fn parse_inner_expression(
        &mut self,
        terminators: &[Token<'static>],
    ) -> ParseResult<Option<NodeId>> {
        if self.at_terminator(terminators) {
            return Ok(None);
        }
        self.parse_expression(terminators).map(Some)
    }

    /// Structured expression, or `None` if the shape is not supported.
    /// Errors are only returned for malformed JSX.
    fn parse_structured(&mut self) -> ParseResult<Option<NodeId>> {
        let Some((Ok(token), span)) = self.peek() else {
            return Ok(None);
        };

        match token {
            Token::LAngle => self.parse_jsx().map(Some),
            Token::Str(raw) => {
                self.advance();
                let value = LiteralValue::String(unquote_js_string(raw));
                Ok(Some(self.literal(value, raw, span)))
            }
            Token::Number(raw) => {
                self.advance();
                let value = parse_number(raw, span.clone())?;
                Ok(Some(self.literal(LiteralValue::Number(value), raw, span)))
            }
            Token::Minus => {
                self.advance();
                match self.peek() {
                    Some((Ok(Token::Number(raw)), number_span)) => {
                        self.advance();
                        let value = -parse_number(raw, number_span.clone())?;
                        let full = span.start..number_span.end;
                        let source = self.source;
                        let raw = &source[full.clone()];
                        Ok(Some(self.literal(LiteralValue::Number(value), raw, full)))
                    }
                    _ => Ok(None),
                }
            }
            Token::True | Token::False => {
                self.advance();
                let value = LiteralValue::Boolean(token == Token::True);
                let source = self.source;
                let raw = &source[span.clone()];
                Ok(Some(self.literal(value, raw, span)))
            }
            Token::Null => {
                self.advance();
                Ok(Some(self.literal(LiteralValue::Null, "null", span)))
            }
            Token::Ident(name) => {
                self.advance();
                let kind = NodeKind::Identifier {
                    name: name.to_string(),
                };
                Ok(Some(self.tree.alloc_spanned(kind, span.into())))
            }
            Token::LBrace => self.parse_object(),
            Token::LBracket => self.parse_array(),
            Token::LParen => {
                self.advance();
                let Some(expression) = self.parse_inner_expression(&[Token::RParen])? else {
                    return Ok(None);
                };
                if !self.match_token(Token::RParen) {
                    return Ok(None);
                }
                let kind = NodeKind::Parenthesized { expression };
                Ok(Some(self.spanned_from(kind, span.start)))
            }
            _ => Ok(None),
        }
    }

    fn literal(&mut self, value: LiteralValue, raw: &str, span: Range<usize>) -> NodeId {
        self.tree.alloc_spanned(
            NodeKind::Literal {
                value,
                raw: Some(raw.to_string()),
            },
            span.into(),
        )
    }

    fn parse_object(&mut self) -> ParseResult<Option<NodeId>> {
        let start = self.current_pos();
        self.advance(); // consume '{'

        let mut properties = Vec::new();
        loop {
            let Some((Ok(token), span)) = self.peek() else {
                return Ok(None);
            };

            if token == Token::RBrace {
                self.advance();
                break;
            }

            if token == Token::Ellipsis {
                self.advance();
                let Some(argument) = self.parse_inner_expression(&[Token::Comma, Token::RBrace])?
                else {
                    return Ok(None);
                };
                properties.push(self.spanned_from(NodeKind::Spread { argument }, span.start));
            } else {
                let Some(property) = self.parse_property(token, span)? else {
                    return Ok(None);
                };
                properties.push(property);
            }

            if !self.match_token(Token::Comma) && !self.check(Token::RBrace) {
                return Ok(None);
            }
        }

        Ok(Some(self.spanned_from(NodeKind::Object { properties }, start)))
    }

    fn parse_property(
        &mut self,
        token: Token<'src>,
        span: Range<usize>,
    ) -> ParseResult<Option<NodeId>> {
        let start = span.start;
        let key = match token {
            Token::Ident(name) => PropertyKey::Identifier {
                name: name.to_string(),
            },
            Token::True | Token::False | Token::Null | Token::Return => PropertyKey::Identifier {
                name: self.source[span.clone()].to_string(),
            },
            Token::Str(raw) => PropertyKey::Literal {
                value: LiteralValue::String(unquote_js_string(raw)),
                raw: Some(raw.to_string()),
            },
            Token::Number(raw) => PropertyKey::Literal {
                value: LiteralValue::Number(parse_number(raw, span.clone())?),
                raw: Some(raw.to_string()),
            },
            Token::LBracket => {
                self.advance();
                let Some(expression) = self.parse_inner_expression(&[Token::RBracket])? else {
                    return Ok(None);
                };
                if !self.check(Token::RBracket) {
                    return Ok(None);
                }
                PropertyKey::Computed { expression }
            }
            _ => return Ok(None),
        };
        self.advance(); // key token or ']'

        if self.match_token(Token::Colon) {
            let Some(value) = self.parse_inner_expression(&[Token::Comma, Token::RBrace])? else {
                return Ok(None);
            };
            let kind = NodeKind::Property {
                key,
                value,
                shorthand: false,
            };
            return Ok(Some(self.spanned_from(kind, start)));
        }

        // `{ color }` shorthand
        let shorthand = match &key {
            PropertyKey::Identifier { name } => Some(name.clone()),
            _ => None,
        };
        match shorthand {
            Some(name) if self.check(Token::Comma) || self.check(Token::RBrace) => {
                let value = self
                    .tree
                    .alloc_spanned(NodeKind::Identifier { name }, span.into());
                let kind = NodeKind::Property {
                    key,
                    value,
                    shorthand: true,
                };
                Ok(Some(self.spanned_from(kind, start)))
            }
            _ => Ok(None),
        }
    }

    fn parse_array(&mut self) -> ParseResult<Option<NodeId>> {
        let start = self.current_pos();
        self.advance(); // consume '['

        let mut elements = Vec::new();
        loop {
            let Some((Ok(token), span)) = self.peek() else {
                return Ok(None);
            };

            match token {
                Token::RBracket => {
                    self.advance();
                    break;
                }
                // holes are not supported
                Token::Comma => return Ok(None),
                Token::Ellipsis => {
                    self.advance();
                    let Some(argument) =
                        self.parse_inner_expression(&[Token::Comma, Token::RBracket])?
                    else {
                        return Ok(None);
                    };
                    elements.push(self.spanned_from(NodeKind::Spread { argument }, span.start));
                }
                _ => match self.parse_inner_expression(&[Token::Comma, Token::RBracket])? {
                    Some(element) => elements.push(element),
                    None => return Ok(None),
                },
            }

            if !self.match_token(Token::Comma) && !self.check(Token::RBracket) {
                return Ok(None);
            }
        }

        Ok(Some(self.spanned_from(NodeKind::Array { elements }, start)))
    }

    /// Keep the expression as source text up to a terminator at bracket
    /// depth zero. JSX found in element position is parsed for real.
    fn parse_opaque(&mut self, terminators: &[Token<'static>]) -> ParseResult<NodeId> {
        let Some(start) = self.peek().map(|(_, span)| span.start) else {
            return Err(ParseError::unexpected_eof(self.source.len(), "expression"));
        };

        let mut parts = Vec::new();
        let mut segment_start = start;
        let mut end = start;
        let mut depth: Vec<Token<'static>> = Vec::new();
        let mut prev: Option<Token> = None;

        while let Some((result, span)) = self.peek() {
            let token = match result {
                Ok(token) => token,
                Err(()) => {
                    // operators the lexer does not model
                    self.pos = span.end;
                    end = span.end;
                    prev = None;
                    continue;
                }
            };

            if depth.is_empty() && is_terminator(terminators, token) {
                break;
            }

            match token {
                Token::LBrace | Token::LParen | Token::LBracket => depth.push(token_static(token)),
                Token::RBrace | Token::RParen | Token::RBracket => {
                    if depth.last().copied() != token.opens() {
                        // closes something outside this expression
                        break;
                    }
                    depth.pop();
                }
                Token::LAngle if prev.map_or(true, |p| p.precedes_jsx()) && self.jsx_follows(span.end) => {
                    if segment_start < span.start {
                        parts.push(OpaquePart::Source(
                            self.source[segment_start..span.start].to_string(),
                        ));
                    }
                    let node = self.parse_jsx()?;
                    parts.push(OpaquePart::Node(node));
                    segment_start = self.pos;
                    end = self.pos;
                    prev = Some(Token::RAngle);
                    continue;
                }
                _ => {}
            }

            self.pos = span.end;
            end = span.end;
            prev = Some(token);
        }

        if end == start {
            return match self.peek() {
                Some((Ok(token), span)) => Err(ParseError::unexpected_token(
                    span,
                    "expression",
                    token.to_string(),
                )),
                Some((Err(()), span)) => Err(ParseError::lex_error(span)),
                None => Err(ParseError::unexpected_eof(self.source.len(), "expression")),
            };
        }

        if segment_start < end {
            parts.push(OpaquePart::Source(self.source[segment_start..end].to_string()));
        }

        Ok(self
            .tree
            .alloc_spanned(NodeKind::Opaque { parts }, Span::new(start, end)))
    }

    /// Whether the text after a `<` at `offset` looks like a JSX opening
    fn jsx_follows(&self, offset: usize) -> bool {
        matches!(
            next_token(self.source, offset),
            Some((Ok(Token::Ident(_) | Token::RAngle), _))
        )
    }

    // ------------------------------------------------------------------
    // JSX
    // ------------------------------------------------------------------

    /// Parse a JSX element or fragment starting at '<'
    fn parse_jsx(&mut self) -> ParseResult<NodeId> {
        let start = self.current_pos();
        if let Some(&(node, end)) = self.jsx_parsed.get(&start) {
            self.pos = end;
            return Ok(node);
        }

        let node = self.parse_jsx_at()?;
        self.jsx_parsed.insert(start, (node, self.pos));
        self.kept_nodes = self.tree.len();
        Ok(node)
    }

    fn parse_jsx_at(&mut self) -> ParseResult<NodeId> {
        let start = self.expect(Token::LAngle)?.start;

        if self.match_token(Token::RAngle) {
            let children = self.parse_jsx_children()?;
            self.expect(Token::LAngle)?;
            self.expect(Token::Slash)?;
            self.expect(Token::RAngle)?;
            return Ok(self.spanned_from(NodeKind::Fragment { children }, start));
        }

        let name = self.parse_jsx_name()?;
        let mut attributes = Vec::new();

        loop {
            let Some((result, span)) = self.peek() else {
                return Err(ParseError::unexpected_eof(self.source.len(), "'>' or '/>'"));
            };

            match result {
                Ok(Token::Slash) => {
                    self.advance();
                    self.expect(Token::RAngle)?;
                    let kind = NodeKind::Element {
                        name,
                        attributes,
                        children: Vec::new(),
                        self_closing: true,
                    };
                    return Ok(self.spanned_from(kind, start));
                }
                Ok(Token::RAngle) => {
                    self.advance();
                    break;
                }
                Ok(Token::LBrace) => attributes.push(self.parse_spread_attribute()?),
                Ok(Token::Ident(_) | Token::True | Token::False | Token::Null | Token::Return) => {
                    attributes.push(self.parse_jsx_attribute()?);
                }
                Ok(token) => {
                    return Err(ParseError::unexpected_token(
                        span,
                        "attribute, '>' or '/>'",
                        token.to_string(),
                    ));
                }
                Err(()) => return Err(ParseError::lex_error(span)),
            }
        }

        let children = self.parse_jsx_children()?;

        let close_start = self.expect(Token::LAngle)?.start;
        self.expect(Token::Slash)?;
        if self.check(Token::RAngle) {
            return Err(ParseError::MismatchedClosingTag {
                span: Span::new(close_start, self.current_pos()),
                expected: name,
                found: String::new(),
            });
        }
        let closing = self.parse_jsx_name()?;
        let close_end = self.expect(Token::RAngle)?.end;
        if closing != name {
            return Err(ParseError::MismatchedClosingTag {
                span: Span::new(close_start, close_end),
                expected: name,
                found: closing,
            });
        }

        let kind = NodeKind::Element {
            name,
            attributes,
            children,
            self_closing: false,
        };
        Ok(self.spanned_from(kind, start))
    }

    /// Element name: `div`, `Foo.Bar`, `svg:rect`
    fn parse_jsx_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_name("element name")?;

        if self.match_token(Token::Colon) {
            name.push(':');
            name.push_str(&self.expect_name("element name")?);
            return Ok(name);
        }

        while self.match_token(Token::Dot) {
            name.push('.');
            name.push_str(&self.expect_name("element name")?);
        }
        Ok(name)
    }

    fn parse_jsx_attribute(&mut self) -> ParseResult<NodeId> {
        let start = self.current_pos();
        let mut name = self.expect_name("attribute name")?;
        if self.match_token(Token::Colon) {
            name.push(':');
            name.push_str(&self.expect_name("attribute name")?);
        }

        if !self.match_token(Token::Equals) {
            return Ok(self.spanned_from(NodeKind::Attribute { name, value: None }, start));
        }

        self.skip_whitespace();
        let value = match self.source[self.pos..].chars().next() {
            Some(quote @ ('"' | '\'')) => self.parse_jsx_string(quote)?,
            Some('{') => {
                let container_start = self.pos;
                self.advance();
                if self.check(Token::RBrace) {
                    return Err(ParseError::invalid_syntax(
                        container_start..self.pos + 1,
                        "JSX attributes must only be assigned a non-empty expression",
                    ));
                }
                let expression = self.parse_expression(&[Token::RBrace])?;
                self.expect(Token::RBrace)?;
                let kind = NodeKind::ExpressionContainer {
                    expression: Some(expression),
                };
                self.spanned_from(kind, container_start)
            }
            Some('<') => self.parse_jsx()?,
            Some(_) => {
                let span = self.peek().map(|(_, span)| span).unwrap_or(self.pos..self.pos);
                return Err(ParseError::unexpected_token(
                    span.clone(),
                    "attribute value",
                    &self.source[span],
                ));
            }
            None => {
                return Err(ParseError::unexpected_eof(self.source.len(), "attribute value"));
            }
        };

        Ok(self.spanned_from(
            NodeKind::Attribute {
                name,
                value: Some(value),
            },
            start,
        ))
    }

    fn parse_spread_attribute(&mut self) -> ParseResult<NodeId> {
        let start = self.expect(Token::LBrace)?.start;
        self.expect(Token::Ellipsis)?;
        let argument = self.parse_expression(&[Token::RBrace])?;
        self.expect(Token::RBrace)?;
        Ok(self.spanned_from(NodeKind::SpreadAttribute { argument }, start))
    }

    /// Attribute string: no escapes, entities decoded
    fn parse_jsx_string(&mut self, quote: char) -> ParseResult<NodeId> {
        let start = self.pos;
        let source = self.source;
        let body = &source[start + 1..];
        let Some(len) = body.find(quote) else {
            return Err(ParseError::unexpected_eof(
                self.source.len(),
                format!("closing {}", quote),
            ));
        };

        let end = start + 1 + len + 1;
        let raw = &source[start..end];
        let value = decode_entities(&body[..len]).into_owned();
        self.pos = end;
        Ok(self.literal(LiteralValue::String(value), raw, start..end))
    }

    /// Children up to (not including) the closing tag
    fn parse_jsx_children(&mut self) -> ParseResult<Vec<NodeId>> {
        let mut children = Vec::new();

        loop {
            let rest = &self.source[self.pos..];
            let text_len = rest.find(['<', '{']).unwrap_or(rest.len());

            if text_len > 0 {
                children.push(self.parse_jsx_text(text_len)?);
            }

            match self.source[self.pos..].chars().next() {
                None => {
                    return Err(ParseError::unexpected_eof(self.source.len(), "closing tag"));
                }
                Some('{') => children.push(self.parse_jsx_container()?),
                Some(_) => {
                    if matches!(
                        next_token(self.source, self.pos + 1),
                        Some((Ok(Token::Slash), _))
                    ) {
                        return Ok(children);
                    }
                    children.push(self.parse_jsx()?);
                }
            }
        }
    }

    fn parse_jsx_text(&mut self, len: usize) -> ParseResult<NodeId> {
        let start = self.pos;
        let source = self.source;
        let raw = &source[start..start + len];

        if let Some(offset) = raw.find(['>', '}']) {
            let at = start + offset;
            let entity = if raw[offset..].starts_with('>') {
                "&gt;"
            } else {
                "&#125;"
            };
            return Err(ParseError::invalid_syntax(
                at..at + 1,
                format!("unexpected character in JSX text, did you mean `{}`?", entity),
            ));
        }

        self.pos = start + len;
        let kind = NodeKind::Text {
            value: decode_entities(raw).into_owned(),
            raw: Some(raw.to_string()),
        };
        Ok(self.tree.alloc_spanned(kind, Span::new(start, start + len)))
    }

    /// `{expr}`, `{...expr}`, `{}` or `{/* comment */}` as a child
    fn parse_jsx_container(&mut self) -> ParseResult<NodeId> {
        let start = self.expect(Token::LBrace)?.start;

        let expression = if self.check(Token::RBrace) {
            None
        } else if let Some((Ok(Token::Ellipsis), span)) = self.peek() {
            self.advance();
            let argument = self.parse_expression(&[Token::RBrace])?;
            Some(self.spanned_from(NodeKind::Spread { argument }, span.start))
        } else {
            Some(self.parse_expression(&[Token::RBrace])?)
        };

        self.expect(Token::RBrace)?;
        Ok(self.spanned_from(NodeKind::ExpressionContainer { expression }, start))
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<Lexed<'src>> {
        next_token(self.source, self.pos)
    }

    fn advance(&mut self) -> Option<Lexed<'src>> {
        let lexed = self.peek()?;
        self.pos = lexed.1.end;
        Some(lexed)
    }

    fn check(&self, token: Token) -> bool {
        matches!(self.peek(), Some((Ok(t), _)) if t == token)
    }

    fn match_token(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn at_terminator(&self, terminators: &[Token<'static>]) -> bool {
        match self.peek() {
            None => true,
            Some((Ok(token), _)) => is_terminator(terminators, token),
            Some((Err(()), _)) => false,
        }
    }

    fn expect(&mut self, token: Token) -> ParseResult<Range<usize>> {
        match self.peek() {
            Some((Ok(t), span)) if t == token => {
                self.pos = span.end;
                Ok(span)
            }
            Some((Ok(found), span)) => Err(ParseError::unexpected_token(
                span,
                token.to_string(),
                found.to_string(),
            )),
            Some((Err(()), span)) => Err(ParseError::lex_error(span)),
            None => Err(ParseError::unexpected_eof(self.source.len(), token.to_string())),
        }
    }

    /// Identifier-like name; keywords are valid JSX names
    fn expect_name(&mut self, expected: &str) -> ParseResult<String> {
        match self.peek() {
            Some((Ok(Token::Ident(name)), span)) => {
                self.pos = span.end;
                Ok(name.to_string())
            }
            Some((Ok(Token::True | Token::False | Token::Null | Token::Return), span)) => {
                self.pos = span.end;
                Ok(self.source[span].to_string())
            }
            Some((Ok(found), span)) => {
                Err(ParseError::unexpected_token(span, expected, found.to_string()))
            }
            Some((Err(()), span)) => Err(ParseError::lex_error(span)),
            None => Err(ParseError::unexpected_eof(self.source.len(), expected)),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Start of the next token (or the end of input)
    fn current_pos(&self) -> usize {
        self.peek()
            .map(|(_, span)| span.start)
            .unwrap_or(self.source.len())
    }

    fn spanned_from(&mut self, kind: NodeKind, start: usize) -> NodeId {
        let span = Span::new(start, self.pos);
        self.tree.alloc_spanned(kind, span)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            nodes: self.tree.len(),
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.tree.truncate(checkpoint.nodes.max(self.kept_nodes));
    }
}

fn is_terminator(terminators: &[Token<'static>], token: Token) -> bool {
    terminators.iter().any(|t| *t == token)
}

fn token_static(token: Token) -> Token<'static> {
    match token {
        Token::LBrace => Token::LBrace,
        Token::LParen => Token::LParen,
        _ => Token::LBracket,
    }
}

fn parse_number(raw: &str, span: Range<usize>) -> ParseResult<f64> {
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok().map(|n| n as f64),
        None => raw.parse::<f64>().ok(),
    };
    parsed.ok_or_else(|| ParseError::invalid_syntax(span, format!("invalid number {}", raw)))
}

/// Parse markup into a syntax tree
pub fn parse(source: &str) -> ParseResult<Tree> {
    Parser::new(source).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_expression(tree: &Tree) -> NodeId {
        match tree.kind(tree.root()) {
            Some(NodeKind::Program { body }) => match tree.kind(body[0]) {
                Some(NodeKind::ExpressionStatement { expression }) => *expression,
                other => panic!("expected statement, got {:?}", other),
            },
            other => panic!("expected program, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_elements() {
        let tree = parse("<div><p>Hi</p></div>").unwrap();
        let names: Vec<_> = tree
            .elements()
            .filter_map(|id| tree.element_name(id))
            .collect();
        assert_eq!(names, vec!["div", "p"]);

        let p = tree.elements().nth(1).unwrap();
        match tree.kind(p) {
            Some(NodeKind::Element { children, .. }) => {
                assert_eq!(children.len(), 1);
                assert!(matches!(
                    tree.kind(children[0]),
                    Some(NodeKind::Text { value, .. }) if value == "Hi"
                ));
            }
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_attributes() {
        let tree = parse(r#"<input type="text" disabled data-x={1} {...rest} />"#).unwrap();
        let input = single_expression(&tree);

        let Some(NodeKind::Element {
            attributes,
            self_closing,
            ..
        }) = tree.kind(input)
        else {
            panic!("expected element");
        };
        assert!(*self_closing);
        assert_eq!(attributes.len(), 4);
        assert!(matches!(
            tree.kind(attributes[1]),
            Some(NodeKind::Attribute { name, value: None }) if name == "disabled"
        ));
        assert!(matches!(
            tree.kind(attributes[3]),
            Some(NodeKind::SpreadAttribute { .. })
        ));
    }

    #[test]
    fn test_parse_style_object() {
        let tree = parse(r#"<div style={{ color: "red", padding: 4, "font-size": '1rem' }} />"#)
            .unwrap();
        let object = tree
            .descendants(tree.root())
            .find(|id| matches!(tree.kind(*id), Some(NodeKind::Object { .. })))
            .expect("object expression");

        let Some(NodeKind::Object { properties }) = tree.kind(object) else {
            unreachable!()
        };
        assert_eq!(properties.len(), 3);
        assert!(matches!(
            tree.kind(properties[2]),
            Some(NodeKind::Property { key: PropertyKey::Literal { value, .. }, .. })
                if value.as_str() == Some("font-size")
        ));
    }

    #[test]
    fn test_unsupported_expression_is_opaque() {
        let tree = parse("<div style={{ color: theme.primary, ...base }} />").unwrap();
        let opaque = tree
            .descendants(tree.root())
            .find_map(|id| match tree.kind(id) {
                Some(NodeKind::Opaque { parts }) => Some(parts.clone()),
                _ => None,
            })
            .expect("opaque value");
        assert_eq!(opaque, vec![OpaquePart::Source("theme.primary".to_string())]);
    }

    #[test]
    fn test_jsx_inside_opaque_expression_is_parsed() {
        let source = "<ul>{items.map(item => <li key={item}>{item}</li>)}</ul>";
        let tree = parse(source).unwrap();
        let names: Vec<_> = tree
            .elements()
            .filter_map(|id| tree.element_name(id))
            .collect();
        assert_eq!(names, vec!["ul", "li"]);
    }

    #[test]
    fn test_fragment_and_comment_container() {
        let tree = parse("<>{/* note */}<b /></>").unwrap();
        let fragment = single_expression(&tree);
        let Some(NodeKind::Fragment { children }) = tree.kind(fragment) else {
            panic!("expected fragment");
        };
        assert!(matches!(
            tree.kind(children[0]),
            Some(NodeKind::ExpressionContainer { expression: None })
        ));
    }

    #[test]
    fn test_text_entities_decoded() {
        let tree = parse("<p>a &amp; b</p>").unwrap();
        let text = tree
            .descendants(tree.root())
            .find(|id| tree.kind(*id).is_some_and(NodeKind::is_text))
            .unwrap();
        assert!(matches!(
            tree.kind(text),
            Some(NodeKind::Text { value, raw: Some(raw) }) if value == "a & b" && raw == "a &amp; b"
        ));
    }

    #[test]
    fn test_member_and_namespaced_names() {
        let tree = parse("<Foo.Bar><svg:rect /></Foo.Bar>").unwrap();
        let names: Vec<_> = tree
            .elements()
            .filter_map(|id| tree.element_name(id))
            .collect();
        assert_eq!(names, vec!["Foo.Bar", "svg:rect"]);
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = parse("<div><p>Hi</div>").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MismatchedClosingTag { ref expected, ref found, .. }
                if expected == "p" && found == "div"
        ));
    }

    #[test]
    fn test_unclosed_element() {
        let err = parse("<div><p>Hi</p>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_brace_in_text_is_error() {
        let err = parse("<p>a } b</p>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidSyntax { span, .. } if span.start == 5));
    }

    #[test]
    fn test_jsx_errors_not_masked_by_opaque_fallback() {
        assert!(parse("<ul>{items.map(i => <li>{i}</b>)}</ul>").is_err());
    }

    #[test]
    fn test_multiple_statements() {
        let tree = parse("const a = 1; <div />").unwrap();
        let Some(NodeKind::Program { body }) = tree.kind(tree.root()) else {
            panic!("expected program");
        };
        assert_eq!(body.len(), 2);
        assert_eq!(tree.elements().count(), 1);
    }

    #[test]
    fn test_empty_source() {
        let tree = parse("   \n").unwrap();
        assert_eq!(tree.elements().count(), 0);
    }

    #[test]
    fn test_negative_number_literal() {
        let tree = parse("<div style={{ margin: -4 }} />").unwrap();
        let literal = tree
            .descendants(tree.root())
            .find_map(|id| match tree.kind(id) {
                Some(NodeKind::Literal { value, raw }) => Some((value.clone(), raw.clone())),
                _ => None,
            })
            .unwrap();
        assert_eq!(literal, (LiteralValue::Number(-4.0), Some("-4".to_string())));
    }
    #[test]
    fn test_comments_inside_tags() {
        let tree = parse(r#"<div /* note */ id="a" // trailing
            />"#)
        .unwrap();
        let div = tree.elements().next().unwrap();
        let Some(NodeKind::Element { attributes, .. }) = tree.kind(div) else {
            panic!("expected element");
        };
        assert_eq!(attributes.len(), 1);
    }

    #[test]
    fn test_comment_in_style_object_keeps_object_structured() {
        let tree = parse("<div style={{ /* brand */ color: 'red' }} />").unwrap();
        assert!(tree
            .descendants(tree.root())
            .any(|id| matches!(tree.kind(id), Some(NodeKind::Object { properties }) if properties.len() == 1)));
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        assert!(matches!(
            parse("<div /* id='a' />"),
            Err(ParseError::LexError { .. })
        ));
    }

    #[test]
    fn test_deeply_nested_jsx_in_opaque_expressions() {
        let depth = 30;
        let source = format!(
            "<r>{}x{}</r>",
            "{(<a>".repeat(depth),
            "</a>) && y}".repeat(depth)
        );

        let started = std::time::Instant::now();
        let tree = parse(&source).unwrap();
        assert!(
            started.elapsed() < std::time::Duration::from_secs(2),
            "took {:?}",
            started.elapsed()
        );

        assert_eq!(tree.elements().count(), depth + 1);
        assert_eq!(crate::tree_to_code(&tree), source);
    }
}
