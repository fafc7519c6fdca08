use jsxed_parser::{format_error, parse, ParseError};

#[test]
fn test_unclosed_tag_reports_eof() {
    let result = parse("<div><span>text</span>");
    assert!(matches!(result, Err(ParseError::UnexpectedEof { .. })));
}

#[test]
fn test_mismatched_tag_has_span() {
    let source = "<section>\n  <p>Hi</span>\n</section>";
    let err = parse(source).unwrap_err();

    match &err {
        ParseError::MismatchedClosingTag {
            expected, found, ..
        } => {
            assert_eq!(expected, "p");
            assert_eq!(found, "span");
        }
        other => panic!("expected mismatched tag, got {:?}", other),
    }
    assert_eq!(err.line_col(source).0, 2);
}

#[test]
fn test_greater_than_in_text() {
    let err = parse("<p>a > b</p>").unwrap_err();
    assert!(matches!(err, ParseError::InvalidSyntax { .. }));
}

#[test]
fn test_unterminated_attribute_string() {
    assert!(parse("<div title=\"oops></div>").is_err());
}

#[test]
fn test_empty_attribute_expression() {
    assert!(parse("<div title={} />").is_err());
}

#[test]
fn test_stray_closing_paren() {
    assert!(parse("<div />)").is_err());
}

#[test]
fn test_formatted_error_names_file() {
    let source = "<div>";
    let err = parse(source).unwrap_err();
    let rendered = format_error(source, "Card.jsx", &err);
    assert!(rendered.contains("Card.jsx"));
}
