use crate::ast::*;
use crate::entities::{escape_jsx_attribute, escape_jsx_text, quote_js_string};

/// Serializer converts a syntax tree back to source code
///
/// Output is compact: nodes read from source keep their raw spelling,
/// nodes created by edits are escaped. Whitespace between tokens inside
/// structured expressions is normalised.
pub struct Serializer<'t> {
    tree: &'t Tree,
}

impl<'t> Serializer<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        Self { tree }
    }

    /// Serialize the whole program, one `;`-terminated statement per line
    pub fn serialize(&self) -> String {
        let mut output = String::new();
        self.serialize_node(self.tree.root(), &mut output);
        output
    }

    /// Serialize a single node and its descendants
    pub fn serialize_node(&self, id: NodeId, output: &mut String) {
        let Some(kind) = self.tree.kind(id) else {
            return;
        };

        match kind {
            NodeKind::Program { body } => {
                for statement in body {
                    self.serialize_node(*statement, output);
                    output.push_str(";\n");
                }
            }
            NodeKind::ExpressionStatement { expression } => {
                self.serialize_node(*expression, output);
            }
            NodeKind::Element {
                name,
                attributes,
                children,
                self_closing,
            } => {
                output.push('<');
                output.push_str(name);
                for attribute in attributes {
                    output.push(' ');
                    self.serialize_node(*attribute, output);
                }

                if children.is_empty() && *self_closing {
                    output.push_str(" />");
                    return;
                }

                output.push('>');
                for child in children {
                    self.serialize_node(*child, output);
                }
                output.push_str("</");
                output.push_str(name);
                output.push('>');
            }
            NodeKind::Fragment { children } => {
                output.push_str("<>");
                for child in children {
                    self.serialize_node(*child, output);
                }
                output.push_str("</>");
            }
            NodeKind::Text { value, raw } => match raw {
                Some(raw) => output.push_str(raw),
                None => output.push_str(&escape_jsx_text(value)),
            },
            NodeKind::ExpressionContainer { expression } => {
                output.push('{');
                if let Some(expression) = expression {
                    self.serialize_node(*expression, output);
                }
                output.push('}');
            }
            NodeKind::Attribute { name, value } => {
                output.push_str(name);
                if let Some(value) = value {
                    output.push('=');
                    self.serialize_attribute_value(*value, output);
                }
            }
            NodeKind::SpreadAttribute { argument } => {
                output.push_str("{...");
                self.serialize_node(*argument, output);
                output.push('}');
            }
            NodeKind::Literal { value, raw } => match raw {
                Some(raw) => output.push_str(raw),
                None => output.push_str(&literal_source(value)),
            },
            NodeKind::Identifier { name } => output.push_str(name),
            NodeKind::Object { properties } => {
                if properties.is_empty() {
                    output.push_str("{}");
                    return;
                }
                output.push_str("{ ");
                self.serialize_list(properties, output);
                output.push_str(" }");
            }
            NodeKind::Property {
                key,
                value,
                shorthand,
            } => {
                if *shorthand {
                    self.serialize_node(*value, output);
                    return;
                }
                self.serialize_key(key, output);
                output.push_str(": ");
                self.serialize_node(*value, output);
            }
            NodeKind::Spread { argument } => {
                output.push_str("...");
                self.serialize_node(*argument, output);
            }
            NodeKind::Array { elements } => {
                output.push('[');
                self.serialize_list(elements, output);
                output.push(']');
            }
            NodeKind::Parenthesized { expression } => {
                output.push('(');
                self.serialize_node(*expression, output);
                output.push(')');
            }
            NodeKind::Opaque { parts } => {
                for part in parts {
                    match part {
                        OpaquePart::Source(text) => output.push_str(text),
                        OpaquePart::Node(node) => self.serialize_node(*node, output),
                    }
                }
            }
        }
    }

    fn serialize_list(&self, ids: &[NodeId], output: &mut String) {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                output.push_str(", ");
            }
            self.serialize_node(*id, output);
        }
    }

    fn serialize_key(&self, key: &PropertyKey, output: &mut String) {
        match key {
            PropertyKey::Identifier { name } => output.push_str(name),
            PropertyKey::Literal { value, raw } => match raw {
                Some(raw) => output.push_str(raw),
                None => output.push_str(&literal_source(value)),
            },
            PropertyKey::Computed { expression } => {
                output.push('[');
                self.serialize_node(*expression, output);
                output.push(']');
            }
        }
    }

    /// Attribute values: strings are written quoted, any other literal is
    /// wrapped in an expression container
    fn serialize_attribute_value(&self, id: NodeId, output: &mut String) {
        match self.tree.kind(id) {
            Some(NodeKind::Literal {
                value: LiteralValue::String(value),
                raw,
            }) => match raw {
                Some(raw) if raw.starts_with(['"', '\'']) => output.push_str(raw),
                _ => {
                    output.push('"');
                    output.push_str(&escape_jsx_attribute(value));
                    output.push('"');
                }
            },
            Some(NodeKind::Literal { .. }) => {
                output.push('{');
                self.serialize_node(id, output);
                output.push('}');
            }
            _ => self.serialize_node(id, output),
        }
    }
}

/// Source spelling of a literal created without raw text
fn literal_source(value: &LiteralValue) -> String {
    match value {
        LiteralValue::String(s) => quote_js_string(s),
        other => other.to_string(),
    }
}

/// Generate source code for a tree
///
/// A single trailing `;` (and whitespace after it) is dropped, so a lone
/// JSX expression comes back without a statement terminator.
pub fn tree_to_code(tree: &Tree) -> String {
    let code = Serializer::new(tree).serialize();
    match code.trim_end().strip_suffix(';') {
        Some(stripped) => stripped.to_string(),
        None => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn round_trip(source: &str) -> String {
        tree_to_code(&parse(source).unwrap())
    }

    #[test]
    fn test_element_round_trip() {
        assert_eq!(
            round_trip(r#"<div className="card"><h1>Title</h1><p>Body &amp; more</p></div>"#),
            r#"<div className="card"><h1>Title</h1><p>Body &amp; more</p></div>"#
        );
    }

    #[test]
    fn test_self_closing_kept_only_when_empty() {
        assert_eq!(round_trip("<img src='a.png'/>"), "<img src='a.png' />");
        assert_eq!(round_trip("<div></div>"), "<div></div>");
    }

    #[test]
    fn test_style_object_formatting() {
        assert_eq!(
            round_trip("<div style={{color:'red',padding:4}} />"),
            "<div style={{ color: 'red', padding: 4 }} />"
        );
        assert_eq!(round_trip("<div style={{}} />"), "<div style={{}} />");
    }

    #[test]
    fn test_opaque_expression_kept_verbatim() {
        let source = "<ul>{items.map(item => <li key={item}>{item}</li>)}</ul>";
        assert_eq!(round_trip(source), source);
    }

    #[test]
    fn test_trailing_semicolon_stripped_once() {
        assert_eq!(round_trip("<p>Hi</p>;"), "<p>Hi</p>");
        assert_eq!(round_trip("let a = 1; <p />"), "let a = 1;\n<p />");
    }

    #[test]
    fn test_created_nodes_are_escaped() {
        let mut tree = parse("<p>x</p>").unwrap();
        let p = tree.elements().next().unwrap();
        let text = tree.alloc(NodeKind::Text {
            value: "a < b {c}".to_string(),
            raw: None,
        });
        let title = tree.alloc(NodeKind::Literal {
            value: LiteralValue::from("say \"hi\""),
            raw: None,
        });
        let attribute = tree.alloc(NodeKind::Attribute {
            name: "title".to_string(),
            value: Some(title),
        });
        let count = tree.alloc(NodeKind::Literal {
            value: LiteralValue::from(3u32),
            raw: None,
        });
        let data = tree.alloc(NodeKind::Attribute {
            name: "data-n".to_string(),
            value: Some(count),
        });
        if let Some(NodeKind::Element {
            attributes,
            children,
            ..
        }) = tree.kind_mut(p)
        {
            *children = vec![text];
            attributes.push(attribute);
            attributes.push(data);
        }

        assert_eq!(
            tree_to_code(&tree),
            r#"<p title="say &quot;hi&quot;" data-n={3}>a &lt; b &#123;c&#125;</p>"#
        );
    }
}
