//! Literal-valued attribute access on elements

use jsxed_parser::{LiteralValue, NodeId, NodeKind, Tree};

/// Attribute node named `name` on `element`
pub fn find_attribute(tree: &Tree, element: NodeId, name: &str) -> Option<NodeId> {
    let Some(NodeKind::Element { attributes, .. }) = tree.kind(element) else {
        return None;
    };
    attributes.iter().copied().find(|attribute| {
        matches!(tree.kind(*attribute), Some(NodeKind::Attribute { name: n, .. }) if n == name)
    })
}

/// Value node of an attribute (`None` for a valueless attribute)
pub fn attribute_value(tree: &Tree, attribute: NodeId) -> Option<NodeId> {
    match tree.kind(attribute) {
        Some(NodeKind::Attribute { value, .. }) => *value,
        _ => None,
    }
}

/// Literal value of an attribute. `name={0}` is unwrapped, a valueless
/// attribute reads as `true`, any other expression reads as absent.
pub fn get_attribute(tree: &Tree, node: NodeId, name: &str) -> Option<LiteralValue> {
    let attribute = find_attribute(tree, node, name)?;
    let Some(value) = attribute_value(tree, attribute) else {
        return Some(LiteralValue::Boolean(true));
    };

    match tree.kind(value)? {
        NodeKind::Literal { value, .. } => Some(value.clone()),
        NodeKind::ExpressionContainer {
            expression: Some(expression),
        } => match tree.kind(*expression)? {
            NodeKind::Literal { value, .. } => Some(value.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Set an attribute to a literal, updating the first attribute with that
/// name or appending a new one
pub fn set_attribute(tree: &mut Tree, node: NodeId, name: &str, value: LiteralValue) {
    if !tree.is_element(node) {
        return;
    }

    let literal = tree.alloc(NodeKind::Literal { value, raw: None });
    match find_attribute(tree, node, name) {
        Some(attribute) => {
            if let Some(NodeKind::Attribute { value, .. }) = tree.kind_mut(attribute) {
                *value = Some(literal);
            }
        }
        None => {
            let attribute = tree.alloc(NodeKind::Attribute {
                name: name.to_string(),
                value: Some(literal),
            });
            if let Some(NodeKind::Element { attributes, .. }) = tree.kind_mut(node) {
                attributes.push(attribute);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsxed_parser::{parse, tree_to_code};

    #[test]
    fn test_get_attribute_forms() {
        let tree = parse(r#"<input type="text" tabIndex={2} disabled value={name} />"#).unwrap();
        let input = tree.elements().next().unwrap();

        assert_eq!(get_attribute(&tree, input, "type"), Some(LiteralValue::from("text")));
        assert_eq!(get_attribute(&tree, input, "tabIndex"), Some(LiteralValue::Number(2.0)));
        assert_eq!(get_attribute(&tree, input, "disabled"), Some(LiteralValue::Boolean(true)));
        assert_eq!(get_attribute(&tree, input, "value"), None);
        assert_eq!(get_attribute(&tree, input, "missing"), None);
    }

    #[test]
    fn test_set_attribute_updates_then_appends() {
        let mut tree = parse(r#"<a href="/old">x</a>"#).unwrap();
        let a = tree.elements().next().unwrap();

        set_attribute(&mut tree, a, "href", LiteralValue::from("/new"));
        set_attribute(&mut tree, a, "tabIndex", LiteralValue::from(0u32));
        set_attribute(&mut tree, a, "hidden", LiteralValue::Null);

        assert_eq!(
            tree_to_code(&tree),
            r#"<a href="/new" tabIndex={0} hidden={null}>x</a>"#
        );
    }

    #[test]
    fn test_set_attribute_ignores_non_elements() {
        let mut tree = parse("<p>Hi</p>").unwrap();
        let root = tree.root();
        set_attribute(&mut tree, root, "id", LiteralValue::from("x"));
        assert_eq!(tree_to_code(&tree), "<p>Hi</p>");
    }
}
