//! Inline style declarations stored as `style={{ ... }}` object literals
//!
//! Reads only understand properties with a plain name key and a literal
//! value. Writes keep every property they do not understand (spreads,
//! computed keys, non-literal values) in its original position.

use crate::attributes::{attribute_value, find_attribute};
use indexmap::IndexMap;
use jsxed_parser::{LiteralValue, NodeId, NodeKind, PropertyKey, Tree};

/// Attribute holding inline styles
pub const STYLE_ATTRIBUTE: &str = "style";

/// Style declarations in declaration order
pub type StyleMap = IndexMap<String, String>;

/// Make sure `element` has a `style={{...}}` attribute and return the
/// object expression node. Idempotent.
///
/// A style expression that is not an object literal is kept as a spread:
/// `style={base}` becomes `style={{ ...base }}`.
pub fn ensure_style_attribute(tree: &mut Tree, element: NodeId) -> Option<NodeId> {
    if !tree.is_element(element) {
        return None;
    }

    let Some(attribute) = find_attribute(tree, element, STYLE_ATTRIBUTE) else {
        let object = tree.alloc(NodeKind::Object {
            properties: Vec::new(),
        });
        let container = tree.alloc(NodeKind::ExpressionContainer {
            expression: Some(object),
        });
        let attribute = tree.alloc(NodeKind::Attribute {
            name: STYLE_ATTRIBUTE.to_string(),
            value: Some(container),
        });
        if let Some(NodeKind::Element { attributes, .. }) = tree.kind_mut(element) {
            attributes.push(attribute);
        }
        return Some(object);
    };

    let container = attribute_value(tree, attribute);
    let expression = match container.and_then(|id| tree.kind(id)) {
        Some(NodeKind::ExpressionContainer { expression }) => *expression,
        _ => None,
    };

    match (container, expression) {
        (_, Some(expression)) if is_object(tree, expression) => Some(expression),
        (Some(container), Some(expression)) => {
            let spread = tree.alloc(NodeKind::Spread {
                argument: expression,
            });
            let object = tree.alloc(NodeKind::Object {
                properties: vec![spread],
            });
            if let Some(NodeKind::ExpressionContainer { expression }) = tree.kind_mut(container) {
                *expression = Some(object);
            }
            Some(object)
        }
        // valueless or string-valued style
        _ => {
            let object = tree.alloc(NodeKind::Object {
                properties: Vec::new(),
            });
            let container = tree.alloc(NodeKind::ExpressionContainer {
                expression: Some(object),
            });
            if let Some(NodeKind::Attribute { value, .. }) = tree.kind_mut(attribute) {
                *value = Some(container);
            }
            Some(object)
        }
    }
}

/// Object expression of the style attribute, if it is one
fn style_object(tree: &Tree, element: NodeId) -> Option<NodeId> {
    let attribute = find_attribute(tree, element, STYLE_ATTRIBUTE)?;
    let container = attribute_value(tree, attribute)?;
    match tree.kind(container)? {
        NodeKind::ExpressionContainer {
            expression: Some(expression),
        } if is_object(tree, *expression) => Some(*expression),
        _ => None,
    }
}

fn is_object(tree: &Tree, node: NodeId) -> bool {
    matches!(tree.kind(node), Some(NodeKind::Object { .. }))
}

fn properties(tree: &Tree, object: NodeId) -> Vec<NodeId> {
    match tree.kind(object) {
        Some(NodeKind::Object { properties }) => properties.clone(),
        _ => Vec::new(),
    }
}

/// Name of a property key written as an identifier or string literal
fn key_name(key: &PropertyKey) -> Option<&str> {
    match key {
        PropertyKey::Identifier { name } => Some(name.as_str()),
        PropertyKey::Literal {
            value: LiteralValue::String(name),
            ..
        } => Some(name.as_str()),
        _ => None,
    }
}

/// `(name, value)` of a property this module understands
fn declaration(tree: &Tree, property: NodeId) -> Option<(String, String)> {
    let Some(NodeKind::Property {
        key,
        value,
        shorthand: false,
    }) = tree.kind(property)
    else {
        return None;
    };
    let name = key_name(key)?;
    match tree.kind(*value)? {
        NodeKind::Literal { value, .. } => Some((name.to_string(), style_string(value))),
        _ => None,
    }
}

/// Name of any keyed property, understood or not
fn property_name(tree: &Tree, property: NodeId) -> Option<String> {
    match tree.kind(property) {
        Some(NodeKind::Property { key, .. }) => key_name(key).map(str::to_string),
        _ => None,
    }
}

fn style_string(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Understood style declarations of an element. Anything else reads as
/// absent.
pub fn read_style_object(tree: &Tree, element: NodeId) -> StyleMap {
    let Some(object) = style_object(tree, element) else {
        return StyleMap::new();
    };

    properties(tree, object)
        .into_iter()
        .filter_map(|property| declaration(tree, property))
        .collect()
}

/// Write `styles` to the element's style object
///
/// Understood declarations missing from `styles` are removed, present ones
/// are updated in place, new ones are appended in map order. Properties
/// that are not understood are kept unless `styles` sets the same name.
pub fn write_style_object(tree: &mut Tree, element: NodeId, styles: &StyleMap) {
    let Some(object) = ensure_style_attribute(tree, element) else {
        return;
    };

    let mut remaining = styles.clone();
    let mut next = Vec::new();

    for property in properties(tree, object) {
        match declaration(tree, property) {
            Some((name, current)) => {
                let Some(value) = remaining.shift_remove(&name) else {
                    continue;
                };
                if value != current {
                    let literal = string_literal(tree, value);
                    if let Some(NodeKind::Property { value, .. }) = tree.kind_mut(property) {
                        *value = literal;
                    }
                }
                next.push(property);
            }
            None => match property_name(tree, property)
                .and_then(|name| remaining.shift_remove_entry(&name))
            {
                Some((name, value)) => next.push(new_property(tree, name, value)),
                None => next.push(property),
            },
        }
    }

    for (name, value) in remaining {
        next.push(new_property(tree, name, value));
    }

    if let Some(NodeKind::Object { properties }) = tree.kind_mut(object) {
        *properties = next;
    }
}

fn string_literal(tree: &mut Tree, value: String) -> NodeId {
    tree.alloc(NodeKind::Literal {
        value: LiteralValue::String(value),
        raw: None,
    })
}

fn new_property(tree: &mut Tree, name: String, value: String) -> NodeId {
    let value = string_literal(tree, value);
    let key = if is_identifier(&name) {
        PropertyKey::Identifier { name }
    } else {
        PropertyKey::Literal {
            value: LiteralValue::String(name),
            raw: None,
        }
    };
    tree.alloc(NodeKind::Property {
        key,
        value,
        shorthand: false,
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Value of one declaration; `None` for non-elements and absent keys
pub fn get_style_value(tree: &Tree, node: NodeId, key: &str) -> Option<String> {
    if !tree.is_element(node) {
        return None;
    }
    read_style_object(tree, node).shift_remove(key)
}

/// Upsert one declaration, or remove it when `value` is `None` or empty
pub fn set_style_value(tree: &mut Tree, node: NodeId, key: &str, value: Option<&str>) {
    if !tree.is_element(node) {
        return;
    }

    let mut styles = read_style_object(tree, node);
    match value {
        Some(value) if !value.is_empty() => {
            styles.insert(key.to_string(), value.to_string());
        }
        _ => {
            styles.shift_remove(key);
        }
    }
    write_style_object(tree, node, &styles);
}

/// Snapshot of the understood declarations, in order
pub fn get_style_entries(tree: &Tree, node: NodeId) -> Vec<(String, String)> {
    if !tree.is_element(node) {
        return Vec::new();
    }
    read_style_object(tree, node).into_iter().collect()
}
