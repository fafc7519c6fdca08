//! Text content of elements and text nodes

use jsxed_parser::{NodeId, NodeKind, Tree};

/// Text nodes and elements whose children are all text are editable.
/// An element with no children counts as editable.
pub fn can_edit_text(tree: &Tree, node: NodeId) -> bool {
    match tree.kind(node) {
        Some(NodeKind::Text { .. }) => true,
        Some(NodeKind::Element { children, .. }) => children
            .iter()
            .all(|child| tree.kind(*child).is_some_and(NodeKind::is_text)),
        _ => false,
    }
}

/// Value of a text node, or the concatenated text children of an element
pub fn get_text(tree: &Tree, node: NodeId) -> String {
    match tree.kind(node) {
        Some(NodeKind::Text { value, .. }) => value.clone(),
        Some(NodeKind::Element { children, .. }) => children
            .iter()
            .filter_map(|child| match tree.kind(*child) {
                Some(NodeKind::Text { value, .. }) => Some(value.as_str()),
                _ => None,
            })
            .collect(),
        _ => String::new(),
    }
}

/// Replace the value of a text node, or all children of an element with a
/// single text child. Other nodes are left alone.
pub fn set_text(tree: &mut Tree, node: NodeId, text: &str) {
    match tree.kind(node) {
        Some(NodeKind::Text { .. }) => {
            if let Some(NodeKind::Text { value, raw }) = tree.kind_mut(node) {
                *value = text.to_string();
                *raw = None;
            }
        }
        Some(NodeKind::Element { .. }) => {
            let child = tree.alloc(NodeKind::Text {
                value: text.to_string(),
                raw: None,
            });
            if let Some(NodeKind::Element { children, .. }) = tree.kind_mut(node) {
                *children = vec![child];
            }
        }
        _ => {}
    }
}
