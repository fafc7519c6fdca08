//! Assigns per-generation identifiers to every element of parsed markup
//!
//! Each element gets a marker attribute holding its pre-order index, so an
//! element rendered from the tagged markup can be traced back to its node.
//! An existing marker is overwritten in place, a new one is appended.

use jsxed_parser::{parse, tree_to_code, LiteralValue, NodeId, NodeKind, ParseResult, Tree};
use serde::Serialize;

/// Reserved attribute carrying an element's identifier
pub const EDIT_MARKER: &str = "data-__interactive-editor-edit-id";

/// Identifier to node lookup for one generation
///
/// Identifiers are dense: identifier `n` is the `n`th element in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdentifierMap {
    nodes: Vec<NodeId>,
}

impl IdentifierMap {
    pub fn get(&self, id: u32) -> Option<NodeId> {
        self.nodes.get(id as usize).copied()
    }

    /// Resolve the value of a marker attribute read from a rendered element
    pub fn resolve_marker(&self, marker: &str) -> Option<NodeId> {
        parse_marker(marker).and_then(|id| self.get(id))
    }

    /// Identifier assigned to `node`, if it is mapped
    pub fn identifier_of(&self, node: NodeId) -> Option<u32> {
        self.nodes
            .iter()
            .position(|n| *n == node)
            .map(|index| index as u32)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, NodeId)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (index as u32, *node))
    }
}

/// Parse a marker attribute value as an identifier
pub fn parse_marker(marker: &str) -> Option<u32> {
    marker.trim().parse().ok()
}

/// Result of tagging markup
#[derive(Debug, Clone)]
pub struct Tagged {
    /// Markup with a marker on every element, ready to render
    pub tagged_markup: String,
    pub mapping: IdentifierMap,
    /// Tree the mapping points into
    pub tree: Tree,
}

/// Parse markup, number its elements and return the tagged markup together
/// with the identifier mapping into the tagged tree
pub fn tag_and_map(markup: &str) -> ParseResult<Tagged> {
    let mut tree = parse(markup)?;
    let elements: Vec<NodeId> = tree.elements().collect();
    let mut nodes = Vec::with_capacity(elements.len());

    for (index, element) in elements.into_iter().enumerate() {
        let id = index as u32;
        let position = remove_markers(&mut tree, element);

        let value = tree.alloc(NodeKind::Literal {
            value: LiteralValue::from(id),
            raw: None,
        });
        let marker = tree.alloc(NodeKind::Attribute {
            name: EDIT_MARKER.to_string(),
            value: Some(value),
        });
        if let Some(NodeKind::Element { attributes, .. }) = tree.kind_mut(element) {
            match position {
                Some(position) => attributes.insert(position, marker),
                None => attributes.push(marker),
            }
        }
        nodes.push(element);
    }

    Ok(Tagged {
        tagged_markup: tree_to_code(&tree),
        mapping: IdentifierMap { nodes },
        tree,
    })
}

/// Markup with every marker attribute removed
pub fn strip_markers(markup: &str) -> ParseResult<String> {
    let mut tree = parse(markup)?;
    let elements: Vec<NodeId> = tree.elements().collect();
    for element in elements {
        remove_markers(&mut tree, element);
    }
    Ok(tree_to_code(&tree))
}

/// Drop marker attributes from an element, returning where the first one
/// was so a new marker can take its place
fn remove_markers(tree: &mut Tree, element: NodeId) -> Option<usize> {
    let Some(NodeKind::Element { attributes, .. }) = tree.kind(element) else {
        return None;
    };
    let position = attributes
        .iter()
        .position(|attribute| is_marker(tree, *attribute));
    let kept: Vec<NodeId> = attributes
        .iter()
        .copied()
        .filter(|attribute| !is_marker(tree, *attribute))
        .collect();

    if let Some(NodeKind::Element { attributes, .. }) = tree.kind_mut(element) {
        *attributes = kept;
    }
    position
}

fn is_marker(tree: &Tree, attribute: NodeId) -> bool {
    matches!(tree.kind(attribute), Some(NodeKind::Attribute { name, .. }) if name == EDIT_MARKER)
}
