//! # Mutation requests
//!
//! Serializable edits targeting one node of the current generation. A
//! mutation is validated against the node before anything is written, so
//! a rejected request leaves the tree untouched.

use crate::attributes::set_attribute;
use crate::style::set_style_value;
use crate::text::{can_edit_text, set_text};
use jsxed_parser::{LiteralValue, NodeId, Tree};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Replace the text of a text node or text-only element
    SetText { text: String },

    /// Set an inline style declaration; `None` or empty removes it
    SetStyle {
        property: String,
        value: Option<String>,
    },

    /// Set a literal-valued attribute
    SetAttribute { name: String, value: LiteralValue },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node is not an element")]
    NotAnElement,

    #[error("Node text is not editable")]
    TextNotEditable,
}

impl Mutation {
    /// Whether applying this request would change nothing
    ///
    /// An empty style property name comes from submitting the panel's
    /// add-style form with no key.
    pub fn is_noop(&self) -> bool {
        matches!(self, Mutation::SetStyle { property, .. } if property.is_empty())
    }

    /// Check the request against `node` without writing
    pub fn validate(&self, tree: &Tree, node: NodeId) -> Result<(), MutationError> {
        if tree.get(node).is_none() {
            return Err(MutationError::NodeNotFound(node));
        }

        match self {
            Mutation::SetText { .. } if !can_edit_text(tree, node) => {
                Err(MutationError::TextNotEditable)
            }
            Mutation::SetStyle { .. } | Mutation::SetAttribute { .. }
                if !tree.is_element(node) =>
            {
                Err(MutationError::NotAnElement)
            }
            _ => Ok(()),
        }
    }

    /// Apply mutation to the tree with validation
    pub fn apply(&self, tree: &mut Tree, node: NodeId) -> Result<(), MutationError> {
        self.validate(tree, node)?;
        if self.is_noop() {
            return Ok(());
        }

        match self {
            Mutation::SetText { text } => set_text(tree, node, text),
            Mutation::SetStyle { property, value } => {
                set_style_value(tree, node, property, value.as_deref())
            }
            Mutation::SetAttribute { name, value } => {
                set_attribute(tree, node, name, value.clone())
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsxed_parser::{parse, tree_to_code};

    #[test]
    fn test_apply_set_style() {
        let mut tree = parse("<div>x</div>").unwrap();
        let div = tree.elements().next().unwrap();

        let mutation = Mutation::SetStyle {
            property: "color".to_string(),
            value: Some("red".to_string()),
        };
        mutation.apply(&mut tree, div).unwrap();
        assert_eq!(tree_to_code(&tree), r#"<div style={{ color: "red" }}>x</div>"#);
    }

    #[test]
    fn test_text_rejected_on_mixed_children() {
        let mut tree = parse("<div>a<b>c</b></div>").unwrap();
        let div = tree.elements().next().unwrap();

        let result = Mutation::SetText {
            text: "x".to_string(),
        }
        .apply(&mut tree, div);
        assert_eq!(result, Err(MutationError::TextNotEditable));
        assert_eq!(tree_to_code(&tree), "<div>a<b>c</b></div>");
    }

    #[test]
    fn test_empty_style_property_is_noop() {
        let mut tree = parse("<div />").unwrap();
        let div = tree.elements().next().unwrap();
        let mutation = Mutation::SetStyle {
            property: String::new(),
            value: Some("1px".to_string()),
        };

        assert!(mutation.is_noop());
        mutation.apply(&mut tree, div).unwrap();
        assert_eq!(tree_to_code(&tree), "<div />");
    }

    #[test]
    fn test_mutation_json_shape() {
        let mutation: Mutation =
            serde_json::from_str(r#"{"SetAttribute":{"name":"tabIndex","value":2}}"#).unwrap();
        assert_eq!(
            mutation,
            Mutation::SetAttribute {
                name: "tabIndex".to_string(),
                value: LiteralValue::Number(2.0),
            }
        );
    }
}
