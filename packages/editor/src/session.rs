//! # Edit Session Management
//!
//! An EditSession owns the markup being edited and the current generation
//! derived from it (tagged markup, identifier mapping and tree).
//!
//! Mutations edit the generation's tree in place and commit regenerated
//! markup. Identifiers stay stable across a burst of mutations and are
//! renumbered only when the committed markup is tagged again by
//! [`EditSession::rerender`] or replaced by [`EditSession::replace_text`].

use crate::errors::EditorError;
use crate::mutations::Mutation;
use crate::style::{get_style_entries, get_style_value};
use crate::tagger::{parse_marker, tag_and_map, IdentifierMap, Tagged};
use crate::text::{can_edit_text, get_text};
use jsxed_parser::{tree_to_code, LiteralValue, NodeId, Tree};
use serde::Serialize;

/// Default shown by color inputs when a color is not set
pub const DEFAULT_COLOR: &str = "#000000";

/// One parse cycle of the session's markup
#[derive(Debug, Clone)]
pub struct Generation {
    /// Increases by one every time markup is tagged
    pub number: u64,
    /// Committed markup, updated by every mutation
    pub markup_text: String,
    /// Markup as tagged when this generation started
    pub tagged_markup: String,
    pub mapping: IdentifierMap,
    pub tree: Tree,
}

impl Generation {
    fn new(number: u64, markup_text: String, tagged: Tagged) -> Self {
        Self {
            number,
            markup_text,
            tagged_markup: tagged.tagged_markup,
            mapping: tagged.mapping,
            tree: tagged.tree,
        }
    }
}

/// Editable view of the picked node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPanel {
    pub marker: u32,
    pub tag_name: Option<String>,
    pub can_edit_text: bool,
    pub text: String,
    pub background_color: String,
    pub color: String,
    pub padding: String,
    pub margin: String,
    pub other_styles: Vec<StyleEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleEntry {
    pub key: String,
    pub value: String,
}

type ChangeListener = Box<dyn FnMut(&str)>;

/// Single-user editing session over one piece of markup
pub struct EditSession {
    generation: Generation,

    /// Identifier of the picked element, resolved against the current
    /// mapping on every use
    picked: Option<u32>,

    on_change: Option<ChangeListener>,
}

impl EditSession {
    /// Tag `initial_text` as generation 0
    pub fn load(initial_text: &str) -> Result<Self, EditorError> {
        let tagged = tag_and_map(initial_text)?;
        tracing::debug!(elements = tagged.mapping.len(), "loaded markup");

        Ok(Self {
            generation: Generation::new(0, initial_text.to_string(), tagged),
            picked: None,
            on_change: None,
        })
    }

    /// Register the callback invoked with the new markup after every commit
    pub fn on_change(&mut self, listener: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn markup_text(&self) -> &str {
        &self.generation.markup_text
    }

    pub fn tagged_markup(&self) -> &str {
        &self.generation.tagged_markup
    }

    pub fn mapping(&self) -> &IdentifierMap {
        &self.generation.mapping
    }

    pub fn tree(&self) -> &Tree {
        &self.generation.tree
    }

    /// Start a new generation from markup supplied from outside
    ///
    /// On a parse error the current generation is kept and the error is
    /// returned. The picked identifier is kept and re-resolved against the
    /// new mapping.
    pub fn replace_text(&mut self, text: &str) -> Result<(), EditorError> {
        let tagged = tag_and_map(text).map_err(|err| {
            tracing::warn!(error = %err, "rejected replacement markup");
            err
        })?;
        self.start_generation(text.to_string(), tagged);
        Ok(())
    }

    /// Tag the committed markup again for the next render pass and return
    /// the freshly tagged markup
    pub fn rerender(&mut self) -> Result<&str, EditorError> {
        let text = self.generation.markup_text.clone();
        let tagged = tag_and_map(&text)?;
        self.start_generation(text, tagged);
        Ok(self.generation.tagged_markup.as_str())
    }

    fn start_generation(&mut self, markup_text: String, tagged: Tagged) {
        let number = self.generation.number + 1;
        tracing::debug!(
            generation = number,
            elements = tagged.mapping.len(),
            "new generation"
        );
        self.generation = Generation::new(number, markup_text, tagged);
    }

    /// Record a pick from the value of the rendered element's marker
    /// attribute. Returns the resolved node, `None` when the marker is not
    /// in the current mapping.
    pub fn pick(&mut self, marker: &str) -> Option<NodeId> {
        self.picked = parse_marker(marker);
        let node = self.picked_node();
        tracing::debug!(marker, resolved = node.is_some(), "picked element");
        node
    }

    pub fn clear_pick(&mut self) {
        self.picked = None;
    }

    /// Node of the picked element in the current generation
    pub fn picked_node(&self) -> Option<NodeId> {
        self.picked.and_then(|id| self.generation.mapping.get(id))
    }

    /// Panel contents for the picked node, `None` when nothing resolves
    pub fn panel(&self) -> Option<EditPanel> {
        let marker = self.picked?;
        let node = self.picked_node()?;
        let tree = &self.generation.tree;

        let style = |key: &str| get_style_value(tree, node, key);
        let editable = can_edit_text(tree, node);

        Some(EditPanel {
            marker,
            tag_name: tree.element_name(node).map(str::to_string),
            can_edit_text: editable,
            text: if editable {
                get_text(tree, node)
            } else {
                String::new()
            },
            background_color: style("backgroundColor")
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            color: style("color").unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            padding: style("padding").unwrap_or_default(),
            margin: style("margin").unwrap_or_default(),
            other_styles: get_style_entries(tree, node)
                .into_iter()
                .map(|(key, value)| StyleEntry { key, value })
                .collect(),
        })
    }

    /// Apply a mutation to the picked node and commit the regenerated
    /// markup
    ///
    /// Returns the committed markup, or `None` when no node is picked or
    /// the request changes nothing.
    pub fn apply(&mut self, mutation: Mutation) -> Result<Option<&str>, EditorError> {
        let Some(node) = self.picked_node() else {
            tracing::debug!(?mutation, "ignored mutation without a picked node");
            return Ok(None);
        };
        if mutation.is_noop() {
            return Ok(None);
        }

        mutation.apply(&mut self.generation.tree, node)?;
        self.generation.markup_text = tree_to_code(&self.generation.tree);
        tracing::debug!(
            generation = self.generation.number,
            ?mutation,
            "committed mutation"
        );

        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.generation.markup_text);
        }
        Ok(Some(self.generation.markup_text.as_str()))
    }

    pub fn set_text(&mut self, text: &str) -> Result<Option<&str>, EditorError> {
        self.apply(Mutation::SetText {
            text: text.to_string(),
        })
    }

    pub fn set_style(
        &mut self,
        property: &str,
        value: Option<&str>,
    ) -> Result<Option<&str>, EditorError> {
        self.apply(Mutation::SetStyle {
            property: property.to_string(),
            value: value.map(str::to_string),
        })
    }

    pub fn set_attribute(
        &mut self,
        name: &str,
        value: impl Into<LiteralValue>,
    ) -> Result<Option<&str>, EditorError> {
        self.apply(Mutation::SetAttribute {
            name: name.to_string(),
            value: value.into(),
        })
    }
}
