//! Arena syntax tree for JSX markup
//!
//! Every node lives in one `Vec` owned by the [`Tree`] and is addressed by
//! a [`NodeId`]. Edits replace node payloads in place; nodes that become
//! unreachable stay allocated until the whole tree is dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside its [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Byte range in the parsed source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Literal value (strings, numbers, booleans, null)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl LiteralValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, LiteralValue::String(_))
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => write!(f, "null"),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Number(n) => write!(f, "{}", format_number(*n)),
            LiteralValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<u32> for LiteralValue {
    fn from(value: u32) -> Self {
        LiteralValue::Number(f64::from(value))
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

/// Format a number the way JavaScript prints it for common values
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{}", value)
    }
}

/// Object property key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropertyKey {
    Identifier { name: String },
    Literal { value: LiteralValue, raw: Option<String> },
    Computed { expression: NodeId },
}

/// Piece of an expression the parser keeps as source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum OpaquePart {
    Source(String),
    Node(NodeId),
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Root: a list of expression statements
    Program { body: Vec<NodeId> },

    ExpressionStatement { expression: NodeId },

    /// JSX element (`<div a="b">...</div>`)
    Element {
        name: String,
        attributes: Vec<NodeId>,
        children: Vec<NodeId>,
        self_closing: bool,
    },

    /// JSX fragment (`<>...</>`)
    Fragment { children: Vec<NodeId> },

    /// JSX text; `raw` is the source spelling, `None` once edited
    Text { value: String, raw: Option<String> },

    /// `{expr}` in JSX; `None` for `{}` and comment-only containers
    ExpressionContainer { expression: Option<NodeId> },

    /// JSX attribute; value is a literal, container or element
    Attribute { name: String, value: Option<NodeId> },

    /// `{...expr}` in attribute position
    SpreadAttribute { argument: NodeId },

    Literal { value: LiteralValue, raw: Option<String> },

    Identifier { name: String },

    Object { properties: Vec<NodeId> },

    Property {
        key: PropertyKey,
        value: NodeId,
        shorthand: bool,
    },

    /// `...expr` in object or array position
    Spread { argument: NodeId },

    Array { elements: Vec<NodeId> },

    Parenthesized { expression: NodeId },

    /// Expression kept verbatim; embedded JSX is still parsed into nodes
    Opaque { parts: Vec<OpaquePart> },
}

impl NodeKind {
    pub fn is_element(&self) -> bool {
        matches!(self, NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text { .. })
    }

    /// Short type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::Element { .. } => "Element",
            NodeKind::Fragment { .. } => "Fragment",
            NodeKind::Text { .. } => "Text",
            NodeKind::ExpressionContainer { .. } => "ExpressionContainer",
            NodeKind::Attribute { .. } => "Attribute",
            NodeKind::SpreadAttribute { .. } => "SpreadAttribute",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Object { .. } => "Object",
            NodeKind::Property { .. } => "Property",
            NodeKind::Spread { .. } => "Spread",
            NodeKind::Array { .. } => "Array",
            NodeKind::Parenthesized { .. } => "Parenthesized",
            NodeKind::Opaque { .. } => "Opaque",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Source location; `None` for nodes created by edits
    pub span: Option<Span>,
}

/// Syntax tree owning all of its nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Empty program
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.alloc(NodeKind::Program { body: Vec::new() });
        tree
    }

    pub(crate) fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// Drop every node allocated after `len` (parser backtracking)
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of allocated nodes, reachable or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node created by an edit
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.push(Node { kind, span: None })
    }

    pub fn alloc_spanned(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.push(Node {
            kind,
            span: Some(span),
        })
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    pub fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.nodes.get_mut(id.index()).map(|node| &mut node.kind)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.kind(id).is_some_and(NodeKind::is_element)
    }

    /// Tag name of an element node
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Direct structural children in source order. For elements the
    /// attributes come before the children.
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        let Some(kind) = self.kind(id) else {
            return Vec::new();
        };

        match kind {
            NodeKind::Program { body } => body.clone(),
            NodeKind::ExpressionStatement { expression }
            | NodeKind::Parenthesized { expression } => vec![*expression],
            NodeKind::Element {
                attributes,
                children,
                ..
            } => attributes.iter().chain(children).copied().collect(),
            NodeKind::Fragment { children } => children.clone(),
            NodeKind::ExpressionContainer { expression } => expression.iter().copied().collect(),
            NodeKind::Attribute { value, .. } => value.iter().copied().collect(),
            NodeKind::SpreadAttribute { argument } | NodeKind::Spread { argument } => {
                vec![*argument]
            }
            NodeKind::Object { properties } => properties.clone(),
            NodeKind::Property { key, value, .. } => match key {
                PropertyKey::Computed { expression } => vec![*expression, *value],
                _ => vec![*value],
            },
            NodeKind::Array { elements } => elements.clone(),
            NodeKind::Opaque { parts } => parts
                .iter()
                .filter_map(|part| match part {
                    OpaquePart::Node(id) => Some(*id),
                    OpaquePart::Source(_) => None,
                })
                .collect(),
            NodeKind::Text { .. } | NodeKind::Literal { .. } | NodeKind::Identifier { .. } => {
                Vec::new()
            }
        }
    }

    /// Pre-order walk of every node reachable from `start`
    pub fn descendants(&self, start: NodeId) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![start],
        }
    }

    /// Element nodes reachable from the root, in pre-order
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root)
            .filter(move |id| self.is_element(*id))
    }
}

/// Iterator returned by [`Tree::descendants`]
pub struct PreOrder<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.child_ids(id).into_iter().rev());
        Some(id)
    }
}
