//! # jsxed editor
//!
//! Editing pipeline for JSX markup.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: markup → arena tree → markup        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ tagger: identifier marker on every element  │
//! │  - tagged markup for the renderer           │
//! │  - identifier → node mapping                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: pick → mutate → regenerate markup  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use jsxed_editor::EditSession;
//!
//! let mut session = EditSession::load("<div><p>Hi</p></div>").unwrap();
//!
//! // The renderer reports the marker value of the clicked element
//! session.pick("1");
//! session.set_text("Hello").unwrap();
//! session.set_style("color", Some("red")).unwrap();
//!
//! assert!(session.markup_text().contains(">Hello</p>"));
//! ```

mod attributes;
mod errors;
mod mutations;
mod picker;
mod session;
mod style;
mod tagger;
mod text;

pub use attributes::{find_attribute, get_attribute, set_attribute};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError};
pub use picker::{can_pick, PickTarget};
pub use session::{EditPanel, EditSession, Generation, StyleEntry, DEFAULT_COLOR};
pub use style::{
    ensure_style_attribute, get_style_entries, get_style_value, read_style_object,
    set_style_value, write_style_object, StyleMap, STYLE_ATTRIBUTE,
};
pub use tagger::{parse_marker, strip_markers, tag_and_map, IdentifierMap, Tagged, EDIT_MARKER};
pub use text::{can_edit_text, get_text, set_text};

// Re-export the tree types the primitives operate on
pub use jsxed_parser::{tree_to_code, LiteralValue, NodeId, NodeKind, ParseError, Tree};
