//! Contract with the element picker that runs next to the renderer
//!
//! The picker only ever sees rendered elements. It reports a pick by
//! handing back the element's marker attribute value.

use crate::tagger::EDIT_MARKER;

/// A rendered element as seen by the picker
pub trait PickTarget {
    fn attribute(&self, name: &str) -> Option<String>;

    /// Marker value the session resolves the pick with
    fn edit_marker(&self) -> Option<String> {
        self.attribute(EDIT_MARKER)
    }
}

/// Elements without a marker were not produced from the markup (renderer
/// wrappers, overlays) and must not be offered for picking
pub fn can_pick<T: PickTarget + ?Sized>(target: &T) -> bool {
    target.edit_marker().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeElement(HashMap<String, String>);

    impl PickTarget for FakeElement {
        fn attribute(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
    }

    #[test]
    fn test_only_marked_elements_are_pickable() {
        let marked = FakeElement(HashMap::from([(EDIT_MARKER.to_string(), "3".to_string())]));
        let plain = FakeElement(HashMap::new());

        assert!(can_pick(&marked));
        assert_eq!(marked.edit_marker().as_deref(), Some("3"));
        assert!(!can_pick(&plain));
    }
}
