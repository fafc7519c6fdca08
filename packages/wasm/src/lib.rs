use jsxed_editor::{
    can_pick, strip_markers, tag_and_map, EditSession, LiteralValue, Mutation, PickTarget,
    EDIT_MARKER,
};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Attributes of a rendered element, as collected by the picker
struct AttributeSnapshot(HashMap<String, String>);

impl AttributeSnapshot {
    fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(AttributeSnapshot)
    }
}

impl PickTarget for AttributeSnapshot {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Name of the attribute carrying element identifiers
#[wasm_bindgen(js_name = editMarkerAttribute)]
pub fn edit_marker_attribute() -> String {
    EDIT_MARKER.to_string()
}

/// Whether a rendered element (attributes as a JSON object) may be picked
#[wasm_bindgen(js_name = canPick)]
pub fn can_pick_js(attributes_json: &str) -> Result<bool, JsValue> {
    let target = AttributeSnapshot::from_json(attributes_json).map_err(js_error)?;
    Ok(can_pick(&target))
}

/// Tag markup for rendering
#[wasm_bindgen(js_name = tagMarkup)]
pub fn tag_markup_js(markup: &str) -> Result<String, JsValue> {
    tag_and_map(markup)
        .map(|tagged| tagged.tagged_markup)
        .map_err(js_error)
}

/// Markup without identifier markers
#[wasm_bindgen(js_name = stripMarkers)]
pub fn strip_markers_js(markup: &str) -> Result<String, JsValue> {
    strip_markers(markup).map_err(js_error)
}

/// Editing session handle for the browser
///
/// Edits return the committed markup (or `undefined` when nothing changed)
/// so the caller can save it and schedule a rerender.
#[wasm_bindgen]
pub struct Editor {
    session: EditSession,
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new(markup: &str) -> Result<Editor, JsValue> {
        let session = EditSession::load(markup).map_err(js_error)?;
        Ok(Editor { session })
    }

    #[wasm_bindgen(getter)]
    pub fn markup(&self) -> String {
        self.session.markup_text().to_string()
    }

    #[wasm_bindgen(getter, js_name = taggedMarkup)]
    pub fn tagged_markup(&self) -> String {
        self.session.tagged_markup().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> f64 {
        self.session.generation().number as f64
    }

    #[wasm_bindgen(js_name = replaceText)]
    pub fn replace_text(&mut self, text: &str) -> Result<(), JsValue> {
        self.session.replace_text(text).map_err(js_error)
    }

    /// Tag the committed markup again and return it
    pub fn rerender(&mut self) -> Result<String, JsValue> {
        self.session
            .rerender()
            .map(str::to_string)
            .map_err(js_error)
    }

    /// Pick by marker value; `false` when it does not resolve
    pub fn pick(&mut self, marker: &str) -> bool {
        self.session.pick(marker).is_some()
    }

    /// Pick from a rendered element's attributes (JSON object)
    #[wasm_bindgen(js_name = pickElement)]
    pub fn pick_element(&mut self, attributes_json: &str) -> Result<bool, JsValue> {
        let target = AttributeSnapshot::from_json(attributes_json).map_err(js_error)?;
        Ok(match target.edit_marker() {
            Some(marker) => self.pick(&marker),
            None => false,
        })
    }

    #[wasm_bindgen(js_name = clearPick)]
    pub fn clear_pick(&mut self) {
        self.session.clear_pick();
    }

    /// Edit panel of the picked element as JSON
    pub fn panel(&self) -> Result<Option<String>, JsValue> {
        self.session
            .panel()
            .map(|panel| serde_json::to_string(&panel))
            .transpose()
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, text: &str) -> Result<Option<String>, JsValue> {
        self.commit(Mutation::SetText {
            text: text.to_string(),
        })
    }

    #[wasm_bindgen(js_name = setStyle)]
    pub fn set_style(&mut self, property: &str, value: Option<String>) -> Result<Option<String>, JsValue> {
        self.commit(Mutation::SetStyle {
            property: property.to_string(),
            value,
        })
    }

    /// Set an attribute from a JSON literal (`"text"`, `1`, `true`, `null`)
    #[wasm_bindgen(js_name = setAttribute)]
    pub fn set_attribute(&mut self, name: &str, value_json: &str) -> Result<Option<String>, JsValue> {
        let value: LiteralValue = serde_json::from_str(value_json).map_err(js_error)?;
        self.commit(Mutation::SetAttribute {
            name: name.to_string(),
            value,
        })
    }

    /// Apply a JSON-encoded mutation request
    #[wasm_bindgen(js_name = applyMutation)]
    pub fn apply_mutation(&mut self, mutation_json: &str) -> Result<Option<String>, JsValue> {
        let mutation: Mutation = serde_json::from_str(mutation_json).map_err(js_error)?;
        self.commit(mutation)
    }

    fn commit(&mut self, mutation: Mutation) -> Result<Option<String>, JsValue> {
        self.session
            .apply(mutation)
            .map(|committed| committed.map(str::to_string))
            .map_err(js_error)
    }
}
