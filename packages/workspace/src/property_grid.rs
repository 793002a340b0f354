use screenweave_editor::{ComponentNode, EditorKind, PropValue, ID_ATTRIBUTE};
use serde::Serialize;

/// One editable row of the property grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRow {
    pub name: String,
    pub kind: EditorKind,
    pub value: PropValue,
}

/// Rows for every property of `component` except its id, in property order
pub fn property_rows(component: &ComponentNode) -> Vec<PropertyRow> {
    component
        .properties
        .iter()
        .filter(|(name, _)| *name != ID_ATTRIBUTE)
        .map(|(name, value)| PropertyRow {
            name: name.to_string(),
            kind: value.editor_kind(),
            value: value.clone(),
        })
        .collect()
}
