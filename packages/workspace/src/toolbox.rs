use screenweave_editor::{PropValue, Properties, ID_ATTRIBUTE};
use screenweave_parser::IdGenerator;
use serde::{Deserialize, Serialize};

/// Data carried by a toolbox drag and delivered on drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropPayload {
    pub type_tag: String,
    #[serde(default)]
    pub properties: Properties,
}

impl DropPayload {
    pub fn new(type_tag: impl Into<String>, properties: Properties) -> Self {
        Self {
            type_tag: type_tag.into(),
            properties,
        }
    }

    /// The `id` property, if the payload carries one
    pub fn id(&self) -> Option<&str> {
        self.properties.get(ID_ATTRIBUTE).and_then(PropValue::as_str)
    }
}

/// A draggable entry of the toolbox
#[derive(Debug, Clone, PartialEq)]
pub struct ToolboxItem {
    pub type_tag: String,
    pub label: String,
    pub defaults: Properties,
}

/// Components the user can drag onto the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Toolbox {
    items: Vec<ToolboxItem>,
}

impl Default for Toolbox {
    fn default() -> Self {
        let defaults: Properties = [
            ("children", PropValue::from("Button")),
            ("onClick", PropValue::from("() => console.log('Button clicked')")),
            ("class", PropValue::from("btn")),
            ("disabled", PropValue::from(false)),
        ]
        .into_iter()
        .collect();

        Self {
            items: vec![ToolboxItem {
                type_tag: "Button".to_string(),
                label: "Button".to_string(),
                defaults,
            }],
        }
    }
}

impl Toolbox {
    pub fn items(&self) -> &[ToolboxItem] {
        &self.items
    }

    pub fn add_item(&mut self, item: ToolboxItem) {
        self.items.push(item);
    }

    /// Drag payload for `type_tag` with its default properties and a fresh id
    pub fn payload(&self, type_tag: &str, ids: &mut IdGenerator) -> Option<DropPayload> {
        let item = self.items.iter().find(|item| item.type_tag == type_tag)?;
        let mut properties = Properties::new();
        properties.insert(ID_ATTRIBUTE, ids.new_id());
        for (name, value) in item.defaults.iter() {
            properties.insert(name, value.clone());
        }
        Some(DropPayload::new(type_tag, properties))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_button_payload() {
        let mut ids = IdGenerator::new("toolbox");
        let payload = Toolbox::default().payload("Button", &mut ids).unwrap();

        assert_eq!(payload.type_tag, "Button");
        assert!(payload.id().is_some_and(|id| id.starts_with("comp-")));
        assert_eq!(payload.properties.get("children"), Some(&PropValue::from("Button")));
        assert_eq!(
            payload.properties.get("onClick"),
            Some(&PropValue::from("() => console.log('Button clicked')"))
        );
        assert_eq!(payload.properties.get("class"), Some(&PropValue::from("btn")));
        assert_eq!(payload.properties.get("disabled"), Some(&PropValue::Bool(false)));
    }

    #[test]
    fn test_unknown_item() {
        let mut ids = IdGenerator::new("toolbox");
        assert!(Toolbox::default().payload("Slider", &mut ids).is_none());
    }

    #[test]
    fn test_payload_json() {
        let payload: DropPayload =
            serde_json::from_str(r#"{"typeTag":"Button","properties":{"class":"big"}}"#).unwrap();
        assert_eq!(payload.properties.get("class"), Some(&PropValue::from("big")));
        assert_eq!(payload.id(), None);
    }
}
