use screenweave_editor::{AttributeCodec, ComponentVocabulary, EditContext, DEFAULT_EVENT_PREFIX};
use screenweave_parser::id_generator::DEFAULT_ID_PREFIX;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Synchronization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    /// Attribute name prefix marking event handlers (`onClick`)
    pub event_prefix: String,

    /// Prefix of generated component ids
    pub id_prefix: String,

    /// Extra component types, `{ "TypeTag": "tag-name" }`, merged over the
    /// built-in `Button` entry
    pub vocabulary: BTreeMap<String, String>,

    /// Name of the screen a new workspace starts with
    pub initial_screen: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            event_prefix: DEFAULT_EVENT_PREFIX.to_string(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            vocabulary: BTreeMap::new(),
            initial_screen: "Home".to_string(),
        }
    }
}

impl SyncConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn component_vocabulary(&self) -> ComponentVocabulary {
        ComponentVocabulary::with_entries(&self.vocabulary)
    }

    pub fn edit_context(&self) -> EditContext {
        EditContext {
            vocabulary: self.component_vocabulary(),
            codec: AttributeCodec::new(self.event_prefix.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "eventPrefix": "handle",
            "vocabulary": { "Link": "a" }
        }"#;

        let config = SyncConfig::from_json(json).unwrap();
        assert_eq!(config.event_prefix, "handle");
        assert_eq!(config.id_prefix, "comp");
        assert_eq!(config.initial_screen, "Home");

        let ctx = config.edit_context();
        assert_eq!(ctx.vocabulary.tag_for_type("Link"), Some("a"));
        assert_eq!(ctx.vocabulary.tag_for_type("Button"), Some("button"));
        assert_eq!(ctx.codec.event_prefix(), "handle");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(SyncConfig::from_json("{}").unwrap(), SyncConfig::default());
    }
}
