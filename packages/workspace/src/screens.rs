//! Screens and the collection that owns them.

use screenweave_editor::{Document, EditorError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreenError {
    #[error("Screen not found: {0}")]
    NotFound(String),

    #[error("Cannot delete the only screen")]
    LastScreen,

    #[error("Screen name must not be empty")]
    EmptyName,

    #[error("Invalid screen text: {0}")]
    InvalidText(#[from] EditorError),
}

/// Starting text of a new screen
pub fn screen_template(name: &str) -> String {
    let display: String = name.chars().filter(|c| !"{}<>".contains(*c)).collect();
    format!(
        "export default function {}() {{ return <div>{} Screen</div>; }}",
        component_name(name),
        display
    )
}

/// Script identifier for a screen name (`About Us` → `AboutUs`)
fn component_name(name: &str) -> String {
    let ident: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    match ident.chars().next() {
        Some(c) if !c.is_ascii_digit() => ident,
        _ => format!("Screen{}", ident),
    }
}

/// A named screen and its source text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    id: String,
    name: String,
    #[serde(rename = "source", serialize_with = "serialize_document")]
    document: Document,
}

fn serialize_document<S: serde::Serializer>(doc: &Document, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(doc.source())
}

impl Screen {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        self.document.source()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// Ordered screens with exactly one active.
///
/// Text is only changed through [`crate::Coordinator`].
#[derive(Debug, Clone)]
pub struct ScreenCollection {
    screens: Vec<Screen>,
    active: String,
    next_id: u64,
}

impl ScreenCollection {
    /// A collection holding one templated screen, which is active
    pub fn new(initial_name: &str) -> Result<Self, ScreenError> {
        let mut collection = Self {
            screens: Vec::new(),
            active: String::new(),
            next_id: 1,
        };
        let id = collection.add(initial_name)?;
        collection.active = id;
        Ok(collection)
    }

    /// A collection holding one screen with the given text
    pub fn from_source(name: &str, source: &str) -> Result<Self, ScreenError> {
        let mut collection = Self {
            screens: Vec::new(),
            active: String::new(),
            next_id: 1,
        };
        let id = collection.add_with_source(name, source)?;
        collection.active = id;
        Ok(collection)
    }

    /// Add a templated screen; returns its id. The active screen is unchanged.
    pub fn add(&mut self, name: &str) -> Result<String, ScreenError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScreenError::EmptyName);
        }
        self.insert(name, screen_template(name))
    }

    /// Add a screen with the given text
    pub fn add_with_source(&mut self, name: &str, source: &str) -> Result<String, ScreenError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScreenError::EmptyName);
        }
        self.insert(name, source.to_string())
    }

    fn insert(&mut self, name: &str, source: String) -> Result<String, ScreenError> {
        let document = Document::from_source(source)?;
        let id = format!("screen-{}", self.next_id);
        self.next_id += 1;

        debug!(id = %id, name, "added screen");
        self.screens.push(Screen {
            id: id.clone(),
            name: name.to_string(),
            document,
        });
        Ok(id)
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), ScreenError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScreenError::EmptyName);
        }
        let screen = self
            .screens
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ScreenError::NotFound(id.to_string()))?;
        screen.name = name.to_string();
        Ok(())
    }

    /// Delete a screen. Deleting the active screen activates the first
    /// remaining one, whose id is returned.
    pub fn delete(&mut self, id: &str) -> Result<Option<String>, ScreenError> {
        let index = self
            .screens
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ScreenError::NotFound(id.to_string()))?;
        if self.screens.len() == 1 {
            info!(id, "refusing to delete the only screen");
            return Err(ScreenError::LastScreen);
        }

        self.screens.remove(index);
        if self.active != id {
            return Ok(None);
        }

        // Non-empty: the last screen is never removed
        self.active = self.screens[0].id.clone();
        Ok(Some(self.active.clone()))
    }

    pub fn activate(&mut self, id: &str) -> Result<(), ScreenError> {
        if self.get(id).is_none() {
            return Err(ScreenError::NotFound(id.to_string()));
        }
        self.active = id.to_string();
        Ok(())
    }

    pub fn active_id(&self) -> &str {
        &self.active
    }

    pub fn active(&self) -> &Screen {
        self.screens
            .iter()
            .find(|s| s.id == self.active)
            .unwrap_or(&self.screens[0])
    }

    pub fn get(&self, id: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Screen> {
        self.screens.iter()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub(crate) fn active_document_mut(&mut self) -> &mut Document {
        let index = self
            .screens
            .iter()
            .position(|s| s.id == self.active)
            .unwrap_or(0);
        &mut self.screens[index].document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template() {
        assert_eq!(
            screen_template("Home"),
            "export default function Home() { return <div>Home Screen</div>; }"
        );
        assert_eq!(
            screen_template("About Us"),
            "export default function AboutUs() { return <div>About Us Screen</div>; }"
        );
        assert!(screen_template("404").starts_with("export default function Screen404()"));
    }

    #[test]
    fn test_initial_screen() {
        let screens = ScreenCollection::new("Home").unwrap();
        assert_eq!(screens.len(), 1);
        assert_eq!(screens.active().name(), "Home");
        assert_eq!(screens.active().source(), screen_template("Home"));
    }

    #[test]
    fn test_from_source_rejects_bad_text() {
        assert!(matches!(
            ScreenCollection::from_source("Home", "const v = <div>"),
            Err(ScreenError::InvalidText(_))
        ));
    }

    #[test]
    fn test_add_does_not_activate() {
        let mut screens = ScreenCollection::new("Home").unwrap();
        let id = screens.add("  Settings ").unwrap();

        assert_eq!(screens.get(&id).unwrap().name(), "Settings");
        assert_ne!(screens.active_id(), id);
        assert_eq!(screens.add("   "), Err(ScreenError::EmptyName));
    }

    #[test]
    fn test_rename() {
        let mut screens = ScreenCollection::new("Home").unwrap();
        let id = screens.active_id().to_string();

        screens.rename(&id, "Start").unwrap();
        assert_eq!(screens.active().name(), "Start");
        // Text keeps its original function name
        assert!(screens.active().source().contains("function Home()"));
        assert_eq!(screens.rename("nope", "X"), Err(ScreenError::NotFound("nope".to_string())));
    }

    #[test]
    fn test_delete_rules() {
        let mut screens = ScreenCollection::new("Home").unwrap();
        let home = screens.active_id().to_string();
        assert_eq!(screens.delete(&home), Err(ScreenError::LastScreen));

        let settings = screens.add("Settings").unwrap();
        let about = screens.add("About").unwrap();
        assert_eq!(screens.delete(&settings), Ok(None));

        screens.activate(&about).unwrap();
        assert_eq!(screens.delete(&about), Ok(Some(home.clone())));
        assert_eq!(screens.active_id(), home);
        assert_eq!(screens.len(), 1);
    }
}
