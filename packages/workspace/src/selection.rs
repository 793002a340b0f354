use screenweave_editor::ComponentNode;

/// Weak reference to a component by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    id: Option<String>,
}

impl Selection {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.id = None;
    }

    /// The selected component, if it is still in `components`
    pub fn resolve<'a>(&self, components: &'a [ComponentNode]) -> Option<&'a ComponentNode> {
        let id = self.id.as_deref()?;
        components.iter().find(|c| c.id == id)
    }

    /// Clear the selection if its component is gone; returns whether it survived
    pub fn refresh(&mut self, components: &[ComponentNode]) -> bool {
        let alive = self.resolve(components).is_some();
        if !alive {
            self.id = None;
        }
        alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenweave_editor::Properties;

    #[test]
    fn test_refresh() {
        let components = vec![ComponentNode::new("a", "Button", Properties::new())];
        let mut selection = Selection::default();

        selection.select("a");
        assert!(selection.refresh(&components));
        assert_eq!(selection.id(), Some("a"));

        selection.select("gone");
        assert!(!selection.refresh(&components));
        assert_eq!(selection.id(), None);
    }
}
