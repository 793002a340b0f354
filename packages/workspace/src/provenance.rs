use serde::{Deserialize, Serialize};

/// Which view produced the last accepted change to the active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeProvenance {
    VisualCanvas,
    PropertyEditor,
    TextEditor,
    /// The screen was just activated
    Initial,
}

impl ChangeProvenance {
    /// Whether the component list must be re-derived from the text.
    ///
    /// Canvas and property edits keep the list in step themselves.
    pub fn rediscovers(self) -> bool {
        matches!(self, ChangeProvenance::TextEditor | ChangeProvenance::Initial)
    }

    /// Whether the text editor must be sent the new text; never for its own edits
    pub fn pushes_text(self) -> bool {
        !matches!(self, ChangeProvenance::TextEditor)
    }

    /// Whether a focused editor gets its cursor back after a push
    pub fn restores_cursor(self) -> bool {
        matches!(
            self,
            ChangeProvenance::VisualCanvas | ChangeProvenance::PropertyEditor
        )
    }
}
