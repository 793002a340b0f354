//! Synchronization coordinator.
//!
//! Every change to a screen's text goes through [`Coordinator::apply`]. After
//! a change is accepted the coordinator stamps its provenance and uses it to
//! decide which other views to refresh:
//!
//! | provenance     | rediscover components | push text to editor        |
//! |----------------|-----------------------|----------------------------|
//! | TextEditor     | yes                   | no                         |
//! | VisualCanvas   | no                    | yes, cursor kept if focused |
//! | PropertyEditor | no                    | yes, cursor kept if focused |
//! | Initial        | yes                   | yes                        |

use crate::config::SyncConfig;
use crate::property_grid::{property_rows, PropertyRow};
use crate::provenance::ChangeProvenance;
use crate::queue::{MutationQueue, SyncMutation};
use crate::screens::{Screen, ScreenCollection, ScreenError};
use crate::selection::Selection;
use crate::text_editor::{CursorPosition, TextEditor};
use crate::toolbox::DropPayload;
use screenweave_editor::{
    find_by_id, ComponentNode, EditContext, EditorError, IdOrigin, Mutation, MutationError, PropValue,
    ID_ATTRIBUTE,
};
use screenweave_parser::{is_valid_name, IdGenerator};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("No component selected")]
    NothingSelected,

    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),

    #[error("Property cannot be edited: {0}")]
    ReadOnlyProperty(String),

    #[error("Invalid property name: {0:?}")]
    InvalidPropertyName(String),

    #[error("Screen error: {0}")]
    Screen(#[from] ScreenError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),
}

/// What happened after a mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub provenance: ChangeProvenance,
    /// False when the mutation was an echo of the current text
    pub committed: bool,
    pub rediscovered: bool,
    pub text_pushed: bool,
    pub cursor_restored: Option<CursorPosition>,
    pub selection: Option<String>,
}

/// Keeps the canvas component list, the property grid and the text editor
/// consistent with the active screen's text
pub struct Coordinator<E: TextEditor> {
    config: SyncConfig,
    ctx: EditContext,
    screens: ScreenCollection,
    provenance: ChangeProvenance,
    components: Vec<ComponentNode>,
    selection: Selection,
    queue: MutationQueue,
    editor: E,
    ids: IdGenerator,
}

impl<E: TextEditor> Coordinator<E> {
    /// Start with a single templated screen
    pub fn new(config: SyncConfig, editor: E) -> Result<Self, SyncError> {
        let screens = ScreenCollection::new(&config.initial_screen)?;
        Self::with_screens(config, screens, editor)
    }

    /// Start with existing screens and open the active one
    pub fn with_screens(config: SyncConfig, screens: ScreenCollection, editor: E) -> Result<Self, SyncError> {
        let ctx = config.edit_context();
        let ids = id_generator(&config, screens.active_id());
        let mut coordinator = Self {
            config,
            ctx,
            screens,
            provenance: ChangeProvenance::Initial,
            components: Vec::new(),
            selection: Selection::default(),
            queue: MutationQueue::new(),
            editor,
            ids,
        };
        coordinator.finish(ChangeProvenance::Initial)?;
        Ok(coordinator)
    }

    /// Handle for producers; mutations pushed to it run on [`Self::drain`]
    pub fn queue(&self) -> MutationQueue {
        self.queue.clone()
    }

    pub fn submit(&self, mutation: SyncMutation) {
        self.queue.push(mutation);
    }

    /// Apply queued mutations in FIFO order, including any queued while
    /// draining
    pub fn drain(&mut self) -> Vec<Result<SyncReport, SyncError>> {
        let mut reports = Vec::new();
        while let Some(mutation) = self.queue.pop() {
            reports.push(self.apply(mutation));
        }
        reports
    }

    /// Apply one mutation.
    ///
    /// On error the screen text, component list and selection are unchanged.
    pub fn apply(&mut self, mutation: SyncMutation) -> Result<SyncReport, SyncError> {
        match mutation {
            SyncMutation::CanvasAdd(payload) => self.canvas_add(payload),
            SyncMutation::PropertyEdit { name, value } => self.property_edit(&name, value),
            SyncMutation::TextEdit(text) => self.text_edit(&text),
            SyncMutation::ActivateScreen(id) => self.activate_screen(&id),
        }
    }

    fn canvas_add(&mut self, payload: DropPayload) -> Result<SyncReport, SyncError> {
        if self.ctx.vocabulary.tag_for_type(&payload.type_tag).is_none() {
            return Err(SyncError::UnknownComponentType(payload.type_tag));
        }

        if let Some(name) = payload.properties.keys().find(|name| !is_valid_name(name)) {
            return Err(SyncError::InvalidPropertyName(name.to_string()));
        }

        let id = match payload.id().map(str::to_string) {
            Some(id) if self.id_in_use(&id)? => {
                debug!(id = %id, "payload id already in use; generating a new one");
                self.ids.new_id()
            }
            Some(id) => id,
            None => self.ids.new_id(),
        };
        self.ids.reserve([id.clone()]);

        let mut properties = payload.properties;
        properties.remove(ID_ATTRIBUTE);
        let component = ComponentNode::new(id.clone(), payload.type_tag, properties);

        let mut mutations = self.anchor_mutations();
        mutations.push(Mutation::InsertComponent {
            component: component.clone(),
        });
        self.screens
            .active_document_mut()
            .apply_all(&mutations, &self.ctx)?;

        debug!(id = %id, type_tag = %component.type_tag, "added component from canvas");
        self.mark_anchored();
        self.components.push(component);
        self.selection.select(id);
        self.finish(ChangeProvenance::VisualCanvas)
    }

    fn property_edit(&mut self, name: &str, value: PropValue) -> Result<SyncReport, SyncError> {
        if name == ID_ATTRIBUTE {
            return Err(SyncError::ReadOnlyProperty(name.to_string()));
        }
        if !is_valid_name(name) {
            return Err(SyncError::InvalidPropertyName(name.to_string()));
        }
        let id = self
            .selection
            .id()
            .ok_or(SyncError::NothingSelected)?
            .to_string();
        let index = self
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| SyncError::ComponentNotFound(id.clone()))?;

        let mut properties = self.components[index].properties.clone();
        properties.insert(name, value);

        let mut mutations = self.anchor_mutations();
        mutations.push(Mutation::MergeProperties {
            component_id: id.clone(),
            properties: properties.clone(),
        });
        match self
            .screens
            .active_document_mut()
            .apply_all(&mutations, &self.ctx)
        {
            Ok(_) => {}
            Err(EditorError::Mutation(MutationError::NodeNotFound(missing))) => {
                warn!(id = %missing, "component is no longer in the text; property edit dropped");
                return Err(SyncError::ComponentNotFound(missing));
            }
            Err(err) => return Err(err.into()),
        }

        self.mark_anchored();
        self.components[index].properties = properties;
        self.finish(ChangeProvenance::PropertyEditor)
    }

    fn text_edit(&mut self, text: &str) -> Result<SyncReport, SyncError> {
        if text == self.screens.active().source() {
            debug!("ignoring text identical to the screen");
            return Ok(SyncReport {
                provenance: self.provenance,
                committed: false,
                rediscovered: false,
                text_pushed: false,
                cursor_restored: None,
                selection: self.selection.id().map(str::to_string),
            });
        }

        if let Err(err) = self.screens.active_document_mut().replace_source(text) {
            warn!(error = %err, "text does not parse; keeping the last accepted text");
            return Err(err.into());
        }
        self.finish(ChangeProvenance::TextEditor)
    }

    fn activate_screen(&mut self, id: &str) -> Result<SyncReport, SyncError> {
        self.screens.activate(id)?;
        self.open_active()
    }

    fn open_active(&mut self) -> Result<SyncReport, SyncError> {
        self.ids = id_generator(&self.config, self.screens.active_id());
        self.components.clear();
        self.selection.clear();
        self.finish(ChangeProvenance::Initial)
    }

    /// Stamp provenance and refresh the other views
    fn finish(&mut self, provenance: ChangeProvenance) -> Result<SyncReport, SyncError> {
        if provenance != self.provenance {
            debug!(from = ?self.provenance, to = ?provenance, "provenance changed");
        }
        self.provenance = provenance;

        let rediscovered = provenance.rediscovers();
        if rediscovered {
            self.rediscover()?;
        }

        let (text_pushed, cursor_restored) = if provenance.pushes_text() {
            self.push_text(provenance.restores_cursor())
        } else {
            (false, None)
        };

        Ok(SyncReport {
            provenance,
            committed: true,
            rediscovered,
            text_pushed,
            cursor_restored,
            selection: self.selection.id().map(str::to_string),
        })
    }

    fn rediscover(&mut self) -> Result<(), SyncError> {
        let mut found = self
            .screens
            .active()
            .document()
            .components(&self.ctx.vocabulary, &mut self.ids)?;

        // Elements still waiting for an id keep the one they were shown with
        let pending: HashMap<usize, String> = self
            .components
            .iter()
            .filter_map(|c| match c.origin {
                IdOrigin::Generated { ordinal } => Some((ordinal, c.id.clone())),
                IdOrigin::Source => None,
            })
            .collect();
        let taken: HashSet<String> = found.iter().map(|c| c.id.clone()).collect();
        for component in found.iter_mut() {
            if let IdOrigin::Generated { ordinal } = component.origin {
                if let Some(id) = pending.get(&ordinal).filter(|id| !taken.contains(*id)) {
                    component.id = id.clone();
                }
            }
        }

        self.components = found;
        if !self.selection.refresh(&self.components) {
            debug!("selection cleared after rediscovery");
        }
        Ok(())
    }

    fn push_text(&mut self, restore_cursor: bool) -> (bool, Option<CursorPosition>) {
        let source = self.screens.active().source().to_string();
        if self.editor.text() == source {
            return (false, None);
        }

        let focused = self.editor.has_focus();
        let cursor = self.editor.cursor();
        self.editor.set_text(&source);

        if focused && restore_cursor {
            let position = cursor.clamp_to(&source);
            self.editor.set_cursor(position);
            (true, Some(position))
        } else {
            (true, None)
        }
    }

    /// Whether any element of the active text, or any listed component,
    /// already uses `id`
    fn id_in_use(&self, id: &str) -> Result<bool, SyncError> {
        if self.components.iter().any(|c| c.id == id) {
            return Ok(true);
        }
        let tree = self.screens.active().document().tree()?;
        Ok(find_by_id(&tree, id).is_some())
    }

    /// Mutations writing every generated id into the text
    fn anchor_mutations(&self) -> Vec<Mutation> {
        self.components
            .iter()
            .filter_map(|c| match c.origin {
                IdOrigin::Generated { ordinal } => Some(Mutation::AnchorId {
                    ordinal,
                    id: c.id.clone(),
                }),
                IdOrigin::Source => None,
            })
            .collect()
    }

    fn mark_anchored(&mut self) {
        for component in &mut self.components {
            component.origin = IdOrigin::Source;
        }
    }

    /// Select a component by id; returns false if no such component exists
    pub fn select(&mut self, id: &str) -> bool {
        if self.components.iter().any(|c| c.id == id) {
            self.selection.select(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> Option<&ComponentNode> {
        self.selection.resolve(&self.components)
    }

    /// Property grid rows for the selected component
    pub fn property_rows(&self) -> Vec<PropertyRow> {
        self.selected().map(property_rows).unwrap_or_default()
    }

    pub fn add_screen(&mut self, name: &str) -> Result<String, SyncError> {
        Ok(self.screens.add(name)?)
    }

    pub fn rename_screen(&mut self, id: &str, name: &str) -> Result<(), SyncError> {
        Ok(self.screens.rename(id, name)?)
    }

    /// Delete a screen; if it was active, the newly active screen is opened
    /// and its report returned
    pub fn delete_screen(&mut self, id: &str) -> Result<Option<SyncReport>, SyncError> {
        match self.screens.delete(id)? {
            Some(active) => {
                info!(deleted = id, active = %active, "deleted the active screen");
                self.open_active().map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn screens(&self) -> &ScreenCollection {
        &self.screens
    }

    pub fn active_screen(&self) -> &Screen {
        self.screens.active()
    }

    pub fn components(&self) -> &[ComponentNode] {
        &self.components
    }

    pub fn provenance(&self) -> ChangeProvenance {
        self.provenance
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    /// Id generator for the active screen, e.g. for toolbox payloads
    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }
}

/// Generator seeded from the screen id and the current time
fn id_generator(config: &SyncConfig, screen_id: &str) -> IdGenerator {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    IdGenerator::with_prefix(&config.id_prefix, &format!("{}-{}", screen_id, nanos))
}
