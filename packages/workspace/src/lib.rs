//! # Screenweave Workspace
//!
//! Screens plus the coordinator that keeps the canvas, the property grid and
//! the text editor in step with each screen's source text.
//!
//! ```text
//!   canvas ──CanvasAdd──────┐
//!   grid ────PropertyEdit───┼──▶ MutationQueue ──▶ Coordinator ──▶ Screen text
//!   editor ──TextEdit───────┘                          │
//!        ▲                                             │
//!        └──────── set_text (canvas/grid edits) ◀──────┘
//! ```

pub mod config;
pub mod coordinator;
pub mod property_grid;
pub mod provenance;
pub mod queue;
pub mod screens;
pub mod selection;
pub mod text_editor;
pub mod toolbox;

pub use config::SyncConfig;
pub use coordinator::{Coordinator, SyncError, SyncReport};
pub use property_grid::{property_rows, PropertyRow};
pub use provenance::ChangeProvenance;
pub use queue::{MutationQueue, SyncMutation};
pub use screens::{screen_template, Screen, ScreenCollection, ScreenError};
pub use selection::Selection;
pub use text_editor::{BufferEditor, CursorPosition, TextEditor};
pub use toolbox::{DropPayload, Toolbox, ToolboxItem};
