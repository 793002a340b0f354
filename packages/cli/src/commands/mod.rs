pub mod add;
pub mod inspect;
pub mod roundtrip;
pub mod set_prop;

pub use add::{add, AddArgs};
pub use inspect::{inspect, InspectArgs};
pub use roundtrip::{roundtrip, RoundtripArgs};
pub use set_prop::{set_prop, SetPropArgs};

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use screenweave_editor::{EditorError, PropValue};
use screenweave_parser::{format_error, ParseError};
use screenweave_workspace::{
    BufferEditor, Coordinator, ScreenCollection, ScreenError, SyncConfig, SyncError,
};
use std::path::Path;

/// A screen file opened as the only screen of a coordinator
pub(crate) struct ScreenFile {
    pub source: String,
    pub coordinator: Coordinator<BufferEditor>,
}

impl ScreenFile {
    pub fn open(path: &Path, config: SyncConfig) -> Result<Self> {
        let source = read_source(path)?;
        let opened = ScreenCollection::from_source(&screen_name(path), &source)
            .map_err(SyncError::from)
            .and_then(|screens| Coordinator::with_screens(config, screens, BufferEditor::new()));

        match opened {
            Ok(coordinator) => Ok(Self { source, coordinator }),
            Err(err) => Err(describe(path, &source, err)),
        }
    }

    /// Write the edited text back, or print it when `stdout` is set
    pub fn save(&self, path: &Path, stdout: bool) -> Result<bool> {
        let edited = self.coordinator.active_screen().source();
        if stdout {
            print!("{}", edited);
            return Ok(edited != self.source);
        }
        if edited == self.source {
            return Ok(false);
        }
        std::fs::write(path, edited)
            .with_context(|| format!("Cannot write {}", path.display()))?;
        Ok(true)
    }
}

pub(crate) fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}

/// File stem used as the screen name
fn screen_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "Screen".to_string())
}

/// Turn a sync error into a CLI error, rendering parse errors against the file
pub(crate) fn describe(path: &Path, source: &str, err: SyncError) -> anyhow::Error {
    match source_parse_error(&err) {
        Some(parse) => parse_failure(path, source, parse),
        None => err.into(),
    }
}

pub(crate) fn parse_failure(path: &Path, source: &str, err: &ParseError) -> anyhow::Error {
    let filename = path.display().to_string();
    anyhow!(
        "{} does not parse\n\n{}",
        filename.bold(),
        format_error(source, &filename, err)
    )
}

/// Parse errors that point into the file as read
fn source_parse_error(err: &SyncError) -> Option<&ParseError> {
    match err {
        SyncError::Editor(EditorError::Parse(e))
        | SyncError::Screen(ScreenError::InvalidText(EditorError::Parse(e))) => Some(e),
        _ => None,
    }
}

/// A command line value: JSON when it parses as JSON, otherwise plain text
pub(crate) fn parse_value(raw: &str) -> PropValue {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(PropValue::from_json)
        .unwrap_or_else(|_| PropValue::from(raw))
}
