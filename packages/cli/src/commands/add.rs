use super::{describe, parse_value, ScreenFile};
use crate::config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use screenweave_editor::{PropValue, Properties, ID_ATTRIBUTE};
use screenweave_parser::is_valid_name;
use screenweave_workspace::{DropPayload, SyncMutation, Toolbox};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Screen file to edit
    pub file: PathBuf,

    /// Component type, e.g. `Button`
    #[arg(long = "type")]
    pub type_tag: String,

    /// Id for the new component (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Property as `name=value`; the value is JSON or plain text
    #[arg(long = "prop", value_parser = parse_prop)]
    pub props: Vec<(String, PropValue)>,

    /// Skip the toolbox defaults for the type
    #[arg(long)]
    pub no_defaults: bool,

    /// Print the edited text instead of writing the file
    #[arg(long)]
    pub stdout: bool,
}

fn parse_prop(raw: &str) -> Result<(String, PropValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{}`", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing property name in `{}`", raw));
    }
    if !is_valid_name(name) {
        return Err(format!("`{}` is not a valid attribute name", name));
    }
    Ok((name.to_string(), parse_value(value)))
}

/// Drop a component onto the first root element, as the canvas would
pub fn add(args: AddArgs, cwd: &Path) -> Result<()> {
    let config = config::load(cwd)?;
    let mut screen = ScreenFile::open(&args.file, config)?;

    let defaults = if args.no_defaults {
        None
    } else {
        Toolbox::default().payload(&args.type_tag, screen.coordinator.ids_mut())
    };
    let mut payload =
        defaults.unwrap_or_else(|| DropPayload::new(args.type_tag.clone(), Properties::new()));

    for (name, value) in args.props {
        payload.properties.insert(name, value);
    }
    if let Some(id) = args.id {
        payload.properties.insert(ID_ATTRIBUTE, id);
    }

    let report = screen
        .coordinator
        .apply(SyncMutation::CanvasAdd(payload))
        .map_err(|e| describe(&args.file, &screen.source, e))?;
    let id = report
        .selection
        .ok_or_else(|| anyhow!("Component was added but not selected"))?;

    screen.save(&args.file, args.stdout)?;
    if !args.stdout {
        println!(
            "{} Added {} {} to {}",
            "✓".green(),
            args.type_tag,
            id.bold(),
            args.file.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prop() {
        assert_eq!(
            parse_prop("disabled=true").unwrap(),
            ("disabled".to_string(), PropValue::Bool(true))
        );
        assert_eq!(
            parse_prop("children=Save changes").unwrap(),
            ("children".to_string(), PropValue::from("Save changes"))
        );
        assert_eq!(
            parse_prop("onClick=() => a = 1").unwrap(),
            ("onClick".to_string(), PropValue::from("() => a = 1"))
        );
        assert!(parse_prop("disabled").is_err());
        assert!(parse_prop("=1").is_err());
        assert!(parse_prop("my label=x").is_err());
        assert!(parse_prop("1st=x").is_err());
    }
}
