use super::{describe, parse_value, ScreenFile};
use crate::config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use screenweave_workspace::SyncMutation;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct SetPropArgs {
    /// Screen file to edit
    pub file: PathBuf,

    /// Id of the component to edit
    #[arg(long)]
    pub id: String,

    /// Property name
    #[arg(long)]
    pub prop: String,

    /// New value, as JSON (`true`, `12`, `"text"`) or plain text
    #[arg(long)]
    pub value: String,

    /// Print the edited text instead of writing the file
    #[arg(long)]
    pub stdout: bool,
}

/// Edit one property of a component as the property grid would
pub fn set_prop(args: SetPropArgs, cwd: &Path) -> Result<()> {
    let config = config::load(cwd)?;
    let mut screen = ScreenFile::open(&args.file, config)?;

    if !screen.coordinator.select(&args.id) {
        return Err(anyhow!(
            "No component with id {} in {}",
            args.id.bold(),
            args.file.display()
        ));
    }

    let value = parse_value(&args.value);
    screen
        .coordinator
        .apply(SyncMutation::PropertyEdit {
            name: args.prop.clone(),
            value: value.clone(),
        })
        .map_err(|e| describe(&args.file, &screen.source, e))?;

    let changed = screen.save(&args.file, args.stdout)?;
    if !args.stdout {
        if changed {
            println!(
                "{} {}.{} = {}",
                "✓".green(),
                args.id,
                args.prop,
                value.to_text()
            );
        } else {
            println!("{} {}.{} unchanged", "•".dimmed(), args.id, args.prop);
        }
    }
    Ok(())
}
