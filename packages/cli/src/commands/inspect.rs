use super::ScreenFile;
use crate::config;
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Screen file to inspect
    pub file: PathBuf,

    /// Print compact JSON on one line
    #[arg(long)]
    pub compact: bool,
}

/// Print the components of a screen as JSON
pub fn inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let config = config::load(cwd)?;
    let screen = ScreenFile::open(&args.file, config)?;
    let components = screen.coordinator.components();

    let json = if args.compact {
        serde_json::to_string(components)?
    } else {
        serde_json::to_string_pretty(components)?
    };
    println!("{}", json);
    Ok(())
}
