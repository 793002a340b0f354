mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, inspect, roundtrip, set_prop, AddArgs, InspectArgs, RoundtripArgs, SetPropArgs,
};
use tracing_subscriber::EnvFilter;

/// Screenweave CLI - edit screen source the way the visual designer does
#[derive(Parser, Debug)]
#[command(name = "screenweave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the components of a screen as JSON
    Inspect(InspectArgs),

    /// Check that files print back byte-for-byte
    Roundtrip(RoundtripArgs),

    /// Set a property of a component and write the file back
    SetProp(SetPropArgs),

    /// Add a component to a screen and write the file back
    Add(AddArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Inspect(args) => inspect(args, &cwd),
            Command::Roundtrip(args) => roundtrip(args, &cwd),
            Command::SetProp(args) => set_prop(args, &cwd),
            Command::Add(args) => add(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
