use super::{parse_failure, read_source};
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use screenweave_parser::{parse, print};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct RoundtripArgs {
    /// Screen files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Parse and re-print each file, failing if any output differs from its input
pub fn roundtrip(args: RoundtripArgs, _cwd: &Path) -> Result<()> {
    let mut failed = 0;

    for file in &args.files {
        let source = read_source(file)?;
        let tree = parse(&source).map_err(|e| parse_failure(file, &source, &e))?;
        let printed = print(&tree);

        match first_difference(&source, &printed) {
            None => println!("  {} {}", "✓".green(), file.display()),
            Some(offset) => {
                failed += 1;
                println!(
                    "  {} {} - output differs at byte {}",
                    "✗".red(),
                    file.display(),
                    offset
                );
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files did not round-trip", failed, args.files.len());
    }
    Ok(())
}

fn first_difference(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    let common = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    Some(common)
}
