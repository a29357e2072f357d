//! Command-line interface implementation for postgen.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for postgen.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "postgen: reconcile a freshly generated project with its feature flags",
    long_about = None
)]
pub struct Args {
    /// Root of the generated project (defaults to the hook payload's
    /// output_dir, then the current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Context file with the generation answers (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Read the context from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Override a context value, e.g. `--set api=false`
    #[arg(short = 'D', long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub overrides: Vec<(String, String)>,

    /// Manifest file to use instead of the built-in one (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Print what would be removed and regenerated without touching the tree
    #[arg(long)]
    pub dry_run: bool,

    /// Fail if placeholder paths remain after the run
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses a `KEY=VALUE` override.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) =
        s.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for argument errors, or after
///   printing help and version information
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::ValueValidation {
                eprintln!("{e}");
                std::process::exit(1);
            }
            e.exit();
        }
    }
}
