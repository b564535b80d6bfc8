//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::Parser;

/// Move the hairstyle from a reference photo onto a subject photo, keeping
/// the subject's face and hair color.
#[derive(Parser, Debug)]
#[command(name = "barber", version, about)]
pub struct Cli {
    /// Customer photo: identity and hair color come from here.
    #[arg(required_unless_present = "list_modes")]
    pub base: Option<PathBuf>,

    /// Style reference photo: only the hairstyle shape and texture are used.
    #[arg(required_unless_present = "list_modes")]
    pub style: Option<PathBuf>,

    /// Precision mode: auto, moderate, precise. Unknown values mean moderate.
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Model name or short alias.
    #[arg(long)]
    pub model: Option<String>,

    /// Output file path, or `-` to print a data URL (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format: png, jpeg, webp.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Print the precision modes and exit.
    #[arg(long)]
    pub list_modes: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The two input photo paths, base first.
    ///
    /// # Errors
    ///
    /// Returns an error if either path is missing.
    pub fn image_paths(&self) -> Result<(PathBuf, PathBuf), String> {
        match (&self.base, &self.style) {
            (Some(base), Some(style)) => Ok((base.clone(), style.clone())),
            _ => Err("Please provide both a customer photo and a style reference.".to_string()),
        }
    }
}
