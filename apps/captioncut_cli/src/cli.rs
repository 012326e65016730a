use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "captioncut")]
#[command(about = "Apply scripted subtitle clip edits to a caption project.")]
pub struct Args {
    /// Override log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply a JSON list of edit operations to a project
    Apply(ApplyCmd),
    /// Print the default editor settings as JSON and exit
    PrintDefaultSettings,
}

#[derive(Debug, Parser)]
pub struct ApplyCmd {
    /// Project file (.captioncut JSON)
    pub project: PathBuf,

    /// JSON file holding an array of operations
    #[arg(long)]
    pub ops: PathBuf,

    /// Where to write the edited project (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Editor settings JSON overriding the project's own settings
    #[arg(long)]
    pub settings: Option<PathBuf>,
}
