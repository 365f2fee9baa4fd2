//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract translatable text, assign ids, and rewrite literals into lookup calls
//! - `init`: Initialize the configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by commands that read the project.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root directory; the config file is searched from here
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Output directory for the registry and debug listings (overrides config file)
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Registry file name inside the output directory (overrides config file)
    #[arg(long)]
    pub filename: Option<String>,

    /// Write a per-file listing of extracted text (overrides config file)
    #[arg(long)]
    pub debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write rewritten source files under this directory (default is dry-run)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub args: ExtractArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translatable text into the registry and rewrite it into lookup calls
    Extract(ExtractCommand),
    /// Initialize a new .i18nrc.json configuration file
    Init,
}
