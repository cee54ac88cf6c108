//! Action type definitions for CLI commands.
//!
//! Defines the action enums used by the nested subcommands.

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Where and how an archive is written.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportArgs {
    /// Archive format (zip, tar-gz, manifest); configured default when omitted
    #[arg(short = 'a', long = "archive")]
    pub archive: Option<String>,

    /// Directory the archive is written to
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Package name used for the archive root and file name
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Saved library actions.
#[derive(Subcommand, Debug)]
pub enum LibraryAction {
    /// List saved skills, newest first
    List,

    /// Show a saved skill
    Show {
        /// Skill id or unique id prefix
        id: String,
    },

    /// Export a saved skill as an archive
    Export {
        /// Skill id or unique id prefix
        id: String,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Remove every saved skill
    Clear {
        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Cookbook actions.
#[derive(Subcommand, Debug)]
pub enum CookbookAction {
    /// List the built-in patterns
    List,

    /// Print the instruction file a pattern scaffolds
    Show {
        /// Pattern number, slug or title
        pattern: String,
    },

    /// Scaffold a pattern and export it
    Use {
        /// Pattern number, slug or title
        pattern: String,

        /// Also save the scaffold to the library
        #[arg(long)]
        save: bool,

        #[command(flatten)]
        export: ExportArgs,
    },
}

/// Configuration actions.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Print the configuration file location
    Path,
}
