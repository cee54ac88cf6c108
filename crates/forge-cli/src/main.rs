//! Skill Forge CLI.
//!
//! Command-line front end for authoring agent skill packages: parse
//! assistant output written as `[FILE: path]` blocks, package it as a zip,
//! tar.gz or plain-text manifest, and keep finished skills in a local
//! library.
//!
//! # Examples
//!
//! ```bash
//! # Show which files a reply contains
//! skill-forge parse reply.md
//!
//! # Package a reply as a tarball
//! skill-forge export reply.md --archive tar-gz --out-dir dist
//!
//! # Ask the configured assistant command and save the result
//! skill-forge generate "A skill that audits slide decks for brand colors" --save
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use forge_core::cli::ExitCode;
use skill_forge_cli::commands::{self, generate::GenerateOptions};
use skill_forge_cli::{ConfigAction, Context, CookbookAction, ExportArgs, LibraryAction, exit_code_for};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Skill Forge - author, package and save agent skill packages.
#[derive(Parser, Debug)]
#[command(name = "skill-forge")]
#[command(version, about, long_about = None)]
#[command(author = "Skill Forge Team")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty); configured default when omitted
    #[arg(long = "format", global = true)]
    format: Option<String>,

    /// Configuration file
    #[arg(long, global = true, env = "SKILL_FORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Library directory
    #[arg(long, global = true, env = "SKILL_FORGE_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the files contained in assistant output.
    ///
    /// Reads text containing `[FILE: path]` blocks and lists the files,
    /// the resolved package name and any repeated paths.
    Parse {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Reject empty paths and malformed markers
        #[arg(long)]
        strict: bool,
    },

    /// Package assistant output as an archive.
    ///
    /// # Examples
    ///
    /// ```bash
    /// skill-forge export reply.md
    /// skill-forge export - --archive manifest --name brand-kit < reply.md
    /// ```
    Export {
        /// Input file, or `-` for stdin
        input: PathBuf,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Save assistant output to the library.
    Save {
        /// Input file, or `-` for stdin
        input: PathBuf,
    },

    /// Ask the configured assistant command for a skill.
    ///
    /// The command named by `provider.command` receives the conversation
    /// on stdin and answers on stdout.
    Generate {
        /// What to build
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Write an archive of the generated files
        #[arg(long)]
        export: bool,

        /// Save the generated files to the library
        #[arg(long)]
        save: bool,

        #[command(flatten)]
        export_args: ExportArgs,
    },

    /// Manage saved skills.
    Library {
        /// Library action
        #[command(subcommand)]
        action: LibraryAction,
    },

    /// Browse and scaffold the built-in patterns.
    Cookbook {
        /// Cookbook action
        #[command(subcommand)]
        action: CookbookAction,
    },

    /// Manage the configuration file.
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            exit_code_for(&err)
        }
    };

    std::process::exit(exit_code.as_i32());
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let ctx = Context::load(cli.config, cli.data_dir, cli.format.as_deref())?;
    init_logging(cli.verbose, &ctx.config.general.log_level);
    execute_command(cli.command, ctx).await
}

/// Initializes logging to stderr.
///
/// `RUST_LOG` takes precedence over the configured level; `--verbose`
/// takes precedence over both.
fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Routes commands to their handlers.
async fn execute_command(command: Commands, mut ctx: Context) -> Result<ExitCode> {
    match command {
        Commands::Parse { input, strict } => {
            ctx.config.parser.strict |= strict;
            commands::parse::run(&ctx, &input)
        }
        Commands::Export { input, export } => commands::export::run(&ctx, &input, &export),
        Commands::Save { input } => commands::save::run(&ctx, &input),
        Commands::Generate {
            prompt,
            export,
            save,
            export_args,
        } => {
            let options = GenerateOptions {
                export,
                save,
                export_args,
            };
            commands::generate::run(&ctx, &prompt.join(" "), &options).await
        }
        Commands::Library { action } => commands::library::run(&ctx, action),
        Commands::Cookbook { action } => commands::cookbook::run(&ctx, action),
        Commands::Config { action } => commands::config::run(&ctx, action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            Ok(commands::completions::run(shell, &mut cmd))
        }
    }
}
