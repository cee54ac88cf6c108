//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use clap::Command;
use clap_complete::{Shell, generate};
use forge_core::cli::ExitCode;
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    info!("Generating {} completions", shell);
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// # Examples
///
/// ```no_run
/// use clap::Command;
/// use clap_complete::Shell;
/// use skill_forge_cli::commands::completions;
///
/// let mut cmd = Command::new("skill-forge");
/// let code = completions::run(Shell::Bash, &mut cmd);
/// assert!(code.is_success());
/// ```
#[must_use]
pub fn run(shell: Shell, cmd: &mut Command) -> ExitCode {
    write_completions(shell, cmd, &mut io::stdout());
    ExitCode::SUCCESS
}
