//! Shell completions command implementation.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};

use crate::cli::{Cli, Shell};

fn clap_shell(shell: &Shell) -> ClapShell {
    match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::Powershell => ClapShell::PowerShell,
    }
}

/// Writes completions for `shell` to `out`.
pub fn write_completions(shell: &Shell, out: &mut dyn io::Write) {
    let mut cmd = Cli::command();
    generate(clap_shell(shell), &mut cmd, "azvec", out);
}

/// Generate shell completions for the given shell and write to stdout.
pub fn execute(shell: &Shell) -> io::Result<()> {
    write_completions(shell, &mut io::stdout());
    Ok(())
}
