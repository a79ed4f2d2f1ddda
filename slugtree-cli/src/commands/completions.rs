//! Shell completion generation command.
//!
//! Completion scripts are written to stdout; installation hints go to
//! stderr so the output can be redirected straight into a file.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary.
const BIN_NAME: &str = "slugtree";

/// Generate shell completion scripts
#[derive(Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        if !global.quiet {
            if let Some(hint) = install_hint(self.shell) {
                eprintln!("# To enable {} completions:", self.shell);
                for line in hint {
                    eprintln!("#   {line}");
                }
                eprintln!();
            }
        }

        let mut cmd = Cli::command();
        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());
        Ok(())
    }
}

fn install_hint(shell: Shell) -> Option<&'static [&'static str]> {
    let hint: &'static [&'static str] = match shell {
        Shell::Bash => &[
            "slugtree completions bash > ~/.local/share/bash-completion/completions/slugtree",
            "or add to ~/.bashrc: eval \"$(slugtree completions bash)\"",
        ],
        Shell::Zsh => &[
            "slugtree completions zsh > ~/.zsh/completions/_slugtree",
            "with ~/.zsh/completions in your $fpath",
        ],
        Shell::Fish => &["slugtree completions fish > ~/.config/fish/completions/slugtree.fish"],
        Shell::PowerShell => {
            &["slugtree completions powershell | Out-String | Invoke-Expression"]
        }
        _ => return None,
    };
    Some(hint)
}
