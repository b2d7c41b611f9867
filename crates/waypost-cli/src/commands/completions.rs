use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, shells};

use crate::cli::{Cli, CompletionShell};
use crate::error::CliError;

/// Render a completion script for the requested shell and write it to the
/// given path or stdout.
pub fn run_completions(shell: CompletionShell, output_path: Option<&Path>) -> Result<(), CliError> {
    let script = render_script(shell);

    match output_path {
        Some(path) => {
            std::fs::write(path, &script)?;
            println!("{}", path.display());
        }
        None => io::stdout().write_all(&script)?,
    }

    Ok(())
}

fn render_script(shell: CompletionShell) -> Vec<u8> {
    let mut command = Cli::command();
    let mut script = Vec::new();
    match shell {
        CompletionShell::Bash => generate(shells::Bash, &mut command, "waypost", &mut script),
        CompletionShell::Zsh => generate(shells::Zsh, &mut command, "waypost", &mut script),
        CompletionShell::Fish => generate(shells::Fish, &mut command, "waypost", &mut script),
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_write_bash_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("waypost.bash");

        run_completions(CompletionShell::Bash, Some(&output)).unwrap();

        let script = std::fs::read_to_string(&output).unwrap();
        assert!(script.contains("_waypost()"));
        assert!(script.contains("complete -F _waypost"));
    }

    #[test]
    fn each_shell_renders_a_distinct_script() {
        let bash = render_script(CompletionShell::Bash);
        let zsh = render_script(CompletionShell::Zsh);
        let fish = render_script(CompletionShell::Fish);
        assert!(!bash.is_empty() && !zsh.is_empty() && !fish.is_empty());
        assert_ne!(bash, zsh);
        assert_ne!(zsh, fish);
    }
}
