mod completions;
mod generate;
mod version;

use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use version::VersionCommand;
use weft_core::Command;

/// Extension trait for exiting on pipeline errors.
///
/// The raw message is printed by default, since tool diagnostics are
/// already the most useful output. `--debug` switches to the full report.
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self, debug: bool) -> T;
}

impl<T> UnwrapOrExit<T> for weft_core::Result<T> {
    fn unwrap_or_exit(self, debug: bool) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                if debug {
                    eprintln!("{:?}", miette::Report::new(*e));
                } else {
                    eprintln!("{e}");
                }
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "weft")]
#[command(version)]
#[command(about = "Generate code by running Rust design packages")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Gen(cmd) => cmd.run(Command::Gen),
            Commands::Example(cmd) => cmd.run(Command::Example),
            Commands::Version(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code from a design package
    Gen(GenerateCommand),

    /// Generate an example implementation from a design package
    Example(GenerateCommand),

    /// Print the weft version
    Version(VersionCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_gen_defaults() {
        let cli = Cli::try_parse_from(["weft", "gen", "./design"]).unwrap();
        let Commands::Gen(cmd) = cli.command else {
            panic!("expected gen");
        };
        assert_eq!(cmd.package, "./design");
        assert_eq!(cmd.output, Path::new("."));
        assert_eq!(cmd.temp, None);
        assert!(!cmd.debug);
        assert_eq!(cmd.timeout, 600);
    }

    #[test]
    fn test_example_with_flags() {
        let cli = Cli::try_parse_from([
            "weft", "example", "design", "-o", "out", "-t", "/scratch", "--debug", "--timeout",
            "0",
        ])
        .unwrap();
        let Commands::Example(cmd) = cli.command else {
            panic!("expected example");
        };
        assert_eq!(cmd.output, Path::new("out"));
        assert_eq!(cmd.temp.as_deref(), Some(Path::new("/scratch")));
        assert!(cmd.debug);
        assert_eq!(cmd.timeout, 0);
    }

    #[test]
    fn test_package_is_required() {
        assert!(Cli::try_parse_from(["weft", "gen"]).is_err());
    }
}
