use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use tracing::debug;
use weft_core::{Command, Deadlines, GenerationRequest};
use weft_pipeline::{GenerationReport, Orchestrator};

use super::UnwrapOrExit;
use crate::logging;

/// Arguments shared by `gen` and `example`.
#[derive(Args)]
pub struct GenerateCommand {
    /// Design package: a library crate directory or its Cargo.toml
    pub package: String,

    /// Output directory passed to the design package
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Parent directory for the temporary driver workspace
    #[arg(short, long)]
    pub temp: Option<PathBuf>,

    /// Keep the driver workspace and print full diagnostics
    #[arg(long)]
    pub debug: bool,

    /// Seconds allowed for building and for running the driver (0 disables)
    #[arg(long, default_value_t = Deadlines::DEFAULT_SECS)]
    pub timeout: u64,
}

impl GenerateCommand {
    pub fn run(&self, command: Command) -> Result<()> {
        logging::init(self.debug);

        let request = GenerationRequest::new(command, &self.package)
            .with_output_dir(&self.output)
            .with_temp_root(self.temp.clone())
            .with_debug(self.debug);
        debug!(?request, "starting generation");

        let report = Orchestrator::cargo(Deadlines::from_secs(self.timeout))
            .run(&request)
            .unwrap_or_exit(self.debug);

        if let Some(notice) = preserved_notice(&report) {
            eprintln!("{notice}");
        }
        if !report.files.is_empty() {
            println!("{}", report.files);
        }
        Ok(())
    }
}

/// Stderr line naming the kept workspace, independent of the log filter.
fn preserved_notice(report: &GenerationReport) -> Option<String> {
    report
        .preserved
        .as_ref()
        .map(|path| format!("workspace kept at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use weft_core::GenerationResult;
    use weft_pipeline::Stage;

    use super::*;

    fn report(preserved: Option<PathBuf>, stage: Stage) -> GenerationReport {
        GenerationReport {
            files: GenerationResult::new(vec![PathBuf::from("a.go")]),
            preserved,
            stage,
        }
    }

    #[test]
    fn test_preserved_workspace_is_announced() {
        let kept = report(Some(PathBuf::from("/tmp/weft-abc123")), Stage::Preserved);
        assert_eq!(
            preserved_notice(&kept).as_deref(),
            Some("workspace kept at /tmp/weft-abc123")
        );
    }

    #[test]
    fn test_cleaned_workspace_is_silent() {
        assert_eq!(preserved_notice(&report(None, Stage::CleanedUp)), None);
    }
}
