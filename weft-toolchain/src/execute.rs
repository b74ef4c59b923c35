use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use weft_core::{Error, GenerationResult, Result};

use crate::{CommandSpec, Executable};

/// Run the built driver with no arguments from `context` and collect the
/// paths it printed.
///
/// A non-zero exit becomes [`Error::Runtime`] carrying the driver's stderr.
pub fn run_driver<E>(
    executable: &E,
    artifact: &Path,
    context: &Path,
    deadline: Option<Duration>,
) -> Result<GenerationResult>
where
    E: Executable + ?Sized,
{
    let cmd = CommandSpec::new(artifact).cwd(context).timeout(deadline);
    let output = executable.run(&cmd)?;
    if !output.success() {
        return Err(Error::runtime(output.stderr_string(), output.exit_code));
    }
    Ok(parse_listing(&output.stdout_string()))
}

/// Split driver stdout into paths, one per line, keeping the emitted order.
///
/// Both `\n` and `\r\n` line endings are accepted; trailing blank lines are
/// dropped.
pub fn parse_listing(stdout: &str) -> GenerationResult {
    let mut lines: Vec<&str> = stdout.lines().collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    GenerationResult::new(lines.into_iter().map(PathBuf::from).collect())
}
