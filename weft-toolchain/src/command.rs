use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
    time::Duration,
};

/// Specification for a command to execute.
///
/// Arguments are kept as discrete elements and handed to
/// [`std::process::Command`] as-is; nothing is ever interpreted by a shell.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use weft_toolchain::CommandSpec;
///
/// let cmd = CommandSpec::new("cargo")
///     .arg("build")
///     .arg("--quiet")
///     .cwd("/path/to/project")
///     .timeout(Some(Duration::from_secs(600)));
///
/// assert_eq!(cmd.get_args().len(), 2);
/// assert_eq!(cmd.describe(), "cargo build");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command from `dir` instead of the current directory.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Kill the command if it is still running after `limit`.
    pub fn timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Short human label: the program's file name plus its first argument
    /// when that argument is a subcommand (does not start with `-`).
    pub fn describe(&self) -> String {
        let program = Path::new(&self.program)
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned();
        match self.args.first() {
            Some(first) if !first.to_string_lossy().starts_with('-') => {
                format!("{program} {}", first.to_string_lossy())
            }
            _ => program,
        }
    }

    /// Build a [`Command`] with the program, arguments and working directory.
    ///
    /// On unix the child leads a new process group, so a timeout can take
    /// down everything it spawned.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd
    }
}
