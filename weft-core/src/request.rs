//! Generation request and result types.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Which generation the design package should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Full generation.
    Gen,
    /// Example-only generation.
    Example,
}

impl Command {
    /// The mode string handed to the design package's entry point.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gen => "gen",
            Self::Example => "example",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gen" => Ok(Self::Gen),
            "example" => Ok(Self::Example),
            other => Err(format!("unknown command '{other}', expected 'gen' or 'example'")),
        }
    }
}

/// One invocation's worth of input, supplied by the caller.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    command: Command,
    package: String,
    output_dir: PathBuf,
    temp_root: Option<PathBuf>,
    debug: bool,
}

impl GenerationRequest {
    /// Create a request writing to the current directory, with the default
    /// temp root and debug disabled.
    pub fn new(command: Command, package: impl Into<String>) -> Self {
        Self {
            command,
            package: package.into(),
            output_dir: PathBuf::from("."),
            temp_root: None,
            debug: false,
        }
    }

    /// Set the directory the design package writes into.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set an explicit temp root, overriding environment defaults.
    pub fn with_temp_root(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_root = dir;
        self
    }

    /// Keep the workspace on disk after the run.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn temp_root(&self) -> Option<&Path> {
        self.temp_root.as_deref()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}

/// Ordered list of files the driver reported as written.
///
/// An empty result is a successful run that produced no files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    files: Vec<PathBuf>,
}

impl GenerationResult {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }
}

/// Renders the files newline-joined, without a trailing newline.
impl fmt::Display for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, file) in self.files.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", file.display())?;
        }
        Ok(())
    }
}

impl IntoIterator for GenerationResult {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a GenerationResult {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
