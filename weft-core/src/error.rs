use std::{io, path::PathBuf, time::Duration};

use miette::Diagnostic;
use thiserror::Error;

/// Result type for weft operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Errors produced by the generation pipeline.
///
/// The `Resolution`, `Compile` and `Runtime` variants display the underlying
/// tool output unchanged. Those messages are already the most actionable
/// explanation available, so they are never wrapped or paraphrased.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("{diagnostic}")]
    #[diagnostic(
        code(weft::resolution),
        help("PACKAGE must be a library crate directory or the path to its Cargo.toml")
    )]
    Resolution { package: String, diagnostic: String },

    #[error("failed to {action} '{}': {source}", .path.display())]
    #[diagnostic(code(weft::io))]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{what} is not valid UTF-8: '{}'", .path.display())]
    #[diagnostic(
        code(weft::invalid_path),
        help("generated driver sources can only embed UTF-8 paths")
    )]
    InvalidPath { what: &'static str, path: PathBuf },

    #[error("{diagnostic}")]
    #[diagnostic(
        code(weft::compile),
        help("rerun with --debug to keep the driver crate for inspection")
    )]
    Compile { diagnostic: String },

    #[error("{stderr}")]
    #[diagnostic(code(weft::runtime))]
    Runtime { stderr: String, status: Option<i32> },

    #[error("{step} timed out after {}s", .timeout.as_secs())]
    #[diagnostic(code(weft::timeout), help("raise the limit with --timeout, or pass 0 to disable it"))]
    Timeout { step: String, timeout: Duration },

    #[error("failed to run '{program}': {source}")]
    #[diagnostic(code(weft::spawn), help("is '{program}' installed and on PATH?"))]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create a resolution error from the resolver's diagnostic output
    pub fn resolution(package: impl Into<String>, diagnostic: impl AsRef<str>) -> Box<Self> {
        Box::new(Error::Resolution {
            package: package.into(),
            diagnostic: diagnostic.as_ref().trim_end().to_string(),
        })
    }

    /// Create an I/O error for an action on a path
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Box<Self> {
        Box::new(Error::Io {
            action,
            path: path.into(),
            source,
        })
    }

    /// Create an invalid path error
    pub fn invalid_path(what: &'static str, path: impl Into<PathBuf>) -> Box<Self> {
        Box::new(Error::InvalidPath {
            what,
            path: path.into(),
        })
    }

    /// Create a compile error from the compiler's diagnostic output
    pub fn compile(diagnostic: impl AsRef<str>) -> Box<Self> {
        Box::new(Error::Compile {
            diagnostic: diagnostic.as_ref().trim_end().to_string(),
        })
    }

    /// Create a runtime error from a failed driver's stderr.
    ///
    /// When the driver wrote nothing to stderr the exit status is reported
    /// instead, so the message is never empty.
    pub fn runtime(stderr: impl AsRef<str>, status: Option<i32>) -> Box<Self> {
        let stderr = stderr.as_ref().trim_end();
        let stderr = if stderr.is_empty() {
            match status {
                Some(code) => format!("driver exited with status {code}"),
                None => "driver terminated by signal".to_string(),
            }
        } else {
            stderr.to_string()
        };
        Box::new(Error::Runtime { stderr, status })
    }

    /// Create a timeout error for a pipeline step
    pub fn timeout(step: impl Into<String>, timeout: Duration) -> Box<Self> {
        Box::new(Error::Timeout {
            step: step.into(),
            timeout,
        })
    }

    /// Create a spawn error
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Box<Self> {
        Box::new(Error::Spawn {
            program: program.into(),
            source,
        })
    }
}
