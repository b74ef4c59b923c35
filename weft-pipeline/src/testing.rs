//! Scripted collaborators for exercising the pipeline without cargo.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    cell::{Cell, RefCell},
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use weft_core::{DRIVER_NAME, Error, ResolvedPackage, Result, Workspace};
use weft_toolchain::{CommandSpec, Executable, ProcessOutput, Toolchain};

/// Toolchain that resolves and compiles according to a script.
///
/// Compilation checks that the driver files were actually written, then
/// reports an artifact path inside the workspace without building anything.
#[derive(Debug)]
pub struct FakeToolchain {
    resolution: std::result::Result<ResolvedPackage, String>,
    compile_error: Option<String>,
    validations: Cell<usize>,
    compiled: RefCell<Vec<PathBuf>>,
}

impl FakeToolchain {
    /// Resolve every reference to a package called `name`.
    pub fn resolving(name: &str) -> Self {
        let manifest = PathBuf::from(format!("/design/{name}/Cargo.toml"));
        Self {
            resolution: Ok(ResolvedPackage::new(name, manifest)),
            compile_error: None,
            validations: Cell::new(0),
            compiled: RefCell::new(Vec::new()),
        }
    }

    /// Fail every resolution with `diagnostic`.
    pub fn unresolvable(diagnostic: &str) -> Self {
        Self {
            resolution: Err(diagnostic.to_string()),
            ..Self::resolving("unresolved")
        }
    }

    /// Report `lockfile` as the resolved package's lockfile.
    pub fn with_lockfile(mut self, lockfile: impl Into<PathBuf>) -> Self {
        if let Ok(package) = self.resolution {
            self.resolution = Ok(package.with_lockfile(Some(lockfile.into())));
        }
        self
    }

    /// Fail every compilation with `diagnostic`.
    pub fn failing_compile(mut self, diagnostic: &str) -> Self {
        self.compile_error = Some(diagnostic.to_string());
        self
    }

    /// Number of `validate` calls so far.
    pub fn validations(&self) -> usize {
        self.validations.get()
    }

    /// Workspace roots handed to `compile`, in call order.
    pub fn compiled_workspaces(&self) -> Vec<PathBuf> {
        self.compiled.borrow().clone()
    }
}

impl Toolchain for FakeToolchain {
    fn validate(&self, package: &str, _context: &Path) -> Result<ResolvedPackage> {
        self.validations.set(self.validations.get() + 1);
        self.resolution
            .clone()
            .map_err(|diagnostic| Error::resolution(package, diagnostic))
    }

    fn compile(&self, workspace: &Workspace, _context: &Path) -> Result<PathBuf> {
        self.compiled
            .borrow_mut()
            .push(workspace.root().to_path_buf());

        for required in [workspace.manifest_path(), workspace.driver_path()] {
            if !required.is_file() {
                return Err(Error::compile(format!(
                    "error: couldn't read `{}`",
                    required.display()
                )));
            }
        }

        match &self.compile_error {
            Some(diagnostic) => Err(Error::compile(diagnostic)),
            None => Ok(workspace.target_dir().join("debug").join(DRIVER_NAME)),
        }
    }
}

/// Executable that replies with a fixed output and records every command.
pub struct FakeExecutable {
    reply: ProcessOutput,
    timeout: Option<Duration>,
    before_reply: Option<fn(&CommandSpec)>,
    runs: RefCell<Vec<CommandSpec>>,
}

impl FakeExecutable {
    /// Exit 0 after writing `stdout`.
    pub fn printing(stdout: &str) -> Self {
        Self::replying(ProcessOutput::new(stdout.into(), Vec::new(), Some(0)))
    }

    /// Exit with `code` after writing `stderr`.
    pub fn failing(stderr: &str, code: i32) -> Self {
        Self::replying(ProcessOutput::new(Vec::new(), stderr.into(), Some(code)))
    }

    /// Fail every run with [`Error::Timeout`] after `limit`.
    pub fn timing_out(limit: Duration) -> Self {
        Self {
            timeout: Some(limit),
            ..Self::replying(ProcessOutput::default())
        }
    }

    pub fn replying(reply: ProcessOutput) -> Self {
        Self {
            reply,
            timeout: None,
            before_reply: None,
            runs: RefCell::new(Vec::new()),
        }
    }

    /// Call `hook` with each command before replying.
    pub fn before_reply(mut self, hook: fn(&CommandSpec)) -> Self {
        self.before_reply = Some(hook);
        self
    }

    /// Commands run so far, in call order.
    pub fn runs(&self) -> Vec<CommandSpec> {
        self.runs.borrow().clone()
    }
}

impl fmt::Debug for FakeExecutable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeExecutable")
            .field("reply", &self.reply)
            .field("timeout", &self.timeout)
            .field("before_reply", &self.before_reply.is_some())
            .field("runs", &self.runs)
            .finish()
    }
}

impl Executable for FakeExecutable {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput> {
        self.runs.borrow_mut().push(cmd.clone());
        if let Some(hook) = self.before_reply {
            hook(cmd);
        }
        match self.timeout {
            Some(limit) => Err(Error::timeout(cmd.describe(), limit)),
            None => Ok(self.reply.clone()),
        }
    }
}
