use std::{
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::{debug, info, info_span};
use weft_codegen::Driver;
use weft_core::{
    Deadlines, Error, GeneratedFile, GenerationRequest, GenerationResult, Result, TempRoot,
    Workspace,
};
use weft_toolchain::{CargoToolchain, Executable, NativeExecutable, Toolchain, run_driver};

use crate::Stage;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files the driver reported, in the order it reported them.
    pub files: GenerationResult,
    /// Workspace left on disk, when the request asked for debug.
    pub preserved: Option<PathBuf>,
    /// Terminal stage: [`Stage::CleanedUp`] or [`Stage::Preserved`].
    pub stage: Stage,
}

/// Runs generation requests against a toolchain.
///
/// Each call to [`Orchestrator::run`] owns its own workspace, so one
/// orchestrator can serve any number of sequential runs, and separate
/// orchestrators can run concurrently against the same temp root.
#[derive(Debug)]
pub struct Orchestrator<T = CargoToolchain, E = NativeExecutable> {
    toolchain: T,
    executable: E,
    context: PathBuf,
    execute_timeout: Option<Duration>,
}

impl Orchestrator {
    /// Cargo toolchain and native processes, with the given deadlines.
    pub fn cargo(deadlines: Deadlines) -> Self {
        Self::new(
            CargoToolchain::new().timeout(deadlines.build),
            NativeExecutable::new(),
        )
        .execute_timeout(deadlines.execute)
    }
}

impl<T: Toolchain, E: Executable> Orchestrator<T, E> {
    pub fn new(toolchain: T, executable: E) -> Self {
        Self {
            toolchain,
            executable,
            context: PathBuf::from("."),
            execute_timeout: None,
        }
    }

    /// Directory the package reference, output directory and relative temp
    /// roots are resolved against. Defaults to the current directory.
    pub fn context(mut self, dir: impl Into<PathBuf>) -> Self {
        self.context = dir.into();
        self
    }

    /// Deadline for the driver process.
    pub fn execute_timeout(mut self, limit: Option<Duration>) -> Self {
        self.execute_timeout = limit;
        self
    }

    /// Run one request through the whole pipeline.
    ///
    /// On failure the workspace is removed before the error is returned,
    /// unless the request is in debug mode, in which case it is kept.
    pub fn run(&self, request: &GenerationRequest) -> Result<GenerationReport> {
        let span = info_span!(
            "generate",
            command = %request.command(),
            package = request.package()
        );
        let _enter = span.enter();

        let mut run = Run::default();
        match self.drive(request, &mut run) {
            Ok(report) => Ok(report),
            Err(err) => {
                debug!(after = %run.stage, error = %err, "generation failed");
                run.advance(Stage::Failed);
                Err(err)
            }
        }
    }

    fn drive(&self, request: &GenerationRequest, run: &mut Run) -> Result<GenerationReport> {
        let context = std::path::absolute(&self.context)
            .map_err(|e| Error::io("resolve context directory", &self.context, e))?;

        let package = self.toolchain.validate(request.package(), &context)?;
        run.advance(Stage::Validated);

        let files = Driver::new(request.command(), &package, request.output_dir()).files()?;
        let temp_root = TempRoot::resolve(request.temp_root());
        debug!(
            root = %temp_root.path().display(),
            source = %temp_root.source(),
            "resolved temp root"
        );

        let mut workspace = ScopedWorkspace::new(
            Workspace::create(&context.join(temp_root.path()))?,
            request.debug(),
        );
        if let Some(lockfile) = &package.lockfile {
            workspace.seed_lockfile(lockfile)?;
        }
        let refs: Vec<&dyn GeneratedFile> =
            files.iter().map(|f| f as &dyn GeneratedFile).collect();
        workspace.write(&refs)?;
        run.advance(Stage::Synthesized);

        let artifact = self.toolchain.compile(&workspace, &context)?;
        workspace.set_artifact(artifact.clone());
        run.advance(Stage::Compiled);

        let files = run_driver(&self.executable, &artifact, &context, self.execute_timeout)?;
        run.advance(Stage::Executed);

        let preserved = workspace.release();
        let stage = if preserved.is_some() {
            Stage::Preserved
        } else {
            Stage::CleanedUp
        };
        run.advance(stage);

        Ok(GenerationReport {
            files,
            preserved,
            stage,
        })
    }
}

#[derive(Debug, Default)]
struct Run {
    stage: Stage,
}

impl Run {
    fn advance(&mut self, to: Stage) {
        debug_assert!(
            self.stage.can_advance_to(to),
            "illegal transition {} -> {}",
            self.stage,
            to
        );
        debug!(from = %self.stage, to = %to, "stage");
        self.stage = to;
    }
}

/// Workspace that is removed when it goes out of scope, on every exit path,
/// unless it was created for a debug run.
struct ScopedWorkspace {
    workspace: Workspace,
    preserve: bool,
}

impl ScopedWorkspace {
    fn new(workspace: Workspace, preserve: bool) -> Self {
        Self {
            workspace,
            preserve,
        }
    }

    /// End the scope, returning the kept path when preserved.
    fn release(self) -> Option<PathBuf> {
        self.preserve.then(|| self.workspace.root().to_path_buf())
    }

    fn root(&self) -> &Path {
        self.workspace.root()
    }
}

impl Deref for ScopedWorkspace {
    type Target = Workspace;

    fn deref(&self) -> &Workspace {
        &self.workspace
    }
}

impl DerefMut for ScopedWorkspace {
    fn deref_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }
}

impl Drop for ScopedWorkspace {
    fn drop(&mut self) {
        if self.preserve {
            info!(workspace = %self.root().display(), "workspace preserved");
        } else {
            self.workspace.remove();
        }
    }
}
