//! Isolated temporary directory holding one run's driver crate.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{Error, GeneratedFile, Result};

/// Package and binary name of the synthesized driver crate.
pub const DRIVER_NAME: &str = "weft-driver";

/// Driver crate manifest, relative to the workspace root.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Driver entry point, relative to the workspace root.
pub const DRIVER_FILE: &str = "src/main.rs";

/// Lockfile name, relative to the workspace root.
pub const LOCKFILE: &str = "Cargo.lock";

const DIR_PREFIX: &str = "weft-";

/// A uniquely named directory owned by a single orchestration run.
///
/// The directory is not removed on drop; the owner decides between
/// [`Workspace::remove`] and keeping it for inspection.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    artifact: Option<PathBuf>,
}

impl Workspace {
    /// Allocate a fresh directory under `temp_root`, creating the root if needed.
    ///
    /// Every call yields a distinct directory, so concurrent runs sharing a
    /// temp root never collide.
    pub fn create(temp_root: &Path) -> Result<Self> {
        fs::create_dir_all(temp_root)
            .map_err(|e| Error::io("create temp root", temp_root, e))?;

        let root = tempfile::Builder::new()
            .prefix(DIR_PREFIX)
            .tempdir_in(temp_root)
            .map_err(|e| Error::io("create workspace in", temp_root, e))?
            .keep();

        debug!(workspace = %root.display(), "created workspace");
        Ok(Self {
            root,
            artifact: None,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn driver_path(&self) -> PathBuf {
        self.root.join(DRIVER_FILE)
    }

    /// Cargo target directory, kept inside the workspace so it is removed with it.
    pub fn target_dir(&self) -> PathBuf {
        self.root.join("target")
    }

    /// The built driver executable, once the build step has run.
    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    pub fn set_artifact(&mut self, path: PathBuf) {
        self.artifact = Some(path);
    }

    /// Materialize generated files into the workspace.
    pub fn write(&self, files: &[&dyn GeneratedFile]) -> Result<()> {
        for file in files {
            let path = file.write(&self.root)?;
            debug!(file = %path.display(), "wrote workspace file");
        }
        Ok(())
    }

    /// Copy an existing lockfile in so the driver resolves the same versions
    /// the design package was built with.
    pub fn seed_lockfile(&self, lockfile: &Path) -> Result<()> {
        let dest = self.root.join(LOCKFILE);
        fs::copy(lockfile, &dest).map_err(|e| Error::io("copy lockfile", lockfile, e))?;
        debug!(lockfile = %lockfile.display(), "seeded workspace lockfile");
        Ok(())
    }

    /// Delete the workspace tree.
    ///
    /// Best-effort: failures are logged and reported through the return
    /// value, never as an error, so they cannot mask the run's outcome.
    pub fn remove(&self) -> bool {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                debug!(workspace = %self.root.display(), "removed workspace");
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => {
                warn!(
                    workspace = %self.root.display(),
                    error = %e,
                    "failed to remove workspace"
                );
                false
            }
        }
    }
}
