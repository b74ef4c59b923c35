use std::path::{Path, PathBuf};

/// A design package the toolchain has confirmed it can build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// Package name as declared in its manifest.
    pub name: String,
    /// Absolute path to the package's `Cargo.toml`.
    pub manifest_path: PathBuf,
    /// Lockfile of the package's workspace, when it has one.
    pub lockfile: Option<PathBuf>,
}

impl ResolvedPackage {
    pub fn new(name: impl Into<String>, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            manifest_path: manifest_path.into(),
            lockfile: None,
        }
    }

    pub fn with_lockfile(mut self, lockfile: Option<PathBuf>) -> Self {
        self.lockfile = lockfile;
        self
    }

    /// Directory containing the package manifest.
    pub fn manifest_dir(&self) -> &Path {
        self.manifest_path.parent().unwrap_or(Path::new("."))
    }
}
