//! Cargo as the host toolchain.

use std::{
    env::consts::EXE_SUFFIX,
    ffi::{OsStr, OsString},
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::debug;
use weft_core::{
    DRIVER_NAME, Error, LOCKFILE, MANIFEST_FILE, ResolvedPackage, Result, Workspace,
};

use crate::{CommandSpec, Executable, NativeExecutable, Toolchain};

/// Environment variable naming the cargo binary (set by cargo for its children).
pub const CARGO_ENV: &str = "CARGO";

/// Resolves design packages with `cargo metadata` and builds drivers with
/// `cargo build`.
#[derive(Debug, Clone)]
pub struct CargoToolchain<E = NativeExecutable> {
    cargo: OsString,
    executable: E,
    timeout: Option<Duration>,
}

impl CargoToolchain {
    /// Use the cargo named by `$CARGO`, else `cargo` from `PATH`.
    pub fn new() -> Self {
        let cargo = std::env::var_os(CARGO_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| OsString::from("cargo"));
        Self::with_executable(cargo, NativeExecutable::new())
    }
}

impl Default for CargoToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Executable> CargoToolchain<E> {
    pub fn with_executable(cargo: impl Into<OsString>, executable: E) -> Self {
        Self {
            cargo: cargo.into(),
            executable,
            timeout: None,
        }
    }

    /// Deadline applied to every cargo invocation.
    pub fn timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    fn cargo(&self, context: &Path) -> CommandSpec {
        CommandSpec::new(&self.cargo)
            .cwd(context)
            .timeout(self.timeout)
    }
}

impl<E: Executable> Toolchain for CargoToolchain<E> {
    fn validate(&self, package: &str, context: &Path) -> Result<ResolvedPackage> {
        if package.trim().is_empty() {
            return Err(Error::resolution(package, "error: package reference is empty"));
        }

        let manifest = manifest_path(package, context);
        let cmd = self
            .cargo(context)
            .args(["metadata", "--format-version", "1", "--no-deps", "--color", "never"])
            .arg("--manifest-path")
            .arg(&manifest);

        let output = self.executable.run(&cmd)?;
        if !output.success() {
            return Err(Error::resolution(package, output.stderr_string()));
        }

        let metadata: Metadata = serde_json::from_slice(&output.stdout).map_err(|e| {
            Error::resolution(package, format!("error: unreadable `cargo metadata` output: {e}"))
        })?;

        let resolved = metadata.resolve(package, &manifest)?;
        debug!(
            package = %resolved.name,
            manifest = %resolved.manifest_path.display(),
            "resolved design package"
        );
        Ok(resolved)
    }

    fn compile(&self, workspace: &Workspace, context: &Path) -> Result<PathBuf> {
        let cmd = self
            .cargo(context)
            .args(["build", "--quiet", "--color", "never", "--manifest-path"])
            .arg(workspace.manifest_path())
            .arg("--target-dir")
            .arg(workspace.target_dir());

        let output = self.executable.run(&cmd)?;
        if !output.success() {
            return Err(Error::compile(output.stderr_string()));
        }

        Ok(workspace
            .target_dir()
            .join("debug")
            .join(format!("{DRIVER_NAME}{EXE_SUFFIX}")))
    }
}

/// Accept either a crate directory or a path to its manifest, relative to `context`.
fn manifest_path(package: &str, context: &Path) -> PathBuf {
    let path = context.join(package);
    if path.file_name() == Some(OsStr::new(MANIFEST_FILE)) {
        path
    } else {
        path.join(MANIFEST_FILE)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// The subset of `cargo metadata --format-version 1` weft reads.
#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<MetadataPackage>,
    workspace_root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct MetadataPackage {
    name: String,
    manifest_path: PathBuf,
    targets: Vec<MetadataTarget>,
}

#[derive(Debug, Deserialize)]
struct MetadataTarget {
    kind: Vec<String>,
}

impl MetadataPackage {
    fn has_library(&self) -> bool {
        self.targets
            .iter()
            .flat_map(|t| &t.kind)
            .any(|k| k == "lib" || k == "rlib")
    }
}

impl Metadata {
    fn resolve(self, package: &str, manifest: &Path) -> Result<ResolvedPackage> {
        let found = self
            .packages
            .into_iter()
            .find(|p| same_file(&p.manifest_path, manifest))
            .ok_or_else(|| {
                Error::resolution(
                    package,
                    format!(
                        "error: no package is defined by `{}` (virtual workspace manifest?)",
                        manifest.display()
                    ),
                )
            })?;

        if !found.has_library() {
            return Err(Error::resolution(
                package,
                format!("error: package `{}` has no library target", found.name),
            ));
        }

        let lockfile = self.workspace_root.join(LOCKFILE);
        let lockfile = lockfile.is_file().then_some(lockfile);

        Ok(ResolvedPackage::new(found.name, found.manifest_path).with_lockfile(lockfile))
    }
}
