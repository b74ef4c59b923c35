//! Host toolchain capabilities for weft.
//!
//! Two narrow seams keep the orchestrator independent of any particular
//! compiler invocation:
//!
//! - [`Toolchain`] resolves design packages and builds driver crates
//!   ([`CargoToolchain`] is the cargo implementation).
//! - [`Executable`] runs a subprocess and captures its output
//!   ([`NativeExecutable`] spawns real processes).
//!
//! [`run_driver`] is the execution step built on top of [`Executable`].

mod cargo;
mod command;
mod execute;
mod process;

use std::path::{Path, PathBuf};

pub use cargo::{CARGO_ENV, CargoToolchain};
pub use command::CommandSpec;
pub use execute::{parse_listing, run_driver};
pub use process::{Executable, NativeExecutable, ProcessOutput};
use weft_core::{ResolvedPackage, Result, Workspace};

/// Resolution and compilation against the host build system.
pub trait Toolchain {
    /// Confirm `package` can be imported from `context`, without side effects.
    ///
    /// Failures carry the resolver's own diagnostic.
    fn validate(&self, package: &str, context: &Path) -> Result<ResolvedPackage>;

    /// Build the driver crate in `workspace` from `context`, returning the
    /// path of the produced executable.
    ///
    /// Failures carry the compiler's own diagnostic.
    fn compile(&self, workspace: &Workspace, context: &Path) -> Result<PathBuf>;
}

impl<T: Toolchain + ?Sized> Toolchain for &T {
    fn validate(&self, package: &str, context: &Path) -> Result<ResolvedPackage> {
        (**self).validate(package, context)
    }

    fn compile(&self, workspace: &Workspace, context: &Path) -> Result<PathBuf> {
        (**self).compile(workspace, context)
    }
}
