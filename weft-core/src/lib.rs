//! Core types and utilities for the weft generation orchestrator.
//!
//! This crate provides the request and result types, the error type shared
//! by every pipeline step, configuration resolution, and the temporary
//! workspace that holds a synthesized driver crate.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod file;
mod package;
mod request;
mod workspace;

pub use config::{Deadlines, GENTEMP_ENV, TEMP_ENV, TempRoot, TempRootSource};
pub use error::{Error, Result};
pub use file::{File, GeneratedFile};
pub use package::ResolvedPackage;
pub use request::{Command, GenerationRequest, GenerationResult};
pub use workspace::{DRIVER_FILE, DRIVER_NAME, LOCKFILE, MANIFEST_FILE, Workspace};
