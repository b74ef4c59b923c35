//! Driver synthesis for weft.
//!
//! This crate renders the small binary crate that imports a design package
//! and calls its generation entry point.
//!
//! # Module Organization
//!
//! - [`CodeBuilder`] - Fluent API for building indented code
//! - [`Driver`] - The synthesized driver crate (`Cargo.toml` and `src/main.rs`)
//! - [`rust_str`] - Escaping values as Rust string literals

mod code_builder;
mod driver;
mod literal;

pub use code_builder::{CodeBuilder, Indent};
pub use driver::{DEPENDENCY_ALIAS, Driver, ENTRY_POINT};
pub use literal::rust_str;
