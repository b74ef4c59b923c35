//! End-to-end runs against the real cargo toolchain.
//!
//! Each test writes a small design crate into a temp directory, points the
//! orchestrator at it and checks what ends up on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;
use weft_core::{Command, DRIVER_FILE, Deadlines, Error, GenerationRequest};
use weft_pipeline::{Orchestrator, Stage};

const MANIFEST: &str = r#"[package]
name = "petstore-design"
version = "0.1.0"
edition = "2021"
publish = false

[workspace]
"#;

const GENERATOR: &str = r#"use std::fs;
use std::path::{Path, PathBuf};

pub fn generate(mode: &str, output: &Path) -> Result<Vec<PathBuf>, String> {
    let names: &[&str] = match mode {
        "gen" => &["pets.go", "owners.go"],
        "example" => &["example.go"],
        other => return Err(format!("unknown mode {other}")),
    };
    fs::create_dir_all(output).map_err(|e| e.to_string())?;
    let mut written = Vec::new();
    for name in names {
        let path = output.join(name);
        fs::write(&path, format!("// {mode}\n")).map_err(|e| e.to_string())?;
        written.push(path);
    }
    Ok(written)
}
"#;

struct Project {
    dir: TempDir,
}

impl Project {
    fn with_lib(source: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let design = dir.path().join("design");
        fs::create_dir_all(design.join("src")).unwrap();
        fs::write(design.join("Cargo.toml"), MANIFEST).unwrap();
        fs::write(design.join("src/lib.rs"), source).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn scratch(&self) -> PathBuf {
        self.root().join("scratch")
    }

    fn orchestrator(&self) -> Orchestrator {
        Orchestrator::cargo(Deadlines::default()).context(self.root())
    }

    fn request(&self, command: Command, package: &str) -> GenerationRequest {
        GenerationRequest::new(command, package)
            .with_output_dir("gen")
            .with_temp_root(Some(self.scratch()))
    }

    fn leftovers(&self) -> usize {
        fs::read_dir(self.scratch()).map_or(0, |entries| entries.count())
    }
}

#[test]
fn test_generates_files_in_emitted_order() {
    let project = Project::with_lib(GENERATOR);

    let report = project
        .orchestrator()
        .run(&project.request(Command::Gen, "design"))
        .unwrap();

    assert_eq!(report.stage, Stage::CleanedUp);
    assert_eq!(
        report.files.files(),
        [PathBuf::from("gen/pets.go"), PathBuf::from("gen/owners.go")]
    );
    assert_eq!(
        fs::read_to_string(project.root().join("gen/pets.go")).unwrap(),
        "// gen\n"
    );
    assert_eq!(project.leftovers(), 0);
}

#[test]
fn test_example_mode_reaches_generator() {
    let project = Project::with_lib(GENERATOR);

    let report = project
        .orchestrator()
        .run(&project.request(Command::Example, "design/Cargo.toml"))
        .unwrap();

    assert_eq!(report.files.to_string(), "gen/example.go");
    assert_eq!(
        fs::read_to_string(project.root().join("gen/example.go")).unwrap(),
        "// example\n"
    );
}

#[test]
fn test_wrong_signature_is_a_compile_error() {
    let project = Project::with_lib("pub fn generate() {}\n");

    let err = project
        .orchestrator()
        .run(&project.request(Command::Gen, "design"))
        .unwrap_err();

    assert!(matches!(*err, Error::Compile { .. }), "{err:?}");
    assert!(err.to_string().contains("error"));
    assert_eq!(project.leftovers(), 0);
}

#[test]
fn test_generator_error_in_debug_keeps_driver() {
    let project = Project::with_lib(
        r#"use std::path::{Path, PathBuf};

pub fn generate(_mode: &str, _output: &Path) -> Result<Vec<PathBuf>, String> {
    Err("no services defined".to_string())
}
"#,
    );

    let err = project
        .orchestrator()
        .run(&project.request(Command::Gen, "design").with_debug(true))
        .unwrap_err();

    assert!(matches!(*err, Error::Runtime { .. }), "{err:?}");
    assert_eq!(err.to_string(), "no services defined");
    let kept: Vec<PathBuf> = fs::read_dir(project.scratch())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(kept.len(), 1);
    assert!(kept[0].join(DRIVER_FILE).is_file());
}

#[test]
fn test_missing_package_fails_before_any_workspace() {
    let project = Project::with_lib(GENERATOR);

    let err = project
        .orchestrator()
        .run(&project.request(Command::Gen, "nope"))
        .unwrap_err();

    assert!(matches!(*err, Error::Resolution { .. }), "{err:?}");
    assert!(!err.to_string().is_empty());
    assert!(!project.scratch().exists());
}
