//! The synthesized driver crate.
//!
//! A driver is a two-file binary crate: a manifest that depends on the design
//! package under a fixed alias, and a `main` that calls the package's entry
//! point and prints every returned path on its own line, in order.

use std::path::Path;

use toml::{Table, Value};
use weft_core::{
    Command, DRIVER_FILE, DRIVER_NAME, Error, File, MANIFEST_FILE, ResolvedPackage, Result,
};

use crate::{CodeBuilder, rust_str};

/// Function the design package must export.
///
/// Expected shape: `fn generate(mode: &str, output: &Path) -> Result<I, E>`
/// where `I: IntoIterator`, items are `AsRef<Path>`, and `E: Display`.
pub const ENTRY_POINT: &str = "generate";

/// Name the design package is imported under inside the driver.
pub const DEPENDENCY_ALIAS: &str = "design";

const DRIVER_EDITION: &str = "2021";

/// Driver crate for one generation request.
#[derive(Debug, Clone, Copy)]
pub struct Driver<'a> {
    command: Command,
    package: &'a ResolvedPackage,
    output_dir: &'a Path,
}

impl<'a> Driver<'a> {
    pub fn new(command: Command, package: &'a ResolvedPackage, output_dir: &'a Path) -> Self {
        Self {
            command,
            package,
            output_dir,
        }
    }

    /// Render both driver files, ready to be written into a workspace.
    pub fn files(&self) -> Result<Vec<File>> {
        Ok(vec![
            File::new(MANIFEST_FILE, self.render_manifest()?),
            File::new(DRIVER_FILE, self.render_main()?),
        ])
    }

    /// Render `src/main.rs`.
    pub fn render_main(&self) -> Result<String> {
        let output = self
            .output_dir
            .to_str()
            .ok_or_else(|| Error::invalid_path("output directory", self.output_dir))?;

        let call = format!(
            "let files = match {DEPENDENCY_ALIAS}::{ENTRY_POINT}({}, output) {{",
            rust_str(self.command.as_str())
        );

        let code = CodeBuilder::rust()
            .line("// Generated by weft. Do not edit.")
            .blank()
            .each(
                [
                    "use std::io::Write;",
                    "use std::path::Path;",
                    "use std::process::ExitCode;",
                ],
                |b, l| b.line(l),
            )
            .blank()
            .block_with_close("fn main() -> ExitCode {", "}", |b| {
                b.line(&format!("let output = Path::new({});", rust_str(output)))
                    .block_with_close(&call, "};", |b| {
                        b.line("Ok(files) => files,").block_with_close(
                            "Err(err) => {",
                            "}",
                            |b| {
                                b.line("eprintln!(\"{err}\");")
                                    .line("return ExitCode::FAILURE;")
                            },
                        )
                    })
                    .line("let mut stdout = std::io::stdout().lock();")
                    .block_with_close("for file in files {", "}", |b| {
                        b.line("let path: &Path = file.as_ref();").block_with_close(
                            "if writeln!(stdout, \"{}\", path.display()).is_err() {",
                            "}",
                            |b| b.line("return ExitCode::FAILURE;"),
                        )
                    })
                    .line("ExitCode::SUCCESS")
            })
            .build();

        Ok(code)
    }

    /// Render `Cargo.toml`.
    ///
    /// The empty `[workspace]` table keeps the driver out of any workspace
    /// that happens to enclose the temp root.
    pub fn render_manifest(&self) -> Result<String> {
        let dir = self.package.manifest_dir();
        let dir = dir
            .to_str()
            .ok_or_else(|| Error::invalid_path("design package path", dir))?;

        let mut package = Table::new();
        package.insert("name".into(), DRIVER_NAME.into());
        package.insert("version".into(), "0.0.0".into());
        package.insert("edition".into(), DRIVER_EDITION.into());
        package.insert("publish".into(), false.into());

        let mut bin = Table::new();
        bin.insert("name".into(), DRIVER_NAME.into());
        bin.insert("path".into(), DRIVER_FILE.into());

        let mut design = Table::new();
        design.insert("path".into(), dir.into());
        design.insert("package".into(), self.package.name.as_str().into());

        let mut dependencies = Table::new();
        dependencies.insert(DEPENDENCY_ALIAS.into(), Value::Table(design));

        let mut manifest = Table::new();
        manifest.insert("package".into(), Value::Table(package));
        manifest.insert("bin".into(), Value::Array(vec![Value::Table(bin)]));
        manifest.insert("dependencies".into(), Value::Table(dependencies));
        manifest.insert("workspace".into(), Value::Table(Table::new()));

        Ok(manifest.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn package() -> ResolvedPackage {
        ResolvedPackage::new("petstore-design", "/src/petstore/design/Cargo.toml")
    }

    #[test]
    fn test_main_for_gen() {
        let pkg = package();
        let main = Driver::new(Command::Gen, &pkg, Path::new("gen"))
            .render_main()
            .unwrap();

        insta::assert_snapshot!(main, @r#"
        // Generated by weft. Do not edit.

        use std::io::Write;
        use std::path::Path;
        use std::process::ExitCode;

        fn main() -> ExitCode {
            let output = Path::new("gen");
            let files = match design::generate("gen", output) {
                Ok(files) => files,
                Err(err) => {
                    eprintln!("{err}");
                    return ExitCode::FAILURE;
                }
            };
            let mut stdout = std::io::stdout().lock();
            for file in files {
                let path: &Path = file.as_ref();
                if writeln!(stdout, "{}", path.display()).is_err() {
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        "#);
    }

    #[test]
    fn test_main_selects_example_mode() {
        let pkg = package();
        let main = Driver::new(Command::Example, &pkg, Path::new("."))
            .render_main()
            .unwrap();

        assert!(main.contains("design::generate(\"example\", output)"));
        assert!(main.contains("Path::new(\".\")"));
    }

    #[test]
    fn test_main_escapes_output_dir() {
        let pkg = package();
        let out = PathBuf::from("out\"); panic!(\"");
        let main = Driver::new(Command::Gen, &pkg, &out).render_main().unwrap();

        assert!(main.contains(r#"Path::new("out\"); panic!(\"");"#));
    }

    #[test]
    fn test_manifest_points_at_design_package() {
        let pkg = package();
        let manifest = Driver::new(Command::Gen, &pkg, Path::new("."))
            .render_manifest()
            .unwrap();
        let parsed: Table = toml::from_str(&manifest).unwrap();

        assert_eq!(parsed["package"]["name"].as_str(), Some(DRIVER_NAME));
        assert_eq!(parsed["bin"][0]["path"].as_str(), Some(DRIVER_FILE));
        let design = &parsed["dependencies"][DEPENDENCY_ALIAS];
        assert_eq!(design["path"].as_str(), Some("/src/petstore/design"));
        assert_eq!(design["package"].as_str(), Some("petstore-design"));
        assert!(parsed["workspace"].as_table().unwrap().is_empty());
    }

    #[test]
    fn test_manifest_quotes_awkward_paths() {
        let pkg = ResolvedPackage::new("d", r#"/tmp/it's "quoted"\dir/Cargo.toml"#);
        let manifest = Driver::new(Command::Gen, &pkg, Path::new("."))
            .render_manifest()
            .unwrap();
        let parsed: Table = toml::from_str(&manifest).unwrap();

        assert_eq!(
            parsed["dependencies"][DEPENDENCY_ALIAS]["path"].as_str(),
            Some(r#"/tmp/it's "quoted"\dir"#)
        );
    }

    #[test]
    fn test_files_layout() {
        let pkg = package();
        let files = Driver::new(Command::Gen, &pkg, Path::new("."))
            .files()
            .unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.relative_path()).collect();
        assert_eq!(paths, [Path::new(MANIFEST_FILE), Path::new(DRIVER_FILE)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_output_dir_is_rejected() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let pkg = package();
        let out = Path::new(OsStr::from_bytes(b"gen\xff"));
        let err = Driver::new(Command::Gen, &pkg, out).render_main().unwrap_err();

        assert!(matches!(*err, Error::InvalidPath { .. }));
    }
}
