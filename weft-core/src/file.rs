use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Trait for types that render a file into a workspace
pub trait GeneratedFile {
    /// Get the file path relative to the base directory
    fn path(&self, base: &Path) -> PathBuf;

    /// Render the file content
    fn render(&self) -> String;

    /// Write the file to disk, returning the path written
    fn write(&self, base: &Path) -> Result<PathBuf> {
        let path = self.path(base);
        write_file(&path, &self.render())?;
        Ok(path)
    }
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io("create directory", parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| Error::io("write", path, e))?;
    Ok(())
}

/// A file with a fixed relative path and pre-rendered content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
    content: String,
}

impl File {
    /// Create a new file at `path` (relative to the base it is written into)
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Get the relative file path
    pub fn relative_path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl GeneratedFile for File {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(&self.path)
    }

    fn render(&self) -> String {
        self.content.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("main.rs");

        write_file(&path, "fn main() {}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fn main() {}");
    }

    #[test]
    fn test_write_file_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Cargo.toml");

        write_file(&path, "first").unwrap();
        write_file(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_generated_file_write_joins_base() {
        let temp = TempDir::new().unwrap();
        let file = File::new("src/main.rs", "fn main() {}\n");

        let written = file.write(temp.path()).unwrap();

        assert_eq!(written, temp.path().join("src/main.rs"));
        assert_eq!(fs::read_to_string(written).unwrap(), "fn main() {}\n");
    }

    #[test]
    fn test_write_into_file_parent_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();

        let err = File::new("blocker/main.rs", "").write(temp.path()).unwrap_err();

        assert!(matches!(*err, Error::Io { .. }));
    }
}
