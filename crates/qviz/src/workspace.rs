//! Scoped temporary directory for a single render call.

use std::{
    io,
    path::{Path, PathBuf},
};

use log::debug;
use tempfile::TempDir;

const PREFIX: &str = "qviz-";

/// File stem shared by every artifact in the workspace.
pub const STEM: &str = "diagram";

/// A uniquely named temporary directory holding the artifacts of one render.
///
/// The directory and everything in it is removed when the value is dropped,
/// so every exit path of a render call cleans up after itself.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a workspace in the system temporary directory.
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(PREFIX).tempdir()?;
        Ok(Self::from_dir(dir))
    }

    /// Create a workspace inside `root`.
    pub fn create_in(root: impl AsRef<Path>) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir_in(root)?;
        Ok(Self::from_dir(dir))
    }

    fn from_dir(dir: TempDir) -> Self {
        debug!(path = dir.path().display().to_string(); "Workspace created");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `diagram.tex`, the generated markup.
    pub fn markup_path(&self) -> PathBuf {
        self.artifact("tex")
    }

    /// `diagram.pdf`, written by the typesetter.
    pub fn document_path(&self) -> PathBuf {
        self.artifact("pdf")
    }

    /// `diagram.png`, written by the converter.
    pub fn image_path(&self) -> PathBuf {
        self.artifact("png")
    }

    fn artifact(&self, extension: &str) -> PathBuf {
        self.path().join(format!("{STEM}.{extension}"))
    }

    /// Remove the workspace now, reporting any failure.
    ///
    /// Dropping the workspace removes it too but ignores errors.
    pub fn close(self) -> io::Result<()> {
        let path = self.path().display().to_string();
        self.dir.close()?;
        debug!(path; "Workspace removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_artifact_names() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::create_in(root.path()).unwrap();

        assert_eq!(workspace.markup_path(), workspace.path().join("diagram.tex"));
        assert_eq!(workspace.document_path(), workspace.path().join("diagram.pdf"));
        assert_eq!(workspace.image_path(), workspace.path().join("diagram.png"));
    }

    #[test]
    fn test_unique_directories() {
        let root = tempfile::tempdir().unwrap();
        let first = Workspace::create_in(root.path()).unwrap();
        let second = Workspace::create_in(root.path()).unwrap();

        assert_ne!(first.path(), second.path());
        assert!(first.path().starts_with(root.path()));
        let name = first.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("qviz-"));
    }

    #[test]
    fn test_drop_removes_contents() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::create_in(root.path()).unwrap();
        let path = workspace.path().to_path_buf();
        fs::write(workspace.markup_path(), "\\documentclass{standalone}").unwrap();
        fs::write(workspace.image_path(), b"png").unwrap();

        drop(workspace);

        assert!(!path.exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_close_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::create_in(root.path()).unwrap();
        let path = workspace.path().to_path_buf();

        workspace.close().unwrap();
        assert!(!path.exists());
    }
}
