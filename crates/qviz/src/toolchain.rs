//! Lookup of the external programs the render pipeline drives.
//!
//! Two tools are required: `pdflatex` to typeset the diagram markup into a
//! PDF, and ImageMagick's `convert` to rasterize that PDF into a PNG. Both
//! are resolved against a `PATH`-style search path before any work starts.

use std::{
    env,
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};

use log::{debug, trace};

use crate::error::RenderError;

/// An external program required by the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// The LaTeX typesetter that turns markup into a PDF.
    Pdflatex,
    /// ImageMagick's converter that turns the PDF into a PNG.
    Convert,
}

impl Tool {
    /// Executable name looked up on the search path.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pdflatex => "pdflatex",
            Self::Convert => "convert",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved locations of both required tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pdflatex: PathBuf,
    convert: PathBuf,
}

impl Toolchain {
    /// Create a toolchain from already resolved executable paths.
    pub fn new(pdflatex: impl Into<PathBuf>, convert: impl Into<PathBuf>) -> Self {
        Self {
            pdflatex: pdflatex.into(),
            convert: convert.into(),
        }
    }

    /// Resolve both tools against the `PATH` of the current process.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ToolNotFound`] naming the first missing tool.
    pub fn from_env() -> Result<Self, RenderError> {
        let path = env::var_os("PATH");
        Self::locate(path.as_deref())
    }

    /// Resolve both tools against an explicit search path.
    ///
    /// `pdflatex` is checked first. A `None` search path resolves nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ToolNotFound`] naming the first missing tool.
    pub fn locate(search_path: Option<&OsStr>) -> Result<Self, RenderError> {
        let resolve = |tool: Tool| {
            search_path
                .and_then(|path| find_executable(tool.name(), path))
                .ok_or(RenderError::ToolNotFound { tool })
        };

        let pdflatex = resolve(Tool::Pdflatex)?;
        let convert = resolve(Tool::Convert)?;

        debug!(
            pdflatex = pdflatex.display().to_string(),
            convert = convert.display().to_string();
            "Toolchain resolved"
        );

        Ok(Self { pdflatex, convert })
    }

    /// Path of the given tool.
    pub fn path(&self, tool: Tool) -> &Path {
        match tool {
            Tool::Pdflatex => &self.pdflatex,
            Tool::Convert => &self.convert,
        }
    }
}

/// Find the first executable called `name` in a `PATH`-style search path.
///
/// Empty entries are skipped rather than treated as the current directory.
pub fn find_executable(name: &str, search_path: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidates(&dir, name))
        .find(|candidate| {
            let found = is_executable(candidate);
            trace!(candidate = candidate.display().to_string(), found; "Probing for tool");
            found
        })
}

fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let mut paths = vec![dir.join(name)];
    if cfg!(windows) {
        paths.push(dir.join(format!("{name}.exe")));
    }
    paths
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use std::{ffi::OsString, fs};

    use super::*;

    fn write_file(dir: &Path, name: &str, executable: bool) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = if executable { 0o755 } else { 0o644 };
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        }
        #[cfg(not(unix))]
        let _ = executable;
        path
    }

    fn join(dirs: &[&Path]) -> OsString {
        env::join_paths(dirs).unwrap()
    }

    #[test]
    fn test_tool_names() {
        assert_eq!(Tool::Pdflatex.name(), "pdflatex");
        assert_eq!(Tool::Convert.name(), "convert");
        assert_eq!(Tool::Convert.to_string(), "convert");
    }

    #[test]
    fn test_prebuilt_toolchain() {
        let toolchain = Toolchain::new("/opt/tex/pdflatex", "/opt/im/convert");
        assert_eq!(toolchain.path(Tool::Pdflatex), Path::new("/opt/tex/pdflatex"));
        assert_eq!(toolchain.path(Tool::Convert), Path::new("/opt/im/convert"));
    }

    #[test]
    fn test_locate_both_tools() {
        let dir = tempfile::tempdir().unwrap();
        let pdflatex = write_file(dir.path(), "pdflatex", true);
        let convert = write_file(dir.path(), "convert", true);

        let path = join(&[dir.path()]);
        let toolchain = Toolchain::locate(Some(&path)).unwrap();

        assert_eq!(toolchain.path(Tool::Pdflatex), pdflatex);
        assert_eq!(toolchain.path(Tool::Convert), convert);
    }

    #[test]
    fn test_first_match_on_search_path_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let expected = write_file(first.path(), "pdflatex", true);
        write_file(second.path(), "pdflatex", true);

        let path = join(&[first.path(), second.path()]);
        assert_eq!(find_executable("pdflatex", &path), Some(expected));
    }

    #[test]
    fn test_missing_pdflatex_is_reported_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = join(&[dir.path()]);

        let err = Toolchain::locate(Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ToolNotFound {
                tool: Tool::Pdflatex
            }
        ));
    }

    #[test]
    fn test_missing_convert() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "pdflatex", true);
        let path = join(&[dir.path()]);

        let err = Toolchain::locate(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("convert"));
    }

    #[test]
    fn test_no_search_path() {
        let err = Toolchain::locate(None).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ToolNotFound {
                tool: Tool::Pdflatex
            }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_skipped() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_file(first.path(), "convert", false);
        let expected = write_file(second.path(), "convert", true);

        let path = join(&[first.path(), second.path()]);
        assert_eq!(find_executable("convert", &path), Some(expected));
    }

    #[test]
    fn test_directory_is_not_an_executable() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("pdflatex")).unwrap();

        let path = join(&[dir.path()]);
        assert_eq!(find_executable("pdflatex", &path), None);
    }
}
