//! qviz - Render quantum circuit diagrams to PNG.
//!
//! Circuits are described as quantikz LaTeX by a [`ToLatex`] implementation.
//! qviz typesets that markup with `pdflatex`, rasterizes the PDF with
//! ImageMagick's `convert`, and returns the PNG as an [`Image`] ready for a
//! notebook front-end. Both programs must be installed and on the `PATH`,
//! and the LaTeX installation needs the `standalone`, `tikz` and `quantikz`
//! packages.

pub mod config;
pub mod image;
pub mod markup;
pub mod process;
pub mod toolchain;
pub mod workspace;

mod error;

pub use error::{MarkupError, RenderError};
pub use image::{Image, ImageFormat, ImageOptions, OptionValue};
pub use markup::{LatexSource, ToLatex};

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use config::DiagramSettings;
use process::{Capture, CommandRunner, Invocation, ProcessOutput, SystemRunner};
use toolchain::{Tool, Toolchain};
use workspace::Workspace;

/// Rendering density passed to `convert`, in dots per inch.
pub const DENSITY: u32 = 300;

/// Render a circuit with the system tools found on `PATH`.
///
/// Shorthand for [`Renderer::new`] followed by [`Renderer::render`].
///
/// # Examples
///
/// ```rust,no_run
/// use qviz::{ImageOptions, LatexSource};
///
/// let circuit = LatexSource::new(std::fs::read_to_string("bell.tex").unwrap());
/// let image = qviz::display(&circuit, None, ImageOptions::new().with("width", 400))
///     .expect("Failed to render");
/// assert_eq!(image.mime_type(), "image/png");
/// ```
pub fn display<C>(
    circuit: &C,
    settings: Option<&DiagramSettings>,
    options: ImageOptions,
) -> Result<Image, RenderError>
where
    C: ToLatex + ?Sized,
{
    Renderer::new().render(circuit, settings, options)
}

/// Where tools are looked up.
#[derive(Debug, Clone, Default)]
enum SearchPath {
    /// The `PATH` of the current process, read on every render.
    #[default]
    Env,
    Explicit(OsString),
}

/// Drives markup through `pdflatex` and `convert`.
///
/// A renderer holds no per-call state, so one value can serve any number of
/// renders, concurrently if its runner allows it. Each call gets its own
/// [`Workspace`], which is removed before the call returns.
///
/// # Examples
///
/// ```rust,no_run
/// use qviz::{ImageOptions, LatexSource, Renderer, config::DiagramSettings};
///
/// let renderer = Renderer::new().with_search_path("/usr/local/texlive/bin:/usr/bin");
/// let settings = DiagramSettings::default().with_impute_missing_qubits(true);
///
/// let circuit = LatexSource::new(r"\documentclass{standalone}...");
/// let image = renderer
///     .render(&circuit, Some(&settings), ImageOptions::new())
///     .expect("Failed to render");
/// image.save("circuit.png").expect("Failed to save");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Renderer<R = SystemRunner> {
    runner: R,
    search_path: SearchPath,
    temp_root: Option<PathBuf>,
}

impl Renderer {
    /// Create a renderer that spawns real processes and searches `PATH`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: CommandRunner> Renderer<R> {
    /// Replace the process runner.
    pub fn with_runner<T: CommandRunner>(self, runner: T) -> Renderer<T> {
        Renderer {
            runner,
            search_path: self.search_path,
            temp_root: self.temp_root,
        }
    }

    /// Look tools up in `search_path` instead of the process `PATH`.
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = SearchPath::Explicit(search_path.into());
        self
    }

    /// Create workspaces under `root` instead of the system temp directory.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Render `circuit` to a PNG image.
    ///
    /// Tools are resolved before anything else happens, so a missing tool
    /// leaves no trace on disk. `settings` goes to the markup generator
    /// unchanged and `options` ends up on the returned [`Image`] unchanged.
    ///
    /// # Errors
    ///
    /// - [`RenderError::ToolNotFound`] if `pdflatex` or `convert` is missing.
    /// - [`RenderError::Markup`] with the generator's own error.
    /// - [`RenderError::Typesetting`] if `pdflatex` exits non-zero.
    /// - [`RenderError::Conversion`] if `convert` exits non-zero.
    /// - [`RenderError::MissingImage`] if `convert` succeeds without output.
    /// - [`RenderError::Io`] for workspace and process spawning failures.
    pub fn render<C>(
        &self,
        circuit: &C,
        settings: Option<&DiagramSettings>,
        options: ImageOptions,
    ) -> Result<Image, RenderError>
    where
        C: ToLatex + ?Sized,
    {
        let toolchain = self.toolchain()?;

        info!("Generating diagram markup");
        let markup = circuit.to_latex(settings).map_err(RenderError::Markup)?;
        trace!(markup; "Generated markup");

        let workspace = self.workspace()?;
        fs::write(workspace.markup_path(), &markup)?;

        info!("Typesetting diagram");
        self.typeset(&toolchain, &workspace)?;

        info!(density = DENSITY; "Rasterizing diagram");
        self.rasterize(&toolchain, &workspace)?;

        let image_path = workspace.image_path();
        if !image_path.is_file() {
            return Err(RenderError::MissingImage { path: image_path });
        }
        let data = fs::read(&image_path)?;

        info!(bytes = data.len(); "Diagram rendered");
        Ok(Image::new(data, options))
    }

    fn toolchain(&self) -> Result<Toolchain, RenderError> {
        match &self.search_path {
            SearchPath::Env => Toolchain::from_env(),
            SearchPath::Explicit(path) => Toolchain::locate(Some(path.as_os_str())),
        }
    }

    fn workspace(&self) -> Result<Workspace, RenderError> {
        let workspace = match &self.temp_root {
            Some(root) => Workspace::create_in(root)?,
            None => Workspace::create()?,
        };
        Ok(workspace)
    }

    fn typeset(&self, toolchain: &Toolchain, workspace: &Workspace) -> Result<(), RenderError> {
        let invocation = Invocation::new(toolchain.path(Tool::Pdflatex), Capture::Stdout)
            .arg("-halt-on-error")
            .arg("-output-directory")
            .arg(workspace.path())
            .arg(workspace.markup_path());

        let output = self.run(&invocation)?;
        if !output.success() {
            return Err(RenderError::Typesetting {
                status: output.code,
                transcript: output.transcript(Capture::Stdout).into_owned(),
            });
        }
        Ok(())
    }

    fn rasterize(&self, toolchain: &Toolchain, workspace: &Workspace) -> Result<(), RenderError> {
        let invocation = Invocation::new(toolchain.path(Tool::Convert), Capture::Stderr)
            .arg("-density")
            .arg(DENSITY.to_string())
            .arg(workspace.document_path())
            .arg(workspace.image_path());

        let output = self.run(&invocation)?;
        if !output.success() {
            return Err(RenderError::Conversion {
                status: output.code,
                transcript: output.transcript(Capture::Stderr).into_owned(),
            });
        }
        Ok(())
    }

    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, RenderError> {
        let output = self.runner.run(invocation)?;
        debug!(
            program = display_name(invocation.program()),
            code:? = output.code;
            "Tool finished"
        );
        Ok(output)
    }
}

fn display_name(program: &Path) -> String {
    program
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, ffi::OsStr, io};

    use super::*;

    /// Runner that answers every call with a canned output and records it.
    struct CannedRunner {
        outputs: RefCell<Vec<ProcessOutput>>,
        calls: RefCell<Vec<Invocation>>,
    }

    impl CannedRunner {
        fn new(outputs: Vec<ProcessOutput>) -> Self {
            Self {
                outputs: RefCell::new(outputs),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for CannedRunner {
        fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
            self.calls.borrow_mut().push(invocation.clone());
            let mut outputs = self.outputs.borrow_mut();
            if outputs.is_empty() {
                return Err(io::Error::other("unexpected call"));
            }
            Ok(outputs.remove(0))
        }
    }

    fn tools_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in ["pdflatex", "convert"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "").unwrap();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            }
        }
        dir
    }

    fn exit(code: i32, stdout: &str) -> ProcessOutput {
        ProcessOutput {
            code: Some(code),
            stdout: stdout.as_bytes().to_vec(),
            stderr: Vec::new(),
        }
    }

    #[test]
    fn test_typesetting_arguments() {
        let tools = tools_dir();
        let runner = CannedRunner::new(vec![exit(1, "")]);
        let renderer = Renderer::new()
            .with_search_path(tools.path())
            .with_runner(&runner);

        let err = renderer
            .render("\\documentclass{standalone}", None, ImageOptions::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::Typesetting { .. }));

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.program(), &tools.path().join("pdflatex"));
        assert_eq!(call.capture(), Capture::Stdout);
        assert_eq!(call.args()[0], "-halt-on-error");
        assert_eq!(call.args()[1], "-output-directory");
        let workspace = Path::new(&call.args()[2]);
        assert_eq!(
            Path::new(&call.args()[3]),
            workspace.join("diagram.tex").as_path()
        );
        assert!(!workspace.exists());
    }

    #[test]
    fn test_conversion_arguments() {
        let tools = tools_dir();
        let runner = CannedRunner::new(vec![exit(0, ""), exit(0, "")]);
        let renderer = Renderer::new()
            .with_search_path(tools.path())
            .with_runner(&runner);

        let err = renderer
            .render("markup", None, ImageOptions::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingImage { .. }));

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 2);
        let call = &calls[1];
        assert_eq!(call.program(), &tools.path().join("convert"));
        assert_eq!(call.capture(), Capture::Stderr);
        assert_eq!(call.args()[0], "-density");
        assert_eq!(call.args()[1], "300");
        let pdf = Path::new(&call.args()[2]);
        let png = Path::new(&call.args()[3]);
        assert_eq!(pdf.file_name(), Some(OsStr::new("diagram.pdf")));
        assert_eq!(png.file_name(), Some(OsStr::new("diagram.png")));
        assert_eq!(pdf.parent(), png.parent());
    }

    #[test]
    fn test_spawn_failure_is_io_error() {
        let tools = tools_dir();
        let runner = CannedRunner::new(Vec::new());
        let renderer = Renderer::new()
            .with_search_path(tools.path())
            .with_runner(&runner);

        let err = renderer
            .render("markup", None, ImageOptions::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/usr/bin/pdflatex")), "pdflatex");
        assert_eq!(display_name(Path::new("/")), "/");
    }
}
