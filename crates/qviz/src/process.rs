//! Subprocess execution behind a mockable seam.
//!
//! The render pipeline never spawns processes directly. It describes each
//! external call as an [`Invocation`] and hands it to a [`CommandRunner`],
//! which reports back a [`ProcessOutput`]. [`SystemRunner`] is the real
//! implementation; tests substitute their own.

use std::{
    borrow::Cow,
    ffi::{OsStr, OsString},
    io,
    path::PathBuf,
    process::{Command, Stdio},
};

use log::debug;

/// Which output stream of the child is captured.
///
/// The other stream is inherited from the parent process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Stdout,
    Stderr,
}

/// A single external program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    capture: Capture,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, capture: Capture) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            capture,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn capture(&self) -> Capture {
        self.capture
    }
}

/// Result of running an [`Invocation`] to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    /// Exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The captured stream of `capture`, decoded lossily as UTF-8.
    pub fn transcript(&self, capture: Capture) -> Cow<'_, str> {
        let bytes = match capture {
            Capture::Stdout => &self.stdout,
            Capture::Stderr => &self.stderr,
        };
        String::from_utf8_lossy(bytes)
    }
}

/// Runs external programs on behalf of the render pipeline.
pub trait CommandRunner {
    /// Run `invocation` to completion, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// Returns an I/O error only when the process could not be run at all.
    /// A non-zero exit is reported through [`ProcessOutput::code`].
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        (**self).run(invocation)
    }
}

/// [`CommandRunner`] that spawns real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        debug!(
            program = invocation.program().display().to_string(),
            args:? = invocation.args();
            "Spawning process"
        );

        let (stdout, stderr) = match invocation.capture() {
            Capture::Stdout => (Stdio::piped(), Stdio::inherit()),
            Capture::Stderr => (Stdio::inherit(), Stdio::piped()),
        };

        let output = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .output()?;

        debug!(code:? = output.status.code(); "Process exited");

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
