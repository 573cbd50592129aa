//! Error types for qviz rendering.
//!
//! This module provides the main error type [`RenderError`] covering every
//! way a render call can fail, from tool lookup to rasterization.

use std::{error::Error as StdError, io, path::PathBuf};

use thiserror::Error;

use crate::toolchain::Tool;

/// Boxed error returned by a markup generator.
pub type MarkupError = Box<dyn StdError + Send + Sync + 'static>;

/// The main error type for qviz operations.
///
/// None of these are retried. By the time a caller sees one, the
/// temporary workspace of the failed call has already been removed.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required external executable is not on the search path.
    #[error("Unable to locate '{tool}'.")]
    ToolNotFound { tool: Tool },

    /// The markup generator failed; its error is passed through as-is.
    #[error(transparent)]
    Markup(MarkupError),

    /// `pdflatex` exited unsuccessfully. The transcript is its stdout.
    #[error("{}", failure_message(Tool::Pdflatex, *status, transcript))]
    Typesetting {
        status: Option<i32>,
        transcript: String,
    },

    /// `convert` exited unsuccessfully. The transcript is its stderr.
    #[error("{}", failure_message(Tool::Convert, *status, transcript))]
    Conversion {
        status: Option<i32>,
        transcript: String,
    },

    /// `convert` reported success but left no image behind.
    #[error("'convert' exited successfully but produced no image at {}", path.display())]
    MissingImage { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RenderError {
    /// Wrap a markup generator failure.
    pub fn markup(err: impl Into<MarkupError>) -> Self {
        Self::Markup(err.into())
    }

    /// Exit code of the failed subprocess, if this error came from one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Typesetting { status, .. } | Self::Conversion { status, .. } => *status,
            _ => None,
        }
    }
}

fn failure_message(tool: Tool, status: Option<i32>, transcript: &str) -> String {
    let mut msg = match status {
        Some(code) => format!("'{tool}' terminated with return code {code}."),
        None => format!("'{tool}' terminated by a signal."),
    };
    if !transcript.is_empty() {
        msg.push_str(" Transcript:\n\n");
        msg.push_str(transcript);
    }
    msg
}
