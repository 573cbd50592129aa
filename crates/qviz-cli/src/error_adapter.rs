//! Error adapter for converting CliError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use qviz::{RenderError, toolchain::Tool};

use crate::CliError;

/// A reportable error that can be rendered by miette.
///
/// Render errors carry no source spans, so only a code and, where there is
/// something useful to say, a help message are attached.
pub struct Reportable<'a>(pub &'a CliError);

impl fmt::Debug for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Render(err) => match err {
                RenderError::ToolNotFound { .. } => "qviz::tool_not_found",
                RenderError::Markup(_) => "qviz::markup",
                RenderError::Typesetting { .. } => "qviz::typesetting",
                RenderError::Conversion { .. } | RenderError::MissingImage { .. } => {
                    "qviz::conversion"
                }
                RenderError::Io(_) => "qviz::io",
            },
            CliError::Config(_) => "qviz::config",
            CliError::Io(_) => "qviz::io",
            CliError::InvalidOption(_) => "qviz::option",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Render(RenderError::ToolNotFound { tool }) => match tool {
                Tool::Pdflatex => {
                    "install a TeX distribution with the standalone, tikz and quantikz packages \
                     and make sure 'pdflatex' is on PATH"
                }
                Tool::Convert => "install ImageMagick and make sure 'convert' is on PATH",
            },
            CliError::Render(RenderError::Typesetting { .. }) => {
                "check that the input is a standalone LaTeX document using quantikz"
            }
            CliError::Render(RenderError::Conversion { .. }) => {
                "ImageMagick may need Ghostscript and a security policy that allows reading PDF"
            }
            CliError::InvalidOption(_) => "pass options as --option width=400",
            _ => return None,
        };
        Some(Box::new(help))
    }
}
