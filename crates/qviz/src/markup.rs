//! The markup generator seam.
//!
//! qviz does not know how to turn a circuit into LaTeX. Circuit types plug
//! in by implementing [`ToLatex`]; the render pipeline only calls it and
//! writes whatever it returns to disk.

use crate::{config::DiagramSettings, error::MarkupError};

/// Produces a complete, standalone LaTeX document for a circuit.
///
/// The document is expected to use the `standalone` class so that
/// `pdflatex` crops the page to the diagram.
pub trait ToLatex {
    /// Generate markup for `self`.
    ///
    /// `settings` is `None` when the caller did not supply any; the
    /// implementation picks its own defaults in that case.
    ///
    /// # Errors
    ///
    /// Any error is handed back to the render caller unchanged.
    fn to_latex(&self, settings: Option<&DiagramSettings>) -> Result<String, MarkupError>;
}

impl<T: ToLatex + ?Sized> ToLatex for &T {
    fn to_latex(&self, settings: Option<&DiagramSettings>) -> Result<String, MarkupError> {
        (**self).to_latex(settings)
    }
}

/// Markup that has already been generated, rendered verbatim.
///
/// Settings are ignored since there is nothing left to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexSource(String);

impl LatexSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LatexSource {
    fn from(source: String) -> Self {
        Self(source)
    }
}

impl From<&str> for LatexSource {
    fn from(source: &str) -> Self {
        Self(source.to_string())
    }
}

impl ToLatex for LatexSource {
    fn to_latex(&self, _settings: Option<&DiagramSettings>) -> Result<String, MarkupError> {
        Ok(self.0.clone())
    }
}

impl ToLatex for str {
    fn to_latex(&self, _settings: Option<&DiagramSettings>) -> Result<String, MarkupError> {
        Ok(self.to_string())
    }
}
