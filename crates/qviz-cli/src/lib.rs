//! CLI logic for the qviz circuit renderer.
//!
//! Reads a quantikz LaTeX file, renders it to PNG through the qviz
//! pipeline, and writes the image to disk.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::ConfigError;

use std::{fs, io};

use log::info;
use thiserror::Error;

use qviz::{ImageOptions, LatexSource, OptionValue, RenderError, Renderer};

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid display option '{0}', expected KEY=VALUE")]
    InvalidOption(String),
}

/// Run the qviz CLI application
///
/// Renders the input file and writes the resulting PNG to the output file.
///
/// # Errors
///
/// Returns `CliError` for:
/// - Malformed `--option` values
/// - Configuration loading errors
/// - File I/O errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let options = parse_options(&args.options)?;

    let app_config = config::load_config(args.config.as_ref())?;

    let source = LatexSource::new(fs::read_to_string(&args.input)?);

    let image = Renderer::new().render(&source, Some(app_config.diagram()), options)?;

    image.save(&args.output)?;

    for (key, value) in image.options().iter() {
        info!(key, value = value.to_string(); "Display option");
    }
    info!(output_file = args.output, bytes = image.len(); "PNG exported successfully");

    Ok(())
}

/// Parse `KEY=VALUE` pairs into display options.
///
/// Values are read as a bool, then an integer, then a float, and fall back
/// to a string.
pub fn parse_options(raw: &[String]) -> Result<ImageOptions, CliError> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), parse_value(value.trim())))
            }
            _ => Err(CliError::InvalidOption(entry.clone())),
        })
        .collect()
}

fn parse_value(value: &str) -> OptionValue {
    if let Ok(flag) = value.parse::<bool>() {
        OptionValue::Bool(flag)
    } else if let Ok(int) = value.parse::<i64>() {
        OptionValue::Int(int)
    } else if let Ok(float) = value.parse::<f64>() {
        OptionValue::Float(float)
    } else {
        OptionValue::from(value)
    }
}
