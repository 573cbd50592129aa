//! Configuration types for qviz.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! TOML or any other serde format.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration, currently holding the diagram settings.
//! - [`DiagramSettings`] - Options for the markup generator.
//!
//! The render pipeline hands [`DiagramSettings`] to the markup generator
//! unchanged and never reads the fields itself.
//!
//! # Example
//!
//! ```
//! # use qviz::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.diagram().label_qubit_lines());
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Diagram generation settings section.
    #[serde(default)]
    diagram: DiagramSettings,
}

impl AppConfig {
    pub fn new(diagram: DiagramSettings) -> Self {
        Self { diagram }
    }

    /// Returns the diagram settings.
    pub fn diagram(&self) -> &DiagramSettings {
        &self.diagram
    }
}

/// Settings controlling how a circuit is laid out as quantikz markup.
///
/// Unset fields take the defaults listed on each accessor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiagramSettings {
    texify_numerical_constants: bool,
    impute_missing_qubits: bool,
    label_qubit_lines: bool,
    abbreviate_controlled_rotations: bool,
    qubit_line_open_wire_length: u32,
    right_align_terminal_measurements: bool,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            texify_numerical_constants: true,
            impute_missing_qubits: false,
            label_qubit_lines: true,
            abbreviate_controlled_rotations: false,
            qubit_line_open_wire_length: 1,
            right_align_terminal_measurements: true,
        }
    }
}

impl DiagramSettings {
    /// Render numbers such as `pi/2` as LaTeX (`\frac{\pi}{2}`). Default `true`.
    pub fn texify_numerical_constants(&self) -> bool {
        self.texify_numerical_constants
    }

    /// Draw qubits between the lowest and highest used index even when idle.
    /// Default `false`.
    pub fn impute_missing_qubits(&self) -> bool {
        self.impute_missing_qubits
    }

    /// Label each qubit line with its index. Default `true`.
    pub fn label_qubit_lines(&self) -> bool {
        self.label_qubit_lines
    }

    /// Draw controlled rotations as a single gate. Default `false`.
    pub fn abbreviate_controlled_rotations(&self) -> bool {
        self.abbreviate_controlled_rotations
    }

    /// Number of empty columns appended to each qubit line. Default `1`.
    pub fn qubit_line_open_wire_length(&self) -> u32 {
        self.qubit_line_open_wire_length
    }

    /// Align trailing measurements in the last column. Default `true`.
    pub fn right_align_terminal_measurements(&self) -> bool {
        self.right_align_terminal_measurements
    }

    pub fn with_texify_numerical_constants(mut self, value: bool) -> Self {
        self.texify_numerical_constants = value;
        self
    }

    pub fn with_impute_missing_qubits(mut self, value: bool) -> Self {
        self.impute_missing_qubits = value;
        self
    }

    pub fn with_label_qubit_lines(mut self, value: bool) -> Self {
        self.label_qubit_lines = value;
        self
    }

    pub fn with_abbreviate_controlled_rotations(mut self, value: bool) -> Self {
        self.abbreviate_controlled_rotations = value;
        self
    }

    pub fn with_qubit_line_open_wire_length(mut self, value: u32) -> Self {
        self.qubit_line_open_wire_length = value;
        self
    }

    pub fn with_right_align_terminal_measurements(mut self, value: bool) -> Self {
        self.right_align_terminal_measurements = value;
        self
    }
}
