//! JSON output types for machine-readable CLI output.
//!
//! Used by the `--json` flag of `generate` and `checklist`.

use keytheme_core::{Key, SplitAxis, ThemeError};
use serde::{Deserialize, Serialize};

use crate::package::EncodedImage;

/// Error codes for CLI-level failures. Core pipeline failures pass their
/// own `THEME_*` codes through.
pub mod error_codes {
    /// File could not be read or decoded
    pub const INPUT_READ: &str = "CLI_001";
    /// Package could not be written
    pub const PACKAGE_WRITE: &str = "CLI_002";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "THEME_002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Map an error chain to a JSON error, preferring a pipeline error code
    /// when one is present anywhere in the chain.
    pub fn from_anyhow(err: &anyhow::Error, fallback_code: &str) -> Self {
        let code = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<ThemeError>())
            .map(ThemeError::code)
            .unwrap_or(fallback_code);
        Self::new(code, format!("{:#}", err))
    }
}

/// Per-key entry in a generate report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyOutput {
    pub key: Key,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    /// BLAKE3 hash of the encoded PNG
    pub hash: String,
}

impl From<&EncodedImage> for KeyOutput {
    fn from(image: &EncodedImage) -> Self {
        Self {
            key: image.key,
            filename: image.filename.to_string(),
            width: image.width,
            height: image.height,
            hash: image.hash.clone(),
        }
    }
}

/// Result of the `generate` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<SplitAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<KeyOutput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

impl GenerateOutput {
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            axis: None,
            overlay_mode: None,
            package: None,
            keys: Vec::new(),
            errors,
        }
    }
}

/// One line of the overlay checklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistEntry {
    pub key: Key,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result of the `checklist` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistOutput {
    pub complete: bool,
    pub entries: Vec<ChecklistEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}
