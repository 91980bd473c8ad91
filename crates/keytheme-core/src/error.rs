//! Error type for the theme pipeline.

use thiserror::Error;

use crate::layout::Key;
use crate::png::PngError;

/// Errors from theme generation.
///
/// Every failure is fail-fast: no partial output set is ever returned
/// alongside an error.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// Zero-dimension image, non-positive scale, or similar bad argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Discrete overlay mode was used without all ten keys present.
    #[error("Incomplete overlay set: missing key(s) {}", join_keys(.missing))]
    IncompleteOverlaySet { missing: Vec<Key> },

    #[error("PNG error: {0}")]
    Png(#[from] PngError),
}

impl ThemeError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ThemeError::InvalidInput(_) => "THEME_001",
            ThemeError::IncompleteOverlaySet { .. } => "THEME_002",
            ThemeError::Png(_) => "THEME_003",
        }
    }

    /// True for every error kind caused by bad caller input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ThemeError::InvalidInput(_) | ThemeError::IncompleteOverlaySet { .. }
        )
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ThemeError::InvalidInput(message.into())
    }
}

fn join_keys(keys: &[Key]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
