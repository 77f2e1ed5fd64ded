use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a data file into student records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("sheet '{sheet}' not found (available: {})", .available.join(", "))]
    MissingSheet {
        sheet: String,
        available: Vec<String>,
    },

    /// `row` is the 1-based data row, not counting the header.
    #[error("row {row}: column '{column}' has invalid number '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
}
