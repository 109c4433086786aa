use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, FormsError>;

/// Error type covering the failures that can occur while routing a
/// submission, rebuilding the master sheet, or talking to a backend.
#[derive(Debug, Error)]
pub enum FormsError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// No spreadsheet is known under the given identifier.
    #[error("unknown spreadsheet '{0}'")]
    UnknownSpreadsheet(String),

    /// No form is known under the given identifier.
    #[error("unknown form '{0}'")]
    UnknownForm(String),

    /// The submission payload lacks a field the router needs.
    #[error("submission is missing the '{0}' field")]
    MissingField(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
