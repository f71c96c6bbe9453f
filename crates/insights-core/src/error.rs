use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by CX Insights.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed or serialised.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from an input table.
    #[error("Missing required column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    /// The spreadsheet writer rejected a sheet, cell or save operation.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The dashboard could not set up, draw to or restore the terminal.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Convenience alias used throughout the insights crates.
pub type Result<T> = std::result::Result<T, InsightsError>;
