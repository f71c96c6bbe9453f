//! CSV loading with header normalization.
//!
//! Input files are read whole into a [`CsvTable`] of strings; typing is the
//! cleaner's job.

use std::io::Read;
use std::path::Path;

use insights_core::data_processors::normalize_column_name;
use insights_core::error::{InsightsError, Result};
use tracing::debug;

/// An untyped CSV table: normalized headers plus one `Vec<String>` per row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    /// Where the table came from, used in error messages.
    pub source: String,
    /// Header names, trimmed and lower-cased.
    pub headers: Vec<String>,
    /// Data rows, each padded to `headers.len()` fields.
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse CSV text from any reader. `source` labels the table in errors.
    ///
    /// Rows may be ragged: short rows are padded with empty fields and
    /// surplus fields are dropped.
    pub fn from_reader<R: Read>(source: &str, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(normalize_column_name).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let row: Vec<String> = (0..width)
                .map(|i| record.get(i).unwrap_or("").to_string())
                .collect();
            rows.push(row);
        }

        debug!("Read {} rows x {} columns from {}", rows.len(), width, source);

        Ok(Self {
            source: source.to_string(),
            headers,
            rows,
        })
    }

    /// Index of the column called `name`.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| InsightsError::MissingColumn {
                table: self.source.clone(),
                column: name.to_string(),
            })
    }

    /// Indices of every required column, in the order given.
    pub fn columns(&self, names: &[&str]) -> Result<Vec<usize>> {
        names.iter().map(|n| self.column(n)).collect()
    }

    /// Columns not named in `known`, as `(index, name)` pairs in file order.
    pub fn extra_columns(&self, known: &[&str]) -> Vec<(usize, String)> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !known.contains(&h.as_str()))
            .map(|(i, h)| (i, h.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read the CSV file at `path`.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let file = std::fs::File::open(path).map_err(|source| InsightsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    CsvTable::from_reader(&path.display().to_string(), std::io::BufReader::new(file))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
