//! CSV output for cleaned tables and analysis results.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use insights_core::error::{InsightsError, Result};
use insights_core::models::Table;
use serde::Serialize;
use tracing::info;

use crate::records::{header_for, Cell, TabularRecord};

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| InsightsError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    File::create(path).map_err(|source| InsightsError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn flush<W: Write>(wtr: csv::Writer<W>, path: &Path) -> Result<()> {
    let mut inner = wtr
        .into_inner()
        .map_err(|e| InsightsError::FileWrite {
            path: path.to_path_buf(),
            source: e.into_error(),
        })?;
    inner.flush().map_err(|source| InsightsError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a cleaned table in its column layout to any writer.
pub fn write_table<R: TabularRecord, W: Write>(table: &Table<R>, out: W) -> Result<csv::Writer<W>> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(header_for(table))?;
    for row in &table.rows {
        let fields: Vec<String> = row.cells().iter().map(Cell::to_field).collect();
        wtr.write_record(&fields)?;
    }
    Ok(wtr)
}

/// Write a cleaned table to `path`, replacing any existing file.
pub fn write_table_csv<R: TabularRecord>(table: &Table<R>, path: &Path) -> Result<()> {
    let wtr = write_table(table, create(path)?)?;
    flush(wtr, path)?;
    info!("Wrote {} ({} rows)", path.display(), table.len());
    Ok(())
}

/// Write serde records (header taken from field names) to `path`.
///
/// With no rows the header is still written, from `header`.
pub fn write_records_csv<T: Serialize>(rows: &[T], header: &[&str], path: &Path) -> Result<()> {
    let file = create(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!rows.is_empty())
        .from_writer(file);
    if rows.is_empty() {
        wtr.write_record(header)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    flush(wtr, path)?;
    info!("Wrote {} ({} rows)", path.display(), rows.len());
    Ok(())
}
