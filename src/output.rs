use std::fs::{self, File, OpenOptions};
use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::domain::{ChromosomeRow, Projection};
use crate::error::ExportError;

/// Create the file fresh (or empty an existing one). Batch mode does this
/// once before the loop so successive appends share one header.
pub fn truncate(path: &Path) -> Result<(), ExportError> {
    File::create(path)
        .map(|_| ())
        .map_err(|err| ExportError::Filesystem(err.to_string()))
}

/// Append projected rows, writing the header only when the file is empty or
/// does not exist yet. An empty row set leaves the file untouched.
pub fn append_rows(
    path: &Path,
    rows: &[ChromosomeRow],
    projection: &Projection,
) -> Result<usize, ExportError> {
    if rows.is_empty() {
        info!(path = %path.display(), "no data to write");
        return Ok(0);
    }

    let needs_header = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| ExportError::Filesystem(err.to_string()))?;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    if needs_header {
        writer
            .write_record(projection.header())
            .map_err(|err| ExportError::Csv(err.to_string()))?;
    }

    for row in rows {
        writer
            .write_record(projection.project(row))
            .map_err(|err| ExportError::Csv(err.to_string()))?;
    }

    writer
        .flush()
        .map_err(|err| ExportError::Csv(err.to_string()))?;

    Ok(rows.len())
}
