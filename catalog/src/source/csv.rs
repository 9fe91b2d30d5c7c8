use std::collections::HashMap;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::bail;
use crate::error::{ErrorKind, SyncResult};
use crate::sync_error;
use crate::types::{Product, REQUIRED_COLUMNS, SourceRow};

/// Reads the whole catalog file at `path` into memory and parses it.
///
/// The file is read asynchronously and fully materialized before any row is returned,
/// so a truncated or unreadable file never yields a partial catalog.
pub async fn load_source_file(path: &Path) -> SyncResult<Vec<SourceRow>> {
    let contents = tokio::fs::read(path).await.map_err(|err| {
        sync_error!(
            ErrorKind::SourceUnreadable,
            "Catalog file could not be read",
            path.display(),
            source: err
        )
    })?;

    let rows = read_source_rows(contents.as_slice())?;
    info!(path = %path.display(), rows = rows.len(), "source file loaded");

    Ok(rows)
}

/// Parses comma separated catalog rows from `reader`.
///
/// The first record is the header and must name every column in [`REQUIRED_COLUMNS`];
/// header names are trimmed, extra columns are kept. Short rows are accepted and simply
/// lack the trailing fields.
pub fn read_source_rows<R: io::Read>(reader: R) -> SyncResult<Vec<SourceRow>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_owned())
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == column))
        .collect();
    if !missing.is_empty() {
        bail!(
            ErrorKind::SourceInvalid,
            "Catalog file header is missing required columns",
            format!("missing columns: {}", missing.join(", "))
        );
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.to_owned()))
            .collect();

        rows.push(SourceRow::new(index as u64 + 1, fields));
    }

    Ok(rows)
}

/// Turns source rows into candidate products, preserving file order.
///
/// Rows without a sku cannot be matched against the table and are skipped.
pub fn collect_candidates(rows: &[SourceRow]) -> Vec<Product> {
    rows.iter()
        .filter_map(|row| {
            let product = Product::from_source_row(row);
            if product.is_none() {
                warn!(row = row.line, "skipping catalog row without a sku");
            }
            product
        })
        .collect()
}
