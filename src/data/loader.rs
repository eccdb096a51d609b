use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;

use super::model::{RawSample, Recording};

/// Columns every recording must provide: force, aux, displacement, time.
const REQUIRED_COLUMNS: usize = 4;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a rig recording from a file. Dispatch by extension.
///
/// Supported formats (no header row, comma or dot decimals):
/// * `.csv`                 – semicolon-separated columns
/// * anything else (`.txt`) – tab-separated columns, the rig's native export
pub fn load_file(path: &Path) -> Result<Recording> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let delimiter = match ext.as_str() {
        "csv" => b';',
        _ => b'\t',
    };

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening recording {}", path.display()))?;
    load_delimited(file, delimiter).with_context(|| format!("reading {}", path.display()))
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Parse a header-less delimited table into a [`Recording`].
///
/// Only the first four columns are used; extra columns are ignored. Empty
/// cells become NaN so the cleaner can interpolate them later.
pub fn load_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Recording> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;

        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        if record.len() < REQUIRED_COLUMNS {
            bail!(
                "row {row_no}: expected at least {REQUIRED_COLUMNS} columns, found {}",
                record.len()
            );
        }

        let mut cells = [0.0; REQUIRED_COLUMNS];
        for (col, cell) in cells.iter_mut().enumerate() {
            *cell = parse_decimal(record.get(col).unwrap_or(""), row_no, col)?;
        }

        rows.push(RawSample {
            force_n: cells[0],
            aux: cells[1],
            displacement_mm: cells[2],
            time_s: cells[3],
        });
    }

    if rows.is_empty() {
        bail!("recording contains no samples");
    }

    log::debug!("loaded {} samples", rows.len());
    Ok(Recording::from_rows(&rows))
}

/// Parse one cell, accepting a comma as decimal separator.
fn parse_decimal(cell: &str, row: usize, col: usize) -> Result<f64> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.replace(',', ".")
        .parse::<f64>()
        .with_context(|| format!("row {row}, column {col}: '{cell}' is not a number"))
}
