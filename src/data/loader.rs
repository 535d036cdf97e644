use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::CsvTable;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a CSV file: first record is the header, the rest are data rows.
pub fn load_csv(path: &Path) -> Result<CsvTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let table = read_csv(file).with_context(|| format!("reading {}", path.display()))?;
    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        table.len(),
        table.headers,
        path.display()
    );
    Ok(table)
}

/// Read CSV from any source.
///
/// Rows are not required to match the header length; short rows are kept
/// here and rejected later by the grid builder. Blank lines are dropped by
/// the reader without a diagnostic, so rows are reported by their file line
/// (`StringRecord::position`) rather than by their index.
pub fn read_csv<R: Read>(source: R) -> Result<CsvTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        rows.push(record);
    }

    if rows.is_empty() {
        bail!("CSV has a header but no data rows");
    }

    Ok(CsvTable { headers, rows })
}
