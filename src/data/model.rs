use std::cmp::Ordering;

use csv::StringRecord;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CsvTable – header plus raw rows, exactly as read
// ---------------------------------------------------------------------------

/// A loaded CSV file: the header row and every data row as raw text fields.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    /// Data rows; lengths may differ from the header (flexible reader).
    pub rows: Vec<StringRecord>,
}

impl CsvTable {
    /// Number of header columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Coord – a totally ordered axis value
// ---------------------------------------------------------------------------

/// A non-NaN axis coordinate usable as a `BTreeSet` / `BTreeMap` key.
///
/// Equality is exact IEEE equality: `-0.0` is folded into `0.0`, nothing else
/// is merged, so `1.0` and `1.0000000001` stay distinct.
#[derive(Debug, Clone, Copy)]
pub struct Coord(f64);

impl Coord {
    /// Returns `None` for NaN.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        // 0.0 == -0.0 must land on the same key.
        Some(Coord(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coord {}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// ---------------------------------------------------------------------------
// ColumnSelection – which columns feed X, Y and Z
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{0}' is not a column number")]
    NotANumber(String),

    #[error("column numbers start at 1")]
    Zero,

    #[error("column {number} does not exist (the file has {count} columns)")]
    OutOfRange { number: usize, count: usize },
}

/// Parse one column number as typed by the user (1-based).
pub fn parse_column_number(text: &str) -> Result<usize, SelectionError> {
    let trimmed = text.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))
}

/// Zero-based column indices for the three axes.
///
/// The same column may be used for more than one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl ColumnSelection {
    /// Convert 1-based column numbers into a validated zero-based selection.
    pub fn from_one_based(
        x: usize,
        y: usize,
        z: usize,
        column_count: usize,
    ) -> Result<Self, SelectionError> {
        let to_index = |number: usize| -> Result<usize, SelectionError> {
            match number {
                0 => Err(SelectionError::Zero),
                n if n > column_count => Err(SelectionError::OutOfRange {
                    number: n,
                    count: column_count,
                }),
                n => Ok(n - 1),
            }
        };
        Ok(ColumnSelection {
            x: to_index(x)?,
            y: to_index(y)?,
            z: to_index(z)?,
        })
    }

    /// Smallest field count a row needs to provide all three values.
    pub fn required_len(&self) -> usize {
        self.x.max(self.y).max(self.z) + 1
    }
}

// ---------------------------------------------------------------------------
// AxisLabels
// ---------------------------------------------------------------------------

/// Axis titles taken from the header at the selected columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl AxisLabels {
    pub fn from_headers(headers: &[String], selection: &ColumnSelection) -> Self {
        let label = |idx: usize| {
            headers
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("column {}", idx + 1))
        };
        AxisLabels {
            x: label(selection.x),
            y: label(selection.y),
            z: label(selection.z),
        }
    }
}
