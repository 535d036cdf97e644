use std::collections::{BTreeMap, BTreeSet};

use csv::StringRecord;
use thiserror::Error;

use super::model::{ColumnSelection, Coord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single row was left out of the grid. Never fatal.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("row has {len} fields, need at least {required}")]
    TooShort { len: usize, required: usize },

    #[error("column {column}: '{value}' is not a number")]
    NotNumeric { column: usize, value: String },

    #[error("column {column}: NaN cannot be used as a coordinate")]
    NanCoordinate { column: usize },
}

/// The grid is degenerate and must not be rendered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("no valid samples: every row was skipped")]
    Empty,

    #[error("every z value is missing")]
    AllMissing,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Rectangular surface built from scattered samples.
///
/// `z` is row-major with one row per y value and one column per x value:
/// `z(row, col)` is the sample at `(x_axis[col], y_axis[row])` or NaN.
#[derive(Debug, Clone)]
pub struct Grid {
    x_axis: Vec<f64>,
    y_axis: Vec<f64>,
    z: Vec<f64>,
}

impl Grid {
    /// Distinct x values, strictly ascending.
    pub fn x_axis(&self) -> &[f64] {
        &self.x_axis
    }

    /// Distinct y values, strictly ascending.
    pub fn y_axis(&self) -> &[f64] {
        &self.y_axis
    }

    pub fn width(&self) -> usize {
        self.x_axis.len()
    }

    pub fn height(&self) -> usize {
        self.y_axis.len()
    }

    pub fn z(&self, row: usize, col: usize) -> f64 {
        self.z[row * self.width() + col]
    }

    /// Z as nested rows (`z_rows()[row][col]`).
    pub fn z_rows(&self) -> Vec<Vec<f64>> {
        self.z.chunks(self.width()).map(|r| r.to_vec()).collect()
    }

    /// Meshgrid X: every row equals the x axis.
    pub fn mesh_x(&self) -> Vec<Vec<f64>> {
        vec![self.x_axis.clone(); self.height()]
    }

    /// Meshgrid Y: every column equals the y axis.
    pub fn mesh_y(&self) -> Vec<Vec<f64>> {
        self.y_axis
            .iter()
            .map(|&y| vec![y; self.width()])
            .collect()
    }

    /// Finite z extent, `None` when no cell holds a finite value.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.z
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Number of cells without a sample.
    pub fn missing_cells(&self) -> usize {
        self.z.iter().filter(|v| v.is_nan()).count()
    }

    pub fn is_all_missing(&self) -> bool {
        self.z.iter().all(|v| v.is_nan())
    }
}

// ---------------------------------------------------------------------------
// GridBuilder
// ---------------------------------------------------------------------------

/// Accumulates samples row by row.
///
/// A repeated `(x, y)` pair replaces the earlier z value (last write wins);
/// values are not averaged.
#[derive(Debug)]
pub struct GridBuilder {
    selection: ColumnSelection,
    xs: BTreeSet<Coord>,
    ys: BTreeSet<Coord>,
    samples: BTreeMap<(Coord, Coord), f64>,
}

impl GridBuilder {
    pub fn new(selection: ColumnSelection) -> Self {
        GridBuilder {
            selection,
            xs: BTreeSet::new(),
            ys: BTreeSet::new(),
            samples: BTreeMap::new(),
        }
    }

    /// Parse one raw row. A rejected row leaves the builder untouched.
    pub fn push(&mut self, record: &StringRecord) -> Result<(), RowError> {
        let required = self.selection.required_len();
        if record.len() < required {
            return Err(RowError::TooShort {
                len: record.len(),
                required,
            });
        }

        let x = parse_field(record, self.selection.x)?;
        let y = parse_field(record, self.selection.y)?;
        let z = parse_field(record, self.selection.z)?;

        let x = Coord::new(x).ok_or(RowError::NanCoordinate {
            column: self.selection.x + 1,
        })?;
        let y = Coord::new(y).ok_or(RowError::NanCoordinate {
            column: self.selection.y + 1,
        })?;

        self.xs.insert(x);
        self.ys.insert(y);
        self.samples.insert((x, y), z);
        Ok(())
    }

    /// Number of distinct `(x, y)` pairs seen so far.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Pivot the samples into a grid, NaN where a pair was never seen.
    pub fn finish(self) -> Result<Grid, GridError> {
        if self.samples.is_empty() {
            return Err(GridError::Empty);
        }

        let mut z = Vec::with_capacity(self.xs.len() * self.ys.len());
        for &y in &self.ys {
            for &x in &self.xs {
                z.push(self.samples.get(&(x, y)).copied().unwrap_or(f64::NAN));
            }
        }

        let grid = Grid {
            x_axis: self.xs.into_iter().map(Coord::get).collect(),
            y_axis: self.ys.into_iter().map(Coord::get).collect(),
            z,
        };
        if grid.is_all_missing() {
            return Err(GridError::AllMissing);
        }
        Ok(grid)
    }
}

fn parse_field(record: &StringRecord, idx: usize) -> Result<f64, RowError> {
    let raw = record.get(idx).unwrap_or("");
    raw.trim().parse::<f64>().map_err(|_| RowError::NotNumeric {
        column: idx + 1,
        value: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Whole-table entry point
// ---------------------------------------------------------------------------

/// File line of a record when it came from a reader, otherwise its 1-based
/// data row number.
fn row_location(index: usize, record: &StringRecord) -> String {
    match record.position() {
        Some(pos) => format!("line {}", pos.line()),
        None => format!("row {}", index + 1),
    }
}

/// A built grid plus how many input rows were dropped.
#[derive(Debug, Clone)]
pub struct GridBuild {
    pub grid: Grid,
    pub skipped_rows: usize,
}

/// Build a grid from every row, logging each skipped row.
pub fn build_grid(
    rows: &[StringRecord],
    selection: ColumnSelection,
) -> Result<GridBuild, GridError> {
    let mut builder = GridBuilder::new(selection);
    let mut skipped_rows = 0;

    for (i, record) in rows.iter().enumerate() {
        if let Err(e) = builder.push(record) {
            skipped_rows += 1;
            log::warn!(
                "Skipping {}: {e} ({:?})",
                row_location(i, record),
                record.iter().collect::<Vec<_>>()
            );
        }
    }

    log::info!(
        "{} samples from {} rows ({skipped_rows} skipped)",
        builder.sample_count(),
        rows.len()
    );

    let grid = builder.finish()?;
    log::info!(
        "Built {}x{} grid with {} missing cells",
        grid.width(),
        grid.height(),
        grid.missing_cells()
    );
    Ok(GridBuild { grid, skipped_rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<StringRecord> {
        data.iter().map(|r| StringRecord::from(r.to_vec())).collect()
    }

    fn xyz() -> ColumnSelection {
        ColumnSelection { x: 0, y: 1, z: 2 }
    }

    #[test]
    fn test_two_by_two_grid() {
        let input = rows(&[
            &["1", "1", "10"],
            &["1", "2", "20"],
            &["2", "1", "30"],
            &["2", "2", "40"],
        ]);
        let build = build_grid(&input, xyz()).unwrap();
        let grid = build.grid;
        assert_eq!(grid.x_axis(), &[1.0, 2.0]);
        assert_eq!(grid.y_axis(), &[1.0, 2.0]);
        assert_eq!(grid.z_rows(), vec![vec![10.0, 30.0], vec![20.0, 40.0]]);
        assert_eq!(grid.missing_cells(), 0);
        assert_eq!(build.skipped_rows, 0);
    }

    #[test]
    fn test_non_numeric_row_dropped() {
        let input = rows(&[&["1", "1", "10"], &["2", "2", "bad"]]);
        let build = build_grid(&input, xyz()).unwrap();
        assert_eq!(build.grid.x_axis(), &[1.0]);
        assert_eq!(build.grid.y_axis(), &[1.0]);
        assert_eq!(build.grid.z_rows(), vec![vec![10.0]]);
        assert_eq!(build.skipped_rows, 1);
    }

    #[test]
    fn test_duplicate_pair_last_write_wins() {
        let input = rows(&[&["1", "1", "10"], &["1", "1", "99"]]);
        let grid = build_grid(&input, xyz()).unwrap().grid;
        assert_eq!(grid.z_rows(), vec![vec![99.0]]);
    }

    #[test]
    fn test_duplicate_pair_keeps_last_among_interleaved_rows() {
        let input = rows(&[
            &["1", "1", "10"],
            &["2", "1", "5"],
            &["1", "1", "11"],
            &["2", "1", "6"],
            &["1", "1", "12"],
        ]);
        let grid = build_grid(&input, xyz()).unwrap().grid;
        assert_eq!(grid.z_rows(), vec![vec![12.0, 6.0]]);
    }

    #[test]
    fn test_empty_after_filtering() {
        let input = rows(&[&["a", "b", "c"], &["1"]]);
        assert_eq!(build_grid(&input, xyz()).unwrap_err(), GridError::Empty);
        assert_eq!(build_grid(&[], xyz()).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn test_all_nan_z_is_degenerate() {
        let input = rows(&[&["1", "1", "nan"], &["2", "1", "NaN"]]);
        assert_eq!(build_grid(&input, xyz()).unwrap_err(), GridError::AllMissing);
    }

    #[test]
    fn test_short_row_does_not_touch_axes() {
        let mut builder = GridBuilder::new(ColumnSelection { x: 0, y: 1, z: 3 });
        let err = builder
            .push(&StringRecord::from(vec!["5", "5", "5"]))
            .unwrap_err();
        assert_eq!(err, RowError::TooShort { len: 3, required: 4 });

        builder
            .push(&StringRecord::from(vec!["1", "2", "ignored", "7"]))
            .unwrap();
        let grid = builder.finish().unwrap();
        assert_eq!(grid.x_axis(), &[1.0]);
        assert_eq!(grid.y_axis(), &[2.0]);
        assert_eq!(grid.z(0, 0), 7.0);
    }

    #[test]
    fn test_non_numeric_in_any_selected_column() {
        let mut builder = GridBuilder::new(xyz());
        for bad in [["x", "1", "1"], ["1", "y", "1"], ["1", "1", "z"]] {
            assert!(matches!(
                builder.push(&StringRecord::from(bad.to_vec())),
                Err(RowError::NotNumeric { .. })
            ));
        }
        assert_eq!(builder.sample_count(), 0);
    }

    #[test]
    fn test_nan_coordinate_rejected() {
        let mut builder = GridBuilder::new(xyz());
        let err = builder
            .push(&StringRecord::from(vec!["1", "nan", "3"]))
            .unwrap_err();
        assert_eq!(err, RowError::NanCoordinate { column: 2 });
    }

    #[test]
    fn test_axes_sorted_and_deduplicated() {
        let input = rows(&[
            &["3", "0.5", "1"],
            &["-1", "0.5", "2"],
            &["3", "-2", "3"],
            &[" 2 ", "0.5", "4"],
            &["-1", "-2", "5"],
        ]);
        let grid = build_grid(&input, xyz()).unwrap().grid;
        assert_eq!(grid.x_axis(), &[-1.0, 2.0, 3.0]);
        assert_eq!(grid.y_axis(), &[-2.0, 0.5]);
        assert!(grid.x_axis().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_missing_cells_are_nan() {
        let input = rows(&[&["1", "1", "10"], &["2", "2", "40"]]);
        let grid = build_grid(&input, xyz()).unwrap().grid;
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.z(0, 0), 10.0);
        assert!(grid.z(0, 1).is_nan());
        assert!(grid.z(1, 0).is_nan());
        assert_eq!(grid.z(1, 1), 40.0);
        assert_eq!(grid.missing_cells(), 2);
        assert_eq!(grid.z_range(), Some((10.0, 40.0)));
    }

    #[test]
    fn test_meshgrid_convention() {
        let input = rows(&[&["1", "5", "0"], &["2", "6", "0"], &["3", "5", "0"]]);
        let grid = build_grid(&input, xyz()).unwrap().grid;
        let mx = grid.mesh_x();
        let my = grid.mesh_y();
        assert_eq!(mx, vec![vec![1.0, 2.0, 3.0]; 2]);
        assert_eq!(my, vec![vec![5.0; 3], vec![6.0; 3]]);
        let z = grid.z_rows();
        assert_eq!(z.len(), grid.y_axis().len());
        assert!(z.iter().all(|r| r.len() == grid.x_axis().len()));
    }

    #[test]
    fn test_row_location_uses_file_lines() {
        let table = crate::data::loader::read_csv("x,y,z\n1,1,1\n\na,b,c\n".as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(row_location(1, &table.rows[1]), "line 4");
        assert_eq!(row_location(1, &StringRecord::from(vec!["a"])), "row 2");
    }

    #[test]
    fn test_columns_in_any_order() {
        let input = rows(&[&["10", "label", "1", "1"], &["20", "label", "2", "1"]]);
        let sel = ColumnSelection { x: 2, y: 3, z: 0 };
        let grid = build_grid(&input, sel).unwrap().grid;
        assert_eq!(grid.z_rows(), vec![vec![10.0, 20.0]]);
    }
}
