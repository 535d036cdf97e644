/// Data layer: CSV loading, column selection and grid construction.
///
/// Architecture:
/// ```text
///        .csv
///         │
///         ▼
///   ┌──────────┐
///   │  loader  │  header + raw rows → CsvTable
///   └──────────┘
///         │   + ColumnSelection (x, y, z)
///         ▼
///   ┌──────────┐
///   │   grid   │  parse, dedupe axes, pivot → Grid (NaN = missing)
///   └──────────┘
/// ```

pub mod grid;
pub mod loader;
pub mod model;
