use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{PlotConfig, RenderMode};
use crate::data::grid::{Grid, GridError, build_grid};
use crate::data::loader::load_csv;
use crate::data::model::{
    AxisLabels, ColumnSelection, CsvTable, SelectionError, parse_column_number,
};
use crate::surface::{Camera, Surface};

// ---------------------------------------------------------------------------
// PlotData – everything the surface views need
// ---------------------------------------------------------------------------

/// A built grid ready for rendering. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct PlotData {
    pub grid: Grid,
    pub surface: Surface,
    pub labels: AxisLabels,
    pub skipped_rows: usize,
}

impl PlotData {
    pub fn build(table: &CsvTable, selection: ColumnSelection) -> Result<Self, GridError> {
        let build = build_grid(&table.rows, selection)?;
        Ok(PlotData {
            surface: Surface::from_grid(&build.grid),
            labels: AxisLabels::from_headers(&table.headers, &selection),
            grid: build.grid,
            skipped_rows: build.skipped_rows,
        })
    }

    /// One-line summary for the status bar.
    pub fn summary(&self) -> String {
        format!(
            "{}×{} grid, {} missing cells, {} rows skipped",
            self.grid.width(),
            self.grid.height(),
            self.grid.missing_cells(),
            self.skipped_rows
        )
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Path of the loaded file.
    pub source: Option<PathBuf>,

    /// Loaded table (None until user loads a file).
    pub table: Option<CsvTable>,

    /// Column numbers for X, Y, Z as typed (1-based).
    pub column_inputs: [String; 3],

    pub render_mode: RenderMode,

    /// Current plot; cleared whenever the inputs change.
    pub plot: Option<PlotData>,

    /// Camera of the interactive view.
    pub camera: Camera,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            source: None,
            table: None,
            column_inputs: ["1".to_string(), "2".to_string(), "3".to_string()],
            render_mode: RenderMode::default(),
            plot: None,
            camera: Camera::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Run the whole pipeline from a config file, no prompts.
    pub fn from_config(config: &PlotConfig) -> Result<Self> {
        let table = load_csv(&config.file_path)?;
        let selection = config
            .selection(table.column_count())
            .context("invalid column selection")?;
        let plot = PlotData::build(&table, selection)
            .with_context(|| format!("cannot plot {}", config.file_path.display()))?;
        log::info!("{}", plot.summary());

        Ok(Self {
            source: Some(config.file_path.clone()),
            table: Some(table),
            column_inputs: [config.x_column, config.y_column, config.z_column]
                .map(|n| n.to_string()),
            render_mode: config.render_mode,
            plot: Some(plot),
            camera: Camera::default(),
            status_message: None,
        })
    }

    /// Ingest a newly loaded table; drops any previous plot.
    pub fn set_table(&mut self, path: PathBuf, table: CsvTable) {
        // Default to the first three columns, reusing the last when there are fewer.
        let n = table.column_count().max(1);
        self.column_inputs = [1, 2, 3].map(|i: usize| i.min(n).to_string());
        self.source = Some(path);
        self.table = Some(table);
        self.plot = None;
        self.status_message = None;
    }

    /// Parse and validate the typed column numbers.
    pub fn selection(&self) -> Result<ColumnSelection, SelectionError> {
        let count = self.table.as_ref().map_or(0, CsvTable::column_count);
        let [x, y, z] = &self.column_inputs;
        ColumnSelection::from_one_based(
            parse_column_number(x)?,
            parse_column_number(y)?,
            parse_column_number(z)?,
            count,
        )
    }

    /// Build the grid for the current inputs. On failure the previous plot is
    /// cleared and the reason is shown instead.
    pub fn build_plot(&mut self) {
        self.plot = None;
        let Some(table) = &self.table else {
            self.status_message = Some("No file loaded.".to_string());
            return;
        };

        let selection = match self.selection() {
            Ok(sel) => sel,
            Err(e) => {
                log::error!("Invalid selection: {e}");
                self.status_message = Some(format!("Invalid selection: {e}"));
                return;
            }
        };

        match PlotData::build(table, selection) {
            Ok(plot) => {
                log::info!("{}", plot.summary());
                self.camera = Camera::default();
                self.status_message = None;
                self.plot = Some(plot);
            }
            Err(e) => {
                log::error!("Failed to process data into a grid: {e}");
                self.status_message = Some(format!("Cannot plot: {e}"));
            }
        }
    }

    /// Header name for a typed column number, if it is valid.
    pub fn column_name(&self, input: &str) -> Option<&str> {
        let table = self.table.as_ref()?;
        let n = parse_column_number(input).ok()?;
        table.headers.get(n.checked_sub(1)?).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn state_with(text: &str) -> AppState {
        let mut state = AppState::default();
        state.set_table(PathBuf::from("test.csv"), read_csv(text.as_bytes()).unwrap());
        state
    }

    #[test]
    fn test_build_plot_success() {
        let mut state = state_with("x,y,z\n1,1,10\n1,2,20\n2,1,30\n2,2,40\n3,3\n");
        state.build_plot();
        let plot = state.plot.as_ref().unwrap();
        assert_eq!(plot.labels.z, "z");
        assert_eq!(plot.skipped_rows, 1);
        assert_eq!(plot.surface.triangle_count(), 2);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_build_plot_invalid_selection() {
        let mut state = state_with("x,y,z\n1,1,10\n");
        state.column_inputs[2] = "zed".to_string();
        state.build_plot();
        assert!(state.plot.is_none());
        assert!(state.status_message.unwrap().contains("Invalid selection"));
    }

    #[test]
    fn test_build_plot_empty_grid_halts() {
        let mut state = state_with("x,y,z\na,b,c\n");
        state.build_plot();
        assert!(state.plot.is_none());
        assert!(state.status_message.unwrap().contains("no valid samples"));
    }

    #[test]
    fn test_set_table_defaults_for_narrow_file() {
        let state = state_with("a,b\n1,2\n");
        assert_eq!(state.column_inputs, ["1", "2", "2"].map(String::from));
        assert_eq!(state.column_name("2"), Some("b"));
        assert_eq!(state.column_name("3"), None);
        assert_eq!(state.column_name("0"), None);
    }

    #[test]
    fn test_build_plot_without_table() {
        let mut state = AppState::default();
        state.build_plot();
        assert_eq!(state.status_message.as_deref(), Some("No file loaded."));
    }
}
