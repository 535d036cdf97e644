//! Run configuration.
//!
//! A JSON file passed as the only command-line argument replaces the
//! interactive setup:
//!
//! ```json
//! { "file_path": "surface.csv", "x_column": 1, "y_column": 2, "z_column": 3, "render_mode": "both" }
//! ```
//!
//! Column numbers are 1-based, as shown in the column list.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::model::{ColumnSelection, SelectionError};

/// Which surface view(s) to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RenderMode {
    /// Fixed camera with colour bar.
    #[default]
    Static,
    /// Drag to rotate, scroll to zoom.
    Interactive,
    Both,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid plot choice '{0}', expected 1, 2 or 3")]
pub struct RenderModeError(pub String);

impl FromStr for RenderMode {
    type Err = RenderModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "static" => Ok(Self::Static),
            "2" | "interactive" => Ok(Self::Interactive),
            "3" | "both" => Ok(Self::Both),
            other => Err(RenderModeError(other.to_string())),
        }
    }
}

impl TryFrom<String> for RenderMode {
    type Error = RenderModeError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl RenderMode {
    pub const ALL: [RenderMode; 3] = [Self::Static, Self::Interactive, Self::Both];
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Static => "Static surface",
            Self::Interactive => "Interactive surface",
            Self::Both => "Both",
        };
        write!(f, "{s}")
    }
}

/// Everything needed to go from a CSV file to a plot without prompting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub file_path: PathBuf,
    pub x_column: usize,
    pub y_column: usize,
    pub z_column: usize,
    #[serde(default)]
    pub render_mode: RenderMode,
}

impl PlotConfig {
    /// Read a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: PlotConfig = serde_json::from_str(text).context("invalid JSON config")?;
        Ok(config)
    }

    /// Validate the 1-based column numbers against the loaded header.
    pub fn selection(&self, column_count: usize) -> std::result::Result<ColumnSelection, SelectionError> {
        ColumnSelection::from_one_based(self.x_column, self.y_column, self.z_column, column_count)
    }
}
