// Library exports for tabviz

pub mod data;
pub mod ir;
pub mod palette;
pub mod reader;
pub mod resolve;
pub mod runtime;
pub mod transform;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::palette::ColorPalette;

/// Chart shape the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
    Area,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualizerOptions {
    /// How long the "recomputing" indicator stays up after a recompute.
    #[serde(default = "default_busy_delay_ms")]
    pub busy_delay_ms: u64,
    /// Maximum slices in a pie chart.
    #[serde(default = "default_pie_limit")]
    pub pie_limit: usize,
    /// Maximum points in bar, area and grouped charts.
    #[serde(default = "default_series_limit")]
    pub series_limit: usize,
    #[serde(default)]
    pub palette: ColorPalette,
}

fn default_busy_delay_ms() -> u64 { 800 }
fn default_pie_limit() -> usize { 10 }
fn default_series_limit() -> usize { 20 }

impl Default for VisualizerOptions {
    fn default() -> Self {
        Self {
            busy_delay_ms: default_busy_delay_ms(),
            pie_limit: default_pie_limit(),
            series_limit: default_series_limit(),
            palette: ColorPalette::default(),
        }
    }
}

impl VisualizerOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid visualizer options")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Point cap for a chart kind.
    pub fn limit_for(&self, kind: ChartKind) -> usize {
        match kind {
            ChartKind::Pie => self.pie_limit,
            ChartKind::Bar | ChartKind::Area => self.series_limit,
        }
    }
}
