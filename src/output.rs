//! The module responsible for writing output data to disk.
use crate::frame::{AnimationRow, Status};
use crate::period::Period;
use anyhow::{Context, Result, ensure};
use plotly::Plot;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub mod capacity_chart;
pub mod html;
pub mod map;
pub mod metadata;

/// The root folder in which report-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "plantmap_results";

/// The output file name for the animation table
const ANIMATION_ROWS_FILE_NAME: &str = "animation_rows.csv";

/// Colours for series which must keep the same colour across traces (plotly.js's default colorway)
const SERIES_COLOURS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// The colour for the series at `idx`, cycling through [`SERIES_COLOURS`]
pub fn series_colour(idx: usize) -> &'static str {
    SERIES_COLOURS[idx % SERIES_COLOURS.len()]
}

/// A plotly figure, ready to be handed to `Plotly.newPlot`.
///
/// Figures are built with the `plotly` crate and converted with [`Figure::from_plot`]. Animation
/// frames, and the parts of a layout the crate has no type for, are added as JSON afterwards.
#[derive(Debug, Serialize)]
pub struct Figure {
    /// Traces for the initial view
    pub data: Vec<Value>,
    /// Figure layout
    pub layout: Value,
    /// Animation frames, if any
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Value>,
    /// Plot configuration
    pub config: Value,
}

impl Figure {
    /// Convert a [`Plot`] into a figure with no animation frames
    pub fn from_plot(plot: &Plot) -> Result<Self> {
        let mut value: Value =
            serde_json::from_str(&plot.to_json()).context("Could not serialise plot")?;
        let data = match value["data"].take() {
            Value::Array(traces) => traces,
            _ => Vec::new(),
        };

        Ok(Self {
            data,
            layout: value["layout"].take(),
            frames: Vec::new(),
            config: value["config"].take(),
        })
    }

    /// Set a layout attribute which has no counterpart in [`plotly::Layout`]
    pub fn set_layout_value(&mut self, key: &str, value: Value) {
        if !self.layout.is_object() {
            self.layout = Value::Object(Map::new());
        }
        self.layout[key] = value;
    }
}

/// Get the default output directory for the report in the specified directory
pub fn get_output_dir(report_dir: &Path) -> Result<PathBuf> {
    let report_dir = report_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to report")?;

    let report_name = report_dir
        .file_name()
        .context("Report cannot be in root folder")?
        .to_str()
        .context("Invalid chars in report dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, report_name].iter().collect())
}

/// Create a new output directory.
///
/// If the directory already exists and is not empty, it is only replaced if `allow_overwrite` is
/// true.
///
/// # Returns
///
/// True if an existing directory was overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut entries) = fs::read_dir(output_dir) {
        if entries.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the animation rows CSV file
#[derive(Serialize, Debug, PartialEq)]
struct AnimationRecord<'a> {
    frame: Period,
    source: &'a str,
    plant_name: &'a str,
    status: Status,
    latitude: f64,
    longitude: f64,
    capacity: f64,
    technology: &'a str,
    region: &'a str,
    event_date: String,
}

impl<'a> From<AnimationRow<'a>> for AnimationRecord<'a> {
    fn from(row: AnimationRow<'a>) -> Self {
        let entity = row.entity;
        Self {
            frame: row.frame,
            source: row.source,
            plant_name: &entity.name,
            status: row.status,
            latitude: entity.latitude,
            longitude: entity.longitude,
            capacity: entity.capacity.value(),
            technology: &entity.category,
            region: &entity.region,
            event_date: entity.event_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Write the animation table to a CSV file in `output_path`
pub fn write_animation_rows<'a, I>(output_path: &Path, rows: I) -> Result<()>
where
    I: Iterator<Item = AnimationRow<'a>>,
{
    let file_path = output_path.join(ANIMATION_ROWS_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)?;
    for row in rows {
        writer.serialize(AnimationRecord::from(row))?;
    }
    writer.flush()?;

    Ok(())
}
