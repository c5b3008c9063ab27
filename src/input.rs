//! Common routines for handling input data.
use crate::report::{ReportData, ReportDefinition};
use anyhow::{Context, Result};
use log::info;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub mod capacity;
use capacity::read_remaining_capacity;
pub mod entity;
use entity::read_entity_set;
pub mod sheet;
pub use sheet::{Sheet, read_sheet};

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a report definition and all the data it refers to.
///
/// # Arguments
///
/// * `report_dir` - Folder containing `report.toml` and its workbooks
///
/// # Returns
///
/// The definition along with the normalised plants for each source and, if requested, the
/// remaining capacity table.
pub fn load_report<P: AsRef<Path>>(report_dir: P) -> Result<ReportData> {
    let report_dir = report_dir.as_ref();
    let definition = ReportDefinition::from_path(report_dir)?;

    let entity_sets = definition
        .sources
        .iter()
        .map(|source| read_entity_set(report_dir, source))
        .collect::<Result<Vec<_>>>()?;

    let remaining_capacity = definition
        .capacity_chart
        .as_ref()
        .map(|chart| read_remaining_capacity(report_dir, chart))
        .transpose()?;

    info!(
        "Read {} plants from {} source(s)",
        entity_sets.iter().map(|set| set.entities.len()).sum::<usize>(),
        entity_sets.len()
    );

    Ok(ReportData {
        definition,
        entity_sets,
        remaining_capacity,
    })
}
