//! Defines the `ReportDefinition` struct, which represents the contents of `report.toml`.
use crate::entity::{EntitySet, EventClass};
use crate::input::capacity::RemainingCapacity;
use crate::input::{input_err_msg, read_toml};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const REPORT_DEFINITION_FILE_NAME: &str = "report.toml";

/// Number of rows above the header row in the EIA generator inventory sheets
const DEFAULT_SKIP_ROWS: usize = 2;

fn default_title() -> String {
    "U.S. Power Plant Installations and Retirements Over Time".into()
}

fn default_skip_rows() -> usize {
    DEFAULT_SKIP_ROWS
}

fn default_region_column() -> String {
    "Region".into()
}

fn default_technology_column() -> String {
    "Tech Type".into()
}

/// Represents the contents of the entire report definition file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ReportDefinition {
    /// Title shown above the animated map
    #[serde(default = "default_title")]
    pub title: String,
    /// The sheets to read plants from
    pub sources: Vec<SourceDefinition>,
    /// What the map markers are coloured by
    #[serde(default)]
    pub colour_by: ColourBy,
    /// Where to read the remaining capacity table from, if a chart is wanted
    pub capacity_chart: Option<CapacityChartDefinition>,
}

/// How plants are coloured on the map
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColourBy {
    /// One colour per status (operating, retired, planned)
    #[default]
    #[string = "status"]
    Status,
    /// One colour per region
    #[string = "region"]
    Region,
}

/// A sheet containing plants which share an event class
#[derive(Debug, Deserialize, PartialEq)]
pub struct SourceDefinition {
    /// Path to the workbook, relative to the report directory
    pub workbook: PathBuf,
    /// Name of the sheet within the workbook
    pub sheet: String,
    /// What the event date of plants in this sheet means
    pub event_class: EventClass,
    /// Number of rows to skip before the header row
    #[serde(default = "default_skip_rows")]
    pub skip_rows: usize,
    /// Column names which differ from the defaults
    #[serde(default)]
    columns: SourceColumns,
}

/// Column name overrides for a source sheet, as written in the file
#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
struct SourceColumns {
    name: Option<String>,
    year: Option<String>,
    month: Option<String>,
    capacity: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    category: Option<String>,
    region: Option<String>,
}

/// The header names of the columns to read plant fields from
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnNames {
    /// Plant name
    pub name: String,
    /// Year of the event
    pub year: String,
    /// Month of the event
    pub month: String,
    /// Nameplate capacity
    pub capacity: String,
    /// Latitude
    pub latitude: String,
    /// Longitude
    pub longitude: String,
    /// Technology
    pub category: String,
    /// Region (e.g. state). Plants are given an empty region if the sheet has no such column.
    pub region: String,
}

impl SourceDefinition {
    /// The column names for this sheet, with defaults filled in.
    ///
    /// The defaults for the date columns depend on the event class.
    pub fn columns(&self) -> ColumnNames {
        let (year, month) = match self.event_class {
            EventClass::Retirement => ("Planned Retirement Year", "Planned Retirement Month"),
            EventClass::Commissioning => ("Planned Operation Year", "Planned Operation Month"),
        };
        let or = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };
        let columns = &self.columns;

        ColumnNames {
            name: or(&columns.name, "Plant Name"),
            year: or(&columns.year, year),
            month: or(&columns.month, month),
            capacity: or(&columns.capacity, "Nameplate Capacity (MW)"),
            latitude: or(&columns.latitude, "Latitude"),
            longitude: or(&columns.longitude, "Longitude"),
            category: or(&columns.category, "Technology"),
            region: or(&columns.region, "Plant State"),
        }
    }
}

/// A sheet holding remaining capacity by region and technology, one column per year
#[derive(Debug, Deserialize, PartialEq)]
pub struct CapacityChartDefinition {
    /// Path to the workbook, relative to the report directory
    pub workbook: PathBuf,
    /// Name of the sheet within the workbook
    pub sheet: String,
    /// Header of the region column
    #[serde(default = "default_region_column")]
    pub region_column: String,
    /// Header of the technology column
    #[serde(default = "default_technology_column")]
    pub technology_column: String,
    /// Number of rows to skip before the header row
    #[serde(default)]
    pub skip_rows: usize,
}

impl ReportDefinition {
    /// Read a report definition file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `report_dir` - Folder containing the report definition and its workbooks
    pub fn from_path<P: AsRef<Path>>(report_dir: P) -> Result<ReportDefinition> {
        let file_path = report_dir.as_ref().join(REPORT_DEFINITION_FILE_NAME);
        let definition: ReportDefinition = read_toml(&file_path)?;

        definition
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(definition)
    }

    /// Validate the definition after reading in file
    fn validate(&self) -> Result<()> {
        ensure!(!self.sources.is_empty(), "At least one source must be given");

        let mut seen = HashSet::new();
        for source in &self.sources {
            ensure!(
                seen.insert((&source.workbook, &source.sheet)),
                "Sheet {} of {} is listed more than once",
                source.sheet,
                source.workbook.display()
            );
        }

        Ok(())
    }
}

/// Everything needed to render a report
pub struct ReportData {
    /// The report definition
    pub definition: ReportDefinition,
    /// One set of plants per source, in the order the sources were given
    pub entity_sets: Vec<EntitySet>,
    /// The remaining capacity table, if one was requested
    pub remaining_capacity: Option<RemainingCapacity>,
}
