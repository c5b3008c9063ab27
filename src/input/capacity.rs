//! Code for reading the remaining capacity table used by the static chart.
use super::input_err_msg;
use super::sheet::{Sheet, cell_number, cell_text, read_sheet};
use crate::report::CapacityChartDefinition;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::info;
use std::path::Path;

/// Remaining capacity for one technology, one value per year. Gaps are `None`.
pub type CapacitySeries = Vec<Option<f64>>;

/// Remaining capacity by region and technology
#[derive(Debug, PartialEq)]
pub struct RemainingCapacity {
    /// The year labels, in column order
    pub years: Vec<String>,
    /// Series for each technology in each region, in order of first appearance
    pub regions: IndexMap<String, IndexMap<String, CapacitySeries>>,
}

/// Read the remaining capacity table named in the report definition.
///
/// # Arguments
///
/// * `report_dir` - Folder that workbook paths are relative to
/// * `chart` - Where to find the table
pub fn read_remaining_capacity(
    report_dir: &Path,
    chart: &CapacityChartDefinition,
) -> Result<RemainingCapacity> {
    let workbook_path = report_dir.join(&chart.workbook);
    let sheet = read_sheet(&workbook_path, &chart.sheet, chart.skip_rows)?;
    let table = remaining_capacity_from_sheet(&sheet, &chart.region_column, &chart.technology_column)
        .with_context(|| input_err_msg(&workbook_path))?;

    info!(
        "Read remaining capacity for {} regions over {} years",
        table.regions.len(),
        table.years.len()
    );

    Ok(table)
}

/// Build the table from a sheet.
///
/// Every column whose header is a whole number is taken to be a year. Other columns (labels, notes)
/// are ignored. Rows without a region or technology are dropped. If a technology appears more than
/// once in a region, only the first row is used.
fn remaining_capacity_from_sheet(
    sheet: &Sheet,
    region_column: &str,
    technology_column: &str,
) -> Result<RemainingCapacity> {
    let region_idx = sheet.column_index(region_column)?;
    let technology_idx = sheet.column_index(technology_column)?;
    let (year_indices, years): (Vec<_>, Vec<_>) = sheet
        .headers()
        .iter()
        .enumerate()
        .filter(|(idx, header)| {
            *idx != region_idx && *idx != technology_idx && header.parse::<i32>().is_ok()
        })
        .map(|(idx, header)| (idx, header.clone()))
        .unzip();
    ensure!(
        !years.is_empty(),
        "Sheet {} has no year columns",
        sheet.name()
    );

    let mut regions: IndexMap<String, IndexMap<String, CapacitySeries>> = IndexMap::new();
    for row in sheet.rows() {
        let region = cell_text(&row[region_idx]);
        let technology = cell_text(&row[technology_idx]);
        if region.is_empty() || technology.is_empty() {
            continue;
        }

        regions
            .entry(region)
            .or_default()
            .entry(technology)
            .or_insert_with(|| year_indices.iter().map(|&idx| cell_number(&row[idx])).collect());
    }

    Ok(RemainingCapacity { years, regions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, text};
    use calamine::Data;
    use indexmap::indexmap;

    fn headers() -> Vec<String> {
        ["Region", "Tech Type", "2025", "2030", "2035"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_remaining_capacity_from_sheet() {
        let sheet = Sheet::new(
            "Remaining Capacity",
            headers(),
            vec![
                vec![
                    text("ERCOT"),
                    text("Coal"),
                    Data::Float(13.5),
                    Data::Float(9.0),
                    Data::Float(2.0),
                ],
                vec![
                    text("PJM"),
                    text("Coal"),
                    Data::Float(40.0),
                    Data::Empty,
                    Data::Int(12),
                ],
                // Duplicate technology: ignored
                vec![
                    text("ERCOT"),
                    text("Coal"),
                    Data::Float(1.0),
                    Data::Float(1.0),
                    Data::Float(1.0),
                ],
                vec![
                    text("ERCOT"),
                    text("Gas"),
                    Data::Float(50.0),
                    Data::Float(48.0),
                    text("n/a"),
                ],
                // No technology: dropped
                vec![text("MISO"), Data::Empty, Data::Float(1.0)],
            ],
        );

        let table = remaining_capacity_from_sheet(&sheet, "Region", "Tech Type").unwrap();
        assert_eq!(table.years, ["2025", "2030", "2035"]);
        assert_eq!(
            table.regions,
            indexmap! {
                "ERCOT".to_string() => indexmap! {
                    "Coal".to_string() => vec![Some(13.5), Some(9.0), Some(2.0)],
                    "Gas".to_string() => vec![Some(50.0), Some(48.0), None],
                },
                "PJM".to_string() => indexmap! {
                    "Coal".to_string() => vec![Some(40.0), None, Some(12.0)],
                },
            }
        );

        // Regions keep the order they first appear in
        assert_eq!(
            table.regions.keys().collect::<Vec<_>>(),
            ["ERCOT", "PJM"]
        );
    }

    #[test]
    fn test_remaining_capacity_ignores_label_columns() {
        let sheet = Sheet::new(
            "Remaining Capacity",
            ["Region", "Tech Type", "Notes", "2025", "Source", "2030"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            vec![vec![
                text("ERCOT"),
                text("Coal"),
                text("Includes mothballed units"),
                Data::Float(13.5),
                text("EIA"),
                Data::Float(9.0),
            ]],
        );

        let table = remaining_capacity_from_sheet(&sheet, "Region", "Tech Type").unwrap();
        assert_eq!(table.years, ["2025", "2030"]);
        assert_eq!(
            table.regions["ERCOT"]["Coal"],
            vec![Some(13.5), Some(9.0)]
        );
    }

    #[test]
    fn test_remaining_capacity_missing_column() {
        let sheet = Sheet::new("Remaining Capacity", headers(), Vec::new());
        assert_error!(
            remaining_capacity_from_sheet(&sheet, "Region", "Technology"),
            "Sheet Remaining Capacity has no column named \"Technology\""
        );
    }

    #[test]
    fn test_remaining_capacity_no_years() {
        let sheet = Sheet::new(
            "Remaining Capacity",
            vec!["Region".into(), "Tech Type".into(), "Notes".into()],
            Vec::new(),
        );
        assert_error!(
            remaining_capacity_from_sheet(&sheet, "Region", "Tech Type"),
            "Sheet Remaining Capacity has no year columns"
        );
    }
}
