//! Code for normalising plant rows from a source sheet into [`Entity`]s.
use super::input_err_msg;
use super::sheet::{Sheet, cell_number, cell_text, read_sheet};
use crate::entity::{Entity, EntitySet};
use crate::report::{ColumnNames, SourceDefinition};
use crate::units::Capacity;
use anyhow::{Context, Result};
use calamine::Data;
use chrono::NaiveDate;
use log::{debug, info};
use std::path::Path;

/// Positions of the plant fields within a sheet's rows
#[derive(Debug, PartialEq)]
struct ColumnIndices {
    name: usize,
    year: usize,
    month: usize,
    capacity: usize,
    latitude: usize,
    longitude: usize,
    category: usize,
    region: Option<usize>,
}

impl ColumnIndices {
    /// Look up every column, failing if any but the region column is missing
    fn find(sheet: &Sheet, columns: &ColumnNames) -> Result<Self> {
        Ok(Self {
            name: sheet.column_index(&columns.name)?,
            year: sheet.column_index(&columns.year)?,
            month: sheet.column_index(&columns.month)?,
            capacity: sheet.column_index(&columns.capacity)?,
            latitude: sheet.column_index(&columns.latitude)?,
            longitude: sheet.column_index(&columns.longitude)?,
            category: sheet.column_index(&columns.category)?,
            region: sheet.column_index(&columns.region).ok(),
        })
    }
}

/// Read the plants for one source from its workbook.
///
/// # Arguments
///
/// * `report_dir` - Folder that workbook paths are relative to
/// * `source` - Which sheet to read and how to interpret it
pub fn read_entity_set(report_dir: &Path, source: &SourceDefinition) -> Result<EntitySet> {
    let workbook_path = report_dir.join(&source.workbook);
    let sheet = read_sheet(&workbook_path, &source.sheet, source.skip_rows)?;
    let entities =
        normalise_sheet(&sheet, &source.columns()).with_context(|| input_err_msg(&workbook_path))?;

    let set = EntitySet {
        source: source.sheet.clone(),
        event_class: source.event_class,
        entities,
    };
    info!(
        "Sheet {}: {} plants with {} events ({} total capacity)",
        set.source,
        set.entities.len(),
        set.event_class,
        set.total_capacity().value()
    );

    Ok(set)
}

/// Turn the rows of a sheet into plants.
///
/// Rows which lack a usable event date, position or capacity are dropped. An error is only
/// returned if one of the columns is missing from the sheet.
pub fn normalise_sheet(sheet: &Sheet, columns: &ColumnNames) -> Result<Vec<Entity>> {
    let indices = ColumnIndices::find(sheet, columns)?;
    let entities: Vec<_> = sheet
        .rows()
        .filter_map(|row| normalise_row(row, &indices))
        .collect();

    let dropped = sheet.len() - entities.len();
    if dropped > 0 {
        debug!(
            "Sheet {}: dropped {dropped} of {} rows with missing or invalid values",
            sheet.name(),
            sheet.len()
        );
    }

    Ok(entities)
}

/// Convert a single row, returning `None` if it is incomplete
fn normalise_row(row: &[Data], indices: &ColumnIndices) -> Option<Entity> {
    let year = cell_number(&row[indices.year])?;
    let month = cell_number(&row[indices.month])?;
    let latitude = cell_number(&row[indices.latitude])?;
    let longitude = cell_number(&row[indices.longitude])?;
    let event_date = event_date(year, month)?;

    let capacity = Capacity(cell_number(&row[indices.capacity])?);
    if !capacity.is_valid() {
        return None;
    }

    Some(Entity {
        name: cell_text(&row[indices.name]),
        latitude,
        longitude,
        capacity,
        category: cell_text(&row[indices.category]),
        region: indices
            .region
            .map(|idx| cell_text(&row[idx]))
            .unwrap_or_default(),
        event_date,
    })
}

/// Combine a year and month into the first day of that month.
///
/// Fractional values are truncated. Returns `None` if there is no such month.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn event_date(year: f64, month: f64) -> Option<NaiveDate> {
    let year = year.trunc();
    let month = month.trunc();
    if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&year) || !(1.0..=12.0).contains(&month)
    {
        return None;
    }

    NaiveDate::from_ymd_opt(year as i32, month as u32, 1)
}
