//! Code for reading tables from spreadsheet workbooks.
use super::input_err_msg;
use anyhow::{Context, Result, bail, ensure};
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;

/// A table read from a worksheet: a header row followed by data rows.
///
/// All rows have the same width as the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Data>>,
}

impl Sheet {
    /// Create a new [`Sheet`]. Rows shorter than the header are padded with empty cells.
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Vec<Data>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Data::Empty);
                row
            })
            .collect();

        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Build a table from a worksheet range.
    ///
    /// Row numbers are counted from the top of the worksheet, regardless of where the first
    /// non-empty cell is.
    ///
    /// # Arguments
    ///
    /// * `name` - The sheet name
    /// * `range` - The worksheet cells
    /// * `skip_rows` - Number of rows above the header row
    pub fn from_range(name: &str, range: &Range<Data>, skip_rows: usize) -> Result<Self> {
        let Some((end_row, end_col)) = range.end() else {
            bail!("Sheet {name} is empty");
        };
        let header_row = u32::try_from(skip_rows)?;
        ensure!(
            header_row <= end_row,
            "Sheet {name} has no header row after skipping {skip_rows} rows"
        );

        let cell = |row, col| range.get_value((row, col)).cloned().unwrap_or(Data::Empty);
        let headers = (0..=end_col)
            .map(|col| cell_text(&cell(header_row, col)))
            .collect();
        let rows = (header_row + 1..=end_row)
            .map(|row| (0..=end_col).map(|col| cell(row, col)).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|cell| *cell != Data::Empty))
            .collect();

        Ok(Self::new(name, headers, rows))
    }

    /// The sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Iterate over the data rows
    pub fn rows(&self) -> impl Iterator<Item = &[Data]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the index of the column with the given header
    pub fn column_index(&self, header: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == header)
            .with_context(|| format!("Sheet {} has no column named \"{header}\"", self.name))
    }
}

/// Read a table from a sheet of a workbook (xlsx, xls, xlsb or ods).
///
/// # Arguments
///
/// * `workbook_path` - Path to the workbook
/// * `sheet_name` - Name of the sheet to read
/// * `skip_rows` - Number of rows above the header row
pub fn read_sheet(workbook_path: &Path, sheet_name: &str, skip_rows: usize) -> Result<Sheet> {
    let mut workbook =
        open_workbook_auto(workbook_path).with_context(|| input_err_msg(workbook_path))?;
    let range = workbook
        .worksheet_range(sheet_name)
        .with_context(|| format!("Could not read sheet {sheet_name}"))
        .with_context(|| input_err_msg(workbook_path))?;

    Sheet::from_range(sheet_name, &range, skip_rows).with_context(|| input_err_msg(workbook_path))
}

/// Interpret a cell as a number.
///
/// Numeric cells are used as-is and text cells are parsed. Anything else, including values which
/// are not finite, counts as missing.
#[allow(clippy::cast_precision_loss)]
pub fn cell_number(cell: &Data) -> Option<f64> {
    let value = match cell {
        Data::Int(value) => *value as f64,
        Data::Float(value) => *value,
        Data::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };

    value.is_finite().then_some(value)
}

/// Interpret a cell as text. Empty cells give an empty string.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, text};
    use rstest::rstest;

    #[rstest]
    #[case(Data::Int(2025), Some(2025.0))]
    #[case(Data::Float(12.5), Some(12.5))]
    #[case(text(" 880.4 "), Some(880.4))]
    #[case(text("n/a"), None)]
    #[case(text("NaN"), None)]
    #[case(text(""), None)]
    #[case(Data::Bool(true), None)]
    #[case(Data::Empty, None)]
    fn test_cell_number(#[case] cell: Data, #[case] expected: Option<f64>) {
        assert_eq!(cell_number(&cell), expected);
    }

    #[rstest]
    #[case(text(" Barry "), "Barry")]
    #[case(Data::Empty, "")]
    #[case(Data::Int(2030), "2030")]
    fn test_cell_text(#[case] cell: Data, #[case] expected: &str) {
        assert_eq!(cell_text(&cell), expected);
    }

    #[test]
    fn test_sheet_new_pads_rows() {
        let sheet = Sheet::new(
            "Sheet1",
            vec!["a".into(), "b".into()],
            vec![vec![Data::Int(1)]],
        );
        assert_eq!(sheet.rows().next().unwrap(), [Data::Int(1), Data::Empty]);
    }

    #[test]
    fn test_column_index() {
        let sheet = Sheet::new("Sheet1", vec!["a".into(), "b".into()], Vec::new());
        assert_eq!(sheet.column_index("b").unwrap(), 1);
        assert_error!(
            sheet.column_index("c"),
            "Sheet Sheet1 has no column named \"c\""
        );
    }

    #[test]
    fn test_from_range_skips_rows() {
        // Cells start in the second row, as if the first row of the worksheet were blank
        let mut range = Range::new((1, 0), (4, 1));
        range.set_value((1, 0), text("Inventory"));
        range.set_value((2, 0), text("Name"));
        range.set_value((2, 1), text("Year"));
        range.set_value((3, 0), text("Barry"));
        range.set_value((3, 1), Data::Int(2028));

        let sheet = Sheet::from_range("Operating", &range, 2).unwrap();
        assert_eq!(sheet.name(), "Operating");
        assert_eq!(sheet.headers(), ["Name", "Year"]);

        // The blank final row is dropped
        assert_eq!(sheet.len(), 1);
        assert_eq!(
            sheet.rows().next().unwrap(),
            [text("Barry"), Data::Int(2028)]
        );
    }

    #[test]
    fn test_from_range_no_header() {
        let mut range = Range::new((0, 0), (0, 0));
        range.set_value((0, 0), text("Inventory"));
        assert_error!(
            Sheet::from_range("Operating", &range, 2),
            "Sheet Operating has no header row after skipping 2 rows"
        );
    }

    #[test]
    fn test_from_range_empty() {
        let range: Range<Data> = Range::empty();
        assert_error!(
            Sheet::from_range("Operating", &range, 0),
            "Sheet Operating is empty"
        );
    }
}
