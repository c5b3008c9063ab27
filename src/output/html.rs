//! Writes the HTML report embedding the map and capacity chart.
use super::Figure;
use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::Tera;

/// The output file name for the report
pub const REPORT_FILE_NAME: &str = "index.html";

/// The page template. Values are HTML-escaped unless marked `safe`.
const REPORT_TEMPLATE: &str = include_str!("templates/index.html");

/// A figure and the section of the page it is drawn in
#[derive(Serialize)]
struct FigureSection<'a> {
    id: &'a str,
    heading: &'a str,
    json: String,
}

impl<'a> FigureSection<'a> {
    fn new(id: &'a str, heading: &'a str, figure: &Figure) -> Result<Self> {
        Ok(Self {
            id,
            heading,
            json: figure_json(figure)?,
        })
    }
}

/// Serialise a figure for embedding in a `<script>` element.
///
/// `</` is escaped so that plant names can't close the element.
fn figure_json(figure: &Figure) -> Result<String> {
    Ok(serde_json::to_string(figure)?.replace("</", "<\\/"))
}

/// Render the report page.
///
/// # Arguments
///
/// * `title` - Page title
/// * `map` - The animated map
/// * `capacity_chart` - The remaining capacity chart, if there is one
pub fn render_report(title: &str, map: &Figure, capacity_chart: Option<&Figure>) -> Result<String> {
    let mut sections = vec![FigureSection::new(
        "map",
        "Power Plant Retirements Over Time",
        map,
    )?];
    if let Some(chart) = capacity_chart {
        sections.push(FigureSection::new(
            "capacity",
            "Remaining Capacity Over Time (by Region)",
            chart,
        )?);
    }

    let mut tera = Tera::default();
    tera.add_raw_template(REPORT_FILE_NAME, REPORT_TEMPLATE)
        .context("Invalid report template")?;

    let mut context = tera::Context::new();
    context.insert("title", title);
    context.insert("figures", &sections);
    context.insert("year", &Local::now().year());

    tera.render(REPORT_FILE_NAME, &context)
        .context("Could not render report")
}

/// Render the report and write it to `output_path`
pub fn write_report(
    output_path: &Path,
    title: &str,
    map: &Figure,
    capacity_chart: Option<&Figure>,
) -> Result<()> {
    let html = render_report(title, map, capacity_chart)?;
    fs::write(output_path.join(REPORT_FILE_NAME), html)?;

    Ok(())
}
