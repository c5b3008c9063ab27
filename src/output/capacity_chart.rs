//! Builds the static multi-panel chart of remaining capacity by region and technology.
use super::{Figure, series_colour};
use crate::input::capacity::RemainingCapacity;
use anyhow::Result;
use indexmap::IndexSet;
use plotly::common::{Anchor, Font, Line, Mode, Title};
use plotly::layout::{Annotation, Axis, GridPattern, Layout, LayoutGrid, Legend};
use plotly::{Configuration, Plot, Scatter};

/// Number of panels in each row of the grid
const GRID_COLUMNS: usize = 2;

/// Height in pixels of each row of panels
const ROW_HEIGHT: usize = 450;

/// Axis suffix for the panel at `idx` (plotly calls the first axes `x`/`y`, then `x2`/`y2`...)
fn axis_suffix(idx: usize) -> String {
    if idx == 0 {
        String::new()
    } else {
        (idx + 1).to_string()
    }
}

/// The panel title, placed above the panel's plotting area
fn panel_title(region: &str, suffix: &str) -> Annotation {
    Annotation::new()
        .text(&format!("Remaining Capacity for {region} Over Time"))
        .x_ref(&format!("x{suffix} domain"))
        .y_ref(&format!("y{suffix} domain"))
        .x(0.5)
        .y(1.0)
        .x_anchor(Anchor::Center)
        .y_anchor(Anchor::Bottom)
        .show_arrow(false)
        .font(Font::new().size(14))
}

/// Build the remaining capacity figure: one panel per region, one line per technology.
///
/// Each technology has the same colour in every panel and appears once in the legend.
pub fn capacity_chart_figure(table: &RemainingCapacity) -> Result<Figure> {
    let technologies: IndexSet<_> = table
        .regions
        .values()
        .flat_map(|techs| techs.keys())
        .collect();

    let mut plot = Plot::new();
    let mut annotations = Vec::new();
    let mut shown_in_legend = IndexSet::new();
    for (idx, (region, techs)) in table.regions.iter().enumerate() {
        let suffix = axis_suffix(idx);
        for (technology, series) in techs {
            let colour_idx = technologies.get_index_of(technology).unwrap_or_default();
            let trace = Scatter::new(table.years.clone(), series.clone())
                .name(technology)
                .mode(Mode::Lines)
                .legend_group(technology)
                .show_legend(shown_in_legend.insert(technology))
                .x_axis(&format!("x{suffix}"))
                .y_axis(&format!("y{suffix}"))
                .line(Line::new().color(series_colour(colour_idx)));
            plot.add_trace(trace);
        }
        annotations.push(panel_title(region, &suffix));
    }

    let rows = table.regions.len().div_ceil(GRID_COLUMNS).max(1);
    plot.set_layout(
        Layout::new()
            .grid(
                LayoutGrid::new()
                    .rows(rows)
                    .columns(GRID_COLUMNS)
                    .pattern(GridPattern::Independent)
                    .y_gap(0.35),
            )
            .annotations(annotations)
            .height(rows * ROW_HEIGHT)
            .legend(Legend::new().title(Title::with_text("Technology Type"))),
    );
    plot.set_configuration(Configuration::new().static_plot(true));

    // `Layout` only has setters for the first eight pairs of axes, so add them all here
    let mut figure = Figure::from_plot(&plot)?;
    for idx in 0..table.regions.len() {
        let suffix = axis_suffix(idx);
        let x_axis = Axis::new().title(Title::with_text("Year")).tick_angle(-45.0);
        let y_axis = Axis::new().title(Title::with_text("Capacity (GW)"));
        figure.set_layout_value(&format!("xaxis{suffix}"), serde_json::to_value(x_axis)?);
        figure.set_layout_value(&format!("yaxis{suffix}"), serde_json::to_value(y_axis)?);
    }

    Ok(figure)
}
