//! Builds the animated geographic scatter plot of plant statuses.
use super::{Figure, series_colour};
use crate::frame::{Animation, AnimationRow, Status};
use crate::period::Period;
use crate::report::ColourBy;
use anyhow::Result;
use indexmap::IndexSet;
use plotly::common::Title;
use plotly::layout::{Layout, Legend, Margin};
use plotly::{Configuration, Plot};
use serde_json::{Value, json};
use strum::IntoEnumIterator;

/// Diameter in pixels of the marker for the largest plant
const MAX_MARKER_SIZE: f64 = 20.0;

/// Marker opacity
const MARKER_OPACITY: f64 = 0.7;

/// Milliseconds each frame is shown for when playing the animation
const FRAME_DURATION_MS: u32 = 500;

const HOVER_TEMPLATE: &str = "<b>%{hovertext}</b><br><br>\
    status=%{customdata[2]}<br>\
    technology=%{customdata[0]}<br>\
    capacity=%{marker.size}<br>\
    event_date=%{customdata[1]}<extra></extra>";

/// Marker colour for each status
fn status_colour(status: Status) -> &'static str {
    match status {
        Status::Operating => "green",
        Status::Retired => "red",
        Status::Planned => "blue",
    }
}

/// Plants drawn as one trace, with one colour, in every frame
#[derive(Debug, PartialEq)]
struct MarkerGroup {
    name: String,
    colour: &'static str,
}

/// The marker groups for the map, in the order their traces are drawn.
///
/// When colouring by region, regions are ordered by first appearance.
fn marker_groups(animation: &Animation, colour_by: ColourBy) -> Vec<MarkerGroup> {
    match colour_by {
        ColourBy::Status => Status::iter()
            .map(|status| MarkerGroup {
                name: status.to_string(),
                colour: status_colour(status),
            })
            .collect(),
        ColourBy::Region => animation
            .rows()
            .map(|row| row.entity.region.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .enumerate()
            .map(|(idx, region)| MarkerGroup {
                name: region.to_string(),
                colour: series_colour(idx),
            })
            .collect(),
    }
}

/// The name of the marker group a row belongs to
fn group_name(row: &AnimationRow, colour_by: ColourBy) -> String {
    match colour_by {
        ColourBy::Status => row.status.to_string(),
        ColourBy::Region => row.entity.region.clone(),
    }
}

/// The plotly `sizeref` which makes the largest capacity [`MAX_MARKER_SIZE`] pixels across
fn marker_size_ref(animation: &Animation) -> f64 {
    let max_capacity = animation
        .rows()
        .map(|row| row.entity.capacity.value())
        .fold(0.0, f64::max);

    if max_capacity > 0.0 {
        2.0 * max_capacity / MAX_MARKER_SIZE.powi(2)
    } else {
        1.0
    }
}

/// A `scattergeo` trace with the rows of one marker group in one frame
fn group_trace(group: &MarkerGroup, rows: &[AnimationRow], size_ref: f64) -> Value {
    let lat: Vec<_> = rows.iter().map(|row| row.entity.latitude).collect();
    let lon: Vec<_> = rows.iter().map(|row| row.entity.longitude).collect();
    let size: Vec<_> = rows.iter().map(|row| row.entity.capacity.value()).collect();
    let names: Vec<_> = rows.iter().map(|row| row.entity.name.as_str()).collect();
    let custom_data: Vec<_> = rows
        .iter()
        .map(|row| {
            json!([
                row.entity.category,
                row.entity.event_date.format("%Y-%m-%d").to_string(),
                row.status.to_string(),
            ])
        })
        .collect();

    json!({
        "type": "scattergeo",
        "mode": "markers",
        "name": group.name,
        "legendgroup": group.name,
        "showlegend": true,
        "lat": lat,
        "lon": lon,
        "hovertext": names,
        "customdata": custom_data,
        "hovertemplate": HOVER_TEMPLATE,
        "marker": {
            "color": group.colour,
            "size": size,
            "sizemode": "area",
            "sizeref": size_ref,
            "opacity": MARKER_OPACITY,
        },
    })
}

/// One trace per marker group for a frame, in a fixed order so traces line up between frames
fn frame_traces(
    animation: &Animation,
    frame: Option<Period>,
    groups: &[MarkerGroup],
    colour_by: ColourBy,
    size_ref: f64,
) -> Vec<Value> {
    let rows: Vec<_> = frame
        .map(|frame| animation.frame_rows(frame).collect())
        .unwrap_or_default();
    groups
        .iter()
        .map(|group| {
            let matching: Vec<_> = rows
                .iter()
                .copied()
                .filter(|row| group_name(row, colour_by) == group.name)
                .collect();
            group_trace(group, &matching, size_ref)
        })
        .collect()
}

/// Arguments for a plotly `animate` call which jumps straight to `frames`
fn animate_args(frames: Value, duration: u32) -> Value {
    json!([
        frames,
        {
            "mode": "immediate",
            "fromcurrent": true,
            "frame": {"duration": duration, "redraw": true},
            "transition": {"duration": 0},
        }
    ])
}

/// The map geography: the contiguous U.S. on an Albers projection
fn geo() -> Value {
    json!({
        "scope": "usa",
        "projection": {"type": "albers usa"},
        "showland": true,
        "landcolor": "lightgray",
        "showlakes": true,
        "lakecolor": "white",
        "lataxis": {"range": [24, 50]},
        "lonaxis": {"range": [-125, -66]},
        "center": {"lat": 37.0902, "lon": -95.7129},
    })
}

/// The frame slider
fn sliders(frames: &[Period]) -> Value {
    let steps: Vec<_> = frames
        .iter()
        .map(|frame| {
            json!({
                "label": frame.to_string(),
                "method": "animate",
                "args": animate_args(json!([frame.to_string()]), 0),
            })
        })
        .collect();

    json!([{
        "active": 0,
        "currentvalue": {"prefix": "frame="},
        "len": 0.9,
        "x": 0.1,
        "pad": {"b": 10, "t": 60},
        "steps": steps,
    }])
}

/// The play and pause buttons
fn update_menus() -> Value {
    json!([{
        "type": "buttons",
        "direction": "left",
        "showactive": false,
        "x": 0.1,
        "xanchor": "right",
        "y": 0,
        "yanchor": "top",
        "pad": {"r": 10, "t": 70},
        "buttons": [
            {
                "label": "&#9654;",
                "method": "animate",
                "args": animate_args(Value::Null, FRAME_DURATION_MS),
            },
            {
                "label": "&#9724;",
                "method": "animate",
                "args": animate_args(json!([null]), 0),
            },
        ],
    }])
}

/// Build the animated map figure.
///
/// Each frame of the animation holds one trace per marker group (status or region). The initial
/// view shows the first frame. If there are no frames, the map is drawn with empty traces.
///
/// The title, legend, margins and configuration come from `plotly` types. The `scattergeo`
/// traces, geography, slider, buttons and frames are written as JSON.
pub fn animated_map_figure(
    animation: &Animation,
    title: &str,
    colour_by: ColourBy,
) -> Result<Figure> {
    let legend_title = match colour_by {
        ColourBy::Status => "status",
        ColourBy::Region => "region",
    };
    let mut plot = Plot::new();
    plot.set_layout(
        Layout::new()
            .title(Title::with_text(title))
            .legend(Legend::new().title(Title::with_text(legend_title)))
            .margin(Margin::new().left(0).right(0).top(30).bottom(0)),
    );
    plot.set_configuration(Configuration::new().responsive(true));
    let mut figure = Figure::from_plot(&plot)?;

    let groups = marker_groups(animation, colour_by);
    let size_ref = marker_size_ref(animation);
    let frames = animation.frames();
    figure.data = frame_traces(
        animation,
        frames.first().copied(),
        &groups,
        colour_by,
        size_ref,
    );
    figure.frames = frames
        .iter()
        .map(|&frame| {
            json!({
                "name": frame.to_string(),
                "data": frame_traces(animation, Some(frame), &groups, colour_by, size_ref),
            })
        })
        .collect();
    figure.set_layout_value("geo", geo());
    figure.set_layout_value("sliders", sliders(frames));
    figure.set_layout_value("updatemenus", update_menus());

    Ok(figure)
}
