//! Visualization export: 3D surface and 3D scatter HTML documents.

use crate::pivot::PivotTable;
use crate::table::ResultTable;
use plotly::common::{ColorScale, ColorScalePalette, Marker, Mode};
use plotly::color::Rgb;
use plotly::layout::{Axis, Layout, LayoutScene};
use plotly::{Plot, Scatter3D, Surface};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from writing plot artifacts.
#[derive(Error, Debug)]
pub enum PlotError {
    /// An axis names a column that is not in the table.
    #[error("Unknown plot column: {name}")]
    UnknownColumn { name: String },

    /// The table has no rows to plot.
    #[error("Cannot plot an empty table")]
    Empty,

    #[error("Failed to write plot file: {0}")]
    Io(#[from] std::io::Error),
}

/// Column names for the three spatial axes and the scatter color property.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotAxes {
    pub x: String,
    pub y: String,
    pub z: String,
    pub color: String,
}

/// Write a 3D surface of the pivoted table as a self-contained HTML document.
pub fn write_surface_html(
    pivoted: &PivotTable,
    axes: &PlotAxes,
    path: &Path,
) -> Result<(), PlotError> {
    let trace = Surface::new(pivoted.z.clone())
        .x(pivoted.x_values.clone())
        .y(pivoted.y_values.clone())
        .color_scale(ColorScale::Palette(ColorScalePalette::Viridis));

    let layout = Layout::new().scene(
        LayoutScene::new()
            .x_axis(Axis::new().title(axes.x.as_str()))
            .y_axis(Axis::new().title(axes.y.as_str()))
            .z_axis(Axis::new().title(axes.z.as_str())),
    );

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);

    fs::write(path, plot.to_html())?;
    tracing::info!(path = %path.display(), "surface plot written");
    Ok(())
}

/// Write every table row as a 3D scatter point, colored by the configured
/// color column, as a self-contained HTML document.
pub fn write_scatter_html(
    table: &ResultTable,
    axes: &PlotAxes,
    path: &Path,
) -> Result<(), PlotError> {
    if table.is_empty() {
        return Err(PlotError::Empty);
    }

    let xs = column(table, &axes.x)?;
    let ys = column(table, &axes.y)?;
    let zs = column(table, &axes.z)?;
    let colors = column(table, &axes.color)?;

    let marker_colors = map_to_viridis(&colors);
    let trace = Scatter3D::new(xs, ys, zs)
        .mode(Mode::Markers)
        .marker(Marker::new().size(3).color_array(marker_colors));

    let layout = Layout::new().scene(
        LayoutScene::new()
            .x_axis(Axis::new().title(axes.x.as_str()))
            .y_axis(Axis::new().title(axes.y.as_str()))
            .z_axis(Axis::new().title(axes.z.as_str())),
    );

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);

    fs::write(path, plot.to_html())?;
    tracing::info!(path = %path.display(), "scatter plot written");
    Ok(())
}

fn column(table: &ResultTable, name: &str) -> Result<Vec<f64>, PlotError> {
    table.column(name).ok_or_else(|| PlotError::UnknownColumn {
        name: name.to_string(),
    })
}

/// Viridis colormap anchors, low to high.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Map values onto the Viridis gradient by linear normalization.
fn map_to_viridis(values: &[f64]) -> Vec<Rgb> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|&v| {
            let u = if span > 0.0 { (v - min) / span } else { 0.5 };
            viridis_at(u.clamp(0.0, 1.0))
        })
        .collect()
}

fn viridis_at(u: f64) -> Rgb {
    let scaled = u * (VIRIDIS.len() - 1) as f64;
    let low = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - low as f64;

    let (r0, g0, b0) = VIRIDIS[low];
    let (r1, g1, b1) = VIRIDIS[low + 1];
    let lerp = |a: u8, b: u8| (a as f64 + frac * (b as f64 - a as f64)).round() as u8;
    Rgb::new(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
