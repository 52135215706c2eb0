//! Pivot a result table into a rectangular matrix.

use crate::table::ResultTable;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from pivoting a result table.
///
/// Non-unique or absent cells are only possible when the design was not
/// generated with the grid method; grid output always pivots cleanly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PivotError {
    /// Column name is not present in the table.
    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    /// The table has no rows to pivot.
    #[error("Cannot pivot an empty table")]
    Empty,

    /// More than one z-value for one (x, y) pair.
    #[error("Ambiguous pivot: duplicate cell at x={x}, y={y}")]
    DuplicateCell { x: f64, y: f64 },

    /// No z-value for one (x, y) pair of the cross product.
    #[error("Ambiguous pivot: missing cell at x={x}, y={y}")]
    MissingCell { x: f64, y: f64 },
}

/// A rectangular matrix: `z[row][col]` for `y_values[row]`, `x_values[col]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

/// Pivot the table on the chosen axes: unique sorted y values become rows,
/// unique sorted x values become columns, and the z column fills the cells.
///
/// Cell identity uses exact f64 equality. The grid generator reuses identical
/// axis values across samples, so grid output always forms an exact
/// rectangle; designs from other methods generally do not and fail here.
pub fn pivot(
    table: &ResultTable,
    x_column: &str,
    y_column: &str,
    z_column: &str,
) -> Result<PivotTable, PivotError> {
    let xs = column(table, x_column)?;
    let ys = column(table, y_column)?;
    let zs = column(table, z_column)?;

    if xs.is_empty() {
        return Err(PivotError::Empty);
    }

    let (x_values, x_index) = unique_sorted(&xs);
    let (y_values, y_index) = unique_sorted(&ys);

    let mut z: Vec<Vec<Option<f64>>> = vec![vec![None; x_values.len()]; y_values.len()];
    for ((&x, &y), &value) in xs.iter().zip(&ys).zip(&zs) {
        let row = y_index[&y.to_bits()];
        let col = x_index[&x.to_bits()];
        if z[row][col].is_some() {
            return Err(PivotError::DuplicateCell { x, y });
        }
        z[row][col] = Some(value);
    }

    let mut filled = Vec::with_capacity(y_values.len());
    for (row, y) in z.into_iter().zip(&y_values) {
        let mut out = Vec::with_capacity(x_values.len());
        for (cell, x) in row.into_iter().zip(&x_values) {
            match cell {
                Some(value) => out.push(value),
                None => return Err(PivotError::MissingCell { x: *x, y: *y }),
            }
        }
        filled.push(out);
    }

    Ok(PivotTable {
        x_values,
        y_values,
        z: filled,
    })
}

fn column(table: &ResultTable, name: &str) -> Result<Vec<f64>, PivotError> {
    table.column(name).ok_or_else(|| PivotError::UnknownColumn {
        name: name.to_string(),
    })
}

/// Unique values sorted ascending, plus a bits->index lookup.
fn unique_sorted(values: &[f64]) -> (Vec<f64>, HashMap<u64, usize>) {
    let mut unique = values.to_vec();
    unique.sort_by(f64::total_cmp);
    unique.dedup_by(|a, b| a.to_bits() == b.to_bits());

    let index = unique
        .iter()
        .enumerate()
        .map(|(i, v)| (v.to_bits(), i))
        .collect();
    (unique, index)
}
