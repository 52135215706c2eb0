//! pg-run: the evaluation pipeline from design to plot-ready results.
//!
//! Drives an initialized engine session over a design in strict generation
//! order, joins the outputs back with the originating inputs, and reshapes
//! the result table into the two visualization artifacts (3D surface and
//! 3D scatter HTML documents).

pub mod error;
pub mod pipeline;
pub mod pivot;
pub mod plot;
pub mod table;

pub use error::{RunError, RunResult};
pub use pipeline::{evaluate_design, FailurePolicy, ProgressEvent};
pub use pivot::{pivot, PivotError, PivotTable};
pub use plot::{write_scatter_html, write_surface_html, PlotAxes, PlotError};
pub use table::{ResultRow, ResultTable, SampleFailure};
