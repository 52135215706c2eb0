//! pg-doe: design-of-experiments generation for propgrid.
//!
//! Produces the ordered set of (temperature, pressure) state points that a
//! run evaluates. Two generation methods are supported:
//! - full Cartesian grid (evenly spaced, endpoints included)
//! - Latin-hypercube (stratified random, optionally seeded)
//!
//! The design is generated once per run and never mutated afterwards; its
//! iteration order is part of the contract because grid results are later
//! pivoted back into a rectangular surface.

pub mod design;
pub mod error;

pub use design::{Design, DoeConfig, DoeMethod, Sample, TEMPERATURE_COLUMN, PRESSURE_COLUMN};
pub use error::{DoeError, DoeResult};
