//! Design generation errors.

use thiserror::Error;

/// Result type for design generation.
pub type DoeResult<T> = Result<T, DoeError>;

/// Errors that can occur while generating a design.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DoeError {
    /// Generation method name is not one of the supported methods.
    #[error("Sampling method not implemented: {name}")]
    UnsupportedMethod { name: String },

    /// Axis range is empty, inverted, or non-finite.
    #[error("Invalid range for {what}: ({low}, {high})")]
    InvalidRange { what: &'static str, low: f64, high: f64 },

    /// Axis point count is zero.
    #[error("Invalid point count for {what}")]
    InvalidCount { what: &'static str },
}
