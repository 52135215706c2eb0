//! Engine boundary errors.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur at the property-engine boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// One-time engine setup failed (missing support files, setup rejection).
    /// Fatal: nothing can be evaluated after this.
    #[error("Engine initialization failed: {message}")]
    Init { message: String },

    /// Equation-of-state name is not one of the supported models.
    #[error("Unknown equation of state: {name} (expected AGA8, PR, or GERG)")]
    UnknownEquationOfState { name: String },

    /// A single evaluation returned an error code outside the tolerated set.
    /// Carries the full inputs so the failing state point can be reported.
    #[error(
        "Property evaluation failed with code {code} for {fluid} \
         (fractions {fractions:?}) at T={temperature_k} K, P={pressure_pa} Pa: {message}"
    )]
    Property {
        fluid: String,
        fractions: Vec<f64>,
        temperature_k: f64,
        pressure_pa: f64,
        code: i32,
        message: String,
    },

    /// Composition is empty or contains non-physical fractions.
    #[error("Invalid composition: {what}")]
    Composition { what: &'static str },
}
