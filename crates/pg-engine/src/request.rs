//! The wire-level request/response contract with the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input-property pair code: temperature and pressure.
pub const INPUT_PAIR_TP: &str = "TP";

/// Unit-system code for the mass-basis SI convention.
pub const UNIT_SYSTEM_MASS_SI: i32 = 21;

/// Output properties the engine can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputProperty {
    /// Temperature echo [K]
    #[serde(rename = "T")]
    Temperature,
    /// Pressure echo [Pa]
    #[serde(rename = "P")]
    Pressure,
    /// Density [kg/m3]
    #[serde(rename = "D")]
    Density,
    /// Dynamic viscosity [Pa·s]
    #[serde(rename = "VIS")]
    Viscosity,
    /// Phase-indicator parameter (dimensionless)
    #[serde(rename = "PIP")]
    PhaseIndicator,
}

impl OutputProperty {
    /// Engine output code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Temperature => "T",
            Self::Pressure => "P",
            Self::Density => "D",
            Self::Viscosity => "VIS",
            Self::PhaseIndicator => "PIP",
        }
    }

    /// Comma-separated output-code list for a request, in request order.
    pub fn code_string(outputs: &[OutputProperty]) -> String {
        outputs
            .iter()
            .map(|p| p.code())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for OutputProperty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "T" => Ok(Self::Temperature),
            "P" => Ok(Self::Pressure),
            "D" => Ok(Self::Density),
            "VIS" => Ok(Self::Viscosity),
            "PIP" => Ok(Self::PhaseIndicator),
            other => Err(format!("unknown output property: {other}")),
        }
    }
}

impl fmt::Display for OutputProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One evaluation request, mirroring the engine's calling convention.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRequest<'a> {
    /// Fluid identifier string (component names joined with `;`).
    pub fluid: &'a str,
    /// Two-letter input-property code (fixed to [`INPUT_PAIR_TP`]).
    pub input_pair: &'a str,
    /// Comma-separated output-property codes.
    pub outputs: &'a str,
    /// Unit-system code (fixed to [`UNIT_SYSTEM_MASS_SI`]).
    pub unit_system: i32,
    /// Engine behavior flag (fixed to 0).
    pub flag: i32,
    /// First input value: temperature [K].
    pub temperature_k: f64,
    /// Second input value: pressure [Pa].
    pub pressure_pa: f64,
    /// Component fractions in fluid-string order.
    pub fractions: &'a [f64],
}

/// Raw engine response: output array, error code, diagnostic text.
///
/// Only the first N output slots are meaningful, N being the number of
/// requested properties; the session layer truncates accordingly.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub values: Vec<f64>,
    pub code: i32,
    pub message: String,
}

impl RawResponse {
    /// A clean success response.
    pub fn ok(values: Vec<f64>) -> Self {
        Self {
            values,
            code: 0,
            message: String::new(),
        }
    }

    /// An error (or warning) response with a diagnostic.
    pub fn with_code(values: Vec<f64>, code: i32, message: impl Into<String>) -> Self {
        Self {
            values,
            code,
            message: message.into(),
        }
    }
}
