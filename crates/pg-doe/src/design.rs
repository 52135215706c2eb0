//! Sample and design generation.

use crate::error::{DoeError, DoeResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column name for the temperature axis of a design.
pub const TEMPERATURE_COLUMN: &str = "Temperature [K]";

/// Column name for the pressure axis of a design.
pub const PRESSURE_COLUMN: &str = "Pressure [Pa]";

/// One design point. Identified by its position in the generated sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Temperature [K]
    pub temperature_k: f64,
    /// Pressure [Pa]
    pub pressure_pa: f64,
}

/// Generation method for a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DoeMethod {
    /// Full Cartesian product of evenly spaced axis values.
    Grid,
    /// Stratified random 2D design (one draw per stratum, axes paired randomly).
    LatinHypercube,
}

impl FromStr for DoeMethod {
    type Err = DoeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(Self::Grid),
            "latin-hypercube" | "lhs" => Ok(Self::LatinHypercube),
            other => Err(DoeError::UnsupportedMethod {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DoeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => write!(f, "grid"),
            Self::LatinHypercube => write!(f, "latin-hypercube"),
        }
    }
}

/// Configuration for design generation.
#[derive(Debug, Clone, PartialEq)]
pub struct DoeConfig {
    /// Temperature range (low, high) [K]
    pub temperature_range: (f64, f64),
    /// Pressure range (low, high) [Pa]
    pub pressure_range: (f64, f64),
    /// Number of temperature points
    pub n_temperature: usize,
    /// Number of pressure points
    pub n_pressure: usize,
    /// Generation method
    pub method: DoeMethod,
    /// RNG seed for the Latin-hypercube method; unseeded when `None`.
    pub seed: Option<u64>,
}

/// An ordered, immutable set of samples.
///
/// Grid designs record their `(n_temperature, n_pressure)` shape so that the
/// evaluated results can later be reshaped into a rectangular surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    samples: Vec<Sample>,
    method: DoeMethod,
    shape: Option<(usize, usize)>,
}

impl Design {
    /// Generate a design from a configuration.
    ///
    /// Grid ordering is temperature-major: every pressure for the first
    /// temperature, then every pressure for the second temperature, and so
    /// on. The order is stable and recoverable from `shape()`.
    pub fn generate(config: &DoeConfig) -> DoeResult<Self> {
        validate_range("temperature", config.temperature_range)?;
        validate_range("pressure", config.pressure_range)?;
        if config.n_temperature == 0 {
            return Err(DoeError::InvalidCount {
                what: "n_temperature",
            });
        }
        if config.n_pressure == 0 {
            return Err(DoeError::InvalidCount { what: "n_pressure" });
        }

        match config.method {
            DoeMethod::Grid => Ok(Self::generate_grid(config)),
            DoeMethod::LatinHypercube => Ok(Self::generate_lhs(config)),
        }
    }

    fn generate_grid(config: &DoeConfig) -> Self {
        let temperatures = linspace(
            config.temperature_range.0,
            config.temperature_range.1,
            config.n_temperature,
        );
        let pressures = linspace(
            config.pressure_range.0,
            config.pressure_range.1,
            config.n_pressure,
        );

        let mut samples = Vec::with_capacity(temperatures.len() * pressures.len());
        for &temperature_k in &temperatures {
            for &pressure_pa in &pressures {
                samples.push(Sample {
                    temperature_k,
                    pressure_pa,
                });
            }
        }

        Self {
            samples,
            method: DoeMethod::Grid,
            shape: Some((config.n_temperature, config.n_pressure)),
        }
    }

    fn generate_lhs(config: &DoeConfig) -> Self {
        let n = config.n_temperature * config.n_pressure;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let temperatures = stratified_axis(&mut rng, n, config.temperature_range);
        let mut pressures = stratified_axis(&mut rng, n, config.pressure_range);
        // The temperature axis keeps its stratum order; shuffling the second
        // axis alone is enough to decorrelate the pairing.
        pressures.shuffle(&mut rng);

        let samples = temperatures
            .into_iter()
            .zip(pressures)
            .map(|(temperature_k, pressure_pa)| Sample {
                temperature_k,
                pressure_pa,
            })
            .collect();

        Self {
            samples,
            method: DoeMethod::LatinHypercube,
            shape: None,
        }
    }

    /// Number of samples in the design.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the design is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Method used to generate the design.
    pub fn method(&self) -> DoeMethod {
        self.method
    }

    /// Grid shape `(n_temperature, n_pressure)`; `None` for non-grid designs.
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.shape
    }

    /// Iterate samples in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Access samples as a slice.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

fn validate_range(what: &'static str, (low, high): (f64, f64)) -> DoeResult<()> {
    if !low.is_finite() || !high.is_finite() || low >= high {
        return Err(DoeError::InvalidRange { what, low, high });
    }
    Ok(())
}

/// Evenly spaced points over [start, end], both endpoints included.
fn linspace(start: f64, end: f64, num_points: usize) -> Vec<f64> {
    if num_points <= 1 {
        return vec![start];
    }

    let mut points = Vec::with_capacity(num_points);
    let delta = (end - start) / (num_points - 1) as f64;
    for i in 0..num_points {
        points.push(start + i as f64 * delta);
    }

    // Ensure exact endpoint
    points[num_points - 1] = end;
    points
}

/// One uniform draw per stratum of [low, high), in stratum order.
fn stratified_axis(rng: &mut StdRng, n: usize, (low, high): (f64, f64)) -> Vec<f64> {
    let width = high - low;
    (0..n)
        .map(|i| {
            let u = (i as f64 + rng.gen_range(0.0..1.0)) / n as f64;
            low + u * width
        })
        .collect()
}
