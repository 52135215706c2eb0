//! Run configuration loaded from YAML.

use crate::CliError;
use indexmap::IndexMap;
use pg_doe::{DoeConfig, DoeMethod};
use pg_engine::{Composition, EquationOfState, OutputProperty};
use pg_run::{FailurePolicy, PlotAxes};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which property backend to drive the run with.
///
/// External engine bindings plug in by implementing `PropertyBackend`; the
/// built-in ideal-gas backend keeps the tool runnable without them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    #[default]
    IdealGas,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Engine installation directory, for backends that load support files.
    #[serde(default)]
    pub install_path: Option<PathBuf>,
    /// Equation-of-state override; omit for the engine default.
    #[serde(default)]
    pub equation_of_state: Option<EquationOfState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    pub method: DoeMethod,
    /// Temperature range (low, high) [K]
    pub temperature_range: (f64, f64),
    /// Pressure range (low, high) [Pa]
    pub pressure_range: (f64, f64),
    pub n_grid_temperature: usize,
    pub n_grid_pressure: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotConfig {
    pub xaxis: String,
    pub yaxis: String,
    pub zaxis: String,
    /// Extra property coloring the scatter points.
    pub color: String,
    #[serde(default = "default_surface_file")]
    pub surface_file: PathBuf,
    #[serde(default = "default_scatter_file")]
    pub scatter_file: PathBuf,
}

fn default_surface_file() -> PathBuf {
    PathBuf::from("propgrid_surface_plot.html")
}

fn default_scatter_file() -> PathBuf {
    PathBuf::from("propgrid_scatter_plot.html")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Write the result table as CSV to this path.
    #[serde(default)]
    pub table_csv: Option<PathBuf>,
    /// Write the result table (rows and failures) as JSON to this path.
    #[serde(default)]
    pub table_json: Option<PathBuf>,
}

/// Full run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Fluid composition: component name -> fraction, order preserved.
    pub fluid: IndexMap<String, f64>,
    #[serde(default = "default_outputs")]
    pub outputs: Vec<OutputProperty>,
    pub sampling: SamplingConfig,
    pub plot: PlotConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_outputs() -> Vec<OutputProperty> {
    vec![
        OutputProperty::Temperature,
        OutputProperty::Pressure,
        OutputProperty::Density,
        OutputProperty::Viscosity,
        OutputProperty::PhaseIndicator,
    ]
}

impl RunConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig =
            serde_yaml::from_str(&text).map_err(|e| CliError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CliError> {
        if self.fluid.is_empty() {
            return Err(CliError::Config("fluid composition is empty".to_string()));
        }
        if self.outputs.is_empty() {
            return Err(CliError::Config("outputs list is empty".to_string()));
        }
        Ok(())
    }

    /// Build the fluid composition in configuration order.
    pub fn composition(&self) -> Result<Composition, CliError> {
        let fractions: Vec<(String, f64)> = self
            .fluid
            .iter()
            .map(|(name, frac)| (name.clone(), *frac))
            .collect();
        Composition::new(fractions).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Build the design configuration, with an optional seed override.
    pub fn doe_config(&self, seed_override: Option<u64>) -> DoeConfig {
        DoeConfig {
            temperature_range: self.sampling.temperature_range,
            pressure_range: self.sampling.pressure_range,
            n_temperature: self.sampling.n_grid_temperature,
            n_pressure: self.sampling.n_grid_pressure,
            method: self.sampling.method,
            seed: seed_override.or(self.sampling.seed),
        }
    }

    /// Plot axes resolved from the configuration.
    pub fn plot_axes(&self) -> PlotAxes {
        PlotAxes {
            x: self.plot.xaxis.clone(),
            y: self.plot.yaxis.clone(),
            z: self.plot.zaxis.clone(),
            color: self.plot.color.clone(),
        }
    }

    pub fn equation_of_state(&self) -> Option<EquationOfState> {
        self.engine.equation_of_state
    }
}
