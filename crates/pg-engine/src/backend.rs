//! Property backend trait and setup types.

use crate::composition::Composition;
use crate::eos::EquationOfState;
use crate::error::EngineResult;
use crate::request::{PropertyRequest, RawResponse};
use std::path::Path;

/// One-time setup inputs for a backend.
#[derive(Debug, Clone)]
pub struct BackendSetup<'a> {
    /// Engine installation directory, for backends that load support files.
    pub install_path: Option<&'a Path>,
    /// Equation-of-state override; `None` keeps the backend default.
    pub equation_of_state: Option<EquationOfState>,
    /// Fluid composition for the whole run.
    pub composition: &'a Composition,
}

/// Fluid physical constants retrieved during setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidConstants {
    /// Molar mass [kg/kmol]
    pub molar_mass_kg_kmol: f64,
    /// Critical temperature [K]
    pub t_crit_k: f64,
    /// Critical pressure [Pa]
    pub p_crit_pa: f64,
    /// Critical density [kg/m3]
    pub rho_crit_kg_m3: f64,
    /// Acentric factor (dimensionless)
    pub acentric_factor: f64,
}

/// The narrow seam to a property-calculation engine.
///
/// Everything about the engine's calling convention stays behind this trait;
/// callers only see typed requests and raw `(values, code, message)`
/// responses. Setup runs once per session and is the only mutation a backend
/// sees; evaluation must be stateless with respect to the backend.
pub trait PropertyBackend {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// One-time setup. Failure here is fatal to the run.
    fn setup(&mut self, setup: &BackendSetup<'_>) -> EngineResult<FluidConstants>;

    /// Evaluate one request. Errors are reported through the response code,
    /// not through `Result`: the session layer owns the code policy.
    fn evaluate(&self, request: &PropertyRequest<'_>) -> RawResponse;
}
