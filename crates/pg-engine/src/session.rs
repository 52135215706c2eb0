//! Engine session: one-time initialization plus the per-call code policy.

use crate::backend::{BackendSetup, FluidConstants, PropertyBackend};
use crate::composition::Composition;
use crate::eos::EquationOfState;
use crate::error::{EngineError, EngineResult};
use crate::request::{OutputProperty, PropertyRequest, INPUT_PAIR_TP, UNIT_SYSTEM_MASS_SI};
use std::path::PathBuf;

/// Engine code for a clean success.
pub const CODE_OK: i32 = 0;

/// Engine code for "value returned but outside the strict validity region".
/// Tolerated: the outputs are still usable and the run continues.
pub const CODE_OUTSIDE_VALIDITY: i32 = -117;

/// Outputs of one successful evaluation, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValues {
    values: Vec<(OutputProperty, f64)>,
    warning: Option<String>,
}

impl PropertyValues {
    /// Value of a property, if it was requested.
    pub fn get(&self, property: OutputProperty) -> Option<f64> {
        self.values
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }

    /// All values in request order.
    pub fn iter(&self) -> impl Iterator<Item = (OutputProperty, f64)> + '_ {
        self.values.iter().copied()
    }

    /// Diagnostic text of a tolerated out-of-validity warning, if any.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Consume into the ordered value list.
    pub fn into_values(self) -> Vec<(OutputProperty, f64)> {
        self.values
    }
}

/// An initialized engine handle.
///
/// Construction runs the backend's one-time setup; afterwards the session is
/// immutable and every evaluation is an independent, stateless call. The
/// session is an explicit value rather than process-global state so tests can
/// substitute a scripted backend.
pub struct EngineSession<B: PropertyBackend> {
    backend: B,
    composition: Composition,
    fluid: String,
    fractions: Vec<f64>,
    equation_of_state: Option<EquationOfState>,
    constants: FluidConstants,
}

impl<B: PropertyBackend> std::fmt::Debug for EngineSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineSession")
            .field("backend", &self.backend.name())
            .field("composition", &self.composition)
            .field("fluid", &self.fluid)
            .field("fractions", &self.fractions)
            .field("equation_of_state", &self.equation_of_state)
            .field("constants", &self.constants)
            .finish()
    }
}

impl<B: PropertyBackend> EngineSession<B> {
    /// Initialize the engine once for the run.
    ///
    /// Fails with [`EngineError::Init`] if the backend's setup is rejected;
    /// this aborts before any sampling begins.
    pub fn init(
        mut backend: B,
        composition: Composition,
        equation_of_state: Option<EquationOfState>,
        install_path: Option<PathBuf>,
    ) -> EngineResult<Self> {
        let setup = BackendSetup {
            install_path: install_path.as_deref(),
            equation_of_state,
            composition: &composition,
        };
        let constants = backend.setup(&setup)?;

        tracing::info!(
            backend = backend.name(),
            fluid = %composition.fluid_string(),
            eos = equation_of_state.map(|e| e.code()).unwrap_or("default"),
            molar_mass_kg_kmol = constants.molar_mass_kg_kmol,
            t_crit_k = constants.t_crit_k,
            p_crit_pa = constants.p_crit_pa,
            "engine session initialized"
        );

        let fluid = composition.fluid_string();
        let fractions = composition.fractions();
        Ok(Self {
            backend,
            composition,
            fluid,
            fractions,
            equation_of_state,
            constants,
        })
    }

    /// Fluid composition fixed for the run.
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Selected equation of state; `None` means the engine default.
    pub fn equation_of_state(&self) -> Option<EquationOfState> {
        self.equation_of_state
    }

    /// Fluid constants retrieved during setup.
    pub fn constants(&self) -> &FluidConstants {
        &self.constants
    }

    /// Evaluate the requested outputs at one (temperature, pressure) point.
    ///
    /// Code policy:
    /// - [`CODE_OK`]: success.
    /// - [`CODE_OUTSIDE_VALIDITY`]: tolerated; outputs are returned with the
    ///   diagnostic retained as a warning.
    /// - any other code: [`EngineError::Property`] carrying the inputs and
    ///   diagnostic. Never retried.
    pub fn evaluate(
        &self,
        outputs: &[OutputProperty],
        temperature_k: f64,
        pressure_pa: f64,
    ) -> EngineResult<PropertyValues> {
        let output_codes = OutputProperty::code_string(outputs);
        let request = PropertyRequest {
            fluid: &self.fluid,
            input_pair: INPUT_PAIR_TP,
            outputs: &output_codes,
            unit_system: UNIT_SYSTEM_MASS_SI,
            flag: 0,
            temperature_k,
            pressure_pa,
            fractions: &self.fractions,
        };

        let response = self.backend.evaluate(&request);

        let warning = match response.code {
            CODE_OK => None,
            CODE_OUTSIDE_VALIDITY => {
                tracing::warn!(
                    temperature_k,
                    pressure_pa,
                    message = %response.message,
                    "outputs outside engine validity region, keeping values"
                );
                Some(response.message.clone())
            }
            code => {
                return Err(EngineError::Property {
                    fluid: self.fluid.clone(),
                    fractions: self.fractions.clone(),
                    temperature_k,
                    pressure_pa,
                    code,
                    message: response.message,
                });
            }
        };

        if response.values.len() < outputs.len() {
            return Err(EngineError::Property {
                fluid: self.fluid.clone(),
                fractions: self.fractions.clone(),
                temperature_k,
                pressure_pa,
                code: response.code,
                message: format!(
                    "engine returned {} outputs, {} requested",
                    response.values.len(),
                    outputs.len()
                ),
            });
        }

        // Only the first N output slots are meaningful.
        let values = outputs
            .iter()
            .copied()
            .zip(response.values.into_iter())
            .collect();

        Ok(PropertyValues { values, warning })
    }
}
