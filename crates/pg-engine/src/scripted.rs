//! Scripted backend: a deterministic stand-in for the external engine.
//!
//! Used by tests and offline pipeline exercises to script exact response
//! codes and output arrays without any native library.

use crate::backend::{BackendSetup, FluidConstants, PropertyBackend};
use crate::error::{EngineError, EngineResult};
use crate::request::{PropertyRequest, RawResponse};

type ResponseFn = Box<dyn Fn(&PropertyRequest<'_>) -> RawResponse>;

/// Backend whose responses come from a caller-supplied closure.
pub struct ScriptedBackend {
    respond: ResponseFn,
    setup_error: Option<String>,
    constants: FluidConstants,
}

impl ScriptedBackend {
    /// Create a backend that answers every request with `respond`.
    pub fn new(respond: impl Fn(&PropertyRequest<'_>) -> RawResponse + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            setup_error: None,
            constants: Self::default_constants(),
        }
    }

    /// Create a backend whose setup fails with the given diagnostic.
    pub fn failing_setup(message: impl Into<String>) -> Self {
        Self {
            respond: Box::new(|_| RawResponse::ok(vec![])),
            setup_error: Some(message.into()),
            constants: Self::default_constants(),
        }
    }

    /// Override the constants reported at setup.
    pub fn with_constants(mut self, constants: FluidConstants) -> Self {
        self.constants = constants;
        self
    }

    /// CO2-like constants, good enough for scripted runs.
    fn default_constants() -> FluidConstants {
        FluidConstants {
            molar_mass_kg_kmol: 44.0095,
            t_crit_k: 304.13,
            p_crit_pa: 7.3773e6,
            rho_crit_kg_m3: 467.6,
            acentric_factor: 0.2239,
        }
    }
}

impl PropertyBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn setup(&mut self, _setup: &BackendSetup<'_>) -> EngineResult<FluidConstants> {
        if let Some(message) = &self.setup_error {
            return Err(EngineError::Init {
                message: message.clone(),
            });
        }
        Ok(self.constants)
    }

    fn evaluate(&self, request: &PropertyRequest<'_>) -> RawResponse {
        (self.respond)(request)
    }
}
