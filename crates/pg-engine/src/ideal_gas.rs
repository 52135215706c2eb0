//! Ideal-gas reference backend.
//!
//! Lets the pipeline run end to end without the proprietary property engine.
//! Density comes from the ideal-gas law on a mass basis, viscosity from a
//! Sutherland correlation, and the phase indicator is the ideal-gas value.
//! Accuracy is whatever the ideal-gas law gives; this backend exists for
//! tool development and demos, not for engineering numbers.

use crate::backend::{BackendSetup, FluidConstants, PropertyBackend};
use crate::error::{EngineError, EngineResult};
use crate::request::{PropertyRequest, RawResponse};
use crate::session::CODE_OUTSIDE_VALIDITY;

/// Universal gas constant [J/(mol·K)].
const R_UNIVERSAL: f64 = 8.314_462_618_153_24;

/// Validity band of the correlations [K]. Outside it the backend still
/// answers, flagged with the tolerated out-of-validity code.
const T_VALID_MIN_K: f64 = 200.0;
const T_VALID_MAX_K: f64 = 2000.0;

/// Sutherland viscosity constants (air-like reference).
const MU_REF_PA_S: f64 = 1.716e-5;
const T_REF_K: f64 = 273.15;
const SUTHERLAND_K: f64 = 110.4;

/// Non-physical input state (non-positive or non-finite T/P).
const CODE_BAD_STATE: i32 = 249;

/// Unrecognized output-property code in the request.
const CODE_BAD_OUTPUT: i32 = 441;

/// Component constants: molar mass [kg/kmol], critical T [K], critical P
/// [Pa], critical density [kg/m3], acentric factor.
const COMPONENTS: &[(&str, f64, f64, f64, f64, f64)] = &[
    ("CO2", 44.0095, 304.13, 7.3773e6, 467.6, 0.2239),
    ("N2", 28.0134, 126.19, 3.3958e6, 313.3, 0.0372),
    ("O2", 31.9988, 154.58, 5.043e6, 436.1, 0.0222),
    ("CH4", 16.0428, 190.56, 4.5992e6, 162.66, 0.0114),
    ("H2", 2.01588, 33.145, 1.2964e6, 31.26, -0.219),
    ("HE", 4.002602, 5.1953, 2.2746e5, 72.57, -0.385),
    ("AR", 39.948, 150.69, 4.863e6, 535.6, -0.00219),
    ("H2O", 18.0153, 647.10, 2.2064e7, 322.0, 0.3443),
];

/// Built-in backend computing properties from ideal-gas relations.
#[derive(Debug, Default)]
pub struct IdealGasBackend {
    molar_mass_kg_kmol: f64,
}

impl IdealGasBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(name: &str) -> Option<&'static (&'static str, f64, f64, f64, f64, f64)> {
        let upper = name.to_ascii_uppercase();
        COMPONENTS.iter().find(|(n, ..)| *n == upper)
    }

    fn density_kg_m3(&self, temperature_k: f64, pressure_pa: f64) -> f64 {
        // Mass-basis ideal-gas law: rho = P * M / (R * T), M in kg/mol.
        pressure_pa * (self.molar_mass_kg_kmol * 1e-3) / (R_UNIVERSAL * temperature_k)
    }

    fn viscosity_pa_s(&self, temperature_k: f64) -> f64 {
        MU_REF_PA_S
            * (temperature_k / T_REF_K).powf(1.5)
            * (T_REF_K + SUTHERLAND_K)
            / (temperature_k + SUTHERLAND_K)
    }
}

impl PropertyBackend for IdealGasBackend {
    fn name(&self) -> &str {
        "ideal-gas"
    }

    /// Compute mole-fraction-weighted mixture constants.
    ///
    /// The equation-of-state override is ignored: this backend has exactly
    /// one model. Unknown components are a setup failure.
    fn setup(&mut self, setup: &BackendSetup<'_>) -> EngineResult<FluidConstants> {
        let mut constants = FluidConstants {
            molar_mass_kg_kmol: 0.0,
            t_crit_k: 0.0,
            p_crit_pa: 0.0,
            rho_crit_kg_m3: 0.0,
            acentric_factor: 0.0,
        };

        for (name, fraction) in setup.composition.iter() {
            let Some((_, molar_mass, t_crit, p_crit, rho_crit, acentric)) = Self::lookup(name)
            else {
                return Err(EngineError::Init {
                    message: format!("no fluid data for component {name}"),
                });
            };
            constants.molar_mass_kg_kmol += fraction * molar_mass;
            constants.t_crit_k += fraction * t_crit;
            constants.p_crit_pa += fraction * p_crit;
            constants.rho_crit_kg_m3 += fraction * rho_crit;
            constants.acentric_factor += fraction * acentric;
        }

        self.molar_mass_kg_kmol = constants.molar_mass_kg_kmol;
        Ok(constants)
    }

    fn evaluate(&self, request: &PropertyRequest<'_>) -> RawResponse {
        let t = request.temperature_k;
        let p = request.pressure_pa;

        if !t.is_finite() || !p.is_finite() || t <= 0.0 || p <= 0.0 {
            return RawResponse::with_code(
                vec![],
                CODE_BAD_STATE,
                format!("non-physical state: T={t} K, P={p} Pa"),
            );
        }

        let mut values = Vec::new();
        for code in request.outputs.split(',') {
            let value = match code {
                "T" => t,
                "P" => p,
                "D" => self.density_kg_m3(t, p),
                "VIS" => self.viscosity_pa_s(t),
                // PIP = 2 - rho*(d2P/drho dT)/(dP/dT) evaluates to exactly 1
                // for an ideal gas.
                "PIP" => 1.0,
                other => {
                    return RawResponse::with_code(
                        vec![],
                        CODE_BAD_OUTPUT,
                        format!("unknown output code: {other}"),
                    );
                }
            };
            values.push(value);
        }

        if !(T_VALID_MIN_K..=T_VALID_MAX_K).contains(&t) {
            return RawResponse::with_code(
                values,
                CODE_OUTSIDE_VALIDITY,
                format!(
                    "T={t} K outside correlation validity [{T_VALID_MIN_K}, {T_VALID_MAX_K}] K"
                ),
            );
        }

        RawResponse::ok(values)
    }
}
