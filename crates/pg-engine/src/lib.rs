//! pg-engine: the boundary with the external property-calculation engine.
//!
//! Provides:
//! - Fluid composition handling (ordered, normalized fractions)
//! - Equation-of-state selection
//! - The narrow request/response wire contract the engine is driven through
//! - An engine session that applies the error-code policy per evaluation
//! - An ideal-gas reference backend and a scripted backend for tests
//!
//! # Architecture
//!
//! All marshaling details (fixed-size buffers, fixed-length output arrays)
//! live behind the `PropertyBackend` trait, so the sampling and pipeline
//! layers only ever see `(outputs, warning)` or a typed error. The real
//! REFPROP-style native binding is implemented out of tree against the same
//! trait; this crate ships an ideal-gas backend so the tool runs without the
//! proprietary library.

pub mod backend;
pub mod composition;
pub mod eos;
pub mod error;
pub mod ideal_gas;
pub mod request;
pub mod scripted;
pub mod session;

pub use backend::{BackendSetup, FluidConstants, PropertyBackend};
pub use composition::Composition;
pub use eos::EquationOfState;
pub use error::{EngineError, EngineResult};
pub use ideal_gas::IdealGasBackend;
pub use request::{
    OutputProperty, PropertyRequest, RawResponse, INPUT_PAIR_TP, UNIT_SYSTEM_MASS_SI,
};
pub use scripted::ScriptedBackend;
pub use session::{EngineSession, PropertyValues, CODE_OK, CODE_OUTSIDE_VALIDITY};
