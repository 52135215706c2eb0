//! Fluid composition (pure or mixtures).

use crate::error::{EngineError, EngineResult};

/// Fluid composition defined by normalized fractions over named components.
///
/// Component order is the caller-defined insertion order and is preserved:
/// it is the order fractions are marshaled to the engine, which must match
/// the order of the component names in the fluid string.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Components and their fractions (always normalized to sum=1).
    items: Vec<(String, f64)>,
}

impl Composition {
    /// Create a pure-component composition.
    pub fn pure(component: impl Into<String>) -> Self {
        Self {
            items: vec![(component.into(), 1.0)],
        }
    }

    /// Create a composition from component fractions.
    ///
    /// Validates that all fractions are finite, non-negative, and have a
    /// positive sum, then normalizes to sum=1. Insertion order is kept.
    pub fn new(fractions: Vec<(String, f64)>) -> EngineResult<Self> {
        if fractions.is_empty() {
            return Err(EngineError::Composition {
                what: "empty composition",
            });
        }

        let mut sum = 0.0;
        for (_, frac) in &fractions {
            if !frac.is_finite() {
                return Err(EngineError::Composition {
                    what: "non-finite fraction",
                });
            }
            if *frac < 0.0 {
                return Err(EngineError::Composition {
                    what: "negative fraction",
                });
            }
            sum += frac;
        }

        if sum <= 0.0 || !sum.is_finite() {
            return Err(EngineError::Composition {
                what: "fractions sum to zero or non-finite",
            });
        }

        let items: Vec<(String, f64)> = fractions
            .into_iter()
            .map(|(name, f)| (name, f / sum))
            .collect();

        Ok(Self { items })
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the composition has no components (never true for a
    /// successfully constructed value).
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fraction of a component (0.0 if not present).
    pub fn fraction(&self, component: &str) -> f64 {
        self.items
            .iter()
            .find(|(name, _)| name == component)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// Iterate components with their fractions, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.items.iter().map(|(name, f)| (name.as_str(), *f))
    }

    /// Fractions alone, in the same order as `fluid_string()`.
    pub fn fractions(&self) -> Vec<f64> {
        self.items.iter().map(|(_, f)| *f).collect()
    }

    /// Component names joined with `;`, the engine's fluid identifier format.
    pub fn fluid_string(&self) -> String {
        self.items
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }
}
