//! Equation-of-state selection.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named equation-of-state models the engine can be switched to.
///
/// Leaving the selection unset (`Option::None` at the session level) keeps
/// the engine's default model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquationOfState {
    #[serde(rename = "AGA8")]
    Aga8,
    #[serde(rename = "PR")]
    Pr,
    #[serde(rename = "GERG")]
    Gerg,
}

impl EquationOfState {
    /// Engine-facing model name.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Aga8 => "AGA8",
            Self::Pr => "PR",
            Self::Gerg => "GERG",
        }
    }
}

impl FromStr for EquationOfState {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AGA8" => Ok(Self::Aga8),
            "PR" => Ok(Self::Pr),
            "GERG" => Ok(Self::Gerg),
            other => Err(EngineError::UnknownEquationOfState {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for EquationOfState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_models() {
        assert_eq!("AGA8".parse::<EquationOfState>().unwrap(), EquationOfState::Aga8);
        assert_eq!("PR".parse::<EquationOfState>().unwrap(), EquationOfState::Pr);
        assert_eq!("GERG".parse::<EquationOfState>().unwrap(), EquationOfState::Gerg);
    }

    #[test]
    fn reject_unknown_model() {
        let err = "SRK".parse::<EquationOfState>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownEquationOfState { name } if name == "SRK"));
    }
}
