//! Lax/strict error policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EvalResult, PathError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Structural and type errors become empty results; arrays are wrapped
    /// and unwrapped implicitly.
    #[default]
    Lax,
    /// Every structural and type error aborts the evaluation.
    Strict,
}

impl Mode {
    pub fn is_lax(self) -> bool {
        matches!(self, Mode::Lax)
    }

    /// Decides the fate of an error raised for a single item: `Ok(())` means
    /// the item contributes nothing and evaluation continues.
    pub fn absorb(self, error: PathError) -> EvalResult<()> {
        if self.is_lax() && error.is_suppressible() {
            log::debug!("lax mode suppressed: {}", error);
            Ok(())
        } else {
            Err(error)
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Lax => f.write_str("lax"),
            Mode::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(Mode::Lax),
            "strict" => Ok(Mode::Strict),
            other => Err(format!("unknown path mode '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lax_absorbs_only_suppressible_errors() {
        assert!(Mode::Lax.absorb(PathError::structural("x")).is_ok());
        assert!(Mode::Lax.absorb(PathError::type_error("x")).is_ok());
        assert!(Mode::Lax.absorb(PathError::division_by_zero()).is_err());
        assert!(
            Mode::Lax
                .absorb(PathError::DepthExceeded { limit: 1 })
                .is_err()
        );
    }

    #[test]
    fn test_strict_absorbs_nothing() {
        assert!(Mode::Strict.absorb(PathError::structural("x")).is_err());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("STRICT".parse::<Mode>().unwrap(), Mode::Strict);
        assert!("loose".parse::<Mode>().is_err());
    }
}
