//! Fluid property errors.

use jt_core::CoreError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during equation-of-state and flash calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-positive or non-finite state inputs, or requests outside the
    /// domain of an operation (e.g. saturation above the critical point).
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    /// Identifier not known to the constants supplier.
    #[error("Unknown fluid: {id}")]
    UnknownFluid { id: String },

    /// Inconsistent supplier data (e.g. negative critical pressure).
    #[error("Invalid fluid constants for {what}")]
    InvalidConstants { what: &'static str },

    /// No admissible EOS root, or an iteration on the EOS did not converge.
    #[error("EOS convergence failure at T={t_k} K, P={p_pa} Pa: {what}")]
    EosConvergence {
        t_k: f64,
        p_pa: f64,
        what: &'static str,
    },

    /// Catalog document could not be parsed.
    #[error("Catalog parse error: {message}")]
    Catalog { message: String },
}

impl FluidError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        FluidError::InvalidInput { what: what.into() }
    }

    pub(crate) fn no_convergence(t_k: f64, p_pa: f64, what: &'static str) -> Self {
        FluidError::EosConvergence { t_k, p_pa, what }
    }
}

impl From<CoreError> for FluidError {
    fn from(err: CoreError) -> Self {
        FluidError::InvalidInput {
            what: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::EosConvergence {
            t_k: 300.0,
            p_pa: 6.0e6,
            what: "no admissible root",
        };
        let msg = err.to_string();
        assert!(msg.contains("T=300"));
        assert!(msg.contains("no admissible root"));

        let err = FluidError::UnknownFluid {
            id: "unobtainium".into(),
        };
        assert!(err.to_string().contains("unobtainium"));
    }

    #[test]
    fn core_error_becomes_invalid_input() {
        let core = jt_core::ensure_positive(-1.0, "temperature").unwrap_err();
        let err: FluidError = core.into();
        assert!(matches!(err, FluidError::InvalidInput { ref what } if what.contains("temperature")));
    }
}
