//! Error types for the jt-app service layer.

use jt_fluids::FluidError;
use jt_solver::SolverError;

/// Failure of a simulation request.
///
/// Inner crate errors map one-to-one onto these variants so a frontend can
/// match on the kind without unwrapping layers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error("Unknown fluid: {id}")]
    UnknownFluid { id: String },

    #[error("EOS convergence failure at T={t_k} K, P={p_pa} Pa: {what}")]
    EosConvergence { t_k: f64, p_pa: f64, what: String },

    #[error(
        "Isenthalpic solve did not converge after {iterations} iterations (last residual {last_residual} J/mol)"
    )]
    IsenthalpicConvergence { last_residual: f64, iterations: usize },
}

/// Result type for jt-app operations.
pub type AppResult<T> = Result<T, SimulationError>;

impl SimulationError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        SimulationError::InvalidInput { what: what.into() }
    }
}

impl From<FluidError> for SimulationError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::InvalidInput { what } => SimulationError::InvalidInput { what },
            FluidError::UnknownFluid { id } => SimulationError::UnknownFluid { id },
            FluidError::InvalidConstants { what } => SimulationError::InvalidInput {
                what: format!("invalid fluid constants: {what}"),
            },
            FluidError::EosConvergence { t_k, p_pa, what } => SimulationError::EosConvergence {
                t_k,
                p_pa,
                what: what.to_string(),
            },
            FluidError::Catalog { message } => SimulationError::InvalidInput {
                what: format!("fluid catalog: {message}"),
            },
        }
    }
}

impl From<SolverError> for SimulationError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::InvalidInput { what } => SimulationError::InvalidInput { what },
            SolverError::IsenthalpicConvergence {
                last_residual,
                iterations,
            } => SimulationError::IsenthalpicConvergence {
                last_residual,
                iterations,
            },
            SolverError::Fluid(inner) => inner.into(),
        }
    }
}
