//! Error types for solver operations.

use jt_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur during an isenthalpic solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error(
        "Isenthalpic solve did not converge after {iterations} iterations (last residual {last_residual} J/mol)"
    )]
    IsenthalpicConvergence { last_residual: f64, iterations: usize },

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),
}

pub type SolverResult<T> = Result<T, SolverError>;
