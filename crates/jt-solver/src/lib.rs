//! Isenthalpic (constant-enthalpy) solver for throttling calculations.
//!
//! Given an outlet pressure and the inlet molar enthalpy, finds the outlet
//! equilibrium state, which may be single-phase or a saturated mixture.

pub mod error;
pub mod isenthalpic;

pub use error::{SolverError, SolverResult};
pub use isenthalpic::{IsenthalpicConfig, IsenthalpicSolution, IsenthalpicSolver};
