//! jt-fluids: pure-fluid thermodynamics for the Joule-Thomson engine.
//!
//! Provides:
//! - Critical constants and ideal-gas Cp correlations ([`FluidConstants`])
//! - A built-in fluid catalog plus the supplier/cache seam
//! - The Peng-Robinson cubic EOS with closed-form departure functions
//! - Phase classification and the (T, P) flash, saturation routines
//!
//! # Example
//!
//! ```
//! use jt_fluids::{ConstantsCache, VleFlash};
//!
//! let cache = ConstantsCache::default();
//! let methane = cache.get("methane").unwrap();
//! let state = VleFlash::new().flash(&methane, 300.0, 60.0e5).unwrap();
//! assert_eq!(state.phase_description(), "Vapor");
//! ```

pub mod catalog;
pub mod constants;
pub mod cubic;
pub mod error;
pub mod flash;
pub mod phase;
pub mod state;
pub mod supplier;

pub use catalog::{FluidCatalog, FluidRecord, filter_catalog};
pub use constants::{FluidConstants, IdealGasCp};
pub use cubic::{CubicEos, CubicForm, EosRoot, solve_cubic};
pub use error::{FluidError, FluidResult};
pub use flash::{FlashConfig, SaturationState, VleFlash};
pub use phase::{Phase, PhaseState, RootSelection};
pub use state::EquilibriumResult;
pub use supplier::{ConstantsCache, ConstantsSupplier};
