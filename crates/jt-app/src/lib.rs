//! jt-app: service layer of the Joule-Thomson throttling engine.
//!
//! Wraps the fluid catalog, flash and isenthalpic solver behind
//! [`SimulationService`], which takes a fluid identifier, inlet temperature
//! and pressure and an outlet pressure and returns the inlet and outlet
//! equilibrium states. Frontends (CLI, GUI) call only this crate.
//!
//! # Example
//!
//! ```
//! use jt_app::SimulationService;
//!
//! let service = SimulationService::default();
//! let result = service.simulate("methane", 300.0, 60.0, 1.0).unwrap();
//! assert!(result.outlet.temperature_k < 300.0);
//! println!("{}", result.summary());
//! ```

pub mod config;
pub mod error;
pub mod request;
pub mod service;
pub mod sweep;

pub use config::SimulationConfig;
pub use error::{AppResult, SimulationError};
pub use request::{SimulationRequest, SimulationResult};
pub use service::SimulationService;
pub use sweep::{PressureSweep, SweepPoint, SweepResult, SweepSpacing};
