//! Engine configuration loadable from JSON.

use crate::error::{AppResult, SimulationError};
use jt_fluids::FlashConfig;
use jt_solver::IsenthalpicConfig;
use serde::{Deserialize, Serialize};

/// Flash and isenthalpic-solver settings for a [`crate::SimulationService`].
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub flash: FlashConfig,
    pub isenthalpic: IsenthalpicConfig,
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| {
            SimulationError::invalid(format!("configuration: {err}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        let iso = &self.isenthalpic;
        let positive = [
            ("isenthalpic.h_rel_tol", iso.h_rel_tol),
            ("isenthalpic.t_rel_tol", iso.t_rel_tol),
            ("isenthalpic.loose_h_rel_tol", iso.loose_h_rel_tol),
            ("isenthalpic.bracket_step_k", iso.bracket_step_k),
            ("isenthalpic.t_min_k", iso.t_min_k),
            ("flash.root_merge_tol", self.flash.root_merge_tol),
            ("flash.saturation_tol", self.flash.saturation_tol),
            ("flash.min_reduced_temperature", self.flash.min_reduced_temperature),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulationError::invalid(format!(
                    "configuration: {name} must be positive and finite (got {value})"
                )));
            }
        }
        if iso.bracket_growth <= 1.0 || !iso.bracket_growth.is_finite() {
            return Err(SimulationError::invalid(
                "configuration: isenthalpic.bracket_growth must exceed 1",
            ));
        }
        if !(iso.t_max_k > iso.t_min_k) {
            return Err(SimulationError::invalid(
                "configuration: isenthalpic.t_max_k must exceed t_min_k",
            ));
        }
        if iso.max_iterations == 0 || self.flash.max_saturation_iterations == 0 {
            return Err(SimulationError::invalid(
                "configuration: iteration limits must be at least 1",
            ));
        }
        Ok(())
    }
}
