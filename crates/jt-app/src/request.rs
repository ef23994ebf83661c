//! Simulation request and result types.

use jt_core::units::{Temperature, k};
use jt_fluids::EquilibriumResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One throttling calculation: fluid, inlet state and outlet pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Catalog id, name or alias (case-insensitive)
    pub fluid: String,
    pub inlet_temperature_k: f64,
    pub inlet_pressure_bar: f64,
    pub outlet_pressure_bar: f64,
}

impl SimulationRequest {
    pub fn new(
        fluid: impl Into<String>,
        inlet_temperature_k: f64,
        inlet_pressure_bar: f64,
        outlet_pressure_bar: f64,
    ) -> Self {
        Self {
            fluid: fluid.into(),
            inlet_temperature_k,
            inlet_pressure_bar,
            outlet_pressure_bar,
        }
    }
}

/// Inlet and converged outlet states of an isenthalpic expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Display name of the fluid
    pub fluid: String,
    pub inlet: EquilibriumResult,
    pub outlet: EquilibriumResult,
    /// Flash evaluations used by the outlet solve
    pub iterations: usize,
    /// H_out - H_in [J/mol]
    pub residual: f64,
}

impl SimulationResult {
    pub fn outlet_temperature(&self) -> Temperature {
        k(self.outlet.temperature_k)
    }

    pub fn temperature_drop_k(&self) -> f64 {
        self.inlet.temperature_k - self.outlet.temperature_k
    }

    /// Mean Joule-Thomson coefficient over the expansion [K/bar].
    pub fn joule_thomson_coefficient_k_per_bar(&self) -> f64 {
        self.temperature_drop_k() / (self.inlet.pressure_bar() - self.outlet.pressure_bar())
    }

    /// Human-readable report of the inlet conditions and outlet properties.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = &self.outlet;
        writeln!(f, "Fluid: {}", self.fluid)?;
        writeln!(f, "Inlet Temperature: {:.2} K", self.inlet.temperature_k)?;
        writeln!(f, "Inlet Pressure: {:.2} bar", self.inlet.pressure_bar())?;
        writeln!(f, "Outlet Pressure: {:.2} bar", out.pressure_bar())?;
        writeln!(f)?;
        writeln!(f, "--- Outlet Properties ---")?;
        writeln!(f, "Outlet Temperature: {:.2} K", out.temperature_k)?;
        writeln!(f, "Outlet Phase: {}", out.phase_description())?;
        writeln!(f, "Outlet Density: {:.2} kg/m³", out.bulk_density_kg_m3)?;
        writeln!(f, "Outlet Molar Heat Capacity (Cp): {:.2} J/(mol·K)", out.bulk_cp)?;
        if out.is_two_phase {
            writeln!(f, "  Vapor mole fraction: {:.4}", out.vapor_fraction)?;
        }
        writeln!(
            f,
            "Joule-Thomson coefficient: {:.4} K/bar",
            self.joule_thomson_coefficient_k_per_bar()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jt_fluids::{Phase, PhaseState};

    fn phase(phase: Phase, h: f64) -> PhaseState {
        PhaseState {
            phase,
            molar_enthalpy: h,
            molar_cp: 40.0,
            molar_volume: 1e-3,
            density_kg_m3: 16.0,
            compressibility: 0.95,
        }
    }

    fn result(outlet: EquilibriumResult) -> SimulationResult {
        SimulationResult {
            fluid: "Methane".into(),
            inlet: EquilibriumResult::single_phase(300.0, 60.0e5, phase(Phase::Vapor, -800.0)),
            outlet,
            iterations: 7,
            residual: 0.0,
        }
    }

    #[test]
    fn jt_coefficient_is_mean_slope() {
        let r = result(EquilibriumResult::single_phase(
            274.0,
            1.0e5,
            phase(Phase::Vapor, -800.0),
        ));
        assert!((r.temperature_drop_k() - 26.0).abs() < 1e-12);
        assert!((r.joule_thomson_coefficient_k_per_bar() - 26.0 / 59.0).abs() < 1e-12);
        assert_eq!(r.outlet_temperature().value, 274.0);
    }

    #[test]
    fn summary_lists_outlet_properties() {
        let r = result(EquilibriumResult::single_phase(
            274.0,
            1.0e5,
            phase(Phase::Vapor, -800.0),
        ));
        let text = r.summary();
        assert!(text.contains("Fluid: Methane"));
        assert!(text.contains("Inlet Pressure: 60.00 bar"));
        assert!(text.contains("Outlet Temperature: 274.00 K"));
        assert!(text.contains("Outlet Phase: Vapor"));
        assert!(!text.contains("Vapor mole fraction"));
        assert_eq!(format!("{r}"), text);
        assert!(text.ends_with("K/bar\n"));
    }

    #[test]
    fn summary_reports_vapor_fraction_when_two_phase() {
        let outlet = EquilibriumResult::two_phase(
            250.0,
            2.0e5,
            0.3,
            phase(Phase::Liquid, -20_000.0),
            phase(Phase::Vapor, -5_000.0),
        );
        let text = result(outlet).summary();
        assert!(text.contains("Outlet Phase: Liquid-Vapor"));
        assert!(text.contains("Vapor mole fraction: 0.3000"));
    }

    #[test]
    fn request_deserializes() {
        let req: SimulationRequest = serde_json::from_str(
            r#"{"fluid": "CH4", "inlet_temperature_k": 300.0, "inlet_pressure_bar": 60.0, "outlet_pressure_bar": 1.0}"#,
        )
        .unwrap();
        assert_eq!(req, SimulationRequest::new("CH4", 300.0, 60.0, 1.0));
    }
}
