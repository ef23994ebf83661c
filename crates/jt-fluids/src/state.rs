//! Equilibrium state of a pure fluid at (T, P).

use crate::phase::{Phase, PhaseState};
use jt_core::units::{
    Density, MolarEnthalpy, MolarHeatCapacity, MolarVolume, Pressure, Temperature, k,
    kg_per_m3, pa,
};
use jt_core::constants::PA_PER_BAR;
use serde::{Deserialize, Serialize};

/// Result of a flash: one stable phase, or a saturated liquid-vapor mixture.
///
/// Invariants:
/// - single-phase: `vapor_fraction` is exactly 0 (liquid) or 1 (vapor) and
///   only the matching phase is populated;
/// - two-phase: `0 < vapor_fraction < 1`, both phases populated, bulk
///   enthalpy and Cp are mole-fraction weighted and bulk density is the
///   weighted mass over the weighted molar volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumResult {
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub is_two_phase: bool,
    pub vapor_fraction: f64,
    pub liquid: Option<PhaseState>,
    pub vapor: Option<PhaseState>,
    pub bulk_enthalpy: MolarEnthalpy,
    pub bulk_molar_volume: MolarVolume,
    pub bulk_density_kg_m3: f64,
    pub bulk_cp: MolarHeatCapacity,
}

impl EquilibriumResult {
    pub fn single_phase(temperature_k: f64, pressure_pa: f64, state: PhaseState) -> Self {
        let (vapor_fraction, liquid, vapor) = match state.phase {
            Phase::Liquid => (0.0, Some(state), None),
            Phase::Vapor => (1.0, None, Some(state)),
        };
        Self {
            temperature_k,
            pressure_pa,
            is_two_phase: false,
            vapor_fraction,
            liquid,
            vapor,
            bulk_enthalpy: state.molar_enthalpy,
            bulk_molar_volume: state.molar_volume,
            bulk_density_kg_m3: state.density_kg_m3,
            bulk_cp: state.molar_cp,
        }
    }

    /// Saturated mixture at vapor mole fraction `x`. Endpoints collapse to
    /// the corresponding saturated single phase.
    pub fn two_phase(
        temperature_k: f64,
        pressure_pa: f64,
        vapor_fraction: f64,
        liquid: PhaseState,
        vapor: PhaseState,
    ) -> Self {
        if vapor_fraction <= 0.0 {
            return Self::single_phase(temperature_k, pressure_pa, liquid);
        }
        if vapor_fraction >= 1.0 {
            return Self::single_phase(temperature_k, pressure_pa, vapor);
        }

        let x = vapor_fraction;
        let weigh = |l: f64, v: f64| (1.0 - x) * l + x * v;
        let bulk_molar_volume = weigh(liquid.molar_volume, vapor.molar_volume);
        // molar mass from each phase's own density and volume
        let molar_mass = weigh(
            liquid.density_kg_m3 * liquid.molar_volume,
            vapor.density_kg_m3 * vapor.molar_volume,
        );

        Self {
            temperature_k,
            pressure_pa,
            is_two_phase: true,
            vapor_fraction: x,
            liquid: Some(liquid),
            vapor: Some(vapor),
            bulk_enthalpy: weigh(liquid.molar_enthalpy, vapor.molar_enthalpy),
            bulk_molar_volume,
            bulk_density_kg_m3: molar_mass / bulk_molar_volume,
            bulk_cp: weigh(liquid.molar_cp, vapor.molar_cp),
        }
    }

    pub fn temperature(&self) -> Temperature {
        k(self.temperature_k)
    }

    pub fn pressure(&self) -> Pressure {
        pa(self.pressure_pa)
    }

    pub fn pressure_bar(&self) -> f64 {
        self.pressure_pa / PA_PER_BAR
    }

    pub fn density(&self) -> Density {
        kg_per_m3(self.bulk_density_kg_m3)
    }

    /// Single-phase label, or `None` for a two-phase mixture.
    pub fn phase(&self) -> Option<Phase> {
        match (self.is_two_phase, self.liquid, self.vapor) {
            (false, Some(_), None) => Some(Phase::Liquid),
            (false, None, Some(_)) => Some(Phase::Vapor),
            _ => None,
        }
    }

    pub fn phase_description(&self) -> &'static str {
        match self.phase() {
            Some(phase) => phase.label(),
            None => "Liquid-Vapor",
        }
    }
}
