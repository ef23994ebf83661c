//! Phase labels, per-phase property sets and stable-root selection.

use crate::constants::FluidConstants;
use crate::cubic::EosRoot;
use crate::error::{FluidError, FluidResult};
use jt_core::units::{Density, MolarEnthalpy, MolarHeatCapacity, MolarVolume, kg_per_m3};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Liquid,
    Vapor,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Liquid => "Liquid",
            Phase::Vapor => "Vapor",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Properties of one phase at a given (T, P).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    pub phase: Phase,
    /// [J/mol], ideal gas at 298.15 K is zero
    pub molar_enthalpy: MolarEnthalpy,
    /// [J/(mol·K)]
    pub molar_cp: MolarHeatCapacity,
    /// [m³/mol]
    pub molar_volume: MolarVolume,
    /// [kg/m³]
    pub density_kg_m3: f64,
    pub compressibility: f64,
}

impl PhaseState {
    /// Ideal-gas contribution plus the root's departures.
    pub fn from_root(phase: Phase, root: &EosRoot, constants: &FluidConstants, t_k: f64) -> Self {
        let ig = constants.ideal_gas_cp();
        Self {
            phase,
            molar_enthalpy: ig.enthalpy(t_k) + root.enthalpy_departure,
            molar_cp: ig.cp(t_k) + root.cp_departure,
            molar_volume: root.molar_volume,
            density_kg_m3: constants.molar_mass_kg_per_mol() / root.molar_volume,
            compressibility: root.compressibility,
        }
    }

    pub fn density(&self) -> Density {
        kg_per_m3(self.density_kg_m3)
    }
}

/// Candidate roots at one (T, P) after classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootSelection {
    /// Exactly one admissible root.
    Single { phase: Phase, root: EosRoot },
    /// Liquid-like (smallest V) and vapor-like (largest V) candidates.
    Pair { liquid: EosRoot, vapor: EosRoot },
}

impl RootSelection {
    /// Lower Gibbs departure wins; an exact tie goes to the vapor.
    pub fn stable(&self) -> (Phase, EosRoot) {
        match *self {
            RootSelection::Single { phase, root } => (phase, root),
            RootSelection::Pair { liquid, vapor } => {
                if liquid.gibbs_departure < vapor.gibbs_departure {
                    (Phase::Liquid, liquid)
                } else {
                    (Phase::Vapor, vapor)
                }
            }
        }
    }
}

/// Classifies a root set. Smallest volume is liquid-like, largest is
/// vapor-like and any middle root is dropped; a lone root is labelled by
/// the fluid's discrimination volume.
pub fn select(
    roots: &[EosRoot],
    constants: &FluidConstants,
    t_k: f64,
    p_pa: f64,
) -> FluidResult<RootSelection> {
    match roots {
        [] => Err(FluidError::no_convergence(t_k, p_pa, "empty root set")),
        [only] => Ok(RootSelection::Single {
            phase: classify_single(only, constants),
            root: *only,
        }),
        [first, .., last] => Ok(RootSelection::Pair {
            liquid: *first,
            vapor: *last,
        }),
    }
}

fn classify_single(root: &EosRoot, constants: &FluidConstants) -> Phase {
    if root.molar_volume >= constants.discrimination_volume() {
        Phase::Vapor
    } else {
        Phase::Liquid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::fixtures;
    use crate::cubic::CubicEos;
    use jt_core::constants::R;

    fn root(v: f64, g: f64) -> EosRoot {
        EosRoot {
            compressibility: 0.5,
            molar_volume: v,
            enthalpy_departure: 0.0,
            entropy_departure: 0.0,
            cp_departure: 0.0,
            gibbs_departure: g,
            ln_fugacity_coefficient: g / (R * 300.0),
        }
    }

    #[test]
    fn empty_root_set_is_eos_failure() {
        let c = fixtures::methane();
        let err = select(&[], &c, 300.0, 1e5).unwrap_err();
        assert!(matches!(err, FluidError::EosConvergence { .. }));
    }

    #[test]
    fn lone_root_labelled_by_critical_volume() {
        let c = fixtures::methane();
        let big = select(&[root(1e-3, 0.0)], &c, 300.0, 1e5).unwrap();
        assert_eq!(big.stable().0, Phase::Vapor);
        let small = select(&[root(5e-5, 0.0)], &c, 300.0, 1e5).unwrap();
        assert_eq!(small.stable().0, Phase::Liquid);
        assert!(matches!(small, RootSelection::Single { phase: Phase::Liquid, .. }));
    }

    #[test]
    fn middle_root_is_discarded_and_lower_gibbs_wins() {
        let c = fixtures::methane();
        let roots = [root(1e-4, -50.0), root(5e-4, 10.0), root(2e-3, -20.0)];
        let sel = select(&roots, &c, 300.0, 1e5).unwrap();
        let RootSelection::Pair { liquid, vapor } = sel else {
            panic!("expected a liquid/vapor pair, got {sel:?}");
        };
        assert_eq!(liquid.molar_volume, 1e-4);
        assert_eq!(vapor.molar_volume, 2e-3);
        assert_eq!(sel.stable().0, Phase::Liquid);
    }

    #[test]
    fn gibbs_tie_goes_to_vapor() {
        let c = fixtures::methane();
        let sel = select(&[root(1e-4, -5.0), root(2e-3, -5.0)], &c, 300.0, 1e5).unwrap();
        assert_eq!(sel.stable().0, Phase::Vapor);
    }

    #[test]
    fn phase_state_adds_ideal_gas_part() {
        let c = fixtures::methane();
        let roots = CubicEos::peng_robinson(&c).evaluate(300.0, 60.0e5).unwrap();
        let state = PhaseState::from_root(Phase::Vapor, &roots[0], &c, 300.0);
        let ig = c.ideal_gas_cp();
        assert!((state.molar_enthalpy - ig.enthalpy(300.0) - roots[0].enthalpy_departure).abs() < 1e-9);
        assert!(state.molar_cp > ig.cp(300.0));
        // methane at 300 K / 60 bar is roughly 43 kg/m³
        assert!(state.density_kg_m3 > 35.0 && state.density_kg_m3 < 50.0);
    }

    #[test]
    fn phase_labels() {
        assert_eq!(Phase::Liquid.to_string(), "Liquid");
        assert_eq!(Phase::Vapor.label(), "Vapor");
    }
}
