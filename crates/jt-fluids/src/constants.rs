//! Pure-component constants supplied by the fluid database.

use crate::cubic::CubicForm;
use crate::error::{FluidError, FluidResult};
use jt_core::constants::{R, T_REF_K};
use jt_core::units::{MolarEnthalpy, MolarHeatCapacity, MolarVolume};
use serde::{Deserialize, Serialize};

/// Ideal-gas heat capacity as a polynomial in temperature.
///
/// ```text
/// Cp°(T) = c0 + c1·T + c2·T² + ...   [J/(mol·K)]
/// ```
///
/// Enthalpy is referenced to the ideal gas at 298.15 K.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdealGasCp {
    coefficients: Vec<f64>,
}

impl IdealGasCp {
    pub fn new(coefficients: Vec<f64>) -> FluidResult<Self> {
        if coefficients.is_empty() {
            return Err(FluidError::InvalidConstants {
                what: "ideal-gas Cp correlation has no coefficients",
            });
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(FluidError::InvalidConstants {
                what: "ideal-gas Cp coefficient is not finite",
            });
        }
        Ok(Self { coefficients })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Cp° at `t_k` [J/(mol·K)].
    pub fn cp(&self, t_k: f64) -> MolarHeatCapacity {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * t_k + c)
    }

    /// ∫ Cp° dT from the reference temperature to `t_k` [J/mol].
    pub fn enthalpy(&self, t_k: f64) -> MolarEnthalpy {
        self.antiderivative(t_k) - self.antiderivative(T_REF_K)
    }

    fn antiderivative(&self, t_k: f64) -> f64 {
        self.coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| c * t_k.powi(i as i32 + 1) / (i as f64 + 1.0))
            .sum()
    }
}

/// Critical constants and ideal-gas data for one pure component (SI units).
///
/// Created once per fluid identity and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidConstants {
    name: String,
    critical_temperature_k: f64,
    critical_pressure_pa: f64,
    critical_volume_m3_per_mol: f64,
    acentric_factor: f64,
    molar_mass_kg_per_mol: f64,
    ideal_gas_cp: IdealGasCp,
}

impl FluidConstants {
    /// Validates and builds a constants set.
    ///
    /// A non-positive critical volume is accepted and means "unknown"; phase
    /// discrimination then falls back to the EOS critical volume.
    pub fn new(
        name: impl Into<String>,
        critical_temperature_k: f64,
        critical_pressure_pa: f64,
        critical_volume_m3_per_mol: f64,
        acentric_factor: f64,
        molar_mass_kg_per_mol: f64,
        ideal_gas_cp: IdealGasCp,
    ) -> FluidResult<Self> {
        if !critical_temperature_k.is_finite() || critical_temperature_k <= 0.0 {
            return Err(FluidError::InvalidConstants {
                what: "critical temperature",
            });
        }
        if !critical_pressure_pa.is_finite() || critical_pressure_pa <= 0.0 {
            return Err(FluidError::InvalidConstants {
                what: "critical pressure",
            });
        }
        if !critical_volume_m3_per_mol.is_finite() {
            return Err(FluidError::InvalidConstants {
                what: "critical volume",
            });
        }
        if !acentric_factor.is_finite() {
            return Err(FluidError::InvalidConstants {
                what: "acentric factor",
            });
        }
        if !molar_mass_kg_per_mol.is_finite() || molar_mass_kg_per_mol <= 0.0 {
            return Err(FluidError::InvalidConstants { what: "molar mass" });
        }

        Ok(Self {
            name: name.into(),
            critical_temperature_k,
            critical_pressure_pa,
            critical_volume_m3_per_mol,
            acentric_factor,
            molar_mass_kg_per_mol,
            ideal_gas_cp,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn critical_temperature_k(&self) -> f64 {
        self.critical_temperature_k
    }

    pub fn critical_pressure_pa(&self) -> f64 {
        self.critical_pressure_pa
    }

    pub fn critical_volume_m3_per_mol(&self) -> f64 {
        self.critical_volume_m3_per_mol
    }

    pub fn acentric_factor(&self) -> f64 {
        self.acentric_factor
    }

    pub fn molar_mass_kg_per_mol(&self) -> f64 {
        self.molar_mass_kg_per_mol
    }

    pub fn ideal_gas_cp(&self) -> &IdealGasCp {
        &self.ideal_gas_cp
    }

    /// Molar volume separating liquid-like from vapor-like single roots.
    pub fn discrimination_volume(&self) -> MolarVolume {
        if self.critical_volume_m3_per_mol > 0.0 {
            self.critical_volume_m3_per_mol
        } else {
            CubicForm::PENG_ROBINSON.critical_compressibility * R * self.critical_temperature_k
                / self.critical_pressure_pa
        }
    }
}
