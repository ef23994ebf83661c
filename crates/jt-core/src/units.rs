// jt-core/src/units.rs

use uom::si::f64::{
    MassDensity as UomMassDensity, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

/// Molar enthalpy [J/mol].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type MolarEnthalpy = f64;

/// Molar heat capacity [J/(mol·K)].
pub type MolarHeatCapacity = f64;

/// Molar volume [m³/mol].
pub type MolarVolume = f64;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

pub mod constants {
    /// Molar gas constant [J/(mol·K)].
    pub const R: f64 = 8.314_462_618;

    /// Reference temperature of the ideal-gas enthalpy scale [K].
    pub const T_REF_K: f64 = 298.15;

    pub const PA_PER_BAR: f64 = 1.0e5;
}
