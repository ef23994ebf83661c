//! Pure-fluid catalog: critical constants and ideal-gas Cp records.
//!
//! Records use the customary handbook units (bar, cm³/mol, g/mol) and are
//! converted to SI [`FluidConstants`] on lookup.

use crate::constants::{FluidConstants, IdealGasCp};
use crate::error::{FluidError, FluidResult};
use jt_core::constants::PA_PER_BAR;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub critical_temperature_k: f64,
    pub critical_pressure_bar: f64,
    /// Zero or negative when unknown.
    #[serde(default)]
    pub critical_volume_cm3_per_mol: f64,
    pub acentric_factor: f64,
    pub molar_mass_g_per_mol: f64,
    /// Cp° = c0 + c1·T + c2·T² + c3·T³ [J/(mol·K)]
    pub cp_coefficients: Vec<f64>,
}

impl FluidRecord {
    /// Substring match on id, name or alias (case-insensitive). Empty query matches all.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.id.to_ascii_lowercase().contains(&query)
            || self.name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }

    /// Exact match on id, name or alias (case-insensitive).
    pub fn is_named(&self, query: &str) -> bool {
        let query = query.trim();
        self.id.eq_ignore_ascii_case(query)
            || self.name.eq_ignore_ascii_case(query)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(query))
    }

    pub fn to_constants(&self) -> FluidResult<FluidConstants> {
        FluidConstants::new(
            self.name.clone(),
            self.critical_temperature_k,
            self.critical_pressure_bar * PA_PER_BAR,
            self.critical_volume_cm3_per_mol * 1.0e-6,
            self.acentric_factor,
            self.molar_mass_g_per_mol * 1.0e-3,
            IdealGasCp::new(self.cp_coefficients.clone())?,
        )
    }
}

struct BuiltinFluid {
    id: &'static str,
    name: &'static str,
    aliases: &'static [&'static str],
    tc_k: f64,
    pc_bar: f64,
    vc_cm3_mol: f64,
    omega: f64,
    molar_mass_g_mol: f64,
    cp: [f64; 4],
}

const BUILTIN_FLUIDS: [BuiltinFluid; 15] = [
    BuiltinFluid {
        id: "CH4",
        name: "Methane",
        aliases: &["methane", "R50"],
        tc_k: 190.6,
        pc_bar: 46.0,
        vc_cm3_mol: 99.0,
        omega: 0.011,
        molar_mass_g_mol: 16.043,
        cp: [19.25, 5.213e-2, 1.197e-5, -1.132e-8],
    },
    BuiltinFluid {
        id: "Ethane",
        name: "Ethane",
        aliases: &["c2h6", "R170"],
        tc_k: 305.32,
        pc_bar: 48.72,
        vc_cm3_mol: 145.5,
        omega: 0.099,
        molar_mass_g_mol: 30.070,
        cp: [5.409, 1.781e-1, -6.938e-5, 8.713e-9],
    },
    BuiltinFluid {
        id: "Propane",
        name: "Propane",
        aliases: &["c3h8", "n-propane", "R290"],
        tc_k: 369.83,
        pc_bar: 42.48,
        vc_cm3_mol: 200.0,
        omega: 0.152,
        molar_mass_g_mol: 44.097,
        cp: [-4.224, 3.063e-1, -1.586e-4, 3.215e-8],
    },
    BuiltinFluid {
        id: "nButane",
        name: "n-Butane",
        aliases: &["butane", "n-butane", "c4h10", "R600"],
        tc_k: 425.12,
        pc_bar: 37.96,
        vc_cm3_mol: 255.0,
        omega: 0.200,
        molar_mass_g_mol: 58.123,
        cp: [9.487, 3.313e-1, -1.108e-4, -2.822e-9],
    },
    BuiltinFluid {
        id: "Isobutane",
        name: "Isobutane",
        aliases: &["i-butane", "R600a"],
        tc_k: 407.85,
        pc_bar: 36.40,
        vc_cm3_mol: 262.7,
        omega: 0.186,
        molar_mass_g_mol: 58.123,
        cp: [-1.390, 3.847e-1, -1.846e-4, 2.895e-8],
    },
    BuiltinFluid {
        id: "N2",
        name: "Nitrogen",
        aliases: &["nitrogen"],
        tc_k: 126.20,
        pc_bar: 33.98,
        vc_cm3_mol: 90.1,
        omega: 0.037,
        molar_mass_g_mol: 28.014,
        cp: [31.15, -1.357e-2, 2.680e-5, -1.168e-8],
    },
    BuiltinFluid {
        id: "O2",
        name: "Oxygen",
        aliases: &["oxygen"],
        tc_k: 154.58,
        pc_bar: 50.43,
        vc_cm3_mol: 73.4,
        omega: 0.022,
        molar_mass_g_mol: 31.999,
        cp: [28.11, -3.680e-6, 1.746e-5, -1.065e-8],
    },
    BuiltinFluid {
        id: "Ar",
        name: "Argon",
        aliases: &["argon"],
        tc_k: 150.86,
        pc_bar: 48.98,
        vc_cm3_mol: 74.57,
        omega: 0.0,
        molar_mass_g_mol: 39.948,
        cp: [20.80, 0.0, 0.0, 0.0],
    },
    BuiltinFluid {
        id: "CO2",
        name: "Carbon Dioxide",
        aliases: &["carbon dioxide", "R744"],
        tc_k: 304.12,
        pc_bar: 73.74,
        vc_cm3_mol: 94.07,
        omega: 0.225,
        molar_mass_g_mol: 44.010,
        cp: [19.80, 7.344e-2, -5.602e-5, 1.715e-8],
    },
    BuiltinFluid {
        id: "H2O",
        name: "Water",
        aliases: &["water", "steam", "R718"],
        tc_k: 647.14,
        pc_bar: 220.64,
        vc_cm3_mol: 55.95,
        omega: 0.344,
        molar_mass_g_mol: 18.015,
        cp: [32.24, 1.924e-3, 1.055e-5, -3.596e-9],
    },
    BuiltinFluid {
        id: "NH3",
        name: "Ammonia",
        aliases: &["ammonia", "R717"],
        tc_k: 405.40,
        pc_bar: 113.53,
        vc_cm3_mol: 72.47,
        omega: 0.257,
        molar_mass_g_mol: 17.031,
        cp: [27.31, 2.383e-2, 1.707e-5, -1.185e-8],
    },
    BuiltinFluid {
        id: "H2",
        name: "Hydrogen",
        aliases: &["hydrogen"],
        tc_k: 33.19,
        pc_bar: 13.13,
        vc_cm3_mol: 64.14,
        omega: -0.216,
        molar_mass_g_mol: 2.016,
        cp: [27.14, 9.274e-3, -1.381e-5, 7.645e-9],
    },
    BuiltinFluid {
        id: "nDecane",
        name: "n-Decane",
        aliases: &["decane", "n-decane", "c10h22"],
        tc_k: 617.7,
        pc_bar: 21.1,
        vc_cm3_mol: 624.0,
        omega: 0.492,
        molar_mass_g_mol: 142.285,
        cp: [-7.913, 9.609e-1, -5.288e-4, 1.131e-7],
    },
    BuiltinFluid {
        id: "R134a",
        name: "1,1,1,2-Tetrafluoroethane",
        aliases: &["r-134a", "hfc-134a", "tetrafluoroethane"],
        tc_k: 374.21,
        pc_bar: 40.59,
        vc_cm3_mol: 199.3,
        omega: 0.327,
        molar_mass_g_mol: 102.032,
        cp: [16.6, 2.703e-1, -1.2e-4, 0.0],
    },
    BuiltinFluid {
        id: "R22",
        name: "Chlorodifluoromethane",
        aliases: &["r-22", "hcfc-22", "chlorodifluoromethane"],
        tc_k: 369.3,
        pc_bar: 49.9,
        vc_cm3_mol: 165.6,
        omega: 0.221,
        molar_mass_g_mol: 86.468,
        cp: [17.30, 1.618e-1, -1.170e-4, 3.058e-8],
    },
];

impl BuiltinFluid {
    fn record(&self) -> FluidRecord {
        FluidRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            aliases: self.aliases.iter().map(|a| a.to_string()).collect(),
            critical_temperature_k: self.tc_k,
            critical_pressure_bar: self.pc_bar,
            critical_volume_cm3_per_mol: self.vc_cm3_mol,
            acentric_factor: self.omega,
            molar_mass_g_per_mol: self.molar_mass_g_mol,
            cp_coefficients: self.cp.to_vec(),
        }
    }
}

/// Ordered set of fluid records with unique ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidCatalog {
    fluids: Vec<FluidRecord>,
}

impl Default for FluidCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FluidCatalog {
    /// The compiled-in fluid table.
    pub fn builtin() -> Self {
        Self {
            fluids: BUILTIN_FLUIDS.iter().map(BuiltinFluid::record).collect(),
        }
    }

    /// Builds a catalog from user records, rejecting duplicate ids and
    /// records whose constants do not validate.
    pub fn from_records(fluids: Vec<FluidRecord>) -> FluidResult<Self> {
        let mut seen = HashSet::new();
        for record in &fluids {
            if !seen.insert(record.id.to_ascii_lowercase()) {
                return Err(FluidError::Catalog {
                    message: format!("duplicate fluid id '{}'", record.id),
                });
            }
            record.to_constants().map_err(|err| FluidError::Catalog {
                message: format!("record '{}': {err}", record.id),
            })?;
        }
        Ok(Self { fluids })
    }

    /// Parses `{ "fluids": [ ... ] }`.
    pub fn from_json_str(json: &str) -> FluidResult<Self> {
        let parsed: FluidCatalog = serde_json::from_str(json).map_err(|err| FluidError::Catalog {
            message: err.to_string(),
        })?;
        Self::from_records(parsed.fluids)
    }

    pub fn records(&self) -> &[FluidRecord] {
        &self.fluids
    }

    pub fn len(&self) -> usize {
        self.fluids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fluids.is_empty()
    }

    /// Exact lookup by id, name or alias.
    pub fn find(&self, query: &str) -> Option<&FluidRecord> {
        self.fluids.iter().find(|record| record.is_named(query))
    }

    pub fn filter(&self, query: &str) -> Vec<&FluidRecord> {
        self.fluids
            .iter()
            .filter(|record| record.matches_query(query))
            .collect()
    }
}

/// Built-in records matching `query` (substring on id, name or alias).
pub fn filter_catalog(query: &str) -> Vec<FluidRecord> {
    BUILTIN_FLUIDS
        .iter()
        .map(BuiltinFluid::record)
        .filter(|record| record.matches_query(query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ids_are_unique() {
        let mut seen = HashSet::new();
        for record in FluidCatalog::builtin().records() {
            assert!(
                seen.insert(record.id.to_ascii_lowercase()),
                "duplicate canonical id: {}",
                record.id
            );
        }
    }

    #[test]
    fn every_builtin_record_validates() {
        for record in FluidCatalog::builtin().records() {
            let constants = record.to_constants().unwrap();
            assert!(constants.critical_pressure_pa() > 1.0e5);
            assert!(constants.molar_mass_kg_per_mol() < 1.0);
        }
    }

    #[test]
    fn find_is_case_insensitive_over_id_name_and_alias() {
        let catalog = FluidCatalog::builtin();
        assert_eq!(catalog.find("methane").unwrap().id, "CH4");
        assert_eq!(catalog.find("ch4").unwrap().id, "CH4");
        assert_eq!(catalog.find("  Carbon Dioxide ").unwrap().id, "CO2");
        assert_eq!(catalog.find("R290").unwrap().id, "Propane");
        assert!(catalog.find("unobtainium").is_none());
    }

    #[test]
    fn find_does_not_match_substrings() {
        let catalog = FluidCatalog::builtin();
        assert!(catalog.find("butan").is_none());
    }

    #[test]
    fn search_finds_both_butanes() {
        let results = filter_catalog("butane");
        assert!(results.iter().any(|r| r.id == "nButane"));
        assert!(results.iter().any(|r| r.id == "Isobutane"));
        assert_eq!(filter_catalog("").len(), FluidCatalog::builtin().len());
    }

    #[test]
    fn record_converts_to_si() {
        let catalog = FluidCatalog::builtin();
        let methane = catalog.find("methane").unwrap().to_constants().unwrap();
        assert_eq!(methane.critical_pressure_pa(), 46.0e5);
        assert!((methane.critical_volume_m3_per_mol() - 99.0e-6).abs() < 1e-15);
        assert!((methane.molar_mass_kg_per_mol() - 0.016043).abs() < 1e-12);
    }

    #[test]
    fn json_catalog_round_trip() {
        let json = r#"{
            "fluids": [{
                "id": "Kr",
                "name": "Krypton",
                "aliases": ["krypton"],
                "critical_temperature_k": 209.4,
                "critical_pressure_bar": 55.02,
                "acentric_factor": 0.0,
                "molar_mass_g_per_mol": 83.798,
                "cp_coefficients": [20.786]
            }]
        }"#;
        let catalog = FluidCatalog::from_json_str(json).unwrap();
        let record = catalog.find("krypton").unwrap();
        assert_eq!(record.critical_volume_cm3_per_mol, 0.0);
        assert!(record.to_constants().is_ok());
    }

    #[test]
    fn json_catalog_rejects_duplicates_and_bad_constants() {
        let dup = r#"{"fluids": [
            {"id": "A", "name": "A", "critical_temperature_k": 100.0, "critical_pressure_bar": 10.0,
             "acentric_factor": 0.0, "molar_mass_g_per_mol": 10.0, "cp_coefficients": [20.0]},
            {"id": "a", "name": "B", "critical_temperature_k": 100.0, "critical_pressure_bar": 10.0,
             "acentric_factor": 0.0, "molar_mass_g_per_mol": 10.0, "cp_coefficients": [20.0]}
        ]}"#;
        assert!(matches!(
            FluidCatalog::from_json_str(dup),
            Err(FluidError::Catalog { .. })
        ));

        let bad = r#"{"fluids": [
            {"id": "A", "name": "A", "critical_temperature_k": -1.0, "critical_pressure_bar": 10.0,
             "acentric_factor": 0.0, "molar_mass_g_per_mol": 10.0, "cp_coefficients": [20.0]}
        ]}"#;
        assert!(FluidCatalog::from_json_str(bad).is_err());
        assert!(FluidCatalog::from_json_str("not json").is_err());
    }
}
