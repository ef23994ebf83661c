//! Generalized two-parameter cubic equation of state.
//!
//! ```text
//! P = RT/(V - b) - a(T) / ((V + εb)(V + σb))
//! ```
//!
//! Peng-Robinson is the instance provided here. Roots of the compressibility
//! cubic are found analytically and polished by Newton; residual (departure)
//! properties come from closed forms in a, da/dT, d²a/dT², b and V.

use crate::constants::FluidConstants;
use crate::error::{FluidError, FluidResult};
use jt_core::constants::R;
use jt_core::{ensure_positive, relative_diff};
use std::f64::consts::{PI, SQRT_2};

/// Default relative tolerance under which two roots count as one.
pub const DEFAULT_ROOT_MERGE_TOL: f64 = 1.0e-7;

/// Constants selecting one member of the cubic family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicForm {
    pub epsilon: f64,
    pub sigma: f64,
    pub omega_a: f64,
    pub omega_b: f64,
    /// Z at the critical point implied by `omega_a` and `omega_b`.
    pub critical_compressibility: f64,
}

impl CubicForm {
    pub const PENG_ROBINSON: Self = Self {
        epsilon: 1.0 - SQRT_2,
        sigma: 1.0 + SQRT_2,
        omega_a: 0.45724,
        omega_b: 0.07780,
        critical_compressibility: 0.30740,
    };
}

/// Temperature-dependent attraction parameter and its derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attraction {
    pub a: f64,
    pub da_dt: f64,
    pub d2a_dt2: f64,
}

/// One admissible real root with its departure functions.
///
/// Departures are real-fluid minus ideal-gas at the same T and P, molar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EosRoot {
    pub compressibility: f64,
    /// [m³/mol]
    pub molar_volume: f64,
    /// [J/mol]
    pub enthalpy_departure: f64,
    /// [J/(mol·K)]
    pub entropy_departure: f64,
    /// [J/(mol·K)]
    pub cp_departure: f64,
    /// [J/mol]
    pub gibbs_departure: f64,
    pub ln_fugacity_coefficient: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct CubicEos<'a> {
    constants: &'a FluidConstants,
    form: CubicForm,
    a_c: f64,
    b: f64,
    kappa: f64,
    root_merge_tol: f64,
}

impl<'a> CubicEos<'a> {
    pub fn peng_robinson(constants: &'a FluidConstants) -> Self {
        let form = CubicForm::PENG_ROBINSON;
        let tc = constants.critical_temperature_k();
        let pc = constants.critical_pressure_pa();
        let omega = constants.acentric_factor();

        Self {
            constants,
            form,
            a_c: form.omega_a * (R * tc).powi(2) / pc,
            b: form.omega_b * R * tc / pc,
            kappa: 0.37464 + 1.54226 * omega - 0.26992 * omega * omega,
            root_merge_tol: DEFAULT_ROOT_MERGE_TOL,
        }
    }

    pub fn with_root_merge_tol(mut self, tol: f64) -> Self {
        self.root_merge_tol = tol;
        self
    }

    pub fn constants(&self) -> &'a FluidConstants {
        self.constants
    }

    /// Critical molar volume of the EOS itself [m³/mol]; separates
    /// liquid-like from vapor-like lone roots below Tc.
    pub fn critical_volume(&self) -> f64 {
        self.form.critical_compressibility * R * self.constants.critical_temperature_k()
            / self.constants.critical_pressure_pa()
    }

    /// Co-volume b [m³/mol].
    pub fn covolume(&self) -> f64 {
        self.b
    }

    pub fn attraction(&self, t_k: f64) -> Attraction {
        let tc = self.constants.critical_temperature_k();
        let sqrt_alpha = 1.0 + self.kappa * (1.0 - (t_k / tc).sqrt());
        let sqrt_t_tc = (t_k * tc).sqrt();
        Attraction {
            a: self.a_c * sqrt_alpha * sqrt_alpha,
            da_dt: -self.a_c * self.kappa * sqrt_alpha / sqrt_t_tc,
            d2a_dt2: self.a_c * self.kappa * (1.0 + self.kappa) / (2.0 * t_k * sqrt_t_tc),
        }
    }

    /// Pressure at (T, V) [Pa].
    pub fn pressure(&self, t_k: f64, v: f64) -> f64 {
        let CubicForm { epsilon, sigma, .. } = self.form;
        let a = self.attraction(t_k).a;
        R * t_k / (v - self.b) - a / ((v + epsilon * self.b) * (v + sigma * self.b))
    }

    /// All admissible roots at (T, P), ascending in molar volume.
    pub fn evaluate(&self, t_k: f64, p_pa: f64) -> FluidResult<Vec<EosRoot>> {
        ensure_positive(t_k, "temperature [K]")?;
        ensure_positive(p_pa, "pressure [Pa]")?;

        let CubicForm { epsilon, sigma, .. } = self.form;
        let attraction = self.attraction(t_k);
        let rt = R * t_k;
        let a_dim = attraction.a * p_pa / (rt * rt);
        let b_dim = self.b * p_pa / rt;

        let c2 = (epsilon + sigma - 1.0) * b_dim - 1.0;
        let c1 = epsilon * sigma * b_dim * b_dim - (epsilon + sigma) * b_dim * (b_dim + 1.0) + a_dim;
        let c0 = -(epsilon * sigma * b_dim * b_dim * (b_dim + 1.0) + a_dim * b_dim);

        let roots: Vec<EosRoot> = merge_roots(solve_cubic(c2, c1, c0), self.root_merge_tol)
            .into_iter()
            .filter(|&z| z.is_finite() && z > b_dim)
            .filter_map(|z| self.departures(t_k, p_pa, z, b_dim, &attraction))
            .collect();

        if roots.is_empty() {
            return Err(FluidError::no_convergence(
                t_k,
                p_pa,
                "no admissible compressibility root",
            ));
        }
        Ok(roots)
    }

    fn departures(
        &self,
        t_k: f64,
        p_pa: f64,
        z: f64,
        b_dim: f64,
        attraction: &Attraction,
    ) -> Option<EosRoot> {
        let CubicForm { epsilon, sigma, .. } = self.form;
        let Attraction { a, da_dt, d2a_dt2 } = *attraction;
        let b = self.b;
        let rt = R * t_k;
        let v = z * rt / p_pa;

        let i = ((z + sigma * b_dim) / (z + epsilon * b_dim)).ln() / (sigma - epsilon);

        let h_dep = rt * (z - 1.0) + (t_k * da_dt - a) * i / b;
        let ln_phi = z - 1.0 - (z - b_dim).ln() - a / (b * rt) * i;
        let g_dep = rt * ln_phi;
        let s_dep = (h_dep - g_dep) / t_k;

        let denom = (v + epsilon * b) * (v + sigma * b);
        let dp_dt = R / (v - b) - da_dt / denom;
        let dp_dv = -rt / (v - b).powi(2) + a * (2.0 * v + (epsilon + sigma) * b) / (denom * denom);
        let cv_dep = t_k * d2a_dt2 * i / b;
        let cp_dep = cv_dep - t_k * dp_dt * dp_dt / dp_dv - R;

        let root = EosRoot {
            compressibility: z,
            molar_volume: v,
            enthalpy_departure: h_dep,
            entropy_departure: s_dep,
            cp_departure: cp_dep,
            gibbs_departure: g_dep,
            ln_fugacity_coefficient: ln_phi,
        };

        [v, h_dep, s_dep, cp_dep, g_dep, ln_phi]
            .iter()
            .all(|x| x.is_finite())
            .then_some(root)
    }
}

/// Real roots of `z³ + c2·z² + c1·z + c0 = 0`, ascending.
///
/// Cardano when the discriminant is positive, trigonometric form otherwise;
/// each root is polished with a few Newton steps.
pub fn solve_cubic(c2: f64, c1: f64, c0: f64) -> Vec<f64> {
    let shift = c2 / 3.0;
    let p = c1 - c2 * c2 / 3.0;
    let q = 2.0 * c2.powi(3) / 27.0 - c2 * c1 / 3.0 + c0;
    let disc = (q / 2.0).powi(2) + (p / 3.0).powi(3);

    let mut roots = if disc > 0.0 {
        let sqrt_d = disc.sqrt();
        let u = (-q / 2.0 + sqrt_d).cbrt();
        let v = (-q / 2.0 - sqrt_d).cbrt();
        vec![u + v - shift]
    } else if p.abs() < f64::EPSILON {
        vec![(-q).cbrt() - shift]
    } else {
        let m = 2.0 * (-p / 3.0).sqrt();
        let arg = (3.0 * q / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let theta = arg.acos() / 3.0;
        (0..3)
            .map(|k| m * (theta - 2.0 * PI * k as f64 / 3.0).cos() - shift)
            .collect()
    };

    for z in roots.iter_mut() {
        *z = polish(*z, c2, c1, c0);
    }
    roots.sort_by(f64::total_cmp);
    roots
}

/// Collapses ascending roots closer than `tol` (relative) onto the first
/// of each cluster.
fn merge_roots(sorted: Vec<f64>, tol: f64) -> Vec<f64> {
    let mut merged: Vec<f64> = Vec::with_capacity(sorted.len());
    for z in sorted {
        let duplicate = merged
            .last()
            .is_some_and(|&prev| relative_diff(z, prev) <= tol);
        if !duplicate {
            merged.push(z);
        }
    }
    merged
}

fn polish(mut z: f64, c2: f64, c1: f64, c0: f64) -> f64 {
    for _ in 0..8 {
        let f = ((z + c2) * z + c1) * z + c0;
        let df = (3.0 * z + 2.0 * c2) * z + c1;
        if df == 0.0 || !df.is_finite() {
            break;
        }
        let step = f / df;
        z -= step;
        if step.abs() <= 1.0e-15 * z.abs().max(1.0) {
            break;
        }
    }
    z
}
