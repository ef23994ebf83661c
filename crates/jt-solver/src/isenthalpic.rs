//! Constant-pressure temperature search for a target molar enthalpy.
//!
//! Below the critical pressure the saturation state is located first: a
//! target enthalpy between the saturated liquid and vapor enthalpies is a
//! two-phase answer by the lever rule, otherwise the search is confined to
//! the single-phase side. The temperature is then bracketed by geometric
//! expansion from the guess and refined by the Illinois variant of regula
//! falsi.

use crate::error::{SolverError, SolverResult};
use jt_core::constants::R;
use jt_fluids::{EquilibriumResult, FluidConstants, FluidError, VleFlash};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Isenthalpic solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsenthalpicConfig {
    /// Maximum refinement iterations
    pub max_iterations: usize,
    /// Residual tolerance relative to max(|H|, R·T_guess)
    pub h_rel_tol: f64,
    /// Bracket width tolerance relative to T
    pub t_rel_tol: f64,
    /// Residual accepted on bracket collapse, relative to the same scale
    pub loose_h_rel_tol: f64,
    /// Initial bracket expansion step (K)
    pub bracket_step_k: f64,
    /// Growth factor of the expansion step
    pub bracket_growth: f64,
    pub max_bracket_expansions: usize,
    /// Search domain (K)
    pub t_min_k: f64,
    pub t_max_k: f64,
    /// Perturbations of a trial temperature after an EOS failure
    pub max_trial_retries: usize,
}

impl Default for IsenthalpicConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            h_rel_tol: 1e-9,
            t_rel_tol: 1e-12,
            loose_h_rel_tol: 1e-6,
            bracket_step_k: 5.0,
            bracket_growth: 2.0,
            max_bracket_expansions: 60,
            t_min_k: 1.0,
            t_max_k: 5000.0,
            max_trial_retries: 8,
        }
    }
}

/// Converged outlet state with diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsenthalpicSolution {
    pub state: EquilibriumResult,
    /// Flash evaluations spent in bracketing and refinement
    pub iterations: usize,
    /// H(state) - H_target [J/mol]
    pub residual: f64,
}

#[derive(Debug, Clone)]
struct Trial {
    t_k: f64,
    residual: f64,
    state: EquilibriumResult,
}

#[derive(Debug, Clone, Default)]
pub struct IsenthalpicSolver {
    flash: VleFlash,
    config: IsenthalpicConfig,
}

impl IsenthalpicSolver {
    pub fn new(flash: VleFlash, config: IsenthalpicConfig) -> Self {
        Self { flash, config }
    }

    pub fn config(&self) -> &IsenthalpicConfig {
        &self.config
    }

    pub fn flash(&self) -> &VleFlash {
        &self.flash
    }

    /// Finds the equilibrium state at `p_pa` whose bulk enthalpy is `h_target`.
    pub fn solve(
        &self,
        constants: &FluidConstants,
        p_pa: f64,
        h_target: f64,
        t_guess_k: f64,
    ) -> SolverResult<IsenthalpicSolution> {
        if !p_pa.is_finite() || p_pa <= 0.0 {
            return Err(SolverError::InvalidInput {
                what: format!("outlet pressure must be positive and finite (got {p_pa} Pa)"),
            });
        }
        if !h_target.is_finite() {
            return Err(SolverError::InvalidInput {
                what: "target enthalpy must be finite".to_string(),
            });
        }
        if !t_guess_k.is_finite() || t_guess_k <= 0.0 {
            return Err(SolverError::InvalidInput {
                what: format!("temperature guess must be positive and finite (got {t_guess_k} K)"),
            });
        }

        let scale = h_target.abs().max(R * t_guess_k);
        let h_tol = self.config.h_rel_tol * scale;
        let (mut lo, mut hi) = (self.config.t_min_k, self.config.t_max_k);

        if p_pa < constants.critical_pressure_pa() {
            match self.flash.saturation(constants, p_pa) {
                Ok(sat) => {
                    if let Some(x) = sat.vapor_fraction_for_enthalpy(h_target) {
                        let state = sat.mixture(x);
                        let residual = state.bulk_enthalpy - h_target;
                        debug!(
                            fluid = constants.name(),
                            t_k = sat.temperature_k,
                            p_pa,
                            vapor_fraction = x,
                            "isenthalpic target inside the two-phase dome"
                        );
                        return Ok(IsenthalpicSolution {
                            state,
                            iterations: 0,
                            residual,
                        });
                    }
                    if h_target > sat.vapor.molar_enthalpy {
                        lo = lo.max(sat.temperature_k);
                    } else {
                        hi = hi.min(sat.temperature_k);
                    }
                }
                Err(err) => {
                    warn!(
                        fluid = constants.name(),
                        p_pa,
                        error = %err,
                        "saturation state unavailable, searching without phase restriction"
                    );
                }
            }
        }

        let mut search = Search {
            flash: &self.flash,
            config: &self.config,
            constants,
            p_pa,
            h_target,
            iterations: 0,
            last_residual: f64::NAN,
        };
        let t0 = self.start_point(t_guess_k, lo, hi);
        let first = search.trial(t0, 0.5 * (lo + hi))?;
        if first.residual.abs() <= h_tol {
            return Ok(search.finish(first));
        }

        let (a, b) = search.expand(first, lo, hi)?;
        search.refine(a, b, h_tol, scale)
    }

    fn start_point(&self, t_guess: f64, lo: f64, hi: f64) -> f64 {
        let margin = (0.5 * self.config.bracket_step_k).min(0.25 * (hi - lo));
        if t_guess <= lo {
            lo + margin
        } else if t_guess >= hi {
            hi - margin
        } else {
            t_guess
        }
    }
}

/// State of one solve: fixed pressure and target, running diagnostics.
struct Search<'a> {
    flash: &'a VleFlash,
    config: &'a IsenthalpicConfig,
    constants: &'a FluidConstants,
    p_pa: f64,
    h_target: f64,
    iterations: usize,
    last_residual: f64,
}

impl Search<'_> {
    fn failure(&self) -> SolverError {
        SolverError::IsenthalpicConvergence {
            last_residual: self.last_residual,
            iterations: self.iterations,
        }
    }

    /// Walks away from `start` until the residual changes sign.
    fn expand(&mut self, start: Trial, lo: f64, hi: f64) -> SolverResult<(Trial, Trial)> {
        // H rises with T: a positive residual means the root lies below.
        let downward = start.residual > 0.0;
        let mut step = self.config.bracket_step_k;
        let mut inner = start;

        for _ in 0..self.config.max_bracket_expansions {
            let target = if downward {
                (inner.t_k - step).max(lo)
            } else {
                (inner.t_k + step).min(hi)
            };
            let outer = self.trial(target, inner.t_k)?;
            trace!(
                t_inner = inner.t_k,
                t_outer = outer.t_k,
                r_outer = outer.residual,
                "bracket expansion"
            );

            if outer.residual == 0.0 || outer.residual.signum() != inner.residual.signum() {
                return Ok((inner, outer));
            }
            let at_boundary = (downward && outer.t_k <= lo) || (!downward && outer.t_k >= hi);
            if at_boundary {
                return Err(self.failure());
            }
            inner = outer;
            step *= self.config.bracket_growth;
        }

        Err(self.failure())
    }

    /// Illinois iteration inside a sign-changing bracket.
    fn refine(&mut self, a: Trial, b: Trial, h_tol: f64, scale: f64) -> SolverResult<IsenthalpicSolution> {
        let (mut ta, mut fa) = (a.t_k, a.residual);
        let (mut tb, mut fb) = (b.t_k, b.residual);
        let mut best = if a.residual.abs() <= b.residual.abs() { a } else { b };
        if best.residual.abs() <= h_tol {
            return Ok(self.finish(best));
        }
        let mut side = 0i8;

        for iter in 0..self.config.max_iterations {
            let (left, right) = (ta.min(tb), ta.max(tb));
            let mut t = (ta * fb - tb * fa) / (fb - fa);
            if !(t.is_finite() && t > left && t < right) {
                t = 0.5 * (left + right);
            }

            let c = self.trial(t, 0.5 * (left + right))?;
            let fc = c.residual;
            trace!(iter, t_k = c.t_k, residual = fc, "illinois step");

            if fc.abs() <= h_tol {
                return Ok(self.finish(c));
            }
            if fc.abs() < best.residual.abs() {
                best = c.clone();
            }

            if fc * fb > 0.0 {
                tb = c.t_k;
                fb = fc;
                if side == -1 {
                    fa *= 0.5;
                }
                side = -1;
            } else if fa * fc > 0.0 {
                ta = c.t_k;
                fa = fc;
                if side == 1 {
                    fb *= 0.5;
                }
                side = 1;
            } else {
                return Ok(self.finish(c));
            }

            if (tb - ta).abs() <= self.config.t_rel_tol * c.t_k
                && best.residual.abs() <= self.config.loose_h_rel_tol * scale
            {
                return Ok(self.finish(best));
            }
        }

        self.last_residual = best.residual;
        Err(self.failure())
    }

    /// Flashes at `t_k`; after an EOS failure retries at points moved
    /// halfway toward `toward` each time.
    fn trial(&mut self, t_k: f64, toward: f64) -> SolverResult<Trial> {
        let mut t = t_k;

        for attempt in 0..=self.config.max_trial_retries {
            self.iterations += 1;
            match self.flash.flash(self.constants, t, self.p_pa) {
                Ok(state) => {
                    let residual = state.bulk_enthalpy - self.h_target;
                    self.last_residual = residual;
                    return Ok(Trial {
                        t_k: t,
                        residual,
                        state,
                    });
                }
                Err(err @ FluidError::EosConvergence { .. }) => {
                    warn!(attempt, t_k = t, p_pa = self.p_pa, error = %err, "trial flash failed, perturbing");
                    t += 0.5 * (toward - t);
                }
                Err(err) => return Err(err.into()),
            }
        }

        debug!(t_k, p_pa = self.p_pa, "trial flash failed after perturbation");
        Err(self.failure())
    }

    fn finish(&self, trial: Trial) -> IsenthalpicSolution {
        debug!(
            fluid = self.constants.name(),
            t_k = trial.t_k,
            p_pa = self.p_pa,
            residual = trial.residual,
            iterations = self.iterations,
            "isenthalpic solve converged"
        );
        IsenthalpicSolution {
            state: trial.state,
            iterations: self.iterations,
            residual: trial.residual,
        }
    }
}
