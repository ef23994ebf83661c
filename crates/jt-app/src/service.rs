//! Simulation service: the public entry point of the engine.

use crate::config::SimulationConfig;
use crate::error::{AppResult, SimulationError};
use crate::request::{SimulationRequest, SimulationResult};
use crate::sweep::{PressureSweep, SweepPoint, SweepResult};
use jt_core::constants::PA_PER_BAR;
use jt_fluids::{ConstantsCache, ConstantsSupplier, FluidCatalog, VleFlash};
use jt_solver::IsenthalpicSolver;
use rayon::prelude::*;
use tracing::debug;

/// Runs isenthalpic expansions against a shared constants cache.
///
/// Requests are independent and may run concurrently; the cache is the only
/// shared state.
#[derive(Debug)]
pub struct SimulationService<S = FluidCatalog> {
    cache: ConstantsCache<S>,
    solver: IsenthalpicSolver,
}

impl Default for SimulationService<FluidCatalog> {
    fn default() -> Self {
        Self::new(FluidCatalog::builtin())
    }
}

impl<S: ConstantsSupplier> SimulationService<S> {
    pub fn new(supplier: S) -> Self {
        Self::with_config(supplier, SimulationConfig::default())
    }

    pub fn with_config(supplier: S, config: SimulationConfig) -> Self {
        Self {
            cache: ConstantsCache::new(supplier),
            solver: IsenthalpicSolver::new(VleFlash::with_config(config.flash), config.isenthalpic),
        }
    }

    pub fn cache(&self) -> &ConstantsCache<S> {
        &self.cache
    }

    /// Expands `fluid` from (T_in, P_in) to P_out at constant enthalpy.
    ///
    /// Pressures in bar, temperature in K. Inputs are validated before any
    /// fluid lookup or EOS evaluation.
    pub fn simulate(
        &self,
        fluid: &str,
        inlet_temperature_k: f64,
        inlet_pressure_bar: f64,
        outlet_pressure_bar: f64,
    ) -> AppResult<SimulationResult> {
        validate(inlet_temperature_k, inlet_pressure_bar, outlet_pressure_bar)?;

        let constants = self.cache.get(fluid)?;
        let p_in = inlet_pressure_bar * PA_PER_BAR;
        let p_out = outlet_pressure_bar * PA_PER_BAR;

        let inlet = self.solver.flash().flash(&constants, inlet_temperature_k, p_in)?;
        debug!(
            fluid = constants.name(),
            t_in = inlet_temperature_k,
            p_in,
            h_in = inlet.bulk_enthalpy,
            phase = inlet.phase_description(),
            "inlet state"
        );

        let solution = self
            .solver
            .solve(&constants, p_out, inlet.bulk_enthalpy, inlet_temperature_k)?;
        debug!(
            fluid = constants.name(),
            t_out = solution.state.temperature_k,
            p_out,
            phase = solution.state.phase_description(),
            iterations = solution.iterations,
            "outlet state"
        );

        Ok(SimulationResult {
            fluid: constants.name().to_string(),
            inlet,
            outlet: solution.state,
            iterations: solution.iterations,
            residual: solution.residual,
        })
    }

    pub fn run(&self, request: &SimulationRequest) -> AppResult<SimulationResult> {
        self.simulate(
            &request.fluid,
            request.inlet_temperature_k,
            request.inlet_pressure_bar,
            request.outlet_pressure_bar,
        )
    }

    /// Runs independent requests in parallel; results keep request order.
    pub fn simulate_batch(&self, requests: &[SimulationRequest]) -> Vec<AppResult<SimulationResult>> {
        requests.par_iter().map(|request| self.run(request)).collect()
    }

    /// Expands one inlet state to every outlet pressure of `sweep`.
    ///
    /// Fails only for an invalid sweep or inlet; per-point failures (for
    /// example a point at or above the inlet pressure) are reported in place.
    pub fn sweep_outlet_pressure(
        &self,
        fluid: &str,
        inlet_temperature_k: f64,
        inlet_pressure_bar: f64,
        sweep: &PressureSweep,
    ) -> AppResult<SweepResult> {
        sweep.validate()?;
        validate_state(inlet_temperature_k, inlet_pressure_bar)?;

        let points = sweep
            .points()
            .into_par_iter()
            .map(|outlet_pressure_bar| SweepPoint {
                outlet_pressure_bar,
                outcome: self.simulate(fluid, inlet_temperature_k, inlet_pressure_bar, outlet_pressure_bar),
            })
            .collect();
        Ok(SweepResult { points })
    }
}

fn validate_state(t_k: f64, p_bar: f64) -> AppResult<()> {
    if !t_k.is_finite() || t_k <= 0.0 {
        return Err(SimulationError::invalid(format!(
            "inlet temperature must be positive and finite (got {t_k} K)"
        )));
    }
    if !p_bar.is_finite() || p_bar <= 0.0 {
        return Err(SimulationError::invalid(format!(
            "inlet pressure must be positive and finite (got {p_bar} bar)"
        )));
    }
    Ok(())
}

fn validate(t_in: f64, p_in_bar: f64, p_out_bar: f64) -> AppResult<()> {
    validate_state(t_in, p_in_bar)?;
    if !p_out_bar.is_finite() || p_out_bar <= 0.0 {
        return Err(SimulationError::invalid(format!(
            "outlet pressure must be positive and finite (got {p_out_bar} bar)"
        )));
    }
    if p_out_bar >= p_in_bar {
        return Err(SimulationError::invalid(format!(
            "non-expansion: outlet pressure {p_out_bar} bar must be below inlet pressure {p_in_bar} bar"
        )));
    }
    Ok(())
}
