//! Outlet-pressure sweeps.
//!
//! A sweep expands into independent simulation requests that differ only in
//! outlet pressure; every point succeeds or fails on its own.

use crate::error::{AppResult, SimulationError};
use crate::request::SimulationResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spacing of sweep points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepSpacing {
    /// Uniformly spaced points
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

impl fmt::Display for SweepSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Logarithmic => write!(f, "Logarithmic"),
        }
    }
}

/// Range of outlet pressures in bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureSweep {
    pub start_bar: f64,
    pub end_bar: f64,
    pub num_points: usize,
    pub spacing: SweepSpacing,
}

impl PressureSweep {
    pub fn new(
        start_bar: f64,
        end_bar: f64,
        num_points: usize,
        spacing: SweepSpacing,
    ) -> AppResult<Self> {
        let sweep = Self {
            start_bar,
            end_bar,
            num_points,
            spacing,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn validate(&self) -> AppResult<()> {
        for (what, v) in [("start", self.start_bar), ("end", self.end_bar)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(SimulationError::invalid(format!(
                    "sweep {what} pressure must be positive and finite (got {v} bar)"
                )));
            }
        }
        if self.num_points < 2 {
            return Err(SimulationError::invalid("sweep must have at least 2 points"));
        }
        if (self.start_bar - self.end_bar).abs() < 1e-12 {
            return Err(SimulationError::invalid(
                "sweep start and end pressures must be different",
            ));
        }
        Ok(())
    }

    /// All outlet pressures [bar], endpoints exact.
    pub fn points(&self) -> Vec<f64> {
        let n = self.num_points.max(1);
        if n == 1 {
            return vec![self.start_bar];
        }

        let last = (n - 1) as f64;
        let mut points: Vec<f64> = match self.spacing {
            SweepSpacing::Linear => {
                let delta = (self.end_bar - self.start_bar) / last;
                (0..n).map(|i| self.start_bar + i as f64 * delta).collect()
            }
            SweepSpacing::Logarithmic => {
                let (log_start, log_end) = (self.start_bar.ln(), self.end_bar.ln());
                let log_delta = (log_end - log_start) / last;
                (0..n)
                    .map(|i| (log_start + i as f64 * log_delta).exp())
                    .collect()
            }
        };
        points[n - 1] = self.end_bar;
        points
    }
}

impl fmt::Display for PressureSweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Outlet pressure sweep from {} bar to {} bar ({} points, {})",
            self.start_bar, self.end_bar, self.num_points, self.spacing
        )
    }
}

/// Outcome at one outlet pressure.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub outlet_pressure_bar: f64,
    pub outcome: AppResult<SimulationResult>,
}

/// Ordered sweep outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub points: Vec<SweepPoint>,
}

impl SweepResult {
    pub fn num_successful(&self) -> usize {
        self.points.iter().filter(|p| p.outcome.is_ok()).count()
    }

    pub fn num_failed(&self) -> usize {
        self.points.len() - self.num_successful()
    }

    /// (outlet pressure [bar], outlet temperature [K]) for successful points.
    pub fn outlet_temperatures_k(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| {
                p.outcome
                    .as_ref()
                    .ok()
                    .map(|r| (p.outlet_pressure_bar, r.outlet.temperature_k))
            })
            .collect()
    }

    /// (outlet pressure [bar], vapor fraction) for successful points.
    pub fn vapor_fractions(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| {
                p.outcome
                    .as_ref()
                    .ok()
                    .map(|r| (p.outlet_pressure_bar, r.outlet.vapor_fraction))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_sweep_generation() {
        let sweep = PressureSweep::new(10.0, 50.0, 5, SweepSpacing::Linear).unwrap();
        let points = sweep.points();
        assert_eq!(points.len(), 5);
        assert!((points[0] - 10.0).abs() < 1e-12);
        assert!((points[2] - 30.0).abs() < 1e-12);
        assert_eq!(points[4], 50.0);
    }

    #[test]
    fn logarithmic_sweep_generation() {
        let sweep = PressureSweep::new(1.0, 100.0, 3, SweepSpacing::Logarithmic).unwrap();
        let points = sweep.points();
        assert_eq!(points.len(), 3);
        assert!((points[0] - 1.0).abs() < 1e-12);
        assert!((points[1] - 10.0).abs() < 1e-9);
        assert_eq!(points[2], 100.0);
    }

    #[test]
    fn descending_sweep_keeps_order() {
        let points = PressureSweep::new(50.0, 10.0, 3, SweepSpacing::Linear)
            .unwrap()
            .points();
        assert_eq!(points, vec![50.0, 30.0, 10.0]);
    }

    #[test]
    fn reject_invalid_sweeps() {
        assert!(PressureSweep::new(1.0, 10.0, 1, SweepSpacing::Linear).is_err());
        assert!(PressureSweep::new(5.0, 5.0, 4, SweepSpacing::Linear).is_err());
        assert!(PressureSweep::new(0.0, 5.0, 4, SweepSpacing::Logarithmic).is_err());
        assert!(PressureSweep::new(f64::NAN, 5.0, 4, SweepSpacing::Linear).is_err());
    }

    #[test]
    fn display_names_spacing() {
        let sweep = PressureSweep::new(1.0, 10.0, 4, SweepSpacing::Logarithmic).unwrap();
        assert_eq!(
            sweep.to_string(),
            "Outlet pressure sweep from 1 bar to 10 bar (4 points, Logarithmic)"
        );
    }
}
