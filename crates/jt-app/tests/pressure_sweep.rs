//! Outlet-pressure sweeps fanned out over the rayon pool.

use jt_app::{PressureSweep, SimulationError, SimulationService, SweepSpacing};

#[test]
fn sweep_cools_monotonically_with_expansion() {
    let service = SimulationService::default();
    let sweep = PressureSweep::new(50.0, 1.0, 8, SweepSpacing::Logarithmic).unwrap();
    let result = service
        .sweep_outlet_pressure("methane", 300.0, 60.0, &sweep)
        .unwrap();

    assert_eq!(result.points.len(), 8);
    assert_eq!(result.num_failed(), 0);

    let temps = result.outlet_temperatures_k();
    for pair in temps.windows(2) {
        // pressures descend, so temperatures must not rise
        assert!(pair[1].0 < pair[0].0);
        assert!(pair[1].1 <= pair[0].1 + 1e-9);
    }
}

#[test]
fn points_at_or_above_inlet_fail_individually() {
    let service = SimulationService::default();
    let sweep = PressureSweep::new(20.0, 80.0, 4, SweepSpacing::Linear).unwrap();
    let result = service
        .sweep_outlet_pressure("methane", 300.0, 60.0, &sweep)
        .unwrap();

    // 20 and 40 bar expand; 60 and 80 bar do not
    assert_eq!(result.num_successful(), 2);
    assert_eq!(result.num_failed(), 2);
    for point in &result.points[2..] {
        assert!(matches!(point.outcome, Err(SimulationError::InvalidInput { .. })));
    }
}

#[test]
fn propane_sweep_enters_the_dome() {
    let service = SimulationService::default();
    let sweep = PressureSweep::new(12.0, 1.2, 5, SweepSpacing::Linear).unwrap();
    let result = service
        .sweep_outlet_pressure("propane", 300.0, 20.0, &sweep)
        .unwrap();

    assert_eq!(result.num_failed(), 0);
    let fractions = result.vapor_fractions();
    // the lowest outlet pressure flashes the most liquid
    let last = fractions.last().unwrap().1;
    assert!(last > 0.0 && last < 1.0);
    for pair in fractions.windows(2) {
        assert!(pair[1].1 >= pair[0].1);
    }
}

#[test]
fn invalid_inlet_fails_whole_sweep() {
    let service = SimulationService::default();
    let sweep = PressureSweep::new(10.0, 1.0, 3, SweepSpacing::Linear).unwrap();
    assert!(service
        .sweep_outlet_pressure("methane", -5.0, 60.0, &sweep)
        .is_err());
}
