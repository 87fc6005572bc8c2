//! Integration test: sustained one-way yaw winds the cable past its limit.
//!
//! The wind direction is kept 90° ahead of the nacelle so the yaw drive never
//! catches up and keeps turning the same way. Checks that:
//! - UNWINDING engages exactly when the twist at step start exceeds 900°
//! - the twist magnitude strictly decreases while unwinding
//! - NORMAL resumes exactly when the twist at step start is below 1°

use wt_controls::{GeneratorGains, OperatingStatus, YawController};
use wt_core::wrap_360;
use wt_sim::{StepInputs, Turbine, TurbineSpec};

fn turbine() -> Turbine {
    Turbine::new(
        TurbineSpec::default(),
        YawController::default(),
        GeneratorGains::default(),
    )
    .expect("default turbine")
}

#[test]
fn unwind_hysteresis_under_sustained_yaw() {
    let t = turbine();
    let base = StepInputs {
        wind_speed: 9.0,
        yaw_rate_limit: 2.0,
        yaw_deadband: 0.0,
        dt: 1.0,
        ..StepInputs::default()
    };
    let mut state = t.reset(&StepInputs {
        wind_dir: 0.0,
        ..base
    });

    let mut engaged_at = None;
    let mut released_at = None;
    let mut saw_cable_limit = false;

    for i in 0..2_000 {
        let inputs = StepInputs {
            wind_dir: wrap_360(state.yaw_abs + 90.0),
            ..base
        };
        let start = state;
        let (next, out) = t.step(&start, &inputs);

        let twist = start.cable_pos.abs();
        if !start.unwinding && twist > 900.0 {
            assert!(next.unwinding, "step {i}: twist {twist} should start unwind");
            engaged_at.get_or_insert(i);
        } else if start.unwinding && twist < 1.0 {
            assert!(!next.unwinding, "step {i}: twist {twist} should end unwind");
            released_at.get_or_insert(i);
        } else {
            assert_eq!(next.unwinding, start.unwinding, "step {i}: spurious transition");
        }

        if next.unwinding {
            assert!(next.cable_pos.abs() < twist, "step {i}: twist must shrink");
            assert_eq!(out.status, OperatingStatus::Unwinding);
        }
        if out.status == OperatingStatus::CableLimit {
            saw_cable_limit = true;
        }

        state = next;
        if released_at.is_some() {
            break;
        }
    }

    let engaged = engaged_at.expect("unwind never engaged");
    let released = released_at.expect("unwind never released");
    assert!(engaged > 400, "twist accumulates at 2°/s, engaged at {engaged}");
    assert!(released > engaged);
    assert!(saw_cable_limit, "CABLE LIMIT shown for the step before unwinding");
    // tracking resumes from a straight cable
    assert!(!state.unwinding);
    assert!(state.cable_pos.abs() <= 2.0);
}

#[test]
fn unwinding_overrides_wind_tracking() {
    let t = turbine();
    let inputs = StepInputs {
        wind_dir: 90.0,
        dt: 1.0,
        yaw_rate_limit: 0.7,
        ..StepInputs::default()
    };
    // nacelle 10° off the wind, cable wound the way the wind asks to go
    let mut state = t.reset(&inputs);
    state.yaw_abs = 80.0 + 3.0 * 360.0;
    state.cable_pos = 3.0 * 360.0 - 5.0;

    let (next, out) = t.step(&state, &inputs);
    assert_eq!(out.status, OperatingStatus::Unwinding);
    // moves away from the wind because the cable says so
    assert!(next.yaw_abs < state.yaw_abs);
    assert!(out.misalignment.abs() > 10.0);
}
