//! Property tests over the full accepted input ranges.

use proptest::prelude::*;
use std::f64::consts::TAU;
use wt_controls::{GeneratorGains, YawController};
use wt_sim::{CP_MAX, StepInputs, Turbine, TurbineSpec, TurbineState, limits, power_coefficient};

fn turbine() -> Turbine {
    Turbine::new(
        TurbineSpec::default(),
        YawController::default(),
        GeneratorGains::default(),
    )
    .expect("default turbine")
}

/// Step from a reset and report the final per-step speed change.
fn settle(t: &Turbine, inputs: &StepInputs, steps: usize) -> f64 {
    let mut state = t.reset(inputs);
    let mut last_change = f64::INFINITY;
    for _ in 0..steps {
        let prev = state.omega;
        state = t.step(&state, inputs).0;
        last_change = (state.omega - prev).abs();
    }
    last_change
}

prop_compose! {
    fn any_inputs()(
        wind_speed in 0.0_f64..=30.0,
        wind_dir in 0.0_f64..360.0,
        pitch in -2.0_f64..=25.0,
        efficiency in 0.85_f64..=0.99,
        dt in 0.05_f64..=1.0,
        yaw_rate_limit in 0.1_f64..=2.0,
        yaw_deadband in 0.0_f64..=10.0,
        air_density in 1.0_f64..=1.3,
        inertia in limits::INERTIA_KG_M2.0..=limits::INERTIA_KG_M2.1,
        damping in 0.0_f64..=1.0e6,
    ) -> StepInputs {
        StepInputs {
            wind_speed, wind_dir, pitch, efficiency, dt,
            yaw_rate_limit, yaw_deadband, air_density, inertia, damping,
        }
    }
}

prop_compose! {
    fn any_state()(
        omega in 0.0_f64..=0.85,
        yaw_abs in -3000.0_f64..3000.0,
        cable_pos in -1200.0_f64..1200.0,
        unwinding in any::<bool>(),
        rotor_angle in 0.0_f64..TAU,
    ) -> TurbineState {
        TurbineState { omega, yaw_abs, cable_pos, unwinding, rotor_angle }
    }
}

proptest! {
    #[test]
    fn cp_always_bounded(tsr in 0.0_f64..2_000.0, pitch in -2.0_f64..=25.0) {
        let cp = power_coefficient(tsr, pitch);
        prop_assert!((0.0..=CP_MAX).contains(&cp));
    }

    #[test]
    fn step_respects_bounds(state in any_state(), inputs in any_inputs()) {
        let t = turbine();
        let (next, out) = t.step(&state, &inputs);
        let omega_max = t.spec().omega_max_rad_s();
        prop_assert!(next.omega >= 0.0 && next.omega <= omega_max);
        prop_assert!(next.rotor_angle >= 0.0 && next.rotor_angle < TAU);
        prop_assert!((0.0..=CP_MAX).contains(&out.cp));
        prop_assert!((0.0..360.0).contains(&out.nacelle_dir));
        prop_assert!((-180.0..180.0).contains(&out.misalignment));
        prop_assert!(out.electrical_power_kw >= 0.0);
        prop_assert!(out.electrical_power_kw <= t.spec().rated_power_kw() + 1e-9);
        prop_assert!(out.generator_torque_nm >= 0.0);
        prop_assert!(out.tsr.is_finite() && out.aero_power_kw.is_finite());
    }

    #[test]
    fn misaligned_rotor_is_decoupled(state in any_state(), inputs in any_inputs()) {
        let t = turbine();
        let (_, out) = t.step(&state, &inputs);
        if out.misalignment.abs() >= 90.0 {
            prop_assert_eq!(out.v_eff, 0.0);
            prop_assert_eq!(out.aero_power_kw, 0.0);
            prop_assert_eq!(out.electrical_power_kw, 0.0);
        }
    }

    #[test]
    fn observe_is_idempotent(state in any_state(), inputs in any_inputs()) {
        let t = turbine();
        let a = t.observe(&state, &inputs);
        let b = t.observe(&state, &inputs);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn rotor_speed_settles(
        wind_speed in 0.0_f64..=30.0,
        pitch in -2.0_f64..=25.0,
        inputs in any_inputs(),
    ) {
        let t = turbine();
        let inputs = StepInputs { wind_speed, pitch, ..inputs };
        let last_change = settle(&t, &inputs, 800);
        prop_assert!(last_change < 1e-3, "omega still moving by {}", last_change);
    }

    #[test]
    fn stiffest_rotor_settles(
        wind_speed in 0.0_f64..=30.0,
        pitch in -2.0_f64..=25.0,
        damping in 0.0_f64..=1.0e6,
        air_density in 1.0_f64..=1.3,
        efficiency in 0.85_f64..=0.99,
    ) {
        let t = turbine();
        let inputs = StepInputs {
            wind_speed,
            pitch,
            damping,
            air_density,
            efficiency,
            dt: limits::DT_S.1,
            inertia: limits::INERTIA_KG_M2.0,
            ..StepInputs::default()
        };
        let last_change = settle(&t, &inputs, 800);
        prop_assert!(last_change < 1e-3, "omega still moving by {}", last_change);
    }
}

#[test]
fn high_pitch_at_minimum_inertia_does_not_ring() {
    let t = turbine();
    let inputs = StepInputs {
        wind_speed: 14.0,
        pitch: 25.0,
        dt: 1.0,
        inertia: 2.0e7,
        damping: 1.0e6,
        ..StepInputs::default()
    };
    let mut state = t.reset(&inputs);
    for _ in 0..2_000 {
        state = t.step(&state, &inputs).0;
    }
    let mut speeds = Vec::new();
    for _ in 0..8 {
        state = t.step(&state, &inputs).0;
        speeds.push(state.omega);
    }
    for pair in speeds.windows(2) {
        assert!((pair[1] - pair[0]).abs() < 1e-6, "speeds {speeds:?}");
    }
}

#[test]
fn pitch_near_cubic_pole_does_not_cycle() {
    let t = turbine();
    for pitch in [-1.0, -0.97, -0.9] {
        let inputs = StepInputs {
            wind_speed: 13.5,
            pitch,
            dt: 1.0,
            inertia: limits::INERTIA_KG_M2.0,
            damping: 1.0e6,
            air_density: 1.3,
            efficiency: 0.99,
            ..StepInputs::default()
        };
        let mut state = t.reset(&inputs);
        let mut largest_late_change: f64 = 0.0;
        for i in 0..3_000 {
            let prev = state.omega;
            state = t.step(&state, &inputs).0;
            if i >= 2_000 {
                largest_late_change = largest_late_change.max((state.omega - prev).abs());
            }
        }
        assert!(
            largest_late_change < 1e-6,
            "pitch {pitch}: omega moved by {largest_late_change}"
        );
    }
}

#[test]
fn turbine_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Turbine>();
}
