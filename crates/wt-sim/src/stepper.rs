//! One fixed-order timestep of the whole turbine.
//!
//! ```text
//! yaw → effective wind → aerodynamics → generator → rotor
//! ```
//!
//! [`Turbine`] holds only configuration. State goes in and comes out, so the
//! same state and inputs always give the same result.

use crate::aero::{AeroModel, AeroPoint, effective_wind};
use crate::error::SimResult;
use crate::rotor::{RotorDynamics, RotorLoad};
use crate::state::{StepInputs, StepOutputs, TurbineState};
use crate::turbine::TurbineSpec;
use wt_controls::{GeneratorController, GeneratorGains, GeneratorOutput, YawController, YawState};
use wt_core::units::{rad_per_s, watts};
use wt_core::{to_kw, to_rpm};

/// Configured turbine: spec plus its controllers.
#[derive(Clone, Debug)]
pub struct Turbine {
    spec: TurbineSpec,
    yaw: YawController,
    generator: GeneratorController,
    aero: AeroModel,
    rotor: RotorDynamics,
}

impl Turbine {
    /// Assemble a turbine from its spec and controller settings.
    pub fn new(spec: TurbineSpec, yaw: YawController, gains: GeneratorGains) -> SimResult<Self> {
        let radius = spec.radius_m();
        let generator = GeneratorController::new(
            gains,
            spec.rated_power_w(),
            spec.tsr_opt,
            spec.omega_max_rad_s(),
            radius,
        )?;
        let aero = AeroModel::new(radius, spec.swept_area().value);
        let rotor = RotorDynamics::new(spec.omega_max_rad_s())?;
        Ok(Self {
            spec,
            yaw,
            generator,
            aero,
            rotor,
        })
    }

    pub fn spec(&self) -> &TurbineSpec {
        &self.spec
    }

    /// Fresh state: seed speed, nacelle pointed into the wind, straight cable.
    pub fn reset(&self, inputs: &StepInputs) -> TurbineState {
        let inputs = inputs.sanitized();
        let yaw = YawState::aligned(inputs.wind_dir);
        TurbineState {
            omega: self.spec.omega_seed_rad_s(),
            yaw_abs: yaw.yaw_abs_deg,
            cable_pos: yaw.cable_pos_deg,
            unwinding: yaw.unwinding,
            rotor_angle: 0.0,
        }
    }

    /// Advance the turbine by one timestep.
    pub fn step(&self, state: &TurbineState, inputs: &StepInputs) -> (TurbineState, StepOutputs) {
        let inputs = inputs.sanitized();
        let state = state.sanitized(self.rotor.omega_max);

        let (yaw, yaw_update) = self.yaw.update(
            &state.yaw(),
            inputs.wind_dir,
            inputs.yaw_rate_limit,
            inputs.yaw_deadband,
            inputs.dt,
        );
        let misalignment = yaw_update.misalignment_after_deg;

        let v_eff = effective_wind(inputs.wind_speed, misalignment);
        let aero = self
            .aero
            .evaluate(state.omega, v_eff, inputs.pitch, inputs.air_density);
        let generator =
            self.generator
                .update(state.omega, aero.power_w, v_eff, inputs.efficiency);

        let load = RotorLoad {
            aero_torque_nm: aero.torque_nm,
            generator_torque_nm: generator.torque_nm,
            inertia: inputs.inertia,
            damping: inputs.damping,
        };
        let rotor = self
            .rotor
            .step(state.omega, state.rotor_angle, &load, inputs.dt);

        let next = TurbineState {
            omega: rotor.omega,
            rotor_angle: rotor.rotor_angle,
            ..state.with_yaw(yaw)
        };
        let outputs = self.package(&next, misalignment, v_eff, &aero, &generator);
        (next, outputs)
    }

    /// Outputs for the current state and inputs without advancing time.
    pub fn observe(&self, state: &TurbineState, inputs: &StepInputs) -> StepOutputs {
        let inputs = inputs.sanitized();
        let state = state.sanitized(self.rotor.omega_max);

        let misalignment = state.yaw().misalignment_deg(inputs.wind_dir);
        let v_eff = effective_wind(inputs.wind_speed, misalignment);
        let aero = self
            .aero
            .evaluate(state.omega, v_eff, inputs.pitch, inputs.air_density);
        let generator =
            self.generator
                .update(state.omega, aero.power_w, v_eff, inputs.efficiency);

        self.package(&state, misalignment, v_eff, &aero, &generator)
    }

    fn package(
        &self,
        state: &TurbineState,
        misalignment: f64,
        v_eff: f64,
        aero: &AeroPoint,
        generator: &GeneratorOutput,
    ) -> StepOutputs {
        let yaw = state.yaw();
        StepOutputs {
            nacelle_dir: yaw.nacelle_dir_deg(),
            misalignment,
            v_eff,
            cp: aero.cp,
            aero_power_kw: to_kw(watts(aero.power_w)),
            electrical_power_kw: to_kw(watts(generator.electrical_power_w)),
            rotor_rpm: to_rpm(rad_per_s(state.omega)),
            tip_speed: state.omega * self.aero.radius_m,
            tsr: aero.tsr,
            cable_turns: yaw.cable_turns(),
            status: self.yaw.status(&yaw),
            aero_torque_nm: aero.torque_nm,
            generator_torque_nm: generator.torque_nm,
            omega_target: generator.omega_target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_controls::OperatingStatus;

    fn turbine() -> Turbine {
        Turbine::new(
            TurbineSpec::default(),
            YawController::default(),
            GeneratorGains::default(),
        )
        .unwrap()
    }

    fn state(omega: f64, yaw_abs: f64, cable_pos: f64, unwinding: bool) -> TurbineState {
        TurbineState {
            omega,
            yaw_abs,
            cable_pos,
            unwinding,
            rotor_angle: 0.0,
        }
    }

    #[test]
    fn aligned_10_mps_scenario() {
        let t = turbine();
        let inputs = StepInputs {
            wind_speed: 10.0,
            wind_dir: 270.0,
            pitch: 2.0,
            efficiency: 0.96,
            dt: 0.15,
            yaw_rate_limit: 0.7,
            ..StepInputs::default()
        };
        let (next, out) = t.step(&state(0.6, 270.0, 0.0, false), &inputs);

        assert_eq!(next.yaw_abs, 270.0);
        assert_eq!(out.nacelle_dir, 270.0);
        assert_eq!(out.misalignment, 0.0);
        assert_eq!(out.v_eff, 10.0);
        assert!(out.electrical_power_kw.is_finite());
        assert!(out.electrical_power_kw > 0.0 && out.electrical_power_kw < 11_000.0);
        assert_eq!(out.status, OperatingStatus::Normal);
    }

    #[test]
    fn opposite_wind_is_rate_limited() {
        let t = turbine();
        let inputs = StepInputs {
            wind_dir: 0.0,
            yaw_deadband: 2.0,
            yaw_rate_limit: 0.7,
            dt: 1.0,
            ..StepInputs::default()
        };
        let (next, out) = t.step(&state(0.6, 180.0, 0.0, false), &inputs);
        assert!(((next.yaw_abs - 180.0).abs() - 0.7).abs() < 1e-12);
        assert!(((next.cable_pos).abs() - 0.7).abs() < 1e-12);
        // still facing away from the wind: no aerodynamic coupling
        assert_eq!(out.v_eff, 0.0);
        assert_eq!(out.aero_power_kw, 0.0);
        assert_eq!(out.electrical_power_kw, 0.0);
    }

    #[test]
    fn cable_limit_triggers_unwind() {
        let t = turbine();
        let start = state(0.6, 905.0 + 270.0, 905.0, false);
        assert_eq!(
            t.observe(&start, &StepInputs::default()).status,
            OperatingStatus::CableLimit
        );
        let (next, out) = t.step(&start, &StepInputs::default());
        assert_eq!(out.status, OperatingStatus::Unwinding);
        assert!(next.unwinding);
        assert!(next.cable_pos.abs() < 905.0);
    }

    #[test]
    fn observe_does_not_advance() {
        let t = turbine();
        let s = state(0.55, 263.0, 40.0, false);
        let inputs = StepInputs::default();
        let a = t.observe(&s, &inputs);
        let b = t.observe(&s, &inputs);
        assert_eq!(a, b);
        assert_eq!(a.misalignment, 7.0);
        assert!((a.rotor_rpm - to_rpm(rad_per_s(0.55))).abs() < 1e-12);
    }

    #[test]
    fn reset_aligns_with_wind() {
        let t = turbine();
        let inputs = StepInputs {
            wind_dir: 123.0,
            ..StepInputs::default()
        };
        let s = t.reset(&inputs);
        assert_eq!(s.omega, 0.6);
        assert_eq!(s.yaw_abs, 123.0);
        assert_eq!(s.cable_pos, 0.0);
        assert!(!s.unwinding);
        assert_eq!(s.rotor_angle, 0.0);
        assert_eq!(t.observe(&s, &inputs).misalignment, 0.0);
    }

    #[test]
    fn step_is_deterministic() {
        let t = turbine();
        let inputs = StepInputs::default();
        let run = || {
            let mut s = t.reset(&inputs);
            let mut trace = Vec::new();
            for i in 0..200 {
                let step_inputs = StepInputs {
                    wind_dir: (i as f64 * 1.7) % 360.0,
                    ..inputs
                };
                s = t.step(&s, &step_inputs).0;
                trace.push(s);
            }
            trace
        };
        let a = run();
        let b = run();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.omega.to_bits(), y.omega.to_bits());
            assert_eq!(x.yaw_abs.to_bits(), y.yaw_abs.to_bits());
            assert_eq!(x.cable_pos.to_bits(), y.cable_pos.to_bits());
            assert_eq!(x.rotor_angle.to_bits(), y.rotor_angle.to_bits());
        }
    }

    #[test]
    fn rotor_settles_near_target() {
        let t = turbine();
        let inputs = StepInputs {
            wind_speed: 8.0,
            dt: 0.5,
            ..StepInputs::default()
        };
        let mut s = t.reset(&inputs);
        let mut out = t.observe(&s, &inputs);
        for _ in 0..2000 {
            (s, out) = t.step(&s, &inputs);
        }
        assert!(s.omega > 0.0 && s.omega < t.spec().omega_max_rad_s());
        assert!((s.omega - out.omega_target).abs() < 0.1, "omega = {}", s.omega);
        assert!(out.electrical_power_kw > 0.0);
    }
}
