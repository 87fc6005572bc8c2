//! Scenario compilation: file definitions to a runnable turbine.

use tracing::warn;
use wt_controls::{GeneratorGains, YawController};
use wt_core::units::{kw, m, rad_per_s};
use wt_core::wrap_tau;
use wt_project::schema::{ControlsDef, InputsDef, ScenarioDef, TurbineDef};
use wt_sim::{Segment, StepInputs, Turbine, TurbineSpec, TurbineState};

use crate::error::AppResult;

/// Everything the scenario runner needs.
#[derive(Debug, Clone)]
pub struct CompiledScenario {
    pub turbine: Turbine,
    pub initial: TurbineState,
    pub segments: Vec<Segment>,
}

/// Input value outside its accepted range; the simulator clamps it.
#[derive(Debug, Clone, PartialEq)]
pub struct InputWarning {
    /// `inputs` or `schedule[i]`
    pub context: String,
    pub field: &'static str,
    pub value: f64,
}

impl std::fmt::Display for InputWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} = {} is out of range and will be clamped",
            self.context, self.field, self.value
        )
    }
}

pub fn build_turbine_spec(def: &TurbineDef) -> AppResult<TurbineSpec> {
    Ok(TurbineSpec::new(
        m(def.rotor_radius_m),
        kw(def.rated_power_kw),
        m(def.hub_height_m),
        def.tsr_opt,
        rad_per_s(def.omega_max_rad_s),
        rad_per_s(def.omega_seed_rad_s),
    )?)
}

pub fn build_yaw_controller(def: &ControlsDef) -> AppResult<YawController> {
    Ok(YawController::new(
        def.unwind_threshold_deg,
        def.unwind_release_deg,
        def.unwind_rate_factor,
        def.unwind_rate_ceiling_deg_s,
    )?)
}

pub fn build_generator_gains(def: &ControlsDef) -> GeneratorGains {
    GeneratorGains {
        kp: def.generator_kp,
        torque_ceiling_nm: def.torque_ceiling_nm,
    }
}

/// Turbine with the scenario's overrides applied to the defaults.
pub fn build_turbine(scenario: &ScenarioDef) -> AppResult<Turbine> {
    let turbine_def = scenario.turbine.clone().unwrap_or_default();
    let controls_def = scenario.controls.clone().unwrap_or_default();

    let spec = build_turbine_spec(&turbine_def)?;
    let yaw = build_yaw_controller(&controls_def)?;
    let gains = build_generator_gains(&controls_def);
    Ok(Turbine::new(spec, yaw, gains)?)
}

/// Core inputs from file inputs; efficiency goes from percent to a fraction.
pub fn step_inputs(def: &InputsDef) -> StepInputs {
    StepInputs {
        wind_speed: def.wind_speed_mps,
        wind_dir: def.wind_dir_deg,
        pitch: def.pitch_deg,
        efficiency: def.efficiency_pct / 100.0,
        dt: def.dt_s,
        yaw_rate_limit: def.yaw_rate_limit_deg_s,
        yaw_deadband: def.yaw_deadband_deg,
        air_density: def.air_density_kg_m3,
        inertia: def.inertia_kg_m2,
        damping: def.damping_nms,
    }
}

/// Starting state: the file's `initial` block, or a reset into the base wind.
pub fn initial_state(scenario: &ScenarioDef, turbine: &Turbine) -> TurbineState {
    match &scenario.initial {
        Some(init) => TurbineState {
            omega: init
                .omega_rad_s
                .unwrap_or_else(|| turbine.spec().omega_seed_rad_s()),
            yaw_abs: init.yaw_abs_deg,
            cable_pos: init.cable_pos_deg,
            unwinding: init.unwinding,
            rotor_angle: wrap_tau(init.rotor_angle_rad),
        },
        None => turbine.reset(&step_inputs(&scenario.inputs)),
    }
}

pub fn compile_segments(scenario: &ScenarioDef) -> Vec<Segment> {
    scenario
        .schedule
        .iter()
        .enumerate()
        .filter_map(|(idx, seg)| {
            scenario.segment_inputs(idx).map(|inputs| Segment {
                steps: seg.steps,
                paused: seg.paused,
                reset: seg.reset,
                inputs: step_inputs(&inputs),
            })
        })
        .collect()
}

fn file_field(core_field: &str) -> &'static str {
    match core_field {
        "wind_speed" => "wind_speed_mps",
        "wind_dir" => "wind_dir_deg",
        "pitch" => "pitch_deg",
        "efficiency" => "efficiency_pct",
        "dt" => "dt_s",
        "yaw_rate_limit" => "yaw_rate_limit_deg_s",
        "yaw_deadband" => "yaw_deadband_deg",
        "air_density" => "air_density_kg_m3",
        "inertia" => "inertia_kg_m2",
        "damping" => "damping_nms",
        _ => "unknown",
    }
}

fn warnings_for(context: &str, def: &InputsDef) -> Vec<InputWarning> {
    step_inputs(def)
        .clamped_fields()
        .into_iter()
        // wrapping a direction is not a range violation
        .filter(|f| *f != "wind_dir")
        .map(file_field)
        .map(|field| InputWarning {
            context: context.to_string(),
            field,
            value: def
                .fields()
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, v)| *v)
                .unwrap_or(f64::NAN),
        })
        .collect()
}

/// Inputs the simulator will clamp, for the base inputs and every segment.
pub fn input_warnings(scenario: &ScenarioDef) -> Vec<InputWarning> {
    let mut warnings = warnings_for("inputs", &scenario.inputs);
    let base = warnings.clone();
    for idx in 0..scenario.schedule.len() {
        let Some(effective) = scenario.segment_inputs(idx) else {
            continue;
        };
        let context = format!("schedule[{}]", idx);
        // inherited base values are already reported
        warnings.extend(
            warnings_for(&context, &effective)
                .into_iter()
                .filter(|w| !base.iter().any(|b| b.field == w.field && b.value == w.value)),
        );
    }
    warnings
}

pub fn compile_scenario(scenario: &ScenarioDef) -> AppResult<CompiledScenario> {
    for warning in input_warnings(scenario) {
        warn!(scenario = %scenario.name, "{}", warning);
    }

    let turbine = build_turbine(scenario)?;
    let initial = initial_state(scenario, &turbine);
    let segments = compile_segments(scenario);

    Ok(CompiledScenario {
        turbine,
        initial,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_project::schema::{InitialStateDef, InputOverrides, SegmentDef};

    fn scenario() -> ScenarioDef {
        ScenarioDef {
            schedule: vec![
                SegmentDef::running(10),
                SegmentDef {
                    steps: 5,
                    paused: true,
                    reset: false,
                    overrides: InputOverrides {
                        wind_dir_deg: Some(300.0),
                        ..InputOverrides::default()
                    },
                },
            ],
            ..ScenarioDef::new("compile")
        }
    }

    #[test]
    fn default_scenario_compiles() {
        let compiled = compile_scenario(&scenario()).unwrap();
        assert_eq!(compiled.segments.len(), 2);
        assert_eq!(compiled.segments[0].inputs, StepInputs::default());
        assert_eq!(compiled.segments[1].inputs.wind_dir, 300.0);
        assert!(compiled.segments[1].paused);
        assert_eq!(compiled.initial, compiled.turbine.reset(&StepInputs::default()));
    }

    #[test]
    fn efficiency_percent_becomes_fraction() {
        let mut def = InputsDef::default();
        def.efficiency_pct = 90.0;
        assert!((step_inputs(&def).efficiency - 0.9).abs() < 1e-12);
    }

    #[test]
    fn explicit_initial_state_is_used() {
        let s = ScenarioDef {
            initial: Some(InitialStateDef {
                omega_rad_s: None,
                yaw_abs_deg: 1175.0,
                cable_pos_deg: 905.0,
                unwinding: false,
                rotor_angle_rad: 7.0,
            }),
            ..scenario()
        };
        let compiled = compile_scenario(&s).unwrap();
        assert_eq!(compiled.initial.omega, 0.6);
        assert_eq!(compiled.initial.cable_pos, 905.0);
        assert!(compiled.initial.rotor_angle < std::f64::consts::TAU);
    }

    #[test]
    fn invalid_controls_fail_to_compile() {
        let s = ScenarioDef {
            controls: Some(ControlsDef {
                unwind_rate_factor: 0.5,
                ..ControlsDef::default()
            }),
            ..scenario()
        };
        assert!(compile_scenario(&s).is_err());
    }

    #[test]
    fn out_of_range_inputs_warn_once() {
        let mut s = scenario();
        s.inputs.wind_speed_mps = 40.0;
        s.schedule[1].overrides.pitch_deg = Some(30.0);
        s.schedule[1].overrides.wind_dir_deg = Some(400.0);

        let warnings = input_warnings(&s);
        assert_eq!(warnings.len(), 2, "{warnings:?}");
        assert_eq!(warnings[0].context, "inputs");
        assert_eq!(warnings[0].field, "wind_speed_mps");
        assert_eq!(warnings[0].value, 40.0);
        assert_eq!(warnings[1].context, "schedule[1]");
        assert_eq!(warnings[1].field, "pitch_deg");
    }

    #[test]
    fn in_range_scenario_has_no_warnings() {
        assert!(input_warnings(&scenario()).is_empty());
    }
}
