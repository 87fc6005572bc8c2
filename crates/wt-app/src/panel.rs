//! Text rendering of the live metric panel.

use std::fmt;

use wt_project::schema::ScenarioDef;
use wt_sim::{StepInputs, StepOutputs, TurbineState};

use crate::error::AppResult;
use crate::scenario_compile;

/// Headline metrics for one step, as a front end shows them.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPanel {
    pub wind_speed_mps: f64,
    pub wind_dir_deg: f64,
    pub outputs: StepOutputs,
}

impl MetricPanel {
    /// Panel for outputs produced under `inputs`; shows the clamped wind.
    pub fn new(inputs: &StepInputs, outputs: StepOutputs) -> Self {
        let inputs = inputs.sanitized();
        Self {
            wind_speed_mps: inputs.wind_speed,
            wind_dir_deg: inputs.wind_dir,
            outputs,
        }
    }

    /// Wind arrow caption, e.g. `Wind: 10.0 m/s @ 270°`.
    pub fn wind_label(&self) -> String {
        format!(
            "Wind: {:.1} m/s @ {:.0}°",
            self.wind_speed_mps, self.wind_dir_deg
        )
    }
}

impl fmt::Display for MetricPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.outputs;
        writeln!(f, "{}", self.wind_label())?;
        writeln!(f, "  Electrical power  {:>10.1} kW", o.electrical_power_kw)?;
        writeln!(f, "  Rotor speed       {:>10.2} rpm", o.rotor_rpm)?;
        writeln!(f, "  Tip speed         {:>10.1} m/s", o.tip_speed)?;
        writeln!(f, "  TSR (λ)           {:>10.2}", o.tsr)?;
        writeln!(f, "  Cp                {:>10.3}", o.cp)?;
        writeln!(f, "  Effective wind    {:>10.1} m/s", o.v_eff)?;
        writeln!(f, "  Status            {:>10}", o.status)?;
        writeln!(f, "  Nacelle yaw       {:>10.1}°", o.nacelle_dir)?;
        writeln!(f, "  Misalignment      {:>10.1}°", o.misalignment)?;
        write!(f, "  Cable twist       {:>10.2} turns", o.cable_turns)
    }
}

/// One step from a scenario's starting point.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub inputs: StepInputs,
    pub before: TurbineState,
    pub after: TurbineState,
    pub panel: MetricPanel,
}

/// Step once from the scenario's initial state, using the first segment's
/// inputs (or the base inputs when the schedule is empty).
pub fn step_once(scenario: &ScenarioDef) -> AppResult<StepReport> {
    let compiled = scenario_compile::compile_scenario(scenario)?;
    let first = compiled.segments.first();
    let inputs = first
        .map(|s| s.inputs)
        .unwrap_or_else(|| scenario_compile::step_inputs(&scenario.inputs));
    let before = match first {
        Some(s) if s.reset => compiled.turbine.reset(&inputs),
        _ => compiled.initial,
    };

    let (after, outputs) = compiled.turbine.step(&before, &inputs);
    Ok(StepReport {
        inputs,
        before,
        after,
        panel: MetricPanel::new(&inputs, outputs),
    })
}
