//! Scenario validation logic.
//!
//! Rejects files that cannot describe a physical turbine. Slider values
//! outside their usual range are not errors; the simulator clamps them.

use crate::schema::{ControlsDef, InitialStateDef, InputOverrides, InputsDef, ScenarioDef, TurbineDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must not be negative"))
    }
}

pub fn validate_scenario(scenario: &ScenarioDef) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }

    if let Some(turbine) = &scenario.turbine {
        validate_turbine(turbine)?;
    }
    if let Some(controls) = &scenario.controls {
        validate_controls(controls)?;
    }
    validate_inputs("inputs", &scenario.inputs)?;
    if let Some(initial) = &scenario.initial {
        validate_initial(initial)?;
    }

    for (idx, segment) in scenario.schedule.iter().enumerate() {
        let ctx = format!("schedule[{}]", idx);
        if segment.steps == 0 {
            return Err(invalid(format!("{}.steps", ctx), 0, "must be at least 1"));
        }
        validate_overrides(&ctx, &segment.overrides)?;
    }

    Ok(())
}

fn validate_turbine(t: &TurbineDef) -> Result<(), ValidationError> {
    positive("turbine.rotor_radius_m", t.rotor_radius_m)?;
    positive("turbine.rated_power_kw", t.rated_power_kw)?;
    positive("turbine.hub_height_m", t.hub_height_m)?;
    positive("turbine.tsr_opt", t.tsr_opt)?;
    positive("turbine.omega_max_rad_s", t.omega_max_rad_s)?;
    positive("turbine.omega_seed_rad_s", t.omega_seed_rad_s)?;
    if t.omega_seed_rad_s > t.omega_max_rad_s {
        return Err(invalid(
            "turbine.omega_seed_rad_s",
            t.omega_seed_rad_s,
            "must not exceed omega_max_rad_s",
        ));
    }
    Ok(())
}

fn validate_controls(c: &ControlsDef) -> Result<(), ValidationError> {
    non_negative("controls.generator_kp", c.generator_kp)?;
    positive("controls.torque_ceiling_nm", c.torque_ceiling_nm)?;
    positive("controls.unwind_threshold_deg", c.unwind_threshold_deg)?;
    positive("controls.unwind_release_deg", c.unwind_release_deg)?;
    finite("controls.unwind_rate_factor", c.unwind_rate_factor)?;
    if c.unwind_rate_factor < 1.0 {
        return Err(invalid(
            "controls.unwind_rate_factor",
            c.unwind_rate_factor,
            "must be at least 1",
        ));
    }
    positive("controls.unwind_rate_ceiling_deg_s", c.unwind_rate_ceiling_deg_s)?;
    if c.unwind_release_deg >= c.unwind_threshold_deg {
        return Err(invalid(
            "controls.unwind_release_deg",
            c.unwind_release_deg,
            "must be below unwind_threshold_deg",
        ));
    }
    Ok(())
}

fn validate_inputs(ctx: &str, inputs: &InputsDef) -> Result<(), ValidationError> {
    for (name, value) in inputs.fields() {
        finite(&format!("{}.{}", ctx, name), value)?;
    }
    non_negative(&format!("{}.dt_s", ctx), inputs.dt_s)
}

fn validate_overrides(ctx: &str, o: &InputOverrides) -> Result<(), ValidationError> {
    // Absent overrides fall back to zero only for the finiteness check.
    let probe = InputsDef {
        wind_speed_mps: 0.0,
        wind_dir_deg: 0.0,
        pitch_deg: 0.0,
        efficiency_pct: 0.0,
        dt_s: 0.0,
        yaw_rate_limit_deg_s: 0.0,
        yaw_deadband_deg: 0.0,
        air_density_kg_m3: 0.0,
        inertia_kg_m2: 0.0,
        damping_nms: 0.0,
    };
    validate_inputs(ctx, &probe.with_overrides(o))
}

fn validate_initial(init: &InitialStateDef) -> Result<(), ValidationError> {
    if let Some(omega) = init.omega_rad_s {
        non_negative("initial.omega_rad_s", omega)?;
    }
    finite("initial.yaw_abs_deg", init.yaw_abs_deg)?;
    finite("initial.cable_pos_deg", init.cable_pos_deg)?;
    finite("initial.rotor_angle_rad", init.rotor_angle_rad)
}
