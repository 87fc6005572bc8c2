//! Scenario loading, saving, validation, and introspection.

use std::path::Path;
use wt_project::ProjectError;
use wt_project::schema::ScenarioDef;

use crate::error::{AppError, AppResult};
use crate::scenario_compile::{self, InputWarning};

/// Summary of a scenario for listing.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub name: String,
    pub version: u32,
    pub segment_count: usize,
    pub total_steps: usize,
    pub paused_steps: usize,
    pub resets: usize,
    /// Simulated time covered by running segments (s), after dt clamping
    pub simulated_time_s: f64,
}

/// Load a scenario file (YAML, or JSON by extension), migrated and validated.
pub fn load_scenario(path: &Path) -> AppResult<ScenarioDef> {
    wt_project::load_scenario(path).map_err(|e| match e {
        ProjectError::Io(source) => AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Save a scenario file; the extension picks the format.
pub fn save_scenario(path: &Path, scenario: &ScenarioDef) -> AppResult<()> {
    wt_project::save_scenario(path, scenario)?;
    Ok(())
}

/// Full validation: schema rules plus turbine and controller construction.
///
/// Returns the inputs the simulator would clamp.
pub fn validate_scenario(scenario: &ScenarioDef) -> AppResult<Vec<InputWarning>> {
    wt_project::validate_scenario(scenario)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    scenario_compile::build_turbine(scenario)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(scenario_compile::input_warnings(scenario))
}

pub fn summarize_scenario(scenario: &ScenarioDef) -> ScenarioSummary {
    let segments = scenario_compile::compile_segments(scenario);
    let simulated_time_s = segments
        .iter()
        .filter(|s| !s.paused)
        .map(|s| s.steps as f64 * s.inputs.sanitized().dt)
        .sum();
    ScenarioSummary {
        name: scenario.name.clone(),
        version: scenario.version,
        segment_count: segments.len(),
        total_steps: scenario.total_steps(),
        paused_steps: segments.iter().filter(|s| s.paused).map(|s| s.steps).sum(),
        resets: segments.iter().filter(|s| s.reset).count(),
        simulated_time_s,
    }
}
