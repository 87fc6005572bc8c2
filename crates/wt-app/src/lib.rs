//! Shared application service layer for windsim.
//!
//! Front ends go through this crate for scenario loading, compilation into a
//! runnable turbine, cached scenario runs and result queries.

pub mod error;
pub mod panel;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod scenario_compile;

pub use error::{AppError, AppResult};
pub use panel::{MetricPanel, StepReport, step_once};
pub use progress::{RunProgressEvent, RunStage, SimulationProgress};
pub use project_service::{
    ScenarioSummary, load_scenario, save_scenario, summarize_scenario, validate_scenario,
};
pub use query::{
    RunSummary, SERIES_VARIABLES, extract_series, get_run_summary, record_value, write_series_csv,
};
pub use run_service::{
    ENGINE_VERSION, RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_run,
    ensure_run_with_progress, list_runs, load_run,
};
pub use scenario_compile::{CompiledScenario, InputWarning, compile_scenario};
