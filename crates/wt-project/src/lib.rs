//! wt-project: scenario file format and validation.

pub mod migrate;
pub mod schema;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_scenario};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<ScenarioDef> {
    let content = std::fs::read_to_string(path)?;
    let scenario: ScenarioDef = serde_yaml::from_str(&content)?;
    finish_load(scenario)
}

pub fn save_yaml(path: &Path, scenario: &ScenarioDef) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<ScenarioDef> {
    let content = std::fs::read_to_string(path)?;
    let scenario: ScenarioDef = serde_json::from_str(&content)?;
    finish_load(scenario)
}

pub fn save_json(path: &Path, scenario: &ScenarioDef) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a scenario, picking the format from the file extension.
///
/// `.json` is read as JSON; anything else as YAML.
pub fn load_scenario(path: &Path) -> ProjectResult<ScenarioDef> {
    if is_json(path) {
        load_json(path)
    } else {
        load_yaml(path)
    }
}

/// Save a scenario, picking the format from the file extension.
pub fn save_scenario(path: &Path, scenario: &ScenarioDef) -> ProjectResult<()> {
    if is_json(path) {
        save_json(path, scenario)
    } else {
        save_yaml(path, scenario)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn finish_load(scenario: ScenarioDef) -> ProjectResult<ScenarioDef> {
    let scenario = migrate_to_latest(scenario)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}
