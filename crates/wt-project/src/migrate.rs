//! Schema migration framework.

use crate::ProjectError;
use crate::schema::ScenarioDef;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut scenario: ScenarioDef) -> Result<ScenarioDef, ProjectError> {
    while scenario.version < LATEST_VERSION {
        scenario = migrate_one_version(scenario)?;
    }
    Ok(scenario)
}

fn migrate_one_version(scenario: ScenarioDef) -> Result<ScenarioDef, ProjectError> {
    match scenario.version {
        0 => migrate_v0_to_v1(scenario),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v0_to_v1(mut scenario: ScenarioDef) -> Result<ScenarioDef, ProjectError> {
    scenario.version = 1;
    Ok(scenario)
}
