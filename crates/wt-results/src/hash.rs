//! Content-based hashing for run IDs.

use sha2::{Digest, Sha256};
use wt_project::schema::ScenarioDef;

use crate::ResultsResult;

/// Run ID for a scenario under one engine version.
///
/// Any change to the scenario file contents or the engine gives a new ID.
pub fn compute_run_id(scenario: &ScenarioDef, engine_version: &str) -> ResultsResult<String> {
    let mut hasher = Sha256::new();

    let scenario_json = serde_json::to_string(scenario)?;
    hasher.update(scenario_json.as_bytes());

    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_project::schema::SegmentDef;

    fn scenario() -> ScenarioDef {
        ScenarioDef {
            schedule: vec![SegmentDef::running(100)],
            ..ScenarioDef::new("Test")
        }
    }

    #[test]
    fn hash_stability() {
        let s = scenario();
        let hash1 = compute_run_id(&s, "v1").unwrap();
        let hash2 = compute_run_id(&s, "v1").unwrap();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = scenario();
        let mut b = scenario();
        b.inputs.wind_dir_deg = 300.0;

        let id = |s: &ScenarioDef, v: &str| compute_run_id(s, v).unwrap();
        assert_ne!(id(&a, "v1"), id(&b, "v1"));
        assert_ne!(id(&a, "v1"), id(&a, "v2"));
    }

    #[test]
    fn id_is_hash_of_serialized_scenario() {
        let s = scenario();
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_string(&s).unwrap().as_bytes());
        hasher.update(b"v1");
        let expected = format!("{:x}", hasher.finalize());
        assert_eq!(compute_run_id(&s, "v1").unwrap(), expected);
    }
}
