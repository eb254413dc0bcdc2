//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Scenario bundle loading from JSON or YAML documents."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::{fs, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::{EngineError, Result},
    model::Network,
    results::StoredResults,
    ScenarioEngine,
};

/// On-disk form of one scenario: its network and stored results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioBundle {
    pub scenario_name: String,
    pub year_sample: Vec<u32>,
    pub network: Network,
    #[serde(default)]
    pub results: StoredResults,
}

pub fn load_scenario_bundle(path: impl AsRef<Path>) -> Result<ScenarioEngine> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    let bundle: ScenarioBundle = if data.trim_start().starts_with('{') {
        serde_json::from_str(&data)?
    } else {
        serde_yaml::from_str(&data).map_err(EngineError::YamlSerializationFailed)?
    };
    bundle.results.validate()?;
    debug!(
        scenario = %bundle.scenario_name,
        path = %path.display(),
        generators = bundle.network.generators.len(),
        "scenario bundle loaded"
    );
    Ok(ScenarioEngine::new(
        bundle.scenario_name,
        bundle.network,
        bundle.year_sample,
        Arc::new(bundle.results),
    )
    .with_results_path(path))
}

pub fn write_scenario_bundle(path: impl AsRef<Path>, bundle: &ScenarioBundle) -> Result<()> {
    let data = serde_json::to_string_pretty(bundle)?;
    fs::write(path, data)?;
    Ok(())
}
