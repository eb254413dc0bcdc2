//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Scenario engine exposing a network and its optimisation results."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
pub mod errors;
pub mod io;
pub mod model;
pub mod results;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use model::Network;
use results::ResultSource;

pub use errors::{EngineError, Result};

/// A loaded scenario: its network model, year sample and result accessor.
#[derive(Debug, Clone)]
pub struct ScenarioEngine {
    scenario_name: String,
    network: Network,
    year_sample: Vec<u32>,
    results: Arc<dyn ResultSource>,
    results_path: Option<PathBuf>,
}

impl ScenarioEngine {
    pub fn new(
        scenario_name: impl Into<String>,
        network: Network,
        year_sample: Vec<u32>,
        results: Arc<dyn ResultSource>,
    ) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            network,
            year_sample,
            results,
            results_path: None,
        }
    }

    pub fn with_results_path(mut self, path: impl AsRef<Path>) -> Self {
        self.results_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn year_sample(&self) -> &[u32] {
        &self.year_sample
    }

    pub fn results(&self) -> &dyn ResultSource {
        self.results.as_ref()
    }

    /// File the results were read from, if loaded from disk.
    pub fn results_path(&self) -> Option<&Path> {
        self.results_path.as_deref()
    }
}
