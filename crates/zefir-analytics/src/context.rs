//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Start-up application context: areas, scenarios, translators and map layers."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Everything the reporting endpoints read is assembled once by
//! [`AppContext::load`] and shared read-only afterwards.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{info, warn};
use zefir_common::{AppConfig, FuelsConfig, NamesConfig, PathsConfig, TagsConfig};
use zefir_engine::io::load_scenario_bundle;
use zefir_engine::ScenarioEngine;

use crate::areas::{load_area_mapping, Area, Scenario};
use crate::errors::{AnalyticsError, Result};
use crate::map::MapLayers;
use crate::transport::TransportData;
use crate::translation::{NameTranslator, TranslationLookups};

/// Energy-type names, tag filters and fuel settings used by the extractors.
#[derive(Debug, Clone, Default)]
pub struct ReportSettings {
    pub names: NamesConfig,
    pub tags: TagsConfig,
    pub fuels: FuelsConfig,
}

impl ReportSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            names: config.names.clone(),
            tags: config.tags.clone(),
            fuels: config.fuels.clone(),
        }
    }
}

/// One loaded scenario with the indices built over its network.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    pub id: usize,
    pub area_name: String,
    pub description: String,
    pub engine: ScenarioEngine,
    pub translator: NameTranslator,
    pub transport: Option<TransportData>,
    pub settings: Arc<ReportSettings>,
}

impl ScenarioContext {
    pub fn new(
        scenario: &Scenario,
        area_name: impl Into<String>,
        engine: ScenarioEngine,
        lookups: &TranslationLookups,
        settings: Arc<ReportSettings>,
    ) -> Self {
        let translator = NameTranslator::build(engine.network(), lookups);
        Self {
            id: scenario.id,
            area_name: area_name.into(),
            description: scenario.description.clone(),
            engine,
            translator,
            transport: None,
            settings,
        }
    }

    pub fn with_transport(mut self, transport: Option<TransportData>) -> Self {
        self.transport = transport;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppContext {
    areas: Vec<Area>,
    scenarios: IndexMap<usize, ScenarioContext>,
    paths: PathsConfig,
    map: MapLayers,
}

impl AppContext {
    pub fn new(
        areas: Vec<Area>,
        scenarios: IndexMap<usize, ScenarioContext>,
        paths: PathsConfig,
        map: MapLayers,
    ) -> Self {
        Self {
            areas,
            scenarios,
            paths,
            map,
        }
    }

    /// Read the area mapping, every scenario bundle it names, translation
    /// lookups, transport tables and map layers.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let paths = &config.paths;
        let areas = load_area_mapping(&paths.area_mapping)?;
        let lookups = TranslationLookups::load(&paths.translation)?;
        let settings = Arc::new(ReportSettings::from_config(config));

        let mut scenarios = IndexMap::new();
        for area in &areas {
            for scenario in &area.scenarios {
                let Some(bundle) = find_bundle(paths, &area.name, &scenario.name) else {
                    warn!(
                        area = %area.name,
                        scenario = %scenario.name,
                        id = scenario.id,
                        "scenario bundle not found"
                    );
                    continue;
                };
                let engine = load_scenario_bundle(&bundle)?;
                let transport = TransportData::load(&paths.transport, &scenario.name)?;
                info!(
                    area = %area.name,
                    scenario = %scenario.name,
                    id = scenario.id,
                    path = %bundle.display(),
                    transport = transport.is_some(),
                    "scenario loaded"
                );
                let context =
                    ScenarioContext::new(scenario, &area.name, engine, &lookups, settings.clone())
                        .with_transport(transport);
                scenarios.insert(scenario.id, context);
            }
        }

        let map = MapLayers::load(&paths.polygons, &paths.points)?;
        Ok(Self::new(areas, scenarios, paths.clone(), map))
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn area(&self, id: usize) -> Result<&Area> {
        self.areas
            .iter()
            .find(|area| area.id == id)
            .ok_or(AnalyticsError::AreaNotFound(id))
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioContext> {
        self.scenarios.values()
    }

    pub fn scenario(&self, id: usize) -> Result<&ScenarioContext> {
        self.scenarios
            .get(&id)
            .ok_or(AnalyticsError::ScenarioNotFound(id))
    }

    /// Translator of the first loaded scenario; used by endpoints that are
    /// not bound to one scenario.
    pub fn default_translator(&self) -> NameTranslator {
        self.scenarios
            .values()
            .next()
            .map(|scenario| scenario.translator.clone())
            .unwrap_or_default()
    }

    pub fn paths(&self) -> &PathsConfig {
        &self.paths
    }

    pub fn map(&self) -> &MapLayers {
        &self.map
    }
}

fn find_bundle(paths: &PathsConfig, area: &str, scenario: &str) -> Option<PathBuf> {
    paths
        .scenario_bundle_candidates(area, scenario)
        .into_iter()
        .find(|candidate| Path::is_file(candidate))
}
