//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Area and scenario registry read from the area mapping file."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: usize,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: usize,
    pub name: String,
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Deserialize)]
struct ScenarioEntry {
    scenario_name: String,
    #[serde(default)]
    description: String,
}

/// Parse `{area: [{scenario_name, description}]}`.
///
/// Areas are numbered in document order; scenario ids run across all areas.
pub fn parse_area_mapping(document: &str) -> Result<Vec<Area>> {
    let raw: IndexMap<String, Vec<ScenarioEntry>> = serde_json::from_str(document)?;
    let mut next_scenario = 0;
    let areas = raw
        .into_iter()
        .enumerate()
        .map(|(area_id, (name, entries))| {
            let scenarios = entries
                .into_iter()
                .map(|entry| {
                    let scenario = Scenario {
                        id: next_scenario,
                        name: entry.scenario_name,
                        description: entry.description,
                    };
                    next_scenario += 1;
                    scenario
                })
                .collect();
            Area {
                id: area_id,
                name,
                scenarios,
            }
        })
        .collect();
    Ok(areas)
}

pub fn load_area_mapping(path: impl AsRef<Path>) -> Result<Vec<Area>> {
    let document = fs::read_to_string(path)?;
    parse_area_mapping(&document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_ids_are_global_and_ordered() {
        let areas = parse_area_mapping(
            r#"{
                "Kraków": [
                    {"scenario_name": "base", "description": "Reference"},
                    {"scenario_name": "green", "description": "High RES"}
                ],
                "Gdańsk": [{"scenario_name": "base"}]
            }"#,
        )
        .unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].name, "Kraków");
        assert_eq!(areas[1].id, 1);
        let ids: Vec<_> = areas
            .iter()
            .flat_map(|a| a.scenarios.iter().map(|s| s.id))
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(areas[1].scenarios[0].description, "");
    }
}
