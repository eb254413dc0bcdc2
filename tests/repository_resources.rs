//! ---
//! ems_section: "15-testing-qa-runbook"
//! ems_subsection: "integration-tests"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Checks the shipped configuration and resource files load."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use zefir_analytics::areas::parse_area_mapping;
use zefir_analytics::static_data::load_fuel_units;
use zefir_analytics::translation::load_lookup;
use zefir_common::AppConfig;

fn repo_path(path: impl AsRef<Path>) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(path)
}

fn read(path: &str) -> String {
    let full = repo_path(path);
    fs::read_to_string(&full)
        .unwrap_or_else(|err| panic!("failed to read {}: {}", full.display(), err))
}

fn example_config() -> AppConfig {
    read("configs/zefir-api.example.toml")
        .parse()
        .expect("example config parses")
}

#[test]
fn example_config_parses_and_matches_default_layout() {
    let config = example_config();
    assert_eq!(config.api.listen.port(), 8000);
    assert!(config.api.cors_origins.is_empty());
    assert_eq!(config.paths.area_mapping, PathBuf::from("resources/area_scenario_mapping.json"));
    assert_eq!(
        config.paths.translation.lbs,
        AppConfig::default().paths.translation.lbs
    );
    assert_eq!(config.tags.tags_to_drop, vec!["KSE", "KSE_CONN", "HD_CONN"]);
}

#[test]
fn required_resources_are_shipped() {
    let config = example_config();
    let paths = &config.paths;
    for path in [
        &paths.fuel_units,
        &paths.area_mapping,
        &paths.translation.tags,
        &paths.translation.names,
        &paths.translation.fuels,
        &paths.translation.lbs,
        &paths.translation.energy,
    ] {
        assert!(repo_path(path).is_file(), "{} missing", path.display());
    }
}

#[test]
fn shipped_lookups_parse() {
    let config = example_config();
    let translation = &config.paths.translation;
    for path in [
        &translation.tags,
        &translation.names,
        &translation.fuels,
        &translation.lbs,
        &translation.energy,
    ] {
        let lookup = load_lookup(repo_path(path)).expect("lookup parses");
        assert!(!lookup.is_empty(), "{} is empty", path.display());
    }

    let fuels = load_lookup(repo_path(&translation.fuels)).unwrap();
    let units = load_fuel_units(repo_path(&config.paths.fuel_units)).unwrap();
    for fuel in units.keys() {
        assert!(fuels.contains_key(fuel), "fuel {fuel} has no translation");
    }
}

#[test]
fn shipped_area_mapping_numbers_scenarios() {
    let areas = parse_area_mapping(&read("resources/area_scenario_mapping.json")).unwrap();
    assert_eq!(areas.len(), 1);
    let ids: Vec<_> = areas[0].scenarios.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![0, 1]);
}
