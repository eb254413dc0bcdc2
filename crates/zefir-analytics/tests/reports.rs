//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Report extraction over the fixture scenario."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use strum::IntoEnumIterator;
use zefir_analytics::aggregate::{aggregate_details, aggregate_stacks, aggregate_totals};
use zefir_analytics::dispatch::get_data;
use zefir_analytics::metrics::usage::{consumption_factor, regroup_by_aggregate_type};
use zefir_analytics::payload::{DataEntries, DataResponse, EmissionEntry, FuelEntry};
use zefir_analytics::scenario::describe_scenario;
use zefir_analytics::{AggregateType, AnalyticsError, AppContext, DataCategory};
use zefir_testharness::{fixture_bundle, FixtureWorkspace, YEAR_SAMPLE};

fn load(workspace: &FixtureWorkspace) -> AppContext {
    AppContext::load(workspace.config()).expect("fixture context loads")
}

fn report(app: &AppContext, category: DataCategory) -> DataResponse {
    let ctx = app.scenario(0).expect("base scenario loaded");
    get_data(ctx, category).unwrap_or_else(|err| panic!("{category} failed: {err}"))
}

fn technologies(response: &DataResponse) -> Vec<(String, Vec<f64>)> {
    match &response.data {
        DataEntries::Technologies(entries) => entries
            .iter()
            .map(|e| (e.technology_name.clone(), e.values.clone()))
            .collect(),
        other => panic!("expected technology entries, got {other:?}"),
    }
}

fn emissions(response: &DataResponse) -> &[EmissionEntry] {
    match &response.data {
        DataEntries::Emissions(entries) => entries,
        other => panic!("expected emission entries, got {other:?}"),
    }
}

fn fuels(response: &DataResponse) -> &[FuelEntry] {
    match &response.data {
        DataEntries::Fuels(entries) => entries,
        other => panic!("expected fuel entries, got {other:?}"),
    }
}

fn labels(rows: &[(String, Vec<f64>)]) -> Vec<&str> {
    rows.iter().map(|(label, _)| label.as_str()).collect()
}

fn values<'a>(rows: &'a [(String, Vec<f64>)], label: &str) -> &'a [f64] {
    rows.iter()
        .find(|(l, _)| l == label)
        .map(|(_, v)| v.as_slice())
        .unwrap_or_else(|| panic!("row {label} missing from {:?}", labels(rows)))
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-6, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn scenarios_without_bundle_are_skipped() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    assert_eq!(app.areas().len(), 1);
    assert_eq!(app.areas()[0].scenarios.len(), 2);
    assert_eq!(app.scenarios().count(), 1);
    assert!(matches!(
        app.scenario(1),
        Err(AnalyticsError::ScenarioNotFound(1))
    ));
    assert!(matches!(app.area(3), Err(AnalyticsError::AreaNotFound(3))));
}

fn assert_year_aligned(category: DataCategory, response: &DataResponse) {
    let n = response.years.len();
    match &response.data {
        DataEntries::Technologies(entries) => {
            for entry in entries {
                assert_eq!(entry.values.len(), n, "{category}: {}", entry.technology_name);
            }
        }
        DataEntries::Emissions(entries) => {
            for emission in entries {
                for entry in &emission.data {
                    assert_eq!(
                        entry.values.len(),
                        n,
                        "{category}: {} / {}",
                        emission.emission_type,
                        entry.technology_name
                    );
                }
            }
        }
        DataEntries::Fuels(entries) => {
            for entry in entries {
                assert_eq!(entry.usage.len(), n, "{category}: {} usage", entry.fuel_name);
                assert_eq!(entry.power.len(), n, "{category}: {} power", entry.fuel_name);
            }
        }
    }
}

#[test]
fn every_category_extracts() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    for category in DataCategory::iter() {
        let response = report(&app, category);
        assert_eq!(response.years, YEAR_SAMPLE.to_vec(), "{category}");
        assert_year_aligned(category, &response);
    }
}

#[test]
fn repeated_extraction_is_identical() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let ctx = app.scenario(0).unwrap();

    for category in DataCategory::iter() {
        let first = serde_json::to_string(&report(&app, category)).unwrap();
        let second = serde_json::to_string(&report(&app, category)).unwrap();
        assert_eq!(first, second, "{category}");
    }

    for aggregate_type in AggregateType::iter() {
        let run = || {
            (
                serde_json::to_string(&aggregate_totals(ctx, aggregate_type)).unwrap(),
                serde_json::to_string(&aggregate_stacks(ctx, aggregate_type).unwrap()).unwrap(),
                serde_json::to_string(&aggregate_details(ctx, aggregate_type).unwrap()).unwrap(),
            )
        };
        assert_eq!(run(), run(), "{aggregate_type}");
    }

    let first = serde_json::to_string(&describe_scenario(ctx).unwrap()).unwrap();
    let second = serde_json::to_string(&describe_scenario(ctx).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn installed_power_hides_grid_connections() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let rows = technologies(&report(&app, DataCategory::InstalledPower));
    assert_eq!(rows.len(), 13);
    assert!(!labels(&rows).contains(&"GRID_CONN"));
    assert!(!labels(&rows).contains(&"KSE_SOURCE"));
    assert_eq!(values(&rows, "Pompa ciepła"), &[1.0, 2.0, 3.0]);
    assert_eq!(values(&rows, "SMALL_PV"), &[2.0, 2.0, 2.0]);
}

#[test]
fn production_excludes_thermal_technologies() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);

    let ee = technologies(&report(&app, DataCategory::EeProduction));
    assert_eq!(
        labels(&ee),
        vec![
            "Elektrociepłownia węglowa",
            "Elektrownia węglowa",
            "Farma paneli fotowoltaicznych",
            "Farma wiatrowa",
            "KSE_SOURCE",
            "SMALL_PV",
        ]
    );

    let heat = technologies(&report(&app, DataCategory::HeatProduction));
    assert_eq!(labels(&heat), vec!["Elektrociepłownia węglowa"]);
    assert_eq!(values(&heat, "Elektrociepłownia węglowa"), &[40.0; 3]);

    let cold = report(&app, DataCategory::ColdProduction);
    assert!(cold.data.is_empty());
    assert_eq!(cold.years, vec![0, 1, 2]);
}

#[test]
fn usage_adds_generator_demand_to_consumer_usage() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);

    let ee = technologies(&report(&app, DataCategory::EeUsage));
    assert_eq!(labels(&ee), vec!["SINGLE_FAMILY"]);
    assert_close(values(&ee, "SINGLE_FAMILY"), &[2100.0, 2110.0, 2520.0]);

    let heat = technologies(&report(&app, DataCategory::HeatUsage));
    assert_eq!(labels(&heat), vec!["MULTI_FAMILY", "SINGLE_FAMILY"]);
    assert_close(values(&heat, "MULTI_FAMILY"), &[10002.0; 3]);
    assert_close(values(&heat, "SINGLE_FAMILY"), &[20001.0, 22001.0, 24001.0]);
}

#[test]
fn heat_usage_is_not_reduced_by_thermo_generation() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let ctx = app.scenario(0).unwrap();
    let response = report(&app, DataCategory::HeatUsage);
    let factor = regroup_by_aggregate_type(
        &consumption_factor(ctx.engine.network(), &response.years, "HEAT").unwrap(),
    );
    let heat = technologies(&response);
    assert!(!heat.is_empty());
    for (label, usage) in &heat {
        let floor = factor.row(label).unwrap_or_else(|| panic!("{label} has no factor"));
        for (used, base) in usage.iter().zip(floor) {
            assert!(used >= base, "{label}: {usage:?} below {floor:?}");
        }
    }
}

#[test]
fn usage_without_demand_column_is_zero_per_aggregate_type() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let cold = technologies(&report(&app, DataCategory::ColdUsage));
    assert_eq!(labels(&cold), vec!["MULTI_FAMILY", "SINGLE_FAMILY"]);
    assert!(cold.iter().all(|(_, v)| v == &[0.0; 3]));
}

#[test]
fn fuel_usage_skips_virtual_fuel() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let response = report(&app, DataCategory::FuelUsage);
    let entries = fuels(&response);
    let names: Vec<_> = entries.iter().map(|e| e.fuel_name.as_str()).collect();
    assert_eq!(names, vec!["Biomasa", "Gaz", "Węgiel"]);

    assert_close(&entries[0].usage, &[30.0; 3]);
    assert_close(&entries[0].power, &[0.45; 3]);
    assert_close(&entries[1].usage, &[100.0, 110.0, 120.0]);
    assert_close(&entries[1].power, &[1.0, 1.1, 1.2]);
    assert_close(&entries[2].usage, &[140.0, 130.0, 120.0]);
    assert_close(&entries[2].power, &[3.5, 3.25, 3.0]);
}

#[test]
fn emissions_are_grouped_by_fuel() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let response = report(&app, DataCategory::Emissions);
    let entries = emissions(&response);
    assert_eq!(entries.len(), 2);

    let co2 = &entries[0];
    assert_eq!(co2.emission_type, "CO2");
    assert_eq!(co2.data.len(), 2);
    assert_eq!(co2.data[0].technology_name, "Gaz");
    assert_close(&co2.data[0].values, &[8.0; 3]);
    assert_eq!(co2.data[1].technology_name, "Węgiel");
    assert_close(&co2.data[1].values, &[304.0, 254.0, 204.0]);

    let pm10: Vec<_> = entries[1]
        .data
        .iter()
        .map(|e| e.technology_name.as_str())
        .collect();
    assert_eq!(pm10, vec!["Biomasa", "HEAT_PUMP", "Węgiel"]);
}

#[test]
fn transport_emissions_follow_year_sample() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let response = report(&app, DataCategory::TransportEmissions);
    let entries = emissions(&response);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].emission_type, "CO2");
    assert_eq!(entries[0].data[0].technology_name, "BUS");
    assert_eq!(entries[0].data[0].values, vec![10.0, 11.0, 12.0]);
}

#[test]
fn capex_appends_transport_rows() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);

    let capex = technologies(&report(&app, DataCategory::Capex));
    assert_eq!(
        labels(&capex),
        vec!["BOILER_GAS", "CHP_COAL", "HEAT_PUMP", "PV_FARM", "BUS", "TRAM"]
    );
    assert_eq!(values(&capex, "TRAM"), &[2.0, 4.0, 6.0]);

    let thermo = technologies(&report(&app, DataCategory::ThermoCapex));
    assert_eq!(labels(&thermo), vec!["BOILER_GAS", "HEAT_PUMP", "BUS", "TRAM"]);
    assert_eq!(values(&thermo, "HEAT_PUMP"), &[0.0, 30.0, 30.0]);

    let opex = technologies(&report(&app, DataCategory::Opex));
    assert_eq!(values(&opex, "CHP_COAL"), &[50.0; 3]);
    assert!(!labels(&opex).contains(&"BUS"));
}

#[test]
fn variable_cost_weights_fuel_usage_by_price() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let rows = technologies(&report(&app, DataCategory::VarCost));
    assert_close(values(&rows, "Kocioł na gaz ziemny"), &[200.0, 220.0, 240.0]);
    assert_close(values(&rows, "Kocioł na biomasę"), &[15.0; 3]);
    assert_close(values(&rows, "KSE_SOURCE"), &[0.0; 3]);
}

#[test]
fn ets_charges_generators_with_a_fee_scheme() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let rows = technologies(&report(&app, DataCategory::Ets));
    assert_eq!(
        labels(&rows),
        vec![
            "Elektrociepłownia węglowa",
            "Elektrownia węglowa",
            "Kocioł na gaz ziemny",
        ]
    );
    assert_close(values(&rows, "Elektrociepłownia węglowa"), &[1000.0, 2000.0, 3000.0]);
    assert_close(values(&rows, "Elektrownia węglowa"), &[2000.0, 3000.0, 3000.0]);
    assert_close(values(&rows, "Kocioł na gaz ziemny"), &[50.0, 100.0, 150.0]);
}

#[test]
fn ets_without_fee_schemes_is_empty() {
    let mut bundle = fixture_bundle();
    bundle.network.emission_fees.clear();
    let workspace = FixtureWorkspace::create_with(bundle).unwrap();
    let app = load(&workspace);
    let response = report(&app, DataCategory::Ets);
    assert!(response.data.is_empty());
    assert_eq!(response.years, vec![0, 1, 2]);
}

#[test]
fn total_costs_sum_each_category() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let rows = technologies(&report(&app, DataCategory::TotalCosts));
    assert_eq!(labels(&rows), vec!["capex", "opex", "var_cost", "ets"]);
    assert_close(values(&rows, "capex"), &[610.0, 50.0, 30.0]);
    assert_close(values(&rows, "opex"), &[58.0; 3]);
    assert_close(values(&rows, "var_cost"), &[355.0, 365.0, 375.0]);
    assert_close(values(&rows, "ets"), &[3050.0, 5100.0, 6150.0]);
}

#[test]
fn devices_count_new_consumers_per_technology() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let rows = technologies(&report(&app, DataCategory::AmountOfDevices));
    assert_eq!(rows.len(), 7);
    assert_close(values(&rows, "SMALL_PV"), &[0.0, 110.0, 120.0]);
    assert_close(values(&rows, "Kocioł na gaz ziemny"), &[0.0, 110.0, 120.0]);
    assert_close(values(&rows, "BATTERY_EE"), &[0.0, 110.0, 120.0]);
    assert_close(values(&rows, "Pompa ciepła"), &[0.0; 3]);
}

#[test]
fn scenario_description_totals_costs_and_co2() {
    let workspace = FixtureWorkspace::create().unwrap();
    let app = load(&workspace);
    let description = describe_scenario(app.scenario(0).unwrap()).unwrap();
    assert_eq!(description.id, 0);
    assert_eq!(description.name, "base");
    assert_eq!(description.description, "Scenariusz bazowy");
    assert!((description.total_capex - 690.0).abs() < 1e-6);
    assert!((description.total_opex - 174.0).abs() < 1e-6);
    assert!((description.total_varcost - 1095.0).abs() < 1e-6);
    assert!((description.total_cost - 16259.0).abs() < 1e-6);
    assert!((description.total_emission_co2 - 786.0).abs() < 1e-6);
    assert_eq!(description.analyze_time, 5);
    assert_eq!(description.analyze_step, 1);
}
