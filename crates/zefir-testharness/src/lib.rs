//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "01-bootstrap"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Fixture scenario and resource tree for reporting tests."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! One small district, `Testowo`, with a single scenario `base` over years
//! 0..=2. The network holds a national grid bus, a district heating bus and
//! four local balancing stacks serving three aggregated consumers. Every
//! resource the API reads is written below a temporary directory by
//! [`FixtureWorkspace::create`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde_json::json;
use tempfile::TempDir;
use tracing::debug;
use zefir_common::{AppConfig, PathsConfig};
use zefir_engine::io::{write_scenario_bundle, ScenarioBundle};
use zefir_engine::model::{
    AggregatedConsumer, Bus, EmissionFee, Fuel, Generator, GeneratorType, LocalBalancingStack,
    Network, NetworkConstants, Storage, StorageType, YearSeries,
};
use zefir_engine::results::{
    LbsCapacity, Level, ResultRow, ResultTable, SourceMetric, StoredResults,
};

pub const AREA_NAME: &str = "Testowo";
pub const SCENARIO_NAME: &str = "base";
/// Listed in the area mapping without a bundle on disk.
pub const MISSING_SCENARIO_NAME: &str = "missing";
pub const YEAR_SAMPLE: [u32; 3] = [0, 1, 2];
pub const N_YEARS: u32 = 5;

/// Series over years `0..values.len()`.
pub fn series(values: &[f64]) -> YearSeries {
    values
        .iter()
        .enumerate()
        .map(|(year, value)| (year as u32, *value))
        .collect()
}

/// Same value over the first `n` years.
pub fn constant(value: f64, n: u32) -> YearSeries {
    (0..n).map(|year| (year, value)).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

const GENERATOR_TYPES: &[(&str, Option<&str>, &[&str])] = &[
    ("PV_FARM", None, &["PV"]),
    ("SMALL_PV", None, &["PV"]),
    ("WIND_FARM", None, &["WIND"]),
    ("BOILER_GAS", Some("GAS"), &["BOILER", "thermo"]),
    ("BOILER_COAL_OLD", Some("COAL"), &["BOILER", "thermo"]),
    ("HEAT_PUMP", None, &["HP", "thermo"]),
    ("CHP_COAL", Some("COAL"), &["CHP"]),
    ("PP_COAL", Some("COAL"), &["PP"]),
    ("BIOMASS_BOILER", Some("BIOMASS"), &["BOILER", "thermo"]),
    ("GRID_CONN", None, &["KSE_CONN"]),
    ("KSE_SOURCE", Some("KSE_VIRTUAL_FUEL"), &["KSE"]),
];

const STORAGE_TYPES: &[(&str, &str)] = &[
    ("BATTERY_EE", "STORAGE_EE"),
    ("SMALL_HEAT_STORAGE", "STORAGE_HEAT"),
    ("BIG_HEAT_STORAGE", "STORAGE_HEAT"),
    ("BIG_BATTERY", "STORAGE_EE"),
];

const GENERATORS: &[(&str, &str, &[&str], &[&str])] = &[
    ("pv_farm", "PV_FARM", &["kse_ee"], &[]),
    ("wind_farm", "WIND_FARM", &["kse_ee"], &[]),
    ("pp_coal", "PP_COAL", &["kse_ee"], &["ETS_CO2"]),
    ("kse_source", "KSE_SOURCE", &["kse_ee"], &[]),
    ("chp_coal", "CHP_COAL", &["kse_ee", "dh_heat"], &["ETS_CO2"]),
    ("dh_biomass", "BIOMASS_BOILER", &["dh_heat"], &[]),
    ("sf_pv", "SMALL_PV", &["sf_gas_ee"], &[]),
    ("sf_gas_boiler", "BOILER_GAS", &["sf_gas_heat"], &[]),
    ("sf_hp", "HEAT_PUMP", &["sf_hp_ee", "sf_hp_heat"], &[]),
    ("sf_hp_grid", "GRID_CONN", &["sf_hp_ee"], &[]),
    ("sf_coal_boiler", "BOILER_COAL_OLD", &["sf_coal_heat"], &[]),
    ("mf_gas_boiler", "BOILER_GAS", &["mf_heat"], &["ETS_CO2"]),
];

const STORAGES: &[(&str, &str, &str)] = &[
    ("sf_battery", "BATTERY_EE", "sf_gas_ee"),
    ("sf_hp_storage", "SMALL_HEAT_STORAGE", "sf_hp_heat"),
    ("mf_battery", "BIG_BATTERY", "mf_ee"),
    ("dh_storage", "BIG_HEAT_STORAGE", "dh_heat"),
];

const BUSES: &[(&str, &str)] = &[
    ("kse_ee", "EE"),
    ("dh_heat", "HEAT"),
    ("sf_gas_ee", "EE"),
    ("sf_gas_heat", "HEAT"),
    ("sf_hp_ee", "EE"),
    ("sf_hp_heat", "HEAT"),
    ("sf_coal_ee", "EE"),
    ("sf_coal_heat", "HEAT"),
    ("mf_ee", "EE"),
    ("mf_heat", "HEAT"),
];

const STACKS: &[(&str, &str, &str)] = &[
    ("SF_GAS", "sf_gas_ee", "sf_gas_heat"),
    ("SF_HP", "sf_hp_ee", "sf_hp_heat"),
    ("SF_COAL", "sf_coal_ee", "sf_coal_heat"),
    ("MF_GAS", "mf_ee", "mf_heat"),
];

fn aggregate(
    name: &str,
    stacks: &[&str],
    n_consumers: YearSeries,
    area: f64,
    usage: &[(&str, f64)],
) -> AggregatedConsumer {
    AggregatedConsumer {
        name: name.to_owned(),
        available_stacks: strings(stacks),
        n_consumers,
        average_area: constant(area, N_YEARS),
        yearly_energy_usage: usage
            .iter()
            .map(|(energy_type, value)| ((*energy_type).to_owned(), constant(*value, N_YEARS)))
            .collect(),
    }
}

/// Network of the `base` scenario.
pub fn fixture_network() -> Network {
    let mut network = Network {
        energy_types: strings(&["EE", "HEAT"]),
        constants: NetworkConstants {
            n_years: N_YEARS,
            n_hours: 8760,
        },
        ..Network::default()
    };

    for (name, fuel, tags) in GENERATOR_TYPES {
        network.generator_types.insert(
            (*name).to_owned(),
            GeneratorType {
                name: (*name).to_owned(),
                fuel: fuel.map(str::to_owned),
                tags: strings(tags),
            },
        );
    }
    for (name, tag) in STORAGE_TYPES {
        network.storage_types.insert(
            (*name).to_owned(),
            StorageType {
                name: (*name).to_owned(),
                tags: vec![(*tag).to_owned()],
            },
        );
    }

    for (name, energy_type) in BUSES {
        network.buses.insert(
            (*name).to_owned(),
            Bus {
                name: (*name).to_owned(),
                energy_type: (*energy_type).to_owned(),
                generators: Vec::new(),
                storages: Vec::new(),
            },
        );
    }
    for (name, energy_source_type, buses, fees) in GENERATORS {
        for bus in *buses {
            if let Some(bus) = network.buses.get_mut(*bus) {
                bus.generators.push((*name).to_owned());
            }
        }
        network.generators.insert(
            (*name).to_owned(),
            Generator {
                name: (*name).to_owned(),
                energy_source_type: (*energy_source_type).to_owned(),
                buses: strings(buses),
                emission_fee: strings(fees),
            },
        );
    }
    for (name, energy_source_type, bus) in STORAGES {
        if let Some(bus) = network.buses.get_mut(*bus) {
            bus.storages.push((*name).to_owned());
        }
        network.storages.insert(
            (*name).to_owned(),
            Storage {
                name: (*name).to_owned(),
                energy_source_type: (*energy_source_type).to_owned(),
                bus: (*bus).to_owned(),
            },
        );
    }

    for (name, ee_bus, heat_bus) in STACKS {
        network.local_balancing_stacks.insert(
            (*name).to_owned(),
            LocalBalancingStack {
                name: (*name).to_owned(),
                buses: [
                    ("EE".to_owned(), vec![(*ee_bus).to_owned()]),
                    ("HEAT".to_owned(), vec![(*heat_bus).to_owned()]),
                ]
                .into_iter()
                .collect(),
            },
        );
    }

    for consumer in [
        aggregate(
            "SINGLE_FAMILY_EF",
            &["SF_GAS", "SF_COAL"],
            series(&[1000.0, 1100.0, 1200.0, 1300.0, 1400.0]),
            100.0,
            &[("EE", 3.0), ("HEAT", 20.0)],
        ),
        aggregate(
            "SINGLE_FAMILY_AB",
            &["SF_HP"],
            series(&[500.0, 500.0, 600.0, 600.0, 600.0]),
            150.0,
            &[("EE", 4.0), ("HEAT", 15.0)],
        ),
        aggregate(
            "MULTI_FAMILY_C",
            &["MF_GAS"],
            constant(50.0, N_YEARS),
            1200.0,
            &[("EE", 30.0), ("HEAT", 200.0)],
        ),
    ] {
        network
            .aggregated_consumers
            .insert(consumer.name.clone(), consumer);
    }

    for (name, energy_per_unit) in [
        ("GAS", 0.01),
        ("COAL", 0.025),
        ("BIOMASS", 0.015),
        ("KSE_VIRTUAL_FUEL", 1.0),
    ] {
        network.fuels.insert(
            name.to_owned(),
            Fuel {
                name: name.to_owned(),
                energy_per_unit,
            },
        );
    }

    network.emission_fees.insert(
        "ETS_CO2".to_owned(),
        EmissionFee {
            name: "ETS_CO2".to_owned(),
            emission_type: "CO2".to_owned(),
            price: series(&[10.0, 20.0, 30.0, 40.0, 50.0]),
        },
    );
    network
}

/// `(row name, per-column values over the year sample)`; `None` cells are
/// left empty in every year.
type TableRows<'a> = &'a [(&'a str, &'a [Option<[f64; 3]>])];

fn table(columns: &[&str], rows: TableRows<'_>) -> ResultTable {
    let mut table = ResultTable::new(columns.iter().copied());
    for (name, cells) in rows {
        for (pos, year) in YEAR_SAMPLE.iter().enumerate() {
            table.rows.push(ResultRow {
                name: (*name).to_owned(),
                year: *year,
                values: cells.iter().map(|cell| cell.map(|v| v[pos])).collect(),
            });
        }
    }
    table
}

fn flat(value: f64) -> Option<[f64; 3]> {
    Some([value, value, value])
}

fn stack_fractions(pairs: &[(&str, [f64; 3])]) -> IndexMap<String, YearSeries> {
    pairs
        .iter()
        .map(|(stack, values)| ((*stack).to_owned(), series(values)))
        .collect()
}

fn capacities(pairs: &[(&str, [f64; 3])]) -> LbsCapacity {
    stack_fractions(pairs)
}

/// Stored results of the `base` scenario.
pub fn fixture_results() -> StoredResults {
    let mut results = StoredResults::default();

    results.insert_table(
        SourceMetric::InstalledCapacity,
        Level::Type,
        table(
            &["Capacity"],
            &[
                ("PV_FARM", &[Some([10.0, 12.0, 14.0])]),
                ("SMALL_PV", &[flat(2.0)]),
                ("WIND_FARM", &[flat(25.0)]),
                ("BOILER_GAS", &[Some([15.0, 15.0, 16.0])]),
                ("BOILER_COAL_OLD", &[Some([8.0, 6.0, 4.0])]),
                ("HEAT_PUMP", &[Some([1.0, 2.0, 3.0])]),
                ("CHP_COAL", &[flat(60.0)]),
                ("PP_COAL", &[flat(120.0)]),
                ("BIOMASS_BOILER", &[flat(12.0)]),
                ("GRID_CONN", &[flat(500.0)]),
                ("KSE_SOURCE", &[flat(1000.0)]),
                ("BATTERY_EE", &[Some([0.0, 1.0, 1.0])]),
                ("SMALL_HEAT_STORAGE", &[Some([0.0, 0.0, 0.5])]),
                ("BIG_HEAT_STORAGE", &[flat(40.0)]),
                ("BIG_BATTERY", &[flat(0.0)]),
            ],
        ),
    );

    results.insert_table(
        SourceMetric::GenerationSum,
        Level::Type,
        table(
            &["EE", "HEAT"],
            &[
                ("PV_FARM", &[Some([10.0, 12.0, 14.0]), None]),
                ("SMALL_PV", &[flat(1.0), None]),
                ("WIND_FARM", &[flat(20.0), None]),
                ("CHP_COAL", &[flat(50.0), flat(40.0)]),
                ("PP_COAL", &[Some([80.0, 70.0, 60.0]), None]),
                ("KSE_SOURCE", &[flat(5.0), None]),
                ("BOILER_GAS", &[None, Some([30.0, 33.0, 36.0])]),
                ("BOILER_COAL_OLD", &[None, flat(10.0)]),
                ("HEAT_PUMP", &[None, Some([6.0, 7.0, 8.0])]),
                ("BIOMASS_BOILER", &[None, flat(9.0)]),
            ],
        ),
    );

    // sf_gas_boiler has no EE bus and resolves to no aggregate.
    results.insert_table(
        SourceMetric::GenerationDemand,
        Level::Element,
        table(
            &["EE", "HEAT"],
            &[
                ("sf_hp", &[Some([100.0, 110.0, 120.0]), None]),
                ("sf_gas_boiler", &[flat(5.0), None]),
                ("sf_coal_boiler", &[None, flat(1.0)]),
                ("mf_gas_boiler", &[None, flat(2.0)]),
            ],
        ),
    );

    results.insert_table(
        SourceMetric::FuelUsage,
        Level::Type,
        table(
            &["GAS", "COAL", "BIOMASS", "KSE_VIRTUAL_FUEL"],
            &[
                ("BOILER_GAS", &[Some([100.0, 110.0, 120.0]), None, None, None]),
                ("BOILER_COAL_OLD", &[None, flat(10.0), None, None]),
                ("CHP_COAL", &[None, flat(50.0), None, None]),
                ("PP_COAL", &[None, Some([80.0, 70.0, 60.0]), None, None]),
                ("BIOMASS_BOILER", &[None, None, flat(30.0), None]),
                ("KSE_SOURCE", &[None, None, None, flat(999.0)]),
            ],
        ),
    );

    results.insert_table(
        SourceMetric::FuelCost,
        Level::Type,
        table(
            &["GAS", "COAL", "BIOMASS"],
            &[
                ("BOILER_GAS", &[flat(2.0), None, None]),
                ("BOILER_COAL_OLD", &[None, flat(1.0), None]),
                ("CHP_COAL", &[None, flat(1.0), None]),
                ("PP_COAL", &[None, flat(1.0), None]),
                ("BIOMASS_BOILER", &[None, None, flat(0.5)]),
            ],
        ),
    );

    results.insert_table(
        SourceMetric::CapexOpex,
        Level::Type,
        table(
            &["capex", "opex"],
            &[
                ("PV_FARM", &[Some([100.0, 0.0, 0.0]), flat(5.0)]),
                ("BOILER_GAS", &[Some([10.0, 20.0, 0.0]), flat(1.0)]),
                ("HEAT_PUMP", &[Some([0.0, 30.0, 30.0]), flat(2.0)]),
                ("CHP_COAL", &[Some([500.0, 0.0, 0.0]), flat(50.0)]),
            ],
        ),
    );

    results.insert_table(
        SourceMetric::Emission,
        Level::Type,
        table(
            &["CO2", "PM10"],
            &[
                ("BOILER_GAS", &[flat(8.0), None]),
                ("BOILER_COAL_OLD", &[flat(4.0), flat(0.5)]),
                ("CHP_COAL", &[flat(100.0), None]),
                ("PP_COAL", &[Some([200.0, 150.0, 100.0]), None]),
                ("BIOMASS_BOILER", &[None, flat(0.2)]),
                ("HEAT_PUMP", &[None, flat(0.1)]),
            ],
        ),
    );

    results.insert_table(
        SourceMetric::Emission,
        Level::Element,
        table(
            &["CO2", "PM10"],
            &[
                ("chp_coal", &[flat(100.0), None]),
                ("pp_coal", &[Some([200.0, 150.0, 100.0]), None]),
                ("mf_gas_boiler", &[flat(5.0), None]),
                ("sf_gas_boiler", &[flat(3.0), None]),
                ("sf_coal_boiler", &[flat(4.0), flat(0.5)]),
                ("dh_biomass", &[None, flat(0.2)]),
                ("sf_hp", &[None, flat(0.1)]),
            ],
        ),
    );

    results.fractions = [
        (
            "SINGLE_FAMILY_EF",
            stack_fractions(&[("SF_GAS", [0.5, 0.6, 0.7]), ("SF_COAL", [0.5, 0.4, 0.3])]),
        ),
        ("SINGLE_FAMILY_AB", stack_fractions(&[("SF_HP", [1.0; 3])])),
        ("MULTI_FAMILY_C", stack_fractions(&[("MF_GAS", [1.0; 3])])),
    ]
    .into_iter()
    .map(|(aggregate, fractions)| (aggregate.to_owned(), fractions))
    .collect();

    results.n_consumers = [
        ("SINGLE_FAMILY_EF", series(&[1000.0, 1100.0, 1200.0])),
        ("SINGLE_FAMILY_AB", series(&[500.0, 500.0, 600.0])),
        ("MULTI_FAMILY_C", series(&[50.0, 50.0, 50.0])),
    ]
    .into_iter()
    .map(|(aggregate, counts)| (aggregate.to_owned(), counts))
    .collect();

    results.lbs_capacity = [
        (
            "SF_GAS",
            capacities(&[
                ("sf_pv", [5.0; 3]),
                ("sf_gas_boiler", [10.0; 3]),
                ("sf_battery", [0.0, 2.0, 2.0]),
            ]),
        ),
        ("SF_COAL", capacities(&[("sf_coal_boiler", [10.0; 3])])),
        (
            "SF_HP",
            capacities(&[("sf_hp", [8.0; 3]), ("sf_hp_storage", [0.0, 0.0, 1.0])]),
        ),
        (
            "MF_GAS",
            capacities(&[("mf_gas_boiler", [100.0; 3]), ("mf_battery", [0.0; 3])]),
        ),
    ]
    .into_iter()
    .map(|(stack, capacity)| (stack.to_owned(), capacity))
    .collect();

    results
}

pub fn fixture_bundle() -> ScenarioBundle {
    ScenarioBundle {
        scenario_name: SCENARIO_NAME.to_owned(),
        year_sample: YEAR_SAMPLE.to_vec(),
        network: fixture_network(),
        results: fixture_results(),
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("unable to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("unable to write {}", path.display()))
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    write_file(path, serde_json::to_string_pretty(value)?)
}

fn write_translations(paths: &PathsConfig) -> Result<()> {
    let translation = &paths.translation;
    write_json(
        &translation.names,
        &json!({
            "BOILER_GAS": "Kocioł na gaz ziemny",
            "BOILER_COAL_OLD": "Kocioł starego typu na węgiel",
            "PV_FARM": "Farma paneli fotowoltaicznych",
            "BIG_HEAT_STORAGE": "Magazyn ciepła bardzo duży",
            "HEAT_PUMP": "Pompa ciepła",
            "CHP_COAL": "Elektrociepłownia węglowa",
            "PP_COAL": "Elektrownia węglowa",
            "WIND_FARM": "Farma wiatrowa",
            "BIOMASS_BOILER": "Kocioł na biomasę",
            "SMALL_HEAT_STORAGE": "Magazyn ciepła mały"
        }),
    )?;
    write_json(
        &translation.tags,
        &json!({
            "PV": "Fotowoltaika",
            "WIND": "Wiatr",
            "BOILER": "Kotły",
            "HP": "Pompy ciepła",
            "CHP": "Kogeneracja",
            "PP": "Elektrownie",
            "STORAGE_EE": "Magazyny energii",
            "STORAGE_HEAT": "Magazyny ciepła"
        }),
    )?;
    write_json(
        &translation.fuels,
        &json!({"GAS": "Gaz", "COAL": "Węgiel", "BIOMASS": "Biomasa"}),
    )?;
    write_json(
        &translation.lbs,
        &json!({
            "SF_GAS": "LBS SF z gazem",
            "SF_HP": "LBS SF z pompą ciepła",
            "SF_COAL": "LBS SF z węglem",
            "MF_GAS": "LBS MF z gazem"
        }),
    )?;
    write_json(
        &translation.energy,
        &json!({"EE": "Energia elektryczna", "HEAT": "Ciepło"}),
    )
}

const STATIC_PLOT_ROWS: &str = "SINGLE_FAMILY,1.5,1.2\nMULTI_FAMILY,3.0,2.8\n";

fn write_static_data(paths: &PathsConfig) -> Result<()> {
    for file in ["ee_usage", "gas_enable", "heat_enable", "heat_usage"] {
        write_file(
            &paths.static_plots.join(format!("{file}.csv")),
            format!("name,2020,2030\n{STATIC_PLOT_ROWS}"),
        )?;
    }
    write_file(
        &paths.static_plots.join("heated_area.csv"),
        "name,2020,2030\nMULTI_FAMILY,40.0,42.0\nSINGLE_FAMILY,20.0,21.0\n",
    )?;
    for aggregate_type in ["single_family", "multi_family", "shop_service", "office", "other"] {
        write_file(
            &paths
                .static_aggregate_data
                .join(format!("{aggregate_type}.csv")),
            "aggr_type,heat_usage,ee_usage,cold_usage\n\
             very_high_consumption,200,30,0\n\
             low_consumption,50,20,1.5\n",
        )?;
    }
    Ok(())
}

fn write_map_layers(paths: &PathsConfig) -> Result<()> {
    write_file(
        &paths.polygons,
        "id,coordinates,buildingType,heatType\n\
         1,\"[[[1,1],[2,1],[2,2],[1,2],[1,1]]]\",SINGLE_FAMILY,GAS\n\
         2,\"[[[9,9],[12,9],[12,12],[9,12],[9,9]]]\",MULTI_FAMILY,DH\n\
         3,\"[[[21,1],[22,1],[22,2],[21,2],[21,1]]]\",OFFICE,HP\n",
    )?;
    write_file(
        &paths.points,
        "id,coordinates,buildingType,heatType,boilerEmission,CO2,CO,SOX,NOX,Benzoapiren,PM10,PM25\n\
         10,\"[1.5,1.5]\",SINGLE_FAMILY,COAL,high,12.5,0.4,0.1,0.2,0.001,0.3,0.2\n\
         11,\"[21.5,1.5]\",OFFICE,GAS,low,4.0,0.1,0.0,0.1,0.0,0.05,0.04\n",
    )
}

fn write_transport(paths: &PathsConfig) -> Result<()> {
    let dir = paths.transport.join(SCENARIO_NAME);
    write_file(
        &dir.join("capex.csv"),
        "Year,BUS,TRAM\n0,1,2\n1,3,4\n2,5,6\n3,7,8\n",
    )?;
    write_file(
        &dir.join("emission_CO2.csv"),
        "Year,BUS,TRAM\n0,10,20\n1,11,21\n2,12,22\n3,13,23\n",
    )
}

/// Resource tree of the fixture below a temporary directory.
pub struct FixtureWorkspace {
    dir: TempDir,
    config: AppConfig,
}

impl FixtureWorkspace {
    pub fn create() -> Result<Self> {
        Self::create_with(fixture_bundle())
    }

    /// Write every resource, storing `bundle` as the `base` scenario.
    pub fn create_with(bundle: ScenarioBundle) -> Result<Self> {
        let dir = tempfile::tempdir().context("unable to create fixture directory")?;
        let paths = PathsConfig::under(dir.path());

        write_translations(&paths)?;
        write_file(
            &paths.fuel_units,
            r#"{"GAS": "m3", "COAL": "t", "BIOMASS": "kg"}"#,
        )?;
        let mut mapping = serde_json::Map::new();
        mapping.insert(
            AREA_NAME.to_owned(),
            json!([
                {"scenario_name": SCENARIO_NAME, "description": "Scenariusz bazowy"},
                {"scenario_name": MISSING_SCENARIO_NAME, "description": "Brak wyników"}
            ]),
        );
        write_json(&paths.area_mapping, &serde_json::Value::Object(mapping))?;

        let bundle_path = paths
            .scenario_bundle_candidates(AREA_NAME, SCENARIO_NAME)
            .into_iter()
            .next()
            .context("no scenario bundle location")?;
        if let Some(parent) = bundle_path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_scenario_bundle(&bundle_path, &bundle)?;

        write_static_data(&paths)?;
        write_map_layers(&paths)?;
        write_transport(&paths)?;

        let mut config = AppConfig {
            paths,
            ..AppConfig::default()
        };
        config.logging.directory = dir.path().join("logs");
        debug!(root = %dir.path().display(), "fixture workspace written");
        Ok(Self { dir, config })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buses_list_their_elements() {
        let network = fixture_network();
        assert_eq!(network.buses["sf_hp_ee"].generators, vec!["sf_hp", "sf_hp_grid"]);
        assert_eq!(network.buses["dh_heat"].storages, vec!["dh_storage"]);
        assert_eq!(network.element_type("sf_battery"), Some("BATTERY_EE"));
    }

    #[test]
    fn results_tables_are_consistent() {
        let results = fixture_results();
        results.validate().unwrap();
        assert_eq!(results.lbs_capacity.len(), 4);
    }

    #[test]
    fn workspace_holds_every_required_resource() {
        let workspace = FixtureWorkspace::create().unwrap();
        assert!(workspace.config().paths.missing_resources().is_empty());
        assert!(workspace
            .path()
            .join("areas/Testowo/results/base.json")
            .is_file());
    }
}
