//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Energy network model describing a scenario's topology."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered `year index -> value` series.
pub type YearSeries = BTreeMap<u32, f64>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub energy_types: Vec<String>,
    #[serde(default)]
    pub constants: NetworkConstants,
    #[serde(default)]
    pub generators: IndexMap<String, Generator>,
    #[serde(default)]
    pub storages: IndexMap<String, Storage>,
    #[serde(default)]
    pub buses: IndexMap<String, Bus>,
    #[serde(default)]
    pub local_balancing_stacks: IndexMap<String, LocalBalancingStack>,
    #[serde(default)]
    pub aggregated_consumers: IndexMap<String, AggregatedConsumer>,
    #[serde(default)]
    pub fuels: IndexMap<String, Fuel>,
    #[serde(default)]
    pub emission_fees: IndexMap<String, EmissionFee>,
    #[serde(default)]
    pub generator_types: IndexMap<String, GeneratorType>,
    #[serde(default)]
    pub storage_types: IndexMap<String, StorageType>,
}

impl Network {
    pub fn generator(&self, name: &str) -> Option<&Generator> {
        self.generators.get(name)
    }

    pub fn bus(&self, name: &str) -> Option<&Bus> {
        self.buses.get(name)
    }

    /// Technology type of a generator or storage element.
    pub fn element_type(&self, element: &str) -> Option<&str> {
        self.generators
            .get(element)
            .map(|g| g.energy_source_type.as_str())
            .or_else(|| {
                self.storages
                    .get(element)
                    .map(|s| s.energy_source_type.as_str())
            })
    }

    /// Tags attached to a generator's technology type.
    pub fn generator_tags(&self, generator: &Generator) -> &[String] {
        self.generator_types
            .get(&generator.energy_source_type)
            .map(|t| t.tags.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConstants {
    pub n_years: u32,
    pub n_hours: u32,
}

impl Default for NetworkConstants {
    fn default() -> Self {
        Self {
            n_years: 1,
            n_hours: 8760,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    pub name: String,
    pub energy_source_type: String,
    #[serde(default)]
    pub buses: Vec<String>,
    /// Emission fee schemes the generator is subject to.
    #[serde(default)]
    pub emission_fee: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    pub name: String,
    pub energy_source_type: String,
    pub bus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bus {
    pub name: String,
    pub energy_type: String,
    #[serde(default)]
    pub generators: Vec<String>,
    #[serde(default)]
    pub storages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalBalancingStack {
    pub name: String,
    /// Buses grouped by the energy type they carry.
    #[serde(default)]
    pub buses: IndexMap<String, Vec<String>>,
}

impl LocalBalancingStack {
    pub fn all_buses(&self) -> impl Iterator<Item = &str> {
        self.buses.values().flatten().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedConsumer {
    pub name: String,
    #[serde(default)]
    pub available_stacks: Vec<String>,
    #[serde(default)]
    pub n_consumers: YearSeries,
    #[serde(default)]
    pub average_area: YearSeries,
    /// Per-consumer yearly usage keyed by energy type.
    #[serde(default)]
    pub yearly_energy_usage: IndexMap<String, YearSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fuel {
    pub name: String,
    pub energy_per_unit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionFee {
    pub name: String,
    pub emission_type: String,
    #[serde(default)]
    pub price: YearSeries,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorType {
    pub name: String,
    #[serde(default)]
    pub fuel: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageType {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
