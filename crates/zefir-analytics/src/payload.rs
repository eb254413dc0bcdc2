//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Client-facing response shapes."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::frame::YearFrame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyEntry {
    pub technology_name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionEntry {
    pub emission_type: String,
    pub data: Vec<TechnologyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelEntry {
    pub fuel_name: String,
    pub usage: Vec<f64>,
    pub power: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataEntries {
    Technologies(Vec<TechnologyEntry>),
    Emissions(Vec<EmissionEntry>),
    Fuels(Vec<FuelEntry>),
}

impl DataEntries {
    pub fn len(&self) -> usize {
        match self {
            DataEntries::Technologies(entries) => entries.len(),
            DataEntries::Emissions(entries) => entries.len(),
            DataEntries::Fuels(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Year axis plus entries whose value lists follow that axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse {
    pub years: Vec<u32>,
    pub data: DataEntries,
}

fn technology_entries(frame: &YearFrame) -> Vec<TechnologyEntry> {
    frame
        .rows()
        .map(|(label, values)| TechnologyEntry {
            technology_name: label.to_owned(),
            values: values.to_vec(),
        })
        .collect()
}

impl DataResponse {
    pub fn from_frame(frame: &YearFrame) -> Self {
        Self {
            years: frame.years().to_vec(),
            data: DataEntries::Technologies(technology_entries(frame)),
        }
    }

    /// One entry per emission type; all frames are expected on `years`.
    pub fn from_emissions(years: Vec<u32>, frames: &IndexMap<String, YearFrame>) -> Self {
        let entries = frames
            .iter()
            .map(|(emission_type, frame)| EmissionEntry {
                emission_type: emission_type.clone(),
                data: technology_entries(frame),
            })
            .collect();
        Self {
            years,
            data: DataEntries::Emissions(entries),
        }
    }

    pub fn from_fuels(years: Vec<u32>, fuels: Vec<FuelEntry>) -> Self {
        Self {
            years,
            data: DataEntries::Fuels(fuels),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearsResponse {
    pub years: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagsResponse {
    pub tags: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelUnitEntry {
    pub fuel_name: String,
    pub fuel_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTotals {
    pub total_usable_area: Vec<f64>,
    pub total_amount_of_buildings: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackInfo {
    pub stack_name: String,
    pub techs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaData {
    pub stack_name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsagePerBuilding {
    pub energy_type: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateDetail {
    pub name: String,
    pub area: Vec<AreaData>,
    pub energy_per_building: Vec<UsagePerBuilding>,
    pub agg_area: Vec<f64>,
    pub agg_amount_of_building: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticPlotSeries {
    pub name: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticPlotsResponse {
    pub labels: Vec<String>,
    pub heat_usage: Vec<StaticPlotSeries>,
    pub heated_area: Vec<StaticPlotSeries>,
    pub gas_enable: Vec<StaticPlotSeries>,
    pub heat_enable: Vec<StaticPlotSeries>,
    pub ee_usage: Vec<StaticPlotSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticConsumptionData {
    pub heat_usage: f64,
    pub ee_usage: f64,
    pub cold_usage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticAggregateDetail {
    pub consumption_type: String,
    pub data: StaticConsumptionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticAggregateResponse {
    pub aggr_type: String,
    pub data: Vec<StaticAggregateDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDescription {
    pub id: usize,
    pub name: String,
    pub total_cost: f64,
    pub total_capex: f64,
    pub total_opex: f64,
    pub total_varcost: f64,
    #[serde(rename = "total_emission_CO2")]
    pub total_emission_co2: f64,
    pub date: DateTime<Utc>,
    pub description: String,
    pub analyze_time: u32,
    pub analyze_step: u32,
}
