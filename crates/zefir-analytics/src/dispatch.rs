//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Data category to extractor dispatch."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use tracing::debug;

use crate::context::ScenarioContext;
use crate::errors::Result;
use crate::metrics::{costs, emissions, power, production, usage};
use crate::params::DataCategory;
use crate::payload::DataResponse;

pub type Extractor = fn(&ScenarioContext) -> Result<DataResponse>;

impl DataCategory {
    pub fn extractor(self) -> Extractor {
        match self {
            DataCategory::InstalledPower => power::installed_power,
            DataCategory::EeProduction => production::ee_production,
            DataCategory::HeatProduction => production::heat_production,
            DataCategory::ColdProduction => production::cold_production,
            DataCategory::EeUsage => usage::ee_usage,
            DataCategory::HeatUsage => usage::heat_usage,
            DataCategory::ColdUsage => usage::cold_usage,
            DataCategory::AmountOfDevices => power::amount_of_devices,
            DataCategory::Emissions => emissions::emissions,
            DataCategory::TransportEmissions => emissions::transport_emissions,
            DataCategory::FuelUsage => emissions::fuel_usage,
            DataCategory::Capex => costs::capex,
            DataCategory::ThermoCapex => costs::thermo_capex,
            DataCategory::Opex => costs::opex,
            DataCategory::VarCost => costs::var_cost,
            DataCategory::Ets => costs::ets,
            DataCategory::TotalCosts => costs::total_costs,
        }
    }
}

pub fn get_data(ctx: &ScenarioContext, category: DataCategory) -> Result<DataResponse> {
    debug!(scenario = ctx.id, category = %category, "extracting report data");
    (category.extractor())(ctx)
}
