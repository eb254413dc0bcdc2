//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Closed enumerations accepted by the reporting endpoints."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Report families served by `get_data`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DataCategory {
    InstalledPower,
    EeProduction,
    HeatProduction,
    ColdProduction,
    EeUsage,
    HeatUsage,
    ColdUsage,
    AmountOfDevices,
    Emissions,
    TransportEmissions,
    FuelUsage,
    Capex,
    ThermoCapex,
    Opex,
    VarCost,
    Ets,
    TotalCosts,
}

/// Building classes of aggregated consumers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AggregateType {
    SingleFamily,
    MultiFamily,
    ShopService,
    Office,
    Other,
}

impl AggregateType {
    /// Aggregate names of this class start with this prefix.
    pub fn name_prefix(&self) -> String {
        self.as_ref().to_uppercase()
    }

    pub fn matches(&self, aggregate_name: &str) -> bool {
        aggregate_name.starts_with(&self.name_prefix())
    }
}

/// Consumption tiers encoded in aggregate names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConsumptionType {
    VeryHighConsumption,
    HighConsumption,
    AverageConsumption,
    LowConsumption,
}

impl ConsumptionType {
    pub fn marker(&self) -> &'static str {
        match self {
            ConsumptionType::VeryHighConsumption => "_EF",
            ConsumptionType::HighConsumption => "_D",
            ConsumptionType::AverageConsumption => "_C",
            ConsumptionType::LowConsumption => "_AB",
        }
    }

    pub fn matches(&self, aggregate_name: &str) -> bool {
        aggregate_name.contains(self.marker())
    }
}

/// Pre-rendered plot tables, one CSV each.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StaticPlotsFile {
    EeUsage,
    GasEnable,
    HeatEnable,
    HeatUsage,
    HeatedArea,
}

impl StaticPlotsFile {
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn categories_use_snake_case_wire_names() {
        assert_eq!(DataCategory::EeProduction.to_string(), "ee_production");
        assert_eq!(
            DataCategory::from_str("total_costs").unwrap(),
            DataCategory::TotalCosts
        );
        assert!(DataCategory::from_str("unknown").is_err());
        assert_eq!(DataCategory::iter().count(), 17);
    }

    #[test]
    fn aggregate_type_matches_by_prefix() {
        assert_eq!(AggregateType::SingleFamily.name_prefix(), "SINGLE_FAMILY");
        assert!(AggregateType::SingleFamily.matches("SINGLE_FAMILY_EF"));
        assert!(!AggregateType::SingleFamily.matches("MULTI_FAMILY_EF"));
        assert!(AggregateType::ShopService.matches("SHOP_SERVICE_C"));
    }

    #[test]
    fn consumption_tiers_match_by_marker() {
        assert!(ConsumptionType::VeryHighConsumption.matches("SINGLE_FAMILY_EF"));
        assert!(ConsumptionType::LowConsumption.matches("SINGLE_FAMILY_AB"));
        assert!(!ConsumptionType::HighConsumption.matches("SINGLE_FAMILY_AB"));
    }

    #[test]
    fn static_plot_files_are_csv() {
        assert_eq!(StaticPlotsFile::HeatedArea.file_name(), "heated_area.csv");
    }
}
