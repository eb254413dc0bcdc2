//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Emissions per fuel, fuel usage and transport emissions."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use indexmap::IndexMap;
use zefir_engine::results::{Level, SourceMetric};

use super::source_table;
use crate::context::ScenarioContext;
use crate::errors::{AnalyticsError, Result};
use crate::frame::YearFrame;
use crate::payload::{DataResponse, FuelEntry};
use crate::reshape::flatten_on_axis;

/// Emissions per emission type, keyed by translated fuel.
///
/// Technology types are relabelled to their fuel; types without a fuel keep
/// their own name.
pub fn emission_frames(ctx: &ScenarioContext) -> Result<(Vec<u32>, IndexMap<String, YearFrame>)> {
    let network = ctx.engine.network();
    let table = source_table(ctx, SourceMetric::Emission, Level::Type)?;
    let years = table.years();
    let mut frames = IndexMap::new();
    for emission_type in &table.columns {
        let by_type = flatten_on_axis(&table, emission_type, &years)?;
        let by_fuel = by_type.relabel_with(|technology| {
            let fuel = network
                .generator_types
                .get(technology)
                .and_then(|ty| ty.fuel.as_deref())
                .unwrap_or(technology);
            Some(fuel.to_owned())
        });
        frames.insert(
            emission_type.clone(),
            by_fuel.translate_and_merge(ctx.translator.fuels()),
        );
    }
    Ok((years, frames))
}

pub fn emissions(ctx: &ScenarioContext) -> Result<DataResponse> {
    let (years, frames) = emission_frames(ctx)?;
    Ok(DataResponse::from_emissions(years, &frames))
}

/// Usage and energy content per translated fuel, the virtual fuel excluded.
pub fn fuel_entries(ctx: &ScenarioContext) -> Result<(Vec<u32>, Vec<FuelEntry>)> {
    let network = ctx.engine.network();
    let table = source_table(ctx, SourceMetric::FuelUsage, Level::Type)?;
    let table = table.without_column(&ctx.settings.fuels.virtual_fuel);
    let years = table.years();

    let mut merged: IndexMap<String, FuelEntry> = IndexMap::new();
    for fuel in &table.columns {
        let energy_per_unit = network
            .fuels
            .get(fuel)
            .map(|f| f.energy_per_unit)
            .ok_or_else(|| AnalyticsError::UnknownFuel(fuel.clone()))?;
        let usage = flatten_on_axis(&table, fuel, &years)?.column_sums();
        let power: Vec<f64> = usage.iter().map(|u| u * energy_per_unit).collect();
        let name = ctx.translator.fuel(fuel).to_owned();
        match merged.get_mut(&name) {
            Some(entry) => {
                entry.usage.iter_mut().zip(&usage).for_each(|(a, b)| *a += b);
                entry.power.iter_mut().zip(&power).for_each(|(a, b)| *a += b);
            }
            None => {
                merged.insert(
                    name.clone(),
                    FuelEntry {
                        fuel_name: name,
                        usage,
                        power,
                    },
                );
            }
        }
    }
    merged.sort_keys();
    Ok((years, merged.into_values().collect()))
}

pub fn fuel_usage(ctx: &ScenarioContext) -> Result<DataResponse> {
    let (years, entries) = fuel_entries(ctx)?;
    Ok(DataResponse::from_fuels(years, entries))
}

/// Transport emissions on the scenario year sample.
pub fn transport_emissions(ctx: &ScenarioContext) -> Result<DataResponse> {
    let years = ctx.engine.year_sample().to_vec();
    let mut frames = IndexMap::new();
    if let Some(transport) = &ctx.transport {
        for (emission_type, frame) in &transport.emissions {
            frames.insert(emission_type.clone(), frame.restrict_years(&years)?);
        }
    }
    Ok(DataResponse::from_emissions(years, &frames))
}
