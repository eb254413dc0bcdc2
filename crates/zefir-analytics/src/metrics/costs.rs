//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Capex, opex, variable cost, ETS fees and cost totals."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::collections::{BTreeMap, BTreeSet};

use zefir_engine::results::{Level, SourceMetric};

use super::source_table;
use crate::context::ScenarioContext;
use crate::errors::{Result, TopologyError};
use crate::frame::{series_on, YearFrame};
use crate::payload::DataResponse;
use crate::reshape::{flatten_on_axis, flatten_two_level_index, weighted_row_sums};
use crate::topology::technology_types_with_tag;

const CAPEX: &str = "capex";
const OPEX: &str = "opex";

fn capex_opex_frame(ctx: &ScenarioContext, column: &str) -> Result<YearFrame> {
    let table = source_table(ctx, SourceMetric::CapexOpex, Level::Type)?;
    flatten_two_level_index(&table, column)
}

/// Append transport capex rows on the frame's years.
fn with_transport_capex(ctx: &ScenarioContext, mut frame: YearFrame) -> Result<YearFrame> {
    let Some(capex) = ctx.transport.as_ref().and_then(|t| t.capex.as_ref()) else {
        return Ok(frame);
    };
    let transport = capex.restrict_years(frame.years())?;
    for (technology, values) in transport.rows() {
        frame.accumulate_row(technology, values)?;
    }
    Ok(frame)
}

pub fn capex_frame(ctx: &ScenarioContext, thermo_only: bool) -> Result<YearFrame> {
    let mut frame = capex_opex_frame(ctx, CAPEX)?;
    if thermo_only {
        let thermo =
            technology_types_with_tag(ctx.engine.network(), &ctx.settings.tags.thermo_tag);
        frame.retain_rows(|technology, _| thermo.contains(technology));
    }
    with_transport_capex(ctx, frame)
}

pub fn capex(ctx: &ScenarioContext) -> Result<DataResponse> {
    Ok(DataResponse::from_frame(&capex_frame(ctx, false)?))
}

pub fn thermo_capex(ctx: &ScenarioContext) -> Result<DataResponse> {
    Ok(DataResponse::from_frame(&capex_frame(ctx, true)?))
}

pub fn opex(ctx: &ScenarioContext) -> Result<DataResponse> {
    Ok(DataResponse::from_frame(&capex_opex_frame(ctx, OPEX)?))
}

/// Fuel usage times fuel cost, summed over fuels, per technology type.
pub fn variable_cost_frame(ctx: &ScenarioContext) -> Result<YearFrame> {
    let usage = source_table(ctx, SourceMetric::FuelUsage, Level::Type)?;
    let cost = source_table(ctx, SourceMetric::FuelCost, Level::Type)?;
    weighted_row_sums(&usage, &cost)
}

pub fn var_cost(ctx: &ScenarioContext) -> Result<DataResponse> {
    let frame = variable_cost_frame(ctx)?.translate_and_merge(ctx.translator.names());
    Ok(DataResponse::from_frame(&frame))
}

/// Emission fees per technology type.
///
/// Each generator pays, per emission type, the price of the lexicographically
/// smallest fee scheme it shares with that emission type. Emission types
/// without schemes and generators without a shared scheme contribute nothing.
pub fn ets_frame(ctx: &ScenarioContext) -> Result<YearFrame> {
    let network = ctx.engine.network();
    let table = source_table(ctx, SourceMetric::Emission, Level::Element)?;
    let years = table.years();

    let mut prices: BTreeMap<&str, BTreeMap<&str, Vec<f64>>> = BTreeMap::new();
    for fee in network.emission_fees.values() {
        prices
            .entry(fee.emission_type.as_str())
            .or_default()
            .insert(fee.name.as_str(), series_on(&fee.price, &years)?);
    }

    let mut per_generator = YearFrame::new(years.clone());
    for (emission_type, schemes) in &prices {
        let emissions = flatten_on_axis(&table, emission_type, &years)?;
        for (generator_name, quantities) in emissions.rows() {
            let generator = network
                .generator(generator_name)
                .ok_or_else(|| TopologyError::UnknownGenerator(generator_name.to_owned()))?;
            let common: BTreeSet<&str> = generator
                .emission_fee
                .iter()
                .map(String::as_str)
                .filter(|scheme| schemes.contains_key(scheme))
                .collect();
            let Some(price) = common.first().and_then(|scheme| schemes.get(scheme)) else {
                continue;
            };
            let fee: Vec<f64> = quantities.iter().zip(price).map(|(q, p)| q * p).collect();
            per_generator.accumulate_row(generator_name, &fee)?;
        }
    }

    Ok(per_generator.relabel_with(|generator| {
        network
            .generator(generator)
            .map(|g| g.energy_source_type.clone())
    }))
}

pub fn ets(ctx: &ScenarioContext) -> Result<DataResponse> {
    let frame = ets_frame(ctx)?.translate_and_merge(ctx.translator.names());
    Ok(DataResponse::from_frame(&frame))
}

/// One row per cost category on the union of the categories' years; a
/// category without a year reads zero there.
pub fn total_costs_frame(ctx: &ScenarioContext) -> Result<YearFrame> {
    let categories = [
        (CAPEX, capex_opex_frame(ctx, CAPEX)?),
        (OPEX, capex_opex_frame(ctx, OPEX)?),
        ("var_cost", variable_cost_frame(ctx)?),
        ("ets", ets_frame(ctx)?),
    ];
    let years: Vec<u32> = categories
        .iter()
        .flat_map(|(_, frame)| frame.years().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut totals = YearFrame::new(years.clone());
    for (name, frame) in &categories {
        let sums: BTreeMap<u32, f64> = frame
            .years()
            .iter()
            .copied()
            .zip(frame.column_sums())
            .collect();
        let values = years
            .iter()
            .map(|year| sums.get(year).copied().unwrap_or(0.0))
            .collect();
        totals.insert_row(*name, values)?;
    }
    Ok(totals)
}

pub fn total_costs(ctx: &ScenarioContext) -> Result<DataResponse> {
    Ok(DataResponse::from_frame(&total_costs_frame(ctx)?))
}
