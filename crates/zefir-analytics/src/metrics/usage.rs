//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Energy usage per aggregate type from demand and consumption factors."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Usage combines two sources per aggregated consumer: generator demand
//! resolved through the network topology, and the consumption factor
//! `yearly_energy_usage * n_consumers`. Aggregates are then regrouped into
//! their aggregate type by name prefix.

use strum::IntoEnumIterator;
use zefir_engine::model::Network;
use zefir_engine::results::{Level, SourceMetric};

use super::source_table;
use crate::context::ScenarioContext;
use crate::errors::Result;
use crate::frame::{series_on, YearFrame};
use crate::params::AggregateType;
use crate::payload::DataResponse;
use crate::reshape::flatten_two_level_index;
use crate::topology::map_generators_to_aggregates;

/// `yearly_energy_usage[energy_type] * n_consumers` per aggregate on `years`.
///
/// Aggregates without a usage series for the energy type get zeros.
pub fn consumption_factor(network: &Network, years: &[u32], energy_type: &str) -> Result<YearFrame> {
    let mut frame = YearFrame::new(years.to_vec());
    for aggregate in network.aggregated_consumers.values() {
        let values = match aggregate.yearly_energy_usage.get(energy_type) {
            Some(usage) => {
                let usage = series_on(usage, years)?;
                let consumers = series_on(&aggregate.n_consumers, years)?;
                usage.iter().zip(&consumers).map(|(u, n)| u * n).collect()
            }
            None => vec![0.0; years.len()],
        };
        frame.insert_row(aggregate.name.clone(), values)?;
    }
    Ok(frame)
}

/// Sum aggregate rows into their aggregate type; unmatched rows are dropped.
pub fn regroup_by_aggregate_type(frame: &YearFrame) -> YearFrame {
    frame.relabel_with(|aggregate| {
        AggregateType::iter()
            .find(|kind| kind.matches(aggregate))
            .map(|kind| kind.name_prefix())
    })
}

pub fn usage_frame(ctx: &ScenarioContext, energy_type: &str) -> Result<YearFrame> {
    let network = ctx.engine.network();
    let table = source_table(ctx, SourceMetric::GenerationDemand, Level::Element)?;
    if !table.has_column(energy_type) {
        let factor = consumption_factor(network, &table.years(), energy_type)?;
        return Ok(regroup_by_aggregate_type(&factor));
    }
    let demand = flatten_two_level_index(&table, energy_type)?;
    let demand = map_generators_to_aggregates(&demand, network, energy_type)?;
    let factor = consumption_factor(network, demand.years(), energy_type)?;
    let combined = demand.add_aligned(&factor)?;
    Ok(regroup_by_aggregate_type(&combined))
}

pub fn ee_usage(ctx: &ScenarioContext) -> Result<DataResponse> {
    let frame = usage_frame(ctx, &ctx.settings.names.usage_ee)?;
    Ok(DataResponse::from_frame(&frame))
}

pub fn heat_usage(ctx: &ScenarioContext) -> Result<DataResponse> {
    let frame = usage_frame(ctx, &ctx.settings.names.usage_heat)?;
    Ok(DataResponse::from_frame(&frame))
}

pub fn cold_usage(ctx: &ScenarioContext) -> Result<DataResponse> {
    let frame = usage_frame(ctx, &ctx.settings.names.usage_cold)?;
    Ok(DataResponse::from_frame(&frame))
}
