//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Aggregate-consumer totals, stack listings and per-tier breakdowns."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Aggregated consumers are bucketed by [`AggregateType`] (name prefix) and
//! split into [`ConsumptionType`] tiers (name marker). Per-year lists are cut
//! to the length of the scenario's year sample.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use strum::IntoEnumIterator;
use zefir_engine::model::{AggregatedConsumer, Network, YearSeries};
use zefir_engine::results::{Level, SourceMetric, StackFractions};

use crate::context::ScenarioContext;
use crate::errors::{AnalyticsError, Result};
use crate::frame::{multiply_series, YearFrame};
use crate::params::{AggregateType, ConsumptionType};
use crate::payload::{AggregateDetail, AggregateTotals, AreaData, StackInfo, UsagePerBuilding};
use crate::reshape::{flatten_two_level_index, scale_rows_by_aggregate_factor};
use crate::topology::map_generators_to_aggregates;

pub fn aggregates_of_type(network: &Network, aggregate_type: AggregateType) -> Vec<&AggregatedConsumer> {
    network
        .aggregated_consumers
        .values()
        .filter(|aggregate| aggregate_type.matches(&aggregate.name))
        .collect()
}

/// Tiers in declaration order; aggregates matching no tier are left out.
pub fn split_by_consumption_type<'a>(
    aggregates: &[&'a AggregatedConsumer],
) -> IndexMap<ConsumptionType, Vec<&'a AggregatedConsumer>> {
    ConsumptionType::iter()
        .map(|tier| {
            let members = aggregates
                .iter()
                .copied()
                .filter(|aggregate| tier.matches(&aggregate.name))
                .collect();
            (tier, members)
        })
        .collect()
}

fn add_series(total: &mut YearSeries, series: &YearSeries) {
    for (year, value) in series {
        *total.entry(*year).or_insert(0.0) += value;
    }
}

fn first_values(series: &YearSeries, n: usize) -> Vec<f64> {
    series.values().take(n).copied().collect()
}

/// Floor area and building count summed over `aggregates`.
pub fn totals_of(aggregates: &[&AggregatedConsumer], year_sample_len: usize) -> AggregateTotals {
    let mut buildings = YearSeries::new();
    let mut area = YearSeries::new();
    for aggregate in aggregates {
        add_series(&mut buildings, &aggregate.n_consumers);
        add_series(
            &mut area,
            &multiply_series(&aggregate.n_consumers, &aggregate.average_area),
        );
    }
    AggregateTotals {
        total_usable_area: first_values(&area, year_sample_len),
        total_amount_of_buildings: first_values(&buildings, year_sample_len)
            .into_iter()
            .map(|count| count.round() as i64)
            .collect(),
    }
}

pub fn aggregate_totals(ctx: &ScenarioContext, aggregate_type: AggregateType) -> AggregateTotals {
    let aggregates = aggregates_of_type(ctx.engine.network(), aggregate_type);
    totals_of(&aggregates, ctx.engine.year_sample().len())
}

/// Distinct technology types attached to the buses of `stack`.
pub fn stack_technologies(network: &Network, stack: &str) -> Result<BTreeSet<String>> {
    let stack = network
        .local_balancing_stacks
        .get(stack)
        .ok_or_else(|| AnalyticsError::UnknownStack(stack.to_owned()))?;
    let mut technologies = BTreeSet::new();
    for bus in stack.all_buses().filter_map(|name| network.bus(name)) {
        let elements = bus.generators.iter().chain(&bus.storages);
        technologies.extend(
            elements
                .filter_map(|element| network.element_type(element))
                .map(str::to_owned),
        );
    }
    Ok(technologies)
}

pub fn aggregate_stacks(
    ctx: &ScenarioContext,
    aggregate_type: AggregateType,
) -> Result<Vec<StackInfo>> {
    let network = ctx.engine.network();
    let mut stacks = Vec::new();
    for aggregate in aggregates_of_type(network, aggregate_type) {
        for stack in &aggregate.available_stacks {
            let techs: BTreeSet<String> = stack_technologies(network, stack)?
                .iter()
                .map(|ty| ctx.translator.name(ty).to_owned())
                .collect();
            stacks.push(StackInfo {
                stack_name: ctx.translator.stack(stack).to_owned(),
                techs: techs.into_iter().collect(),
            });
        }
    }
    Ok(stacks)
}

fn area_per_stack(
    ctx: &ScenarioContext,
    aggregates: &[&AggregatedConsumer],
    consumers_per_stack: &IndexMap<String, StackFractions>,
) -> Vec<AreaData> {
    let empty = YearSeries::new();
    let mut area = Vec::new();
    for aggregate in aggregates {
        let stacks = consumers_per_stack.get(&aggregate.name);
        for stack in &aggregate.available_stacks {
            let consumers = stacks.and_then(|s| s.get(stack)).unwrap_or(&empty);
            area.push(AreaData {
                stack_name: ctx.translator.stack(stack).to_owned(),
                values: multiply_series(consumers, &aggregate.average_area)
                    .into_values()
                    .collect(),
            });
        }
    }
    area
}

/// Demand per aggregate for every energy type the demand table carries.
fn demand_by_aggregate(ctx: &ScenarioContext) -> Result<IndexMap<String, YearFrame>> {
    let network = ctx.engine.network();
    let table = ctx
        .engine
        .results()
        .source_table(SourceMetric::GenerationDemand, Level::Element)?;
    table
        .columns
        .iter()
        .map(|energy_type| {
            let demand = flatten_two_level_index(&table, energy_type)?;
            let mapped = map_generators_to_aggregates(&demand, network, energy_type)?;
            Ok((energy_type.clone(), mapped))
        })
        .collect()
}

fn usage_per_building(
    ctx: &ScenarioContext,
    aggregates: &[&AggregatedConsumer],
    demand: &IndexMap<String, YearFrame>,
    year_sample_len: usize,
) -> Vec<UsagePerBuilding> {
    let mut per_energy_type: IndexMap<&str, Vec<f64>> = IndexMap::new();
    for aggregate in aggregates {
        for (energy_type, usage) in &aggregate.yearly_energy_usage {
            let mut total = multiply_series(usage, &aggregate.n_consumers);
            let generator_demand = demand
                .get(energy_type)
                .and_then(|frame| frame.row(&aggregate.name).map(|row| (frame.years(), row)));
            if let Some((years, row)) = generator_demand {
                let demand: YearSeries = years.iter().copied().zip(row.iter().copied()).collect();
                total = total
                    .iter()
                    .filter_map(|(year, value)| demand.get(year).map(|d| (*year, value + d)))
                    .collect();
            }
            let values = first_values(&total, year_sample_len);
            match per_energy_type.get_mut(energy_type.as_str()) {
                Some(acc) => {
                    acc.truncate(values.len());
                    acc.iter_mut().zip(&values).for_each(|(a, v)| *a += v);
                }
                None => {
                    per_energy_type.insert(energy_type.as_str(), values);
                }
            }
        }
    }
    per_energy_type
        .into_iter()
        .map(|(energy_type, values)| UsagePerBuilding {
            energy_type: ctx.translator.energy_type(energy_type).to_owned(),
            values,
        })
        .collect()
}

/// Per consumption tier: area per stack, energy per building and tier totals.
pub fn aggregate_details(
    ctx: &ScenarioContext,
    aggregate_type: AggregateType,
) -> Result<Vec<AggregateDetail>> {
    let results = ctx.engine.results();
    let year_sample_len = ctx.engine.year_sample().len();
    let aggregates = aggregates_of_type(ctx.engine.network(), aggregate_type);
    let consumers_per_stack =
        scale_rows_by_aggregate_factor(&results.fractions()?, &results.n_consumers()?);
    let demand = demand_by_aggregate(ctx)?;

    Ok(split_by_consumption_type(&aggregates)
        .into_iter()
        .map(|(tier, members)| {
            let totals = totals_of(&members, year_sample_len);
            AggregateDetail {
                name: tier.to_string(),
                area: area_per_stack(ctx, &members, &consumers_per_stack),
                energy_per_building: usage_per_building(ctx, &members, &demand, year_sample_len),
                agg_area: totals.total_usable_area,
                agg_amount_of_building: totals.total_amount_of_buildings,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(name: &str, counts: &[f64], area: f64) -> AggregatedConsumer {
        AggregatedConsumer {
            name: name.into(),
            available_stacks: Vec::new(),
            n_consumers: counts.iter().enumerate().map(|(y, c)| (y as u32, *c)).collect(),
            average_area: (0..counts.len() as u32).map(|y| (y, area)).collect(),
            yearly_energy_usage: IndexMap::new(),
        }
    }

    #[test]
    fn totals_are_truncated_to_year_sample() {
        let a = aggregate("SINGLE_FAMILY_EF", &[10.0, 11.0, 12.0, 13.0], 100.0);
        let b = aggregate("SINGLE_FAMILY_AB", &[1.0, 1.0, 1.0, 1.0], 50.0);
        let totals = totals_of(&[&a, &b], 2);
        assert_eq!(totals.total_amount_of_buildings, vec![11, 12]);
        assert_eq!(totals.total_usable_area, vec![1050.0, 1150.0]);
    }

    #[test]
    fn empty_type_gives_empty_lists() {
        let totals = totals_of(&[], 3);
        assert!(totals.total_usable_area.is_empty());
        assert!(totals.total_amount_of_buildings.is_empty());
    }

    #[test]
    fn tiers_use_name_markers_and_skip_unmatched() {
        let ef = aggregate("SINGLE_FAMILY_EF", &[1.0], 1.0);
        let ab = aggregate("SINGLE_FAMILY_AB", &[1.0], 1.0);
        let odd = aggregate("SINGLE_FAMILY_X", &[1.0], 1.0);
        let tiers = split_by_consumption_type(&[&ef, &ab, &odd]);
        assert_eq!(tiers.len(), 4);
        assert_eq!(tiers[&ConsumptionType::VeryHighConsumption].len(), 1);
        assert_eq!(tiers[&ConsumptionType::LowConsumption][0].name, "SINGLE_FAMILY_AB");
        assert!(tiers[&ConsumptionType::HighConsumption].is_empty());
        let placed: usize = tiers.values().map(Vec::len).sum();
        assert_eq!(placed, 2);
    }
}
