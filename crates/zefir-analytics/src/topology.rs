//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Generator to bus to stack to aggregate resolution over a network."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::collections::BTreeSet;

use indexmap::IndexMap;
use zefir_engine::model::{Generator, Network};

use crate::errors::{Result, TopologyError};
use crate::frame::YearFrame;

/// Row key used for generators without a bus of the requested energy type.
pub const NOT_FOUND_ENERGY_TYPE: &str = "not_found_energy_type";

/// Outcome of resolving a generator to its aggregated consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateLookup {
    Aggregate(String),
    /// The generator has no bus carrying the energy type.
    NotFoundEnergyType,
}

impl AggregateLookup {
    pub fn as_key(&self) -> &str {
        match self {
            AggregateLookup::Aggregate(name) => name,
            AggregateLookup::NotFoundEnergyType => NOT_FOUND_ENERGY_TYPE,
        }
    }

    pub fn aggregate(&self) -> Option<&str> {
        match self {
            AggregateLookup::Aggregate(name) => Some(name),
            AggregateLookup::NotFoundEnergyType => None,
        }
    }
}

/// First bus of `generator` that carries `energy_type`.
pub fn find_bus_for_energy_type<'a>(
    network: &'a Network,
    generator: &Generator,
    energy_type: &str,
) -> Option<&'a str> {
    generator
        .buses
        .iter()
        .filter_map(|bus| network.bus(bus))
        .find(|bus| bus.energy_type == energy_type)
        .map(|bus| bus.name.as_str())
}

/// First stack listing `bus` under `energy_type`.
pub fn find_stack_for_bus<'a>(
    network: &'a Network,
    bus: &str,
    energy_type: &str,
) -> Option<&'a str> {
    network
        .local_balancing_stacks
        .values()
        .find(|stack| {
            stack
                .buses
                .get(energy_type)
                .is_some_and(|buses| buses.iter().any(|b| b == bus))
        })
        .map(|stack| stack.name.as_str())
}

/// Walk generator, bus, stack and aggregate for one energy type.
pub fn resolve_aggregate_for_generator(
    network: &Network,
    generator: &str,
    energy_type: &str,
) -> std::result::Result<AggregateLookup, TopologyError> {
    let generator = network
        .generator(generator)
        .ok_or_else(|| TopologyError::UnknownGenerator(generator.to_owned()))?;
    let Some(bus) = find_bus_for_energy_type(network, generator, energy_type) else {
        return Ok(AggregateLookup::NotFoundEnergyType);
    };
    let stack =
        find_stack_for_bus(network, bus, energy_type).ok_or_else(|| TopologyError::StackNotFound {
            bus: bus.to_owned(),
            energy_type: energy_type.to_owned(),
        })?;
    network
        .aggregated_consumers
        .values()
        .find(|agg| agg.available_stacks.iter().any(|s| s == stack))
        .map(|agg| AggregateLookup::Aggregate(agg.name.clone()))
        .ok_or_else(|| TopologyError::AggregateNotFound(stack.to_owned()))
}

/// Generators whose technology type carries any of `tags`.
pub fn filter_generators_by_tag<'a>(network: &'a Network, tags: &[&str]) -> Vec<&'a Generator> {
    network
        .generators
        .values()
        .filter(|generator| {
            network
                .generator_tags(generator)
                .iter()
                .any(|tag| tags.contains(&tag.as_str()))
        })
        .collect()
}

/// Technology types of the generators carrying `tag`.
pub fn technology_types_with_tag(network: &Network, tag: &str) -> BTreeSet<String> {
    filter_generators_by_tag(network, &[tag])
        .into_iter()
        .map(|g| g.energy_source_type.clone())
        .collect()
}

/// Resolve every generator row of `frame` to its aggregate for `energy_type`.
pub fn resolve_rows(
    frame: &YearFrame,
    network: &Network,
    energy_type: &str,
) -> Result<IndexMap<String, AggregateLookup>> {
    frame
        .labels()
        .map(|generator| -> Result<(String, AggregateLookup)> {
            let lookup = resolve_aggregate_for_generator(network, generator, energy_type)?;
            Ok((generator.to_owned(), lookup))
        })
        .collect()
}

/// Relabel generator rows to their aggregate, dropping unresolved rows and
/// summing rows of the same aggregate.
pub fn map_generators_to_aggregates(
    frame: &YearFrame,
    network: &Network,
    energy_type: &str,
) -> Result<YearFrame> {
    let resolved = resolve_rows(frame, network, energy_type)?;
    Ok(frame.relabel_with(|generator| {
        resolved
            .get(generator)
            .and_then(AggregateLookup::aggregate)
            .map(str::to_owned)
    }))
}
