//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Installed power and new-device counts per technology type."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use indexmap::IndexMap;
use tracing::debug;
use zefir_engine::model::YearSeries;
use zefir_engine::results::{Level, SourceMetric, StackFractions};

use super::source_table;
use crate::context::ScenarioContext;
use crate::errors::Result;
use crate::frame::YearFrame;
use crate::payload::DataResponse;
use crate::reshape::{
    flatten_two_level_index, frame_from_summed_cells, scale_rows_by_aggregate_factor,
};

/// Installed capacity per technology type, hidden tags removed.
pub fn installed_power_frame(ctx: &ScenarioContext) -> Result<YearFrame> {
    let table = source_table(ctx, SourceMetric::InstalledCapacity, Level::Type)?;
    let mut frame = match table.columns.first() {
        Some(column) => flatten_two_level_index(&table, column)?,
        None => YearFrame::new(table.years()),
    };
    let hidden = &ctx.settings.tags.tags_to_drop;
    let primary_tags = ctx.translator.primary_tags();
    frame.retain_rows(|technology, _| {
        primary_tags
            .get(technology)
            .map_or(true, |tag| !hidden.contains(tag))
    });
    Ok(frame.translate_and_merge(ctx.translator.names()))
}

pub fn installed_power(ctx: &ScenarioContext) -> Result<DataResponse> {
    Ok(DataResponse::from_frame(&installed_power_frame(ctx)?))
}

/// Year-on-year growth of a fraction series; the first year is zero and
/// decreases are clipped to zero.
pub fn positive_increments(series: &YearSeries) -> YearSeries {
    let mut previous: Option<f64> = None;
    series
        .iter()
        .map(|(year, value)| {
            let increment = previous.map_or(0.0, |prev| (value - prev).max(0.0));
            previous = Some(*value);
            (*year, increment)
        })
        .collect()
}

fn fraction_increments(
    fractions: &IndexMap<String, StackFractions>,
) -> IndexMap<String, StackFractions> {
    fractions
        .iter()
        .map(|(aggregate, stacks)| {
            let increments = stacks
                .iter()
                .map(|(stack, series)| (stack.clone(), positive_increments(series)))
                .collect();
            (aggregate.clone(), increments)
        })
        .collect()
}

/// New devices per technology type: every element with non-zero power in a
/// stack counts the consumers that joined the stack that year.
pub fn amount_of_devices_frame(ctx: &ScenarioContext) -> Result<YearFrame> {
    let results = ctx.engine.results();
    let network = ctx.engine.network();
    let increments = fraction_increments(&results.fractions()?);
    let new_consumers = scale_rows_by_aggregate_factor(&increments, &results.n_consumers()?);

    let mut cells = Vec::new();
    for stacks in new_consumers.values() {
        for (stack, counts) in stacks {
            for (element, power) in results.lbs_capacity(stack)? {
                let Some(technology) = network.element_type(&element) else {
                    debug!(stack = %stack, element = %element, "element without technology type");
                    continue;
                };
                for (year, installed) in power {
                    let devices = if installed != 0.0 {
                        counts.get(&year).copied().unwrap_or(0.0)
                    } else {
                        0.0
                    };
                    cells.push((technology.to_owned(), year, devices));
                }
            }
        }
    }
    let frame = frame_from_summed_cells(cells)?;
    Ok(frame.translate_and_merge(ctx.translator.names()))
}

pub fn amount_of_devices(ctx: &ScenarioContext) -> Result<DataResponse> {
    Ok(DataResponse::from_frame(&amount_of_devices_frame(ctx)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_start_at_zero_and_never_go_negative() {
        let series: YearSeries = [(0, 0.2), (1, 0.5), (2, 0.4), (3, 0.9)].into_iter().collect();
        let increments = positive_increments(&series);
        let values: Vec<f64> = increments.values().copied().collect();
        assert_eq!(values.len(), 4);
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 0.3).abs() < 1e-12);
        assert_eq!(values[2], 0.0);
        assert!((values[3] - 0.5).abs() < 1e-12);
    }
}
