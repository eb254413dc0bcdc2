//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Metric extractors shaping result tables into report series."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! One module per metric family. Every extractor takes a
//! [`ScenarioContext`] and pulls fresh tables from its result source.

pub mod costs;
pub mod emissions;
pub mod power;
pub mod production;
pub mod usage;

use zefir_engine::results::{Level, ResultTable, SourceMetric};

use crate::context::ScenarioContext;
use crate::errors::Result;

pub(crate) fn source_table(
    ctx: &ScenarioContext,
    metric: SourceMetric,
    level: Level,
) -> Result<ResultTable> {
    Ok(ctx.engine.results().source_table(metric, level)?)
}
