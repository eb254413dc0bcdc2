//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Generation per technology type for one energy type."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use zefir_engine::results::{Level, SourceMetric};

use super::source_table;
use crate::context::ScenarioContext;
use crate::errors::Result;
use crate::frame::YearFrame;
use crate::payload::DataResponse;
use crate::reshape::flatten_two_level_index;
use crate::topology::technology_types_with_tag;

/// Generation of `energy_type` per technology, thermal technologies excluded.
pub fn production_frame(ctx: &ScenarioContext, energy_type: &str) -> Result<YearFrame> {
    let table = source_table(ctx, SourceMetric::GenerationSum, Level::Type)?;
    let mut frame = flatten_two_level_index(&table, energy_type)?;
    let thermo = technology_types_with_tag(ctx.engine.network(), &ctx.settings.tags.thermo_tag);
    frame.retain_rows(|technology, _| !thermo.contains(technology));
    Ok(frame.translate_and_merge(ctx.translator.names()))
}

pub fn ee_production(ctx: &ScenarioContext) -> Result<DataResponse> {
    let frame = production_frame(ctx, &ctx.settings.names.production_ee)?;
    Ok(DataResponse::from_frame(&frame))
}

pub fn heat_production(ctx: &ScenarioContext) -> Result<DataResponse> {
    let frame = production_frame(ctx, &ctx.settings.names.production_heat)?;
    Ok(DataResponse::from_frame(&frame))
}

pub fn cold_production(ctx: &ScenarioContext) -> Result<DataResponse> {
    let frame = production_frame(ctx, &ctx.settings.names.production_cold)?;
    Ok(DataResponse::from_frame(&frame))
}
