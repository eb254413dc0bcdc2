//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Scenario-level cost and emission summaries."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use zefir_engine::results::{Level, SourceMetric};

use crate::context::{AppContext, ScenarioContext};
use crate::errors::Result;
use crate::metrics::costs::{ets_frame, variable_cost_frame};
use crate::payload::ScenarioDescription;
use crate::reshape::flatten_two_level_index;

const HOURS_PER_YEAR: u32 = 8760;
const CO2: &str = "CO2";

/// Creation time of the results file, falling back to its modification time.
pub fn result_creation_time(path: &Path) -> Result<DateTime<Utc>> {
    let metadata = fs::metadata(path)?;
    let time = metadata.created().or_else(|_| metadata.modified())?;
    Ok(DateTime::<Utc>::from(time))
}

pub fn describe_scenario(ctx: &ScenarioContext) -> Result<ScenarioDescription> {
    let engine = &ctx.engine;
    let capex_opex = engine
        .results()
        .source_table(SourceMetric::CapexOpex, Level::Type)?;
    let total_capex = flatten_two_level_index(&capex_opex, "capex")?.total();
    let total_opex = flatten_two_level_index(&capex_opex, "opex")?.total();
    let total_varcost = variable_cost_frame(ctx)?.total();
    let total_ets = ets_frame(ctx)?.total();

    let emissions = engine
        .results()
        .source_table(SourceMetric::Emission, Level::Type)?;
    let total_emission_co2 = emissions
        .column_cells(CO2)
        .map(|cells| cells.iter().map(|(_, _, value)| value).sum())
        .unwrap_or(0.0);

    let date = match engine.results_path() {
        Some(path) => result_creation_time(path)?,
        None => Utc::now(),
    };
    let constants = &engine.network().constants;
    Ok(ScenarioDescription {
        id: ctx.id,
        name: engine.scenario_name().to_owned(),
        total_cost: total_capex + total_opex + total_varcost + total_ets,
        total_capex,
        total_opex,
        total_varcost,
        total_emission_co2,
        date,
        description: ctx.description.clone(),
        analyze_time: constants.n_years,
        analyze_step: constants.n_hours / HOURS_PER_YEAR,
    })
}

/// Descriptions of every loaded scenario, in scenario id order.
pub fn describe_scenarios(app: &AppContext) -> Result<Vec<ScenarioDescription>> {
    app.scenarios().map(describe_scenario).collect()
}
