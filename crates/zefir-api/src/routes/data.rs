//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Scenario report routes."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use zefir_analytics::dispatch;
use zefir_analytics::payload::{DataResponse, FuelUnitEntry, TagsResponse, YearsResponse};
use zefir_analytics::static_data::{fuel_unit_entries, load_fuel_units};
use zefir_analytics::DataCategory;

use super::{default_scenario_id, run_blocking};
use crate::{ApiError, ApiState};

#[derive(Debug, Deserialize)]
pub struct DataQuery {
    data_category: DataCategory,
    #[serde(default = "default_scenario_id")]
    scenario_id: usize,
}

#[derive(Debug, Deserialize)]
pub struct YearsQuery {
    scenario_id: usize,
}

pub async fn get_data(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let Query(query) = query?;
    let response = run_blocking(&state, move |state| {
        let scenario = state.context().scenario(query.scenario_id)?;
        Ok(dispatch::get_data(scenario, query.data_category)?)
    })
    .await?;
    Ok(Json(response))
}

pub async fn get_years(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<YearsQuery>, QueryRejection>,
) -> Result<Json<YearsResponse>, ApiError> {
    let Query(query) = query?;
    let scenario = state.context().scenario(query.scenario_id)?;
    Ok(Json(YearsResponse {
        years: scenario.engine.year_sample().to_vec(),
    }))
}

pub async fn get_tags_map(State(state): State<Arc<ApiState>>) -> Json<TagsResponse> {
    Json(TagsResponse {
        tags: state.context().default_translator().tags_map(),
    })
}

pub async fn get_fuel_units(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<FuelUnitEntry>>, ApiError> {
    let entries = run_blocking(&state, |state| {
        let context = state.context();
        let units = load_fuel_units(&context.paths().fuel_units)?;
        Ok(fuel_unit_entries(&units, &context.default_translator()))
    })
    .await?;
    Ok(Json(entries))
}
