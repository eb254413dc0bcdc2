//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Static tables and scenario summary routes."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use zefir_analytics::payload::{
    ScenarioDescription, StaticAggregateResponse, StaticPlotsResponse,
};
use zefir_analytics::scenario::describe_scenarios;
use zefir_analytics::static_data::{static_aggregate_data, static_plots};

use super::run_blocking;
use crate::{ApiError, ApiState};

pub async fn get_plots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<StaticPlotsResponse>, ApiError> {
    let plots = run_blocking(&state, |state| {
        Ok(static_plots(&state.context().paths().static_plots)?)
    })
    .await?;
    Ok(Json(plots))
}

pub async fn get_aggr_data(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<StaticAggregateResponse>>, ApiError> {
    let data = run_blocking(&state, |state| {
        Ok(static_aggregate_data(
            &state.context().paths().static_aggregate_data,
        )?)
    })
    .await?;
    Ok(Json(data))
}

pub async fn get_scenario_description(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ScenarioDescription>>, ApiError> {
    let descriptions =
        run_blocking(&state, |state| Ok(describe_scenarios(state.context())?)).await?;
    Ok(Json(descriptions))
}
