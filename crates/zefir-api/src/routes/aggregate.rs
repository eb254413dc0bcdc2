//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Aggregated-consumer routes."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use zefir_analytics::aggregate::{aggregate_details, aggregate_stacks, aggregate_totals};
use zefir_analytics::payload::{AggregateDetail, AggregateTotals, StackInfo};
use zefir_analytics::AggregateType;

use super::{default_scenario_id, run_blocking};
use crate::{ApiError, ApiState};

#[derive(Debug, Deserialize)]
pub struct AggregateQuery {
    aggregate_type: AggregateType,
    #[serde(default = "default_scenario_id")]
    scenario_id: usize,
}

pub async fn get_totals(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<AggregateQuery>, QueryRejection>,
) -> Result<Json<AggregateTotals>, ApiError> {
    let Query(query) = query?;
    let scenario = state.context().scenario(query.scenario_id)?;
    Ok(Json(aggregate_totals(scenario, query.aggregate_type)))
}

pub async fn get_stacks(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<AggregateQuery>, QueryRejection>,
) -> Result<Json<Vec<StackInfo>>, ApiError> {
    let Query(query) = query?;
    let scenario = state.context().scenario(query.scenario_id)?;
    Ok(Json(aggregate_stacks(scenario, query.aggregate_type)?))
}

pub async fn details(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<AggregateQuery>, QueryRejection>,
) -> Result<Json<Vec<AggregateDetail>>, ApiError> {
    let Query(query) = query?;
    let details = run_blocking(&state, move |state| {
        let scenario = state.context().scenario(query.scenario_id)?;
        Ok(aggregate_details(scenario, query.aggregate_type)?)
    })
    .await?;
    Ok(Json(details))
}
