//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Area and scenario registry routes."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use zefir_analytics::areas::{Area, Scenario};

use crate::{ApiError, ApiState};

pub async fn list_areas(State(state): State<Arc<ApiState>>) -> Json<Vec<Area>> {
    Json(state.context().areas().to_vec())
}

pub async fn area_scenarios(
    State(state): State<Arc<ApiState>>,
    area_id: Result<Path<usize>, PathRejection>,
) -> Result<Json<Vec<Scenario>>, ApiError> {
    let Path(area_id) = area_id?;
    let area = state.context().area(area_id)?;
    Ok(Json(area.scenarios.clone()))
}
