//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Map layer routes."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::debug;
use zefir_analytics::map::{
    BuildingFeature, MultiPolygonGeometry, PointFeature, PolygonCoordinates, PolygonGeometry,
};

use crate::{ApiError, ApiState};

fn buildings_within(state: &ApiState, polygons: &[PolygonCoordinates]) -> Vec<BuildingFeature> {
    let buildings = state.context().map().buildings_within(polygons);
    debug!(
        polygons = polygons.len(),
        buildings = buildings.len(),
        "buildings selected"
    );
    buildings
}

pub async fn polygon_buildings(
    State(state): State<Arc<ApiState>>,
    geometry: Result<Json<PolygonGeometry>, JsonRejection>,
) -> Result<Json<Vec<BuildingFeature>>, ApiError> {
    let Json(geometry) = geometry?;
    Ok(Json(buildings_within(&state, &[geometry.coordinates])))
}

pub async fn multipolygon_buildings(
    State(state): State<Arc<ApiState>>,
    geometry: Result<Json<MultiPolygonGeometry>, JsonRejection>,
) -> Result<Json<Vec<BuildingFeature>>, ApiError> {
    let Json(geometry) = geometry?;
    Ok(Json(buildings_within(&state, &geometry.coordinates)))
}

pub async fn get_points(State(state): State<Arc<ApiState>>) -> Json<Vec<PointFeature>> {
    Json(state.context().map().points().to_vec())
}
