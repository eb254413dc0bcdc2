//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Route handlers grouped by endpoint prefix."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
pub mod aggregate;
pub mod areas;
pub mod data;
pub mod map;
pub mod statics;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::{ApiError, ApiState};

fn default_scenario_id() -> usize {
    0
}

/// Run report extraction or file reads on the blocking pool so async
/// workers keep serving other connections.
async fn run_blocking<T, F>(state: &Arc<ApiState>, job: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&ApiState) -> Result<T, ApiError> + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || job(&state))
        .await
        .map_err(|err| {
            error!(error = %err, "report task failed");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "report task failed")
        })?
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    version: &'static str,
}

pub async fn version(State(state): State<Arc<ApiState>>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: state.version(),
    })
}
