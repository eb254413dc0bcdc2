//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "HTTP surface over the loaded scenario context."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Read-only JSON endpoints. Every handler borrows the shared [`AppContext`];
//! nothing is mutated after start-up.

pub mod error;
mod routes;

use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use zefir_analytics::AppContext;

pub use error::ApiError;

/// Shared API state exposed to handlers.
#[derive(Debug)]
pub struct ApiState {
    context: AppContext,
    version: &'static str,
}

impl ApiState {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn version(&self) -> &'static str {
        self.version
    }
}

/// Handle to the running API server.
#[derive(Debug)]
pub struct ApiServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<()>>,
}

impl ApiServer {
    /// Bound address; differs from the requested one when port 0 was used.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.task.await {
            Ok(result) => result,
            Err(err) => Err(err.into()),
        }
    }
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin {origin:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Every reporting route over `state`. An empty `cors_origins` allows any
/// origin.
pub fn router(state: Arc<ApiState>, cors_origins: &[String]) -> Result<Router> {
    let router = Router::new()
        .route("/version", get(routes::version))
        .route("/areas", get(routes::areas::list_areas))
        .route("/areas/:area_id", get(routes::areas::area_scenarios))
        .route("/zefir_data/get_data", get(routes::data::get_data))
        .route("/zefir_data/get_years", get(routes::data::get_years))
        .route("/zefir_data/get_tags_map", get(routes::data::get_tags_map))
        .route("/zefir_data/get_fuel_units", get(routes::data::get_fuel_units))
        .route("/zefir_aggregate/get_totals", get(routes::aggregate::get_totals))
        .route("/zefir_aggregate/get_stacks", get(routes::aggregate::get_stacks))
        .route("/zefir_aggregate/details", get(routes::aggregate::details))
        .route(
            "/zefir_map/polygon_buildings",
            post(routes::map::polygon_buildings),
        )
        .route(
            "/zefir_map/multipolygon_buildings",
            post(routes::map::multipolygon_buildings),
        )
        .route("/zefir_map/get_points", get(routes::map::get_points))
        .route("/zefir_static/get_plots", get(routes::statics::get_plots))
        .route("/zefir_static/get_aggr_data", get(routes::statics::get_aggr_data))
        .route(
            "/zefir_static/get_scenario_description",
            get(routes::statics::get_scenario_description),
        )
        .with_state(state)
        .layer(cors_layer(cors_origins)?)
        .layer(TraceLayer::new_for_http());
    Ok(router)
}

/// Bind `addr` and serve the reporting API until shut down.
pub fn spawn_api_server(
    state: Arc<ApiState>,
    addr: SocketAddr,
    cors_origins: &[String],
) -> Result<ApiServer> {
    let router = router(state, cors_origins)?;

    let listener = StdTcpListener::bind(addr)
        .with_context(|| format!("failed to bind API listener {addr}"))?;
    listener
        .set_nonblocking(true)
        .context("failed to configure API listener as non-blocking")?;
    let addr = listener
        .local_addr()
        .context("failed to read API listener address")?;
    let tcp_listener =
        TcpListener::from_std(listener).context("failed to create tokio listener")?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle: JoinHandle<Result<()>> = tokio::spawn(async move {
        info!(address = %addr, "api server listening");
        if let Err(err) = axum::serve(tcp_listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
        {
            error!(address = %addr, error = %err, "api server exited with error");
            return Err(err.into());
        }
        Ok(())
    });

    Ok(ApiServer {
        addr,
        shutdown: Some(shutdown_tx),
        task: handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_origin_list_allows_any() {
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["http://localhost:3000".to_owned()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_owned()]).is_err());
    }
}
