//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "integration-tests"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "HTTP round trips against the reporting API over the fixture tree."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use zefir_analytics::AppContext;
use zefir_api::{spawn_api_server, ApiServer, ApiState};
use zefir_testharness::FixtureWorkspace;

struct TestApi {
    _workspace: FixtureWorkspace,
    server: ApiServer,
    client: Client,
}

impl TestApi {
    fn start() -> Self {
        let workspace = FixtureWorkspace::create().unwrap();
        let context = AppContext::load(workspace.config()).unwrap();
        let state = Arc::new(ApiState::new(context));
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let server = spawn_api_server(state, addr, &[]).unwrap();
        Self {
            _workspace: workspace,
            server,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.server.addr(), path)
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> (StatusCode, Value) {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn stop(self) {
        self.server.shutdown().await.unwrap();
    }
}

fn square(x0: f64, y0: f64, side: f64) -> Value {
    json!([[
        [x0, y0],
        [x0 + side, y0],
        [x0 + side, y0 + side],
        [x0, y0 + side],
        [x0, y0]
    ]])
}

#[tokio::test]
async fn version_and_area_registry() {
    let api = TestApi::start();

    let (status, body) = api.get("/version", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let (status, body) = api.get("/areas", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Testowo");
    assert_eq!(body[0]["scenarios"].as_array().unwrap().len(), 2);

    let (status, body) = api.get("/areas/0", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "base");
    assert_eq!(body[1]["id"], 1);

    let (status, body) = api.get("/areas/5", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Area ID 5 not found");

    let (status, _) = api.get("/areas/north", &[]).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    api.stop().await;
}

#[tokio::test]
async fn data_reports_by_category() {
    let api = TestApi::start();

    let (status, body) = api
        .get(
            "/zefir_data/get_data",
            &[("data_category", "installed_power")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["years"], json!([0, 1, 2]));
    assert_eq!(body["data"].as_array().unwrap().len(), 13);
    assert!(body["data"][0]["technology_name"].is_string());

    let (status, body) = api
        .get(
            "/zefir_data/get_data",
            &[("data_category", "emissions"), ("scenario_id", "0")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"][0]["emission_type"].is_string());

    let (status, body) = api
        .get(
            "/zefir_data/get_data",
            &[("data_category", "installed_power"), ("scenario_id", "1")],
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Scenario_id 1 not found");

    let (status, body) = api
        .get("/zefir_data/get_data", &[("data_category", "weather")])
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    api.stop().await;
}

#[tokio::test]
async fn years_tags_and_fuel_units() {
    let api = TestApi::start();

    let (status, body) = api
        .get("/zefir_data/get_years", &[("scenario_id", "0")])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"years": [0, 1, 2]}));

    let (status, _) = api.get("/zefir_data/get_years", &[]).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = api.get("/zefir_data/get_tags_map", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tags"]["Pompa ciepła"], "Pompy ciepła");

    let (status, body) = api.get("/zefir_data/get_fuel_units", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"fuel_name": "Gaz", "fuel_unit": "m3"},
            {"fuel_name": "Węgiel", "fuel_unit": "t"},
            {"fuel_name": "Biomasa", "fuel_unit": "kg"}
        ])
    );

    api.stop().await;
}

#[tokio::test]
async fn aggregate_routes() {
    let api = TestApi::start();

    let (status, body) = api
        .get(
            "/zefir_aggregate/get_totals",
            &[("aggregate_type", "single_family")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_amount_of_buildings"], json!([1500, 1600, 1800]));

    let (status, body) = api
        .get(
            "/zefir_aggregate/get_stacks",
            &[("aggregate_type", "single_family")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["stack_name"], "LBS SF z gazem");

    let (status, body) = api
        .get(
            "/zefir_aggregate/details",
            &[("aggregate_type", "single_family")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
    assert_eq!(body[0]["name"], "very_high_consumption");

    let (status, _) = api
        .get("/zefir_aggregate/get_totals", &[("aggregate_type", "castle")])
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    api.stop().await;
}

#[tokio::test]
async fn map_routes_filter_buildings() {
    let api = TestApi::start();

    let (status, body) = api
        .post(
            "/zefir_map/polygon_buildings",
            &json!({"type": "Polygon", "coordinates": square(0.0, 0.0, 10.0)}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 1);
    assert_eq!(body[0]["type"], "Feature");

    let (status, body) = api
        .post(
            "/zefir_map/multipolygon_buildings",
            &json!({
                "type": "MultiPolygon",
                "coordinates": [square(0.0, 0.0, 10.0), square(20.0, 0.0, 5.0)]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|feature| feature["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);

    let (status, _) = api
        .post(
            "/zefir_map/polygon_buildings",
            &json!({"type": "Point", "coordinates": [1.0, 2.0]}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = api.get("/zefir_map/get_points", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["properties"]["CO2"], 12.5);

    api.stop().await;
}

#[tokio::test]
async fn static_routes_and_scenario_description() {
    let api = TestApi::start();

    let (status, body) = api.get("/zefir_static/get_plots", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labels"], json!(["MULTI_FAMILY", "SINGLE_FAMILY"]));

    let (status, body) = api.get("/zefir_static/get_aggr_data", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
    assert_eq!(body[0]["aggr_type"], "single_family");

    let (status, body) = api
        .get("/zefir_static/get_scenario_description", &[])
        .await;
    assert_eq!(status, StatusCode::OK);
    let scenarios = body.as_array().unwrap();
    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0]["name"], "base");
    let co2 = scenarios[0]["total_emission_CO2"].as_f64().unwrap();
    assert!((co2 - 786.0).abs() < 1e-6);

    api.stop().await;
}
