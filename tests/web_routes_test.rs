#![cfg(feature = "web")]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{MockVehicleApi, accessory};
use http_body_util::BodyExt;
use std::sync::Arc;
use teslabridge::api::VehicleCommand;
use teslabridge::error::BridgeError;
use teslabridge::web::{AppState, build_router, serve};
use tower::ServiceExt;

fn router(api: Arc<MockVehicleApi>) -> axum::Router {
    build_router(AppState {
        accessory: Arc::new(accessory(api)),
    })
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn put(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_ok() {
    let response = router(Arc::new(MockVehicleApi::online()))
        .oneshot(get("/api/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn version_reports_build_version() {
    let response = router(Arc::new(MockVehicleApi::online()))
        .oneshot(get("/api/version"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["version"].as_str().is_some_and(|v| !v.is_empty()));
}

#[tokio::test]
async fn services_lists_catalog() {
    let response = router(Arc::new(MockVehicleApi::online()))
        .oneshot(get("/api/services"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["accessory"], "Car");
    let services = json["services"].as_array().unwrap();
    assert_eq!(services.len(), 11);
    assert_eq!(services[0]["id"], "thermostat");
    assert_eq!(services[0]["name"], "Car Thermostat");
}

#[tokio::test]
async fn get_characteristic_returns_value() {
    let response = router(Arc::new(MockVehicleApi::online()))
        .oneshot(get("/api/services/battery/BatteryLevel"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["value"], 78);
    assert_eq!(json["service"], "battery");
}

#[tokio::test]
async fn unknown_service_is_not_found() {
    let response = router(Arc::new(MockVehicleApi::online()))
        .oneshot(get("/api/services/sunroof/On"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_characteristic_issues_command() {
    let api = Arc::new(MockVehicleApi::online());
    let response = router(api.clone())
        .oneshot(put("/api/services/lights/On", r#"{"value": true}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(api.commands(), vec![VehicleCommand::FlashLights]);
}

#[tokio::test]
async fn put_on_sleeping_vehicle_conflicts() {
    let api = Arc::new(MockVehicleApi::asleep());
    let response = router(api)
        .oneshot(put("/api/services/doorlocks/LockTargetState", r#"{"value": 1}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("asleep"));
}

#[tokio::test]
async fn put_invalid_code_is_bad_request() {
    let response = router(Arc::new(MockVehicleApi::online()))
        .oneshot(put("/api/services/doorlocks/LockTargetState", r#"{"value": 7}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejected_command_is_bad_gateway() {
    let api = Arc::new(MockVehicleApi::online().with_response(
        "honk_horn",
        teslabridge::api::CommandResponse::rejected("user_not_present"),
    ));
    let response = router(api)
        .oneshot(put("/api/services/horn/On", r#"{"value": true}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Error setting horn state. user_not_present");
}

#[tokio::test]
async fn serve_reports_bind_failure_as_web_error() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let acc = Arc::new(accessory(Arc::new(MockVehicleApi::online())));
    let err = serve(acc, "127.0.0.1", port).await.unwrap_err();
    assert!(matches!(err, BridgeError::Web { .. }));
}
