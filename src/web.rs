//! Axum-based HTTP host for the accessory
//!
//! Exposes the service catalog, characteristic reads and writes, and a
//! server-sent event stream of characteristic updates.

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::accessory::{CharacteristicKind, CharacteristicValue, ServiceId, TeslaAccessory};
use crate::error::{BridgeError, Result};

#[derive(Clone)]
pub struct AppState {
    pub accessory: Arc<TeslaAccessory>,
}

#[derive(Deserialize)]
pub struct SetBody {
    pub value: CharacteristicValue,
}

type ApiResponse = (StatusCode, Json<serde_json::Value>);

fn status_for(error: &BridgeError) -> StatusCode {
    match error {
        BridgeError::Unsupported { .. } => StatusCode::NOT_FOUND,
        BridgeError::Validation { .. } => StatusCode::BAD_REQUEST,
        BridgeError::Precondition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(error: &BridgeError) -> ApiResponse {
    (
        status_for(error),
        Json(serde_json::json!({"error": error.to_string()})),
    )
}

fn resolve(service: &str, characteristic: &str) -> Result<(ServiceId, CharacteristicKind)> {
    match (
        ServiceId::from_label(service),
        CharacteristicKind::from_label(characteristic),
    ) {
        (Some(s), Some(c)) => Ok((s, c)),
        _ => Err(BridgeError::unsupported(service, characteristic)),
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn version() -> impl IntoResponse {
    Json(serde_json::json!({"version": env!("APP_VERSION")}))
}

pub async fn services(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "accessory": state.accessory.name(),
        "instance_id": state.accessory.instance_id(),
        "services": state.accessory.services(),
    }))
}

pub async fn get_characteristic(
    State(state): State<AppState>,
    Path((service, characteristic)): Path<(String, String)>,
) -> impl IntoResponse {
    let (service, characteristic) = match resolve(&service, &characteristic) {
        Ok(pair) => pair,
        Err(e) => return error_response(&e),
    };
    match state.accessory.get(service, characteristic).await {
        Ok(value) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "service": service,
                "characteristic": characteristic,
                "value": value,
            })),
        ),
        Err(e) => error_response(&e),
    }
}

pub async fn put_characteristic(
    State(state): State<AppState>,
    Path((service, characteristic)): Path<(String, String)>,
    Json(body): Json<SetBody>,
) -> impl IntoResponse {
    let (service, characteristic) = match resolve(&service, &characteristic) {
        Ok(pair) => pair,
        Err(e) => return error_response(&e),
    };
    match state.accessory.set(service, characteristic, body.value).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"ok": true}))),
        Err(e) => error_response(&e),
    }
}

pub async fn events(State(state): State<AppState>) -> impl IntoResponse {
    let rx = state.accessory.subscribe();
    let stream = tokio_stream::wrappers::BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(update) => serde_json::to_string(&update).ok().map(|payload| {
            Ok::<Event, std::convert::Infallible>(
                Event::default().event("characteristic").data(payload),
            )
        }),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/version", get(version))
        .route("/api/services", get(services))
        .route(
            "/api/services/{service}/{characteristic}",
            get(get_characteristic).put(put_characteristic),
        )
        .route("/api/events", get(events))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(accessory: Arc<TeslaAccessory>, host: &str, port: u16) -> Result<()> {
    let router = build_router(AppState { accessory });

    let logger = crate::logging::get_logger("web");
    logger.info(&format!(
        "Starting web server; requested host={}, port={}",
        host, port
    ));

    let addr = match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            logger.warn(&format!("Invalid host '{}'; falling back to 127.0.0.1", host));
            ([127, 0, 0, 1], port).into()
        }
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BridgeError::web(format!("cannot bind {}: {}", addr, e)))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| BridgeError::web(e.to_string()))?;
    logger.info(&format!(
        "Web server listening at http://{}:{}",
        local_addr.ip(),
        local_addr.port()
    ));

    axum::serve(listener, router)
        .await
        .map_err(|e| BridgeError::web(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        assert_eq!(
            status_for(&BridgeError::unsupported("horn", "BatteryLevel")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&BridgeError::precondition("asleep")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&BridgeError::rejected("trunk state", "busy")),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn labels_resolve_case_insensitively() {
        assert_eq!(
            resolve("DoorLocks", "locktargetstate").unwrap(),
            (ServiceId::DoorLocks, CharacteristicKind::LockTargetState)
        );
        assert!(resolve("sunroof", "On").is_err());
    }
}
